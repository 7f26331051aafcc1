use mach_header::consts::*;
use mach_header::{ByteOrder, HeaderError, MachHeader64};

fn sample() -> MachHeader64 {
    MachHeader64 {
        magic: MH_MAGIC_64,
        cputype: CPU_TYPE_X86_64,
        cpusubtype: 3,
        filetype: MH_EXECUTE,
        ncmds: 16,
        sizeofcmds: 0x5a8,
        flags: MH_NOUNDEFS | MH_DYLDLINK | MH_TWOLEVEL | MH_PIE,
        reserved: 0,
    }
}

#[test]
fn header_is_32_bytes() {
    assert_eq!(std::mem::size_of::<MachHeader64>(), 32);
    assert_eq!(MachHeader64::SIZE, 32);
}

#[test]
fn decode_known_little_endian_buffer() {
    #[rustfmt::skip]
    let raw: [u8; 32] = [
        0xcf, 0xfa, 0xed, 0xfe,
        0x07, 0x00, 0x00, 0x01,
        0x03, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00,
        0x10, 0x00, 0x00, 0x00,
        0xa8, 0x05, 0x00, 0x00,
        0x85, 0x00, 0x20, 0x00,
        0x00, 0x00, 0x00, 0x00,
    ];

    let header = MachHeader64::from_bytes(&raw, ByteOrder::Little).unwrap();
    assert_eq!(header, sample());
    assert_eq!(header.to_bytes(ByteOrder::Little), raw);
}

#[test]
fn parse_detects_byte_order() {
    let header = sample();

    let (le, order) = MachHeader64::parse(&header.to_bytes(ByteOrder::Little)).unwrap();
    assert_eq!(order, ByteOrder::Little);
    assert_eq!(le, header);

    let (be, order) = MachHeader64::parse(&header.to_bytes(ByteOrder::Big)).unwrap();
    assert_eq!(order, ByteOrder::Big);
    assert_eq!(be, header);
    assert_eq!(be.filetype_name(), Some("execute"));
    assert_eq!(be.cpu_name(), Some("x86_64"));
}

#[test]
fn parse_trailing_bytes_ignored() {
    let mut raw = sample().to_bytes(ByteOrder::Little).to_vec();
    raw.extend_from_slice(&[0xaa; 64]);
    let (header, _) = MachHeader64::parse(&raw).unwrap();
    assert_eq!(header, sample());
}

#[test]
fn truncated_input() {
    let raw = sample().to_bytes(ByteOrder::Little);
    assert_eq!(
        MachHeader64::parse(&raw[..31]),
        Err(HeaderError::Truncated { len: 31, need: 32 })
    );
    assert!(MachHeader64::from_bytes(&[], ByteOrder::Big).is_err());
}

#[test]
fn wrong_magic() {
    let mut header = sample();
    header.magic = MH_MAGIC;
    let err = MachHeader64::parse(&header.to_bytes(ByteOrder::Little)).unwrap_err();
    assert_eq!(err, HeaderError::BadMagic(MH_MAGIC));
    assert_eq!(err.to_string(), "unknown magic num: 0xfeedface");
}
