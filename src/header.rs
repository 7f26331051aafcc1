use crate::consts::{self, MH_CIGAM_64, MH_MAGIC_64};
use crate::ffi::{FatArch, FatHeader, MachHeader64};
use byteorder::{BigEndian, ByteOrder as _, LittleEndian};
use std::fmt;
use zerocopy::IntoBytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;

    fn read_words<const N: usize>(self, bytes: &[u8]) -> [u32; N] {
        let mut words = [0u32; N];
        let src = &bytes[..N * 4];
        match self {
            ByteOrder::Little => LittleEndian::read_u32_into(src, &mut words),
            ByteOrder::Big => BigEndian::read_u32_into(src, &mut words),
        }
        words
    }

    fn write_words(self, words: &[u32], dst: &mut [u8]) {
        match self {
            ByteOrder::Little => LittleEndian::write_u32_into(words, dst),
            ByteOrder::Big => BigEndian::write_u32_into(words, dst),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Input shorter than the record being decoded.
    Truncated { len: usize, need: usize },
    /// First word is not a 64-bit Mach-O magic in either byte order.
    BadMagic(u32),
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Truncated { len, need } => {
                write!(f, "truncated header: got {} bytes, need {}", len, need)
            }
            HeaderError::BadMagic(magic) => write!(f, "unknown magic num: {:#x}", magic),
        }
    }
}

impl std::error::Error for HeaderError {}

fn ensure_len(bytes: &[u8], need: usize) -> Result<(), HeaderError> {
    if bytes.len() < need {
        return Err(HeaderError::Truncated {
            len: bytes.len(),
            need,
        });
    }
    Ok(())
}

impl MachHeader64 {
    pub const SIZE: usize = std::mem::size_of::<MachHeader64>();

    /// Decodes the first [`SIZE`](Self::SIZE) bytes of `bytes` in `order`.
    /// The magic is not checked; use [`parse`](Self::parse) for that.
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, HeaderError> {
        ensure_len(bytes, Self::SIZE)?;
        let [magic, cputype, cpusubtype, filetype, ncmds, sizeofcmds, flags, reserved] =
            order.read_words::<8>(bytes);
        Ok(MachHeader64 {
            magic,
            cputype: cputype as i32,
            cpusubtype: cpusubtype as i32,
            filetype,
            ncmds,
            sizeofcmds,
            flags,
            reserved,
        })
    }

    pub fn to_bytes(&self, order: ByteOrder) -> [u8; MachHeader64::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        let words = [
            self.magic,
            self.cputype as u32,
            self.cpusubtype as u32,
            self.filetype,
            self.ncmds,
            self.sizeofcmds,
            self.flags,
            self.reserved,
        ];
        order.write_words(&words, &mut buf);
        buf
    }

    /// Reads a 64-bit header, picking the byte order from its magic.
    pub fn parse(bytes: &[u8]) -> Result<(Self, ByteOrder), HeaderError> {
        ensure_len(bytes, Self::SIZE)?;
        let order = match LittleEndian::read_u32(bytes) {
            MH_MAGIC_64 => ByteOrder::Little,
            MH_CIGAM_64 => ByteOrder::Big,
            magic => return Err(HeaderError::BadMagic(magic)),
        };
        Ok((Self::from_bytes(bytes, order)?, order))
    }

    /// The record exactly as it sits in memory.
    pub fn as_bytes(&self) -> &[u8] {
        IntoBytes::as_bytes(self)
    }

    pub fn is_64bit(&self) -> bool {
        self.magic == MH_MAGIC_64
    }

    pub fn filetype_name(&self) -> Option<&'static str> {
        consts::filetype_name(self.filetype)
    }

    pub fn cpu_name(&self) -> Option<&'static str> {
        consts::cpu_name(self.cputype)
    }

    pub fn flag_names(&self) -> Vec<&'static str> {
        consts::flag_names(self.flags)
    }
}

// Apple tools write fat records big-endian; `order` covers the swapped form too.
impl FatHeader {
    pub const SIZE: usize = std::mem::size_of::<FatHeader>();

    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, HeaderError> {
        ensure_len(bytes, Self::SIZE)?;
        let [magic, nfat_arch] = order.read_words::<2>(bytes);
        Ok(FatHeader { magic, nfat_arch })
    }
}

impl FatArch {
    pub const SIZE: usize = std::mem::size_of::<FatArch>();

    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, HeaderError> {
        ensure_len(bytes, Self::SIZE)?;
        let [cputype, cpusubtype, offset, size, align] = order.read_words::<5>(bytes);
        Ok(FatArch {
            cputype: cputype as i32,
            cpusubtype: cpusubtype as i32,
            offset,
            size,
            align,
        })
    }
}
