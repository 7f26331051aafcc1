use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct MachHeader64 {
    pub magic: u32,
    pub cputype: i32,
    pub cpusubtype: i32,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
    pub reserved: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FatHeader {
    pub magic: u32,
    pub nfat_arch: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FatArch {
    pub cputype: i32,
    pub cpusubtype: i32,
    pub offset: u32,
    pub size: u32,
    pub align: u32,
}

// The loader hands us this layout; any drift breaks `_mh_execute_header`.
const _: () = assert!(std::mem::size_of::<MachHeader64>() == 32);
const _: () = assert!(std::mem::align_of::<MachHeader64>() == 4);
const _: () = assert!(std::mem::size_of::<FatHeader>() == 8);
const _: () = assert!(std::mem::size_of::<FatArch>() == 20);

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn header_field_offsets() {
        assert_eq!(offset_of!(MachHeader64, magic), 0x00);
        assert_eq!(offset_of!(MachHeader64, cputype), 0x04);
        assert_eq!(offset_of!(MachHeader64, cpusubtype), 0x08);
        assert_eq!(offset_of!(MachHeader64, filetype), 0x0c);
        assert_eq!(offset_of!(MachHeader64, ncmds), 0x10);
        assert_eq!(offset_of!(MachHeader64, sizeofcmds), 0x14);
        assert_eq!(offset_of!(MachHeader64, flags), 0x18);
        assert_eq!(offset_of!(MachHeader64, reserved), 0x1c);
    }

    #[test]
    fn fat_arch_offsets() {
        assert_eq!(offset_of!(FatArch, offset), 0x08);
        assert_eq!(offset_of!(FatArch, align), 0x10);
    }
}
