pub const MH_MAGIC_64: u32 = 0xfeedfacf;
pub const MH_CIGAM_64: u32 = 0xcffaedfe;
pub const MH_MAGIC: u32 = 0xfeedface;
pub const MH_CIGAM: u32 = 0xcefaedfe;
pub const FAT_MAGIC: u32 = 0xcafebabe;
pub const FAT_CIGAM: u32 = 0xbebafeca;

pub const MH_OBJECT: u32 = 0x1;
pub const MH_EXECUTE: u32 = 0x2;
pub const MH_FVMLIB: u32 = 0x3;
pub const MH_CORE: u32 = 0x4;
pub const MH_PRELOAD: u32 = 0x5;
pub const MH_DYLIB: u32 = 0x6;
pub const MH_DYLINKER: u32 = 0x7;
pub const MH_BUNDLE: u32 = 0x8;
pub const MH_DYLIB_STUB: u32 = 0x9;
pub const MH_DSYM: u32 = 0xa;
pub const MH_KEXT_BUNDLE: u32 = 0xb;
pub const MH_FILESET: u32 = 0xc;

pub const CPU_ARCH_ABI64: i32 = 0x0100_0000;
pub const CPU_ARCH_ABI64_32: i32 = 0x0200_0000;

pub const CPU_TYPE_X86: i32 = 7;
pub const CPU_TYPE_X86_64: i32 = CPU_TYPE_X86 | CPU_ARCH_ABI64;
pub const CPU_TYPE_ARM: i32 = 12;
pub const CPU_TYPE_ARM64: i32 = CPU_TYPE_ARM | CPU_ARCH_ABI64;
pub const CPU_TYPE_ARM64_32: i32 = CPU_TYPE_ARM | CPU_ARCH_ABI64_32;
pub const CPU_TYPE_POWERPC: i32 = 18;
pub const CPU_TYPE_POWERPC64: i32 = CPU_TYPE_POWERPC | CPU_ARCH_ABI64;

pub const MH_NOUNDEFS: u32 = 0x1;
pub const MH_INCRLINK: u32 = 0x2;
pub const MH_DYLDLINK: u32 = 0x4;
pub const MH_BINDATLOAD: u32 = 0x8;
pub const MH_PREBOUND: u32 = 0x10;
pub const MH_SPLIT_SEGS: u32 = 0x20;
pub const MH_TWOLEVEL: u32 = 0x80;
pub const MH_FORCE_FLAT: u32 = 0x100;
pub const MH_WEAK_DEFINES: u32 = 0x8000;
pub const MH_BINDS_TO_WEAK: u32 = 0x10000;
pub const MH_ALLOW_STACK_EXECUTION: u32 = 0x20000;
pub const MH_PIE: u32 = 0x200000;
pub const MH_HAS_TLV_DESCRIPTORS: u32 = 0x800000;
pub const MH_NO_HEAP_EXECUTION: u32 = 0x1000000;
pub const MH_APP_EXTENSION_SAFE: u32 = 0x2000000;
pub const MH_DYLIB_IN_CACHE: u32 = 0x80000000;

const FLAG_NAMES: &[(u32, &str)] = &[
    (MH_NOUNDEFS, "NOUNDEFS"),
    (MH_INCRLINK, "INCRLINK"),
    (MH_DYLDLINK, "DYLDLINK"),
    (MH_BINDATLOAD, "BINDATLOAD"),
    (MH_PREBOUND, "PREBOUND"),
    (MH_SPLIT_SEGS, "SPLIT_SEGS"),
    (MH_TWOLEVEL, "TWOLEVEL"),
    (MH_FORCE_FLAT, "FORCE_FLAT"),
    (MH_WEAK_DEFINES, "WEAK_DEFINES"),
    (MH_BINDS_TO_WEAK, "BINDS_TO_WEAK"),
    (MH_ALLOW_STACK_EXECUTION, "ALLOW_STACK_EXECUTION"),
    (MH_PIE, "PIE"),
    (MH_HAS_TLV_DESCRIPTORS, "HAS_TLV_DESCRIPTORS"),
    (MH_NO_HEAP_EXECUTION, "NO_HEAP_EXECUTION"),
    (MH_APP_EXTENSION_SAFE, "APP_EXTENSION_SAFE"),
    (MH_DYLIB_IN_CACHE, "DYLIB_IN_CACHE"),
];

pub fn filetype_name(filetype: u32) -> Option<&'static str> {
    let name = match filetype {
        MH_OBJECT => "object",
        MH_EXECUTE => "execute",
        MH_FVMLIB => "fvmlib",
        MH_CORE => "core",
        MH_PRELOAD => "preload",
        MH_DYLIB => "dylib",
        MH_DYLINKER => "dylinker",
        MH_BUNDLE => "bundle",
        MH_DYLIB_STUB => "dylib_stub",
        MH_DSYM => "dsym",
        MH_KEXT_BUNDLE => "kext_bundle",
        MH_FILESET => "fileset",
        _ => return None,
    };
    Some(name)
}

pub fn cpu_name(cputype: i32) -> Option<&'static str> {
    let name = match cputype {
        CPU_TYPE_X86 => "i386",
        CPU_TYPE_X86_64 => "x86_64",
        CPU_TYPE_ARM => "arm",
        CPU_TYPE_ARM64 => "arm64",
        CPU_TYPE_ARM64_32 => "arm64_32",
        CPU_TYPE_POWERPC => "ppc",
        CPU_TYPE_POWERPC64 => "ppc64",
        _ => return None,
    };
    Some(name)
}

/// Names of the set bits in `flags`. Unnamed bits are skipped.
pub fn flag_names(flags: u32) -> Vec<&'static str> {
    FLAG_NAMES
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|&(_, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_types_match_known_literals() {
        // values insert_dylib matches on for fat slices
        assert_eq!(CPU_TYPE_X86_64, 0x1000007);
        assert_eq!(CPU_TYPE_ARM64, 0x100000c);
    }

    #[test]
    fn names() {
        assert_eq!(filetype_name(MH_EXECUTE), Some("execute"));
        assert_eq!(filetype_name(0x42), None);
        assert_eq!(cpu_name(CPU_TYPE_ARM64), Some("arm64"));
        assert_eq!(cpu_name(-1), None);
    }

    #[test]
    fn flags_in_bit_order() {
        let flags = MH_PIE | MH_NOUNDEFS | MH_TWOLEVEL | 0x4000_0000;
        assert_eq!(flag_names(flags), vec!["NOUNDEFS", "TWOLEVEL", "PIE"]);
        assert!(flag_names(0).is_empty());
    }
}
