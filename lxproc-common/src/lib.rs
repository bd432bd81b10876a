#![no_std]

/// Superblock flags (`super_block.s_flags`).
pub mod ms {
    pub const RDONLY: u64 = 1;
    pub const SYNCHRONOUS: u64 = 16;
    pub const MANDLOCK: u64 = 64;
    pub const DIRSYNC: u64 = 128;
    pub const NOATIME: u64 = 1024;
    pub const NODIRATIME: u64 = 2048;
}

/// Per-mount flags (`vfsmount.mnt_flags`).
pub mod mnt {
    pub const NOSUID: u64 = 0x01;
    pub const NODEV: u64 = 0x02;
    pub const NOEXEC: u64 = 0x04;
    pub const NOATIME: u64 = 0x08;
    pub const NODIRATIME: u64 = 0x10;
    pub const RELATIME: u64 = 0x20;
}

/// Ordered `(mask, suffix)` pairs. Suffixes are emitted in table order, not
/// bit order.
pub type FlagTable = [(u64, &'static str)];

pub const FS_INFO: &FlagTable = &[
    (ms::SYNCHRONOUS, ",sync"),
    (ms::MANDLOCK, ",mand"),
    (ms::DIRSYNC, ",dirsync"),
    (ms::NOATIME, ",noatime"),
    (ms::NODIRATIME, ",nodiratime"),
];

pub const MNT_INFO: &FlagTable = &[
    (mnt::NOSUID, ",nosuid"),
    (mnt::NODEV, ",nodev"),
    (mnt::NOEXEC, ",noexec"),
    (mnt::NOATIME, ",noatime"),
    (mnt::NODIRATIME, ",nodiratime"),
    (mnt::RELATIME, ",relatime"),
];

/// Yields the suffix of every table entry whose mask is set in `flags`.
pub fn flag_suffixes(table: &FlagTable, flags: u64) -> impl Iterator<Item = &'static str> + '_ {
    table
        .iter()
        .filter(move |(mask, _)| flags & mask != 0)
        .map(|(_, suffix)| *suffix)
}

/// `ro` or `rw`, from `MS_RDONLY` alone.
pub fn access_mode(s_flags: u64) -> &'static str {
    if s_flags & ms::RDONLY != 0 { "ro" } else { "rw" }
}

/// Hex digits used for every line of a resource listing, picked from the
/// root's `end`.
pub fn resource_width(root_end: u64) -> usize {
    if root_end < 0x10000 { 4 } else { 8 }
}
