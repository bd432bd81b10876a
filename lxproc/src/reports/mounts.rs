use std::fmt::Write;

use log::debug;
use lxproc_common::{FS_INFO, MNT_INFO, access_mode, flag_suffixes};

use crate::{
    error::{Error, Result},
    handle::Handle,
    introspect::Introspect,
    lists::list_for_each_entry,
    tasks::task_by_pid,
};

pub const DEFAULT_PID: i32 = 1;

/// Parses the optional pid argument of `report-mounts`.
pub fn parse_pid(arg: Option<&str>) -> Result<i32> {
    match arg {
        None => Ok(DEFAULT_PID),
        Some(arg) => arg
            .trim()
            .parse()
            .map_err(|_| Error::InvalidPid(arg.to_string())),
    }
}

/// Prints the mount table of `pid`'s mount namespace as `/proc/mounts` does.
pub fn report_mounts(target: &dyn Introspect, pid: i32, out: &mut dyn Write) -> Result<()> {
    let task = task_by_pid(target, pid)?;
    let namespace = match task.deref("nsproxy", "nsproxy")? {
        Some(nsproxy) => nsproxy.deref("mnt_ns", "mnt_namespace")?,
        None => None,
    }
    .ok_or(Error::NoNamespace(pid))?;
    debug!("report_mounts(pid: {pid}, namespace: {namespace:?})");

    let mounts = list_for_each_entry(namespace.embedded("list", "list_head")?, "mount", "mnt_list")?;
    for mount in mounts {
        writeln!(out, "{}", mount_line(mount?)?)?;
    }
    Ok(())
}

/// One `/proc/mounts` line for a `struct mount`, without the newline.
pub fn mount_line(mount: Handle<'_>) -> Result<String> {
    let devname = mount.string("mnt_devname")?;
    let devname = if devname.is_empty() { "none" } else { &devname };

    let pathname = mount_path(mount)?;

    let vfsmount = mount.embedded("mnt", "vfsmount")?;
    let superblock = vfsmount.deref_nonnull("mnt_sb", "super_block")?;
    let fstype = superblock
        .deref_nonnull("s_type", "file_system_type")?
        .string("name")?;
    let s_flags = superblock.read_u64("s_flags")?;
    let m_flags = u64::from(vfsmount.read_u32("mnt_flags")?);

    let mut line = format!("{devname} {pathname} {fstype} {}", access_mode(s_flags));
    line.extend(flag_suffixes(FS_INFO, s_flags));
    line.extend(flag_suffixes(MNT_INFO, m_flags));
    line.push_str(" 0 0");
    Ok(line)
}

/// Absolute path of a mount, built by prepending each mountpoint name while
/// climbing `mnt_parent` up to the namespace root, which is its own parent.
pub fn mount_path(mount: Handle<'_>) -> Result<String> {
    let mut pathname = String::new();
    let mut mount = mount;
    loop {
        let mountpoint = mount.deref_nonnull("mnt_mountpoint", "dentry")?;
        pathname.insert_str(0, &dentry_name(mountpoint)?);

        let parent = mount.deref_nonnull("mnt_parent", "mount")?;
        if parent == mount {
            break;
        }
        mount = parent;
    }

    if pathname.is_empty() {
        pathname.push('/');
    }
    Ok(pathname)
}

/// Path of a dentry relative to the root of its filesystem; empty for the
/// root dentry itself.
pub fn dentry_name(dentry: Handle<'_>) -> Result<String> {
    let mut components = Vec::new();
    let mut dentry = dentry;
    while let Some(parent) = dentry.deref("d_parent", "dentry")? {
        if parent == dentry {
            break;
        }
        components.push(dentry.string("d_name.name")?);
        dentry = parent;
    }

    Ok(components
        .iter()
        .rev()
        .fold(String::new(), |path, name| path + "/" + name))
}
