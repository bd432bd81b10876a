use std::fmt::Write;

use log::debug;
use lxproc_common::resource_width;

use crate::{error::Result, handle::Handle, introspect::Introspect};

/// Pre-order walk over the descendants of a `struct resource`.
///
/// Yields `(node, depth)` with the root's first child at depth 0. A node's
/// child and sibling pointers are read only after the node has been yielded,
/// so a read failure surfaces after every earlier node.
pub struct ResourceWalk<'a> {
    stack: Vec<(Handle<'a>, usize)>,
    last: Option<(Handle<'a>, usize)>,
}

impl<'a> ResourceWalk<'a> {
    pub fn new(root: Handle<'a>) -> Result<Self> {
        let stack = root
            .deref("child", "resource")?
            .map(|child| (child, 0))
            .into_iter()
            .collect();
        Ok(Self { stack, last: None })
    }

    fn expand(&mut self, node: Handle<'a>, depth: usize) -> Result<()> {
        if let Some(sibling) = node.deref("sibling", "resource")? {
            self.stack.push((sibling, depth));
        }
        if let Some(child) = node.deref("child", "resource")? {
            self.stack.push((child, depth + 1));
        }
        Ok(())
    }
}

impl<'a> Iterator for ResourceWalk<'a> {
    type Item = Result<(Handle<'a>, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((node, depth)) = self.last.take() {
            if let Err(e) = self.expand(node, depth) {
                self.stack.clear();
                return Some(Err(e));
            }
        }
        let (node, depth) = self.stack.pop()?;
        self.last = Some((node, depth));
        Some(Ok((node, depth)))
    }
}

/// Prints the tree rooted at the `struct resource` symbol `root` the way
/// `/proc/iomem` and `/proc/ioports` do.
pub fn report_resources(target: &dyn Introspect, root: &str, out: &mut dyn Write) -> Result<()> {
    let root = Handle::symbol(target, root, "resource")?;
    let width = resource_width(root.read_u64("end")?);
    debug!("report_resources(root: {root:?}, width: {width})");

    for entry in ResourceWalk::new(root)? {
        let (res, depth) = entry?;
        let start = res.read_u64("start")?;
        let end = res.read_u64("end")?;
        let name = res.string("name")?;
        writeln!(
            out,
            "{:indent$}{start:0width$x}-{end:0width$x} : {name}",
            "",
            indent = depth * 2
        )?;
    }
    Ok(())
}
