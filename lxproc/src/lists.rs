use log::debug;

use crate::{
    error::{Error, Result},
    handle::Handle,
    introspect::Introspect,
};

/// Iterates the entries of a kernel `list_head` list, in list order.
///
/// `head` is the list head itself, `entry_ty` the type of the structs on the
/// list and `link` the name of their embedded `list_head` field. The head is
/// not an entry and is never yielded.
pub fn list_for_each_entry<'a>(
    head: Handle<'a>,
    entry_ty: &'static str,
    link: &str,
) -> Result<ListIter<'a>> {
    let target = head.target();
    let next_offset = target.field_offset("list_head", "next")?;
    let link_offset = target.field_offset(entry_ty, link)?;
    let first = target.read_u64(head.addr().wrapping_add(next_offset))?;
    debug!("list_for_each_entry(head: {head:?}, entry: {entry_ty}.{link})");

    Ok(ListIter {
        target,
        head: head.addr(),
        cursor: first,
        next_offset,
        link_offset,
        entry_ty,
        done: false,
    })
}

pub struct ListIter<'a> {
    target: &'a dyn Introspect,
    head: u64,
    cursor: u64,
    next_offset: u64,
    link_offset: u64,
    entry_ty: &'static str,
    done: bool,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<Handle<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor == self.head {
            self.done = true;
            return None;
        }
        if self.cursor == 0 {
            self.done = true;
            return Some(Err(Error::CorruptList {
                head: self.head,
                at: self.cursor,
            }));
        }

        let node = self.cursor;
        match self.target.read_u64(node.wrapping_add(self.next_offset)) {
            Ok(next) => self.cursor = next,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        }
        Some(Ok(Handle::new(
            self.target,
            node.wrapping_sub(self.link_offset),
            self.entry_ty,
        )))
    }
}
