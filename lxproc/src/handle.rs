use std::fmt;

use crate::{
    error::{Error, Result},
    introspect::Introspect,
};

/// A typed reference to a kernel object living in target memory.
///
/// Handles are plain `(address, type)` pairs and own nothing. Two handles are
/// equal only when they name the same object: equal contents at different
/// addresses never compare equal.
#[derive(Clone, Copy)]
pub struct Handle<'a> {
    target: &'a dyn Introspect,
    addr: u64,
    ty: &'static str,
}

impl<'a> Handle<'a> {
    pub fn new(target: &'a dyn Introspect, addr: u64, ty: &'static str) -> Self {
        Self { target, addr, ty }
    }

    /// The object stored at the address of the kernel symbol `name`.
    pub fn symbol(target: &'a dyn Introspect, name: &str, ty: &'static str) -> Result<Self> {
        Ok(Self::new(target, target.symbol(name)?, ty))
    }

    pub fn addr(&self) -> u64 {
        self.addr
    }

    pub fn target(&self) -> &'a dyn Introspect {
        self.target
    }

    pub fn field_addr(&self, field: &str) -> Result<u64> {
        Ok(self
            .addr
            .wrapping_add(self.target.field_offset(self.ty, field)?))
    }

    pub fn read_u64(&self, field: &str) -> Result<u64> {
        self.target.read_u64(self.field_addr(field)?)
    }

    pub fn read_u32(&self, field: &str) -> Result<u32> {
        self.target.read_u32(self.field_addr(field)?)
    }

    pub fn read_i32(&self, field: &str) -> Result<i32> {
        Ok(self.read_u32(field)? as i32)
    }

    /// A struct embedded by value in this one.
    pub fn embedded(&self, field: &str, ty: &'static str) -> Result<Handle<'a>> {
        Ok(Self::new(self.target, self.field_addr(field)?, ty))
    }

    /// Follows a pointer field; `None` when it is null.
    pub fn deref(&self, field: &str, ty: &'static str) -> Result<Option<Handle<'a>>> {
        let ptr = self.read_u64(field)?;
        Ok((ptr != 0).then(|| Self::new(self.target, ptr, ty)))
    }

    /// Follows a pointer field that the kernel never leaves null.
    pub fn deref_nonnull(&self, field: &str, ty: &'static str) -> Result<Handle<'a>> {
        self.deref(field, ty)?
            .ok_or_else(|| Error::null_pointer(self.ty, field))
    }

    /// Reads the string a `char *` field points to.
    pub fn string(&self, field: &str) -> Result<String> {
        let ptr = self.read_u64(field)?;
        if ptr == 0 {
            return Err(Error::null_pointer(self.ty, field));
        }
        self.target.read_cstr(ptr)
    }

    /// Reads a string stored inline in a `char []` field.
    pub fn inline_string(&self, field: &str) -> Result<String> {
        self.target.read_cstr(self.field_addr(field)?)
    }
}

impl PartialEq for Handle<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr && self.ty == other.ty
    }
}

impl Eq for Handle<'_> {}

impl fmt::Debug for Handle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} *){:#x}", self.ty, self.addr)
    }
}
