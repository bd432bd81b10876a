pub mod layout;
pub mod memory;
pub mod symbols;

use log::debug;

use crate::{
    error::{Error, Result},
    image::{layout::Layout, memory::Memory, symbols::SymbolTable},
    introspect::Introspect,
};

/// A kernel memory image together with the symbol table and struct layout of
/// the kernel build it came from.
#[derive(Debug)]
pub struct KernelImage {
    memory: Memory,
    symbols: SymbolTable,
    layout: Layout,
}

impl KernelImage {
    pub fn new(memory: Memory, symbols: SymbolTable, layout: Layout) -> Self {
        Self {
            memory,
            symbols,
            layout,
        }
    }

    /// Like `read_memory`, but stops at the end of the segment holding
    /// `addr` and returns the number of bytes read.
    pub fn read_prefix(&self, addr: u64, buf: &mut [u8]) -> Result<usize> {
        debug!("read_prefix(addr: {addr:#x}, size: {:#x})", buf.len());
        self.memory.read_prefix(addr, buf)
    }
}

impl Introspect for KernelImage {
    fn read_memory(&self, addr: u64, buf: &mut [u8]) -> Result<()> {
        debug!("read_memory(addr: {addr:#x}, size: {:#x})", buf.len());
        self.memory.read(addr, buf)
    }

    fn symbol(&self, name: &str) -> Result<u64> {
        self.symbols
            .get(name)
            .ok_or_else(|| Error::UnknownSymbol(name.to_string()))
    }

    fn field_offset(&self, ty: &str, field: &str) -> Result<u64> {
        self.layout
            .offset(ty, field)
            .ok_or_else(|| Error::unknown_field(ty, field))
    }
}
