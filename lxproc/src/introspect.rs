use std::slice;

use log::debug;

use crate::error::{Error, Result};

/// Longest string the reports will materialize from target memory.
pub const MAX_STRING_LEN: usize = 4096;

const STRING_CHUNK: u64 = 64;

/// Read-only access to a kernel's memory, symbols and struct layout.
///
/// Everything the reports know about the inspected kernel goes through this
/// trait; nothing in the reports dereferences host pointers.
pub trait Introspect {
    fn read_memory(&self, addr: u64, buf: &mut [u8]) -> Result<()>;

    fn symbol(&self, name: &str) -> Result<u64>;

    fn field_offset(&self, ty: &str, field: &str) -> Result<u64>;

    fn read_u64(&self, addr: u64) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_memory(addr, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_u32(&self, addr: u64) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_memory(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads a NUL-terminated string starting at `addr`.
    ///
    /// Reads go in 64-byte aligned chunks; a chunk that runs off the end of
    /// the mapped memory is retried a byte at a time up to the NUL.
    fn read_cstr(&self, addr: u64) -> Result<String> {
        debug!("read_cstr(addr: {addr:#x})");

        let mut bytes = Vec::new();
        let mut cursor = addr;
        while bytes.len() < MAX_STRING_LEN {
            let len = STRING_CHUNK - cursor % STRING_CHUNK;
            let mut chunk = [0u8; STRING_CHUNK as usize];
            let chunk = &mut chunk[..len as usize];
            if self.read_memory(cursor, chunk).is_err() {
                for (i, byte) in chunk.iter_mut().enumerate() {
                    self.read_memory(cursor + i as u64, slice::from_mut(byte))?;
                    if *byte == 0 {
                        break;
                    }
                }
            }

            if let Some(nul) = chunk.iter().position(|&b| b == 0) {
                bytes.extend_from_slice(&chunk[..nul]);
                return String::from_utf8(bytes).map_err(|_| Error::NotText(addr));
            }
            bytes.extend_from_slice(chunk);
            cursor += len;
        }

        Err(Error::StringTooLong {
            addr,
            max: MAX_STRING_LEN,
        })
    }
}
