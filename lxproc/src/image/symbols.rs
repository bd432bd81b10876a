use std::{collections::HashMap, fs, path::Path};

use log::debug;

use crate::{
    error::{Error, Result},
    util::parse_addr,
};

/// Kernel symbol addresses, as listed by `System.map` or `/proc/kallsyms`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    by_name: HashMap<String, u64>,
}

impl SymbolTable {
    pub fn load(path: impl AsRef<Path>, slide: u64) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text, slide)
    }

    /// `slide` is added to every address (KASLR offset).
    pub fn parse(path: &Path, text: &str, slide: u64) -> Result<Self> {
        let mut table = Self::default();

        for (idx, line) in text.lines().enumerate() {
            // e.g. ffffffff82a0c940 D iomem_resource
            //      ffffffffc0a01000 t vfat_fill_super	[vfat]
            let parts = line.split_whitespace().collect::<Vec<_>>();
            if parts.is_empty() {
                continue;
            }
            if parts.len() < 3 {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    msg: format!("expected `<address> <type> <name>`, got {line:?}"),
                });
            }

            let addr = parse_addr(parts[0]).map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                msg: format!("bad address {:?}: {e}", parts[0]),
            })?;
            table.insert(parts[2], addr.wrapping_add(slide));
        }

        debug!("loaded {} symbols from {}", table.len(), path.display());
        Ok(table)
    }

    /// Keeps the first address seen for a name; later duplicates (static
    /// symbols of the same name) are ignored.
    pub fn insert(&mut self, name: &str, addr: u64) {
        self.by_name.entry(name.to_string()).or_insert(addr);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

