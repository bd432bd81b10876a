//! Struct field offsets for the inspected kernel build.
//!
//! A layout file holds one `<type>.<field> <offset>` entry per line, with `#`
//! starting a comment. `<field>` may be a dotted path into an embedded struct,
//! and offsets are decimal or `0x`-prefixed hex:
//!
//! ```text
//! # struct resource
//! resource.start    0x0
//! resource.end      0x8
//! dentry.d_name.name 0x28
//! ```
//!
//! `pahole -C <struct> vmlinux` prints the numbers needed.

use std::{collections::HashMap, fs, path::Path};

use log::debug;

use crate::{
    error::{Error, Result},
    util::parse_addr,
};

#[derive(Debug, Default)]
pub struct Layout {
    fields: HashMap<String, HashMap<String, u64>>,
}

impl Layout {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let mut layout = Self::default();

        for (idx, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let parse_err = |msg: String| Error::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                msg,
            };

            let parts = line.split_whitespace().collect::<Vec<_>>();
            let [key, offset] = parts[..] else {
                return Err(parse_err(format!(
                    "expected `<type>.<field> <offset>`, got {line:?}"
                )));
            };
            let Some((ty, field)) = key.split_once('.') else {
                return Err(parse_err(format!("{key:?} does not name a field")));
            };
            let offset = parse_offset(offset)
                .ok_or_else(|| parse_err(format!("bad offset {offset:?}")))?;

            layout.insert(ty, field, offset);
        }

        debug!("loaded {} struct layouts from {}", layout.fields.len(), path.display());
        Ok(layout)
    }

    pub fn insert(&mut self, ty: &str, field: &str, offset: u64) {
        self.fields
            .entry(ty.to_string())
            .or_default()
            .insert(field.to_string(), offset);
    }

    pub fn offset(&self, ty: &str, field: &str) -> Option<u64> {
        self.fields.get(ty)?.get(field).copied()
    }
}

fn parse_offset(s: &str) -> Option<u64> {
    if s.starts_with("0x") || s.starts_with("0X") {
        parse_addr(s).ok()
    } else {
        s.parse().ok()
    }
}
