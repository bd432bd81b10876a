use std::{fmt, io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid pid argument {0:?}")]
    InvalidPid(String),

    #[error("no symbol named `{0}`")]
    UnknownSymbol(String),
    #[error("no such process: {0}")]
    NoSuchProcess(i32),
    #[error("process {0} has no mount namespace")]
    NoNamespace(i32),
    #[error("no layout entry for `{ty}.{field}`")]
    UnknownField { ty: String, field: String },

    #[error("cannot read {len} bytes at {addr:#x}")]
    Unreadable { addr: u64, len: usize },
    #[error("null pointer in `{ty}.{field}`")]
    NullPointer { ty: String, field: String },
    #[error("string at {0:#x} is not valid UTF-8")]
    NotText(u64),
    #[error("string at {addr:#x} is not terminated within {max} bytes")]
    StringTooLong { addr: u64, max: usize },
    #[error("list at {head:#x} is corrupted at {at:#x}")]
    CorruptList { head: u64, at: u64 },

    #[error("failed to write report output")]
    Output(#[from] fmt::Error),

    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{}: {source}", .path.display())]
    Object { path: PathBuf, source: object::Error },
    #[error("{}:{line}: {msg}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        msg: String,
    },
}

impl Error {
    pub(crate) fn unknown_field(ty: &str, field: &str) -> Self {
        Self::UnknownField {
            ty: ty.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn null_pointer(ty: &str, field: &str) -> Self {
        Self::NullPointer {
            ty: ty.to_string(),
            field: field.to_string(),
        }
    }
}
