pub mod config;
pub mod debugger;
pub mod error;
pub mod handle;
pub mod image;
pub mod introspect;
pub mod lists;
pub mod reports;
pub mod tasks;
pub mod util;

pub use error::{Error, Result};
