pub mod bk;
pub mod error;
pub mod file;
pub mod graph;

pub use error::{Error, Malformed, Result};
