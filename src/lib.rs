pub mod config;
pub mod error;
pub mod fiscal;

pub use error::{FiscalError, Result};
