//! Fiscal printer protocol driver.
//!
//! Framed command packets over a serial-to-TCP bridge, a field-level wire
//! codec, status word classification and a single-command-in-flight
//! execution engine.

pub mod commands;
pub mod driver;
pub mod fields;
pub mod packet;
pub mod status;
pub mod transport;

#[cfg(test)]
mod tests;

// Re-export public API
pub use commands::{CommandSet, GeneralConfiguration, LineItem, ModelProfile};
pub use driver::{DriverEvents, FiscalDriver};
pub use packet::Packet;
pub use status::{classify, Condition, Severity, StatusReport, StatusSnapshot};
pub use transport::{TcpTransport, Transport};
