//! Error types and handling.

use thiserror::Error;

use crate::fiscal::packet::Packet;
use crate::fiscal::status::StatusReport;

/// Driver-wide error type.
///
/// `Io` and `ResponseFormat` are both I/O-class: after either, the physical
/// device state is unknown and the caller must not blindly re-drive a
/// state-mutating command.
#[derive(Error, Debug)]
pub enum FiscalError {
    /// A domain value cannot be represented in its field's declared shape.
    /// Raised at packet-build time, before any I/O.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Send/receive failure at the byte level. Carries the original command
    /// and whatever partial response exists.
    #[error("Device I/O error: {message}")]
    Io {
        message: String,
        request: Option<Box<Packet>>,
        response: Option<Box<Packet>>,
    },

    /// A response was received but could not be parsed into its status words
    /// or declared fields.
    #[error("Response format error: {message}")]
    ResponseFormat {
        message: String,
        request: Option<Box<Packet>>,
    },

    /// The response parsed correctly but at least one error-severity
    /// condition bit is active. Carries the full classified set.
    #[error("Device status error: {}", .report.error_keys().join(", "))]
    Status {
        report: StatusReport,
        request: Box<Packet>,
        response: Box<Packet>,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type alias for FiscalError.
pub type Result<T> = std::result::Result<T, FiscalError>;

impl FiscalError {
    /// Create an encoding error with message.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a transport I/O error without packet context.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io {
            message: msg.into(),
            request: None,
            response: None,
        }
    }

    /// Create a response-format error without packet context.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::ResponseFormat {
            message: msg.into(),
            request: None,
        }
    }

    /// True for transport and response-format errors: device state is
    /// unknown and retrying a state-mutating command is unsafe.
    pub fn is_io_class(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::ResponseFormat { .. })
    }
}
