//! Command execution engine.
//!
//! `FiscalDriver` owns the transport, the sequence counter and the last
//! known status snapshot, and drives each command through a fixed pipeline:
//! frame, exchange, parse, classify, then succeed or fail on the classified
//! report. `&mut self` on [`FiscalDriver::execute`] keeps one command in
//! flight at a time; there are no retries.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::commands::{CommandSet, ModelProfile};
use super::packet::{Packet, SEQ_MAX, SEQ_MIN};
use super::status::{classify, StatusReport, StatusSnapshot};
use super::transport::Transport;
use crate::config::DriverConfig;
use crate::error::{FiscalError, Result};

/// Observer hooks fired during execution. Default bodies are empty so
/// implementors override only what they need.
pub trait DriverEvents: Send {
    /// Fired when a response's snapshot differs bitwise from the previous
    /// one, before the success/failure decision for that command.
    fn on_status_changed(&mut self, _request: &Packet, _response: &Packet) {}

    /// Fired after a command completed without error-severity conditions.
    fn on_command_executed(&mut self, _request: &Packet, _response: &Packet) {}
}

/// Protocol driver for one fiscal device.
pub struct FiscalDriver<T: Transport> {
    transport: T,
    commands: CommandSet,
    seq: u8,
    snapshot: StatusSnapshot,
    report: StatusReport,
    last_request: Option<Packet>,
    last_response: Option<Packet>,
    events: Option<Box<dyn DriverEvents>>,
    rollover_year: i32,
}

impl<T: Transport> FiscalDriver<T> {
    pub fn new(transport: T, config: &DriverConfig) -> Self {
        Self {
            transport,
            commands: CommandSet::new(ModelProfile::for_model(&config.device.model)),
            seq: SEQ_MIN,
            snapshot: StatusSnapshot::default(),
            report: StatusReport::default(),
            last_request: None,
            last_response: None,
            events: None,
            rollover_year: config.device.rollover_year,
        }
    }

    /// The command catalog for this device's model profile.
    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn set_events(&mut self, events: Box<dyn DriverEvents>) {
        self.events = Some(events);
    }

    /// Last snapshot parsed from a device response.
    pub fn snapshot(&self) -> StatusSnapshot {
        self.snapshot
    }

    /// Classified report for the last snapshot.
    pub fn status_report(&self) -> &StatusReport {
        &self.report
    }

    /// True when any paper source was exhausted in the last response.
    pub fn paper_out(&self) -> bool {
        self.report.paper_out()
    }

    pub fn last_request(&self) -> Option<&Packet> {
        self.last_request.as_ref()
    }

    pub fn last_response(&self) -> Option<&Packet> {
        self.last_response.as_ref()
    }

    /// Decode a two-digit-year date from a response field using this
    /// device's rollover base year.
    pub fn decode_date(&self, response: &Packet, pos: usize) -> Result<NaiveDate> {
        response.get_date(pos, self.rollover_year)
    }

    fn next_seq(&mut self) -> u8 {
        let seq = self.seq;
        self.seq = if seq >= SEQ_MAX { SEQ_MIN } else { seq + 1 };
        seq
    }

    /// Execute one command end to end.
    ///
    /// The snapshot and report update from every parseable response, also
    /// when the command then fails on status; status-change notification
    /// fires before the success/failure decision. Transport failures and
    /// unparseable responses leave the previous snapshot in place.
    pub async fn execute(&mut self, command: Packet) -> Result<Packet> {
        self.last_request = Some(command.clone());
        self.last_response = None;

        let seq = self.next_seq();
        let frame = command.to_frame(seq);
        debug!(command = format_args!("0x{:02X}", command.command()), seq, "executing");

        let raw = self.transport.execute(&frame).await.map_err(|e| FiscalError::Io {
            message: e.to_string(),
            request: Some(Box::new(command.clone())),
            response: None,
        })?;

        let (_, response) = Packet::from_frame(&raw).map_err(|e| attach_request(e, &command))?;
        self.last_response = Some(response.clone());

        let printer = response.printer_status().map_err(|e| attach_request(e, &command))?;
        let fiscal = response.fiscal_status().map_err(|e| attach_request(e, &command))?;

        let snapshot = StatusSnapshot::new(printer, fiscal);
        let changed = snapshot != self.snapshot;
        self.snapshot = snapshot;
        self.report = classify(snapshot);

        if changed {
            debug!(printer = format_args!("0x{printer:04X}"), fiscal = format_args!("0x{fiscal:04X}"), "status changed");
            if let Some(events) = self.events.as_mut() {
                events.on_status_changed(&command, &response);
            }
        }

        if self.report.has_errors() {
            warn!(errors = ?self.report.error_keys(), "command rejected by device");
            return Err(FiscalError::Status {
                report: self.report.clone(),
                request: Box::new(command),
                response: Box::new(response),
            });
        }

        if let Some(events) = self.events.as_mut() {
            events.on_command_executed(&command, &response);
        }
        Ok(response)
    }

    /// Status poll: refreshes the snapshot without printing anything.
    pub async fn request_status(&mut self) -> Result<Packet> {
        let command = self.commands.status_request();
        self.execute(command).await
    }

    #[cfg(test)]
    pub(crate) fn seq_for_test(&self) -> u8 {
        self.seq
    }

    #[cfg(test)]
    pub(crate) fn transport_for_test(&self) -> &T {
        &self.transport
    }
}

/// Response-format errors gain the request for context; other kinds pass
/// through unchanged.
fn attach_request(err: FiscalError, request: &Packet) -> FiscalError {
    match err {
        FiscalError::ResponseFormat { message, .. } => FiscalError::ResponseFormat {
            message,
            request: Some(Box::new(request.clone())),
        },
        other => other,
    }
}
