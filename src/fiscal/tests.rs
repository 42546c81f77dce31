//! Driver pipeline tests against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::driver::{DriverEvents, FiscalDriver};
use super::packet::{Packet, SEQ_MAX, SEQ_MIN};
use super::status::StatusSnapshot;
use super::transport::Transport;
use crate::config::DriverConfig;
use crate::error::FiscalError;

/// Replays scripted response frames and records every frame sent.
struct MockTransport {
    responses: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTransport {
    fn new(responses: Vec<Vec<u8>>) -> Self {
        Self {
            responses: responses.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&mut self, frame: &[u8]) -> std::io::Result<Vec<u8>> {
        self.sent.lock().unwrap().push(frame.to_vec());
        self.responses
            .pop_front()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "no scripted response"))
    }
}

/// A well-formed response frame carrying the two status words.
fn response_frame(command: u8, printer: u16, fiscal: u16) -> Vec<u8> {
    let mut p = Packet::new(command);
    p.set_field(1, format!("{printer:04X}"));
    p.set_field(2, format!("{fiscal:04X}"));
    p.to_frame(SEQ_MIN)
}

fn driver_with(responses: Vec<Vec<u8>>) -> FiscalDriver<MockTransport> {
    FiscalDriver::new(MockTransport::new(responses), &DriverConfig::default())
}

#[derive(Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl DriverEvents for Recorder {
    fn on_status_changed(&mut self, _request: &Packet, response: &Packet) {
        let printer = response.printer_status().unwrap();
        let fiscal = response.fiscal_status().unwrap();
        self.log.lock().unwrap().push(format!("changed {printer:04X}/{fiscal:04X}"));
    }

    fn on_command_executed(&mut self, request: &Packet, _response: &Packet) {
        self.log.lock().unwrap().push(format!("executed {:02X}", request.command()));
    }
}

#[tokio::test]
async fn test_successful_command_updates_snapshot() {
    let mut driver = driver_with(vec![response_frame(0x2A, 0x0080, 0x0600)]);

    let response = driver.request_status().await.unwrap();
    assert_eq!(response.command(), 0x2A);
    assert_eq!(driver.snapshot(), StatusSnapshot::new(0x0080, 0x0600));
    assert!(!driver.status_report().has_errors());
    assert!(driver.last_request().is_some());
    assert!(driver.last_response().is_some());
}

#[tokio::test]
async fn test_error_bit_fails_command_but_keeps_snapshot() {
    // Printer fault + ticket paper out.
    let mut driver = driver_with(vec![response_frame(0x2A, 0x4004, 0x0000)]);

    let err = driver.request_status().await.unwrap_err();
    match err {
        FiscalError::Status { report, .. } => {
            assert!(report.has_errors());
            assert!(report.paper_out());
        }
        other => panic!("expected status error, got {other:?}"),
    }

    // Snapshot still reflects the failed response.
    assert_eq!(driver.snapshot(), StatusSnapshot::new(0x4004, 0x0000));
    assert!(driver.paper_out());
}

#[tokio::test]
async fn test_warnings_only_still_succeeds() {
    let mut driver = driver_with(vec![response_frame(0x2A, 0x0020, 0x0100)]);
    assert!(driver.request_status().await.is_ok());
    assert_eq!(driver.status_report().warnings().count(), 2);
}

#[tokio::test]
async fn test_transport_failure_is_io_error_with_request() {
    let mut driver = driver_with(vec![]);

    let err = driver.request_status().await.unwrap_err();
    match err {
        FiscalError::Io { request, response, .. } => {
            assert_eq!(request.unwrap().command(), 0x2A);
            assert!(response.is_none());
        }
        other => panic!("expected io error, got {other:?}"),
    }
    assert!(driver.last_response().is_none());
}

#[tokio::test]
async fn test_corrupt_response_is_format_error() {
    let mut frame = response_frame(0x2A, 0x0000, 0x0000);
    let last = frame.len() - 1;
    frame[last] ^= 0x01;
    let mut driver = driver_with(vec![frame]);

    let err = driver.request_status().await.unwrap_err();
    assert!(matches!(err, FiscalError::ResponseFormat { .. }));
    // Unparseable response leaves the previous snapshot in place.
    assert_eq!(driver.snapshot(), StatusSnapshot::default());
}

#[tokio::test]
async fn test_no_notifications_on_format_error() {
    let mut frame = response_frame(0x2A, 0x0000, 0x0000);
    let last = frame.len() - 1;
    frame[last] ^= 0x01;
    let mut driver = driver_with(vec![frame]);
    let recorder = Recorder::default();
    let log = Arc::clone(&recorder.log);
    driver.set_events(Box::new(recorder));

    let err = driver.request_status().await.unwrap_err();
    assert!(err.is_io_class());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_status_words_is_format_error() {
    let mut driver = driver_with(vec![Packet::new(0x2A).to_frame(SEQ_MIN)]);
    let err = driver.request_status().await.unwrap_err();
    assert!(err.is_io_class());
}

#[tokio::test]
async fn test_status_change_fires_before_failure_decision() {
    let mut driver = driver_with(vec![
        response_frame(0x2A, 0x0000, 0x0000),
        response_frame(0x2A, 0x4004, 0x0000),
        response_frame(0x2A, 0x4004, 0x0000),
    ]);
    let recorder = Recorder::default();
    let log = Arc::clone(&recorder.log);
    driver.set_events(Box::new(recorder));

    // Clean response: no change from the all-zero initial snapshot, so only
    // the execution notification fires.
    driver.request_status().await.unwrap();
    assert_eq!(log.lock().unwrap().as_slice(), ["executed 2A"]);

    // Error response: change notification fires even though the command
    // fails, and no execution notification follows.
    assert!(driver.request_status().await.is_err());
    assert_eq!(log.lock().unwrap().as_slice(), ["executed 2A", "changed 4004/0000"]);

    // Same snapshot again: no second change notification.
    assert!(driver.request_status().await.is_err());
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_sequence_wraps() {
    let frames: Vec<Vec<u8>> = (0..(SEQ_MAX - SEQ_MIN) as usize + 1)
        .map(|_| response_frame(0x2A, 0x0000, 0x0000))
        .collect();
    let count = frames.len();
    let mut driver = driver_with(frames);

    for _ in 0..count {
        driver.request_status().await.unwrap();
    }
    // 0x20..=0x7F exhausted, counter back at the start.
    assert_eq!(driver.seq_for_test(), SEQ_MIN);
}

#[tokio::test]
async fn test_sent_frames_carry_increasing_sequence() {
    let mut driver = driver_with(vec![
        response_frame(0x2A, 0x0000, 0x0000),
        response_frame(0x2A, 0x0000, 0x0000),
    ]);
    let sent = driver_transport_sent(&driver);

    driver.request_status().await.unwrap();
    driver.request_status().await.unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent[0][1], SEQ_MIN);
    assert_eq!(sent[1][1], SEQ_MIN + 1);
}

fn driver_transport_sent(driver: &FiscalDriver<MockTransport>) -> Arc<Mutex<Vec<Vec<u8>>>> {
    Arc::clone(&driver.transport_for_test().sent)
}
