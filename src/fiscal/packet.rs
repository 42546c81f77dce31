//! Framed command/response packets.
//!
//! Frame layout: `STX | seq | cmd | (FS field)* | ETX | BCC`, where BCC is
//! the 16-bit sum of every byte from STX through ETX inclusive, rendered as
//! 4 uppercase ASCII hex digits. The sequence byte wraps in `0x20..=0x7F`.
//!
//! Responses carry the printer and fiscal status words as fields 1 and 2
//! (4 hex digits each), ahead of any data fields.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::fields;
use crate::error::{FiscalError, Result};

pub const STX: u8 = 0x02;
pub const ETX: u8 = 0x03;
/// Field separator between encoded fields.
pub const FS: u8 = 0x1C;

/// Lowest sequence byte.
pub const SEQ_MIN: u8 = 0x20;
/// Highest sequence byte; the counter wraps back to [`SEQ_MIN`] past it.
pub const SEQ_MAX: u8 = 0x7F;

/// Checksum trailer length (4 ASCII hex digits).
pub const BCC_LEN: usize = 4;
/// STX + seq + cmd + ETX.
const MIN_BODY: usize = 4;

/// One command or one response: a command byte plus an ordered list of
/// encoded field strings. Field order is the operation's on-wire schema;
/// positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    command: u8,
    fields: Vec<String>,
}

impl Packet {
    pub fn new(command: u8) -> Self {
        Self {
            command,
            fields: Vec::new(),
        }
    }

    pub fn command(&self) -> u8 {
        self.command
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field at 1-based position, if present.
    pub fn field(&self, pos: usize) -> Option<&str> {
        if pos == 0 {
            return None;
        }
        self.fields.get(pos - 1).map(String::as_str)
    }

    /// Append/overwrite the field at a 1-based position. Gaps are filled
    /// with empty fields so positions always match the declared schema.
    pub fn set_field(&mut self, pos: usize, value: impl Into<String>) {
        assert!(pos >= 1, "field positions are 1-based");
        if self.fields.len() < pos {
            self.fields.resize(pos, String::new());
        }
        self.fields[pos - 1] = value.into();
    }

    // Typed setters, delegating to the field codec.

    pub fn set_text(&mut self, pos: usize, text: &str, max_len: usize) {
        self.set_field(pos, fields::encode_text(text, max_len));
    }

    /// Optional text: absent value emits the sentinel instead of padding.
    pub fn set_opt_text(&mut self, pos: usize, text: Option<&str>, max_len: usize) {
        match text {
            Some(t) => self.set_text(pos, t, max_len),
            None => self.set_field(pos, fields::ABSENT),
        }
    }

    /// Raw field value, bypassing the codec (fixed schema literals).
    pub fn set_literal(&mut self, pos: usize, value: &str) {
        self.set_field(pos, value);
    }

    pub fn set_number(&mut self, pos: usize, value: Decimal, int_digits: u32, frac_digits: u32) -> Result<()> {
        let encoded = fields::encode_number(value, int_digits, frac_digits)?;
        self.set_field(pos, encoded);
        Ok(())
    }

    pub fn set_opt_number(
        &mut self,
        pos: usize,
        value: Option<Decimal>,
        int_digits: u32,
        frac_digits: u32,
    ) -> Result<()> {
        match value {
            Some(v) => self.set_number(pos, v, int_digits, frac_digits),
            None => {
                self.set_field(pos, fields::ABSENT);
                Ok(())
            }
        }
    }

    pub fn set_amount(&mut self, pos: usize, value: Decimal) -> Result<()> {
        let encoded = fields::encode_amount(value)?;
        self.set_field(pos, encoded);
        Ok(())
    }

    pub fn set_quantity(&mut self, pos: usize, value: Decimal) {
        self.set_field(pos, fields::encode_quantity(value));
    }

    pub fn set_boolean(&mut self, pos: usize, value: bool, true_char: char, false_char: char) {
        self.set_field(pos, fields::encode_boolean(value, true_char, false_char));
    }

    pub fn set_opt_boolean(&mut self, pos: usize, value: Option<bool>, true_char: char, false_char: char) {
        match value {
            Some(v) => self.set_boolean(pos, v, true_char, false_char),
            None => self.set_field(pos, fields::ABSENT),
        }
    }

    pub fn set_date(&mut self, pos: usize, date: NaiveDate) {
        self.set_field(pos, fields::encode_date(date));
    }

    pub fn set_time(&mut self, pos: usize, time: NaiveTime) {
        self.set_field(pos, fields::encode_time(time));
    }

    /// Date and time travel as two separate fields when one operation needs
    /// both.
    pub fn set_date_and_time(&mut self, date_pos: usize, time_pos: usize, value: NaiveDateTime) {
        self.set_date(date_pos, value.date());
        self.set_time(time_pos, value.time());
    }

    pub fn set_long(&mut self, pos: usize, value: u64) {
        self.set_field(pos, fields::encode_long(value));
    }

    pub fn set_opt_long(&mut self, pos: usize, value: Option<u64>) {
        match value {
            Some(v) => self.set_long(pos, v),
            None => self.set_field(pos, fields::ABSENT),
        }
    }

    // Typed getters for response fields.

    fn required_field(&self, pos: usize) -> Result<&str> {
        self.field(pos)
            .ok_or_else(|| FiscalError::format(format!("response is missing field {pos}")))
    }

    pub fn get_text(&self, pos: usize) -> Result<String> {
        Ok(fields::decode_text(self.required_field(pos)?))
    }

    pub fn get_number(&self, pos: usize, int_digits: u32, frac_digits: u32) -> Result<Decimal> {
        fields::decode_number(self.required_field(pos)?, int_digits, frac_digits)
    }

    pub fn get_quantity(&self, pos: usize) -> Result<Decimal> {
        fields::decode_quantity(self.required_field(pos)?)
    }

    pub fn get_date(&self, pos: usize, rollover_year: i32) -> Result<NaiveDate> {
        fields::decode_date(self.required_field(pos)?, rollover_year)
    }

    pub fn get_time(&self, pos: usize) -> Result<NaiveTime> {
        fields::decode_time(self.required_field(pos)?)
    }

    pub fn get_long(&self, pos: usize) -> Result<u64> {
        fields::decode_long(self.required_field(pos)?)
    }

    /// Printer status word (response field 1).
    pub fn printer_status(&self) -> Result<u16> {
        self.status_word(1)
    }

    /// Fiscal status word (response field 2).
    pub fn fiscal_status(&self) -> Result<u16> {
        self.status_word(2)
    }

    fn status_word(&self, pos: usize) -> Result<u16> {
        let raw = self
            .field(pos)
            .ok_or_else(|| FiscalError::format(format!("response too short for status word at field {pos}")))?;
        u16::from_str_radix(raw.trim(), 16)
            .map_err(|_| FiscalError::format(format!("status word field {pos} is not hex: {raw:?}")))
    }

    /// Assemble the wire frame for this packet under the given sequence
    /// byte.
    pub fn to_frame(&self, seq: u8) -> Vec<u8> {
        let mut frame = Vec::with_capacity(MIN_BODY + BCC_LEN + self.fields.iter().map(|f| f.len() + 1).sum::<usize>());
        frame.push(STX);
        frame.push(seq);
        frame.push(self.command);
        for field in &self.fields {
            frame.push(FS);
            frame.extend_from_slice(field.as_bytes());
        }
        frame.push(ETX);

        let bcc = checksum(&frame);
        frame.extend_from_slice(format!("{bcc:04X}").as_bytes());
        frame
    }

    /// Split an incoming frame back into sequence byte and packet,
    /// verifying markers and checksum. Failures are response-format errors.
    pub fn from_frame(bytes: &[u8]) -> Result<(u8, Packet)> {
        if bytes.len() < MIN_BODY + BCC_LEN {
            return Err(FiscalError::format(format!("frame too short: {} byte(s)", bytes.len())));
        }

        let (body, bcc_text) = bytes.split_at(bytes.len() - BCC_LEN);
        if body[0] != STX {
            return Err(FiscalError::format(format!("frame does not start with STX: 0x{:02X}", body[0])));
        }
        if body[body.len() - 1] != ETX {
            return Err(FiscalError::format("frame does not end with ETX".to_string()));
        }

        let expected = std::str::from_utf8(bcc_text)
            .ok()
            .and_then(|s| u16::from_str_radix(s, 16).ok())
            .ok_or_else(|| FiscalError::format(format!("checksum trailer is not hex: {bcc_text:02X?}")))?;
        let actual = checksum(body);
        if expected != actual {
            return Err(FiscalError::format(format!(
                "checksum mismatch: frame says {expected:04X}, computed {actual:04X}"
            )));
        }

        let seq = body[1];
        let command = body[2];
        let inner = &body[3..body.len() - 1];

        let mut fields = Vec::new();
        if !inner.is_empty() {
            if inner[0] != FS {
                return Err(FiscalError::format("missing field separator after command byte".to_string()));
            }
            for part in inner[1..].split(|&b| b == FS) {
                fields.push(String::from_utf8_lossy(part).into_owned());
            }
        }

        Ok((seq, Packet { command, fields }))
    }
}

/// 16-bit additive checksum over the frame body (STX through ETX).
fn checksum(body: &[u8]) -> u16 {
    body.iter().fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_fills_gaps() {
        let mut p = Packet::new(0x42);
        p.set_field(3, "C");
        assert_eq!(p.field(1), Some(""));
        assert_eq!(p.field(2), Some(""));
        assert_eq!(p.field(3), Some("C"));
        p.set_field(1, "A");
        assert_eq!(p.field(1), Some("A"));
        assert_eq!(p.field_count(), 3);
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn test_set_field_rejects_position_zero() {
        Packet::new(0x42).set_field(0, "A");
    }

    #[test]
    fn test_frame_round_trip() {
        let mut p = Packet::new(0x42);
        p.set_text(1, "COLA 1.5L", 20);
        p.set_quantity(2, "2".parse().unwrap());
        p.set_amount(3, "10.01".parse().unwrap()).unwrap();

        let frame = p.to_frame(0x21);
        let (seq, parsed) = Packet::from_frame(&frame).unwrap();
        assert_eq!(seq, 0x21);
        assert_eq!(parsed, p);
    }

    #[test]
    fn test_frame_layout() {
        let p = Packet::new(0x2A);
        let frame = p.to_frame(SEQ_MIN);
        assert_eq!(frame[0], STX);
        assert_eq!(frame[1], SEQ_MIN);
        assert_eq!(frame[2], 0x2A);
        assert_eq!(frame[3], ETX);
        // 0x02 + 0x20 + 0x2A + 0x03 = 0x4F
        assert_eq!(&frame[4..], b"004F");
    }

    #[test]
    fn test_corrupt_checksum_rejected() {
        let mut frame = Packet::new(0x2A).to_frame(SEQ_MIN);
        let last = frame.len() - 1;
        frame[last] = b'0';
        let err = Packet::from_frame(&frame).unwrap_err();
        assert!(err.is_io_class());
    }

    #[test]
    fn test_truncated_frame_rejected() {
        assert!(Packet::from_frame(&[STX, 0x20]).is_err());
    }

    #[test]
    fn test_status_words_parse() {
        let mut response = Packet::new(0x2A);
        response.set_field(1, "4004");
        response.set_field(2, "0600");
        assert_eq!(response.printer_status().unwrap(), 0x4004);
        assert_eq!(response.fiscal_status().unwrap(), 0x0600);
    }

    #[test]
    fn test_missing_status_word_is_format_error() {
        let mut response = Packet::new(0x2A);
        response.set_field(1, "4004");
        let err = response.fiscal_status().unwrap_err();
        assert!(err.is_io_class());
    }

    #[test]
    fn test_non_hex_status_word_is_format_error() {
        let mut response = Packet::new(0x2A);
        response.set_field(1, "XYZW");
        response.set_field(2, "0000");
        assert!(response.printer_status().is_err());
    }

    #[test]
    fn test_optional_setters_emit_sentinel() {
        let mut p = Packet::new(0x42);
        p.set_opt_text(1, None, 50);
        p.set_opt_number(2, None, 9, 2).unwrap();
        p.set_opt_boolean(3, None, 'P', 'x');
        p.set_opt_long(4, None);
        for pos in 1..=4 {
            assert_eq!(p.field(pos), Some("x"), "field {pos}");
        }
    }
}
