//! Command catalog: one constructor per business operation.
//!
//! Each constructor normalizes its domain parameters and builds an
//! unexecuted [`Packet`] in the operation's fixed field order. No I/O
//! happens here. Field order, widths and letter pairs are the device
//! command reference's normative schema.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::fields::TAX_NOT_APPLICABLE;
use super::packet::Packet;
use crate::error::Result;

// Command bytes.
pub const CMD_STATUS_REQUEST: u8 = 0x2A;
pub const CMD_DAILY_CLOSE: u8 = 0x39;
pub const CMD_OPEN_FISCAL_RECEIPT: u8 = 0x40;
pub const CMD_PRINT_FISCAL_TEXT: u8 = 0x41;
pub const CMD_PRINT_LINE_ITEM: u8 = 0x42;
pub const CMD_SUBTOTAL: u8 = 0x43;
pub const CMD_TOTAL_TENDER: u8 = 0x44;
pub const CMD_CLOSE_FISCAL_RECEIPT: u8 = 0x45;
pub const CMD_RETURN_RECHARGE: u8 = 0x46;
pub const CMD_OPEN_NON_FISCAL_RECEIPT: u8 = 0x48;
pub const CMD_PRINT_NON_FISCAL_TEXT: u8 = 0x49;
pub const CMD_CLOSE_NON_FISCAL_RECEIPT: u8 = 0x4A;
pub const CMD_GENERAL_DISCOUNT: u8 = 0x54;
pub const CMD_LAST_ITEM_DISCOUNT: u8 = 0x55;
pub const CMD_SET_DATE_TIME: u8 = 0x58;
pub const CMD_GET_DATE_TIME: u8 = 0x59;
pub const CMD_SET_HEADER_TRAILER: u8 = 0x5A;
pub const CMD_GET_HEADER_TRAILER: u8 = 0x5B;
pub const CMD_SET_FANTASY_NAME: u8 = 0x5C;
pub const CMD_GET_FANTASY_NAME: u8 = 0x5D;
pub const CMD_SET_BAR_CODE: u8 = 0x5E;
pub const CMD_DOUBLE_WIDTH: u8 = 0x5F;
pub const CMD_SET_COM_SPEED: u8 = 0x61;
pub const CMD_SET_CUSTOMER_DATA: u8 = 0x62;
pub const CMD_CHANGE_IVA_RESPONSIBILITY: u8 = 0x63;
pub const CMD_GET_GENERAL_CONFIGURATION: u8 = 0x64;
pub const CMD_SET_GENERAL_CONFIGURATION: u8 = 0x65;
pub const CMD_PERCEPTIONS: u8 = 0x66;
pub const CMD_GET_WORKING_MEMORY: u8 = 0x67;
pub const CMD_SEND_FIRST_IVA: u8 = 0x70;
pub const CMD_NEXT_IVA_TRANSMISSION: u8 = 0x71;
pub const CMD_OPEN_DNFH: u8 = 0x80;
pub const CMD_CLOSE_DNFH: u8 = 0x81;
pub const CMD_SET_EMBARK_NUMBER: u8 = 0x93;
pub const CMD_GET_EMBARK_NUMBER: u8 = 0x94;
pub const CMD_PRINT_EMBARK_ITEM: u8 = 0x95;
pub const CMD_PRINT_ACCOUNT_ITEM: u8 = 0x96;
pub const CMD_PRINT_QUOTATION_ITEM: u8 = 0x97;
pub const CMD_CANCEL_DOCUMENT: u8 = 0x98;
pub const CMD_REPRINT_DOCUMENT: u8 = 0x99;
pub const CMD_STATPRN: u8 = 0xA1;

// VAT responsibility wire codes.
pub const IVA_RESPONSABLE_INSCRIPTO: &str = "I";
pub const IVA_EXENTO: &str = "E";
pub const IVA_NO_RESPONSABLE: &str = "N";
pub const IVA_CONSUMIDOR_FINAL: &str = "F";
pub const IVA_MONOTRIBUTO: &str = "M";

// Customer identification wire codes.
pub const DOC_CUIT: &str = "T";
pub const DOC_CUIL: &str = "L";
pub const DOC_DNI: &str = "D";
pub const DOC_PASAPORTE: &str = "P";
pub const DOC_CEDULA: &str = "C";
pub const DOC_SIN_CALIFICADOR: &str = " ";

// Barcode formats.
pub const BARCODE_UPCA: u64 = 0;
pub const BARCODE_EAN_13: u64 = 2;
pub const BARCODE_EAN_8: u64 = 3;
pub const BARCODE_ITF: u64 = 5;

// Return/recharge operation flags.
pub const OP_CONTAINER_RETURN: &str = "e";
pub const OP_DISCOUNT_RECHARGE: &str = "B";

// Daily close report types.
pub const DAILY_CLOSE_Z: &str = "Z";
pub const DAILY_CLOSE_X: &str = "X";

/// Per-model field-width overrides, keyed by command byte and resolved at
/// packet-build time. Replaces subclass-per-model specialization.
#[derive(Debug, Clone)]
pub struct ModelProfile {
    name: String,
    text_widths: HashMap<u8, usize>,
}

impl ModelProfile {
    /// Profile with no overrides; every operation uses its base width.
    pub fn generic() -> Self {
        Self {
            name: "generic".to_string(),
            text_widths: HashMap::new(),
        }
    }

    /// Profile for a known model name; unknown names get the generic
    /// profile under that name.
    pub fn for_model(name: &str) -> Self {
        let mut profile = Self {
            name: name.to_string(),
            text_widths: HashMap::new(),
        };
        // Narrow-carriage models take shorter descriptions.
        if name.eq_ignore_ascii_case("TM-U220AF") {
            profile = profile
                .with_text_width(CMD_PRINT_LINE_ITEM, 30)
                .with_text_width(CMD_RETURN_RECHARGE, 30);
        }
        profile
    }

    pub fn with_text_width(mut self, command: u8, width: usize) -> Self {
        self.text_widths.insert(command, width);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width for a command's description field, falling back to the base
    /// schema width.
    pub fn text_width(&self, command: u8, base: usize) -> usize {
        self.text_widths.get(&command).copied().unwrap_or(base)
    }
}

/// General-configuration parameters (set operation). Optional entries keep
/// the device's current value.
#[derive(Debug, Clone, Default)]
pub struct GeneralConfiguration {
    pub print_config_report: bool,
    pub load_default_data: bool,
    pub final_consumer_limit: Decimal,
    pub ticket_invoice_limit: Decimal,
    pub iva_non_inscript: Decimal,
    pub copies: Option<u64>,
    pub print_change: Option<bool>,
    pub print_labels: Option<bool>,
    pub ticket_cut_type: Option<String>,
    pub print_framework: Option<bool>,
    pub reprint_documents: Option<bool>,
    pub balance_text: Option<String>,
    pub paper_sound: Option<bool>,
    pub paper_size: Option<String>,
}

/// One line item for a fiscal receipt.
#[derive(Debug, Clone)]
pub struct LineItem<'a> {
    pub description: &'a str,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Absent rate encodes the `**.**` sentinel.
    pub tax_percent: Option<Decimal>,
    /// Subtract from the document total instead of adding.
    pub subtract: bool,
    pub internal_taxes: Decimal,
    /// Price already includes tax.
    pub base_price: bool,
    pub display: Option<u64>,
}

/// Builds the packet for every supported business operation, resolving
/// per-model widths from its [`ModelProfile`].
#[derive(Debug, Clone)]
pub struct CommandSet {
    profile: ModelProfile,
}

impl CommandSet {
    pub fn new(profile: ModelProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub fn status_request(&self) -> Packet {
        Packet::new(CMD_STATUS_REQUEST)
    }

    pub fn open_fiscal_receipt(&self, doc_type: &str) -> Packet {
        let mut cmd = Packet::new(CMD_OPEN_FISCAL_RECEIPT);
        cmd.set_text(1, doc_type, 2);
        cmd.set_literal(2, "T");
        cmd
    }

    pub fn close_fiscal_receipt(&self, copies: u64) -> Packet {
        let mut cmd = Packet::new(CMD_CLOSE_FISCAL_RECEIPT);
        cmd.set_long(1, copies);
        cmd
    }

    pub fn open_non_fiscal_receipt(&self) -> Packet {
        Packet::new(CMD_OPEN_NON_FISCAL_RECEIPT)
    }

    pub fn close_non_fiscal_receipt(&self, copies: u64) -> Packet {
        let mut cmd = Packet::new(CMD_CLOSE_NON_FISCAL_RECEIPT);
        cmd.set_long(1, copies);
        cmd
    }

    /// Open a homologated non-fiscal document (remito, receipt, etc.).
    pub fn open_dnfh(&self, doc_type: &str, identification: Option<&str>) -> Packet {
        let mut cmd = Packet::new(CMD_OPEN_DNFH);
        cmd.set_text(1, doc_type, 2);
        cmd.set_literal(2, "T");
        cmd.set_opt_text(3, identification, 20);
        cmd
    }

    pub fn close_dnfh(&self, copies: u64) -> Packet {
        let mut cmd = Packet::new(CMD_CLOSE_DNFH);
        cmd.set_long(1, copies);
        cmd
    }

    pub fn print_line_item(&self, item: &LineItem<'_>) -> Result<Packet> {
        let width = self.profile.text_width(CMD_PRINT_LINE_ITEM, 50);
        let mut cmd = Packet::new(CMD_PRINT_LINE_ITEM);
        cmd.set_text(1, item.description, width);
        cmd.set_quantity(2, item.quantity);
        cmd.set_amount(3, item.price)?;
        match item.tax_percent {
            Some(rate) => cmd.set_number(4, rate, 2, 2)?,
            None => cmd.set_literal(4, TAX_NOT_APPLICABLE),
        }
        cmd.set_boolean(5, item.subtract, 'm', 'M');
        cmd.set_number(6, item.internal_taxes, 6, 8)?;
        cmd.set_opt_long(7, item.display);
        cmd.set_boolean(8, item.base_price, 'x', 'T');
        Ok(cmd)
    }

    pub fn print_fiscal_text(&self, text: &str, display: Option<u64>) -> Packet {
        let mut cmd = Packet::new(CMD_PRINT_FISCAL_TEXT);
        cmd.set_text(1, text, 50);
        cmd.set_opt_long(2, display);
        cmd
    }

    pub fn print_non_fiscal_text(&self, text: &str, display: Option<u64>) -> Packet {
        let mut cmd = Packet::new(CMD_PRINT_NON_FISCAL_TEXT);
        cmd.set_text(1, text, 120);
        cmd.set_opt_long(2, display);
        cmd
    }

    pub fn general_discount(
        &self,
        description: &str,
        amount: Decimal,
        subtract: bool,
        base_amount: bool,
        display: Option<u64>,
    ) -> Result<Packet> {
        let mut cmd = Packet::new(CMD_GENERAL_DISCOUNT);
        cmd.set_text(1, description, 50);
        cmd.set_number(2, amount, 9, 2)?;
        cmd.set_boolean(3, subtract, 'm', 'M');
        cmd.set_opt_long(4, display);
        cmd.set_boolean(5, base_amount, 'x', 'T');
        Ok(cmd)
    }

    pub fn last_item_discount(
        &self,
        description: &str,
        amount: Decimal,
        subtract: bool,
        base_amount: bool,
        display: Option<u64>,
    ) -> Result<Packet> {
        let mut cmd = Packet::new(CMD_LAST_ITEM_DISCOUNT);
        cmd.set_text(1, description, 50);
        cmd.set_amount(2, amount)?;
        cmd.set_boolean(3, subtract, 'm', 'M');
        cmd.set_opt_long(4, display);
        cmd.set_boolean(5, base_amount, 'x', 'T');
        Ok(cmd)
    }

    /// Container return or discount/recharge line; `operation` is one of
    /// [`OP_CONTAINER_RETURN`] / [`OP_DISCOUNT_RECHARGE`]. An absent tax
    /// rate is normalized to zero for this operation.
    #[allow(clippy::too_many_arguments)]
    pub fn return_recharge(
        &self,
        description: &str,
        amount: Decimal,
        tax_percent: Option<Decimal>,
        subtract: bool,
        internal_taxes: Decimal,
        base_amount: bool,
        display: Option<u64>,
        operation: &str,
    ) -> Result<Packet> {
        let width = self.profile.text_width(CMD_RETURN_RECHARGE, 50);
        let mut cmd = Packet::new(CMD_RETURN_RECHARGE);
        cmd.set_text(1, description, width);
        cmd.set_number(2, amount, 9, 2)?;
        cmd.set_number(3, tax_percent.unwrap_or_default(), 2, 2)?;
        cmd.set_boolean(4, subtract, 'm', 'M');
        cmd.set_number(5, internal_taxes, 6, 8)?;
        cmd.set_opt_long(6, display);
        cmd.set_boolean(7, base_amount, 'x', 'T');
        cmd.set_text(8, operation, 1);
        Ok(cmd)
    }

    pub fn perceptions(&self, description: &str, amount: Decimal, tax_rate: Option<Decimal>) -> Result<Packet> {
        let mut cmd = Packet::new(CMD_PERCEPTIONS);
        match tax_rate {
            Some(rate) => cmd.set_number(1, rate, 2, 2)?,
            None => cmd.set_literal(1, TAX_NOT_APPLICABLE),
        }
        cmd.set_text(2, description, 20);
        cmd.set_amount(3, amount)?;
        Ok(cmd)
    }

    pub fn subtotal(&self, print: bool, display: Option<u64>) -> Packet {
        let mut cmd = Packet::new(CMD_SUBTOTAL);
        cmd.set_boolean(1, print, 'P', 'x');
        cmd.set_literal(2, "x");
        cmd.set_opt_long(3, display);
        cmd
    }

    pub fn total_tender(&self, description: &str, amount: Decimal, cancel: bool, display: Option<u64>) -> Result<Packet> {
        let mut cmd = Packet::new(CMD_TOTAL_TENDER);
        cmd.set_text(1, description, 80);
        cmd.set_number(2, amount, 9, 2)?;
        cmd.set_boolean(3, cancel, 'C', 'T');
        cmd.set_opt_long(4, display);
        Ok(cmd)
    }

    /// Daily close: `doc_type` is [`DAILY_CLOSE_Z`] (fiscal day commit) or
    /// [`DAILY_CLOSE_X`] (report only).
    pub fn daily_close(&self, doc_type: &str) -> Packet {
        let mut cmd = Packet::new(CMD_DAILY_CLOSE);
        cmd.set_text(1, doc_type, 1);
        cmd
    }

    pub fn set_customer_data(
        &self,
        name: Option<&str>,
        doc_number: Option<&str>,
        iva_responsibility: &str,
        doc_type: Option<&str>,
        location: Option<&str>,
    ) -> Packet {
        let mut cmd = Packet::new(CMD_SET_CUSTOMER_DATA);
        cmd.set_opt_text(1, name, 50);
        cmd.set_opt_text(2, doc_number, 20);
        cmd.set_text(3, iva_responsibility, 1);
        cmd.set_opt_text(4, doc_type, 1);
        cmd.set_opt_text(5, location, 50);
        cmd
    }

    /// Switch the registered VAT responsibility; `iva_responsibility` is one
    /// of the `IVA_*` wire codes.
    pub fn change_iva_responsibility(&self, iva_responsibility: &str) -> Packet {
        let mut cmd = Packet::new(CMD_CHANGE_IVA_RESPONSIBILITY);
        cmd.set_text(1, iva_responsibility, 1);
        cmd
    }

    /// Print the next text line in double width.
    pub fn double_width(&self) -> Packet {
        Packet::new(CMD_DOUBLE_WIDTH)
    }

    pub fn set_date_time(&self, value: NaiveDateTime) -> Packet {
        let mut cmd = Packet::new(CMD_SET_DATE_TIME);
        cmd.set_date_and_time(1, 2, value);
        cmd
    }

    pub fn get_date_time(&self) -> Packet {
        Packet::new(CMD_GET_DATE_TIME)
    }

    pub fn set_general_configuration(&self, config: &GeneralConfiguration) -> Result<Packet> {
        let mut cmd = Packet::new(CMD_SET_GENERAL_CONFIGURATION);
        cmd.set_boolean(1, config.print_config_report, 'P', 'x');
        cmd.set_boolean(2, config.load_default_data, 'P', 'x');
        cmd.set_number(3, config.final_consumer_limit, 9, 2)?;
        cmd.set_number(4, config.ticket_invoice_limit, 9, 2)?;
        cmd.set_number(5, config.iva_non_inscript, 2, 2)?;
        cmd.set_opt_long(6, config.copies);
        cmd.set_opt_boolean(7, config.print_change, 'P', 'x');
        cmd.set_opt_boolean(8, config.print_labels, 'P', 'x');
        cmd.set_opt_text(9, config.ticket_cut_type.as_deref(), 1);
        cmd.set_opt_boolean(10, config.print_framework, 'P', 'x');
        cmd.set_opt_boolean(11, config.reprint_documents, 'P', 'x');
        cmd.set_opt_text(12, config.balance_text.as_deref(), 80);
        cmd.set_opt_boolean(13, config.paper_sound, 'P', 'x');
        cmd.set_opt_text(14, config.paper_size.as_deref(), 2);
        Ok(cmd)
    }

    pub fn get_general_configuration(&self) -> Packet {
        Packet::new(CMD_GET_GENERAL_CONFIGURATION)
    }

    pub fn bar_code(&self, code_type: u64, data: &str, print_numbers: bool) -> Packet {
        let mut cmd = Packet::new(CMD_SET_BAR_CODE);
        cmd.set_long(1, code_type);
        cmd.set_text(2, data, 30);
        cmd.set_boolean(3, print_numbers, 'N', 'x');
        cmd.set_literal(4, "x");
        cmd
    }

    pub fn set_header_trailer(&self, line: u64, text: &str) -> Packet {
        let mut cmd = Packet::new(CMD_SET_HEADER_TRAILER);
        cmd.set_long(1, line);
        cmd.set_text(2, text, 120);
        cmd
    }

    pub fn get_header_trailer(&self, line: u64) -> Packet {
        let mut cmd = Packet::new(CMD_GET_HEADER_TRAILER);
        cmd.set_long(1, line);
        cmd
    }

    pub fn set_fantasy_name(&self, line: u64, text: &str) -> Packet {
        let mut cmd = Packet::new(CMD_SET_FANTASY_NAME);
        cmd.set_long(1, line);
        cmd.set_text(2, text, 50);
        cmd
    }

    pub fn get_fantasy_name(&self, line: u64) -> Packet {
        let mut cmd = Packet::new(CMD_GET_FANTASY_NAME);
        cmd.set_long(1, line);
        cmd
    }

    pub fn set_embark_number(&self, line: u64, text: &str) -> Packet {
        let mut cmd = Packet::new(CMD_SET_EMBARK_NUMBER);
        cmd.set_long(1, line);
        cmd.set_text(2, text, 20);
        cmd
    }

    pub fn get_embark_number(&self, line: u64) -> Packet {
        let mut cmd = Packet::new(CMD_GET_EMBARK_NUMBER);
        cmd.set_long(1, line);
        cmd
    }

    pub fn print_embark_item(&self, description: &str, quantity: Decimal, display: Option<u64>) -> Packet {
        let mut cmd = Packet::new(CMD_PRINT_EMBARK_ITEM);
        cmd.set_text(1, description, 108);
        cmd.set_quantity(2, quantity);
        cmd.set_opt_long(3, display);
        cmd
    }

    #[allow(clippy::too_many_arguments)]
    pub fn print_account_item(
        &self,
        date: NaiveDate,
        doc_number: &str,
        description: &str,
        debit_amount: Decimal,
        credit_amount: Decimal,
        display: Option<u64>,
    ) -> Result<Packet> {
        let mut cmd = Packet::new(CMD_PRINT_ACCOUNT_ITEM);
        cmd.set_date(1, date);
        cmd.set_text(2, doc_number, 20);
        cmd.set_text(3, description, 60);
        cmd.set_number(4, debit_amount, 9, 2)?;
        cmd.set_number(5, credit_amount, 9, 2)?;
        cmd.set_opt_long(6, display);
        Ok(cmd)
    }

    pub fn print_quotation_item(&self, description: &str, display: Option<u64>) -> Packet {
        let mut cmd = Packet::new(CMD_PRINT_QUOTATION_ITEM);
        cmd.set_text(1, description, 120);
        cmd.set_opt_long(2, display);
        cmd
    }

    pub fn cancel_document(&self) -> Packet {
        Packet::new(CMD_CANCEL_DOCUMENT)
    }

    pub fn reprint(&self) -> Packet {
        Packet::new(CMD_REPRINT_DOCUMENT)
    }

    pub fn set_com_speed(&self, speed: u64) -> Packet {
        let mut cmd = Packet::new(CMD_SET_COM_SPEED);
        cmd.set_long(1, speed);
        cmd
    }

    pub fn get_working_memory(&self) -> Packet {
        Packet::new(CMD_GET_WORKING_MEMORY)
    }

    pub fn send_first_iva(&self) -> Packet {
        Packet::new(CMD_SEND_FIRST_IVA)
    }

    pub fn next_iva_transmission(&self) -> Packet {
        Packet::new(CMD_NEXT_IVA_TRANSMISSION)
    }

    pub fn statprn(&self) -> Packet {
        Packet::new(CMD_STATPRN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn catalog() -> CommandSet {
        CommandSet::new(ModelProfile::generic())
    }

    fn item<'a>() -> LineItem<'a> {
        LineItem {
            description: "COLA 1.5L",
            quantity: dec("2"),
            price: dec("10.005"),
            tax_percent: Some(dec("21")),
            subtract: false,
            internal_taxes: Decimal::ZERO,
            base_price: true,
            display: None,
        }
    }

    #[test]
    fn test_line_item_schema_order() {
        let cmd = catalog().print_line_item(&item()).unwrap();
        assert_eq!(cmd.command(), CMD_PRINT_LINE_ITEM);
        assert_eq!(cmd.field(1).unwrap().trim_end(), "COLA 1.5L");
        assert_eq!(cmd.field(2), Some("2"));
        // Half-up: 10.005 -> 10.01
        assert_eq!(cmd.field(3), Some("00000001001"));
        assert_eq!(cmd.field(4), Some("2100"));
        assert_eq!(cmd.field(5), Some("M"));
        assert_eq!(cmd.field(6), Some("00000000000000"));
        assert_eq!(cmd.field(7), Some("x"));
        assert_eq!(cmd.field(8), Some("x"));
    }

    #[test]
    fn test_line_item_tax_sentinel() {
        let mut it = item();
        it.tax_percent = None;
        let cmd = catalog().print_line_item(&it).unwrap();
        assert_eq!(cmd.field(4), Some("**.**"));
    }

    #[test]
    fn test_model_width_override_changes_only_width() {
        let base = catalog().print_line_item(&item()).unwrap();
        let narrow = CommandSet::new(ModelProfile::for_model("TM-U220AF"))
            .print_line_item(&item())
            .unwrap();
        assert_eq!(base.field(1).unwrap().len(), 50);
        assert_eq!(narrow.field(1).unwrap().len(), 30);
        assert_eq!(base.field_count(), narrow.field_count());
        for pos in 2..=8 {
            assert_eq!(base.field(pos), narrow.field(pos), "field {pos}");
        }
    }

    #[test]
    fn test_return_recharge_normalizes_absent_rate_to_zero() {
        let cmd = catalog()
            .return_recharge("ENVASE", dec("5"), None, true, Decimal::ZERO, false, None, OP_CONTAINER_RETURN)
            .unwrap();
        assert_eq!(cmd.field(3), Some("0000"));
        assert_eq!(cmd.field(4), Some("m"));
        assert_eq!(cmd.field(8), Some("e"));
    }

    #[test]
    fn test_perceptions_sentinel() {
        let cmd = catalog().perceptions("PERC IIBB", dec("1.50"), None).unwrap();
        assert_eq!(cmd.field(1), Some("**.**"));
        assert_eq!(cmd.field(3), Some("00000000150"));
    }

    #[test]
    fn test_daily_close_types() {
        assert_eq!(catalog().daily_close(DAILY_CLOSE_Z).field(1), Some("Z"));
        assert_eq!(catalog().daily_close(DAILY_CLOSE_X).field(1), Some("X"));
    }

    #[test]
    fn test_customer_data_optionals() {
        let cmd = catalog().set_customer_data(None, None, IVA_CONSUMIDOR_FINAL, None, None);
        assert_eq!(cmd.field(1), Some("x"));
        assert_eq!(cmd.field(2), Some("x"));
        assert_eq!(cmd.field(3), Some("F"));
        assert_eq!(cmd.field(4), Some("x"));
        assert_eq!(cmd.field(5), Some("x"));
    }

    #[test]
    fn test_overflowing_amount_fails_at_build_time() {
        let mut it = item();
        it.price = dec("10000000000");
        assert!(catalog().print_line_item(&it).is_err());
    }

    #[test]
    fn test_change_iva_responsibility_schema() {
        let cmd = catalog().change_iva_responsibility(IVA_MONOTRIBUTO);
        assert_eq!(cmd.command(), CMD_CHANGE_IVA_RESPONSIBILITY);
        assert_eq!(cmd.field(1), Some("M"));
        assert_eq!(cmd.field_count(), 1);
    }

    #[test]
    fn test_double_width_schema() {
        let cmd = catalog().double_width();
        assert_eq!(cmd.command(), CMD_DOUBLE_WIDTH);
        assert_eq!(cmd.field_count(), 0);
    }

    #[test]
    fn test_parameterless_commands() {
        let c = catalog();
        assert_eq!(c.status_request().field_count(), 0);
        assert_eq!(c.cancel_document().field_count(), 0);
        assert_eq!(c.reprint().field_count(), 0);
        assert_eq!(c.get_date_time().field_count(), 0);
    }
}
