//! Status word tables and condition classification.
//!
//! Every response carries two independent 16-bit words: one for the
//! printer mechanism, one for the fiscal controller. Each table maps bits
//! to named conditions with a severity; a command fails iff at least one
//! active condition is error severity.

/// Severity of an active condition. Info and Warning do not fail a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Printer-mechanism status bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterCondition {
    /// Printer busy processing buffered output.
    Busy,
    /// Link between controller and print mechanism is down.
    Fault,
    /// Printer did not answer within the controller's window.
    Offline,
    /// Journal (audit) paper station is out of paper.
    JournalPaperOut,
    /// Receipt paper near the end of the roll; new documents still allowed.
    PaperLow,
    /// Controller-side print buffer is full.
    BufferFull,
    /// All buffered data has been flushed to the mechanism.
    BufferEmpty,
    /// Printer cover is open.
    CoverOpen,
    /// A cash drawer is open.
    DrawerOpen,
    /// Receipt paper station is out of paper; no further documents until
    /// the supply is restored.
    TicketPaperOut,
}

impl PrinterCondition {
    pub const ALL: [PrinterCondition; 10] = [
        Self::Busy,
        Self::Fault,
        Self::Offline,
        Self::JournalPaperOut,
        Self::PaperLow,
        Self::BufferFull,
        Self::BufferEmpty,
        Self::CoverOpen,
        Self::DrawerOpen,
        Self::TicketPaperOut,
    ];

    pub fn mask(self) -> u16 {
        match self {
            Self::Busy => 0x0001,
            Self::Fault => 0x0004,
            Self::Offline => 0x0008,
            Self::JournalPaperOut => 0x0010,
            Self::PaperLow => 0x0020,
            Self::BufferFull => 0x0040,
            Self::BufferEmpty => 0x0080,
            Self::CoverOpen => 0x0100,
            Self::DrawerOpen => 0x1000,
            Self::TicketPaperOut => 0x4000,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Busy | Self::PaperLow | Self::BufferFull => Severity::Warning,
            Self::BufferEmpty | Self::DrawerOpen => Severity::Info,
            Self::Fault | Self::Offline | Self::JournalPaperOut | Self::CoverOpen | Self::TicketPaperOut => {
                Severity::Error
            }
        }
    }

    /// Stable key resolved to display text by the message repository.
    pub fn message_key(self) -> &'static str {
        match self {
            Self::Busy => "PrinterBusy",
            Self::Fault => "PrinterError",
            Self::Offline => "PrinterOffline",
            Self::JournalPaperOut => "JournalPaperOut",
            Self::PaperLow => "PaperLow",
            Self::BufferFull => "PrintBufferFull",
            Self::BufferEmpty => "PrintBufferEmpty",
            Self::CoverOpen => "PrinterCoverOpen",
            Self::DrawerOpen => "MoneyDrawerOpen",
            Self::TicketPaperOut => "TicketPaperOut",
        }
    }

    /// Paper-source bits that drive the derived paper-out flag.
    pub fn is_paper_out(self) -> bool {
        matches!(self, Self::JournalPaperOut | Self::TicketPaperOut)
    }
}

/// Fiscal-controller status bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiscalCondition {
    /// Fiscal memory checksum failed at power-on.
    FiscalMemoryCrc,
    /// Working memory checksum failed at power-on.
    WorkingMemoryCrc,
    /// Command byte not recognized.
    UnknownCommand,
    /// A command field held data invalid for its declared kind.
    InvalidDataField,
    /// Command not valid for the current fiscal state.
    InvalidCommand,
    /// Executing the command would overflow a transaction/daily/fiscal total.
    AccumulatorOverflow,
    /// Fiscal memory is full; no fiscal document may be opened.
    FiscalMemoryFull,
    /// Fiscal memory within 40 daily closes of filling up.
    FiscalMemoryNearFull,
    /// Device has been certified.
    Certified,
    /// Device has been fiscalized.
    Fiscalized,
    /// 24 hours without a Z close, or the document item limit was reached.
    DailyCloseRequired,
    /// A fiscal document is open.
    FiscalDocumentOpen,
    /// Some document (fiscal or not) is open on the roll.
    DocumentOpen,
}

impl FiscalCondition {
    pub const ALL: [FiscalCondition; 13] = [
        Self::FiscalMemoryCrc,
        Self::WorkingMemoryCrc,
        Self::UnknownCommand,
        Self::InvalidDataField,
        Self::InvalidCommand,
        Self::AccumulatorOverflow,
        Self::FiscalMemoryFull,
        Self::FiscalMemoryNearFull,
        Self::Certified,
        Self::Fiscalized,
        Self::DailyCloseRequired,
        Self::FiscalDocumentOpen,
        Self::DocumentOpen,
    ];

    pub fn mask(self) -> u16 {
        match self {
            Self::FiscalMemoryCrc => 0x0001,
            Self::WorkingMemoryCrc => 0x0002,
            Self::UnknownCommand => 0x0008,
            Self::InvalidDataField => 0x0010,
            Self::InvalidCommand => 0x0020,
            Self::AccumulatorOverflow => 0x0040,
            Self::FiscalMemoryFull => 0x0080,
            Self::FiscalMemoryNearFull => 0x0100,
            Self::Certified => 0x0200,
            Self::Fiscalized => 0x0400,
            Self::DailyCloseRequired => 0x0800,
            Self::FiscalDocumentOpen => 0x1000,
            Self::DocumentOpen => 0x2000,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::FiscalMemoryNearFull => Severity::Warning,
            Self::Certified | Self::Fiscalized | Self::FiscalDocumentOpen | Self::DocumentOpen => Severity::Info,
            Self::FiscalMemoryCrc
            | Self::WorkingMemoryCrc
            | Self::UnknownCommand
            | Self::InvalidDataField
            | Self::InvalidCommand
            | Self::AccumulatorOverflow
            | Self::FiscalMemoryFull
            | Self::DailyCloseRequired => Severity::Error,
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            Self::FiscalMemoryCrc => "FiscalMemoryCrcError",
            Self::WorkingMemoryCrc => "WorkingMemoryCrcError",
            Self::UnknownCommand => "UnknownCommand",
            Self::InvalidDataField => "InvalidDataField",
            Self::InvalidCommand => "InvalidCommand",
            Self::AccumulatorOverflow => "AccumulatorOverflow",
            Self::FiscalMemoryFull => "FiscalMemoryFull",
            Self::FiscalMemoryNearFull => "FiscalMemoryNearFull",
            Self::Certified => "DeviceCertified",
            Self::Fiscalized => "DeviceFiscalized",
            Self::DailyCloseRequired => "DailyCloseRequired",
            Self::FiscalDocumentOpen => "FiscalDocumentOpen",
            Self::DocumentOpen => "DocumentOpen",
        }
    }
}

/// An active condition from either table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Printer(PrinterCondition),
    Fiscal(FiscalCondition),
}

impl Condition {
    pub fn severity(self) -> Severity {
        match self {
            Self::Printer(c) => c.severity(),
            Self::Fiscal(c) => c.severity(),
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            Self::Printer(c) => c.message_key(),
            Self::Fiscal(c) => c.message_key(),
        }
    }
}

/// The pair of raw status words from one response. Change detection is
/// bitwise equality; any single differing bit counts as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub printer: u16,
    pub fiscal: u16,
}

impl StatusSnapshot {
    pub fn new(printer: u16, fiscal: u16) -> Self {
        Self { printer, fiscal }
    }
}

/// Classified conditions of one snapshot, partitioned by severity, plus the
/// derived paper-out flag.
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    conditions: Vec<Condition>,
    paper_out: bool,
}

impl StatusReport {
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True iff any active condition has error severity; the enclosing
    /// command execution is then a failure.
    pub fn has_errors(&self) -> bool {
        self.conditions.iter().any(|c| c.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = Condition> + '_ {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = Condition> + '_ {
        self.by_severity(Severity::Warning)
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = Condition> + '_ {
        self.conditions.iter().copied().filter(move |c| c.severity() == severity)
    }

    /// Message keys of the error-severity conditions.
    pub fn error_keys(&self) -> Vec<&'static str> {
        self.errors().map(Condition::message_key).collect()
    }

    /// True when any paper source is exhausted. Exposed independently
    /// because it gates whether further fiscal documents may be opened.
    pub fn paper_out(&self) -> bool {
        self.paper_out
    }
}

/// Scan both tables against the snapshot. A condition is active iff its bit
/// is set; both tables are evaluated independently.
pub fn classify(snapshot: StatusSnapshot) -> StatusReport {
    let mut conditions = Vec::new();
    let mut paper_out = false;

    for condition in FiscalCondition::ALL {
        if snapshot.fiscal & condition.mask() != 0 {
            conditions.push(Condition::Fiscal(condition));
        }
    }

    for condition in PrinterCondition::ALL {
        if snapshot.printer & condition.mask() != 0 {
            conditions.push(Condition::Printer(condition));
            if condition.is_paper_out() {
                paper_out = true;
            }
        }
    }

    StatusReport { conditions, paper_out }
}
