use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("invalid NPI {0:?}: expected 10 digits with a valid check digit")]
    InvalidNpi(String),
    #[error("date range ends before it starts: {start} > {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[error("diagnosis pointer index {0} is outside A..=F")]
    PointerIndex(u8),
    #[error("claim has {0} diagnoses, expected 1..=12")]
    DiagnosisCount(usize),
    #[error("diagnosis {0} appears more than once")]
    DuplicateDiagnosis(String),
    #[error("claim has {0} service lines, expected 1..=6")]
    ServiceLineCount(usize),
    #[error("procedure {0} appears on more than one service line")]
    DuplicateProcedure(String),
    #[error("service line {line} points at {pointer} but only {diagnoses} diagnoses exist")]
    PointerOutOfRange {
        line: usize,
        pointer: char,
        diagnoses: usize,
    },
    #[error("total charge {total} does not equal the sum of line charges {sum}")]
    TotalMismatch { total: u32, sum: u32 },
    #[error("amount paid {paid} exceeds 80% of total charge {total}")]
    PaidExceedsLimit { paid: u32, total: u32 },
    #[error("balance due {balance} does not equal {total} - {paid}")]
    BalanceMismatch { balance: u32, total: u32, paid: u32 },
    #[error("accident place must be present exactly when an accident indicator is YES")]
    AccidentPlaceMismatch,
    #[error("service line {line} has different from/to dates")]
    ServiceDateSpan { line: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
