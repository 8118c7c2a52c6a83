pub mod cleaner;
pub mod csv_parser;
pub mod json_parser;
pub mod normalizer;
pub mod processor;
pub mod scorer;
pub mod validator;
pub mod xlsx_parser;

pub use crate::domain::model::{
    BatchCleaningStats, CleanedLead, NormalizedRow, ParseOutput, ParseStats, ProcessReport, RawRow,
};
pub use crate::domain::ports::FileParser;
pub use crate::utils::error::Result;
