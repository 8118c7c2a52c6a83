pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, ParserOptions};
pub use crate::core::cleaner::{clean_batch_data, clean_lead_data, find_similar_leads};
pub use crate::core::processor::{
    create_parser, file_info, process_file, LeadParser, SUPPORTED_EXTENSIONS,
};
pub use crate::core::scorer::{classify_lead, LeadClassification};
pub use domain::model::{
    BatchCleaningStats, CleanedLead, NormalizedRow, ParseOutput, ParseStats, ProcessReport, RawRow,
};
pub use domain::ports::FileParser;
pub use utils::error::{IngestError, Result};
