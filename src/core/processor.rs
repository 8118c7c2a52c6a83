use crate::config::ParserOptions;
use crate::core::cleaner::clean_batch_data;
use crate::core::csv_parser::CsvParser;
use crate::core::json_parser::JsonParser;
use crate::core::xlsx_parser::XlsxParser;
use crate::domain::model::{BatchCleaningStats, ParseOutput, ParseStats, ProcessReport};
use crate::domain::ports::FileParser;
use crate::utils::error::{IngestError, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".csv", ".json", ".xlsx", ".xls"];

/// The closed set of parsers, keyed on file extension at construction.
#[derive(Debug)]
pub enum LeadParser {
    Csv(CsvParser),
    Json(JsonParser),
    Xlsx(XlsxParser),
}

impl FileParser for LeadParser {
    fn validate_structure(&self) -> Result<()> {
        match self {
            LeadParser::Csv(parser) => parser.validate_structure(),
            LeadParser::Json(parser) => parser.validate_structure(),
            LeadParser::Xlsx(parser) => parser.validate_structure(),
        }
    }

    fn parse(&self) -> Result<ParseOutput> {
        match self {
            LeadParser::Csv(parser) => parser.parse(),
            LeadParser::Json(parser) => parser.parse(),
            LeadParser::Xlsx(parser) => parser.parse(),
        }
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Picks the parser for a file purely by extension.
pub fn create_parser(path: &Path, options: &ParserOptions) -> Result<LeadParser> {
    match file_extension(path).as_str() {
        ".csv" => Ok(LeadParser::Csv(CsvParser::new(
            path,
            options.encoding.clone(),
            options.delimiter,
        ))),
        ".json" => Ok(LeadParser::Json(JsonParser::new(path))),
        ".xlsx" | ".xls" => Ok(LeadParser::Xlsx(XlsxParser::new(
            path,
            options.sheet_name.clone(),
        ))),
        extension => Err(IngestError::UnsupportedFileType {
            extension: extension.to_string(),
            supported: SUPPORTED_EXTENSIONS.join(", "),
        }),
    }
}

/// Runs the whole pipeline for one file: structural validation, parse,
/// normalization, batch cleaning. Fatal errors come back as a
/// `success=false` envelope; row- and field-level problems stay inside the
/// stats without failing the file.
pub fn process_file(path: &Path, options: &ParserOptions) -> ProcessReport {
    match try_process(path, options) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("Error processing file {}: {err}", path.display());
            ProcessReport {
                success: false,
                file_path: path.display().to_string(),
                file_type: file_extension(path),
                processed_at: Utc::now(),
                data: Vec::new(),
                parse_stats: ParseStats::default(),
                cleaning_stats: BatchCleaningStats::default(),
                errors: vec![err.to_string()],
            }
        }
    }
}

fn try_process(path: &Path, options: &ParserOptions) -> Result<ProcessReport> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let parser = create_parser(path, options)?;
    parser.validate_structure()?;

    tracing::info!("Starting to parse file: {}", path.display());
    let output = parser.parse()?;
    let (data, cleaning_stats) = clean_batch_data(&output.rows, &options.phone_region);

    tracing::info!(
        "File processing completed. Processed {} records, {} duplicates",
        data.len(),
        cleaning_stats.duplicate_records
    );

    Ok(ProcessReport {
        success: true,
        file_path: path.display().to_string(),
        file_type: file_extension(path),
        processed_at: Utc::now(),
        errors: output.stats.errors.clone(),
        parse_stats: output.stats,
        cleaning_stats,
        data,
    })
}

/// Lightweight file metadata, gathered without a full parse.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub is_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_delimiter: Option<char>,
}

pub fn file_info(path: &Path, options: &ParserOptions) -> Result<FileInfo> {
    let metadata = std::fs::metadata(path)?;
    let file_type = file_extension(path);
    let is_supported = SUPPORTED_EXTENSIONS.contains(&file_type.as_str());

    let mut info = FileInfo {
        file_name: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string(),
        file_size: metadata.len(),
        file_type: file_type.clone(),
        is_supported,
        sheets: None,
        detected_delimiter: None,
    };

    match file_type.as_str() {
        ".xlsx" | ".xls" => {
            let parser = XlsxParser::new(path, options.sheet_name.clone());
            info.sheets = Some(parser.sheet_names()?);
        }
        ".csv" => {
            let parser = CsvParser::new(path, options.encoding.clone(), options.delimiter);
            info.detected_delimiter = Some(parser.detected_delimiter()?);
        }
        _ => {}
    }

    Ok(info)
}
