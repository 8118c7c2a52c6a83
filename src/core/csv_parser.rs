use crate::core::normalizer::normalize;
use crate::domain::model::{ParseOutput, ParseStats, RawRow};
use crate::domain::ports::FileParser;
use crate::utils::error::{IngestError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Literal tokens treated as missing values, matching the spreadsheet parser.
pub(crate) const NULL_TOKENS: &[&str] = &["", "NULL", "null", "N/A", "n/a", "NA", "na"];

/// Encodings tried after the requested one, in order.
const ENCODING_FALLBACKS: &[&str] = &["utf-8", "latin1", "cp1252", "iso-8859-1"];

const DELIMITER_CANDIDATES: &[u8] = &[b',', b';', b'\t', b'|'];

#[derive(Debug)]
pub struct CsvParser {
    path: PathBuf,
    encoding: Option<String>,
    delimiter: Option<char>,
}

impl CsvParser {
    pub fn new(path: &Path, encoding: Option<String>, delimiter: Option<char>) -> Self {
        Self {
            path: path.to_path_buf(),
            encoding,
            delimiter,
        }
    }

    fn decode(&self) -> Result<String> {
        let bytes = fs::read(&self.path)?;
        let mut labels: Vec<&str> = Vec::new();
        if let Some(requested) = self.encoding.as_deref() {
            labels.push(requested);
        }
        labels.extend(ENCODING_FALLBACKS);

        let mut tried = Vec::new();
        for label in labels {
            if tried.iter().any(|t: &String| t.eq_ignore_ascii_case(label)) {
                continue;
            }
            tried.push(label.to_string());

            let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) else {
                tracing::warn!("Unknown encoding label '{label}', skipping");
                continue;
            };
            let (text, _, had_errors) = encoding.decode(&bytes);
            if !had_errors {
                tracing::debug!("Decoded {} with encoding {label}", self.path.display());
                return Ok(text.into_owned());
            }
        }

        Err(IngestError::DecodeError {
            path: self.path.display().to_string(),
            tried: tried.join(", "),
        })
    }

    fn effective_delimiter(&self, text: &str) -> u8 {
        match self.delimiter {
            Some(d) if d.is_ascii() => d as u8,
            Some(_) | None => detect_delimiter(text),
        }
    }

    /// The delimiter the parser would use for this file, sniffed from the
    /// first line when none is configured.
    pub fn detected_delimiter(&self) -> Result<char> {
        let text = self.decode()?;
        Ok(self.effective_delimiter(&text) as char)
    }
}

/// Counts candidate delimiters in the first line; the most frequent wins,
/// comma on a tie or when nothing matches.
fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    let mut best = b',';
    let mut best_count = 0;
    for &candidate in DELIMITER_CANDIDATES {
        let count = first_line.bytes().filter(|b| *b == candidate).count();
        // Strictly greater: on a tie the earlier candidate keeps the win.
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

pub(crate) fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if NULL_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl FileParser for CsvParser {
    fn validate_structure(&self) -> Result<()> {
        let text = self.decode()?;
        let delimiter = self.effective_delimiter(&text);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(IngestError::InvalidStructure {
                message: "CSV file has no header or invalid structure".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for header in &headers {
            if !seen.insert(header) {
                return Err(IngestError::InvalidStructure {
                    message: "CSV file has duplicate column names".to_string(),
                });
            }
        }

        Ok(())
    }

    fn parse(&self) -> Result<ParseOutput> {
        let text = self.decode()?;
        let delimiter = self.effective_delimiter(&text);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut stats = ParseStats::default();
        let mut rows = Vec::new();

        for (index, record) in reader.records().enumerate() {
            // +2: 1-based file position plus the header line. Blank lines are
            // skipped by the reader and never counted, like the empty rows
            // dropped below; row numbers keep their gaps.
            let row_number = index + 2;
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    let message = format!("Error processing row {row_number}: {err}");
                    tracing::warn!("{message}");
                    stats.total_rows += 1;
                    stats.errors.push(message);
                    continue;
                }
            };

            let mut fields: BTreeMap<String, Option<String>> = BTreeMap::new();
            let mut has_value = false;
            for (col, header) in headers.iter().enumerate() {
                let value = clean_cell(record.get(col).unwrap_or(""));
                has_value |= value.is_some();
                fields.insert(header.clone(), value);
            }

            if !has_value {
                continue;
            }

            stats.total_rows += 1;
            rows.push(normalize(RawRow {
                row_index: row_number,
                fields,
            }));
            stats.processed_rows += 1;
        }

        tracing::info!(
            "Processed {} out of {} CSV rows from {}",
            stats.processed_rows,
            stats.total_rows,
            self.path.display()
        );

        Ok(ParseOutput {
            rows,
            stats: stats.finish(),
        })
    }
}
