use crate::core::csv_parser::NULL_TOKENS;
use crate::core::normalizer::normalize;
use crate::domain::model::{ParseOutput, ParseStats, RawRow};
use crate::domain::ports::FileParser;
use crate::utils::error::{IngestError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct XlsxParser {
    path: PathBuf,
    sheet_name: Option<String>,
}

impl XlsxParser {
    pub fn new(path: &Path, sheet_name: Option<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            sheet_name,
        }
    }

    pub fn sheet_names(&self) -> Result<Vec<String>> {
        let workbook = open_workbook_auto(&self.path)?;
        Ok(workbook.sheet_names().to_vec())
    }

    fn target_sheet(&self, sheet_names: &[String]) -> Result<String> {
        if sheet_names.is_empty() {
            return Err(IngestError::InvalidStructure {
                message: "Excel file has no sheets".to_string(),
            });
        }
        match &self.sheet_name {
            Some(name) => {
                if sheet_names.iter().any(|s| s == name) {
                    Ok(name.clone())
                } else {
                    Err(IngestError::SheetNotFound {
                        sheet: name.clone(),
                    })
                }
            }
            None => Ok(sheet_names[0].clone()),
        }
    }
}

impl FileParser for XlsxParser {
    fn validate_structure(&self) -> Result<()> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        let target = self.target_sheet(&sheet_names)?;

        let range = workbook.worksheet_range(&target)?;
        if range.is_empty() {
            return Err(IngestError::InvalidStructure {
                message: format!("Sheet '{target}' is empty"),
            });
        }
        Ok(())
    }

    fn parse(&self) -> Result<ParseOutput> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet_names = workbook.sheet_names().to_vec();
        let target = self.target_sheet(&sheet_names)?;
        let range = workbook.worksheet_range(&target)?;

        let mut rows_iter = range.rows();
        let Some(header_cells) = rows_iter.next() else {
            return Err(IngestError::InvalidStructure {
                message: format!("Sheet '{target}' is empty"),
            });
        };

        let headers: Vec<String> = header_cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match convert_cell(cell) {
                Some(name) => name,
                None => format!("column_{}", i + 1),
            })
            .collect();

        // Cell conversion first, so empty-column detection sees nulls the
        // same way empty-row detection does.
        let data_rows: Vec<Vec<Option<String>>> = rows_iter
            .map(|cells| {
                (0..headers.len())
                    .map(|col| cells.get(col).and_then(convert_cell))
                    .collect()
            })
            .collect();

        // Drop columns with no data in any row.
        let keep: Vec<bool> = (0..headers.len())
            .map(|col| data_rows.iter().any(|row| row[col].is_some()))
            .collect();

        let mut stats = ParseStats::default();
        let mut rows = Vec::new();

        for (index, cells) in data_rows.into_iter().enumerate() {
            // +2: 1-based sheet position plus the header row.
            let row_number = index + 2;
            if cells.iter().all(Option::is_none) {
                continue;
            }
            stats.total_rows += 1;

            let fields: BTreeMap<String, Option<String>> = headers
                .iter()
                .zip(cells)
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|((header, value), _)| (header.clone(), value))
                .collect();

            rows.push(normalize(RawRow {
                row_index: row_number,
                fields,
            }));
            stats.processed_rows += 1;
        }

        tracing::info!(
            "Processed {} out of {} rows from sheet '{target}' of {}",
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

/// Stringifies a cell. Whole-number floats become integers, error cells and
/// null tokens become missing values, everything else is trimmed text.
fn convert_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if NULL_TOKENS.contains(&trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => {
            let text = other.to_string();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}
