use crate::core::normalizer::normalize;
use crate::domain::model::{ParseOutput, ParseStats, RawRow};
use crate::domain::ports::FileParser;
use crate::utils::error::{IngestError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Keys whose presence marks an object as a single lead record.
const LEAD_INDICATOR_KEYS: &[&str] = &[
    "name",
    "full_name",
    "first_name",
    "last_name",
    "email",
    "phone",
    "company",
    "linkedin",
];

/// Wrapper keys that may hold the actual array of lead records.
const CONTAINER_KEYS: &[&str] = &[
    "leads",
    "contacts",
    "people",
    "users",
    "customers",
    "prospects",
    "data",
    "results",
    "items",
    "records",
];

#[derive(Debug)]
pub struct JsonParser {
    path: PathBuf,
}

impl JsonParser {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn load(&self) -> Result<Value> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl FileParser for JsonParser {
    fn validate_structure(&self) -> Result<()> {
        match self.load()? {
            Value::Array(items) if items.is_empty() => Err(IngestError::EmptyInput {
                message: "JSON array is empty".to_string(),
            }),
            Value::Object(map) if map.is_empty() => Err(IngestError::EmptyInput {
                message: "JSON object is empty".to_string(),
            }),
            Value::Array(_) | Value::Object(_) => Ok(()),
            _ => Err(IngestError::InvalidStructure {
                message: "JSON file must contain an object or array".to_string(),
            }),
        }
    }

    fn parse(&self) -> Result<ParseOutput> {
        let value = self.load()?;

        let output = match value {
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(IngestError::EmptyInput {
                        message: "JSON array is empty".to_string(),
                    });
                }
                parse_array(&items)
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return Err(IngestError::EmptyInput {
                        message: "JSON object is empty".to_string(),
                    });
                }
                if is_single_lead_object(&map) {
                    parse_single_object(&map)
                } else if let Some(items) = extract_container_array(&map) {
                    parse_array(items)
                } else {
                    parse_single_object(&map)
                }
            }
            _ => {
                return Err(IngestError::InvalidStructure {
                    message: "JSON file must contain an object or array".to_string(),
                })
            }
        };

        tracing::info!(
            "Processed {} out of {} JSON records from {}",
            output.stats.processed_rows,
            output.stats.total_rows,
            self.path.display()
        );
        Ok(output)
    }
}

fn parse_array(items: &[Value]) -> ParseOutput {
    let mut stats = ParseStats {
        total_rows: items.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Value::Object(obj) = item else {
            stats
                .errors
                .push(format!("Item at index {index} is not a valid object"));
            continue;
        };
        rows.push(normalize(RawRow {
            row_index: index + 1,
            fields: flatten_object(obj),
        }));
        stats.processed_rows += 1;
    }

    ParseOutput {
        rows,
        stats: stats.finish(),
    }
}

fn parse_single_object(obj: &Map<String, Value>) -> ParseOutput {
    let stats = ParseStats {
        total_rows: 1,
        processed_rows: 1,
        ..Default::default()
    };
    let rows = vec![normalize(RawRow {
        row_index: 1,
        fields: flatten_object(obj),
    })];
    ParseOutput {
        rows,
        stats: stats.finish(),
    }
}

fn is_single_lead_object(obj: &Map<String, Value>) -> bool {
    obj.keys().any(|key| {
        let lower = key.to_lowercase();
        LEAD_INDICATOR_KEYS.contains(&lower.as_str())
    })
}

/// Searches the known container keys, exact spelling first, then a
/// case-insensitive pass; the first array found wins.
fn extract_container_array(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    for key in CONTAINER_KEYS {
        if let Some(Value::Array(items)) = obj.get(*key) {
            tracing::debug!("Found lead records in '{key}' field");
            return Some(items);
        }
    }
    for (key, value) in obj {
        if let Value::Array(items) = value {
            if CONTAINER_KEYS.contains(&key.to_lowercase().as_str()) {
                tracing::debug!("Found lead records in '{key}' field (case-insensitive)");
                return Some(items);
            }
        }
    }
    None
}

/// Flattens nested objects with `_`-joined key paths. Scalar arrays join with
/// `", "`; arrays of objects flatten per element with an index suffix.
fn flatten_object(obj: &Map<String, Value>) -> BTreeMap<String, Option<String>> {
    let mut out = BTreeMap::new();
    flatten_into(obj, "", &mut out);
    out
}

fn flatten_into(obj: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, Option<String>>) {
    for (key, value) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };
        flatten_value(&path, value, out);
    }
}

fn flatten_value(path: &str, value: &Value, out: &mut BTreeMap<String, Option<String>>) {
    match value {
        Value::Object(nested) => flatten_into(nested, path, out),
        Value::Array(items) => {
            if items.first().is_some_and(Value::is_object) {
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::Object(nested) => flatten_into(nested, &format!("{path}_{i}"), out),
                        other => {
                            out.insert(format!("{path}_{i}"), scalar_to_string(other));
                        }
                    }
                }
            } else if items.is_empty() {
                out.insert(path.to_string(), None);
            } else {
                let joined = items
                    .iter()
                    .map(scalar_display)
                    .collect::<Vec<_>>()
                    .join(", ");
                out.insert(path.to_string(), Some(joined));
            }
        }
        other => {
            out.insert(path.to_string(), scalar_to_string(other));
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn scalar_display(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| "null".to_string())
}
