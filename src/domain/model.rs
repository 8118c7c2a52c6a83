use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record as produced by a parser: source column name -> raw value.
/// `row_index` is the 1-based position in the source file, kept for error
/// reporting and never renumbered.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_index: usize,
    pub fields: BTreeMap<String, Option<String>>,
}

/// A `RawRow` remapped onto the canonical lead schema. Columns that match no
/// known alias land unmodified in `additional_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_data: BTreeMap<String, String>,
    pub source_file_row: usize,
}

/// A `NormalizedRow` after validation and cleaning. The only value handed to
/// downstream consumers. If `email` is present, `email_valid` is always set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedLead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_data: BTreeMap<String, String>,
    pub social_profiles_count: u32,
    pub is_duplicate: bool,
    pub source_file_row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_rows: usize,
    pub processed_rows: usize,
    pub errors: Vec<String>,
    pub success_rate: f64,
}

impl ParseStats {
    /// Fixes up `success_rate` once counting is done.
    pub fn finish(mut self) -> Self {
        self.success_rate = if self.total_rows > 0 {
            self.processed_rows as f64 / self.total_rows as f64 * 100.0
        } else {
            0.0
        };
        self
    }
}

/// What a parser hands to the cleaning stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub rows: Vec<NormalizedRow>,
    pub stats: ParseStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCleaningStats {
    pub total_records: usize,
    pub cleaned_records: usize,
    pub records_with_warnings: usize,
    pub total_warnings: usize,
    pub duplicate_records: usize,
    pub warnings: Vec<String>,
}

/// The uniform result envelope returned for every file, regardless of which
/// parser ran.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub success: bool,
    pub file_path: String,
    pub file_type: String,
    pub processed_at: DateTime<Utc>,
    pub data: Vec<CleanedLead>,
    pub parse_stats: ParseStats,
    pub cleaning_stats: BatchCleaningStats,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_computation() {
        let stats = ParseStats {
            total_rows: 4,
            processed_rows: 3,
            ..Default::default()
        }
        .finish();
        assert_eq!(stats.success_rate, 75.0);
    }

    #[test]
    fn test_success_rate_zero_rows() {
        let stats = ParseStats::default().finish();
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_cleaned_lead_serialization_omits_empty_fields() {
        let lead = CleanedLead {
            email: Some("a@b.com".to_string()),
            email_valid: Some(true),
            source_file_row: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert!(json.get("phone").is_none());
        assert!(json.get("additional_data").is_none());
        assert_eq!(json["source_file_row"], 2);
    }
}
