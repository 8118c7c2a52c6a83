use lead_ingest::{file_info, process_file, ParserOptions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn csv_file(content: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content).unwrap();
    file
}

#[test]
fn test_unsupported_extension_lists_supported_types() {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4").unwrap();
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(!report.success);
    assert!(report.data.is_empty());
    let message = &report.errors[0];
    assert!(message.contains(".pdf"));
    assert!(message.contains(".csv, .json, .xlsx, .xls"));
}

#[test]
fn test_missing_file_produces_failure_envelope() {
    let report = process_file(
        Path::new("/no/such/leads.csv"),
        &ParserOptions::default(),
    );

    assert!(!report.success);
    assert!(report.errors[0].contains("File not found"));
    assert_eq!(report.parse_stats.total_rows, 0);
    assert_eq!(report.cleaning_stats.total_records, 0);
}

#[test]
fn test_end_to_end_dedup_across_phone_formats() {
    // Same number written two ways; both clean to +12125550182.
    let file = csv_file(
        b"name,Phone Number\n\
          Ada,(212) 555-0182\n\
          Bob,1-212-555-0182\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    assert_eq!(report.data[0].phone.as_deref(), Some("+12125550182"));
    assert_eq!(report.data[1].phone.as_deref(), Some("+12125550182"));
    assert!(!report.data[0].is_duplicate);
    assert!(report.data[1].is_duplicate);
    assert!(report
        .cleaning_stats
        .warnings
        .iter()
        .any(|w| w.starts_with("Record 2:") && w.contains("Potential duplicate")));
}

#[test]
fn test_report_serializes_to_json() {
    let file = csv_file(b"email\nr@example.com\n");
    let report = process_file(file.path(), &ParserOptions::default());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["parse_stats"]["processed_rows"], 1);
    assert_eq!(json["data"][0]["email"], "r@example.com");
    assert_eq!(json["data"][0]["source_file_row"], 2);
    // Fields that were never populated stay out of the payload.
    assert!(json["data"][0].get("linkedin_url").is_none());
}

#[test]
fn test_file_info_for_csv_reports_delimiter() {
    let file = csv_file(b"email;city\na@b.com;Rome\n");
    let info = file_info(file.path(), &ParserOptions::default()).unwrap();

    assert_eq!(info.file_type, ".csv");
    assert!(info.is_supported);
    assert_eq!(info.detected_delimiter, Some(';'));
    assert!(info.file_size > 0);
}

#[test]
fn test_social_url_platform_mismatch_kept_and_flagged() {
    let file = csv_file(
        b"email,LinkedIn\n\
          s@example.com,https://twitter.com/someone\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    let lead = &report.data[0];
    assert_eq!(
        lead.linkedin_url.as_deref(),
        Some("https://twitter.com/someone")
    );
    assert_eq!(lead.social_profiles_count, 0);
    assert!(report
        .cleaning_stats
        .warnings
        .iter()
        .any(|w| w.contains("doesn't match expected format")));
}
