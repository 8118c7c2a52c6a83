use lead_ingest::{process_file, ParserOptions};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(content: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content).unwrap();
    file
}

#[test]
fn test_well_formed_csv_round_trip() {
    let file = csv_file(
        b"First Name,Last Name,email,Company Name,tel\n\
          ada,lovelace,ada@example.com,Analytical Engines,(212) 555-0182\n\
          grace,hopper,grace@example.com,US Navy,(202) 555-0144\n\
          alan,turing,alan@example.com,Bletchley Park,(213) 555-0199\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    assert_eq!(report.data.len(), 3);
    assert!(report.errors.is_empty());
    assert_eq!(report.parse_stats.total_rows, 3);
    assert_eq!(report.parse_stats.processed_rows, 3);
    assert_eq!(report.parse_stats.success_rate, 100.0);

    let ada = &report.data[0];
    assert_eq!(ada.full_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(ada.email.as_deref(), Some("ada@example.com"));
    assert_eq!(ada.email_valid, Some(true));
    assert_eq!(ada.phone.as_deref(), Some("+12125550182"));
    assert_eq!(ada.phone_valid, Some(true));
    assert_eq!(ada.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(ada.source_file_row, 2);
    assert!(!ada.is_duplicate);
}

#[test]
fn test_latin1_file_requested_as_utf8_still_parses() {
    // "José" / "Münster" in latin-1, undecodable as UTF-8.
    let file = csv_file(b"name,city\nJos\xe9 Garc\xeda,M\xfcnster\n");
    let options = ParserOptions {
        encoding: Some("utf-8".to_string()),
        ..Default::default()
    };
    let report = process_file(file.path(), &options);

    assert!(report.success);
    assert_eq!(report.data.len(), 1);
    assert_eq!(
        report.data[0].full_name.as_deref(),
        Some("Jos\u{e9} Garc\u{ed}a")
    );
    assert_eq!(report.data[0].city.as_deref(), Some("M\u{fc}nster"));
}

#[test]
fn test_blank_and_all_null_rows_pruned_without_renumbering() {
    let file = csv_file(
        b"email,city\n\
          ada@example.com,London\n\
          NULL,N/A\n\
          bob@example.com,Leeds\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    assert_eq!(report.data.len(), 2);
    assert_eq!(report.data[0].source_file_row, 2);
    // Row 3 was all nulls and dropped; Bob keeps his file position.
    assert_eq!(report.data[1].source_file_row, 4);
}

#[test]
fn test_unknown_column_preserved_in_every_row() {
    let file = csv_file(
        b"email,Favorite Color\n\
          a@b.com,teal\n\
          c@d.com,mauve\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    for (lead, expected) in report.data.iter().zip(["teal", "mauve"]) {
        assert_eq!(
            lead.additional_data.get("Favorite Color").map(String::as_str),
            Some(expected)
        );
    }
}

#[test]
fn test_invalid_email_record_kept_and_flagged() {
    let file = csv_file(
        b"First Name,email\n\
          Ada,not-an-email\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    assert_eq!(report.data.len(), 1);
    assert_eq!(report.data[0].email.as_deref(), Some("not-an-email"));
    assert_eq!(report.data[0].email_valid, Some(false));
    assert!(report
        .cleaning_stats
        .warnings
        .iter()
        .any(|w| w.contains("appears to be invalid")));
}

#[test]
fn test_duplicate_emails_flagged_in_order() {
    let file = csv_file(
        b"email\n\
          x@example.com\n\
          y@example.com\n\
          X@EXAMPLE.COM\n",
    );
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(report.success);
    assert!(!report.data[0].is_duplicate);
    assert!(!report.data[1].is_duplicate);
    // Same address up to case; emails are lowercased during cleaning.
    assert!(report.data[2].is_duplicate);
    assert_eq!(report.cleaning_stats.duplicate_records, 1);
}

#[test]
fn test_explicit_delimiter_option() {
    let file = csv_file(b"email|city\na@b.com|Lagos\n");
    let options = ParserOptions {
        delimiter: Some('|'),
        ..Default::default()
    };
    let report = process_file(file.path(), &options);

    assert!(report.success);
    assert_eq!(report.data[0].email.as_deref(), Some("a@b.com"));
    assert_eq!(report.data[0].city.as_deref(), Some("Lagos"));
}

#[test]
fn test_duplicate_header_fails_structural_validation() {
    let file = csv_file(b"email,email\na@b.com,c@d.com\n");
    let report = process_file(file.path(), &ParserOptions::default());

    assert!(!report.success);
    assert!(report.data.is_empty());
    assert!(report.errors[0].contains("duplicate column names"));
}
