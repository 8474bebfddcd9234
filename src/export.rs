//! CSV export of survey records.
//!
//! Produces a spreadsheet-friendly document: bilingual headers, every cell
//! quoted, line breaks and commas flattened out of free text, and a UTF-8
//! byte-order mark up front so Excel picks the right encoding.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use csv::{QuoteStyle, WriterBuilder};
use tracing::{debug, info};

use crate::survey::SurveyRecord;

/// Byte-order mark prefixed to every export.
pub const BOM: char = '\u{FEFF}';

/// Content type the transport should attach to an export.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Attachment filename the transport should suggest for an export.
pub const CSV_FILENAME: &str = "survey_data.csv";

/// Label written when "Other" was selected without any override text.
pub const EXPORT_OTHER_LABEL: &str = "Other";

/// Column headers, in output order.
pub const HEADERS: [&str; 9] = [
    "Name / नाम",
    "Contact / संपर्क",
    "Address / पता",
    "Preferred Party / पसंदीदा पार्टी",
    "AAP Candidate / आप उम्मीदवार",
    "BJP Candidate / भाजपा उम्मीदवार",
    "Congress Candidate / कांग्रेस उम्मीदवार",
    "Other Party Candidate / अन्य पार्टी उम्मीदवार",
    "Submission Date / जमा करने की तिथि",
];

/// Asia/Kolkata has been UTC+05:30 without DST since 1945.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Replaces CR, LF and commas with a space, then trims.
pub fn clean_cell(value: &str) -> String {
    value.replace(['\r', '\n', ','], " ").trim().to_string()
}

/// Renders a timestamp the way an `en-IN` locale shows Kolkata local time,
/// e.g. `5/1/2024, 2:35:03 pm`.
pub fn format_submission_date(at: &DateTime<Utc>) -> String {
    FixedOffset::east_opt(IST_OFFSET_SECS)
        .map(|ist| {
            at.with_timezone(&ist)
                .format("%-d/%-m/%Y, %-I:%M:%S %P")
                .to_string()
        })
        .unwrap_or_default()
}

/// Cells of one export row, in [`HEADERS`] order.
pub fn project_row(record: &SurveyRecord) -> [String; 9] {
    [
        clean_cell(&record.name),
        clean_cell(&record.contact),
        clean_cell(&record.address),
        clean_cell(record.preferred_party.resolve(EXPORT_OTHER_LABEL)),
        clean_cell(record.aap_candidate.resolve(EXPORT_OTHER_LABEL)),
        clean_cell(record.bjp_candidate.resolve(EXPORT_OTHER_LABEL)),
        clean_cell(&record.congress_candidate),
        clean_cell(&record.other_party_candidate),
        record
            .submitted_at
            .as_ref()
            .map(format_submission_date)
            .unwrap_or_default(),
    ]
}

/// Serializes records to a BOM-prefixed CSV document, one row per record in
/// input order.
///
/// # Errors
///
/// Only fails if the CSV writer does, which does not happen for an
/// in-memory buffer.
pub fn project_to_csv(records: &[SurveyRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for record in records {
        writer.write_record(project_row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to finish CSV export: {}", e.error()))?;
    let body = String::from_utf8(bytes).context("CSV export is not valid UTF-8")?;

    debug!(rows = records.len(), bytes = body.len(), "CSV export rendered");

    let mut csv = String::with_capacity(body.len() + BOM.len_utf8());
    csv.push(BOM);
    csv.push_str(&body);
    Ok(csv)
}

/// Writes the CSV export of `records` to `path`, replacing any existing file.
pub fn write_csv_file(path: &str, records: &[SurveyRecord]) -> Result<()> {
    let csv = project_to_csv(records)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {path}"))?;
    info!(path, rows = records.len(), "CSV export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{Choice, OTHER_SENTINEL};
    use chrono::TimeZone;
    use std::env;
    use std::fs;

    fn read_back(csv: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let body = csv.strip_prefix(BOM).expect("missing BOM");
        let mut reader = csv::Reader::from_reader(body.as_bytes());
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("A, B\nC"), "A  B C");
        assert_eq!(clean_cell("  line\r\n"), "line");
        assert_eq!(clean_cell(",,"), "");
    }

    #[test]
    fn test_format_submission_date_in_kolkata() {
        let afternoon = Utc.with_ymd_and_hms(2024, 1, 5, 9, 5, 3).unwrap();
        assert_eq!(format_submission_date(&afternoon), "5/1/2024, 2:35:03 pm");

        let midnight = Utc.with_ymd_and_hms(2024, 11, 30, 18, 30, 0).unwrap();
        assert_eq!(format_submission_date(&midnight), "1/12/2024, 12:00:00 am");
    }

    #[test]
    fn test_empty_export_is_bom_and_header() {
        let csv = project_to_csv(&[]).unwrap();

        assert!(csv.starts_with('\u{FEFF}'));
        let (headers, rows) = read_back(&csv);
        assert_eq!(headers, HEADERS);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_name_with_comma_and_newline() {
        let record = SurveyRecord {
            name: "A, B\nC".into(),
            preferred_party: Choice::Fixed("X".into()),
            ..Default::default()
        };
        let csv = project_to_csv(&[record]).unwrap();

        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.starts_with("\"A  B C\",\"\",\"\",\"X\""));
        assert!(data_line.ends_with(",\"\""));

        let (_, rows) = read_back(&csv);
        assert_eq!(rows[0][0], "A  B C");
        assert_eq!(rows[0][8], "");
    }

    #[test]
    fn test_blank_record_is_row_of_empty_quoted_cells() {
        let csv = project_to_csv(&[SurveyRecord::default()]).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        assert_eq!(data_line, vec!["\"\""; 9].join(","));
    }

    #[test]
    fn test_other_fallback_label() {
        let record = SurveyRecord {
            preferred_party: Choice::from_raw(OTHER_SENTINEL.into(), None),
            aap_candidate: Choice::from_raw(OTHER_SENTINEL.into(), Some("Write, In".into())),
            bjp_candidate: Choice::from_raw(OTHER_SENTINEL.into(), Some(String::new())),
            ..Default::default()
        };
        let (_, rows) = read_back(&project_to_csv(&[record]).unwrap());

        assert_eq!(rows[0][3], "Other");
        assert_eq!(rows[0][4], "Write  In");
        assert_eq!(rows[0][5], "Other");
    }

    #[test]
    fn test_round_trip_recovers_cleaned_values() {
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let records = vec![
            SurveyRecord {
                name: "  \"Quoted\" name ".into(),
                contact: "12,34\r\n56".into(),
                address: "House 5\nLane \"B\"".into(),
                preferred_party: Choice::Fixed("AAP".into()),
                congress_candidate: "C\"C".into(),
                submitted_at: Some(at),
                ..Default::default()
            },
            SurveyRecord {
                other_party_candidate: "नाम, उपनाम".into(),
                ..Default::default()
            },
        ];

        let (_, rows) = read_back(&project_to_csv(&records).unwrap());

        assert_eq!(rows.len(), 2);
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row.as_slice(), project_row(record).as_slice());
        }
        assert_eq!(rows[0][0], "\"Quoted\" name");
        assert_eq!(rows[0][1], "12 34  56");
        assert_eq!(rows[0][8], "1/2/2025, 5:30:00 am");
        assert_eq!(rows[1][7], "नाम  उपनाम");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        let record = SurveyRecord {
            name: "say \"hi\"".into(),
            ..Default::default()
        };
        let csv = project_to_csv(&[record]).unwrap();
        assert!(csv.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_rows_keep_input_order() {
        let records: Vec<_> = ["first", "second", "third"]
            .iter()
            .map(|n| SurveyRecord {
                name: n.to_string(),
                ..Default::default()
            })
            .collect();
        let (_, rows) = read_back(&project_to_csv(&records).unwrap());
        let names: Vec<_> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_write_csv_file() {
        let path = format!("{}/survey_collector_export_test.csv", env::temp_dir().display());
        let _ = fs::remove_file(&path);

        write_csv_file(&path, &[SurveyRecord::default()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('\u{FEFF}'));
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
