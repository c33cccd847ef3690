//! CSV export of accumulated scan results.

use std::io;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::asset::MatchResult;
use crate::error::{Result, ScanError};

/// Column headers, in column order.
pub const CSV_HEADER: [&str; 6] = [
    "Media ID",
    "Filename",
    "Title Text",
    "Alt Text",
    "Description",
    "Source",
];

/// Write `results` as CSV with a header row, one row per result in the
/// given order. Unmatched results export their source as `Unknown`.
pub fn write_csv<'a, W: io::Write>(
    writer: W,
    results: impl IntoIterator<Item = &'a MatchResult>,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for result in results {
        let asset = &result.asset;
        wtr.write_record([
            asset.id.to_string().as_str(),
            asset.filename.as_str(),
            asset.title.as_str(),
            asset.alt_text.as_str(),
            asset.description.as_str(),
            result.source_label(),
        ])?;
        rows += 1;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(rows)
}

/// Render `results` as a CSV document.
pub fn to_csv_string<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, results)?;
    String::from_utf8(buf).map_err(|e| ScanError::InvalidInput(format!("CSV is not UTF-8: {e}")))
}

/// Download name for an export: `<label>-media-copyright-scan-<timestamp>.csv`.
pub fn export_filename(label: &str, at: DateTime<Utc>) -> String {
    format!(
        "{label}-media-copyright-scan-{}.csv",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
