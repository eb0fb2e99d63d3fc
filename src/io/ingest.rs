//! Capture CSV loading.
//!
//! The scope export has no schema we can rely on beyond "at least five
//! fields per row": the time coordinate sits in column 3 and the voltage in
//! column 4. Every row is treated as data. A header line is NOT skipped; if
//! one is present the first row fails to parse and the error names it.
//!
//! Unlike a screening ingest, a single bad row is fatal here: a capture with a
//! hole in it would silently shift every fixed window index after it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{info, trace};

use crate::domain::{ColumnLayout, SampleSeries};
use crate::error::AppError;

/// Load a capture file into a [`SampleSeries`].
pub fn load_capture(path: &Path, layout: &ColumnLayout) -> Result<SampleSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open capture '{}': {e}", path.display())))?;

    let series = read_capture(file, layout)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;

    info!("loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

/// Parse capture rows from any reader.
pub fn read_capture<R: Read>(reader: R, layout: &ColumnLayout) -> Result<SampleSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(layout.delimiter)
        .from_reader(reader);

    let mut time = Vec::new();
    let mut voltage = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        let record =
            result.map_err(|e| AppError::input(format!("line {line}: CSV read error: {e}")))?;

        let t = parse_field(&record, layout.time_column, line, "time")?;
        let v = parse_field(&record, layout.voltage_column, line, "voltage")?;
        trace!("line {line}: time={t} voltage={v}");

        time.push(t);
        voltage.push(v);
    }

    SampleSeries::new(time, voltage)
}

fn parse_field(record: &StringRecord, column: usize, line: usize, what: &str) -> Result<f64, AppError> {
    let raw = record.get(column).ok_or_else(|| {
        AppError::input(format!(
            "line {line}: missing {what} column {column} (row has {} fields)",
            record.len()
        ))
    })?;

    raw.trim().parse::<f64>().map_err(|e| {
        AppError::input(format!(
            "line {line}: {what} column {column} is not a number ('{raw}'): {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_INPUT;

    #[test]
    fn reads_columns_three_and_four() {
        let csv = "0,x,y,0.0,0.5\n1,x,y,0.1,0.25\n2,x,y,0.2,-1e-3\n";
        let series = read_capture(csv.as_bytes(), &ColumnLayout::default()).unwrap();
        assert_eq!(series.time(), &[0.0, 0.1, 0.2]);
        assert_eq!(series.voltage(), &[0.5, 0.25, -1e-3]);
    }

    #[test]
    fn header_row_is_treated_as_data() {
        let csv = "idx,a,b,time,voltage\n0,x,y,0.0,0.5\n";
        let err = read_capture(csv.as_bytes(), &ColumnLayout::default()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.message().contains("line 1"), "{err}");
        assert!(err.message().contains("'time'"), "{err}");
    }

    #[test]
    fn short_row_reports_missing_column() {
        let csv = "0,x,y,0.0,0.5\n1,x,y\n";
        let err = read_capture(csv.as_bytes(), &ColumnLayout::default()).unwrap_err();
        assert!(err.message().contains("line 2"), "{err}");
        assert!(err.message().contains("missing time column 3"), "{err}");
    }

    #[test]
    fn honors_custom_delimiter_and_columns() {
        let layout = ColumnLayout {
            time_column: 0,
            voltage_column: 1,
            delimiter: b';',
        };
        let series = read_capture("1.5;2.5\n".as_bytes(), &layout).unwrap();
        assert_eq!(series.time(), &[1.5]);
        assert_eq!(series.voltage(), &[2.5]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_capture(
            Path::new("/definitely/not/here/Data-Oscilloscope.csv"),
            &ColumnLayout::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.message().starts_with("Failed to open capture"));
    }
}
