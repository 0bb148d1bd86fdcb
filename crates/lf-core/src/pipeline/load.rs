//! Delimited input loading.
//!
//! Reads a header row and keeps the four columns the analysis needs.
//! Extra columns are ignored; a missing required column is a load error.

use super::record::RawRecord;
use lf_common::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_SERVICE: &str = "Service";
pub const COL_LOG_LEVEL: &str = "LogLevel";
pub const COL_TIME_TAKEN: &str = "TimeTaken";

/// Required columns, in the order they are resolved.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_TIMESTAMP, COL_SERVICE, COL_LOG_LEVEL, COL_TIME_TAKEN];

/// Options for reading delimited input.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { delimiter: b',' }
    }
}

/// Load raw records from a file.
pub fn load_path(path: &Path, options: LoadOptions) -> Result<Vec<RawRecord>> {
    let file = File::open(path)
        .map_err(|e| Error::Load(format!("cannot open {}: {}", path.display(), e)))?;
    load_reader(file, options)
}

/// Load raw records from any reader.
pub fn load_reader<R: Read>(reader: R, options: LoadOptions) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::Load(format!("cannot read header: {}", e)))?
        .clone();

    let index_of = |column: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
            .ok_or_else(|| Error::MissingColumn {
                column: column.to_string(),
            })
    };
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = index_of(column)?;
    }
    let [ts_idx, svc_idx, lvl_idx, dur_idx] = indices;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| Error::Load(format!("row {}: {}", row, e)))?;

        let field = |idx: usize, column: &str| -> Result<String> {
            record.get(idx).map(str::to_string).ok_or_else(|| {
                Error::Load(format!(
                    "row {}: expected a {} field, found only {} field(s)",
                    row,
                    column,
                    record.len()
                ))
            })
        };

        records.push(RawRecord {
            row,
            timestamp: field(ts_idx, COL_TIMESTAMP)?,
            service: field(svc_idx, COL_SERVICE)?,
            log_level: field(lvl_idx, COL_LOG_LEVEL)?,
            time_taken: field(dur_idx, COL_TIME_TAKEN)?,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<Vec<RawRecord>> {
        load_reader(text.as_bytes(), LoadOptions::default())
    }

    #[test]
    fn reads_required_columns_in_any_order() {
        let records = load(
            "LogLevel,Host,TimeTaken,Service,Timestamp\n\
             INFO,web-1,10ms,auth,2024-01-01 00:00:00\n",
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.row, 1);
        assert_eq!(r.timestamp, "2024-01-01 00:00:00");
        assert_eq!(r.service, "auth");
        assert_eq!(r.log_level, "INFO");
        assert_eq!(r.time_taken, "10ms");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = load("Timestamp,Service,LogLevel\n2024-01-01,auth,INFO\n").unwrap_err();
        match err {
            Error::MissingColumn { column } => assert_eq!(column, "TimeTaken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_only_yields_no_records() {
        let records = load("Timestamp,Service,LogLevel,TimeTaken\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn short_row_is_a_load_error() {
        let err = load(
            "Timestamp,Service,LogLevel,TimeTaken\n\
             2024-01-01,auth,INFO,10ms\n\
             2024-01-01,auth\n",
        )
        .unwrap_err();
        assert_eq!(err.code(), 20);
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn honours_custom_delimiter() {
        let records = load_reader(
            "Timestamp;Service;LogLevel;TimeTaken\n2024-01-01;auth;ERROR;40ms\n".as_bytes(),
            LoadOptions { delimiter: b';' },
        )
        .unwrap();
        assert_eq!(records[0].log_level, "ERROR");
    }

    #[test]
    fn byte_order_mark_is_ignored_in_header() {
        let records = load("\u{feff}Timestamp,Service,LogLevel,TimeTaken\n2024-01-01,a,INFO,1ms\n")
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_path(Path::new("/nonexistent/levelfit/input.csv"), LoadOptions::default())
            .unwrap_err();
        assert_eq!(err.code(), 20);
    }
}
