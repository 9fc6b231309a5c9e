//src/import.rs
//! Reading workout logs exported from other tools.
//!
//! Files are either CSV with a header row or a JSON array of record objects.
//! Field values are kept raw; the aggregation layer reads them defensively.

use crate::record::{parse_date, Numeric, WorkoutRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error reading log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read CSV log: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read JSON log: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV log has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("Unrecognised log format for {0:?} (expected .csv or .json)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Csv,
    Json,
}

impl LogFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnknownFormat(path.display().to_string())),
        }
    }
}

const NAME_COLUMNS: &[&str] = &["name", "exercise"];
const DURATION_COLUMNS: &[&str] = &["durationminutes", "duration_minutes", "duration", "duration_min"];
const CALORIES_COLUMNS: &[&str] = &["caloriesburned", "calories_burned", "calories"];
const DATE_COLUMNS: &[&str] = &["date"];

fn column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<WorkoutRecord>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let name_col = column(&headers, NAME_COLUMNS).ok_or(Error::MissingColumn("name"))?;
    let date_col = column(&headers, DATE_COLUMNS).ok_or(Error::MissingColumn("date"))?;
    let duration_col = column(&headers, DURATION_COLUMNS);
    let calories_col = column(&headers, CALORIES_COLUMNS);

    let field = |row: &csv::StringRecord, col: Option<usize>| -> Numeric {
        col.and_then(|c| row.get(c))
            .map_or(Numeric::Missing, Numeric::from)
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(WorkoutRecord {
            name: row.get(name_col).unwrap_or_default().to_string(),
            duration_minutes: field(&row, duration_col),
            calories_burned: field(&row, calories_col),
            date: row.get(date_col).and_then(parse_date),
        });
    }
    Ok(records)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<WorkoutRecord>, Error> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reads a log file, choosing the parser from its extension.
pub fn read_log_file(path: &Path) -> Result<Vec<WorkoutRecord>, Error> {
    let format = LogFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    match format {
        LogFormat::Csv => read_csv(reader),
        LogFormat::Json => read_json(reader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn csv_with_web_client_headers() {
        let data = "name,duration,calories,date\n\
                    Running,30,300,2024-05-15\n\
                    Yoga Flow, 45 ,lots,2024-05-14\n\
                    Hiking,90,500,someday\n";

        let records = read_csv(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].calories(), 300.0);
        assert_eq!(records[1].minutes(), 45.0);
        assert_eq!(records[1].calories(), 0.0);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 5, 14));
        assert_eq!(records[2].date, None);
    }

    #[test]
    fn csv_without_optional_columns() {
        let records = read_csv("Date,Name\n2024-01-02,Golf\n".as_bytes()).unwrap();
        assert_eq!(records[0].name, "Golf");
        assert_eq!(records[0].minutes(), 0.0);
    }

    #[test]
    fn csv_without_date_column_is_rejected() {
        let err = read_csv("name,calories\nRunning,100\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn("date")));
    }

    #[test]
    fn json_file_is_detected_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.JSON");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"name":"Tennis","durationMinutes":"60","caloriesBurned":420,"date":"2024-05-01"}}]"#
        )
        .unwrap();

        let records = read_log_file(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].minutes(), 60.0);
        assert!(matches!(
            read_log_file(&dir.path().join("log.txt")),
            Err(Error::UnknownFormat(_))
        ));
    }
}
