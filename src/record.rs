//src/record.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A numeric field exactly as it came out of the log store.
///
/// The web client stores calories and duration as whatever the form produced,
/// so a value can be a JSON number, a numeric string, junk text or nothing.
/// Read it through [`Numeric::value`], which never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumeric {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

// Booleans, objects, arrays and null all land in `Missing`.
impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawNumeric::deserialize(deserializer)? {
            RawNumeric::Number(n) => Self::Number(n),
            RawNumeric::Text(s) => Self::Text(s),
            RawNumeric::Other(_) => Self::Missing,
        })
    }
}

impl Numeric {
    /// Defensive read: anything that is not a finite, positive number counts as 0.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(n) => non_negative(*n),
            Self::Text(s) => s.trim().parse::<f64>().map_or(0.0, non_negative),
            Self::Missing => 0.0,
        }
    }
}

fn non_negative(n: f64) -> f64 {
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Numeric {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Numeric {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Missing => Ok(()),
        }
    }
}

/// One logged workout as read from the store or an imported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "duration", alias = "duration_minutes")]
    pub duration_minutes: Numeric,
    #[serde(default, alias = "calories", alias = "calories_burned")]
    pub calories_burned: Numeric,
    /// `None` when the source date was missing or unreadable.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
}

impl WorkoutRecord {
    pub fn new(
        name: impl Into<String>,
        duration_minutes: impl Into<Numeric>,
        calories_burned: impl Into<Numeric>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            duration_minutes: duration_minutes.into(),
            calories_burned: calories_burned.into(),
            date,
        }
    }

    #[must_use]
    pub fn minutes(&self) -> f64 {
        self.duration_minutes.value()
    }

    #[must_use]
    pub fn calories(&self) -> f64 {
        self.calories_burned.value()
    }
}

/// Parses the date formats the log store has been seen to emit:
/// plain ISO dates, RFC 3339 timestamps and offset-less ISO timestamps.
/// Only the calendar date is kept.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDate>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDate::Text(s)) => parse_date(&s),
        Some(RawDate::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(Numeric::from("300").value(), 300.0);
        assert_eq!(Numeric::from(" 42.5 ").value(), 42.5);
        assert_eq!(Numeric::from(30i64).value(), 30.0);
    }

    #[test]
    fn junk_numbers_read_as_zero() {
        assert_eq!(Numeric::from("abc").value(), 0.0);
        assert_eq!(Numeric::from("").value(), 0.0);
        assert_eq!(Numeric::from("NaN").value(), 0.0);
        assert_eq!(Numeric::from(f64::INFINITY).value(), 0.0);
        assert_eq!(Numeric::from(-20.0).value(), 0.0);
        assert_eq!(Numeric::Missing.value(), 0.0);
    }

    #[test]
    fn dates_keep_only_the_calendar_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024-03-09T23:59:00Z"), expected);
        assert_eq!(parse_date("2024-03-09T06:15:00.250"), expected);
        assert_eq!(parse_date("09/03/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn deserializes_web_client_shape() {
        let json = r#"{"name":"Running","duration":"30","calories":300,"date":"2024-03-09"}"#;
        let record: WorkoutRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Running");
        assert_eq!(record.minutes(), 30.0);
        assert_eq!(record.calories(), 300.0);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 9));
    }

    #[test]
    fn bad_date_does_not_reject_record() {
        let json = r#"{"name":"Yoga Flow","durationMinutes":45,"caloriesBurned":null,"date":17}"#;
        let record: WorkoutRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, None);
        assert_eq!(record.calories(), 0.0);

        let missing: WorkoutRecord = serde_json::from_str(r#"{"name":"Hiking"}"#).unwrap();
        assert_eq!(missing.date, None);
        assert_eq!(missing.minutes(), 0.0);
    }

    #[test]
    fn odd_number_types_do_not_reject_the_log() {
        let json = r#"[
            {"name":"Rowing","durationMinutes":true,"caloriesBurned":250,"date":"2024-03-09"},
            {"name":"Boxing","durationMinutes":[40],"caloriesBurned":{"kcal":200},"date":"2024-03-10"}
        ]"#;

        let records: Vec<WorkoutRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].minutes(), 0.0);
        assert_eq!(records[0].calories(), 250.0);
        assert_eq!(records[1].duration_minutes, Numeric::Missing);
        assert_eq!(records[1].calories(), 0.0);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 3, 10));
    }
}
