//src/aggregate.rs
use crate::record::WorkoutRecord;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Totals for one calendar day inside an aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DayBucket {
    /// 0 is the oldest day of the window, `window_days - 1` is the reference day.
    pub offset_from_today: usize,
    pub total_calories: f64,
    pub total_duration_minutes: f64,
}

/// Chart windows offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum WindowDays {
    #[default]
    Week,
    Month,
    Quarter,
}

impl WindowDays {
    #[must_use]
    pub const fn days(self) -> usize {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// Accepted window lengths for messages, e.g. "7, 30 or 90".
    #[must_use]
    pub fn choices() -> String {
        let days: Vec<String> = Self::iter().map(|w| w.days().to_string()).collect();
        match days.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
            _ => days.concat(),
        }
    }
}

impl TryFrom<u32> for WindowDays {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            7 => Ok(Self::Week),
            30 => Ok(Self::Month),
            90 => Ok(Self::Quarter),
            other => Err(format!(
                "Unsupported window of {other} days (use {})",
                Self::choices()
            )),
        }
    }
}

impl From<WindowDays> for u32 {
    fn from(value: WindowDays) -> Self {
        match value {
            WindowDays::Week => 7,
            WindowDays::Month => 30,
            WindowDays::Quarter => 90,
        }
    }
}

impl fmt::Display for WindowDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days())
    }
}

/// Whole calendar days between `date` and `reference`; negative for future dates.
#[must_use]
pub fn age_in_days(date: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - date).num_days()
}

/// Buckets `records` into `window_days` daily totals ending at `reference`.
///
/// A record lands in bucket `window_days - 1 - age` when `0 <= age < window_days`.
/// Records that are older, dated in the future, or carry no usable date are
/// skipped. The returned vector always holds exactly `window_days` buckets.
#[must_use]
pub fn aggregate(
    records: &[WorkoutRecord],
    window_days: usize,
    reference: NaiveDate,
) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = (0..window_days)
        .map(|offset| DayBucket {
            offset_from_today: offset,
            ..DayBucket::default()
        })
        .collect();

    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        let Ok(age) = usize::try_from(age_in_days(date, reference)) else {
            continue; // future-dated
        };
        if age >= window_days {
            continue;
        }
        let bucket = &mut buckets[window_days - 1 - age];
        bucket.total_calories += record.calories();
        bucket.total_duration_minutes += record.minutes();
    }

    buckets
}

/// Axis labels aligned with the buckets of [`aggregate`].
///
/// Short windows read best as weekdays ("Mon"); anything longer than a week
/// uses month and day ("Oct 18").
#[must_use]
pub fn day_labels(window_days: usize, reference: NaiveDate) -> Vec<String> {
    let format = if window_days <= 7 { "%a" } else { "%b %-d" };
    (0..window_days)
        .rev()
        .map(|days_back| {
            let back = i64::try_from(days_back).unwrap_or(i64::MAX);
            reference
                .checked_sub_signed(Duration::days(back))
                .map_or_else(String::new, |day| day.format(format).to_string())
        })
        .collect()
}
