//src/summary.rs
use crate::aggregate::{aggregate, age_in_days, day_labels, DayBucket};
use crate::record::WorkoutRecord;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryMetrics {
    pub total_calories: f64,
    /// Total divided by the window length, not by the number of active days.
    pub average_calories: f64,
    pub peak_calories: f64,
    pub total_duration_minutes: f64,
    pub average_duration_minutes: f64,
}

/// Summarizes one aggregation window. An empty slice summarizes to zeros.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(buckets: &[DayBucket]) -> SummaryMetrics {
    if buckets.is_empty() {
        return SummaryMetrics::default();
    }
    let window = buckets.len() as f64;

    let total_calories: f64 = buckets.iter().map(|b| b.total_calories).sum();
    let total_duration_minutes: f64 = buckets.iter().map(|b| b.total_duration_minutes).sum();
    let peak_calories = buckets
        .iter()
        .map(|b| b.total_calories)
        .fold(0.0, f64::max);

    SummaryMetrics {
        total_calories,
        average_calories: total_calories / window,
        peak_calories,
        total_duration_minutes,
        average_duration_minutes: total_duration_minutes / window,
    }
}

/// Everything a chart renderer needs for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub reference: NaiveDate,
    pub buckets: Vec<DayBucket>,
    pub labels: Vec<String>,
    pub summary: SummaryMetrics,
}

impl ChartView {
    #[must_use]
    pub fn build(records: &[WorkoutRecord], window_days: usize, reference: NaiveDate) -> Self {
        let buckets = aggregate(records, window_days, reference);
        let summary = summarize(&buckets);
        Self {
            reference,
            labels: day_labels(window_days, reference),
            buckets,
            summary,
        }
    }
}

/// All-time totals across the whole log.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LifetimeStats {
    pub total_workouts: usize,
    pub total_calories: f64,
    pub total_duration_minutes: f64,
    /// Days from the earliest dated workout through `today`, inclusive.
    pub days_active: u64,
    pub first_workout_date: Option<NaiveDate>,
}

#[must_use]
pub fn lifetime_stats(records: &[WorkoutRecord], today: NaiveDate) -> LifetimeStats {
    let first_workout_date = records.iter().filter_map(|r| r.date).min();
    let days_active = first_workout_date.map_or(0, |first| {
        u64::try_from(age_in_days(first, today) + 1).unwrap_or(0)
    });

    LifetimeStats {
        total_workouts: records.len(),
        total_calories: records.iter().map(WorkoutRecord::calories).sum(),
        total_duration_minutes: records.iter().map(WorkoutRecord::minutes).sum(),
        days_active,
        first_workout_date,
    }
}
