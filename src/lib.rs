// src/lib.rs
use anyhow::{bail, Context, Result};
use chrono::{Duration, Months, NaiveDate};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// --- Declare modules ---
pub mod aggregate;
pub mod autocomplete;
pub mod catalog;
mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod record;
pub mod summary;

// --- Expose public types ---
pub use aggregate::{aggregate, day_labels, DayBucket, WindowDays};
pub use autocomplete::{
    transition, Attachment, AutocompleteController, AutocompleteEvent, AutocompleteState,
    InteractionHost, ListenerId, Transition,
};
pub use catalog::{search, CatalogEntry, Category, MAX_SUGGESTIONS};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, Error as ConfigError, StandardColor, Theme,
};
pub use db::{
    get_db_path as get_db_path_util, Error as DbError, NewWorkout, Workout, WorkoutFilters,
};
pub use import::{Error as ImportError, LogFormat};
pub use record::{Numeric, WorkoutRecord};
pub use summary::{lifetime_stats, summarize, ChartView, LifetimeStats, SummaryMetrics};

/// Which slice of the history to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryRange {
    #[default]
    All,
    /// The last seven days plus today.
    Week,
    /// From the same day one month ago through today.
    Month,
}

impl HistoryRange {
    /// Inclusive `(start, end)` bounds relative to `today`.
    #[must_use]
    pub fn bounds(self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            Self::All => (None, None),
            Self::Week => (today.checked_sub_signed(Duration::days(7)), Some(today)),
            Self::Month => (today.checked_sub_months(Months::new(1)), Some(today)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddWorkoutParams<'a> {
    pub name: &'a str,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    /// Defaults to the caller's `today` when absent.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub imported: usize,
    /// Records dropped because they had no usable date.
    pub skipped: usize,
}

pub struct AppService {
    pub config: Config,
    pub conn: Connection,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let conn = db::open_db(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        db::init_db(&conn).context("Failed to initialize database schema")?;

        Ok(Self {
            config,
            conn,
            db_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the window used by `chart` when none is given.
    /// # Errors
    /// - `ConfigError::InvalidWindow` unless `days` is 7, 30 or 90.
    /// - `ConfigError` variants if saving fails.
    pub fn set_default_window(&mut self, days: u32) -> Result<(), ConfigError> {
        let window = WindowDays::try_from(days).map_err(|_| ConfigError::InvalidWindow(days))?;
        self.config.default_window = window;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidColor` for unknown color names.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidLogLevel` for unknown levels.
    /// - `ConfigError` variants if saving fails.
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        if !logging::is_valid_level(level) {
            return Err(ConfigError::InvalidLogLevel(level.to_string()));
        }
        self.config.log_level = level.to_ascii_lowercase();
        self.save_config()
    }

    /// Logs a workout. A missing date means `today`; a name matching a catalog
    /// exercise (ignoring case) takes the catalog's spelling.
    /// # Errors
    /// Returns `anyhow::Error` for an empty name, negative or non-finite
    /// numbers, or a failed insert.
    pub fn add_workout(&self, params: &AddWorkoutParams, today: NaiveDate) -> Result<i64> {
        let name = params.name.trim();
        if name.is_empty() {
            bail!("Workout name cannot be empty.");
        }
        for (label, value) in [
            ("Duration", params.duration_minutes),
            ("Calories", params.calories_burned),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{label} must be a non-negative number, got {value}.");
            }
        }

        // Catalog exercises are stored with their catalog spelling.
        let name = catalog::find(name).map_or(name, |entry| entry.name);
        let workout = NewWorkout {
            name,
            duration_minutes: params.duration_minutes,
            calories_burned: params.calories_burned,
            date: params.date.unwrap_or(today),
        };
        let id = db::add_workout(&self.conn, &workout)
            .with_context(|| format!("Failed to log workout '{name}'"))?;
        info!(id, name, date = %workout.date, "logged workout");
        Ok(id)
    }

    /// Deletes every listed workout; fails on the first unknown id.
    /// # Errors
    /// Returns `DbError::WorkoutNotFound` (wrapped) for unknown ids.
    pub fn delete_workouts(&self, ids: &[i64]) -> Result<Vec<i64>> {
        let mut deleted = Vec::with_capacity(ids.len());
        for &id in ids {
            db::delete_workout(&self.conn, id)?;
            deleted.push(id);
        }
        info!(count = deleted.len(), "deleted workouts");
        Ok(deleted)
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn list_workouts(&self, filters: &WorkoutFilters) -> Result<Vec<Workout>> {
        db::list_workouts_filtered(&self.conn, filters).context("Failed to list workouts")
    }

    /// History for one range, newest first.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn history(
        &self,
        range: HistoryRange,
        today: NaiveDate,
        limit: Option<u32>,
    ) -> Result<Vec<Workout>> {
        let (start_date, end_date) = range.bounds(today);
        self.list_workouts(&WorkoutFilters {
            start_date,
            end_date,
            limit,
        })
    }

    /// Every stored workout as aggregation input.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn load_records(&self) -> Result<Vec<WorkoutRecord>> {
        Ok(self
            .list_workouts(&WorkoutFilters::default())?
            .iter()
            .map(Workout::to_record)
            .collect())
    }

    /// Stores imported records. Records without a usable date are skipped.
    /// # Errors
    /// Returns `anyhow::Error` if the insert transaction fails.
    pub fn import_records(&mut self, records: &[WorkoutRecord]) -> Result<ImportSummary> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let name = record.name.trim();
            match record.date {
                Some(date) if !name.is_empty() => rows.push(NewWorkout {
                    name,
                    duration_minutes: record.minutes(),
                    calories_burned: record.calories(),
                    date,
                }),
                _ => debug!(name = %record.name, "skipping record without name or date"),
            }
        }

        let skipped = records.len() - rows.len();
        if skipped > 0 {
            warn!(skipped, "some imported records had no usable name or date");
        }
        let imported =
            db::add_workouts(&mut self.conn, &rows).context("Failed to store imported workouts")?;
        info!(imported, skipped, "imported workout log");
        Ok(ImportSummary { imported, skipped })
    }

    /// Imports a `.csv` or `.json` log file.
    /// # Errors
    /// Returns `anyhow::Error` if the file cannot be read or stored.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        let records = import::read_log_file(path)
            .with_context(|| format!("Failed to read workout log {}", path.display()))?;
        self.import_records(&records)
    }

    /// Daily totals, labels and summary for the window ending at `today`.
    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn chart(&self, window_days: usize, today: NaiveDate) -> Result<ChartView> {
        let records = self.load_records()?;
        debug!(records = records.len(), window_days, %today, "building chart");
        Ok(ChartView::build(&records, window_days, today))
    }

    /// # Errors
    /// Returns `anyhow::Error` wrapping DB errors.
    pub fn lifetime_stats(&self, today: NaiveDate) -> Result<LifetimeStats> {
        let records = self.load_records()?;
        Ok(summary::lifetime_stats(&records, today))
    }
}
