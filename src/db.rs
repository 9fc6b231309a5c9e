//src/db.rs
use crate::record::WorkoutRecord;
use chrono::NaiveDate;
use rusqlite::{named_params, params, Connection, Row, ToSql};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DB_FILE_NAME: &str = "workouts.sqlite";
const APP_DATA_DIR: &str = "fitlog"; // Same dir name as config

/// A workout as stored in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: i64,
    pub name: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub date: NaiveDate,
}

impl Workout {
    #[must_use]
    pub fn to_record(&self) -> WorkoutRecord {
        WorkoutRecord::new(
            self.name.clone(),
            self.duration_minutes,
            self.calories_burned,
            Some(self.date),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout<'a> {
    pub name: &'a str,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub date: NaiveDate,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Workout entry not found: ID {0}")]
    WorkoutNotFound(i64),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
}

/// Gets the path to the SQLite database file within the app's data directory.
pub fn get_db_path() -> Result<PathBuf, Error> {
    let data_dir = dirs::data_dir().ok_or(Error::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
    Connection::open(path).map_err(Error::Connection)
}

/// Creates the workouts table and its index if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            duration_minutes REAL NOT NULL DEFAULT 0,
            calories_burned REAL NOT NULL DEFAULT 0,
            date TEXT NOT NULL -- YYYY-MM-DD
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts(date)",
        [],
    )?;
    Ok(())
}

pub fn add_workout(conn: &Connection, workout: &NewWorkout) -> Result<i64, Error> {
    conn.execute(
        "INSERT INTO workouts (name, duration_minutes, calories_burned, date)
         VALUES (:name, :duration, :calories, :date)",
        named_params! {
            ":name": workout.name,
            ":duration": workout.duration_minutes,
            ":calories": workout.calories_burned,
            ":date": workout.date,
        },
    )
    .map_err(Error::InsertFailed)?;
    Ok(conn.last_insert_rowid())
}

/// Inserts many workouts in one transaction. Returns how many rows were written.
pub fn add_workouts(conn: &mut Connection, workouts: &[NewWorkout]) -> Result<usize, Error> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO workouts (name, duration_minutes, calories_burned, date)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for workout in workouts {
            stmt.execute(params![
                workout.name,
                workout.duration_minutes,
                workout.calories_burned,
                workout.date
            ])
            .map_err(Error::InsertFailed)?;
        }
    }
    tx.commit()?;
    Ok(workouts.len())
}

pub fn delete_workout(conn: &Connection, id: i64) -> Result<usize, Error> {
    let rows = conn
        .execute("DELETE FROM workouts WHERE id = ?1", params![id])
        .map_err(Error::DeleteFailed)?;
    if rows == 0 {
        return Err(Error::WorkoutNotFound(id));
    }
    Ok(rows)
}

#[derive(Default, Debug, Clone, Copy)]
pub struct WorkoutFilters {
    pub start_date: Option<NaiveDate>, // inclusive
    pub end_date: Option<NaiveDate>,   // inclusive
    pub limit: Option<u32>,
}

/// Lists workouts newest first.
pub fn list_workouts_filtered(
    conn: &Connection,
    filters: &WorkoutFilters,
) -> Result<Vec<Workout>, Error> {
    let mut sql =
        "SELECT id, name, duration_minutes, calories_burned, date FROM workouts WHERE 1=1"
            .to_string();
    let mut params_map: HashMap<&str, Box<dyn ToSql>> = HashMap::new();

    if let Some(start) = filters.start_date {
        sql.push_str(" AND date >= :start_date");
        params_map.insert(":start_date", Box::new(start));
    }
    if let Some(end) = filters.end_date {
        sql.push_str(" AND date <= :end_date");
        params_map.insert(":end_date", Box::new(end));
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = filters.limit {
        sql.push_str(" LIMIT :limit");
        params_map.insert(":limit", Box::new(limit));
    }

    let params_for_query: Vec<(&str, &dyn ToSql)> = params_map
        .iter()
        .map(|(k, v)| (*k, v.as_ref()))
        .collect();

    let mut stmt = conn.prepare(&sql).map_err(Error::QueryFailed)?;
    let workout_iter = stmt
        .query_map(params_for_query.as_slice(), map_row_to_workout)
        .map_err(Error::QueryFailed)?;

    workout_iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::QueryFailed)
}

fn map_row_to_workout(row: &Row) -> Result<Workout, rusqlite::Error> {
    Ok(Workout {
        id: row.get(0)?,
        name: row.get(1)?,
        duration_minutes: row.get(2)?,
        calories_burned: row.get(3)?,
        date: row.get(4)?,
    })
}
