use anyhow::Result;
use chrono::NaiveDate;
use fitlog_lib::{
    AddWorkoutParams, AppService, Config, ConfigError, DbError, HistoryRange, Numeric,
    WindowDays, WorkoutFilters, WorkoutRecord,
};
use std::io::Write;

// Helper function to create a test service with in-memory database
fn create_test_service() -> Result<AppService> {
    let conn = rusqlite::Connection::open_in_memory()?;
    fitlog_lib::db::init_db(&conn)?;

    Ok(AppService {
        config: Config::default(),
        conn,
        db_path: ":memory:".into(),
        config_path: "test_config.toml".into(),
    })
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 5, 15)
}

fn log(service: &AppService, name: &str, minutes: f64, calories: f64, on: NaiveDate) -> Result<i64> {
    service.add_workout(
        &AddWorkoutParams {
            name,
            duration_minutes: minutes,
            calories_burned: calories,
            date: Some(on),
        },
        today(),
    )
}

#[test]
fn test_add_and_list_workouts_newest_first() -> Result<()> {
    let service = create_test_service()?;

    log(&service, "Running", 30.0, 300.0, date(2024, 5, 10))?;
    log(&service, "Yoga Flow", 45.0, 150.0, date(2024, 5, 14))?;
    log(&service, "Swimming", 60.0, 500.0, date(2024, 5, 12))?;

    let all = service.list_workouts(&WorkoutFilters::default())?;
    let names: Vec<_> = all.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Yoga Flow", "Swimming", "Running"]);

    let limited = service.history(HistoryRange::All, today(), Some(1))?;
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].name, "Yoga Flow");

    Ok(())
}

#[test]
fn test_add_workout_defaults_to_today_and_trims_name() -> Result<()> {
    let service = create_test_service()?;

    let id = service.add_workout(
        &AddWorkoutParams {
            name: "  Tennis ",
            duration_minutes: 60.0,
            calories_burned: 420.0,
            date: None,
        },
        today(),
    )?;

    let all = service.list_workouts(&WorkoutFilters::default())?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].name, "Tennis");
    assert_eq!(all[0].date, today());

    Ok(())
}

#[test]
fn test_add_workout_uses_catalog_spelling() -> Result<()> {
    let service = create_test_service()?;

    log(&service, "  push-UPS ", 10.0, 80.0, today())?;
    log(&service, "Garden Work", 60.0, 200.0, today())?;

    let names: Vec<_> = service
        .list_workouts(&WorkoutFilters::default())?
        .into_iter()
        .map(|w| w.name)
        .collect();
    assert_eq!(names, vec!["Garden Work", "Push-ups"]);

    Ok(())
}

#[test]
fn test_add_workout_rejects_bad_input() -> Result<()> {
    let service = create_test_service()?;

    assert!(log(&service, "   ", 30.0, 300.0, today()).is_err());
    assert!(log(&service, "Running", -5.0, 300.0, today()).is_err());
    assert!(log(&service, "Running", 30.0, f64::NAN, today()).is_err());
    assert!(service.list_workouts(&WorkoutFilters::default())?.is_empty());

    Ok(())
}

#[test]
fn test_history_ranges() -> Result<()> {
    let service = create_test_service()?;

    log(&service, "Today", 10.0, 10.0, today())?;
    log(&service, "Week Edge", 10.0, 10.0, date(2024, 5, 8))?;
    log(&service, "Too Old For Week", 10.0, 10.0, date(2024, 5, 7))?;
    log(&service, "Month Edge", 10.0, 10.0, date(2024, 4, 15))?;
    log(&service, "Too Old For Month", 10.0, 10.0, date(2024, 4, 14))?;

    let week = service.history(HistoryRange::Week, today(), None)?;
    let week_names: Vec<_> = week.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(week_names, vec!["Today", "Week Edge"]);

    let month = service.history(HistoryRange::Month, today(), None)?;
    assert_eq!(month.len(), 4);
    assert_eq!(month.last().map(|w| w.name.as_str()), Some("Month Edge"));

    assert_eq!(service.history(HistoryRange::All, today(), None)?.len(), 5);

    Ok(())
}

#[test]
fn test_delete_workouts() -> Result<()> {
    let service = create_test_service()?;

    let first = log(&service, "Running", 30.0, 300.0, today())?;
    let second = log(&service, "Cycling", 40.0, 350.0, today())?;

    assert_eq!(service.delete_workouts(&[first])?, vec![first]);
    let remaining = service.list_workouts(&WorkoutFilters::default())?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);

    let err = service.delete_workouts(&[999]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbError>(),
        Some(DbError::WorkoutNotFound(999))
    ));

    Ok(())
}

#[test]
fn test_chart_buckets_window_ending_today() -> Result<()> {
    let service = create_test_service()?;

    log(&service, "Running", 30.0, 300.0, today())?;
    log(&service, "Squats", 15.0, 100.0, today())?;
    log(&service, "Cycling", 40.0, 350.0, date(2024, 5, 13))?;
    log(&service, "Hiking", 90.0, 500.0, date(2024, 5, 8))?; // age 7, outside a week
    log(&service, "Golf", 120.0, 400.0, date(2024, 5, 16))?; // future

    let view = service.chart(7, today())?;

    assert_eq!(view.buckets.len(), 7);
    assert_eq!(view.labels.len(), 7);
    assert_eq!(view.labels[6], "Wed");
    assert_eq!(view.buckets[6].total_calories, 400.0);
    assert_eq!(view.buckets[6].total_duration_minutes, 45.0);
    assert_eq!(view.buckets[4].total_calories, 350.0);
    assert_eq!(view.buckets[0].total_calories, 0.0);

    assert_eq!(view.summary.total_calories, 750.0);
    assert_eq!(view.summary.peak_calories, 400.0);
    assert!((view.summary.average_calories - 750.0 / 7.0).abs() < 1e-9);

    let month = service.chart(WindowDays::Month.days(), today())?;
    assert_eq!(month.buckets.len(), 30);
    assert_eq!(month.labels[29], "May 15");
    assert_eq!(month.buckets[22].total_calories, 500.0);

    Ok(())
}

#[test]
fn test_chart_with_empty_log_and_empty_window() -> Result<()> {
    let service = create_test_service()?;

    let view = service.chart(90, today())?;
    assert_eq!(view.buckets.len(), 90);
    assert!(view.buckets.iter().all(|b| b.total_calories == 0.0));
    assert_eq!(view.summary.average_calories, 0.0);

    let none = service.chart(0, today())?;
    assert!(none.buckets.is_empty());
    assert!(none.labels.is_empty());
    assert_eq!(none.summary.total_calories, 0.0);

    Ok(())
}

#[test]
fn test_import_records_skips_undated_and_reads_lenient_numbers() -> Result<()> {
    let mut service = create_test_service()?;

    let records = vec![
        WorkoutRecord::new("Running", "30", "300", Some(date(2024, 5, 14))),
        WorkoutRecord::new("Rowing", Numeric::Missing, "lots", Some(today())),
        WorkoutRecord::new("Boxing", 45.0, 400.0, None),
        WorkoutRecord::new("", 10.0, 10.0, Some(today())),
    ];

    let summary = service.import_records(&records)?;
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 2);

    let view = service.chart(7, today())?;
    assert_eq!(view.buckets[5].total_calories, 300.0);
    assert_eq!(view.buckets[5].total_duration_minutes, 30.0);
    assert_eq!(view.buckets[6].total_calories, 0.0);

    Ok(())
}

#[test]
fn test_import_csv_file() -> Result<()> {
    let mut service = create_test_service()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("log.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "name,duration,calories,date")?;
    writeln!(file, "Running,30,300,2024-05-15")?;
    writeln!(file, "Tennis,60,420,2024-05-14T18:30:00Z")?;
    writeln!(file, "Golf,120,400,not a date")?;
    drop(file);

    let summary = service.import_file(&path)?;
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 1);

    let listed = service.history(HistoryRange::Week, today(), None)?;
    assert_eq!(listed[1].name, "Tennis");
    assert_eq!(listed[1].date, date(2024, 5, 14));

    assert!(service.import_file(&dir.path().join("log.txt")).is_err());

    Ok(())
}

#[test]
fn test_lifetime_stats() -> Result<()> {
    let service = create_test_service()?;

    let empty = service.lifetime_stats(today())?;
    assert_eq!(empty.total_workouts, 0);
    assert_eq!(empty.days_active, 0);
    assert_eq!(empty.first_workout_date, None);

    log(&service, "Running", 30.0, 300.0, date(2024, 5, 6))?;
    log(&service, "Yoga Flow", 45.0, 150.0, today())?;

    let stats = service.lifetime_stats(today())?;
    assert_eq!(stats.total_workouts, 2);
    assert_eq!(stats.total_calories, 450.0);
    assert_eq!(stats.total_duration_minutes, 75.0);
    assert_eq!(stats.days_active, 10);
    assert_eq!(stats.first_workout_date, Some(date(2024, 5, 6)));

    Ok(())
}

#[test]
fn test_config_operations() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut service = create_test_service()?;
    service.config_path = dir.path().join("config.toml");

    service.set_default_window(30)?;
    assert_eq!(service.config.default_window, WindowDays::Month);
    let err = service.set_default_window(14).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidWindow(14)));
    assert!(err.to_string().contains("7, 30 or 90"));

    service.set_header_color("darkcyan")?;
    assert_eq!(service.config.theme.header_color, "DarkCyan");
    assert!(matches!(
        service.set_header_color("Plaid"),
        Err(ConfigError::InvalidColor(_))
    ));

    service.set_log_level("DEBUG")?;
    assert_eq!(service.config.log_level, "debug");
    assert!(matches!(
        service.set_log_level("loud"),
        Err(ConfigError::InvalidLogLevel(_))
    ));

    let reloaded = fitlog_lib::load_config_util(&service.config_path)?;
    assert_eq!(reloaded, service.config);

    Ok(())
}
