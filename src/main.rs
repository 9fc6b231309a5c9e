//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdin, stdout, BufRead, Write};
use tracing::debug;

use fitlog_lib::{
    AddWorkoutParams, AppService, AutocompleteController, AutocompleteState, CatalogEntry,
    ChartView, DbError, HistoryRange, InteractionHost, LifetimeStats, ListenerId, Workout,
};

const BAR_WIDTH: usize = 30;

fn main() -> Result<()> {
    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    fitlog_lib::logging::init(&service.config.log_level, cli_args.verbose)?;
    debug!(db = ?service.get_db_path(), "service ready");

    // "Today" is read from the clock once, here, and passed down explicitly.
    let today = Local::now().date_naive();
    let header_color = service.config.theme.header();

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Add {
            name,
            duration,
            calories,
            date,
        } => {
            let params = AddWorkoutParams {
                name: &name,
                duration_minutes: duration,
                calories_burned: calories,
                date,
            };
            match service.add_workout(&params, today) {
                Ok(id) => println!(
                    "Successfully added workout '{}' on {} ID: {}",
                    name.trim(),
                    date.unwrap_or(today).format("%Y-%m-%d"),
                    id
                ),
                Err(e) => bail!("Error adding workout: {}", e),
            }
        }
        cli::Commands::Delete { ids } => match service.delete_workouts(&ids) {
            Ok(deleted) => println!("Successfully deleted workout ID(s) {deleted:?}."),
            Err(e) => {
                if let Some(DbError::WorkoutNotFound(id)) = e.downcast_ref::<DbError>() {
                    bail!("Workout ID {id} not found. Earlier IDs in the list were deleted.");
                }
                bail!("Error deleting workout: {}", e);
            }
        },
        cli::Commands::List { range, limit } => {
            let range = match range {
                cli::RangeCli::All => HistoryRange::All,
                cli::RangeCli::Week => HistoryRange::Week,
                cli::RangeCli::Month => HistoryRange::Month,
            };
            let workouts = service.history(range, today, limit)?;
            if export_csv {
                print_workout_csv(&workouts)?;
            } else if workouts.is_empty() {
                println!("No workouts found matching the criteria.");
            } else {
                print_workout_table(&workouts, header_color);
            }
        }
        cli::Commands::Import { file } => {
            let summary = service.import_file(&file)?;
            println!(
                "Imported {} workout(s) from {}.",
                summary.imported,
                file.display()
            );
            if summary.skipped > 0 {
                println!(
                    "Skipped {} record(s) with a missing name or unreadable date.",
                    summary.skipped
                );
            }
        }
        cli::Commands::Chart { days, today: as_of } => {
            let window = days.map_or(service.config.default_window.days(), |d| d.days() as usize);
            let view = service.chart(window, as_of.unwrap_or(today))?;
            if export_csv {
                print_chart_csv(&view)?;
            } else {
                print_chart(&view, header_color);
            }
        }
        cli::Commands::Stats => {
            let stats = service.lifetime_stats(today)?;
            if export_csv {
                print_stats_csv(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        cli::Commands::Search { query } => {
            let results = fitlog_lib::search(query.as_deref().unwrap_or(""));
            if export_csv {
                print_suggestion_csv(&results)?;
            } else if results.is_empty() {
                println!("No exercises match.");
            } else {
                print_suggestion_table(&results, None, header_color);
            }
        }
        cli::Commands::Pick => {
            if let Some(name) = run_picker(header_color)? {
                println!("Selected: {name}");
                println!("Log it with: fitlog add --name \"{name}\" --duration <min> --calories <kcal>");
            }
        }
        cli::Commands::SetWindow { days } => match service.set_default_window(days.days()) {
            Ok(()) => {
                println!("Default chart window set to {} days.", days.days());
                println!("Config file updated: {:?}", service.get_config_path());
            }
            Err(e) => bail!("Error setting chart window: {}", e),
        },
        cli::Commands::SetHeaderColor { color } => match service.set_header_color(&color) {
            Ok(()) => println!(
                "Header color set to {}. Config updated.",
                service.config.theme.header_color
            ),
            Err(e) => bail!("Error setting header color: {}", e),
        },
        cli::Commands::SetLogLevel { level } => match service.set_log_level(&level) {
            Ok(()) => println!("Log level set to {}. Config updated.", service.config.log_level),
            Err(e) => bail!("Error setting log level: {}", e),
        },
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
    }

    Ok(())
}

// --- Interactive picker ---

/// Line-driven host for the autocomplete controller. Outside interactions
/// (`:blur`) are only delivered while a listener is subscribed.
#[derive(Default)]
struct LineHost {
    next_id: u64,
    active: Vec<ListenerId>,
}

impl LineHost {
    fn delivers_outside_interaction(&self) -> bool {
        !self.active.is_empty()
    }
}

impl InteractionHost for LineHost {
    fn subscribe_outside_interaction(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.push(id);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.active.retain(|active| *active != id);
    }
}

fn run_picker(header_color: Color) -> Result<Option<String>> {
    let mut controller = AutocompleteController::new();
    let mut host = LineHost::default();
    let mut attachment = controller.attach(&mut host);

    println!("Type to filter. Commands: :down :up :enter :click N :esc :blur :focus :quit");
    render_picker(controller.on_focus(), header_color);

    let mut committed = None;
    let mut lines = stdin().lock().lines();
    loop {
        print!("> ");
        stdout().flush()?;
        let Some(line) = lines.next() else {
            break; // EOF
        };
        let line = line?;
        let outside_listening = attachment.host().delivers_outside_interaction();

        let state = match line.trim() {
            ":quit" => break,
            ":down" => controller.on_arrow_down(),
            ":up" => controller.on_arrow_up(),
            ":esc" => controller.on_escape(),
            ":focus" => controller.on_focus(),
            ":blur" if outside_listening => controller.on_outside_interaction(),
            ":blur" => controller.state(),
            ":enter" => {
                let (state, name) = controller.on_enter();
                committed = name;
                state
            }
            cmd if cmd.starts_with(":click") => {
                let Some(entry) = clicked_entry(controller.state(), cmd) else {
                    println!("Usage: :click N (N is a visible suggestion number)");
                    continue;
                };
                let (state, name) = controller.on_suggestion_click(entry);
                committed = name;
                state
            }
            _ => controller.on_query_change(line.as_str()),
        };
        render_picker(state, header_color);

        if committed.is_some() {
            break;
        }
    }

    controller.detach(attachment);
    Ok(committed)
}

fn clicked_entry(state: &AutocompleteState, cmd: &str) -> Option<CatalogEntry> {
    if !state.is_open {
        return None;
    }
    let n: usize = cmd.trim_start_matches(":click").trim().parse().ok()?;
    state.suggestions.get(n.checked_sub(1)?).copied()
}

fn render_picker(state: &AutocompleteState, header_color: Color) {
    if !state.is_open {
        println!("(closed) query: \"{}\"", state.query);
    } else if state.suggestions.is_empty() {
        println!("No exercises match \"{}\".", state.query);
    } else {
        print_suggestion_table(&state.suggestions, state.selected_index, header_color);
    }
}

// --- Table Printing Functions ---

fn print_workout_table(workouts: &[Workout], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Date").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Duration (min)").fg(header_color),
            Cell::new("Calories").fg(header_color),
        ]);

    for w in workouts {
        table.add_row(vec![
            Cell::new(w.id),
            Cell::new(w.date.format("%Y-%m-%d")),
            Cell::new(&w.name),
            Cell::new(format!("{:.0}", w.duration_minutes)),
            Cell::new(format!("{:.0}", w.calories_burned)),
        ]);
    }
    println!("{table}");
}

fn print_suggestion_table(entries: &[CatalogEntry], selected: Option<usize>, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Category").fg(header_color),
        ]);

    for (i, entry) in entries.iter().enumerate() {
        let mut name = Cell::new(entry.name);
        if selected == Some(i) {
            name = name.add_attribute(Attribute::Reverse);
        }
        table.add_row(vec![Cell::new(i + 1), name, Cell::new(entry.category)]);
    }
    println!("{table}");
}

fn bar(value: f64, peak: f64) -> String {
    if peak <= 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let len = ((value / peak) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len)
}

fn print_chart(view: &ChartView, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Day").fg(header_color),
            Cell::new("Calories").fg(header_color),
            Cell::new("").fg(header_color),
            Cell::new("Duration (min)").fg(header_color),
        ]);

    for (bucket, label) in view.buckets.iter().zip(&view.labels) {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format!("{:.0}", bucket.total_calories)),
            Cell::new(bar(bucket.total_calories, view.summary.peak_calories)),
            Cell::new(format!("{:.0}", bucket.total_duration_minutes)),
        ]);
    }
    println!(
        "Last {} days ending {}",
        view.buckets.len(),
        view.reference.format("%Y-%m-%d")
    );
    println!("{table}");

    let s = &view.summary;
    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (label, value) in [
        ("Total Calories", format!("{:.0}", s.total_calories)),
        ("Daily Average", format!("{:.0}", s.average_calories)),
        ("Peak Calories", format!("{:.0}", s.peak_calories)),
        ("Total Time", format!("{:.0}m", s.total_duration_minutes)),
        ("Average Time", format!("{:.1}m", s.average_duration_minutes)),
    ] {
        summary.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    println!("{summary}");
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or("N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn print_stats(stats: &LifetimeStats) {
    let total_minutes = stats.total_duration_minutes.round() as u64;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (label, value) in [
        ("Total Workouts", stats.total_workouts.to_string()),
        ("Total Calories", format!("{:.0}", stats.total_calories)),
        (
            "Total Time",
            format!("{}h {}m", total_minutes / 60, total_minutes % 60),
        ),
        ("Active Days", stats.days_active.to_string()),
        ("First Workout", format_date(stats.first_workout_date)),
    ] {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    println!("{table}");
}

// --- CSV Printing Functions ---

fn print_workout_csv(workouts: &[Workout]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["ID", "Date", "Name", "Duration_min", "Calories"])?;
    for w in workouts {
        writer.write_record([
            w.id.to_string(),
            w.date.format("%Y-%m-%d").to_string(),
            w.name.clone(),
            w.duration_minutes.to_string(),
            w.calories_burned.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_chart_csv(view: &ChartView) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Offset", "Label", "Calories", "Duration_min"])?;
    for (bucket, label) in view.buckets.iter().zip(&view.labels) {
        writer.write_record([
            bucket.offset_from_today.to_string(),
            label.clone(),
            bucket.total_calories.to_string(),
            bucket.total_duration_minutes.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_stats_csv(stats: &LifetimeStats) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Statistic", "Value"])?;
    writer.write_record(["Total_Workouts", &stats.total_workouts.to_string()])?;
    writer.write_record(["Total_Calories", &stats.total_calories.to_string()])?;
    writer.write_record(["Total_Duration_min", &stats.total_duration_minutes.to_string()])?;
    writer.write_record(["Days_Active", &stats.days_active.to_string()])?;
    writer.write_record(["First_Workout", &format_date(stats.first_workout_date)])?;
    writer.flush()?;
    Ok(())
}

fn print_suggestion_csv(entries: &[CatalogEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Name", "Category"])?;
    for entry in entries {
        writer.write_record([entry.name.to_string(), entry.category.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
