// src/cli.rs
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Log workouts, chart daily calories and pick exercises", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print tables as CSV instead
    #[arg(long, global = true)]
    pub export_csv: bool,

    /// Debug logging for this tool (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeCli {
    All,
    Week,
    Month,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowCli {
    #[value(name = "7")]
    Week,
    #[value(name = "30")]
    Month,
    #[value(name = "90")]
    Quarter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new workout entry
    Add {
        /// Name of the exercise (e.g., "Running"). Use `pick` to browse the catalog.
        #[arg(short, long)]
        name: String,
        /// Duration in minutes
        #[arg(short, long)]
        duration: f64,
        /// Calories burned
        #[arg(short, long)]
        calories: f64,
        /// Date of the workout (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Delete one or more workouts by ID
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// List logged workouts, newest first
    List {
        #[arg(short, long, value_enum, default_value_t = RangeCli::All)]
        range: RangeCli,
        /// Show only the last N entries
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Import a workout log (.csv or .json)
    Import { file: PathBuf },
    /// Daily calories and duration over a window ending today
    Chart {
        /// Window length in days (defaults to the configured window)
        #[arg(short, long, value_enum)]
        days: Option<WindowCli>,
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,
    },
    /// All-time totals
    Stats,
    /// Search the exercise catalog (no query shows popular exercises)
    Search { query: Option<String> },
    /// Pick an exercise interactively. Type text to filter; :down, :up, :enter,
    /// :esc, :blur, :focus and :quit drive the suggestion list.
    Pick,
    /// Set the default chart window
    SetWindow {
        #[arg(value_enum)]
        days: WindowCli,
    },
    /// Set the table header color (e.g. Green, Cyan, DarkGrey)
    SetHeaderColor { color: String },
    /// Set the log level used when RUST_LOG is unset
    SetLogLevel { level: String },
    /// Show the path to the config file
    ConfigPath,
    /// Show the path to the database file
    DbPath,
    /// Print a shell completion script
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl WindowCli {
    pub const fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
