use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "checkin",
    version,
    about = "Check-in scoring, traffic-light and recurring window CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (defaults to ./checkin.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one submission from a JSON array of answers
    Score(ScoreCommand),
    /// Classify a 0-100 score as red, orange or green
    Classify(ClassifyCommand),
    /// Evaluate a recurring check-in window
    Window(WindowCommand),
    /// Aggregate a client's history from a JSON array of check-in records
    Progress(ProgressCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Profile {
    Lifestyle,
    Moderate,
    HighPerformance,
}

#[derive(Args)]
pub struct ScoreCommand {
    pub path: PathBuf,
    /// Print the per-answer breakdown as JSON
    #[arg(long)]
    pub breakdown: bool,
}

#[derive(Args)]
pub struct ClassifyCommand {
    pub score: u8,
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
    #[arg(long, requires = "orange_max")]
    pub red_max: Option<i32>,
    #[arg(long, requires = "red_max")]
    pub orange_max: Option<i32>,
}

#[derive(Args)]
pub struct WindowCommand {
    #[arg(long)]
    pub due: NaiveDate,
    #[arg(long, default_value = "")]
    pub start_day: String,
    #[arg(long, default_value = "")]
    pub start_time: String,
    #[arg(long)]
    pub disabled: bool,
    #[arg(long)]
    pub completed: bool,
    /// Local time to evaluate at, YYYY-MM-DDTHH:MM[:SS] (defaults to now)
    #[arg(long, value_parser = parse_local_time)]
    pub now: Option<NaiveDateTime>,
}

#[derive(Args)]
pub struct ProgressCommand {
    pub path: PathBuf,
    /// Reference day for streaks (defaults to today)
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Client timezone offset from UTC in minutes
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub utc_offset_minutes: i32,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

fn parse_local_time(raw: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got {raw}"))
}
