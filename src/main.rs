mod cli;

use checkin_engine::classify::{classify, classify_optional, profile_thresholds};
use checkin_engine::config;
use checkin_engine::error::EngineError;
use checkin_engine::progress::{aggregate_progress, ProgressContext};
use checkin_engine::report;
use checkin_engine::scoring::score_breakdown;
use checkin_engine::types::answer::QuestionAnswer;
use checkin_engine::types::config::EngineConfig;
use checkin_engine::types::record::CheckInRecord;
use checkin_engine::types::thresholds::{ThresholdProfile, ThresholdSetting};
use checkin_engine::types::window::RecurringWindow;
use checkin_engine::window::evaluate_availability;
use chrono::{FixedOffset, Local};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("checkin_engine={level},checkin={level}"))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    if !path.exists() {
        return Err(EngineError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn profile_of(profile: cli::Profile) -> ThresholdProfile {
    match profile {
        cli::Profile::Lifestyle => ThresholdProfile::Lifestyle,
        cli::Profile::Moderate => ThresholdProfile::Moderate,
        cli::Profile::HighPerformance => ThresholdProfile::HighPerformance,
    }
}

fn run(cli: cli::Cli) -> Result<i32, EngineError> {
    let cwd = std::env::current_dir()?;
    let loaded: EngineConfig = config::load_config(cli.config.as_deref(), &cwd)?;
    let policy = loaded.policy();

    match cli.command {
        cli::Commands::Score(cmd) => {
            let answers: Vec<QuestionAnswer> = read_json(&cmd.path)?;
            let breakdown = score_breakdown(&answers, &policy.scoring);
            info!(answers = answers.len(), total = ?breakdown.total, "scored submission");

            if cmd.breakdown {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
                return Ok(exit_code::SUCCESS);
            }

            let status = classify_optional(breakdown.total, &loaded.thresholds());
            match breakdown.total {
                Some(total) => println!("score: {total}"),
                None => println!("score: unscored"),
            }
            println!("status: {status}");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Classify(cmd) => {
            if cmd.score > 100 {
                return Err(EngineError::InvalidInput(format!(
                    "score must be between 0 and 100, got {}",
                    cmd.score
                )));
            }
            let thresholds = match (cmd.red_max, cmd.orange_max, cmd.profile) {
                (Some(red_max), Some(orange_max), profile) => ThresholdSetting {
                    profile: profile.map(profile_of).unwrap_or_default(),
                    ..ThresholdSetting::custom(red_max, orange_max)
                }
                .resolve(&policy),
                (_, _, Some(profile)) => profile_thresholds(profile_of(profile), &policy),
                _ => loaded.thresholds(),
            };
            println!("{}", classify(cmd.score, &thresholds));
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Window(cmd) => {
            let window = RecurringWindow {
                enabled: !cmd.disabled,
                start_day: cmd.start_day,
                start_time: cmd.start_time,
            };
            let now = cmd.now.unwrap_or_else(|| Local::now().naive_local());
            let evaluation = evaluate_availability(cmd.due, &window, now, cmd.completed, &policy);
            println!(
                "open: {}\nopened_at: {}\nmessage: {}",
                evaluation.is_open,
                evaluation.opened_at.format("%Y-%m-%d %H:%M"),
                evaluation.message
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Progress(cmd) => {
            let records: Vec<CheckInRecord> = read_json(&cmd.path)?;
            let offset = cmd
                .utc_offset_minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    EngineError::InvalidInput(format!(
                        "utc offset out of range: {} minutes",
                        cmd.utc_offset_minutes
                    ))
                })?;
            let today = cmd
                .today
                .unwrap_or_else(|| Local::now().with_timezone(&offset).date_naive());
            let ctx = ProgressContext::new(today, loaded.thresholds())
                .with_offset(offset)
                .with_policy(policy);

            let summary = aggregate_progress(&records, &ctx);
            let format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            println!("{}", report::render(&summary, format)?);
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                EngineError::Io(_) => exit_code::RUNTIME_FAILURE,
                _ => exit_code::INVALID_INPUT,
            };
            std::process::exit(code);
        }
    }
}
