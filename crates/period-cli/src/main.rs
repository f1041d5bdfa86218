//! `period`: query a recurring daily period from the shell.
//!
//! Every command prints one JSON object on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use period_engine::{DurationInfo, Instant, PeriodSchedule};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "period", version, about = "Timezone-aware recurring period queries")]
struct Cli {
    /// Period start time of day (HH:MM:SS)
    #[arg(long, required_unless_present = "config")]
    start: Option<String>,

    /// Period end time of day (HH:MM:SS); at or before start means overnight
    #[arg(long, required_unless_present = "config")]
    end: Option<String>,

    /// Comma-separated weekdays the period may start on (0 = Sunday)
    #[arg(long, value_delimiter = ',', conflicts_with = "config")]
    days: Option<Vec<i64>>,

    /// IANA zone name or UTC offset
    #[arg(long, default_value = "UTC", conflicts_with = "config")]
    tz: String,

    /// JSON schedule file: {"start", "end", "days", "timezone"}
    #[arg(long, conflicts_with_all = ["start", "end"])]
    config: Option<PathBuf>,

    /// Instant to evaluate: RFC 3339 (aware) or YYYY-MM-DDTHH:MM:SS (naive, read in
    /// the schedule's zone). Defaults to now.
    #[arg(long, global = true)]
    at: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Is the instant inside the period?
    Check,
    /// Next period start and the time until it
    NextStart,
    /// Next period end and the time until it
    NextEnd,
    /// Most recent period start and the time since it
    LastStart,
    /// Most recent period end and the time since it
    LastEnd,
    /// The current and natural windows for the instant
    Window,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let schedule = load_schedule(&cli)?;
    let instant = match &cli.at {
        Some(s) => Instant::parse(s)?,
        None => Instant::from(chrono::Utc::now()),
    };
    let local = schedule.localize_instant(Some(instant))?;

    let output = match cli.command {
        Command::Check => json!({
            "instant": local.to_rfc3339(),
            "timezone": schedule.timezone().name(),
            "in_period": schedule.is_in_period(instant),
        }),
        Command::NextStart => json!({
            "instant": local.to_rfc3339(),
            "next_start": schedule.next_start(instant)?.to_rfc3339(),
            "until": DurationInfo::from(schedule.duration_until_next_start(instant)?),
        }),
        Command::NextEnd => json!({
            "instant": local.to_rfc3339(),
            "next_end": schedule.next_end(instant)?.to_rfc3339(),
            "until": DurationInfo::from(schedule.duration_until_next_end(instant)?),
        }),
        Command::LastStart => json!({
            "instant": local.to_rfc3339(),
            "last_start": schedule.previous_start(instant)?.to_rfc3339(),
            "since": DurationInfo::from(schedule.duration_since_last_start(instant)?),
        }),
        Command::LastEnd => json!({
            "instant": local.to_rfc3339(),
            "last_end": schedule.previous_end(instant)?.to_rfc3339(),
            "since": DurationInfo::from(schedule.duration_since_last_end(instant)?),
        }),
        Command::Window => json!({
            "instant": local.to_rfc3339(),
            "schedule": schedule.to_config(),
            "current": schedule.current_window(instant),
            "natural": schedule.natural_window(instant),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_schedule(cli: &Cli) -> Result<PeriodSchedule> {
    if let Some(path) = &cli.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        return PeriodSchedule::from_json(&raw)
            .with_context(|| format!("invalid schedule in '{}'", path.display()));
    }

    // clap enforces both when --config is absent
    let start = cli.start.as_deref().unwrap_or_default();
    let end = cli.end.as_deref().unwrap_or_default();
    let mut builder = PeriodSchedule::builder(start, end).timezone(cli.tz.as_str());
    if let Some(days) = &cli.days {
        builder = builder.days(days.iter().copied());
    }
    Ok(builder.build()?)
}
