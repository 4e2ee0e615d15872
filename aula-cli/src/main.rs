mod commands;
mod demo;
mod render;
mod utils;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aula")]
#[command(about = "Browse class schedules and replay in-class events from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the schedule window around a date
    Schedule {
        /// User whose schedule to show
        #[arg(short, long, default_value = "aluno-demo")]
        user: String,

        /// Center date (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        date: Option<String>,

        /// Window size in days (overrides the configured size)
        #[arg(long)]
        days: Option<u32>,

        /// Also print days without classes
        #[arg(long)]
        all: bool,
    },
    /// List the timed events attached to a class
    Events {
        /// Class id, as printed by the schedule listing
        class: String,
    },
    /// Replay a class against the wall clock and surface its events
    Play {
        /// Class id, as printed by the schedule listing
        class: String,

        /// Start position in seconds
        #[arg(long, default_value_t = 0.0)]
        from: f64,

        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr and stay quiet unless RUST_LOG asks for more;
    // stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule {
            user,
            date,
            days,
            all,
        } => {
            let center = resolve_date(date.as_deref())?;
            commands::schedule::run(&user, center, days, all).await
        }
        Commands::Events { class } => commands::events::run(&class).await,
        Commands::Play { class, from, speed } => commands::play::run(&class, from, speed).await,
    }
}

fn resolve_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("invalid date '{raw}', expected YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}
