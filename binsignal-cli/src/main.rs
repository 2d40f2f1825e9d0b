//! binsignal CLI — run a signal session, preview its queue, or send a recap.
//!
//! Commands:
//! - `run` — full session: greeting, queue, publish → wait → resolve, stats
//! - `scan` — build and print the session queue without publishing or waiting
//! - `recap` — send a win/loss summary from the statistics store

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use binsignal_core::data::{CircuitBreaker, DataSource, SyntheticSource, YahooSource};
use binsignal_core::notify::{format, NotificationSink, StdoutSink, TelegramSink};
use binsignal_runner::{
    assemble_queue, ConfigError, SessionConfig, SessionOrchestrator, SessionReport, StatsStore,
    TelegramCredentials, ThreadSleeper,
};

#[derive(Parser)]
#[command(
    name = "binsignal",
    about = "Timed binary-option signal sessions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full session and publish signals and results.
    Run {
        /// Path to a TOML config file. Environment variables override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print messages to stdout instead of sending them to Telegram.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Use the synthetic random-walk data source instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic data source.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Build and print the session queue without publishing or waiting.
    Scan {
        /// Path to a TOML config file. Environment variables override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the synthetic random-walk data source instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic data source.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Print the queue as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Send a win/loss recap from the statistics store.
    Recap {
        /// Path to a TOML config file. Environment variables override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of days to include, ending today.
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Print the recap to stdout instead of sending it to Telegram.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "binsignal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            synthetic,
            seed,
        } => run_session_cmd(config, dry_run, synthetic, seed),
        Commands::Scan {
            config,
            synthetic,
            seed,
            json,
        } => run_scan(config, synthetic, seed, json),
        Commands::Recap {
            config,
            days,
            dry_run,
        } => run_recap(config, days, dry_run),
    }
}

fn run_session_cmd(
    config_path: Option<PathBuf>,
    dry_run: bool,
    synthetic: bool,
    seed: u64,
) -> Result<()> {
    let config = SessionConfig::load(config_path.as_deref())?;
    let sink = build_sink(dry_run)?;
    let source = build_source(synthetic, seed)?;

    if config.outcome.is_simulated() {
        info!("simulated outcome mode: results are drawn at random, not measured");
    }

    let sleeper = ThreadSleeper;
    let mut orchestrator =
        SessionOrchestrator::new(&config, source.as_ref(), sink.as_ref(), &sleeper);
    if let Some(path) = &config.stats_path {
        orchestrator = orchestrator.with_stats(StatsStore::new(path));
    }
    let report = orchestrator.run()?;

    print_summary(&report);
    Ok(())
}

fn run_scan(config_path: Option<PathBuf>, synthetic: bool, seed: u64, json: bool) -> Result<()> {
    let config = SessionConfig::load(config_path.as_deref())?;
    let source = build_source(synthetic, seed)?;
    let (queue, origin) = assemble_queue(&config, source.as_ref());

    if json {
        let out = serde_json::json!({ "origin": origin, "queue": queue });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Queue ({origin:?}, {} of {}):", queue.len(), config.signals_per_session);
    if queue.is_empty() {
        println!("  no reliable signals");
    }
    for (i, s) in queue.iter().enumerate() {
        println!(
            "  {:>2}. {:<10} {:<4} strength {:>8.4}  {:<16} TF {}",
            i + 1,
            s.display_name,
            s.direction.as_str(),
            s.strength,
            s.strategy_label(),
            s.timeframe_used,
        );
    }
    Ok(())
}

fn run_recap(config_path: Option<PathBuf>, days: u32, dry_run: bool) -> Result<()> {
    if days == 0 {
        bail!("--days must be at least 1");
    }
    let config = SessionConfig::load(config_path.as_deref())?;
    let Some(path) = &config.stats_path else {
        bail!("no statistics file configured (set stats_path or STATS_PATH)");
    };
    let store = StatsStore::new(path);
    let recent = store.recent_days(Utc::now().date_naive(), days)?;

    let sink = build_sink(dry_run)?;
    sink.send(&format::recap(&recent))
        .with_context(|| format!("failed to send recap via {}", sink.name()))?;
    Ok(())
}

/// Telegram unless `dry_run`; a live run without credentials is a startup error.
fn build_sink(dry_run: bool) -> Result<Box<dyn NotificationSink>> {
    if dry_run {
        return Ok(Box::new(StdoutSink));
    }
    let creds = match TelegramCredentials::from_env() {
        Ok(creds) => creds,
        Err(ConfigError::MissingCredential(key)) => {
            bail!("{key} must be set (use --dry-run to print messages instead)")
        }
        Err(e) => return Err(e.into()),
    };
    Ok(Box::new(TelegramSink::new(creds.bot_token, creds.chat_id)?))
}

fn build_source(synthetic: bool, seed: u64) -> Result<Box<dyn DataSource>> {
    if synthetic {
        return Ok(Box::new(SyntheticSource::new(seed, Utc::now())));
    }
    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    Ok(Box::new(YahooSource::new(circuit_breaker)?))
}

fn print_summary(report: &SessionReport) {
    let short_id = report.session_id.get(..12).unwrap_or(&report.session_id);
    println!("=== Session {} ({short_id}) ===", report.label.title());
    println!("Queue origin:  {:?}", report.queue_origin);
    println!("Signals:       {}", report.queue.len());
    for outcome in &report.outcomes {
        println!(
            "  {:<10} {:<4} entry {:>10} exit {:>10} -> {}{}",
            outcome.signal.display_name,
            outcome.signal.direction.as_str(),
            fmt_price(outcome.entry_price),
            fmt_price(outcome.exit_price),
            outcome.result,
            if outcome.simulated { " (simulated)" } else { "" },
        );
    }
    let rate = report
        .tally
        .win_rate()
        .map(|r| format!("{r:.1}%"))
        .unwrap_or_else(|| "n/a".into());
    println!(
        "Result:        {}W / {}L / {} no price ({rate})",
        report.tally.wins, report.tally.losses, report.tally.no_price
    );
    if report.failed_sends > 0 {
        println!("Failed sends:  {}", report.failed_sends);
    }
}

fn fmt_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{p:.5}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from(["binsignal", "run", "--dry-run", "--synthetic"]).unwrap();
        match cli.command {
            Commands::Run {
                config,
                dry_run,
                synthetic,
                seed,
            } => {
                assert!(config.is_none());
                assert!(dry_run);
                assert!(synthetic);
                assert_eq!(seed, 42);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn recap_defaults_to_a_week() {
        let cli = Cli::try_parse_from(["binsignal", "recap"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Recap {
                days: 7,
                dry_run: false,
                ..
            }
        ));
    }

    #[test]
    fn scan_accepts_config_path() {
        let cli =
            Cli::try_parse_from(["binsignal", "scan", "--config", "bot.toml", "--json"]).unwrap();
        match cli.command {
            Commands::Scan { config, json, .. } => {
                assert_eq!(config, Some(PathBuf::from("bot.toml")));
                assert!(json);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["binsignal", "backtest"]).is_err());
    }

    #[test]
    fn missing_price_renders_as_dash() {
        assert_eq!(fmt_price(None), "-");
        assert_eq!(fmt_price(Some(1.2)), "1.20000");
    }
}
