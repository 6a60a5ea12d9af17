mod replay;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use attempts::{AttemptsApi, HttpAttemptsApi, SyncAppConfig};
use clap::{Parser, Subcommand};
use console::style;
use tracing::info;
use tracing_subscriber::EnvFilter;

use replay::{ReplayOptions, describe_effect, load_frames, load_rows};

#[derive(Parser)]
#[command(name = "verdict-sync", version, about = "Replay and inspect live attempt verdicts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Feed a recorded push log through an attempts table.
    Replay {
        /// JSON array of attempts, as returned by the list endpoint.
        #[arg(long)]
        rows: PathBuf,
        /// One `{"event": ..., "payload": ...}` frame per line.
        #[arg(long)]
        events: PathBuf,
        /// Username of the viewer (overrides config).
        #[arg(long, env = "VERDICT_SYNC_VIEWER")]
        viewer: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        /// Treat the table as part of a running duel.
        #[arg(long)]
        duel: bool,
    },
    /// Fetch an attempt's full detail.
    Detail { id: i32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = SyncAppConfig::load().context("Failed to load config")?;
    let api: Arc<dyn AttemptsApi> =
        Arc::new(HttpAttemptsApi::new(&config.api).context("Failed to build API client")?);

    match cli.command {
        Command::Replay {
            rows,
            events,
            viewer,
            locale,
            duel,
        } => {
            let mut viewer_config = config.viewer.clone();
            if viewer.is_some() {
                viewer_config.username = viewer;
            }
            if let Some(locale) = locale {
                viewer_config.locale = locale;
            }

            let options = ReplayOptions {
                rows: load_rows(&rows)?,
                frames: load_frames(&events)?,
                viewer: viewer_config.viewer(),
                duel,
                effects: config.effects.clone(),
                echo: true,
            };
            info!(frames = options.frames.len(), rows = options.rows.len(), "Replaying");
            let report = replay::replay(api, options);

            println!();
            for row in &report.rows {
                println!(
                    "#{:<8} {:<20} {:<24} test={:<4} time={:<6} mem={:<8} balls={:<4} {}",
                    row.id,
                    style(row.verdict_code).bold(),
                    row.verdict_title,
                    opt(row.test_case_number),
                    opt(row.time),
                    opt(row.memory),
                    opt(row.balls),
                    row.language,
                );
            }
            println!(
                "{} effects, {} frames sent, {} lines skipped",
                report.effects.len(),
                report.sent.len(),
                report.skipped_lines
            );
            if let Some(last) = report.effects.last() {
                info!(last = %describe_effect(last), "Replay finished");
            }
        }
        Command::Detail { id } => {
            let detail = api
                .attempt(id)
                .await
                .with_context(|| format!("Failed to fetch attempt {id}"))?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
    }

    Ok(())
}

fn opt(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}
