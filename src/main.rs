use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod chart;
mod client;
mod config;
mod dashboard;
mod models;
mod progress;
mod report;
mod status;

use client::HttpClient;
use config::Config;
use dashboard::{reload_ticker, Dashboard, DashboardViewState};
use progress::ProgressIndicator;

const FRAME_INTERVAL: Duration = Duration::from_millis(40);
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(name = "placement-dashboard")]
#[command(about = "Student placement prediction dashboard", long_about = None)]
struct Cli {
    /// Overrides PLACEMENT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dashboard once and print it
    Show {
        #[arg(long)]
        json: bool,
        /// Play the score indicator reveal before printing
        #[arg(long)]
        animate: bool,
    },
    /// Reload the dashboard on an interval
    Watch {
        /// Seconds between reloads; a slow load delays the next one instead of being cut short
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
    /// Write the prediction history chart series to CSV
    Chart {
        #[arg(long, default_value = "history.csv")]
        out: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.api_url)?;
    let dashboard = Dashboard::new(HttpClient::new(&config)?);

    match cli.command {
        Commands::Show { json, animate } => {
            let state = dashboard.load().await;
            let Some(summary) = state.summary() else {
                print!("{}", report::build_report(&state));
                anyhow::bail!("dashboard did not load");
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }
            if animate {
                let mut indicator = ProgressIndicator::new();
                indicator.set_percentage(summary.percentage, Instant::now());
                play_reveal(&indicator).await?;
            }
            print!("{}", report::build_report(&state));
        }
        Commands::Watch { interval_secs } => {
            let mut indicator = ProgressIndicator::new();
            let mut ticker = reload_ticker(Duration::from_secs(interval_secs.max(1)));

            loop {
                let state = dashboard.reload_on(&mut ticker).await;

                if let Some(summary) = state.summary() {
                    if indicator.set_percentage(summary.percentage, Instant::now()) {
                        play_reveal(&indicator).await?;
                    }
                }
                print!("{}", report::build_report(&state));
            }
        }
        Commands::Chart { out } => {
            let state = dashboard.load().await;
            let DashboardViewState::Ready { history, .. } = &state else {
                print!("{}", report::build_report(&state));
                anyhow::bail!("dashboard did not load");
            };

            let points = chart::build_series(history);
            chart::write_csv(&out, &points)?;
            if points.len() < chart::MIN_TREND_POINTS {
                println!("Only {} history point(s); not enough for a trend.", points.len());
            }
            println!("Chart series written to {}.", out.display());
        }
    }

    Ok(())
}

async fn play_reveal(indicator: &ProgressIndicator) -> std::io::Result<()> {
    let Some(arc) = indicator.geometry() else {
        return Ok(());
    };
    let mut stdout = std::io::stdout();

    loop {
        let now = Instant::now();
        write!(
            stdout,
            "\r{}{}{}",
            arc.color.ansi(),
            report::gauge(&arc, indicator.offset_at(now)),
            ANSI_RESET
        )?;
        stdout.flush()?;
        if indicator.is_settled(now) {
            break;
        }
        tokio::time::sleep(FRAME_INTERVAL).await;
    }

    writeln!(stdout)
}
