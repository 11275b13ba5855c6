use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;

use navrank_client::config::BASE_URL_ENV;
use navrank_client::{ClientConfig, HttpCoordinator};
use navrank_model::Timeframe;

mod config;
mod format;
mod output;

use config::CtlConfig;

#[derive(Debug, Parser)]
#[command(
    name = "navrankctl",
    version,
    about = "Explore Indian mutual-fund sector rankings from the terminal"
)]
struct Cli {
    /// Backend address. Overrides NAVRANK_API_BASE and the saved config.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the sectors the backend can rank
    Sectors {
        /// Refresh the catalog on the backend before listing
        #[arg(long)]
        refresh: bool,
    },
    /// Compute (or fetch) the ranking for a sector with live progress
    Rank {
        sector: String,
        /// Bypass caches and recompute
        #[arg(long)]
        refresh: bool,
        /// Return window for the full table: 1y, 3y or 5y
        #[arg(long, default_value = "1y")]
        timeframe: String,
    },
    /// Look up a fund by scheme code or name
    Fund {
        query: String,
        /// Also show the fund's position within its sector ranking
        #[arg(long)]
        sector: bool,
    },
    /// Pre-classify the fund universe on the backend
    Preload {
        /// Show the current preload state instead of triggering a run
        #[arg(long)]
        status: bool,
    },
    /// Show or set the display theme (light/dark)
    Theme { value: Option<String> },
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("navrank", LevelFilter::Info)
        .init();
}

fn parse_timeframe(value: &str) -> anyhow::Result<Timeframe> {
    match value.to_ascii_lowercase().as_str() {
        "1y" | "oneyear" => Ok(Timeframe::OneYear),
        "3y" | "threeyear" => Ok(Timeframe::ThreeYear),
        "5y" | "fiveyear" => Ok(Timeframe::FiveYear),
        other => bail!("unknown timeframe {other:?}, expected 1y, 3y or 5y"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let ctl_config = CtlConfig::load();

    let base_url = cli
        .server
        .clone()
        .or_else(|| {
            std::env::var(BASE_URL_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
        })
        .unwrap_or_else(|| ctl_config.server_url.clone());
    let client_config = ClientConfig {
        base_url,
        ..ClientConfig::default()
    };

    match cli.command {
        Command::Sectors { refresh } => {
            let coordinator = HttpCoordinator::from_config(&client_config);
            let catalog = coordinator
                .load_catalog(refresh)
                .await
                .context("failed to load sector catalog")?;
            output::print_catalog(&catalog);

            // Preload state is informational; ignore a backend that lacks it.
            if let Ok(status) = coordinator.api().preload_status().await {
                if status.preloaded {
                    if let Some(metadata) = status.metadata {
                        println!(
                            "Pre-classified: {} funds{}",
                            metadata.classified_funds,
                            metadata
                                .generated_at
                                .map(|t| format!(
                                    " (refreshed {})",
                                    t.format("%Y-%m-%d %H:%M UTC")
                                ))
                                .unwrap_or_default()
                        );
                    }
                }
            }
        }

        Command::Rank {
            sector,
            refresh,
            timeframe,
        } => {
            let timeframe = parse_timeframe(&timeframe)?;
            let coordinator = Arc::new(HttpCoordinator::from_config(&client_config));
            coordinator.watch(sector.clone());

            let printer = {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    let mut ticker =
                        tokio::time::interval(Duration::from_millis(250));
                    loop {
                        ticker.tick().await;
                        if let Some(progress) = coordinator.lifecycle().progress {
                            eprint!("\r{:<100}", format::progress_line(&progress));
                        }
                    }
                })
            };

            let result = coordinator.request(&sector, refresh).await;
            printer.abort();
            eprintln!();

            let ranking = result
                .with_context(|| format!("ranking for {sector:?} failed"))?;
            output::print_leaderboard(&ranking);
            println!();
            output::print_ranking_table(&ranking, timeframe);
        }

        Command::Fund { query, sector } => {
            let coordinator = HttpCoordinator::from_config(&client_config);
            if sector {
                let view = coordinator
                    .api()
                    .fund_sector_ranking(&query)
                    .await
                    .with_context(|| format!("fund lookup for {query:?} failed"))?;
                output::print_fund_sector(&view);
            } else {
                let details = coordinator
                    .api()
                    .fund_details(&query)
                    .await
                    .with_context(|| format!("fund lookup for {query:?} failed"))?;
                output::print_fund(&details);
            }
        }

        Command::Preload { status } => {
            let coordinator = HttpCoordinator::from_config(&client_config);
            if status {
                let state = coordinator
                    .api()
                    .preload_status()
                    .await
                    .context("failed to fetch preload status")?;
                if state.preloaded {
                    let funds = state
                        .metadata
                        .map(|m| m.classified_funds)
                        .unwrap_or_default();
                    println!("Preloaded: {funds} funds classified");
                } else {
                    println!("Not preloaded yet");
                }
            } else {
                println!("Triggering preload (this can take a while)...");
                let metadata = coordinator
                    .api()
                    .trigger_preload()
                    .await
                    .context("preload failed")?;
                println!(
                    "Preload complete! {} funds classified.",
                    metadata.classified_funds
                );
            }
        }

        Command::Theme { value } => match value {
            Some(theme) => {
                if theme != "light" && theme != "dark" {
                    bail!("unknown theme {theme:?}, expected light or dark");
                }
                let mut config = ctl_config;
                config.theme = theme.clone();
                config.save().context("failed to persist theme")?;
                println!("Theme set to {theme}");
            }
            None => println!("Theme: {}", ctl_config.theme),
        },
    }

    Ok(())
}
