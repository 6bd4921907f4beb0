//! Command-line front end for ipscope.
//!
//! Looks up where an IP address or domain is located, locates this machine,
//! and follows a device position over time.

mod cli;
mod config;
mod output;

use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use futures::StreamExt;
use ipscope_core::{distance_km, CanonicalRecord, LocatorService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for records
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_log_level(cli.verbose))))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Filter used when `RUST_LOG` is not set.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);

    let mut service = LocatorService::from_config(&config.locator);
    if let Some(device) = &config.device {
        tracing::debug!("Using configured device: {device:?}");
        service = service.with_device(device.build());
    }

    match cli.command {
        Command::Lookup { ref query } => {
            tracing::info!("Looking up {query}");
            let record = service.lookup(query).await?;
            print_record(&record, cli.json)?;
        }
        Command::Me => {
            let record = service.locate_me().await?;
            print_record(&record, cli.json)?;
        }
        Command::Watch { count } => watch(&service, count, cli.json).await?,
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let km = distance_km(lat1, lon1, lat2, lon2);
            if cli.json {
                println!("{}", serde_json::json!({ "distanceKm": km }));
            } else {
                println!("{km:.2} km");
            }
        }
    }

    Ok(())
}

fn print_record(record: &CanonicalRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print!("{}", output::render_record(record));
    }
    Ok(())
}

async fn watch(service: &LocatorService, count: usize, json: bool) -> Result<()> {
    let Some(mut watch) = service.watch_position() else {
        bail!("No device position configured; pass --position or set `device` in the config file");
    };

    let subscription = watch.start();
    let mut received = 0;
    while received < count {
        let Some(update) = subscription.next().await else {
            break;
        };
        received += 1;
        match update {
            Ok(fix) if json => println!("{}", serde_json::to_string(&fix)?),
            Ok(fix) => println!("{}", output::render_fix(&fix)),
            Err(e) => {
                watch.stop();
                bail!("{e}");
            }
        }
    }

    watch.stop();
    Ok(())
}
