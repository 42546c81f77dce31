//! Command-line front end for the fiscal printer driver.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use epson_fiscal as app;

use app::config::{ConfigLoadResult, DriverConfig};
use app::fiscal::{FiscalDriver, Severity, TcpTransport};

/// Protocol driver for serial fiscal printers behind a TCP bridge.
#[derive(Parser)]
#[command(name = "epson-fiscal")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the device and print its classified status.
    Status,
    /// Read the device clock.
    GetDatetime,
    /// Set the device clock to the host's local time.
    SetDatetime,
    /// Run a daily close report.
    DailyClose {
        /// Commit the fiscal day (Z close) instead of a report-only X close.
        #[arg(long)]
        z: bool,
    },
    /// Reprint the last document.
    Reprint,
    /// Cancel the document currently open on the device.
    Cancel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        DriverConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let config = match DriverConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => config,
        ConfigLoadResult::Missing => {
            DriverConfig::default()
                .save(&config_path)
                .context("failed to write default config")?;
            bail!(
                "no config found; wrote defaults to {} - edit it and run again",
                config_path.display()
            );
        }
        ConfigLoadResult::Invalid(e) => bail!("invalid config at {}: {e}", config_path.display()),
    };

    let mut transport = TcpTransport::new(&config.connection);
    transport.connect().await.context("failed to reach the device")?;
    let mut driver = FiscalDriver::new(transport, &config);

    let outcome = match cli.command {
        Command::Status => driver.request_status().await,
        Command::GetDatetime => {
            let cmd = driver.commands().get_date_time();
            let result = driver.execute(cmd).await;
            if let Ok(ref response) = result {
                // Data fields start after the two status words.
                let date = driver.decode_date(response, 3)?;
                let time = response.get_time(4)?;
                println!("Device clock: {date} {time}");
            }
            result
        }
        Command::SetDatetime => {
            let now = chrono::Local::now().naive_local();
            let cmd = driver.commands().set_date_time(now);
            println!("Setting device clock to {now}");
            driver.execute(cmd).await
        }
        Command::DailyClose { z } => {
            let doc_type = if z {
                app::fiscal::commands::DAILY_CLOSE_Z
            } else {
                app::fiscal::commands::DAILY_CLOSE_X
            };
            let cmd = driver.commands().daily_close(doc_type);
            driver.execute(cmd).await
        }
        Command::Reprint => {
            let cmd = driver.commands().reprint();
            driver.execute(cmd).await
        }
        Command::Cancel => {
            let cmd = driver.commands().cancel_document();
            driver.execute(cmd).await
        }
    };

    match outcome {
        Ok(_) => {
            print_report(&driver);
            Ok(())
        }
        Err(e) => {
            print_report(&driver);
            Err(e.into())
        }
    }
}

fn print_report<T: app::fiscal::Transport>(driver: &FiscalDriver<T>) {
    let snapshot = driver.snapshot();
    println!("Status words: printer=0x{:04X} fiscal=0x{:04X}", snapshot.printer, snapshot.fiscal);

    let report = driver.status_report();
    if report.is_empty() {
        println!("No active conditions");
        return;
    }
    for condition in report.conditions() {
        let tag = match condition.severity() {
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "ERROR",
        };
        println!("  [{tag}] {}", condition.message_key());
    }
    if report.paper_out() {
        println!("  paper out: replace the roll before printing further documents");
    }
}
