use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use rollcall_core::{
    Announcer, BleDiscovery, DiscoveryOptions, RosterEvent, ScanSession, SessionOptions,
};
use rollcall_store::ProfileStore;

mod format;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version, about = "Classroom attendance over BLE proximity", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a teacher scanning session until interrupted
    Scan {
        /// Seconds between discovery interactions
        #[arg(short, long, default_value = "5")]
        interval: u64,

        /// Seconds to listen for advertisements per interaction
        #[arg(short, long, default_value = "3")]
        window: u64,

        /// Only consider devices that advertise a name
        #[arg(long)]
        named_only: bool,
    },

    /// Announce a roll number from a student device
    Announce {
        /// Roll number to announce (defaults to the stored one)
        roll_number: Option<String>,
    },

    /// Show the stored roll number
    Whoami,

    /// Forget the stored roll number
    Forget,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Scan {
            interval,
            window,
            named_only,
        } => run_scan(interval, window, named_only).await,
        Commands::Announce { roll_number } => run_announce(roll_number),
        Commands::Whoami => run_whoami(),
        Commands::Forget => run_forget(),
    }
}

/// Teacher side: scan until Ctrl-C, then print the roster.
async fn run_scan(interval: u64, window: u64, named_only: bool) -> Result<()> {
    let options = DiscoveryOptions::new()
        .window(Duration::from_secs(window))
        .named_only(named_only);
    let discovery = BleDiscovery::new(options)
        .await
        .context("could not acquire a Bluetooth adapter")?;

    let session = ScanSession::new(
        Arc::new(discovery),
        SessionOptions::new().cycle_interval(Duration::from_secs(interval)),
    );
    let mut events = session.subscribe();

    session.start().await;
    println!("Scanning for student devices; press Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(RosterEvent::StudentRecorded { entry }) => {
                    println!(
                        "  {} present ({}, {})",
                        entry.roll_number,
                        entry.raw_label,
                        format::clock_time(entry.recorded_at),
                    );
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} event(s); live output may be incomplete", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.stop().await;

    println!();
    print!("{}", format::roster_table(&session.snapshot().await));
    Ok(())
}

/// Student side: validate, persist, and print the advertised name.
fn run_announce(roll_number: Option<String>) -> Result<()> {
    let store = ProfileStore::open_default();
    let stored = store.load()?.roll_number;

    let roll_number = roll_number.or(stored).context(
        "no roll number given and none stored; run `rollcall announce <ROLL_NUMBER>` once",
    )?;

    let mut announcer = Announcer::new();
    let advertised = announcer.start(&roll_number)?;
    store.remember_roll_number(&roll_number)?;

    println!("Announcing roll number {roll_number}.");
    println!("Peripheral-mode advertising is not supported on this platform, so make");
    println!("sure your device's Bluetooth name is \"{advertised}\" for teachers to detect you.");
    Ok(())
}

fn run_whoami() -> Result<()> {
    let store = ProfileStore::open_default();
    match store.load()?.roll_number {
        Some(roll_number) => println!("{roll_number}"),
        None => println!("No roll number stored."),
    }
    Ok(())
}

fn run_forget() -> Result<()> {
    let store = ProfileStore::open_default();
    store.forget_roll_number()?;
    println!("Stored roll number forgotten.");
    Ok(())
}
