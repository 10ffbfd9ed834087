// In app/src/main.rs

use anyhow::{Context, Result};
use api_client::PriceSeriesProvider;
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::Symbol;
use database::SignalReader;
use engine::Engine;
use strategies::{MACrossover, Marker, Strategy};
use tracing_subscriber::prelude::*;

mod logging;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Polls market prices and keeps a moving-average crossover signal per symbol.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the poll loop until the process is terminated.
    Run,

    /// Runs a single poll cycle and exits.
    Once,

    /// Prints the crossover markers and latest prediction for one symbol.
    Chart {
        /// The ticker to chart (e.g., "RELIANCE.NS").
        #[arg(short, long)]
        symbol: String,
    },

    /// Prints the persisted signal set.
    Show,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(logging::targets(&settings.app.log_level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!("Application settings loaded successfully.");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Run => build_engine(&settings).await?.run().await?,
        Commands::Once => {
            let report = build_engine(&settings).await?.run_cycle().await?;
            println!(
                "{} symbols, {} fresh, {} skipped, {} rows persisted{}",
                report.symbols,
                report.fresh,
                report.skipped.len(),
                report.persisted,
                if report.written { "" } else { " (write failed)" }
            );
        }
        Commands::Chart { symbol } => handle_chart(&settings, Symbol(symbol)).await?,
        Commands::Show => handle_show(&settings).await?,
    }

    Ok(())
}

/// Wires the configured strategy, provider and store into an `Engine`.
async fn build_engine(settings: &Settings) -> Result<Engine> {
    let zone = settings.timezone.offset()?;
    let strategy = MACrossover::new(settings.strategy).context("Invalid strategy settings")?;
    let provider = api_client::new(&settings.provider)?;
    let store = database::open_store(&settings.store).await?;

    Ok(Engine::new(
        settings.poll.clone(),
        zone,
        Box::new(strategy),
        Box::new(provider),
        store,
    ))
}

// --- "Chart" Subcommand Logic ---

/// Fetches one series and prints every crossover it contains, then the
/// classification of the latest bar.
async fn handle_chart(settings: &Settings, symbol: Symbol) -> Result<()> {
    let zone = settings.timezone.offset()?;
    let strategy = MACrossover::new(settings.strategy).context("Invalid strategy settings")?;
    let provider = api_client::new(&settings.provider)?;

    let bars = provider
        .fetch(&symbol, &settings.poll.period, &settings.poll.interval)
        .await?;
    let Some(last) = bars.last() else {
        println!("No data found for {symbol}.");
        return Ok(());
    };

    let markers: Vec<(Marker, &core_types::PriceBar)> = strategy
        .markers(&bars)?
        .zip(bars.iter())
        .filter(|(marker, _)| *marker != Marker::None)
        .collect();

    println!("Buy/Sell signals:");
    for wanted in [Marker::Buy, Marker::Sell] {
        for (_, bar) in markers.iter().filter(|(marker, _)| *marker == wanted) {
            println!(
                "{:?} at {:.2} on {}",
                wanted,
                bar.close,
                bar.timestamp.with_timezone(&zone)
            );
        }
    }

    let action = strategy.assess(&bars)?;
    println!("Prediction for {symbol}: {action} at price {:.2}", last.close);

    Ok(())
}

// --- "Show" Subcommand Logic ---

async fn handle_show(settings: &Settings) -> Result<()> {
    let store = database::open_store(&settings.store).await?;
    let signals = store.read().await?;

    println!("{}", database::COLUMNS.join(","));
    for signal in &signals {
        println!(
            "{},{},{},{:.2},{}",
            signal.symbol, signal.timestamp.to_rfc3339(), signal.action, signal.price, signal.status
        );
    }
    tracing::info!(count = signals.len(), "Signals listed.");

    Ok(())
}
