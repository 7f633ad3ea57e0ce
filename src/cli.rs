// src/cli.rs
use crate::cache::{BarRequest, BarSource, CsvBarCache, DAILY_INTERVAL};
use crate::config::EngineConfig;
use crate::overlay::{ChartOverlay, JsonOverlaySink, OverlaySink};
use crate::processor::IndicatorSet;
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "stock-indicators")]
#[command(about = "Compute chart indicator overlays from cached OHLCV bars", long_about = None)]
pub struct Cli {
    /// Config file (YAML, TOML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the standard indicator set for a symbol
    Compute {
        /// Symbol (e.g., "AAPL")
        #[arg(short, long)]
        symbol: String,

        /// Last date of the cached series (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Drop bars before this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Interval (e.g., "1d", "1h"); non-daily intervals read `{SYMBOL}_{interval}_{date}.csv`
        #[arg(short, long, default_value = DAILY_INTERVAL)]
        interval: String,

        /// Directory holding cached bar files, overrides the config
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write overlays to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads for indicator computation
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,
    },

    /// List the standard indicator set and its output fields
    List,
}

pub fn execute_command(cli: Cli) -> Result<()> {
    let mut config = EngineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compute {
            symbol,
            end_date,
            start_date,
            interval,
            data_dir,
            output,
            threads,
        } => {
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            let end_date = end_date.unwrap_or_else(|| Local::now().date_naive());
            let request = BarRequest::new(&symbol, start_date, end_date, &interval);
            if request.symbol.is_empty() {
                bail!("No stock code provided");
            }

            rayon::ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build_global()
                .context("Failed to configure the indicator thread pool")?;

            compute(&request, &config, output)
        }
        Commands::List => list(&config),
    }
}

fn compute(request: &BarRequest, config: &EngineConfig, output: Option<PathBuf>) -> Result<()> {
    let set = IndicatorSet::standard(&config.offsets)?;
    let source = CsvBarCache::new(config.data_dir.clone());

    info!(
        "Computing {} indicators for {} ({}) up to {}",
        set.len(),
        request.symbol,
        request.interval,
        request.end_date
    );

    let cycle = set.compute_cycle(source.load(request));
    if let Some(diagnostic) = &cycle.diagnostic {
        warn!("No data available for {}: {}", request.symbol, diagnostic);
    }

    let overlay = ChartOverlay::from_cycle(&request.symbol, set.indicators(), &cycle, config);

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).context(format!("Failed to create file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    JsonOverlaySink::new(writer)
        .publish(&overlay)
        .context("Failed to write indicator overlays")?;

    if let Some(path) = output {
        info!("Overlays for {} written to {}", request.symbol, path.display());
    }
    Ok(())
}

fn list(config: &EngineConfig) -> Result<()> {
    let set = IndicatorSet::standard(&config.offsets)?;
    let mut out = io::stdout().lock();

    for indicator in set.indicators() {
        writeln!(out, "{}", indicator)?;
        for field in indicator.field_names() {
            writeln!(out, "  {:<24} {}", field, config.color_for(&field))?;
        }
    }
    Ok(())
}
