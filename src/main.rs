// src/main.rs
use anyhow::Result;
use clap::Parser;
use stock_chart_indicators::cli::{execute_command, Cli};
use stock_chart_indicators::utils::log_utils::init_logging;

fn main() -> Result<()> {
    // Initialize environment
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging("info");

    // Parse command line arguments
    let cli = Cli::parse();

    execute_command(cli)
}
