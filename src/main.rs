//! Command-line entry point.

use clap::Parser;
use log::error;

use fabric_status::{run_analysis, Config};
use fabric_status::initialization::init_logger_with;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(e) = init_logger_with(config.log_level.clone().into(), config.log_format.clone()) {
        eprintln!("Failed to initialize logger: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_analysis(config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
