//! district - Le District CLI
//!
//! # Examples
//!
//! ```bash
//! district sign-in awa@district.ci --password secret1
//! district feed
//! district post "Campagne de vaccination samedi"
//! district directory --district Korhogo --specialty nurse
//! ```

use ld_cli::{App, Cli, Result as CliErrorResult, logger};

use std::process::ExitCode;

use clap::Parser;
use ld_config::{Config, LogLevel};
use log::{LevelFilter, error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliErrorResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let level = if cli.verbose {
        LogLevel(LevelFilter::Debug)
    } else {
        config.logging.level
    };
    logger::initialize(level, config.log_file_path()?, config.logging.colored)?;
    config.log_summary();

    let app = App::from_config(&config)?;
    let mut stdout = std::io::stdout();
    let result = app.run(cli.command, &mut stdout).await;
    app.dispose();
    result
}
