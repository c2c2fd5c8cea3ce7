use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "district")]
#[command(about = "Le District: the network of the district's health professionals")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level regardless of the configured level
    #[arg(long, short, global = true)]
    pub verbose: bool,
}
