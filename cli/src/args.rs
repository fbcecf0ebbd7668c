use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "swipecart")]
#[command(about = "Play shopping challenges and check out from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $SWIPECART_CONFIG or ~/.swipecart/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog JSON document. Overrides `[app] catalog`.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Store id. Overrides `[app] store`.
    #[arg(long, global = true)]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stores, challenges and rewards.
    List,

    /// Run a challenge with a fixed sequence of decisions, then check out.
    Play {
        /// Challenge id.
        challenge: String,

        /// One character per item: `s` to scan, `k` to skip.
        decisions: String,

        /// Seconds spent on the challenge after the last decision.
        #[arg(long)]
        elapsed: Option<u64>,

        /// Stop after the session, leaving the cart unpaid.
        #[arg(long)]
        no_checkout: bool,

        /// Reward ids to redeem after checkout.
        #[arg(long = "redeem")]
        redeem: Vec<String>,
    },
}
