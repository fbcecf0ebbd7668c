//! SwipeCart CLI - binary entry point.
//!
//! Drives [`swipecart_engine`] from the terminal: loads config and the
//! catalog, then runs a challenge with a scripted sequence of swipes and
//! checks the resulting cart out.
//!
//! ```text
//! main() -> load config -> load catalog -> list | play -> session -> cart -> checkout
//! ```

mod args;
mod play;

use std::io::{stderr, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use swipecart_engine::swipecart_types::StoreId;
use swipecart_engine::{Cart, Catalog, PointsWallet, SwipeCartConfig};

use args::{Cli, Commands};
use play::{PlayContext, PlayRequest};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries command output; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(stderr))
        .with(env_filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<SwipeCartConfig> {
    let config = match &cli.config {
        Some(path) => Some(SwipeCartConfig::load_from(path.clone())?),
        None => SwipeCartConfig::load()?,
    };
    if config.is_none() {
        tracing::debug!("No config file found, using defaults");
    }
    Ok(config.unwrap_or_default())
}

fn load_catalog(cli: &Cli, config: &SwipeCartConfig) -> Result<Catalog> {
    match cli.catalog.clone().or_else(|| config.catalog_path()) {
        Some(path) => Catalog::from_path(&path)
            .with_context(|| format!("loading catalog {}", path.display())),
        None => Ok(Catalog::builtin()?),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let catalog = load_catalog(&cli, &config)?;

    match cli.command {
        Commands::List => play::list(&catalog, &mut stdout().lock()),
        Commands::Play {
            ref challenge,
            ref decisions,
            elapsed,
            no_checkout,
            ref redeem,
        } => {
            let store = match cli.store.clone().map(StoreId::from).or_else(|| config.store()) {
                Some(id) => catalog
                    .store(&id)
                    .with_context(|| format!("unknown store {id}"))?
                    .clone(),
                None => catalog.default_store().clone(),
            };
            let mut ctx = PlayContext {
                rules: config.scoring_rules()?,
                cart: Cart::with_tax_rate(config.tax_rate()),
                wallet: PointsWallet::new(config.starting_balance()),
                barcode_validity: config.barcode_validity()?,
                store,
                catalog,
            };
            let request = PlayRequest {
                challenge,
                decisions,
                elapsed: elapsed.map(Duration::from_secs),
                checkout: !no_checkout,
                redeem,
            };
            play::play(&mut ctx, &request, &mut stdout().lock())
        }
    }
}
