//! Core engine for SwipeCart - challenge sessions, cart and checkout.
//!
//! This crate contains the scoring state machine and the cart aggregator it
//! completes into, without any presentation dependencies. Everything is
//! synchronous: the caller owns the [`Cart`] and [`PointsWallet`] and passes
//! them into the operations that change them.

mod cart;
mod catalog;
mod checkout;
mod config;
mod events;
mod session;
mod wallet;

pub use cart::{Cart, CartSink, CartTotals};
pub use catalog::{Catalog, CatalogError};
pub use checkout::{
    Checkout, CheckoutBarcode, CheckoutError, CheckoutScope, DEFAULT_BARCODE_VALIDITY, Receipt,
};
pub use config::{
    AppConfig, CONFIG_PATH_ENV, CheckoutConfig, ConfigError, ScoringConfig, SwipeCartConfig,
    WalletConfig, config_path, expand_env_vars,
};
pub use events::{EventQueue, SessionEvent};
pub use session::{
    ChallengeSession, CompletionReason, InvalidStateError, ScoringRules, SessionStatus,
    SessionSummary, Step,
};
pub use wallet::{PointsWallet, RedeemError};

pub use swipecart_types;
