//! Core domain types for SwipeCart.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod cart;
mod challenge;
mod ids;
mod money;
mod store;

pub use cart::{CartLineItem, ItemOutcome};
pub use challenge::{Challenge, ChallengeItem, InvalidChallengeError, PROMO_MULTIPLIER};
pub use ids::{ChallengeId, ItemId, RewardId, StoreId};
pub use money::{Points, Price, PriceError, TaxRate};
pub use store::{Reward, RewardKind, Store};
