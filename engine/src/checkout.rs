//! Checkout: barcode issue and cart settlement.
//!
//! Checkout is two-phase. [`Checkout::begin`] snapshots the cart totals and
//! issues a barcode for the self-checkout lane. [`Checkout::complete`] settles
//! it: points are credited to the wallet and the cart is cleared.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use swipecart_types::{ChallengeId, Points, Store};

use crate::cart::{Cart, CartTotals};
use crate::wallet::PointsWallet;

/// How long an issued barcode stays valid.
pub const DEFAULT_BARCODE_VALIDITY: TimeDelta = TimeDelta::minutes(15);

/// Digits of the millisecond timestamp carried in a barcode.
const TIMESTAMP_DIGITS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("barcode {code} expired at {expired_at}")]
    BarcodeExpired {
        code: String,
        expired_at: DateTime<Utc>,
    },
    #[error("cart changed after barcode {code} was issued")]
    CartChanged { code: String },
}

/// What a checkout barcode covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutScope {
    /// Checkout straight from a completed challenge.
    Challenge(ChallengeId),
    /// Checkout of the whole accumulated cart.
    Cart,
}

impl fmt::Display for CheckoutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutScope::Challenge(id) => write!(f, "{id}"),
            CheckoutScope::Cart => f.write_str("CART"),
        }
    }
}

/// Display-only checkout barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutBarcode {
    code: String,
    pattern: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CheckoutBarcode {
    /// Derive a barcode from the store, scope and issue time.
    ///
    /// The code is `STOREID` + scope + the last six digits of the unix
    /// millisecond timestamp. The bar pattern has one bar per code byte:
    /// `1` for even bytes, `0` for odd.
    #[must_use]
    pub fn generate(
        store: &Store,
        scope: &CheckoutScope,
        now: DateTime<Utc>,
        validity: TimeDelta,
    ) -> Self {
        let stamp = now
            .timestamp_millis()
            .rem_euclid(10_i64.pow(TIMESTAMP_DIGITS));
        let code = format!(
            "{}{scope}{stamp:0width$}",
            store.id.barcode_prefix(),
            width = TIMESTAMP_DIGITS as usize
        );
        let pattern = bar_pattern(&code);
        Self {
            code,
            pattern,
            issued_at: now,
            expires_at: now + validity,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

fn bar_pattern(code: &str) -> String {
    code.bytes()
        .map(|b| if b % 2 == 0 { '1' } else { '0' })
        .collect()
}

/// Settled checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub barcode: String,
    pub totals: CartTotals,
    pub points_earned: Points,
    pub balance: Points,
    pub completed_at: DateTime<Utc>,
}

/// A checkout in progress: barcode issued, not yet settled.
#[derive(Debug, Clone)]
pub struct Checkout {
    barcode: CheckoutBarcode,
    scope: CheckoutScope,
    totals: CartTotals,
}

impl Checkout {
    pub fn begin(
        cart: &Cart,
        store: &Store,
        scope: CheckoutScope,
        now: DateTime<Utc>,
        validity: TimeDelta,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let barcode = CheckoutBarcode::generate(store, &scope, now, validity);
        let totals = cart.totals();
        tracing::info!(
            code = barcode.code(),
            store = %store.id,
            %scope,
            total = %totals.total,
            points = %totals.points,
            "Checkout started"
        );
        Ok(Self {
            barcode,
            scope,
            totals,
        })
    }

    #[must_use]
    pub fn barcode(&self) -> &CheckoutBarcode {
        &self.barcode
    }

    #[must_use]
    pub fn scope(&self) -> &CheckoutScope {
        &self.scope
    }

    #[must_use]
    pub fn totals(&self) -> &CartTotals {
        &self.totals
    }

    /// Settle the checkout: credit the wallet and clear the cart.
    ///
    /// Fails without touching the cart or wallet if the barcode expired or the
    /// cart no longer matches the totals the barcode was issued for.
    pub fn complete(
        self,
        cart: &mut Cart,
        wallet: &mut PointsWallet,
        now: DateTime<Utc>,
    ) -> Result<Receipt, CheckoutError> {
        if self.barcode.is_expired(now) {
            tracing::warn!(code = self.barcode.code(), "Checkout barcode expired");
            return Err(CheckoutError::BarcodeExpired {
                code: self.barcode.code,
                expired_at: self.barcode.expires_at,
            });
        }
        if cart.totals() != self.totals {
            return Err(CheckoutError::CartChanged {
                code: self.barcode.code,
            });
        }

        wallet.credit(self.totals.points);
        cart.clear();
        tracing::info!(
            code = self.barcode.code(),
            points = %self.totals.points,
            balance = %wallet.balance(),
            "Checkout complete"
        );
        Ok(Receipt {
            barcode: self.barcode.code,
            totals: self.totals,
            points_earned: self.totals.points,
            balance: wallet.balance(),
            completed_at: now,
        })
    }
}
