use std::fmt;

use serde::{Deserialize, Serialize};

use crate::challenge::{Challenge, ChallengeItem};
use crate::ids::{ChallengeId, ItemId};
use crate::money::{Points, Price};

/// What the user did with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOutcome {
    Scanned,
    Skipped,
}

impl ItemOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemOutcome::Scanned => "scanned",
            ItemOutcome::Skipped => "skipped",
        }
    }

    #[must_use]
    pub const fn is_scanned(self) -> bool {
        matches!(self, ItemOutcome::Scanned)
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The finalized contribution of one processed item to the cart.
///
/// `earned_points` is the item's effective points when scanned and zero when
/// skipped. Combo bonuses belong to the session and are never attributed
/// to a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub item_id: ItemId,
    pub name: String,
    pub category: String,
    pub location: String,
    pub price: Price,
    pub challenge_id: ChallengeId,
    pub challenge_name: String,
    pub status: ItemOutcome,
    pub earned_points: Points,
}

impl CartLineItem {
    #[must_use]
    pub fn from_outcome(challenge: &Challenge, item: &ChallengeItem, status: ItemOutcome) -> Self {
        let earned_points = match status {
            ItemOutcome::Scanned => item.effective_points(),
            ItemOutcome::Skipped => Points::ZERO,
        };
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            location: item.location.clone(),
            price: item.price,
            challenge_id: challenge.id().clone(),
            challenge_name: challenge.title().to_owned(),
            status,
            earned_points,
        }
    }

    #[must_use]
    pub const fn is_scanned(&self) -> bool {
        self.status.is_scanned()
    }
}
