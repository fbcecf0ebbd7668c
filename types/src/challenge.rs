//! Challenge definitions.
//!
//! A challenge is an ordered, non-empty list of items. Invariants are checked
//! at construction and again on deserialization, so a `Challenge` value in
//! hand is always safe to start a session from.

use std::collections::HashSet;
use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::ids::{ChallengeId, ItemId};
use crate::money::{Points, Price, PriceError};

/// Promotional items are worth this many times their base points.
pub const PROMO_MULTIPLIER: u32 = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidChallengeError {
    #[error("challenge has no items")]
    EmptyItems,
    #[error("item {item} appears more than once")]
    DuplicateItem { item: ItemId },
    #[error("item {item} has negative points ({points})")]
    NegativePoints { item: ItemId, points: i64 },
    #[error("item {item} points ({points}) exceed the supported range")]
    PointsOutOfRange { item: ItemId, points: i64 },
    #[error("item {item} has an invalid price: {source}")]
    NegativePrice {
        item: ItemId,
        #[source]
        source: PriceError,
    },
    #[error("time limit must be greater than zero")]
    ZeroTimeLimit,
}

// ============================================================================
// ChallengeItem
// ============================================================================

/// An item eligible for collection in a challenge. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub location: String,
    #[serde(rename = "points")]
    pub base_points: Points,
    pub is_promo: bool,
    pub price: Price,
}

impl ChallengeItem {
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        base_points: Points,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            location: String::new(),
            base_points,
            is_promo: false,
            price,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn promo(mut self) -> Self {
        self.is_promo = true;
        self
    }

    /// Base points, doubled for promotional items.
    #[must_use]
    pub const fn effective_points(&self) -> Points {
        if self.is_promo {
            self.base_points.saturating_mul(PROMO_MULTIPLIER)
        } else {
            self.base_points
        }
    }
}

impl<'de> Deserialize<'de> for ChallengeItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ChallengeItemWire {
            id: ItemId,
            name: String,
            #[serde(default)]
            category: String,
            #[serde(default)]
            location: String,
            points: i64,
            #[serde(default)]
            is_promo: bool,
            price: f64,
        }

        let wire = ChallengeItemWire::deserialize(deserializer)?;
        if wire.points < 0 {
            return Err(D::Error::custom(InvalidChallengeError::NegativePoints {
                item: wire.id,
                points: wire.points,
            }));
        }
        let Ok(points) = u32::try_from(wire.points) else {
            return Err(D::Error::custom(InvalidChallengeError::PointsOutOfRange {
                item: wire.id,
                points: wire.points,
            }));
        };
        let price = Price::from_decimal(wire.price).map_err(|source| {
            D::Error::custom(InvalidChallengeError::NegativePrice {
                item: wire.id.clone(),
                source,
            })
        })?;

        Ok(Self {
            id: wire.id,
            name: wire.name,
            category: wire.category,
            location: wire.location,
            base_points: Points::new(points),
            is_promo: wire.is_promo,
            price,
        })
    }
}

// ============================================================================
// Challenge
// ============================================================================

/// A themed, ordered list of items. Presentation order is processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    id: ChallengeId,
    title: String,
    description: String,
    items: Vec<ChallengeItem>,
    #[serde(
        rename = "timeLimitSeconds",
        serialize_with = "serialize_time_limit",
        skip_serializing_if = "Option::is_none"
    )]
    time_limit: Option<Duration>,
}

impl Challenge {
    pub fn new(
        id: impl Into<ChallengeId>,
        title: impl Into<String>,
        items: Vec<ChallengeItem>,
    ) -> Result<Self, InvalidChallengeError> {
        let challenge = Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            items,
            time_limit: None,
        };
        challenge.validate()?;
        Ok(challenge)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Result<Self, InvalidChallengeError> {
        if limit.is_zero() {
            return Err(InvalidChallengeError::ZeroTimeLimit);
        }
        self.time_limit = Some(limit);
        Ok(self)
    }

    /// Check the invariants every session relies on.
    pub fn validate(&self) -> Result<(), InvalidChallengeError> {
        if self.items.is_empty() {
            return Err(InvalidChallengeError::EmptyItems);
        }
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(&item.id) {
                return Err(InvalidChallengeError::DuplicateItem {
                    item: item.id.clone(),
                });
            }
        }
        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(InvalidChallengeError::ZeroTimeLimit);
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> &ChallengeId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn items(&self) -> &[ChallengeItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Sum of effective points over all items.
    #[must_use]
    pub fn potential_points(&self) -> Points {
        self.items.iter().map(ChallengeItem::effective_points).sum()
    }
}

#[allow(clippy::ref_option)] // serde passes the field by reference
fn serialize_time_limit<S: Serializer>(
    limit: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match limit {
        Some(limit) => serializer.serialize_some(&limit.as_secs()),
        None => serializer.serialize_none(),
    }
}

impl<'de> Deserialize<'de> for Challenge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ChallengeWire {
            id: ChallengeId,
            title: String,
            #[serde(default)]
            description: String,
            items: Vec<ChallengeItem>,
            time_limit_seconds: Option<u64>,
        }

        let wire = ChallengeWire::deserialize(deserializer)?;
        let challenge = Challenge {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            items: wire.items,
            time_limit: wire.time_limit_seconds.map(Duration::from_secs),
        };
        challenge.validate().map_err(D::Error::custom)?;
        Ok(challenge)
    }
}
