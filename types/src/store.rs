//! Store and reward descriptors.

use serde::{Deserialize, Serialize};

use crate::ids::{RewardId, StoreId};
use crate::money::Points;

/// A retail banner the app can be themed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub theme: String,
    #[serde(default)]
    pub logo: String,
}

impl Store {
    #[must_use]
    pub fn new(id: impl Into<StoreId>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            theme: id.as_str().to_owned(),
            id,
            name: name.into(),
            logo: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Percentage,
    Brand,
    Dollar,
}

/// A coupon that can be bought with points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub points_cost: Points,
    #[serde(rename = "type")]
    pub kind: RewardKind,
    /// Display value, e.g. "5%" or "$3".
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_parses_wire_shape() {
        let json = r#"{ "id": "3", "title": "$5 Off Coca-Cola Products",
            "pointsCost": 300, "type": "brand", "value": "$5", "brand": "Coca-Cola" }"#;
        let reward: Reward = serde_json::from_str(json).unwrap();
        assert_eq!(reward.points_cost, Points::new(300));
        assert_eq!(reward.kind, RewardKind::Brand);
        assert_eq!(reward.brand.as_deref(), Some("Coca-Cola"));
    }

    #[test]
    fn store_theme_defaults_to_id() {
        let store = Store::new("target", "Target");
        assert_eq!(store.theme, "target");
    }
}
