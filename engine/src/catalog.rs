//! Stores, challenges and rewards available to the user.
//!
//! The built-in catalog ships with the crate. Other catalogs are loaded from
//! JSON documents of the same shape; every challenge is validated while
//! parsing, so a loaded catalog only holds challenges a session can start
//! from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use swipecart_types::{Challenge, ChallengeId, Reward, RewardId, Store, StoreId};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("challenge {0} is defined more than once")]
    DuplicateChallenge(ChallengeId),
    #[error("catalog has no stores")]
    NoStores,
}

#[derive(Debug, Deserialize)]
struct CatalogWire {
    stores: Vec<Store>,
    challenges: Vec<Challenge>,
    #[serde(default)]
    rewards: Vec<Reward>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    stores: Vec<Store>,
    challenges: Vec<Arc<Challenge>>,
    rewards: Vec<Reward>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let wire: CatalogWire = serde_json::from_str(json)?;
        if wire.stores.is_empty() {
            return Err(CatalogError::NoStores);
        }
        let mut seen = HashSet::new();
        for challenge in &wire.challenges {
            if !seen.insert(challenge.id()) {
                return Err(CatalogError::DuplicateChallenge(challenge.id().clone()));
            }
        }
        Ok(Self {
            stores: wire.stores,
            challenges: wire.challenges.into_iter().map(Arc::new).collect(),
            rewards: wire.rewards,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            challenges = catalog.challenges.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    #[must_use]
    pub fn challenges(&self) -> &[Arc<Challenge>] {
        &self.challenges
    }

    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    #[must_use]
    pub fn challenge(&self, id: &ChallengeId) -> Option<Arc<Challenge>> {
        self.challenges
            .iter()
            .find(|challenge| challenge.id() == id)
            .cloned()
    }

    #[must_use]
    pub fn store(&self, id: &StoreId) -> Option<&Store> {
        self.stores.iter().find(|store| &store.id == id)
    }

    /// The store selected when the user has not picked one.
    #[must_use]
    pub fn default_store(&self) -> &Store {
        // Non-empty by construction.
        &self.stores[0]
    }

    #[must_use]
    pub fn reward(&self, id: &RewardId) -> Option<&Reward> {
        self.rewards.iter().find(|reward| &reward.id == id)
    }
}
