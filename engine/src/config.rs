use std::num::NonZeroU32;
use std::{env, path::PathBuf};

use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

use swipecart_types::{Points, StoreId, TaxRate};

use crate::checkout::DEFAULT_BARCODE_VALIDITY;
use crate::session::ScoringRules;
use crate::wallet::PointsWallet;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SWIPECART_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct SwipeCartConfig {
    pub app: Option<AppConfig>,
    pub scoring: Option<ScoringConfig>,
    pub checkout: Option<CheckoutConfig>,
    pub wallet: Option<WalletConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Store selected at startup. Defaults to the catalog's first store.
    pub store: Option<String>,
    /// Path to a catalog JSON document. `${VAR}` references are expanded.
    pub catalog: Option<String>,
}

/// Combo scoring.
///
/// ```toml
/// [scoring]
/// combo_interval = 3
/// combo_bonus = 10
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ScoringConfig {
    pub combo_interval: Option<u32>,
    pub combo_bonus: Option<u32>,
}

/// ```toml
/// [checkout]
/// tax_rate_bps = 800
/// barcode_valid_minutes = 15
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutConfig {
    /// Sales tax in basis points (800 = 8%).
    pub tax_rate_bps: Option<u32>,
    pub barcode_valid_minutes: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalletConfig {
    pub starting_balance: Option<u32>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

impl SwipeCartConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(path).map(Some)
    }

    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Config loaded");
                Ok(config)
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    pub fn scoring_rules(&self) -> Result<ScoringRules, ConfigError> {
        let mut rules = ScoringRules::default();
        let Some(scoring) = &self.scoring else {
            return Ok(rules);
        };
        if let Some(interval) = scoring.combo_interval {
            rules.combo_interval = NonZeroU32::new(interval).ok_or(ConfigError::Invalid {
                field: "scoring.combo_interval",
                reason: "must be at least 1",
            })?;
        }
        if let Some(bonus) = scoring.combo_bonus {
            rules.combo_bonus = Points::new(bonus);
        }
        Ok(rules)
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.checkout
            .as_ref()
            .and_then(|c| c.tax_rate_bps)
            .map_or(TaxRate::STANDARD, TaxRate::from_basis_points)
    }

    pub fn barcode_validity(&self) -> Result<TimeDelta, ConfigError> {
        match self.checkout.as_ref().and_then(|c| c.barcode_valid_minutes) {
            None => Ok(DEFAULT_BARCODE_VALIDITY),
            Some(0) => Err(ConfigError::Invalid {
                field: "checkout.barcode_valid_minutes",
                reason: "must be at least 1",
            }),
            Some(minutes) => Ok(TimeDelta::minutes(i64::from(minutes))),
        }
    }

    pub fn starting_balance(&self) -> Points {
        self.wallet
            .as_ref()
            .and_then(|w| w.starting_balance)
            .map_or(PointsWallet::DEFAULT_STARTING_BALANCE, Points::new)
    }

    pub fn store(&self) -> Option<StoreId> {
        self.app
            .as_ref()
            .and_then(|a| a.store.as_deref())
            .map(StoreId::from)
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.app
            .as_ref()
            .and_then(|a| a.catalog.as_deref())
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".swipecart").join("config.toml"))
}
