//! User points balance and reward redemption.

use thiserror::Error;

use swipecart_types::{Points, Reward, RewardId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedeemError {
    #[error("reward {reward} needs {needed} points but only {available} are available")]
    InsufficientPoints {
        reward: RewardId,
        needed: Points,
        available: Points,
    },
    #[error("reward {0} was already redeemed")]
    AlreadyRedeemed(RewardId),
}

#[derive(Debug, Clone, Default)]
pub struct PointsWallet {
    balance: Points,
    redeemed: Vec<RewardId>,
}

impl PointsWallet {
    /// Balance new accounts start with.
    pub const DEFAULT_STARTING_BALANCE: Points = Points::new(1250);

    #[must_use]
    pub fn new(starting_balance: Points) -> Self {
        Self {
            balance: starting_balance,
            redeemed: Vec::new(),
        }
    }

    #[must_use]
    pub fn balance(&self) -> Points {
        self.balance
    }

    pub fn credit(&mut self, points: Points) {
        self.balance += points;
        tracing::debug!(%points, balance = %self.balance, "Wallet credited");
    }

    /// Spend points on a reward. Each reward can be redeemed once.
    ///
    /// Returns the remaining balance.
    pub fn redeem(&mut self, reward: &Reward) -> Result<Points, RedeemError> {
        if self.has_redeemed(&reward.id) {
            return Err(RedeemError::AlreadyRedeemed(reward.id.clone()));
        }
        if self.balance < reward.points_cost {
            return Err(RedeemError::InsufficientPoints {
                reward: reward.id.clone(),
                needed: reward.points_cost,
                available: self.balance,
            });
        }
        self.balance = self.balance.saturating_sub(reward.points_cost);
        self.redeemed.push(reward.id.clone());
        tracing::info!(reward = %reward.id, cost = %reward.points_cost, balance = %self.balance, "Reward redeemed");
        Ok(self.balance)
    }

    #[must_use]
    pub fn has_redeemed(&self, reward: &RewardId) -> bool {
        self.redeemed.contains(reward)
    }

    #[must_use]
    pub fn redeemed(&self) -> &[RewardId] {
        &self.redeemed
    }
}
