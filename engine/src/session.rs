//! Challenge session state machine.
//!
//! A session walks a single challenge's items in order. Each item is
//! processed exactly once, by `scan` or `skip`, and the session completes when
//! the last item is processed or its time limit runs out:
//!
//! ```text
//! start() -> InProgress --scan/skip--> InProgress --last item--> Completed(AllItemsProcessed)
//!                 |
//!                 +--advance_clock past limit--> Completed(TimeExpired)
//! ```
//!
//! On completion the processed items are handed to a [`CartSink`] as one
//! batch. Completed sessions reject every further transition.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use swipecart_types::{
    CartLineItem, Challenge, ChallengeId, ChallengeItem, InvalidChallengeError, ItemId,
    ItemOutcome, Points,
};

use crate::cart::CartSink;
use crate::events::{EventQueue, SessionEvent};

/// Combo scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    /// A bonus fires whenever the scan streak is a multiple of this.
    pub combo_interval: NonZeroU32,
    pub combo_bonus: Points,
}

impl ScoringRules {
    pub const DEFAULT_COMBO_INTERVAL: NonZeroU32 = NonZeroU32::MIN.saturating_add(2);
    pub const DEFAULT_COMBO_BONUS: Points = Points::new(10);
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            combo_interval: Self::DEFAULT_COMBO_INTERVAL,
            combo_bonus: Self::DEFAULT_COMBO_BONUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    AllItemsProcessed,
    /// The time limit ran out. Unreached items have no outcome.
    TimeExpired,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionReason::AllItemsProcessed => f.write_str("all items processed"),
            CompletionReason::TimeExpired => f.write_str("time expired"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed(CompletionReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    #[error("session for challenge {challenge} already completed")]
    AlreadyCompleted { challenge: ChallengeId },
    #[error("no item at index {index} (challenge has {len} items)")]
    NoCurrentItem { index: usize, len: usize },
}

/// Final figures for a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub challenge_id: ChallengeId,
    pub reason: CompletionReason,
    pub earned_points: Points,
    pub potential_points: Points,
    pub combo_bonus_total: Points,
    pub scanned: usize,
    pub skipped: usize,
    /// Items never reached before the timer expired.
    pub unreached: usize,
}

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Advanced { next_index: usize },
    Completed(SessionSummary),
}

impl Step {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Step::Completed(_))
    }
}

/// One user's traversal of one challenge.
#[derive(Debug)]
pub struct ChallengeSession {
    challenge: Arc<Challenge>,
    rules: ScoringRules,
    current_index: usize,
    earned_points: Points,
    potential_points: Points,
    consecutive_scans: u32,
    combo_bonus_total: Points,
    /// Processing order. Entry `i` always belongs to `challenge.items()[i]`.
    outcomes: Vec<(ItemId, ItemOutcome)>,
    status: SessionStatus,
    elapsed: Duration,
    events: EventQueue,
}

impl ChallengeSession {
    pub fn start(
        challenge: Arc<Challenge>,
        rules: ScoringRules,
    ) -> Result<Self, InvalidChallengeError> {
        challenge.validate()?;
        let potential_points = challenge.potential_points();
        tracing::debug!(
            challenge = %challenge.id(),
            items = challenge.len(),
            %potential_points,
            "Session started"
        );
        Ok(Self {
            outcomes: Vec::with_capacity(challenge.len()),
            challenge,
            rules,
            current_index: 0,
            earned_points: Points::ZERO,
            potential_points,
            consecutive_scans: 0,
            combo_bonus_total: Points::ZERO,
            status: SessionStatus::InProgress,
            elapsed: Duration::ZERO,
            events: EventQueue::new(),
        })
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Record a confirmed scan of the current item.
    pub fn scan(&mut self, cart: &mut impl CartSink) -> Result<Step, InvalidStateError> {
        let item = self.current()?;
        let item_id = item.id.clone();
        let points = item.effective_points();

        self.earned_points += points;
        self.outcomes.push((item_id.clone(), ItemOutcome::Scanned));
        self.consecutive_scans += 1;

        if self.consecutive_scans % self.rules.combo_interval.get() == 0 {
            self.earned_points += self.rules.combo_bonus;
            self.combo_bonus_total += self.rules.combo_bonus;
            self.events.push(SessionEvent::ComboBonus {
                streak: self.consecutive_scans,
                bonus: self.rules.combo_bonus,
            });
            tracing::debug!(streak = self.consecutive_scans, "Combo bonus");
        }
        tracing::debug!(item = %item_id, %points, earned = %self.earned_points, "Item scanned");
        self.events.push(SessionEvent::PointsEarned { item_id, points });

        Ok(self.advance(cart))
    }

    /// Pass on the current item. Its points leave the potential total.
    pub fn skip(&mut self, cart: &mut impl CartSink) -> Result<Step, InvalidStateError> {
        let item = self.current()?;
        let item_id = item.id.clone();
        let forfeited = item.effective_points();

        self.potential_points = self.potential_points.saturating_sub(forfeited);
        self.consecutive_scans = 0;
        self.outcomes.push((item_id.clone(), ItemOutcome::Skipped));

        tracing::debug!(item = %item_id, %forfeited, potential = %self.potential_points, "Item skipped");
        self.events
            .push(SessionEvent::SkipPenalty { item_id, forfeited });

        Ok(self.advance(cart))
    }

    /// Feed elapsed wall time into the session timer.
    ///
    /// Completes the session once a time limit is set and reached. Without a
    /// time limit this only accumulates time.
    pub fn advance_clock(
        &mut self,
        elapsed: Duration,
        cart: &mut impl CartSink,
    ) -> Result<Step, InvalidStateError> {
        self.ensure_in_progress()?;
        self.elapsed = self.elapsed.saturating_add(elapsed);

        match self.challenge.time_limit() {
            Some(limit) if self.elapsed >= limit => {
                Ok(Step::Completed(self.complete(CompletionReason::TimeExpired, cart)))
            }
            _ => Ok(Step::Advanced {
                next_index: self.current_index,
            }),
        }
    }

    fn advance(&mut self, cart: &mut impl CartSink) -> Step {
        self.current_index += 1;
        if self.current_index >= self.challenge.len() {
            Step::Completed(self.complete(CompletionReason::AllItemsProcessed, cart))
        } else {
            Step::Advanced {
                next_index: self.current_index,
            }
        }
    }

    fn complete(&mut self, reason: CompletionReason, cart: &mut impl CartSink) -> SessionSummary {
        self.status = SessionStatus::Completed(reason);

        let lines: Vec<CartLineItem> = self
            .challenge
            .items()
            .iter()
            .zip(&self.outcomes)
            .map(|(item, (_, outcome))| CartLineItem::from_outcome(&self.challenge, item, *outcome))
            .collect();
        cart.add_items(lines);

        let summary = self.summary(reason);
        tracing::info!(
            challenge = %summary.challenge_id,
            %reason,
            earned = %summary.earned_points,
            potential = %summary.potential_points,
            scanned = summary.scanned,
            skipped = summary.skipped,
            unreached = summary.unreached,
            "Session completed"
        );
        self.events.push(SessionEvent::Completed {
            reason,
            earned_points: self.earned_points,
        });
        summary
    }

    fn summary(&self, reason: CompletionReason) -> SessionSummary {
        let scanned = self.count(ItemOutcome::Scanned);
        let skipped = self.outcomes.len() - scanned;
        SessionSummary {
            challenge_id: self.challenge.id().clone(),
            reason,
            earned_points: self.earned_points,
            potential_points: self.potential_points,
            combo_bonus_total: self.combo_bonus_total,
            scanned,
            skipped,
            unreached: self.challenge.len() - self.outcomes.len(),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), InvalidStateError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Completed(_) => Err(InvalidStateError::AlreadyCompleted {
                challenge: self.challenge.id().clone(),
            }),
        }
    }

    fn current(&self) -> Result<&ChallengeItem, InvalidStateError> {
        self.ensure_in_progress()?;
        self.challenge
            .items()
            .get(self.current_index)
            .ok_or(InvalidStateError::NoCurrentItem {
                index: self.current_index,
                len: self.challenge.len(),
            })
    }

    fn count(&self, outcome: ItemOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    #[must_use]
    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    /// The item awaiting a decision, if the session is still running.
    #[must_use]
    pub fn current_item(&self) -> Option<&ChallengeItem> {
        self.current().ok()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn earned_points(&self) -> Points {
        self.earned_points
    }

    #[must_use]
    pub fn potential_points(&self) -> Points {
        self.potential_points
    }

    #[must_use]
    pub fn consecutive_scans(&self) -> u32 {
        self.consecutive_scans
    }

    /// Bonus points earned from combos. Never attributed to a line item.
    #[must_use]
    pub fn combo_bonus_total(&self) -> Points {
        self.combo_bonus_total
    }

    #[must_use]
    pub fn outcomes(&self) -> &[(ItemId, ItemOutcome)] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome_of(&self, item: &ItemId) -> Option<ItemOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| id == item)
            .map(|(_, outcome)| *outcome)
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.status, SessionStatus::Completed(_))
    }

    /// Summary of the session, available once it has completed.
    #[must_use]
    pub fn completion(&self) -> Option<SessionSummary> {
        match self.status {
            SessionStatus::Completed(reason) => Some(self.summary(reason)),
            SessionStatus::InProgress => None,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time left before forced completion, `None` for untimed challenges.
    #[must_use]
    pub fn remaining_time(&self) -> Option<Duration> {
        self.challenge
            .time_limit()
            .map(|limit| limit.saturating_sub(self.elapsed))
    }

    /// Share of items scanned, as a whole percentage (rounded).
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let total = self.challenge.len();
        let scanned = self.count(ItemOutcome::Scanned);
        ((scanned * 100 + total / 2) / total) as u32
    }

    /// Drain queued display events in emission order.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.take()
    }
}
