//! Display events emitted by session transitions.
//!
//! Events are for the presentation layer only (toasts, combo celebrations,
//! the completion screen). They are queued by the session as a side effect
//! of a transition and never feed back into session state.

use swipecart_types::{ItemId, Points};

use crate::session::CompletionReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A scan was confirmed and the item's effective points were earned.
    PointsEarned { item_id: ItemId, points: Points },
    /// The running scan streak hit a combo threshold.
    ComboBonus {
        /// Consecutive scans at the moment the bonus fired.
        streak: u32,
        bonus: Points,
    },
    /// An item was skipped and its points left the potential total.
    SkipPenalty { item_id: ItemId, forfeited: Points },
    Completed {
        reason: CompletionReason,
        earned_points: Points,
    },
}

impl SessionEvent {
    /// Short toast text for the event.
    #[must_use]
    pub fn format(&self) -> String {
        match self {
            Self::PointsEarned { points, .. } => format!("+{points} points"),
            Self::ComboBonus { streak, bonus } => format!("{streak} in a row! Combo +{bonus}"),
            Self::SkipPenalty { forfeited, .. } => format!("-{forfeited} potential points"),
            Self::Completed {
                reason: CompletionReason::AllItemsProcessed,
                earned_points,
            } => format!("Challenge complete! +{earned_points} points"),
            Self::Completed {
                reason: CompletionReason::TimeExpired,
                earned_points,
            } => format!("Time's up! +{earned_points} points"),
        }
    }
}

/// Pending events in emission order.
///
/// Duplicates are kept: two identical point toasts are two toasts.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<SessionEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.pending.push(event);
    }

    /// Take all pending events, clearing the queue.
    pub fn take(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
