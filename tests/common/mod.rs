//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use swipecart_engine::swipecart_types::{Challenge, ChallengeItem, Points, Price};
use swipecart_engine::{Cart, CartSink, ChallengeSession, ScoringRules, Step};

/// One swipe in a scripted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Scan,
    Skip,
}

pub use Swipe::{Scan, Skip};

pub fn item(id: &str, points: u32, cents: u64) -> ChallengeItem {
    ChallengeItem::new(id, format!("Item {id}"), Points::new(points), Price::from_cents(cents))
}

/// `[{50, promo}, {60}, {70}]`
pub fn promo_trio() -> Arc<Challenge> {
    let items = vec![
        item("1", 50, 499).promo(),
        item("2", 60, 349),
        item("3", 70, 399),
    ];
    Arc::new(Challenge::new("trio", "Promo Trio", items).unwrap())
}

/// `count` plain items worth 10, 20, 30... points.
pub fn ladder(count: u32) -> Arc<Challenge> {
    let items = (1..=count)
        .map(|i| item(&i.to_string(), i * 10, u64::from(i) * 100))
        .collect();
    Arc::new(Challenge::new("ladder", "Ladder", items).unwrap())
}

pub fn timed_ladder(count: u32, limit: Duration) -> Arc<Challenge> {
    let challenge = Challenge::clone(&ladder(count));
    Arc::new(challenge.with_time_limit(limit).unwrap())
}

/// Run `swipes` against a fresh session. Returns the session after the last
/// swipe.
pub fn run(challenge: &Arc<Challenge>, swipes: &[Swipe], cart: &mut impl CartSink) -> ChallengeSession {
    let mut session = ChallengeSession::start(Arc::clone(challenge), ScoringRules::default()).unwrap();
    for swipe in swipes {
        let step = match swipe {
            Scan => session.scan(cart),
            Skip => session.skip(cart),
        }
        .unwrap();
        if let Step::Completed(_) = step {
            break;
        }
    }
    session
}

pub fn run_into_cart(challenge: &Arc<Challenge>, swipes: &[Swipe]) -> (ChallengeSession, Cart) {
    let mut cart = Cart::new();
    let session = run(challenge, swipes, &mut cart);
    (session, cart)
}
