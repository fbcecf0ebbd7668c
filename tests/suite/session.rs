//! Session scoring properties, exercised through the public engine API.

use std::time::Duration;

use swipecart_engine::swipecart_types::{ItemOutcome, Points};
use swipecart_engine::{Cart, CompletionReason, InvalidStateError};

use crate::common::{Scan, Skip, Swipe, ladder, promo_trio, run, run_into_cart, timed_ladder};

#[test]
fn promo_scan_skip_scan_scenario() {
    let (session, cart) = run_into_cart(&promo_trio(), &[Scan, Skip, Scan]);

    assert_eq!(session.earned_points(), Points::new(170));
    assert_eq!(session.potential_points(), Points::new(170));
    assert_eq!(session.combo_bonus_total(), Points::ZERO);

    let earned: Vec<u32> = cart.items().iter().map(|l| l.earned_points.value()).collect();
    assert_eq!(earned, [100, 0, 70]);
    assert_eq!(cart.items()[1].status, ItemOutcome::Skipped);
    assert_eq!(cart.total_price().cents(), 499 + 399);
}

#[test]
fn full_scan_earns_sum_plus_combo_per_three() {
    for count in 1..=10 {
        let challenge = ladder(count);
        let start_potential = challenge.potential_points();
        let swipes = vec![Scan; count as usize];
        let (session, _) = run_into_cart(&challenge, &swipes);

        let bonus = Points::new(10 * (count / 3));
        assert_eq!(session.potential_points(), start_potential, "count {count}");
        assert_eq!(session.earned_points(), start_potential + bonus, "count {count}");
    }
}

#[test]
fn earned_minus_combo_equals_scanned_points() {
    let patterns: [&[Swipe]; 5] = [
        &[Scan, Scan, Scan, Skip, Scan, Scan, Scan],
        &[Skip, Skip, Skip, Skip, Skip, Skip, Skip],
        &[Scan, Skip, Scan, Skip, Scan, Skip, Scan],
        &[Scan, Scan, Skip, Scan, Scan, Scan, Scan],
        &[Scan, Scan, Scan, Scan, Scan, Scan, Scan],
    ];
    let challenge = ladder(7);
    for swipes in patterns {
        let (session, cart) = run_into_cart(&challenge, swipes);
        let scanned: Points = challenge
            .items()
            .iter()
            .zip(swipes)
            .filter(|(_, s)| **s == Scan)
            .map(|(item, _)| item.effective_points())
            .sum();
        assert_eq!(
            session.earned_points().saturating_sub(session.combo_bonus_total()),
            scanned,
            "{swipes:?}"
        );
        assert_eq!(cart.total_points(), scanned, "{swipes:?}");
    }
}

#[test]
fn skip_before_third_scan_resets_combo() {
    let (session, _) = run_into_cart(&ladder(3), &[Scan, Scan, Scan]);
    assert_eq!(session.combo_bonus_total(), Points::new(10));

    let (session, _) = run_into_cart(&ladder(4), &[Scan, Scan, Skip, Scan]);
    assert_eq!(session.combo_bonus_total(), Points::ZERO);
    assert_eq!(session.earned_points(), Points::new(10 + 20 + 40));
}

#[test]
fn replaying_decisions_is_deterministic() {
    let challenge = ladder(8);
    let swipes = [Scan, Scan, Skip, Scan, Scan, Scan, Skip, Scan];

    let (first, first_cart) = run_into_cart(&challenge, &swipes);
    let (second, second_cart) = run_into_cart(&challenge, &swipes);

    assert_eq!(first.earned_points(), second.earned_points());
    assert_eq!(first.potential_points(), second.potential_points());
    assert_eq!(first.completion(), second.completion());
    assert_eq!(first_cart.items(), second_cart.items());
}

#[test]
fn single_item_scan_completes_immediately() {
    let challenge = ladder(1);
    let (session, cart) = run_into_cart(&challenge, &[Scan]);
    let points = challenge.items()[0].effective_points();

    assert!(session.is_completed());
    assert_eq!(session.earned_points(), points);
    assert_eq!(session.potential_points(), points);
    assert_eq!(cart.len(), 1);
}

#[test]
fn completed_session_rejects_swipes() {
    let mut cart = Cart::new();
    let mut session = run(&ladder(2), &[Scan, Skip], &mut cart);

    assert!(matches!(
        session.scan(&mut cart),
        Err(InvalidStateError::AlreadyCompleted { .. })
    ));
    assert!(session.skip(&mut cart).is_err());
    assert_eq!(cart.len(), 2);
}

#[test]
fn timer_expiry_leaves_unreached_items_out_of_cart() {
    let challenge = timed_ladder(4, Duration::from_secs(60));
    let mut cart = Cart::new();
    let mut session = run(&challenge, &[Scan, Skip], &mut cart);

    session.advance_clock(Duration::from_secs(30), &mut cart).unwrap();
    assert!(!session.is_completed());
    session.advance_clock(Duration::from_secs(30), &mut cart).unwrap();

    let summary = session.completion().unwrap();
    assert_eq!(summary.reason, CompletionReason::TimeExpired);
    assert_eq!(summary.unreached, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(cart.len(), 2);
    assert_eq!(session.outcome_of(&"3".into()), None);
}

#[test]
fn sessions_accumulate_in_one_cart() {
    let mut cart = Cart::new();
    run(&promo_trio(), &[Scan, Skip, Scan], &mut cart);
    run(&ladder(3), &[Scan, Scan, Scan], &mut cart);

    assert_eq!(cart.len(), 6);
    assert_eq!(cart.scanned().count(), 5);
    // combo bonus stays on the session
    assert_eq!(cart.total_points(), Points::new(170 + 60));
}
