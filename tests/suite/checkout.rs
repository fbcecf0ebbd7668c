//! Cart to checkout to wallet flow.

use chrono::{TimeDelta, TimeZone, Utc};

use swipecart_engine::swipecart_types::{Points, Store};
use swipecart_engine::{
    Cart, Checkout, CheckoutError, CheckoutScope, DEFAULT_BARCODE_VALIDITY, PointsWallet,
};

use crate::common::{Scan, Skip, ladder, promo_trio, run, run_into_cart};

fn store() -> Store {
    Store::new("fairway", "Fairway")
}

#[test]
fn checkout_excludes_skipped_prices_and_credits_points() {
    let (_, mut cart) = run_into_cart(&promo_trio(), &[Scan, Skip, Scan]);
    let mut wallet = PointsWallet::new(Points::new(1250));
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    let checkout = Checkout::begin(
        &cart,
        &store(),
        CheckoutScope::Challenge("trio".into()),
        now,
        DEFAULT_BARCODE_VALIDITY,
    )
    .unwrap();
    // 4.99 + 3.99 = 8.98, tax 8% = 0.72
    assert_eq!(checkout.totals().subtotal.cents(), 898);
    assert_eq!(checkout.totals().tax.cents(), 72);
    assert_eq!(checkout.totals().total.cents(), 970);
    assert!(checkout.barcode().code().starts_with("FAIRWAYtrio"));
    assert_eq!(
        checkout.barcode().pattern().len(),
        checkout.barcode().code().len()
    );

    let receipt = checkout
        .complete(&mut cart, &mut wallet, now + TimeDelta::minutes(1))
        .unwrap();
    assert_eq!(receipt.points_earned, Points::new(170));
    assert_eq!(receipt.balance, Points::new(1420));
    assert!(cart.is_empty());
}

#[test]
fn whole_cart_checkout_spans_sessions() {
    let mut cart = Cart::new();
    run(&promo_trio(), &[Scan, Scan, Scan], &mut cart);
    run(&ladder(2), &[Skip, Scan], &mut cart);
    let mut wallet = PointsWallet::new(Points::ZERO);
    let now = Utc::now();

    let checkout =
        Checkout::begin(&cart, &store(), CheckoutScope::Cart, now, DEFAULT_BARCODE_VALIDITY)
            .unwrap();
    assert!(checkout.barcode().code().starts_with("FAIRWAYCART"));
    let receipt = checkout.complete(&mut cart, &mut wallet, now).unwrap();

    // 100 + 60 + 70 from the trio, 20 from the ladder; combo bonus is not carried
    assert_eq!(receipt.points_earned, Points::new(250));
    assert_eq!(wallet.balance(), Points::new(250));
}

#[test]
fn expired_barcode_leaves_cart_and_wallet_alone() {
    let (_, mut cart) = run_into_cart(&ladder(1), &[Scan]);
    let mut wallet = PointsWallet::new(Points::new(5));
    let now = Utc::now();
    let checkout =
        Checkout::begin(&cart, &store(), CheckoutScope::Cart, now, TimeDelta::minutes(15))
            .unwrap();

    let err = checkout
        .complete(&mut cart, &mut wallet, now + TimeDelta::minutes(15))
        .unwrap_err();
    assert!(matches!(err, CheckoutError::BarcodeExpired { .. }));
    assert_eq!(cart.len(), 1);
    assert_eq!(wallet.balance(), Points::new(5));
}

#[test]
fn empty_cart_cannot_check_out() {
    let err = Checkout::begin(
        &Cart::new(),
        &store(),
        CheckoutScope::Cart,
        Utc::now(),
        DEFAULT_BARCODE_VALIDITY,
    )
    .unwrap_err();
    assert_eq!(err, CheckoutError::EmptyCart);
}

#[test]
fn all_skipped_cart_still_checks_out_at_zero() {
    let (_, mut cart) = run_into_cart(&ladder(2), &[Skip, Skip]);
    let mut wallet = PointsWallet::new(Points::ZERO);
    let now = Utc::now();
    let checkout =
        Checkout::begin(&cart, &store(), CheckoutScope::Cart, now, DEFAULT_BARCODE_VALIDITY)
            .unwrap();
    assert_eq!(checkout.totals().total.cents(), 0);
    let receipt = checkout.complete(&mut cart, &mut wallet, now).unwrap();
    assert_eq!(receipt.points_earned, Points::ZERO);
    assert!(cart.is_empty());
}
