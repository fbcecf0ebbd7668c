//! Builtin catalog data drives real sessions.

use std::sync::Arc;

use swipecart_engine::swipecart_types::{ChallengeId, Points, RewardId};
use swipecart_engine::{Catalog, CatalogError, PointsWallet, RedeemError};

use crate::common::{Scan, Skip, run_into_cart};

#[test]
fn builtin_catalog_loads() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(catalog.stores().len(), 6);
    assert_eq!(catalog.challenges().len(), 6);
    assert_eq!(catalog.default_store().name, "ShopRite");
    for challenge in catalog.challenges() {
        assert!(!challenge.is_empty(), "{}", challenge.id());
        assert!(challenge.time_limit().is_some(), "{}", challenge.id());
    }
}

#[test]
fn breakfast_run_matches_hand_count() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.challenge(&ChallengeId::new("1")).unwrap();
    // eggs are promo: 100 + 60 + 70 + 70
    assert_eq!(challenge.potential_points(), Points::new(300));

    let (session, cart) = run_into_cart(&challenge, &[Scan, Scan, Scan, Skip]);
    assert_eq!(session.earned_points(), Points::new(100 + 60 + 70 + 10));
    assert_eq!(session.potential_points(), Points::new(230));
    assert_eq!(cart.total_price().cents(), 499 + 349 + 399);
    assert!(Arc::ptr_eq(
        &challenge,
        &catalog.challenge(&ChallengeId::new("1")).unwrap()
    ));
}

#[test]
fn rewards_redeem_against_wallet() {
    let catalog = Catalog::builtin().unwrap();
    let mut wallet = PointsWallet::new(PointsWallet::DEFAULT_STARTING_BALANCE);
    let cheap = catalog.reward(&RewardId::new("1")).unwrap();

    let left = wallet.redeem(cheap).unwrap();
    assert_eq!(left, Points::new(1250).saturating_sub(cheap.points_cost));
    assert!(matches!(
        wallet.redeem(cheap),
        Err(RedeemError::AlreadyRedeemed(_))
    ));
}

#[test]
fn catalog_file_with_bad_item_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let json = serde_json::json!({
        "stores": [{ "id": "s", "name": "S", "theme": "s" }],
        "challenges": [{
            "id": "x",
            "title": "Bad",
            "items": [{ "id": "1", "name": "Gum", "points": -5, "price": 1.0 }]
        }]
    });
    std::fs::write(&path, json.to_string()).unwrap();

    let err = Catalog::from_path(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "{err}");
}
