//! Whitelist management and tier-gated contributions

mod common;

use common::*;
use meme_presale_core::{PresaleError, SalePhase, SECONDS_PER_DAY};

#[test]
fn test_set_whitelist_until_start() {
    let (mut sale, clock) = presale();
    let investor = address("investor");
    let purchaser = address("purchaser");
    sale.set_whitelist(&deployer(), &[investor, purchaser], &[], vec![ETHER, 2 * ETHER])
        .unwrap();

    clock.set(start_time());
    assert_eq!(
        sale.set_whitelist(&deployer(), &[investor, purchaser], &[], vec![ETHER, 2 * ETHER]),
        Err(PresaleError::SaleAlreadyStarted)
    );
}

#[test]
fn test_only_owner_sets_whitelist() {
    let (mut sale, _) = presale();
    let investor = address("investor");
    assert_eq!(
        sale.set_whitelist(&investor, &[investor], &[], vec![ETHER]),
        Err(PresaleError::Unauthorized)
    );
    assert!(!sale.whitelist(&investor));
}

#[test]
fn test_delete_from_whitelist_keeps_days() {
    let (mut sale, _) = presale();
    let investor = address("investor");
    let purchaser = address("purchaser");
    sale.set_whitelist(&deployer(), &[investor, purchaser], &[], vec![ETHER, 2 * ETHER])
        .unwrap();
    assert!(sale.whitelist(&investor));
    assert!(sale.whitelist(&purchaser));
    assert_eq!(sale.whitelist_day_count(), 2);

    sale.set_whitelist(&deployer(), &[], &[purchaser], vec![]).unwrap();
    assert!(sale.whitelist(&investor));
    assert!(!sale.whitelist(&purchaser));
    assert_eq!(sale.whitelist_day_count(), 2);
}

#[test]
fn test_modify_whitelist_days() {
    let (mut sale, _) = presale();
    let investor = address("investor");
    sale.set_whitelist(&deployer(), &[investor], &[], vec![ETHER, 2 * ETHER])
        .unwrap();
    assert_eq!(sale.whitelist_day_count(), 2);
    assert_eq!(sale.whitelist_day_max_stake(0), 0);
    assert_eq!(sale.whitelist_day_max_stake(1), ETHER);
    assert_eq!(sale.whitelist_day_max_stake(2), 2 * ETHER);

    sale.set_whitelist(&deployer(), &[], &[], vec![2 * ETHER]).unwrap();
    assert!(sale.whitelist(&investor));
    assert_eq!(sale.whitelist_day_count(), 1);
    assert_eq!(sale.whitelist_day_max_stake(0), 0);
    assert_eq!(sale.whitelist_day_max_stake(1), 2 * ETHER);
    assert_eq!(sale.whitelist_day_max_stake(2), 2 * ETHER);
}

#[test]
fn test_two_and_three_ether_table() {
    let (mut sale, _) = presale();
    sale.set_whitelist(&deployer(), &[], &[], vec![2 * ETHER, 3 * ETHER])
        .unwrap();
    assert_eq!(sale.whitelist_day_count(), 2);
    assert_eq!(sale.whitelist_day_max_stake(0), 0);
    assert_eq!(sale.whitelist_day_max_stake(1), 2 * ETHER);
    assert_eq!(sale.whitelist_day_max_stake(2), 3 * ETHER);
    assert_eq!(sale.whitelist_day_max_stake(3), 3 * ETHER);
}

#[test]
fn test_gated_window_admits_only_enabled_beneficiaries() {
    let (mut sale, clock) = presale();
    let investor = address("investor");
    let purchaser = address("purchaser");
    sale.set_whitelist(
        &deployer(),
        &[investor],
        &[],
        vec![2 * MIN_CONTRIBUTION, 3 * MIN_CONTRIBUTION],
    )
    .unwrap();

    clock.set(start_time());
    sale.buy(investor, MIN_CONTRIBUTION, 0).unwrap();
    assert_eq!(
        sale.buy(purchaser, MIN_CONTRIBUTION, 0).err(),
        Some(PresaleError::NotWhitelisted)
    );
    // the beneficiary decides, not the payer
    sale.contribute(purchaser, investor, MIN_CONTRIBUTION, 0).unwrap();
    assert_eq!(sale.stakes(&investor), 2 * MIN_CONTRIBUTION);

    clock.set(start_time() + 2 * SECONDS_PER_DAY);
    assert_eq!(sale.phase(), SalePhase::Active);
    sale.buy(purchaser, MIN_CONTRIBUTION, 0).unwrap();
}

#[test]
fn test_tier_refunds_excess() {
    let (mut sale, clock) = presale();
    let investor = address("investor");
    sale.set_whitelist(
        &deployer(),
        &[investor],
        &[],
        vec![2 * MIN_CONTRIBUTION, 3 * MIN_CONTRIBUTION],
    )
    .unwrap();

    clock.set(start_time());
    let receipt = sale.buy(investor, 5 * MIN_CONTRIBUTION, 0).unwrap();
    assert_eq!(receipt.accepted, 2 * MIN_CONTRIBUTION);
    assert_eq!(receipt.refunded, 3 * MIN_CONTRIBUTION);

    assert_eq!(
        sale.buy(investor, MIN_CONTRIBUTION, 0).err(),
        Some(PresaleError::CapExceeded)
    );

    clock.set(start_time() + SECONDS_PER_DAY);
    let receipt = sale.buy(investor, 5 * MIN_CONTRIBUTION, 0).unwrap();
    assert_eq!(receipt.accepted, MIN_CONTRIBUTION);
}

#[test]
fn test_tier_limit_applies_to_credited_stake() {
    let (mut sale, clock) = presale();
    let investor = address("investor");
    sale.set_whitelist(
        &deployer(),
        &[investor],
        &[],
        vec![2 * MIN_CONTRIBUTION, 3 * MIN_CONTRIBUTION],
    )
    .unwrap();

    clock.set(start_time());
    let receipt = sale
        .buy(investor, 2 * MIN_CONTRIBUTION, ABOVE_FEE_LIMIT)
        .unwrap();
    assert_eq!(receipt.accepted, 2 * MIN_CONTRIBUTION);
    assert_eq!(receipt.credited, 2 * MIN_CONTRIBUTION * 80 / 100);

    // penalized stake leaves room under the tier
    let receipt = sale.buy(investor, MIN_CONTRIBUTION, 0).unwrap();
    assert_eq!(receipt.accepted, 2 * MIN_CONTRIBUTION - 2 * MIN_CONTRIBUTION * 80 / 100);
}
