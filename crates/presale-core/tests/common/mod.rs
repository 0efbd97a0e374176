//! Shared fixtures for presale integration tests

#![allow(dead_code)]

use meme_presale_core::{
    Address, Amount, ManualClock, PreSale, SaleConfig, Timestamp, SECONDS_PER_DAY,
};

/// One whole native unit (9 decimals)
pub const ETHER: Amount = 1_000_000_000;

pub const GENESIS: Timestamp = 1_700_000_000;
pub const WEEK: i64 = 7 * SECONDS_PER_DAY;
pub const HOUR: i64 = 3_600;

pub const RATE: u64 = 1_000;
pub const GOAL: Amount = 5 * ETHER;
pub const SOFT_CAP: Amount = 10 * ETHER;
pub const CAP: Amount = 15 * ETHER;
pub const SOFT_CAP_TIME: i64 = 120 * HOUR;
pub const MIN_CONTRIBUTION: Amount = ETHER / 10;
pub const MAX_FEE_RATE: u64 = 100;
pub const ABOVE_FEE_LIMIT: u64 = MAX_FEE_RATE + 1;
pub const PENALTY: u8 = 80;

pub fn address(label: &str) -> Address {
    Address::from_label(label).expect("label fits in an address")
}

pub fn deployer() -> Address {
    address("deployer")
}

pub fn wallet() -> Address {
    address("wallet")
}

pub fn token() -> Address {
    address("token")
}

pub fn start_time() -> Timestamp {
    GENESIS + WEEK
}

pub fn end_time() -> Timestamp {
    start_time() + WEEK
}

pub fn after_end_time() -> Timestamp {
    end_time() + 1
}

pub fn config() -> SaleConfig {
    SaleConfig {
        start_time: start_time(),
        end_time: end_time(),
        min_contribution: MIN_CONTRIBUTION,
        rate: RATE,
        goal: GOAL,
        soft_cap: SOFT_CAP,
        soft_cap_extension: SOFT_CAP_TIME,
        cap: CAP,
        max_fee_rate: MAX_FEE_RATE,
        max_fee_penalty_percent: PENALTY,
        wallet: wallet(),
        token: token(),
    }
}

/// Fresh sale one week before its start
pub fn presale() -> (PreSale<ManualClock>, ManualClock) {
    let clock = ManualClock::new(GENESIS);
    let sale = PreSale::new(deployer(), config(), clock.clone()).expect("valid config");
    (sale, clock)
}
