//! Sale events recorded by the engine

use crate::types::{Address, Amount, Asset, Timestamp};

/// Which admin setter changed the config
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Caps,
    Times,
    Rate,
}

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleEvent {
    /// Accepted contribution; `amount` is `value * rate`
    TokenPurchase {
        purchaser: Address,
        beneficiary: Address,
        value: Amount,
        amount: u128,
    },
    SoftCapReached {
        total_raised: Amount,
        at: Timestamp,
    },
    Refunded {
        purchaser: Address,
        amount: Amount,
    },
    TokensClaimed {
        beneficiary: Address,
        stake: Amount,
        tokens: u128,
    },
    Finalized {
        goal_reached: bool,
        total_raised: Amount,
        released: Amount,
    },
    WhitelistUpdated {
        added: usize,
        removed: usize,
        day_count: u32,
    },
    ConfigUpdated {
        change: ConfigChange,
        version: u32,
    },
    FundsExtracted {
        asset: Asset,
        to: Address,
        amount: Option<Amount>,
    },
    OwnershipTransferred {
        previous: Address,
        new_owner: Address,
    },
}

impl SaleEvent {
    /// Short name used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            SaleEvent::TokenPurchase { .. } => "token_purchase",
            SaleEvent::SoftCapReached { .. } => "soft_cap_reached",
            SaleEvent::Refunded { .. } => "refunded",
            SaleEvent::TokensClaimed { .. } => "tokens_claimed",
            SaleEvent::Finalized { .. } => "finalized",
            SaleEvent::WhitelistUpdated { .. } => "whitelist_updated",
            SaleEvent::ConfigUpdated { .. } => "config_updated",
            SaleEvent::FundsExtracted { .. } => "funds_extracted",
            SaleEvent::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }
}
