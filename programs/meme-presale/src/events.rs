//! Event definitions

use anchor_lang::prelude::*;

#[event]
pub struct SaleInitialized {
    pub sale: Pubkey,
    pub owner: Pubkey,
    pub token_mint: Pubkey,
    pub wallet: Pubkey,
    pub start_time: i64,
    pub end_time: i64,
    pub goal: u64,
    pub soft_cap: u64,
    pub cap: u64,
}

/// Event emitted for every accepted contribution
#[event]
pub struct TokenPurchase {
    pub sale: Pubkey,
    pub purchaser: Pubkey,
    pub beneficiary: Pubkey,
    /// Accepted native value
    pub value: u64,
    /// `value * rate`
    pub amount: u128,
    /// Stake credited after the fee penalty
    pub credited: u64,
    /// Sent value that was not accepted and never debited
    pub excess: u64,
    pub to_wallet: bool,
    pub timestamp: i64,
}

#[event]
pub struct SoftCapReached {
    pub sale: Pubkey,
    pub total_raised: u64,
    pub timestamp: i64,
}

#[event]
pub struct Refunded {
    pub sale: Pubkey,
    pub purchaser: Pubkey,
    pub amount: u64,
}

#[event]
pub struct TokensClaimed {
    pub sale: Pubkey,
    pub beneficiary: Pubkey,
    pub stake: u64,
    pub tokens: u64,
}

#[event]
pub struct SaleFinalized {
    pub sale: Pubkey,
    pub goal_reached: bool,
    pub total_raised: u64,
    pub released: u64,
    pub timestamp: i64,
}

#[event]
pub struct WhitelistUpdated {
    pub sale: Pubkey,
    pub added: u32,
    pub removed: u32,
    pub entries: u32,
    pub day_count: u32,
}

#[event]
pub struct ConfigUpdated {
    pub sale: Pubkey,
    pub version: u32,
}

#[event]
pub struct VaultFundsExtracted {
    /// `None` for native value
    pub mint: Option<Pubkey>,
    pub sale: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
}

#[event]
pub struct OwnershipTransferred {
    pub sale: Pubkey,
    pub previous: Pubkey,
    pub new_owner: Pubkey,
}
