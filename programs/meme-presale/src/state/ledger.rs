//! Per-address books
//!
//! `StakeAccount` holds credited stake per beneficiary, the basis of token
//! claims. `DepositAccount` holds escrowed value per purchaser, the basis
//! of refunds. The two diverge whenever the fee penalty applies or someone
//! buys on behalf of another address.

use anchor_lang::prelude::*;

#[account]
#[derive(InitSpace)]
pub struct StakeAccount {
    pub sale: Pubkey,
    pub beneficiary: Pubkey,
    pub credited: u64,
    pub bump: u8,
}

#[account]
#[derive(InitSpace)]
pub struct DepositAccount {
    pub sale: Pubkey,
    pub purchaser: Pubkey,
    pub deposited: u64,
    pub bump: u8,
}
