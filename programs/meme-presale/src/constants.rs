//! Global constants for the presale program
//!
//! PDA seeds and account sizing

use anchor_lang::prelude::*;

// PDA seed constants
pub const SALE_SEED: &[u8] = b"sale";
pub const WHITELIST_SEED: &[u8] = b"whitelist";
pub const STAKE_SEED: &[u8] = b"stake";
pub const DEPOSIT_SEED: &[u8] = b"deposit";
pub const VAULT_SEED: &[u8] = b"vault";

// Compute budget program (ComputeBudget111111111111111111111111111111)
pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    3, 6, 70, 111, 229, 33, 23, 50, 255, 236, 173, 186, 114, 195, 155, 231, 188, 140, 229, 187,
    197, 247, 18, 107, 44, 67, 155, 58, 64, 0, 0, 0,
]);

/// Instruction tag of `SetComputeUnitPrice`
pub const SET_COMPUTE_UNIT_PRICE_TAG: u8 = 3;

pub use meme_presale_core::{MAX_WHITELIST_DAYS, MAX_WHITELIST_ENTRIES};
