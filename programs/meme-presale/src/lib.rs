#![allow(unexpected_cfgs)]
//! Capped presale with whitelist day tiers, escrow and refunds
//!
//! The sale rules live in `meme-presale-core`; this program stores the
//! books in accounts and moves lamports and tokens according to the quotes
//! the core produces.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
pub use state::*;

declare_id!("MemePresa1e11111111111111111111111111111111");

#[program]
pub mod meme_presale {
    use super::*;

    pub fn initialize(ctx: Context<InitializeSale>, params: InitializeSaleParams) -> Result<()> {
        instructions::initialize_sale(ctx, params)
    }

    // Owner configuration, before start
    pub fn set_caps(
        ctx: Context<ConfigureSale>,
        goal: u64,
        soft_cap: u64,
        soft_cap_extension: i64,
        cap: u64,
    ) -> Result<()> {
        instructions::set_caps(ctx, goal, soft_cap, soft_cap_extension, cap)
    }

    pub fn set_times(ctx: Context<ConfigureSale>, start_time: i64, end_time: i64) -> Result<()> {
        instructions::set_times(ctx, start_time, end_time)
    }

    pub fn set_rate(ctx: Context<ConfigureSale>, rate: u64) -> Result<()> {
        instructions::set_rate(ctx, rate)
    }

    pub fn set_whitelist(
        ctx: Context<SetWhitelist>,
        add: Vec<Pubkey>,
        remove: Vec<Pubkey>,
        day_limits: Vec<u64>,
    ) -> Result<()> {
        instructions::set_whitelist(ctx, add, remove, day_limits)
    }

    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
        instructions::transfer_ownership(ctx, new_owner)
    }

    // Contributions
    pub fn buy_tokens(ctx: Context<BuyTokens>, beneficiary: Pubkey, value: u64) -> Result<()> {
        instructions::buy_tokens(ctx, beneficiary, value)
    }

    // Settlement
    pub fn finalize(ctx: Context<Finalize>) -> Result<()> {
        instructions::finalize(ctx)
    }

    pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
        instructions::claim_refund(ctx)
    }

    pub fn claim_token(ctx: Context<ClaimToken>) -> Result<()> {
        instructions::claim_token(ctx)
    }

    pub fn extract_vault_funds(ctx: Context<ExtractVaultFunds>, mint: Option<Pubkey>) -> Result<()> {
        instructions::extract_vault_funds(ctx, mint)
    }
}
