//! Post-finalization claims
//!
//! Anyone may crank a claim; value and tokens always go to the account
//! whose balance is being settled.

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};
use meme_presale_core::math::{safe_cast_u128_to_u64, tokens_for_value};
use meme_presale_core::{check_claimable, check_refundable};

use crate::{
    constants::{DEPOSIT_SEED, SALE_SEED, STAKE_SEED, VAULT_SEED},
    error::PresaleErrorCode,
    events::{Refunded, TokensClaimed},
    state::{DepositAccount, Sale, StakeAccount},
    utils::{current_timestamp, transfer_native_from_vault, transfer_tokens_from_sale},
};

#[derive(Accounts)]
pub struct ClaimRefund<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Box<Account<'info, Sale>>,

    /// Purchaser being refunded
    #[account(mut)]
    pub purchaser: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [DEPOSIT_SEED, sale.key().as_ref(), purchaser.key().as_ref()],
        bump = deposit.bump,
    )]
    pub deposit: Account<'info, DepositAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn claim_refund(ctx: Context<ClaimRefund>) -> Result<()> {
    let now = current_timestamp()?;
    let sale_key = ctx.accounts.sale.key();
    let sale = &mut ctx.accounts.sale;
    check_refundable(sale.has_ended(now), sale.goal_reached(), sale.finalized)
        .map_err(PresaleErrorCode::from)?;
    let amount = sale
        .settle_refund(&mut ctx.accounts.deposit)
        .map_err(PresaleErrorCode::from)?;

    let bump = [ctx.accounts.sale.vault_bump];
    let vault_seeds: &[&[u8]] = &[VAULT_SEED, sale_key.as_ref(), &bump];
    transfer_native_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.purchaser.to_account_info(),
        &ctx.accounts.system_program,
        &[vault_seeds],
        amount,
    )?;

    let purchaser = ctx.accounts.purchaser.key();
    msg!("Refunded {} to {}", amount, purchaser);
    emit!(Refunded {
        sale: sale_key,
        purchaser,
        amount,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct ClaimToken<'info> {
    /// Pays for the beneficiary token account if it does not exist yet
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [SALE_SEED, token_mint.key().as_ref()],
        bump = sale.bump,
        has_one = token_mint,
    )]
    pub sale: Box<Account<'info, Sale>>,

    /// CHECK: only used as the owner of the receiving token account
    pub beneficiary: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [STAKE_SEED, sale.key().as_ref(), beneficiary.key().as_ref()],
        bump = stake.bump,
    )]
    pub stake: Account<'info, StakeAccount>,

    pub token_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = token_mint,
        associated_token::authority = sale,
    )]
    pub token_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = token_mint,
        associated_token::authority = beneficiary,
    )]
    pub beneficiary_token: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn claim_token(ctx: Context<ClaimToken>) -> Result<()> {
    let now = current_timestamp()?;
    let sale = &ctx.accounts.sale;
    check_claimable(sale.has_ended(now), sale.goal_reached(), sale.finalized)
        .map_err(PresaleErrorCode::from)?;

    let stake = ctx.accounts.stake.credited;
    require!(stake > 0, PresaleErrorCode::NothingToClaim);
    let tokens = tokens_for_value(stake, sale.rate)
        .and_then(safe_cast_u128_to_u64)
        .map_err(PresaleErrorCode::from)?;

    let mint_key = sale.token_mint;
    let bump = [sale.bump];
    let sale_seeds: &[&[u8]] = &[SALE_SEED, mint_key.as_ref(), &bump];
    transfer_tokens_from_sale(
        &ctx.accounts.token_vault,
        &ctx.accounts.beneficiary_token,
        &ctx.accounts.sale.to_account_info(),
        &ctx.accounts.token_program,
        &[sale_seeds],
        tokens,
    )?;

    ctx.accounts.stake.credited = 0;

    let beneficiary = ctx.accounts.beneficiary.key();
    msg!("Claimed {} tokens for {} stake to {}", tokens, stake, beneficiary);
    emit!(TokensClaimed {
        sale: ctx.accounts.sale.key(),
        beneficiary,
        stake,
        tokens,
    });
    Ok(())
}
