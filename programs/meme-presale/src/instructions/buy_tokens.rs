//! Contribute native value for sale tokens
//!
//! Only the accepted part of `value` is debited from the purchaser; any
//! excess over the remaining cap or the beneficiary's tier is simply not
//! taken. Accepted value goes whole to the wallet once the goal is reached
//! and into the escrow vault before that.

use anchor_lang::prelude::*;
use meme_presale_core::{quote_contribution, ContributionRequest, DayLimits, Route};
use solana_program::sysvar::instructions as sysvar_instructions;

use crate::{
    constants::{DEPOSIT_SEED, SALE_SEED, STAKE_SEED, VAULT_SEED, WHITELIST_SEED},
    error::PresaleErrorCode,
    events::{SoftCapReached, TokenPurchase},
    state::{DepositAccount, Sale, StakeAccount, WhitelistAccount},
    utils::{current_timestamp, declared_compute_unit_price, transfer_native_from_signer},
};

#[derive(Accounts)]
#[instruction(beneficiary: Pubkey)]
pub struct BuyTokens<'info> {
    #[account(mut)]
    pub purchaser: Signer<'info>,

    #[account(
        mut,
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        seeds = [WHITELIST_SEED, sale.key().as_ref()],
        bump = whitelist.bump,
    )]
    pub whitelist: Box<Account<'info, WhitelistAccount>>,

    /// Credited stake of the beneficiary
    #[account(
        init_if_needed,
        payer = purchaser,
        space = 8 + StakeAccount::INIT_SPACE,
        seeds = [STAKE_SEED, sale.key().as_ref(), beneficiary.as_ref()],
        bump,
    )]
    pub stake: Account<'info, StakeAccount>,

    /// Escrowed value of the purchaser
    #[account(
        init_if_needed,
        payer = purchaser,
        space = 8 + DepositAccount::INIT_SPACE,
        seeds = [DEPOSIT_SEED, sale.key().as_ref(), purchaser.key().as_ref()],
        bump,
    )]
    pub deposit: Account<'info, DepositAccount>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    #[account(
        mut,
        address = sale.wallet @ PresaleErrorCode::InvalidVault,
    )]
    pub wallet: SystemAccount<'info>,

    /// CHECK: instructions sysvar, address constrained
    #[account(address = sysvar_instructions::ID)]
    pub instructions: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn buy_tokens(ctx: Context<BuyTokens>, beneficiary: Pubkey, value: u64) -> Result<()> {
    let now = current_timestamp()?;
    let fee_rate = declared_compute_unit_price(&ctx.accounts.instructions.to_account_info())?;
    let sale_key = ctx.accounts.sale.key();
    let purchaser = ctx.accounts.purchaser.key();

    let sale = &ctx.accounts.sale;
    let limits = DayLimits::new(sale.day_limits.clone()).map_err(PresaleErrorCode::from)?;
    let request = ContributionRequest {
        value,
        fee_rate,
        beneficiary_enabled: ctx.accounts.whitelist.contains(&beneficiary),
        prior_credited: ctx.accounts.stake.credited,
    };
    let quote = quote_contribution(&sale.config(), &limits, sale.totals(), request, now)
        .map_err(PresaleErrorCode::from)?;

    let sale = &mut ctx.accounts.sale;
    let deposit = &mut ctx.accounts.deposit;
    if quote.route == Route::Vault && deposit.sale == Pubkey::default() {
        deposit.sale = sale_key;
        deposit.purchaser = purchaser;
        deposit.bump = ctx.bumps.deposit;
    }
    sale.book_deposit(deposit, &quote).map_err(PresaleErrorCode::from)?;

    let destination = match quote.route {
        Route::Wallet => ctx.accounts.wallet.to_account_info(),
        Route::Vault => ctx.accounts.vault.to_account_info(),
    };
    transfer_native_from_signer(
        &ctx.accounts.purchaser,
        &destination,
        &ctx.accounts.system_program,
        quote.accepted,
    )?;

    let stake = &mut ctx.accounts.stake;
    if stake.sale == Pubkey::default() {
        stake.sale = sale_key;
        stake.beneficiary = beneficiary;
        stake.bump = ctx.bumps.stake;
    }
    stake.credited = stake
        .credited
        .checked_add(quote.credited)
        .ok_or(PresaleErrorCode::MathOverflow)?;

    let sale = &mut ctx.accounts.sale;
    let latched = sale.record_contribution(&quote, now);

    msg!(
        "Purchase: {} accepted, {} excess, {} credited to {}, fee rate {}",
        quote.accepted,
        quote.refunded,
        quote.credited,
        beneficiary,
        fee_rate
    );

    emit!(TokenPurchase {
        sale: sale_key,
        purchaser,
        beneficiary,
        value: quote.accepted,
        amount: quote.tokens,
        credited: quote.credited,
        excess: quote.refunded,
        to_wallet: quote.route == Route::Wallet,
        timestamp: now,
    });

    if latched {
        msg!("Soft cap reached at {}", now);
        emit!(SoftCapReached {
            sale: sale_key,
            total_raised: sale.total_raised,
            timestamp: now,
        });
    }

    Ok(())
}
