//! Owner sweep of funds held by the sale once the goal is met
//!
//! `mint = None` sweeps the native vault to `to`. `Some(mint)` sweeps a
//! foreign token account owned by the sale; the sale token itself is
//! reserved for claims.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::{SALE_SEED, VAULT_SEED},
    error::PresaleErrorCode,
    events::VaultFundsExtracted,
    state::Sale,
    utils::{transfer_native_from_vault, transfer_tokens_from_sale},
};

#[derive(Accounts)]
pub struct ExtractVaultFunds<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ PresaleErrorCode::Unauthorized,
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    /// Native recipient
    #[account(mut)]
    pub to: SystemAccount<'info>,

    /// Foreign token account owned by the sale
    #[account(
        mut,
        token::authority = sale,
    )]
    pub foreign_vault: Option<Box<Account<'info, TokenAccount>>>,

    /// Receives the foreign tokens
    #[account(mut)]
    pub destination_token: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn extract_vault_funds(ctx: Context<ExtractVaultFunds>, mint: Option<Pubkey>) -> Result<()> {
    let sale_key = ctx.accounts.sale.key();
    require!(
        ctx.accounts.sale.goal_reached(),
        PresaleErrorCode::GoalNotMet
    );

    let (to, amount) = match mint {
        None => {
            let amount = ctx
                .accounts
                .sale
                .release_vault()
                .map_err(PresaleErrorCode::from)?;
            let bump = [ctx.accounts.sale.vault_bump];
            let vault_seeds: &[&[u8]] = &[VAULT_SEED, sale_key.as_ref(), &bump];
            transfer_native_from_vault(
                &ctx.accounts.vault.to_account_info(),
                &ctx.accounts.to.to_account_info(),
                &ctx.accounts.system_program,
                &[vault_seeds],
                amount,
            )?;
            (ctx.accounts.to.key(), amount)
        }
        Some(mint) => {
            let sale = &ctx.accounts.sale;
            require!(mint != sale.token_mint, PresaleErrorCode::SaleTokenLocked);
            let (Some(from), Some(destination)) = (
                ctx.accounts.foreign_vault.as_ref(),
                ctx.accounts.destination_token.as_ref(),
            ) else {
                return err!(PresaleErrorCode::MissingTokenAccounts);
            };
            require!(
                from.mint == mint && destination.mint == mint,
                PresaleErrorCode::InvalidVault
            );

            let amount = from.amount;
            let mint_key = sale.token_mint;
            let bump = [sale.bump];
            let sale_seeds: &[&[u8]] = &[SALE_SEED, mint_key.as_ref(), &bump];
            transfer_tokens_from_sale(
                from,
                destination,
                &sale.to_account_info(),
                &ctx.accounts.token_program,
                &[sale_seeds],
                amount,
            )?;
            (destination.key(), amount)
        }
    };

    msg!("Extracted {} to {}", amount, to);
    emit!(VaultFundsExtracted {
        mint,
        sale: sale_key,
        to,
        amount,
    });
    Ok(())
}
