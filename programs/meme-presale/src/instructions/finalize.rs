//! Close the sale after it ends
//!
//! With the goal reached the vault balance is released to the wallet;
//! otherwise the vault switches to refunding.

use anchor_lang::prelude::*;
use meme_presale_core::SalePhase;

use crate::{
    constants::VAULT_SEED,
    error::PresaleErrorCode,
    events::SaleFinalized,
    state::Sale,
    utils::{current_timestamp, transfer_native_from_vault},
};

#[derive(Accounts)]
pub struct Finalize<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ PresaleErrorCode::Unauthorized,
        has_one = wallet @ PresaleErrorCode::InvalidVault,
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub vault: SystemAccount<'info>,

    #[account(mut)]
    pub wallet: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn finalize(ctx: Context<Finalize>) -> Result<()> {
    let now = current_timestamp()?;
    let sale_key = ctx.accounts.sale.key();

    let phase = ctx.accounts.sale.phase(now);
    if !phase.can_transition_to(SalePhase::Finalized) {
        return match phase {
            SalePhase::Finalized => err!(PresaleErrorCode::AlreadyFinalized),
            _ => err!(PresaleErrorCode::NotEnded),
        };
    }

    let goal_reached = ctx.accounts.sale.goal_reached();
    let released = ctx
        .accounts
        .sale
        .close_vault(goal_reached)
        .map_err(PresaleErrorCode::from)?;
    let bump = [ctx.accounts.sale.vault_bump];
    let vault_seeds: &[&[u8]] = &[VAULT_SEED, sale_key.as_ref(), &bump];
    transfer_native_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.wallet.to_account_info(),
        &ctx.accounts.system_program,
        &[vault_seeds],
        released,
    )?;

    let sale = &mut ctx.accounts.sale;
    sale.finalized = true;

    msg!(
        "Sale finalized: goal reached {}, raised {}, released {}",
        goal_reached,
        sale.total_raised,
        released
    );
    emit!(SaleFinalized {
        sale: sale_key,
        goal_reached,
        total_raised: sale.total_raised,
        released,
        timestamp: now,
    });
    Ok(())
}
