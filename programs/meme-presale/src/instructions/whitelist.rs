//! Owner edits to the whitelist and its day table

use anchor_lang::prelude::*;

use crate::{
    constants::WHITELIST_SEED,
    error::PresaleErrorCode,
    events::WhitelistUpdated,
    state::{Sale, WhitelistAccount},
    utils::{current_timestamp, to_address},
};

#[derive(Accounts)]
pub struct SetWhitelist<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ PresaleErrorCode::Unauthorized,
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        mut,
        seeds = [WHITELIST_SEED, sale.key().as_ref()],
        bump = whitelist.bump,
    )]
    pub whitelist: Box<Account<'info, WhitelistAccount>>,
}

/// Enable `add`, then disable `remove`. A non-empty `day_limits` replaces
/// the day table; an empty one keeps it.
pub fn set_whitelist(
    ctx: Context<SetWhitelist>,
    add: Vec<Pubkey>,
    remove: Vec<Pubkey>,
    day_limits: Vec<u64>,
) -> Result<()> {
    let now = current_timestamp()?;
    let sale_key = ctx.accounts.sale.key();
    let sale = &mut ctx.accounts.sale;
    require!(
        sale.allows_configuration(now),
        PresaleErrorCode::SaleAlreadyStarted
    );

    let whitelist_account = &mut ctx.accounts.whitelist;
    let mut whitelist = whitelist_account
        .load(&sale.day_limits)
        .map_err(PresaleErrorCode::from)?;

    let add: Vec<_> = add.iter().map(to_address).collect();
    let remove: Vec<_> = remove.iter().map(to_address).collect();
    whitelist
        .apply(&add, &remove, day_limits)
        .map_err(PresaleErrorCode::from)?;

    sale.day_limits = whitelist_account.store(&whitelist);

    msg!(
        "Whitelist updated: {} entries, {} days",
        whitelist.enabled_count(),
        whitelist.day_count()
    );
    emit!(WhitelistUpdated {
        sale: sale_key,
        added: add.len() as u32,
        removed: remove.len() as u32,
        entries: whitelist.enabled_count() as u32,
        day_count: whitelist.day_count(),
    });
    Ok(())
}
