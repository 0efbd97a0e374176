//! Owner updates to the sale parameters
//!
//! Allowed only before the sale starts. Each update builds a whole candidate
//! config and validates it before anything is written.

use anchor_lang::prelude::*;
use meme_presale_core::{CapsUpdate, SaleConfig};

use crate::{
    error::PresaleErrorCode,
    events::ConfigUpdated,
    state::Sale,
    utils::current_timestamp,
};

#[derive(Accounts)]
pub struct ConfigureSale<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ PresaleErrorCode::Unauthorized,
    )]
    pub sale: Box<Account<'info, Sale>>,
}

pub fn set_caps(
    ctx: Context<ConfigureSale>,
    goal: u64,
    soft_cap: u64,
    soft_cap_extension: i64,
    cap: u64,
) -> Result<()> {
    apply_config(ctx, |config| {
        config.with_caps(CapsUpdate {
            goal,
            soft_cap,
            soft_cap_extension,
            cap,
        })
    })
}

pub fn set_times(ctx: Context<ConfigureSale>, start_time: i64, end_time: i64) -> Result<()> {
    apply_config(ctx, |config| config.with_times(start_time, end_time))
}

pub fn set_rate(ctx: Context<ConfigureSale>, rate: u64) -> Result<()> {
    apply_config(ctx, |config| config.with_rate(rate))
}

fn apply_config(
    ctx: Context<ConfigureSale>,
    update: impl FnOnce(&SaleConfig) -> SaleConfig,
) -> Result<()> {
    let now = current_timestamp()?;
    let sale_key = ctx.accounts.sale.key();
    let sale = &mut ctx.accounts.sale;
    require!(
        sale.allows_configuration(now),
        PresaleErrorCode::SaleAlreadyStarted
    );

    let candidate = update(&sale.config());
    let version = sale
        .replace_config(candidate, now)
        .map_err(PresaleErrorCode::from)?;

    msg!("Sale config updated to version {}", version);
    emit!(ConfigUpdated {
        sale: sale_key,
        version,
    });
    Ok(())
}
