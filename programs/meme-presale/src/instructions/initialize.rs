//! Create a sale for a token mint

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};
use meme_presale_core::SaleConfig;

use crate::{
    constants::{SALE_SEED, VAULT_SEED, WHITELIST_SEED},
    error::PresaleErrorCode,
    events::SaleInitialized,
    state::{Sale, VaultStatus, WhitelistAccount},
    utils::{current_timestamp, to_address, transfer_native_from_signer},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeSaleParams {
    pub start_time: i64,
    pub end_time: i64,
    pub min_contribution: u64,
    pub rate: u64,
    pub goal: u64,
    pub soft_cap: u64,
    pub soft_cap_extension: i64,
    pub cap: u64,
    pub max_fee_rate: u64,
    pub max_fee_penalty_percent: u8,
    pub wallet: Pubkey,
}

impl InitializeSaleParams {
    fn into_config(self, token_mint: &Pubkey) -> SaleConfig {
        SaleConfig {
            start_time: self.start_time,
            end_time: self.end_time,
            min_contribution: self.min_contribution,
            rate: self.rate,
            goal: self.goal,
            soft_cap: self.soft_cap,
            soft_cap_extension: self.soft_cap_extension,
            cap: self.cap,
            max_fee_rate: self.max_fee_rate,
            max_fee_penalty_percent: self.max_fee_penalty_percent,
            wallet: to_address(&self.wallet),
            token: to_address(token_mint),
        }
    }
}

#[derive(Accounts)]
pub struct InitializeSale<'info> {
    /// Deployer, becomes the sale owner
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Token sold by this sale
    pub token_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = owner,
        space = 8 + Sale::INIT_SPACE,
        seeds = [SALE_SEED, token_mint.key().as_ref()],
        bump,
    )]
    pub sale: Box<Account<'info, Sale>>,

    #[account(
        init,
        payer = owner,
        space = 8 + WhitelistAccount::INIT_SPACE,
        seeds = [WHITELIST_SEED, sale.key().as_ref()],
        bump,
    )]
    pub whitelist: Box<Account<'info, WhitelistAccount>>,

    /// Native escrow, a system account signed for by the program
    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump,
    )]
    pub vault: SystemAccount<'info>,

    /// Holds the tokens contributors claim
    #[account(
        init,
        payer = owner,
        associated_token::mint = token_mint,
        associated_token::authority = sale,
    )]
    pub token_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn initialize_sale(ctx: Context<InitializeSale>, params: InitializeSaleParams) -> Result<()> {
    let now = current_timestamp()?;
    let token_mint = ctx.accounts.token_mint.key();
    let config = params.into_config(&token_mint);
    config.validate(now).map_err(PresaleErrorCode::from)?;

    let sale_key = ctx.accounts.sale.key();
    let sale = &mut ctx.accounts.sale;
    sale.owner = ctx.accounts.owner.key();
    sale.write_config(&config);
    sale.config_version = 0;
    sale.total_raised = 0;
    sale.cap_reached_at = None;
    sale.finalized = false;
    sale.vault_status = VaultStatus::Open;
    sale.vault_balance = 0;
    sale.day_limits = Vec::new();
    sale.bump = ctx.bumps.sale;
    sale.vault_bump = ctx.bumps.vault;

    let whitelist = &mut ctx.accounts.whitelist;
    whitelist.sale = sale_key;
    whitelist.entries = Vec::new();
    whitelist.bump = ctx.bumps.whitelist;

    // Keep the vault rent exempt so deposits are never swept by rent collection
    let rent_floor = Rent::get()?.minimum_balance(0);
    let top_up = rent_floor.saturating_sub(ctx.accounts.vault.lamports());
    transfer_native_from_signer(
        &ctx.accounts.owner,
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.system_program,
        top_up,
    )?;

    msg!(
        "Sale initialized for mint {}: window {}..={}, goal {}, cap {}",
        token_mint,
        config.start_time,
        config.end_time,
        config.goal,
        config.cap
    );

    emit!(SaleInitialized {
        sale: sale_key,
        owner: ctx.accounts.owner.key(),
        token_mint,
        wallet: ctx.accounts.sale.wallet,
        start_time: config.start_time,
        end_time: config.end_time,
        goal: config.goal,
        soft_cap: config.soft_cap,
        cap: config.cap,
    });

    Ok(())
}
