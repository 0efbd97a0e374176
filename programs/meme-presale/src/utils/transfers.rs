//! Transfer utilities
//!
//! Native value moves through the system program; the native vault is a
//! system-owned PDA and signs with its seeds. Tokens move out of accounts
//! owned by the sale PDA.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

/// Move native value from a signer
pub fn transfer_native_from_signer<'info>(
    from: &Signer<'info>,
    to: &AccountInfo<'info>,
    system_program: &Program<'info, System>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    system_program::transfer(
        CpiContext::new(
            system_program.to_account_info(),
            system_program::Transfer {
                from: from.to_account_info(),
                to: to.clone(),
            },
        ),
        amount,
    )
}

/// Move native value out of the vault PDA
pub fn transfer_native_from_vault<'info>(
    vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    system_program: &Program<'info, System>,
    vault_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    system_program::transfer(
        CpiContext::new_with_signer(
            system_program.to_account_info(),
            system_program::Transfer {
                from: vault.clone(),
                to: to.clone(),
            },
            vault_seeds,
        ),
        amount,
    )
}

/// Transfer tokens out of an account owned by the sale PDA
pub fn transfer_tokens_from_sale<'info>(
    from: &Account<'info, TokenAccount>,
    to: &Account<'info, TokenAccount>,
    sale_authority: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
    sale_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    let cpi_accounts = Transfer {
        from: from.to_account_info(),
        to: to.to_account_info(),
        authority: sale_authority.clone(),
    };
    let cpi_ctx =
        CpiContext::new_with_signer(token_program.to_account_info(), cpi_accounts, sale_seeds);
    token::transfer(cpi_ctx, amount)
}
