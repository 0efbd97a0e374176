use anchor_lang::prelude::*;

use crate::{error::PresaleErrorCode, events::OwnershipTransferred, state::Sale};

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        has_one = owner @ PresaleErrorCode::Unauthorized,
    )]
    pub sale: Box<Account<'info, Sale>>,
}

pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
    require!(new_owner != Pubkey::default(), PresaleErrorCode::InvalidConfig);

    let sale_key = ctx.accounts.sale.key();
    let sale = &mut ctx.accounts.sale;
    let previous = sale.owner;
    sale.owner = new_owner;

    msg!("Sale owner changed from {} to {}", previous, new_owner);
    emit!(OwnershipTransferred {
        sale: sale_key,
        previous,
        new_owner,
    });
    Ok(())
}
