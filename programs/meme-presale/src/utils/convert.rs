//! Conversions between program keys and core addresses

use anchor_lang::prelude::*;
use meme_presale_core::Address;

pub fn to_address(key: &Pubkey) -> Address {
    Address::new(key.to_bytes())
}

pub fn to_pubkey(address: &Address) -> Pubkey {
    Pubkey::new_from_array(address.to_bytes())
}

/// Current unix timestamp from the cluster clock
pub fn current_timestamp() -> Result<i64> {
    Ok(Clock::get()?.unix_timestamp)
}
