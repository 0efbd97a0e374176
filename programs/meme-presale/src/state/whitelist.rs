//! Whitelist account
//!
//! Enabled addresses live in their own PDA so the sale account stays small;
//! the day table lives on the sale.

use anchor_lang::prelude::*;
use meme_presale_core::{Address, PresaleResult, Whitelist};

use crate::constants::MAX_WHITELIST_ENTRIES;
use crate::utils::{to_address, to_pubkey};

#[account]
#[derive(InitSpace)]
pub struct WhitelistAccount {
    pub sale: Pubkey,
    #[max_len(MAX_WHITELIST_ENTRIES)]
    pub entries: Vec<Pubkey>,
    pub bump: u8,
}

impl WhitelistAccount {
    pub fn contains(&self, key: &Pubkey) -> bool {
        self.entries.contains(key)
    }

    /// Rebuild the in-memory whitelist from this account and `day_limits`
    pub fn load(&self, day_limits: &[u64]) -> PresaleResult<Whitelist> {
        let entries: Vec<Address> = self.entries.iter().map(to_address).collect();
        let mut whitelist = Whitelist::default();
        whitelist.apply(&entries, &[], day_limits.to_vec())?;
        Ok(whitelist)
    }

    /// Write the enabled set back, returning the new day table
    pub fn store(&mut self, whitelist: &Whitelist) -> Vec<u64> {
        self.entries = whitelist.enabled().map(to_pubkey).collect();
        whitelist.limits().as_slice().to_vec()
    }
}
