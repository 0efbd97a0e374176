//! Stake ledger: credited stake per beneficiary, the basis of token claims.
//! Entries only grow while the sale runs and are zeroed once by a claim.

use std::collections::BTreeMap;

use crate::errors::{PresaleError, PresaleResult};
use crate::math::{safe_add_u64, safe_sub_u64};
use crate::types::{Address, Amount};

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeLedger {
    stakes: BTreeMap<Address, Amount>,
    total_credited: Amount,
}

impl StakeLedger {
    /// Credited stake of `beneficiary`
    pub fn stake(&self, beneficiary: &Address) -> Amount {
        self.stakes.get(beneficiary).copied().unwrap_or_default()
    }

    /// Sum of all outstanding credited stake
    pub fn total_credited(&self) -> Amount {
        self.total_credited
    }

    pub fn holders(&self) -> usize {
        self.stakes.len()
    }

    pub fn credit(&mut self, beneficiary: Address, amount: Amount) -> PresaleResult<Amount> {
        let total = safe_add_u64(self.total_credited, amount)?;
        let entry = self.stakes.entry(beneficiary).or_default();
        *entry = safe_add_u64(*entry, amount)?;
        self.total_credited = total;
        Ok(*entry)
    }

    /// Remove and return the stake of `beneficiary`
    pub fn take(&mut self, beneficiary: &Address) -> PresaleResult<Amount> {
        let stake = self.stake(beneficiary);
        if stake == 0 {
            return Err(PresaleError::NothingToClaim);
        }
        self.total_credited = safe_sub_u64(self.total_credited, stake)?;
        self.stakes.remove(beneficiary);
        Ok(stake)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.stakes.iter()
    }
}
