//! # Escrow Vault
//!
//! Holds contributions routed away from the wallet while the goal is not yet
//! reached. The vault is `Open` while the sale collects funds and is closed
//! exactly once, either into refunding or by releasing its balance. A unit
//! of value can therefore leave the vault as a refund or as a release, never
//! both.
//!
//! Deposits are booked per purchaser so refunds return the full accepted
//! value regardless of any stake penalty.

use std::collections::BTreeMap;

use crate::errors::{PresaleError, PresaleResult};
use crate::math::{safe_add_u64, safe_sub_u64};
use crate::types::{Address, Amount};

/// How a closed vault settles
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Goal missed: depositors withdraw their own deposits
    Refunding,
    /// Goal met: the balance was released in one sweep
    Released,
}

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VaultState {
    #[default]
    Open,
    Closed(Settlement),
}

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscrowVault {
    state: VaultState,
    balance: Amount,
    deposits: BTreeMap<Address, Amount>,
    total_refunded: Amount,
    total_released: Amount,
}

impl EscrowVault {
    pub fn state(&self) -> VaultState {
        self.state
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// True only once the vault closed into refunding
    pub fn is_refundable(&self) -> bool {
        self.state == VaultState::Closed(Settlement::Refunding)
    }

    /// Refundable value booked for `purchaser`
    pub fn deposited(&self, purchaser: &Address) -> Amount {
        self.deposits.get(purchaser).copied().unwrap_or_default()
    }

    pub fn total_refunded(&self) -> Amount {
        self.total_refunded
    }

    pub fn total_released(&self) -> Amount {
        self.total_released
    }

    pub fn deposit(&mut self, purchaser: Address, amount: Amount) -> PresaleResult<()> {
        if self.state != VaultState::Open {
            return Err(PresaleError::VaultClosed);
        }
        let balance = safe_add_u64(self.balance, amount)?;
        let booked = safe_add_u64(self.deposited(&purchaser), amount)?;
        self.balance = balance;
        self.deposits.insert(purchaser, booked);
        Ok(())
    }

    pub fn close_for_refunds(&mut self) -> PresaleResult<()> {
        if self.state != VaultState::Open {
            return Err(PresaleError::VaultClosed);
        }
        self.state = VaultState::Closed(Settlement::Refunding);
        Ok(())
    }

    /// Close the vault (if still open) and sweep its whole balance.
    /// A vault that is refunding never releases.
    pub fn release_all(&mut self) -> PresaleResult<Amount> {
        match self.state {
            VaultState::Closed(Settlement::Refunding) => Err(PresaleError::VaultClosed),
            VaultState::Open | VaultState::Closed(Settlement::Released) => {
                let amount = self.balance;
                self.total_released = safe_add_u64(self.total_released, amount)?;
                self.balance = 0;
                self.deposits.clear();
                self.state = VaultState::Closed(Settlement::Released);
                Ok(amount)
            }
        }
    }

    /// Pay back everything `purchaser` deposited
    pub fn refund(&mut self, purchaser: &Address) -> PresaleResult<Amount> {
        if !self.is_refundable() {
            return Err(PresaleError::VaultNotRefunding);
        }
        let amount = self.deposited(purchaser);
        if amount == 0 {
            return Err(PresaleError::NothingToRefund);
        }
        let balance = safe_sub_u64(self.balance, amount)?;
        self.total_refunded = safe_add_u64(self.total_refunded, amount)?;
        self.balance = balance;
        self.deposits.remove(purchaser);
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::new([b; 32])
    }

    #[test]
    fn test_open_vault_accepts_deposits() {
        let mut vault = EscrowVault::default();
        vault.deposit(addr(1), 10).unwrap();
        vault.deposit(addr(1), 5).unwrap();
        vault.deposit(addr(2), 3).unwrap();
        assert_eq!(vault.balance(), 18);
        assert_eq!(vault.deposited(&addr(1)), 15);
        assert!(!vault.is_refundable());
    }

    #[test]
    fn test_open_vault_rejects_refunds() {
        let mut vault = EscrowVault::default();
        vault.deposit(addr(1), 10).unwrap();
        assert_eq!(vault.refund(&addr(1)), Err(PresaleError::VaultNotRefunding));
    }

    #[test]
    fn test_refunding_pays_each_depositor_once() {
        let mut vault = EscrowVault::default();
        vault.deposit(addr(1), 10).unwrap();
        vault.deposit(addr(2), 4).unwrap();
        vault.close_for_refunds().unwrap();

        assert_eq!(vault.deposit(addr(3), 1), Err(PresaleError::VaultClosed));
        assert_eq!(vault.refund(&addr(1)), Ok(10));
        assert_eq!(vault.refund(&addr(1)), Err(PresaleError::NothingToRefund));
        assert_eq!(vault.refund(&addr(9)), Err(PresaleError::NothingToRefund));
        assert_eq!(vault.balance(), 4);
        assert_eq!(vault.total_refunded(), 10);
    }

    #[test]
    fn test_refunding_vault_never_releases() {
        let mut vault = EscrowVault::default();
        vault.deposit(addr(1), 10).unwrap();
        vault.close_for_refunds().unwrap();
        assert_eq!(vault.release_all(), Err(PresaleError::VaultClosed));
        assert_eq!(vault.balance(), 10);
    }

    #[test]
    fn test_release_sweeps_once() {
        let mut vault = EscrowVault::default();
        vault.deposit(addr(1), 10).unwrap();
        assert_eq!(vault.release_all(), Ok(10));
        assert_eq!(vault.state(), VaultState::Closed(Settlement::Released));
        assert_eq!(vault.release_all(), Ok(0));
        assert_eq!(vault.close_for_refunds(), Err(PresaleError::VaultClosed));
        assert_eq!(vault.refund(&addr(1)), Err(PresaleError::VaultNotRefunding));
        assert_eq!(vault.total_released(), 10);
    }
}
