//! Receipts returned by engine operations
//!
//! The engine never moves funds itself. Outgoing value is described as
//! `Payout`s which the host executes as part of the same operation.

use crate::contribution::Route;
use crate::events::SaleEvent;
use crate::types::{Address, Amount};

/// A transfer the host must perform
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payout {
    /// Native value
    Native { to: Address, amount: Amount },
    /// Sale tokens
    Token { to: Address, amount: u128 },
    /// Whole balance of a foreign token held by the sale
    Foreign { asset: Address, to: Address },
}

impl Payout {
    pub fn recipient(&self) -> Address {
        match self {
            Payout::Native { to, .. } | Payout::Token { to, .. } | Payout::Foreign { to, .. } => *to,
        }
    }
}

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionReceipt {
    pub accepted: Amount,
    pub refunded: Amount,
    pub credited: Amount,
    pub route: Route,
    /// The `TokenPurchase` record
    pub event: SaleEvent,
    /// Excess back to the sender, then accepted value to the wallet
    /// when routed there
    pub payouts: Vec<Payout>,
}

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimReceipt {
    /// Address whose balance was settled
    pub account: Address,
    /// Native value refunded or stake redeemed
    pub amount: Amount,
    pub payout: Payout,
}

#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeReceipt {
    pub goal_reached: bool,
    /// Vault balance released to the wallet
    pub released: Amount,
    pub payout: Option<Payout>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient() {
        let to = Address::new([7u8; 32]);
        assert_eq!(Payout::Native { to, amount: 1 }.recipient(), to);
        assert_eq!(Payout::Token { to, amount: 1 }.recipient(), to);
        let asset = Address::new([9u8; 32]);
        assert_eq!(Payout::Foreign { asset, to }.recipient(), to);
    }
}
