//! Presale account state

pub mod ledger;
pub mod sale;
pub mod whitelist;

pub use ledger::*;
pub use sale::*;
pub use whitelist::*;
