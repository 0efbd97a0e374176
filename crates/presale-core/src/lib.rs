//! # Meme PreSale Core - Shared Sale Logic
//!
//! This crate contains the contribution, escrow and finalization rules of the
//! presale, shared between the on-chain program and off-chain tooling. It
//! provides:
//!
//! - The validated sale configuration and its admin mutators
//! - Whitelist day tiers and their stateless evaluation
//! - The stake ledger and the escrow vault
//! - Pure contribution quoting used by every execution environment
//! - An in-memory engine that applies operations atomically
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde serialization for off-chain use

pub mod clock;
pub mod config;
pub mod constants;
pub mod contribution;
pub mod engine;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod math;
pub mod phase;
pub mod receipts;
pub mod types;
pub mod vault;
pub mod whitelist;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CapsUpdate, SaleConfig};
pub use constants::*;
pub use contribution::{
    quote_contribution, ContributionQuote, ContributionRequest, Route, SaleTotals,
};
pub use engine::{PreSale, SaleSnapshot, SaleState};
pub use errors::{ConfigViolation, PresaleError, PresaleResult};
pub use events::{ConfigChange, SaleEvent};
pub use ledger::StakeLedger;
pub use phase::{check_claimable, check_refundable, has_ended, SalePhase, SoftCapLatch};
pub use receipts::{ClaimReceipt, ContributionReceipt, FinalizeReceipt, Payout};
pub use types::*;
pub use vault::{EscrowVault, Settlement, VaultState};
pub use whitelist::{day_index, DayLimits, TierAllowance, Whitelist};
