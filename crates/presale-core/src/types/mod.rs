//! # Core Type Definitions
//!
//! Shared type definitions that work in both on-chain and off-chain environments.

pub mod address;

// Re-export all types
pub use address::*;

/// Native value units (lamports on Solana)
pub type Amount = u64;

/// Unix timestamp in seconds
pub type Timestamp = i64;

/// Asset held by the escrow vault
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    /// The native value unit contributions are paid in
    Native,
    /// Any token identified by its mint address
    Token(Address),
}
