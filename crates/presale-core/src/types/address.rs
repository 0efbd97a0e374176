//! # Addresses
//!
//! 32-byte account identifiers, rendered as base58 like Solana public keys.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Account identifier
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 32]);

/// Failure to parse a base58 address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("expected 32 bytes, got {0}")]
    WrongLength(usize),
}

impl Address {
    /// The all-zero address, never a valid wallet or token
    pub const ZERO: Address = Address([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Address whose bytes are the UTF-8 label, zero padded.
    /// Labels longer than 32 bytes or empty labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let raw = label.as_bytes();
        if raw.is_empty() || raw.len() > 32 {
            return None;
        }
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(Self(bytes))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressParseError::InvalidBase58(e.to_string()))?;
        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::WrongLength(decoded.len()))?;
        Ok(Self(bytes))
    }
}

#[cfg(feature = "client")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "client")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_round_trip() {
        let address = Address::new([7u8; 32]);
        let text = address.to_string();
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; 32]).is_zero());
        assert_eq!(Address::ZERO.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short = bs58::encode([1u8; 8]).into_string();
        assert_eq!(short.parse::<Address>(), Err(AddressParseError::WrongLength(8)));
        assert!(matches!(
            "0OIl".parse::<Address>(),
            Err(AddressParseError::InvalidBase58(_))
        ));
    }

    #[test]
    fn test_labels() {
        let alice = Address::from_label("alice").unwrap();
        let bob = Address::from_label("bob").unwrap();
        assert_ne!(alice, bob);
        assert_eq!(&alice.as_bytes()[..5], b"alice");
        assert!(Address::from_label("").is_none());
        assert!(Address::from_label(&"x".repeat(33)).is_none());
    }
}
