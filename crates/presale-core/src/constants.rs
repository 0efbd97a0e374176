//! # Sale Constants
//!
//! Fixed parameters of the presale state machine:
//! - Time units used for whitelist day indexing
//! - Percentage arithmetic for the fee-rate penalty
//! - Capacity bounds shared with the on-chain account layout

// ============================================================================
// Time Constants
// ============================================================================

/// Length of one whitelist day in seconds
pub const SECONDS_PER_DAY: i64 = 86_400;

// ============================================================================
// Penalty Constants
// ============================================================================

/// Denominator for the fee-rate penalty (percent of accepted value credited)
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Largest allowed penalty percent (100 = no reduction)
pub const MAX_PENALTY_PERCENT: u8 = 100;

// ============================================================================
// Capacity Constants
// ============================================================================

/// Maximum number of whitelist days in a tier table
pub const MAX_WHITELIST_DAYS: usize = 32;

/// Maximum number of enabled whitelist addresses
pub const MAX_WHITELIST_ENTRIES: usize = 250;

/// Events kept by the in-memory engine before the oldest are evicted
pub const MAX_EVENTS: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_bounds() {
        assert_eq!(MAX_PENALTY_PERCENT as u64, PERCENT_DENOMINATOR);
    }

    #[test]
    fn test_day_length() {
        assert_eq!(SECONDS_PER_DAY, 24 * 60 * 60);
    }
}
