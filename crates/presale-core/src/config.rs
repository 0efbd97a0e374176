//! # Sale Configuration
//!
//! The sale parameters and the invariants every mutation must preserve:
//! `0 < goal <= soft_cap <= cap`, `start_time < end_time`, start in the
//! future, positive rate and minimum contribution, penalty within 0..=100,
//! and non-zero wallet and token addresses.
//!
//! Mutators never write fields in place. They build a candidate copy that is
//! validated as a whole, so a partially updated config is never observable.

use crate::constants::MAX_PENALTY_PERCENT;
use crate::errors::{ConfigViolation, PresaleResult};
use crate::types::{Address, Amount, Timestamp};

/// Presale parameters
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleConfig {
    /// First second contributions are accepted
    pub start_time: Timestamp,
    /// Last second contributions are accepted
    pub end_time: Timestamp,
    /// Smallest accepted contribution
    pub min_contribution: Amount,
    /// Tokens owed per native unit of credited stake
    pub rate: u64,
    /// Minimum funding; below it contributions are refundable
    pub goal: Amount,
    /// Reaching it starts the soft-cap extension countdown
    pub soft_cap: Amount,
    /// Seconds the sale stays open after the soft cap is reached
    pub soft_cap_extension: i64,
    /// Hard ceiling on total raised
    pub cap: Amount,
    /// Fee rate above which the stake penalty applies
    pub max_fee_rate: u64,
    /// Percent of accepted value credited when the penalty applies
    pub max_fee_penalty_percent: u8,
    /// Receives funds once the goal is reached
    pub wallet: Address,
    /// Token claimed by contributors
    pub token: Address,
}

/// New cap parameters for `set_caps`
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapsUpdate {
    pub goal: Amount,
    pub soft_cap: Amount,
    pub soft_cap_extension: i64,
    pub cap: Amount,
}

impl SaleConfig {
    /// Check every invariant against the current time
    pub fn validate(&self, now: Timestamp) -> PresaleResult<()> {
        if self.rate == 0 {
            return Err(ConfigViolation::ZeroRate.into());
        }
        if self.goal == 0 {
            return Err(ConfigViolation::ZeroGoal.into());
        }
        if self.soft_cap == 0 {
            return Err(ConfigViolation::ZeroSoftCap.into());
        }
        if self.cap == 0 {
            return Err(ConfigViolation::ZeroCap.into());
        }
        if self.min_contribution == 0 {
            return Err(ConfigViolation::ZeroMinContribution.into());
        }
        if self.goal > self.soft_cap {
            return Err(ConfigViolation::GoalAboveSoftCap.into());
        }
        if self.soft_cap > self.cap {
            return Err(ConfigViolation::SoftCapAboveCap.into());
        }
        if self.soft_cap_extension < 0 {
            return Err(ConfigViolation::NegativeExtension.into());
        }
        if self.max_fee_penalty_percent > MAX_PENALTY_PERCENT {
            return Err(ConfigViolation::PenaltyAboveHundred.into());
        }
        if self.token.is_zero() {
            return Err(ConfigViolation::ZeroTokenAddress.into());
        }
        if self.wallet.is_zero() {
            return Err(ConfigViolation::ZeroWalletAddress.into());
        }
        if self.start_time >= self.end_time {
            return Err(ConfigViolation::StartNotBeforeEnd.into());
        }
        if self.start_time <= now {
            return Err(ConfigViolation::StartInPast.into());
        }
        Ok(())
    }

    /// Whether contributions may already have been accepted
    pub fn has_started(&self, now: Timestamp) -> bool {
        now >= self.start_time
    }

    /// Candidate config with new caps
    pub fn with_caps(&self, caps: CapsUpdate) -> Self {
        Self {
            goal: caps.goal,
            soft_cap: caps.soft_cap,
            soft_cap_extension: caps.soft_cap_extension,
            cap: caps.cap,
            ..self.clone()
        }
    }

    /// Candidate config with a new sale window
    pub fn with_times(&self, start_time: Timestamp, end_time: Timestamp) -> Self {
        Self {
            start_time,
            end_time,
            ..self.clone()
        }
    }

    /// Candidate config with a new token rate
    pub fn with_rate(&self, rate: u64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }

    /// Whether a call at `fee_rate` has its credited stake reduced
    pub fn penalizes(&self, fee_rate: u64) -> bool {
        fee_rate > self.max_fee_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PresaleError;

    const NOW: Timestamp = 1_000_000;

    fn config() -> SaleConfig {
        SaleConfig {
            start_time: NOW + 100,
            end_time: NOW + 1_000,
            min_contribution: 10,
            rate: 1_000,
            goal: 500,
            soft_cap: 1_000,
            soft_cap_extension: 60,
            cap: 1_500,
            max_fee_rate: 100,
            max_fee_penalty_percent: 80,
            wallet: Address::new([1u8; 32]),
            token: Address::new([2u8; 32]),
        }
    }

    fn violation(cfg: &SaleConfig) -> Option<ConfigViolation> {
        match cfg.validate(NOW) {
            Ok(()) => None,
            Err(PresaleError::InvalidConfig(v)) => Some(v),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(violation(&config()), None);
    }

    #[test]
    fn test_zero_fields_rejected() {
        assert_eq!(violation(&config().with_rate(0)), Some(ConfigViolation::ZeroRate));
        assert_eq!(
            violation(&SaleConfig { goal: 0, ..config() }),
            Some(ConfigViolation::ZeroGoal)
        );
        assert_eq!(
            violation(&SaleConfig { soft_cap: 0, ..config() }),
            Some(ConfigViolation::ZeroSoftCap)
        );
        assert_eq!(
            violation(&SaleConfig { cap: 0, ..config() }),
            Some(ConfigViolation::ZeroCap)
        );
        assert_eq!(
            violation(&SaleConfig { min_contribution: 0, ..config() }),
            Some(ConfigViolation::ZeroMinContribution)
        );
        assert_eq!(
            violation(&SaleConfig { token: Address::ZERO, ..config() }),
            Some(ConfigViolation::ZeroTokenAddress)
        );
        assert_eq!(
            violation(&SaleConfig { wallet: Address::ZERO, ..config() }),
            Some(ConfigViolation::ZeroWalletAddress)
        );
    }

    #[test]
    fn test_cap_ordering() {
        let swapped_goal = config().with_caps(CapsUpdate {
            goal: 1_000,
            soft_cap: 500,
            soft_cap_extension: 60,
            cap: 1_500,
        });
        assert_eq!(violation(&swapped_goal), Some(ConfigViolation::GoalAboveSoftCap));

        let swapped_cap = config().with_caps(CapsUpdate {
            goal: 500,
            soft_cap: 1_500,
            soft_cap_extension: 60,
            cap: 1_000,
        });
        assert_eq!(violation(&swapped_cap), Some(ConfigViolation::SoftCapAboveCap));

        let all_equal = config().with_caps(CapsUpdate {
            goal: 700,
            soft_cap: 700,
            soft_cap_extension: 0,
            cap: 700,
        });
        assert_eq!(violation(&all_equal), None);
    }

    #[test]
    fn test_time_window() {
        assert_eq!(
            violation(&config().with_times(NOW + 500, NOW + 500)),
            Some(ConfigViolation::StartNotBeforeEnd)
        );
        assert_eq!(
            violation(&config().with_times(NOW, NOW + 500)),
            Some(ConfigViolation::StartInPast)
        );
        assert_eq!(violation(&config().with_times(NOW + 1, NOW + 2)), None);
    }

    #[test]
    fn test_penalty_bounds() {
        assert_eq!(
            violation(&SaleConfig { max_fee_penalty_percent: 101, ..config() }),
            Some(ConfigViolation::PenaltyAboveHundred)
        );
        assert_eq!(
            violation(&SaleConfig { soft_cap_extension: -1, ..config() }),
            Some(ConfigViolation::NegativeExtension)
        );
    }

    #[test]
    fn test_penalty_threshold_is_strict() {
        let cfg = config();
        assert!(!cfg.penalizes(100));
        assert!(cfg.penalizes(101));
    }
}
