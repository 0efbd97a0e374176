//! Sale phase tracking
//!
//! Defines the lifecycle phases of a sale from configuration to settlement
//! and the soft-cap latch that can end it early.

use crate::config::SaleConfig;
use crate::errors::{PresaleError, PresaleResult};
use crate::types::{Amount, Timestamp};

/// Sale lifecycle phase
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SalePhase {
    /// Before `start_time`; admin mutators are allowed
    #[default]
    Pending = 0,

    /// Contributions are accepted
    Active = 1,

    /// Window closed, waiting for finalization
    Ended = 2,

    /// Settled; refunds or token claims are payable
    Finalized = 3,
}

impl SalePhase {
    /// Derive the phase at `now`
    pub fn at(
        config: &SaleConfig,
        cap_reached_at: Option<Timestamp>,
        finalized: bool,
        now: Timestamp,
    ) -> Self {
        if finalized {
            SalePhase::Finalized
        } else if has_ended(config, cap_reached_at, now) {
            SalePhase::Ended
        } else if config.has_started(now) {
            SalePhase::Active
        } else {
            SalePhase::Pending
        }
    }

    /// Check if phase accepts contributions
    pub fn allows_contributions(&self) -> bool {
        matches!(self, SalePhase::Active)
    }

    /// Check if phase allows admin configuration changes
    pub fn allows_configuration(&self) -> bool {
        matches!(self, SalePhase::Pending)
    }

    /// Validate phase transition
    pub fn can_transition_to(&self, new_phase: SalePhase) -> bool {
        match (self, new_phase) {
            (SalePhase::Pending, SalePhase::Active) => true,
            // Window can close before anyone contributed
            (SalePhase::Pending, SalePhase::Ended) => true,
            (SalePhase::Active, SalePhase::Ended) => true,
            (SalePhase::Ended, SalePhase::Finalized) => true,
            _ => false,
        }
    }
}

/// True once the end time passed or the soft-cap extension elapsed
pub fn has_ended(config: &SaleConfig, cap_reached_at: Option<Timestamp>, now: Timestamp) -> bool {
    if now > config.end_time {
        return true;
    }
    match cap_reached_at {
        Some(reached) => now > reached.saturating_add(config.soft_cap_extension),
        None => false,
    }
}

/// Gate for refund claims: ended, goal missed, finalized, checked in that order
pub fn check_refundable(ended: bool, goal_reached: bool, finalized: bool) -> PresaleResult<()> {
    if !ended {
        return Err(PresaleError::NotEnded);
    }
    if goal_reached {
        return Err(PresaleError::GoalMet);
    }
    if !finalized {
        return Err(PresaleError::NotFinalized);
    }
    Ok(())
}

/// Gate for token claims: ended, goal met, finalized, checked in that order
pub fn check_claimable(ended: bool, goal_reached: bool, finalized: bool) -> PresaleResult<()> {
    if !ended {
        return Err(PresaleError::NotEnded);
    }
    if !goal_reached {
        return Err(PresaleError::GoalNotMet);
    }
    if !finalized {
        return Err(PresaleError::NotFinalized);
    }
    Ok(())
}

/// One-shot record of when `total_raised` first reached the soft cap
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftCapLatch(Option<Timestamp>);

impl SoftCapLatch {
    pub fn reached_at(&self) -> Option<Timestamp> {
        self.0
    }

    /// Set the latch if unset and `total_raised >= soft_cap`.
    /// Returns true only on the call that set it.
    pub fn latch(&mut self, total_raised: Amount, soft_cap: Amount, now: Timestamp) -> bool {
        if self.0.is_some() || total_raised < soft_cap {
            return false;
        }
        self.0 = Some(now);
        true
    }
}

impl From<Option<Timestamp>> for SoftCapLatch {
    fn from(value: Option<Timestamp>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn config() -> SaleConfig {
        SaleConfig {
            start_time: 1_000,
            end_time: 10_000,
            min_contribution: 1,
            rate: 1,
            goal: 5,
            soft_cap: 10,
            soft_cap_extension: 500,
            cap: 15,
            max_fee_rate: 0,
            max_fee_penalty_percent: 80,
            wallet: Address::new([1u8; 32]),
            token: Address::new([2u8; 32]),
        }
    }

    #[test]
    fn test_end_time_is_inclusive() {
        let cfg = config();
        assert!(!has_ended(&cfg, None, 10_000));
        assert!(has_ended(&cfg, None, 10_001));
    }

    #[test]
    fn test_soft_cap_extension_ends_early() {
        let cfg = config();
        assert!(!has_ended(&cfg, Some(2_000), 2_500));
        assert!(has_ended(&cfg, Some(2_000), 2_501));
    }

    #[test]
    fn test_late_soft_cap_does_not_extend_end_time() {
        let cfg = config();
        assert!(has_ended(&cfg, Some(9_900), 10_001));
    }

    #[test]
    fn test_latch_sets_once() {
        let mut latch = SoftCapLatch::default();
        assert!(!latch.latch(9, 10, 100));
        assert!(latch.latch(10, 10, 200));
        assert!(!latch.latch(15, 10, 300));
        assert_eq!(latch.reached_at(), Some(200));
    }

    #[test]
    fn test_phase_derivation() {
        let cfg = config();
        assert_eq!(SalePhase::at(&cfg, None, false, 999), SalePhase::Pending);
        assert_eq!(SalePhase::at(&cfg, None, false, 1_000), SalePhase::Active);
        assert_eq!(SalePhase::at(&cfg, None, false, 10_001), SalePhase::Ended);
        assert_eq!(SalePhase::at(&cfg, None, true, 10_001), SalePhase::Finalized);
        assert!(SalePhase::Active.allows_contributions());
        assert!(SalePhase::Pending.allows_configuration());
    }

    #[test]
    fn test_transitions() {
        assert!(SalePhase::Pending.can_transition_to(SalePhase::Active));
        assert!(SalePhase::Active.can_transition_to(SalePhase::Ended));
        assert!(SalePhase::Ended.can_transition_to(SalePhase::Finalized));
        assert!(!SalePhase::Finalized.can_transition_to(SalePhase::Active));
        assert!(!SalePhase::Ended.can_transition_to(SalePhase::Active));
    }

    #[test]
    fn test_settlement_gates_check_in_order() {
        assert_eq!(check_refundable(false, true, true), Err(PresaleError::NotEnded));
        assert_eq!(check_refundable(true, true, false), Err(PresaleError::GoalMet));
        assert_eq!(check_refundable(true, false, false), Err(PresaleError::NotFinalized));
        assert_eq!(check_refundable(true, false, true), Ok(()));

        assert_eq!(check_claimable(false, false, true), Err(PresaleError::NotEnded));
        assert_eq!(check_claimable(true, false, false), Err(PresaleError::GoalNotMet));
        assert_eq!(check_claimable(true, true, false), Err(PresaleError::NotFinalized));
        assert_eq!(check_claimable(true, true, true), Ok(()));
    }
}
