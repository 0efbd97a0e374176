//! # Whitelist Tiers
//!
//! During the first `day_count` days of the sale only enabled addresses may
//! contribute, each up to a cumulative per-day ceiling on credited stake.
//!
//! Day indexing:
//! - day 0 is everything before `start_time` and always allows nothing
//! - day `d >= 1` covers `[start + (d-1) days, start + d days)`
//! - a day past the end of the table reuses the last limit

use std::collections::BTreeSet;

use crate::constants::{MAX_WHITELIST_DAYS, MAX_WHITELIST_ENTRIES, SECONDS_PER_DAY};
use crate::errors::{ConfigViolation, PresaleResult};
use crate::types::{Address, Amount, Timestamp};

/// Day index of `now` relative to the sale start, flooring partial days
pub fn day_index(now: Timestamp, start_time: Timestamp) -> u32 {
    if now < start_time {
        return 0;
    }
    let elapsed_days = (now - start_time) / SECONDS_PER_DAY;
    u32::try_from(elapsed_days.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Per-day cumulative stake ceilings, day 1 first
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayLimits(Vec<Amount>);

impl DayLimits {
    pub fn new(limits: Vec<Amount>) -> PresaleResult<Self> {
        if limits.len() > MAX_WHITELIST_DAYS {
            return Err(ConfigViolation::TooManyWhitelistDays.into());
        }
        Ok(Self(limits))
    }

    /// Number of gated days
    pub fn day_count(&self) -> u32 {
        self.0.len() as u32
    }

    /// Ceiling for `day`; zero for day 0 and for an empty table
    pub fn max_stake(&self, day: u32) -> Amount {
        if day == 0 {
            return 0;
        }
        let index = (day as usize).min(self.0.len());
        match index {
            0 => 0,
            i => self.0[i - 1],
        }
    }

    pub fn as_slice(&self) -> &[Amount] {
        &self.0
    }
}

/// Result of evaluating a beneficiary against the tier table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierAllowance {
    /// Whether the whitelist window applies at this time
    pub gated: bool,
    /// Value the beneficiary may still add; `Amount::MAX` when ungated
    pub remaining: Amount,
}

impl TierAllowance {
    /// Stateless tier evaluation
    pub fn evaluate(
        now: Timestamp,
        start_time: Timestamp,
        enabled: bool,
        limits: &DayLimits,
        prior_credited: Amount,
    ) -> Self {
        let day = day_index(now, start_time);
        if day == 0 {
            return Self { gated: true, remaining: 0 };
        }
        if day > limits.day_count() {
            return Self { gated: false, remaining: Amount::MAX };
        }
        let remaining = if enabled {
            limits.max_stake(day).saturating_sub(prior_credited)
        } else {
            0
        };
        Self { gated: true, remaining }
    }
}

/// Enabled addresses plus the day tier table
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    enabled: BTreeSet<Address>,
    limits: DayLimits,
}

impl Whitelist {
    /// Add, then remove, then replace the tier table.
    /// An empty `day_limits` keeps the current table.
    /// Nothing changes when the result would exceed capacity.
    pub fn apply(
        &mut self,
        add: &[Address],
        remove: &[Address],
        day_limits: Vec<Amount>,
    ) -> PresaleResult<()> {
        let limits = if day_limits.is_empty() {
            self.limits.clone()
        } else {
            DayLimits::new(day_limits)?
        };
        let mut enabled = self.enabled.clone();
        enabled.extend(add.iter().copied());
        for address in remove {
            enabled.remove(address);
        }
        if enabled.len() > MAX_WHITELIST_ENTRIES {
            return Err(ConfigViolation::TooManyWhitelistEntries.into());
        }
        self.enabled = enabled;
        self.limits = limits;
        Ok(())
    }

    pub fn is_enabled(&self, address: &Address) -> bool {
        self.enabled.contains(address)
    }

    pub fn day_count(&self) -> u32 {
        self.limits.day_count()
    }

    pub fn day_max_stake(&self, day: u32) -> Amount {
        self.limits.max_stake(day)
    }

    pub fn limits(&self) -> &DayLimits {
        &self.limits
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Enabled addresses in ascending order
    pub fn enabled(&self) -> impl Iterator<Item = &Address> {
        self.enabled.iter()
    }
}
