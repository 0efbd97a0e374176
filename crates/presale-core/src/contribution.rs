//! # Contribution Quoting
//!
//! Pure evaluation of a single contribution against the sale rules. The
//! quote says how much of the sent value is accepted, how much goes back to
//! the sender, how much stake is credited and where the accepted value is
//! routed. Nothing is mutated here; the in-memory engine and the on-chain
//! program both apply a quote to their own books.
//!
//! Checks run in a fixed order so every environment rejects with the same
//! error:
//!
//! 1. the sale window is open and the sale has not ended early
//! 2. the value reaches the minimum contribution
//! 3. the hard cap has room left
//! 4. during gated days the beneficiary is enabled and under its tier
//!
//! Penalty and routing never reject.

use crate::config::SaleConfig;
use crate::errors::{PresaleError, PresaleResult};
use crate::math::{apply_percent_floor, safe_add_u64, safe_sub_u64, tokens_for_value};
use crate::phase::SalePhase;
use crate::types::{Amount, Timestamp};
use crate::whitelist::{DayLimits, TierAllowance};

/// Sale-wide totals a quote depends on
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleTotals {
    pub total_raised: Amount,
    pub cap_reached_at: Option<Timestamp>,
}

/// Beneficiary-specific inputs of a contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionRequest {
    /// Value sent with the call
    pub value: Amount,
    /// Fee rate the call was submitted with
    pub fee_rate: u64,
    /// Whether the beneficiary is on the whitelist
    pub beneficiary_enabled: bool,
    /// Stake already credited to the beneficiary
    pub prior_credited: Amount,
}

/// Destination of accepted value
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Straight to the sale wallet
    Wallet,
    /// Into the escrow vault
    Vault,
}

/// Outcome of quoting a contribution
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionQuote {
    /// Value kept by the sale
    pub accepted: Amount,
    /// Excess returned to the sender
    pub refunded: Amount,
    /// Stake credited to the beneficiary
    pub credited: Amount,
    /// Tokens quoted for the purchase record, `accepted * rate`
    pub tokens: u128,
    /// Where `accepted` goes
    pub route: Route,
    /// Whether the fee penalty reduced `credited`
    pub penalized: bool,
    /// Whether the whitelist tier limited this call
    pub gated: bool,
    /// `total_raised` after applying the quote
    pub total_after: Amount,
    /// Whether this contribution is the first to reach the soft cap
    pub reaches_soft_cap: bool,
}

/// Evaluate a contribution without touching any state
pub fn quote_contribution(
    config: &SaleConfig,
    limits: &DayLimits,
    totals: SaleTotals,
    request: ContributionRequest,
    now: Timestamp,
) -> PresaleResult<ContributionQuote> {
    // 1. Window
    if !SalePhase::at(config, totals.cap_reached_at, false, now).allows_contributions() {
        return Err(PresaleError::NotActive);
    }

    // 2. Minimum
    if request.value < config.min_contribution {
        return Err(PresaleError::BelowMinimum);
    }

    // 3. Hard cap
    let cap_remaining = config.cap.saturating_sub(totals.total_raised);
    if cap_remaining == 0 {
        return Err(PresaleError::CapExceeded);
    }
    let mut accepted = request.value.min(cap_remaining);

    // 4. Whitelist tier
    let allowance = TierAllowance::evaluate(
        now,
        config.start_time,
        request.beneficiary_enabled,
        limits,
        request.prior_credited,
    );
    if allowance.gated {
        if !request.beneficiary_enabled {
            return Err(PresaleError::NotWhitelisted);
        }
        accepted = accepted.min(allowance.remaining);
        if accepted == 0 {
            return Err(PresaleError::CapExceeded);
        }
    }

    // 5. Excess
    let refunded = safe_sub_u64(request.value, accepted)?;

    // 6. Penalty
    let penalized = config.penalizes(request.fee_rate);
    let credited = if penalized {
        apply_percent_floor(accepted, config.max_fee_penalty_percent)?
    } else {
        accepted
    };

    // 7-9. Totals, soft cap, routing
    let total_after = safe_add_u64(totals.total_raised, accepted)?;
    let reaches_soft_cap = totals.cap_reached_at.is_none() && total_after >= config.soft_cap;
    let route = if total_after >= config.goal {
        Route::Wallet
    } else {
        Route::Vault
    };

    Ok(ContributionQuote {
        accepted,
        refunded,
        credited,
        tokens: tokens_for_value(accepted, config.rate)?,
        route,
        penalized,
        gated: allowance.gated,
        total_after,
        reaches_soft_cap,
    })
}
