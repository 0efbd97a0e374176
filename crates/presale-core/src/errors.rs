//! # Core Error Types
//!
//! Business-rule rejections shared between on-chain and off-chain code.
//! Every variant aborts the whole operation with no state change.

use thiserror::Error;

/// Presale errors that can occur in both environments
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresaleError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid sale configuration: {0}")]
    InvalidConfig(ConfigViolation),

    #[error("Sale already started")]
    SaleAlreadyStarted,

    #[error("Unauthorized")]
    Unauthorized,

    // ========================================================================
    // Contribution Errors
    // ========================================================================

    #[error("Sale is not active")]
    NotActive,

    #[error("Contribution below minimum")]
    BelowMinimum,

    #[error("Cap exceeded")]
    CapExceeded,

    #[error("Beneficiary is not whitelisted")]
    NotWhitelisted,

    // ========================================================================
    // Settlement Errors
    // ========================================================================

    #[error("Sale has not ended")]
    NotEnded,

    #[error("Funding goal was met")]
    GoalMet,

    #[error("Funding goal was not met")]
    GoalNotMet,

    #[error("Sale is not finalized")]
    NotFinalized,

    #[error("Sale already finalized")]
    AlreadyFinalized,

    #[error("Nothing to refund")]
    NothingToRefund,

    #[error("Nothing to claim")]
    NothingToClaim,

    // ========================================================================
    // Vault Errors
    // ========================================================================

    #[error("Vault is closed")]
    VaultClosed,

    #[error("Vault is not refunding")]
    VaultNotRefunding,

    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Conversion error")]
    ConversionError,
}

/// Which configuration invariant a parameter set violates
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("rate must be greater than zero")]
    ZeroRate,

    #[error("goal must be greater than zero")]
    ZeroGoal,

    #[error("soft cap must be greater than zero")]
    ZeroSoftCap,

    #[error("cap must be greater than zero")]
    ZeroCap,

    #[error("minimum contribution must be greater than zero")]
    ZeroMinContribution,

    #[error("goal must not exceed soft cap")]
    GoalAboveSoftCap,

    #[error("soft cap must not exceed cap")]
    SoftCapAboveCap,

    #[error("soft cap extension must not be negative")]
    NegativeExtension,

    #[error("penalty percent must be at most 100")]
    PenaltyAboveHundred,

    #[error("token address must be set")]
    ZeroTokenAddress,

    #[error("wallet address must be set")]
    ZeroWalletAddress,

    #[error("owner address must be set")]
    ZeroOwnerAddress,

    #[error("start time must be before end time")]
    StartNotBeforeEnd,

    #[error("start time must be in the future")]
    StartInPast,

    #[error("too many whitelist days")]
    TooManyWhitelistDays,

    #[error("too many whitelist entries")]
    TooManyWhitelistEntries,
}

impl From<ConfigViolation> for PresaleError {
    fn from(violation: ConfigViolation) -> Self {
        PresaleError::InvalidConfig(violation)
    }
}

/// Result type using presale errors
pub type PresaleResult<T> = Result<T, PresaleError>;
