//! Error definitions

use anchor_lang::prelude::*;
use meme_presale_core::{ConfigViolation, PresaleError};

#[error_code]
pub enum PresaleErrorCode {
    // Configuration errors
    #[msg("Invalid sale configuration")]
    InvalidConfig,

    #[msg("Sale start must be in the future")]
    StartInPast,

    #[msg("Whitelist or day table too large")]
    WhitelistTooLarge,

    #[msg("Sale already started")]
    SaleAlreadyStarted,

    #[msg("Unauthorized")]
    Unauthorized,

    // Contribution errors
    #[msg("Sale is not active")]
    NotActive,

    #[msg("Contribution below minimum")]
    BelowMinimum,

    #[msg("Cap exceeded")]
    CapExceeded,

    #[msg("Beneficiary is not whitelisted")]
    NotWhitelisted,

    // Settlement errors
    #[msg("Sale has not ended")]
    NotEnded,

    #[msg("Funding goal was met")]
    GoalMet,

    #[msg("Funding goal was not met")]
    GoalNotMet,

    #[msg("Sale is not finalized")]
    NotFinalized,

    #[msg("Sale already finalized")]
    AlreadyFinalized,

    #[msg("Nothing to refund")]
    NothingToRefund,

    #[msg("Nothing to claim")]
    NothingToClaim,

    // Vault errors
    #[msg("Vault is closed")]
    VaultClosed,

    #[msg("Vault is not refunding")]
    VaultNotRefunding,

    #[msg("Invalid vault")]
    InvalidVault,

    #[msg("Sale token cannot be extracted")]
    SaleTokenLocked,

    #[msg("Token accounts required for token extraction")]
    MissingTokenAccounts,

    // Math errors
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Conversion error")]
    ConversionError,
}

impl From<PresaleError> for PresaleErrorCode {
    fn from(err: PresaleError) -> Self {
        match err {
            PresaleError::InvalidConfig(ConfigViolation::StartInPast) => Self::StartInPast,
            PresaleError::InvalidConfig(
                ConfigViolation::TooManyWhitelistDays | ConfigViolation::TooManyWhitelistEntries,
            ) => Self::WhitelistTooLarge,
            PresaleError::InvalidConfig(_) => Self::InvalidConfig,
            PresaleError::SaleAlreadyStarted => Self::SaleAlreadyStarted,
            PresaleError::Unauthorized => Self::Unauthorized,
            PresaleError::NotActive => Self::NotActive,
            PresaleError::BelowMinimum => Self::BelowMinimum,
            PresaleError::CapExceeded => Self::CapExceeded,
            PresaleError::NotWhitelisted => Self::NotWhitelisted,
            PresaleError::NotEnded => Self::NotEnded,
            PresaleError::GoalMet => Self::GoalMet,
            PresaleError::GoalNotMet => Self::GoalNotMet,
            PresaleError::NotFinalized => Self::NotFinalized,
            PresaleError::AlreadyFinalized => Self::AlreadyFinalized,
            PresaleError::NothingToRefund => Self::NothingToRefund,
            PresaleError::NothingToClaim => Self::NothingToClaim,
            PresaleError::VaultClosed => Self::VaultClosed,
            PresaleError::VaultNotRefunding => Self::VaultNotRefunding,
            PresaleError::MathOverflow => Self::MathOverflow,
            PresaleError::MathUnderflow => Self::MathUnderflow,
            PresaleError::ConversionError => Self::ConversionError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        assert!(matches!(
            PresaleErrorCode::from(PresaleError::InvalidConfig(ConfigViolation::ZeroRate)),
            PresaleErrorCode::InvalidConfig
        ));
        assert!(matches!(
            PresaleErrorCode::from(PresaleError::InvalidConfig(ConfigViolation::StartInPast)),
            PresaleErrorCode::StartInPast
        ));
        assert!(matches!(
            PresaleErrorCode::from(PresaleError::CapExceeded),
            PresaleErrorCode::CapExceeded
        ));
    }
}
