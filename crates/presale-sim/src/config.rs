//! Sale settings loaded from a TOML file
//!
//! Amounts are written as decimal strings in whole native units and scaled
//! by `decimals`. Times are seconds relative to `genesis`, the simulated
//! clock reading at deployment, which defaults to the wall clock when the
//! file leaves it out. Addresses are either base58 or a short
//! participant name.

use std::fs;
use std::str::FromStr;

use meme_presale_core::{Address, Amount, Clock, SaleConfig, SystemClock, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Largest supported number of native decimals
pub const MAX_DECIMALS: u8 = 18;

fn default_decimals() -> u8 {
    9
}

fn default_max_fee_penalty_percent() -> u8 {
    100
}

fn wall_clock_now() -> Timestamp {
    SystemClock.unix_timestamp()
}

/// Sale configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SaleSettings {
    /// Decimal places of the native unit
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Simulated unix time at deployment
    #[serde(default = "wall_clock_now")]
    pub genesis: Timestamp,

    /// Deployer and initial owner
    pub owner: String,

    /// Receives funds once the goal is reached
    pub wallet: String,

    /// Token sold by the sale
    pub token: String,

    /// Seconds from genesis to the first contribution second
    pub start_delay: i64,

    /// Seconds from start to the last contribution second
    pub duration: i64,

    pub min_contribution: String,
    pub rate: u64,
    pub goal: String,
    pub soft_cap: String,

    /// Seconds the sale stays open after the soft cap is reached
    pub soft_cap_extension: i64,

    pub cap: String,

    /// Fee rate above which the stake penalty applies
    #[serde(default)]
    pub max_fee_rate: u64,

    /// Percent of accepted value credited when the penalty applies
    #[serde(default = "default_max_fee_penalty_percent")]
    pub max_fee_penalty_percent: u8,
}

impl SaleSettings {
    /// Load settings from TOML file
    pub fn load(path: &str) -> SimResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_string(),
            source,
        })?;
        let settings: SaleSettings = toml::from_str(&content).map_err(|source| SimError::Parse {
            path: path.to_string(),
            source,
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to TOML file
    pub fn save(&self, path: &str) -> SimResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| SimError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SimResult<()> {
        if self.decimals > MAX_DECIMALS {
            return Err(SimError::InvalidConfig(format!(
                "decimals must be at most {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        if self.start_delay <= 0 {
            return Err(SimError::InvalidConfig(
                "start_delay must be greater than 0".to_string(),
            ));
        }
        if self.duration <= 0 {
            return Err(SimError::InvalidConfig(
                "duration must be greater than 0".to_string(),
            ));
        }

        self.to_config()?.validate(self.genesis)?;
        Ok(())
    }

    pub fn start_time(&self) -> Timestamp {
        self.genesis.saturating_add(self.start_delay)
    }

    pub fn end_time(&self) -> Timestamp {
        self.start_time().saturating_add(self.duration)
    }

    pub fn owner_address(&self) -> SimResult<Address> {
        resolve_participant(&self.owner)
    }

    /// Parse an amount in whole native units
    pub fn amount(&self, text: &str) -> SimResult<Amount> {
        parse_amount(text, self.decimals)
    }

    /// Convert into the engine configuration
    pub fn to_config(&self) -> SimResult<SaleConfig> {
        Ok(SaleConfig {
            start_time: self.start_time(),
            end_time: self.end_time(),
            min_contribution: self.amount(&self.min_contribution)?,
            rate: self.rate,
            goal: self.amount(&self.goal)?,
            soft_cap: self.amount(&self.soft_cap)?,
            soft_cap_extension: self.soft_cap_extension,
            cap: self.amount(&self.cap)?,
            max_fee_rate: self.max_fee_rate,
            max_fee_penalty_percent: self.max_fee_penalty_percent,
            wallet: resolve_participant(&self.wallet)?,
            token: resolve_participant(&self.token)?,
        })
    }
}

/// Scale a decimal string such as `"0.1"` by `10^decimals`
pub fn parse_amount(text: &str, decimals: u8) -> SimResult<Amount> {
    let invalid = || SimError::InvalidAmount(text.to_string());
    let trimmed = text.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > decimals as usize {
        return Err(invalid());
    }

    let scale = 10u64.checked_pow(decimals as u32).ok_or_else(invalid)?;
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction_units: u64 = if fraction.is_empty() {
        0
    } else {
        let padding = 10u64
            .checked_pow((decimals as usize - fraction.len()) as u32)
            .ok_or_else(invalid)?;
        let digits: u64 = fraction.parse().map_err(|_| invalid())?;
        digits.checked_mul(padding).ok_or_else(invalid)?
    };

    whole
        .checked_mul(scale)
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or_else(invalid)
}

/// A base58 address, or else the stable address derived from a name
pub fn resolve_participant(name: &str) -> SimResult<Address> {
    if let Ok(address) = Address::from_str(name) {
        return Ok(address);
    }
    Address::from_label(name).ok_or_else(|| SimError::InvalidParticipant(name.to_string()))
}
