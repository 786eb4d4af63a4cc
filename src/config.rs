use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LedgerError, Result};

/// ceiling for the origination fee rate (5%)
pub const MAX_FEE_RATE: Rate = Rate::from_percentage(5);

/// environment variable holding the fee rate in per mille
pub const FEE_RATE_ENV: &str = "LEDGER_FEE_RATE";

/// environment variable holding the improvement rate in per mille
pub const IMPROVEMENT_RATE_ENV: &str = "LEDGER_IMPROVEMENT_RATE";

/// ledger-wide configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// origination fee taken from newly introduced principal
    pub fee_rate: Rate,
    /// minimum margin a buyout must beat the current terms by
    pub improvement_rate: Rate,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fee_rate: Rate::from_percentage(1),
            improvement_rate: Rate::from_percentage(10),
        }
    }
}

impl LedgerConfig {
    pub fn new(fee_rate: Rate, improvement_rate: Rate) -> Result<Self> {
        let config = Self {
            fee_rate,
            improvement_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// no origination fee, default improvement margin
    pub fn zero_fee() -> Self {
        Self {
            fee_rate: Rate::ZERO,
            ..Self::default()
        }
    }

    /// parse and validate from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// defaults overridden by `LEDGER_FEE_RATE` / `LEDGER_IMPROVEMENT_RATE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(FEE_RATE_ENV) {
            config.fee_rate = parse_scaled(FEE_RATE_ENV, &raw)?;
        }
        if let Some(raw) = lookup(IMPROVEMENT_RATE_ENV) {
            config.improvement_rate = parse_scaled(IMPROVEMENT_RATE_ENV, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_fee_rate(self.fee_rate)?;
        validate_improvement_rate(self.improvement_rate)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub(crate) fn validate_fee_rate(rate: Rate) -> Result<()> {
    if rate > MAX_FEE_RATE {
        return Err(LedgerError::FeeRateOutOfBounds {
            rate,
            max: MAX_FEE_RATE,
        });
    }
    Ok(())
}

pub(crate) fn validate_improvement_rate(rate: Rate) -> Result<()> {
    if rate.is_zero() {
        return Err(LedgerError::InvalidImprovementRate { rate });
    }
    Ok(())
}

fn parse_scaled(key: &str, raw: &str) -> Result<Rate> {
    raw.trim()
        .parse::<u32>()
        .map(Rate::from_scaled)
        .map_err(|e| LedgerError::InvalidConfiguration {
            message: format!("{}: {}", key, e),
        })
}
