//! Pool funding configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Money, PoolFunding};
use crate::error::ConfigError;

/// How pools accumulate their amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingMode {
    /// Table stake times the number of bettors on the match.
    #[default]
    PerBettor,
    /// The same amount for every match.
    Flat,
}

/// Pool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub funding: FundingMode,
    /// Required when `funding = "flat"`.
    #[serde(default)]
    pub flat_amount: Option<Decimal>,
}

impl PoolConfig {
    /// Resolve the configured funding model.
    ///
    /// # Errors
    ///
    /// Fails when flat funding has no positive `flat_amount`.
    pub fn funding(&self) -> Result<PoolFunding, ConfigError> {
        match self.funding {
            FundingMode::PerBettor => Ok(PoolFunding::PerBettor),
            FundingMode::Flat => {
                let amount = self.flat_amount.ok_or(ConfigError::MissingField {
                    field: "pool.flat_amount",
                })?;
                if amount <= Decimal::ZERO {
                    return Err(ConfigError::InvalidValue {
                        field: "pool.flat_amount",
                        reason: "must be greater than 0".to_string(),
                    });
                }
                let money = Money::try_new(amount).map_err(|e| ConfigError::InvalidValue {
                    field: "pool.flat_amount",
                    reason: e.to_string(),
                })?;
                Ok(PoolFunding::Flat(money))
            }
        }
    }
}
