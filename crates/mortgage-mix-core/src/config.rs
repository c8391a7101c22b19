//! Engine tuning knobs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageMixError;
use crate::MortgageMixResult;

/// Closing balance at or below which a schedule is considered paid off.
pub const DEFAULT_BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// Settings shared by every calculation in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Currency units of residual balance treated as zero. A schedule stops
    /// at the first month whose closing balance falls to this level.
    pub balance_tolerance: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
        }
    }
}

impl EngineConfig {
    pub fn with_balance_tolerance(balance_tolerance: Decimal) -> MortgageMixResult<Self> {
        let config = Self { balance_tolerance };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MortgageMixResult<()> {
        if self.balance_tolerance < Decimal::ZERO {
            return Err(MortgageMixError::InvalidInput {
                field: "balance_tolerance".into(),
                reason: "Balance tolerance cannot be negative".into(),
            });
        }
        Ok(())
    }
}
