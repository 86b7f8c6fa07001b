use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::instructions::fee_treasury;

/// How the protocol fee on a deposit is computed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FeePolicy {
    None,
    /// Fixed amount of token units per deposit, capped at the deposit
    Flat(u64),
    /// Parts per `PERCENT_DENOMINATOR` of the deposit
    Proportional(u64),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FeeConfig {
    /// Owner of the token account that collects the fees
    pub collector: Pubkey,
    pub policy: FeePolicy,
}

impl FeeConfig {
    pub fn program_default() -> Self {
        FeeConfig {
            collector: fee_treasury::ID,
            policy: FeePolicy::Proportional(ADD_FUNDS_PERCENT_FEE),
        }
    }
}

pub struct FeeCalculator {
    config: FeeConfig,
}

impl FeeCalculator {
    pub fn new(config: FeeConfig) -> Result<Self> {
        if let FeePolicy::Proportional(rate) = config.policy {
            require!(rate <= PERCENT_DENOMINATOR, ErrorCode::InvalidFeeConfig);
        }
        Ok(FeeCalculator { config })
    }

    pub fn collector(&self) -> &Pubkey {
        &self.config.collector
    }

    /// Fee charged on a deposit of `amount`. Never greater than `amount`.
    pub fn fee(&self, amount: u64) -> Result<u64> {
        let fee = match self.config.policy {
            FeePolicy::None => 0,
            FeePolicy::Flat(units) => units.min(amount),
            FeePolicy::Proportional(rate) => {
                let fee = (amount as u128)
                    .checked_mul(rate as u128)
                    .ok_or(ErrorCode::Overflow)?
                    .checked_div(PERCENT_DENOMINATOR as u128)
                    .ok_or(ErrorCode::Overflow)?;
                u64::try_from(fee).map_err(|_| ErrorCode::Overflow)?
            }
        };
        Ok(fee)
    }

    /// Splits a deposit into `(credited, fee)`
    pub fn split(&self, amount: u64) -> Result<(u64, u64)> {
        let fee = self.fee(amount)?;
        let credited = amount.checked_sub(fee).ok_or(ErrorCode::Overflow)?;
        Ok((credited, fee))
    }
}
