use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::stream::VestingSchedule;

/// Default vesting parameters of a treasury, at `["template", treasury]`
#[account]
#[derive(InitSpace)]
pub struct StreamTemplate {
    pub version: u8,
    pub bump: u8,
    pub treasury_address: Pubkey,
    /// The start timestamp in seconds
    pub start_utc: u64,
    pub rate_amount_units: u64,
    pub rate_interval_in_seconds: u64,
    /// Absolute units, or parts per `PERCENT_DENOMINATOR` of each stream
    /// allocation when `cliff_is_percentage` is set
    pub cliff_vest_amount: u64,
    pub cliff_is_percentage: bool,
}

impl StreamTemplate {
    pub const LEN: usize = 8 + StreamTemplate::INIT_SPACE;

    pub fn init(
        &mut self,
        treasury: Pubkey,
        bump: u8,
        start_utc: u64,
        rate_amount_units: u64,
        rate_interval_in_seconds: u64,
        cliff_vest_amount: u64,
        cliff_is_percentage: bool,
    ) -> Result<()> {
        require!(self.version == 0, ErrorCode::AddressCollision);
        require!(
            rate_amount_units > 0 && rate_interval_in_seconds > 0,
            ErrorCode::InvalidStreamRate
        );
        require!(
            !cliff_is_percentage || cliff_vest_amount <= PERCENT_DENOMINATOR,
            ErrorCode::InvalidCliff
        );

        self.version = ACCOUNT_VERSION;
        self.bump = bump;
        self.treasury_address = treasury;
        self.start_utc = start_utc;
        self.rate_amount_units = rate_amount_units;
        self.rate_interval_in_seconds = rate_interval_in_seconds;
        self.cliff_vest_amount = cliff_vest_amount;
        self.cliff_is_percentage = cliff_is_percentage;
        Ok(())
    }

    /// The vesting schedule of a stream created from this template
    pub fn schedule(&self) -> VestingSchedule {
        VestingSchedule {
            start_utc: self.start_utc,
            rate_amount_units: self.rate_amount_units,
            rate_interval_in_seconds: self.rate_interval_in_seconds,
            cliff_vest_amount: self.cliff_vest_amount,
            cliff_is_percentage: self.cliff_is_percentage,
        }
    }
}
