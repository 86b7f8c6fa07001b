use anchor_lang::prelude::*;
use std::cmp;

use crate::constants::*;
use crate::enums::*;
use crate::errors::ErrorCode;

/// How the stream account address was chosen at creation
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamAddress {
    /// Caller generated keypair
    Random { key: Pubkey },
    /// `["stream", treasury, seed]`
    Derived { seed: Pubkey, bump: u8 },
}

/// Cliff + linear vesting parameters
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingSchedule {
    /// The start timestamp in seconds
    pub start_utc: u64,
    /// Units released at the end of every full interval
    pub rate_amount_units: u64,
    pub rate_interval_in_seconds: u64,
    /// Units (or parts per `PERCENT_DENOMINATOR` of the allocation when
    /// `cliff_is_percentage` is set) released at `start_utc`
    pub cliff_vest_amount: u64,
    pub cliff_is_percentage: bool,
}

impl VestingSchedule {
    /// Effective cliff as an absolute amount for the given allocation
    pub fn cliff_units(&self, allocation: u64) -> Result<u64> {
        if !self.cliff_is_percentage {
            return Ok(self.cliff_vest_amount);
        }
        let cliff = (allocation as u128)
            .checked_mul(self.cliff_vest_amount as u128)
            .ok_or(ErrorCode::Overflow)?
            .checked_div(PERCENT_DENOMINATOR as u128)
            .ok_or(ErrorCode::Overflow)?;
        Ok(u64::try_from(cliff).map_err(|_| ErrorCode::Overflow)?)
    }

    /// Checks the schedule can stream `allocation` units.
    ///
    /// Without a rate the schedule is a one time payment and is only valid
    /// when the cliff covers the whole allocation.
    pub fn validate(&self, allocation: u64) -> Result<()> {
        require!(allocation > 0, ErrorCode::InvalidRequestedStreamAllocation);
        if self.cliff_is_percentage {
            require!(self.cliff_vest_amount <= PERCENT_DENOMINATOR, ErrorCode::InvalidCliff);
        }
        let cliff = self.cliff_units(allocation)?;
        require!(cliff <= allocation, ErrorCode::InvalidCliff);

        let streaming = self.rate_amount_units > 0 && self.rate_interval_in_seconds > 0;
        require!(streaming || cliff == allocation, ErrorCode::InvalidStreamRate);
        Ok(())
    }

    /// Units vested at `timestamp` for a stream allocated `allocation` units.
    ///
    /// Non-decreasing in `timestamp` and never above `allocation`.
    pub fn vested_units(&self, allocation: u64, timestamp: u64) -> Result<u64> {
        if timestamp < self.start_utc {
            return Ok(0);
        }

        let elapsed = timestamp - self.start_utc;
        let periods = elapsed
            .checked_div(self.rate_interval_in_seconds)
            .unwrap_or(0);
        let linear = cmp::min(
            (periods as u128)
                .checked_mul(self.rate_amount_units as u128)
                .ok_or(ErrorCode::Overflow)?,
            allocation as u128,
        );
        let cliff = self.cliff_units(allocation)? as u128;
        let vested = cmp::min(
            allocation as u128,
            cliff.checked_add(linear).ok_or(ErrorCode::Overflow)?,
        );

        #[cfg(feature = "test")]
        msg!("elapsed: {0}, periods: {1}, linear: {2}, cliff: {3}, vested: {4}", elapsed, periods, linear, cliff, vested);

        Ok(vested as u64)
    }

    /// First timestamp at which the whole allocation is vested, saturated at
    /// `u64::MAX` for schedules that end past the representable time range
    pub fn est_depletion_time(&self, allocation: u64) -> Result<u64> {
        let cliff = self.cliff_units(allocation)?;
        if cliff >= allocation || self.rate_amount_units == 0 {
            return Ok(self.start_utc);
        }
        let streamable = (allocation - cliff) as u128;
        let rate = self.rate_amount_units as u128;
        let periods = (streamable + rate - 1) / rate;
        // u64 * u64 + u64 always fits in u128
        let depletion = periods * self.rate_interval_in_seconds as u128 + self.start_utc as u128;
        Ok(u64::try_from(depletion).unwrap_or(u64::MAX))
    }
}

#[account]
#[derive(InitSpace)]
pub struct Stream {
    pub version: u8,
    pub initialized: bool,
    pub name: [u8; 32],
    pub treasurer_address: Pubkey,
    pub treasury_address: Pubkey,
    pub beneficiary_address: Pubkey,
    /// Mint of the streamed token
    pub beneficiary_associated_token: Pubkey,
    pub address: StreamAddress,
    pub schedule: VestingSchedule,
    /// Amount of tokens reserved in the treasury for this stream. Vesting
    /// never goes beyond it.
    pub allocation_assigned_units: u64,
    /// Withdrawal tracking
    /// The total amount that has been withdrawn by the beneficiary
    pub total_withdrawals_units: u64,
    /// The last amount withdrew by the beneficiary
    pub last_withdrawal_units: u64,
    pub last_withdrawal_slot: u64,
    pub last_withdrawal_block_time: u64,
    /// Whether the treasurer can update or cancel the schedule
    pub schedule_updatable: bool,
    pub cancelled: bool,
    /// Vesting is frozen at `last_manual_stop_block_time` while set
    pub paused: bool,
    pub last_manual_stop_block_time: u64,
    pub last_manual_resume_block_time: u64,
    /// Unix timestamp (in seconds) when the stream was created
    pub created_on_utc: u64,
    pub category: u8,
    pub sub_category: u8,
}

/// Caller supplied fields of a new stream
pub struct NewStream {
    pub name: [u8; 32],
    pub schedule: VestingSchedule,
    pub allocation_assigned_units: u64,
    pub schedule_updatable: bool,
}

impl Stream {
    pub const LEN: usize = 8 + Stream::INIT_SPACE;

    pub fn init(
        &mut self,
        params: NewStream,
        address: StreamAddress,
        treasury_address: Pubkey,
        treasurer_address: Pubkey,
        beneficiary_address: Pubkey,
        mint: Pubkey,
        category: u8,
        sub_category: u8,
        now_ts: u64,
    ) -> Result<()> {
        require!(!self.initialized, ErrorCode::AddressCollision);
        params.schedule.validate(params.allocation_assigned_units)?;

        self.version = ACCOUNT_VERSION;
        self.initialized = true;
        self.name = params.name;
        self.treasurer_address = treasurer_address;
        self.treasury_address = treasury_address;
        self.beneficiary_address = beneficiary_address;
        self.beneficiary_associated_token = mint;
        self.address = address;
        self.schedule = params.schedule;
        self.allocation_assigned_units = params.allocation_assigned_units;
        self.total_withdrawals_units = 0;
        self.last_withdrawal_units = 0;
        self.last_withdrawal_slot = 0;
        self.last_withdrawal_block_time = 0;
        self.schedule_updatable = params.schedule_updatable;
        self.cancelled = false;
        self.paused = false;
        self.last_manual_stop_block_time = 0;
        self.last_manual_resume_block_time = 0;
        self.created_on_utc = now_ts;
        self.category = category;
        self.sub_category = sub_category;
        Ok(())
    }

    /// Units vested at `timestamp`. A cancelled stream is frozen at what was
    /// paid out and a paused one at what had vested when it was paused.
    pub fn vested_units(&self, timestamp: u64) -> Result<u64> {
        if self.cancelled {
            return Ok(self.total_withdrawals_units);
        }
        let timestamp = if self.paused {
            cmp::min(timestamp, self.last_manual_stop_block_time)
        } else {
            timestamp
        };
        self.schedule.vested_units(self.allocation_assigned_units, timestamp)
    }

    /// Gets the beneficiary withdrawable amount at the given blocktime
    pub fn withdrawable_units(&self, timestamp: u64) -> Result<u64> {
        let vested = self.vested_units(timestamp)?;
        Ok(vested.checked_sub(self.total_withdrawals_units).ok_or(ErrorCode::Overflow)?)
    }

    /// Allocation not yet withdrawn
    pub fn remaining_allocation(&self) -> Result<u64> {
        Ok(self
            .allocation_assigned_units
            .checked_sub(self.total_withdrawals_units)
            .ok_or(ErrorCode::Overflow)?)
    }

    pub fn status(&self, timestamp: u64) -> Result<StreamStatus> {
        if self.cancelled {
            return Ok(StreamStatus::Cancelled);
        }
        if self.paused {
            return Ok(StreamStatus::Paused);
        }
        if timestamp < self.schedule.start_utc {
            return Ok(StreamStatus::Scheduled);
        }
        if self.vested_units(timestamp)? < self.allocation_assigned_units {
            return Ok(StreamStatus::Running);
        }
        Ok(StreamStatus::Vested)
    }

    /// Records a withdrawal of `amount` and returns the new withdrawn total
    pub fn withdraw(&mut self, amount: u64, now_ts: u64, now_slot: u64) -> Result<u64> {
        require!(!self.cancelled, ErrorCode::StreamCancelled);
        require!(amount > 0, ErrorCode::ZeroWithdrawalAmount);

        let withdrawable = self.withdrawable_units(now_ts)?;
        #[cfg(feature = "test")]
        msg!("withdrawable: {0}, requested: {1}", withdrawable, amount);
        require!(amount <= withdrawable, ErrorCode::ExceedsVested);

        self.total_withdrawals_units = self
            .total_withdrawals_units
            .checked_add(amount)
            .ok_or(ErrorCode::Overflow)?;
        self.last_withdrawal_units = amount;
        self.last_withdrawal_slot = now_slot;
        self.last_withdrawal_block_time = now_ts;
        Ok(self.total_withdrawals_units)
    }

    /// Replaces rate, interval and allocation.
    ///
    /// A running stream is re-anchored at `now_ts` with what has vested so far
    /// as an absolute cliff, so the vested amount stays continuous.
    /// Returns the previous allocation.
    pub fn update_schedule(
        &mut self,
        rate_amount_units: u64,
        rate_interval_in_seconds: u64,
        allocation_assigned_units: u64,
        now_ts: u64,
    ) -> Result<u64> {
        require!(!self.cancelled, ErrorCode::StreamCancelled);
        require!(self.schedule_updatable, ErrorCode::ImmutableSchedule);
        require!(!self.paused, ErrorCode::StreamPaused);

        let mut schedule = self.schedule;
        schedule.rate_amount_units = rate_amount_units;
        schedule.rate_interval_in_seconds = rate_interval_in_seconds;

        if now_ts >= self.schedule.start_utc {
            let vested = self.vested_units(now_ts)?;
            require!(
                allocation_assigned_units >= vested,
                ErrorCode::InvalidRequestedStreamAllocation
            );
            schedule.start_utc = now_ts;
            schedule.cliff_vest_amount = vested;
            schedule.cliff_is_percentage = false;
        }
        schedule.validate(allocation_assigned_units)?;

        let previous = self.allocation_assigned_units;
        self.schedule = schedule;
        self.allocation_assigned_units = allocation_assigned_units;
        Ok(previous)
    }

    /// Cancels the stream. Returns `(payout, released)`: the vested units
    /// still owed to the beneficiary and the unvested units handed back to
    /// the treasury.
    pub fn cancel(&mut self, now_ts: u64, now_slot: u64) -> Result<(u64, u64)> {
        require!(!self.cancelled, ErrorCode::StreamCancelled);
        require!(self.schedule_updatable, ErrorCode::ImmutableSchedule);

        let payout = self.withdrawable_units(now_ts)?;
        let released = self
            .remaining_allocation()?
            .checked_sub(payout)
            .ok_or(ErrorCode::Overflow)?;

        self.total_withdrawals_units = self
            .total_withdrawals_units
            .checked_add(payout)
            .ok_or(ErrorCode::Overflow)?;
        if payout > 0 {
            self.last_withdrawal_units = payout;
            self.last_withdrawal_slot = now_slot;
            self.last_withdrawal_block_time = now_ts;
        }
        self.allocation_assigned_units = self.total_withdrawals_units;
        self.cancelled = true;

        Ok((payout, released))
    }

    /// Adds `amount` units to the allocation. Returns the previous allocation.
    pub fn allocate(&mut self, amount: u64) -> Result<u64> {
        require!(!self.cancelled, ErrorCode::StreamCancelled);
        require!(self.schedule_updatable, ErrorCode::ImmutableSchedule);
        require!(amount > 0, ErrorCode::InvalidRequestedStreamAllocation);

        let previous = self.allocation_assigned_units;
        self.allocation_assigned_units = previous
            .checked_add(amount)
            .ok_or(ErrorCode::Overflow)?;
        Ok(previous)
    }

    /// Freezes vesting at `now_ts`. Returns the units vested at that point.
    pub fn pause(&mut self, now_ts: u64) -> Result<u64> {
        require!(!self.cancelled, ErrorCode::StreamCancelled);
        require!(self.schedule_updatable, ErrorCode::ImmutableSchedule);
        require!(!self.paused, ErrorCode::StreamPaused);

        let vested = self.vested_units(now_ts)?;
        self.paused = true;
        self.last_manual_stop_block_time = now_ts;
        Ok(vested)
    }

    /// Resumes vesting from where it was paused. The schedule start moves
    /// forward by the paused time so that time never vests.
    /// Returns the paused duration in seconds.
    pub fn resume(&mut self, now_ts: u64) -> Result<u64> {
        require!(!self.cancelled, ErrorCode::StreamCancelled);
        require!(self.paused, ErrorCode::StreamNotPaused);

        let paused_seconds = now_ts.saturating_sub(self.last_manual_stop_block_time);
        self.schedule.start_utc = self
            .schedule
            .start_utc
            .checked_add(paused_seconds)
            .ok_or(ErrorCode::Overflow)?;
        self.paused = false;
        self.last_manual_resume_block_time = now_ts;
        Ok(paused_seconds)
    }

    pub fn est_depletion_time(&self) -> Result<u64> {
        self.schedule.est_depletion_time(self.allocation_assigned_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(start: u64, rate: u64, interval: u64, cliff: u64, pct: bool) -> VestingSchedule {
        VestingSchedule {
            start_utc: start,
            rate_amount_units: rate,
            rate_interval_in_seconds: interval,
            cliff_vest_amount: cliff,
            cliff_is_percentage: pct,
        }
    }

    fn stream(schedule: VestingSchedule, allocation: u64, updatable: bool) -> Stream {
        let mut stream = Stream {
            version: 0,
            initialized: false,
            name: [b' '; 32],
            treasurer_address: Pubkey::default(),
            treasury_address: Pubkey::default(),
            beneficiary_address: Pubkey::default(),
            beneficiary_associated_token: Pubkey::default(),
            address: StreamAddress::Random { key: Pubkey::default() },
            schedule,
            allocation_assigned_units: 0,
            total_withdrawals_units: 0,
            last_withdrawal_units: 0,
            last_withdrawal_slot: 0,
            last_withdrawal_block_time: 0,
            schedule_updatable: false,
            cancelled: false,
            paused: false,
            last_manual_stop_block_time: 0,
            last_manual_resume_block_time: 0,
            created_on_utc: 0,
            category: 0,
            sub_category: 0,
        };
        stream
            .init(
                NewStream {
                    name: [b' '; 32],
                    schedule,
                    allocation_assigned_units: allocation,
                    schedule_updatable: updatable,
                },
                StreamAddress::Random { key: Pubkey::new_unique() },
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                0,
                0,
                1_000,
            )
            .unwrap();
        stream
    }

    #[test]
    fn nothing_vests_before_start() {
        let s = schedule(1_000, 10, 1, 50, false);
        assert_eq!(s.vested_units(1_000, 999).unwrap(), 0);
        assert_eq!(s.vested_units(1_000, 1_000).unwrap(), 50);
    }

    #[test]
    fn linear_vesting_is_released_per_full_interval() {
        let s = schedule(100, 5, 2, 0, false);
        assert_eq!(s.vested_units(1_000, 101).unwrap(), 0);
        assert_eq!(s.vested_units(1_000, 102).unwrap(), 5);
        assert_eq!(s.vested_units(1_000, 105).unwrap(), 10);
        assert_eq!(s.vested_units(1_000, 10_000).unwrap(), 1_000);
    }

    #[test]
    fn percentage_cliff() {
        // 25% cliff
        let s = schedule(0, 1, 10, 250_000, true);
        assert_eq!(s.cliff_units(1_000).unwrap(), 250);
        assert_eq!(s.vested_units(1_000, 0).unwrap(), 250);
        assert_eq!(s.vested_units(1_000, 100).unwrap(), 260);
        assert_eq!(s.est_depletion_time(1_000).unwrap(), 7_500);
    }

    #[test]
    fn vesting_saturates_at_the_allocation() {
        let s = schedule(0, u64::MAX, 1, 10, false);
        assert_eq!(s.vested_units(1_000, u64::MAX).unwrap(), 1_000);
    }

    #[test]
    fn validation() {
        assert!(schedule(0, 10, 1, 0, false).validate(1_000).is_ok());
        // one time payment
        assert!(schedule(0, 0, 0, 1_000, false).validate(1_000).is_ok());
        assert!(schedule(0, 0, 0, 999, false).validate(1_000).is_err());
        assert!(schedule(0, 10, 0, 0, false).validate(1_000).is_err());
        assert!(schedule(0, 10, 1, 1_001, false).validate(1_000).is_err());
        assert!(schedule(0, 10, 1, PERCENT_DENOMINATOR + 1, true).validate(1_000).is_err());
        assert!(schedule(0, 10, 1, 0, false).validate(0).is_err());
    }

    #[test]
    fn withdraw_is_bounded_by_the_vested_amount() {
        let mut s = stream(schedule(1_000, 10, 1, 0, false), 1_000, false);
        assert_eq!(s.withdrawable_units(1_050).unwrap(), 500);
        assert!(s.withdraw(501, 1_050, 1).is_err());
        assert_eq!(s.withdraw(500, 1_050, 1).unwrap(), 500);
        assert_eq!(s.withdrawable_units(1_050).unwrap(), 0);
        assert!(s.withdraw(0, 1_050, 1).is_err());
        assert_eq!(s.status(1_050).unwrap(), StreamStatus::Running);
        assert_eq!(s.status(2_000).unwrap(), StreamStatus::Vested);
    }

    #[test]
    fn stream_can_not_be_initialized_twice() {
        let mut s = stream(schedule(0, 10, 1, 0, false), 100, false);
        let params = NewStream {
            name: [b' '; 32],
            schedule: s.schedule,
            allocation_assigned_units: 100,
            schedule_updatable: false,
        };
        let address = s.address;
        let result = s.init(
            params,
            address,
            Pubkey::default(),
            Pubkey::default(),
            Pubkey::default(),
            Pubkey::default(),
            0,
            0,
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn fixed_schedule_can_not_be_updated_or_cancelled() {
        let mut s = stream(schedule(0, 10, 1, 0, false), 1_000, false);
        assert!(s.update_schedule(20, 1, 1_000, 10).is_err());
        assert!(s.cancel(10, 1).is_err());
    }

    #[test]
    fn update_keeps_the_vested_amount() {
        let mut s = stream(schedule(1_000, 10, 1, 0, false), 1_000, true);
        s.withdraw(300, 1_040, 1).unwrap();
        let previous = s.update_schedule(1, 1, 2_000, 1_050).unwrap();
        assert_eq!(previous, 1_000);
        assert_eq!(s.vested_units(1_050).unwrap(), 500);
        assert_eq!(s.vested_units(1_060).unwrap(), 510);
        assert!(s.update_schedule(1, 1, 400, 1_060).is_err());
    }

    #[test]
    fn cancel_splits_vested_and_unvested() {
        let mut s = stream(schedule(1_000, 10, 1, 100, false), 1_000, true);
        s.withdraw(100, 1_000, 1).unwrap();
        let (payout, released) = s.cancel(1_020, 2).unwrap();
        assert_eq!(payout, 200);
        assert_eq!(released, 700);
        assert_eq!(s.total_withdrawals_units, 300);
        assert_eq!(s.allocation_assigned_units, 300);
        assert_eq!(s.vested_units(5_000).unwrap(), 300);
        assert_eq!(s.status(5_000).unwrap(), StreamStatus::Cancelled);
        assert!(s.withdraw(1, 5_000, 3).is_err());
    }

    #[test]
    fn depletion_time_saturates_instead_of_overflowing() {
        let s = schedule(0, 1, u64::MAX / 2, 0, false);
        assert!(s.validate(3).is_ok());
        assert_eq!(s.est_depletion_time(3).unwrap(), u64::MAX);
        let s = schedule(u64::MAX - 10, 1, 100, 0, false);
        assert_eq!(s.est_depletion_time(3).unwrap(), u64::MAX);
    }

    #[test]
    fn paused_time_does_not_vest() {
        let mut s = stream(schedule(1_000, 10, 1, 0, false), 1_000, true);
        assert_eq!(s.pause(1_020).unwrap(), 200);
        assert_eq!(s.status(1_030).unwrap(), StreamStatus::Paused);
        assert_eq!(s.vested_units(1_050).unwrap(), 200);
        assert!(s.pause(1_030).is_err());
        assert!(s.update_schedule(20, 1, 1_000, 1_030).is_err());
        // paused streams can still be withdrawn from
        assert_eq!(s.withdraw(150, 1_050, 1).unwrap(), 150);

        assert_eq!(s.resume(1_050).unwrap(), 30);
        assert_eq!(s.schedule.start_utc, 1_030);
        assert_eq!(s.vested_units(1_050).unwrap(), 200);
        assert_eq!(s.vested_units(1_060).unwrap(), 300);
        assert_eq!(s.status(1_060).unwrap(), StreamStatus::Running);
        assert!(s.resume(1_060).is_err());
        assert_eq!(s.est_depletion_time().unwrap(), 1_130);
    }

    #[test]
    fn fixed_schedule_can_not_be_paused() {
        let mut s = stream(schedule(0, 10, 1, 0, false), 1_000, false);
        assert!(s.pause(10).is_err());
        assert!(s.resume(10).is_err());
        assert!(s.allocate(10).is_err());
    }

    #[test]
    fn allocate_extends_the_stream() {
        let mut s = stream(schedule(1_000, 10, 1, 0, false), 100, true);
        assert_eq!(s.vested_units(1_050).unwrap(), 100);
        assert_eq!(s.status(1_050).unwrap(), StreamStatus::Vested);
        assert_eq!(s.allocate(400).unwrap(), 100);
        assert_eq!(s.allocation_assigned_units, 500);
        assert_eq!(s.vested_units(1_050).unwrap(), 500);
        assert_eq!(s.vested_units(1_020).unwrap(), 200);
        assert!(s.allocate(0).is_err());

        s.cancel(1_020, 1).unwrap();
        assert!(s.allocate(10).is_err());
    }
}
