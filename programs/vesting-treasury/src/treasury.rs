use anchor_lang::prelude::*;

use crate::constants::*;
use crate::enums::TreasuryType;
use crate::errors::ErrorCode;

#[account]
#[derive(InitSpace)]
pub struct Treasury {
    pub initialized: bool,
    pub version: u8,
    pub bump: u8,
    pub slot: u64,
    pub name: [u8; 32],
    pub treasurer_address: Pubkey,
    /// Mint of the custodied token
    pub associated_token_address: Pubkey,
    /// The type of the treasury (Open, Locked)
    pub treasury_type: u8,
    pub auto_close_on_empty_streams: bool,
    pub auto_close_on_empty_balance: bool,
    /// Indicates the main product category such as `Vesting(1)`
    pub category: u8,
    pub sub_category: u8,
    /// Treasury balance tracking
    /// Units custodied by the treasury token account as seen by the ledger
    pub balance_units: u64,
    pub last_balance_update_slot: u64,
    pub last_balance_update_block_time: u64,
    /// Treasury allocation tracking
    /// The allocation reserved and not yet withdrawn accross all the streams
    /// that belong to this treasury
    pub allocation_reserved_units: u64,
    /// The total amount withdrawn by all the streams that belong to this treasury
    pub total_withdrawals_units: u64,
    /// Protocol fees charged on deposits
    pub total_fees_units: u64,
    /// Streams created and not cancelled
    pub total_streams: u64,
    /// Streams with allocation left to withdraw
    pub active_streams: u64,
    pub created_on_utc: u64,
}

/// Caller supplied fields of a new treasury
pub struct NewTreasury {
    pub name: [u8; 32],
    pub treasury_type: TreasuryType,
    pub auto_close_on_empty_streams: bool,
    pub auto_close_on_empty_balance: bool,
    pub category: u8,
    pub sub_category: u8,
}

impl Treasury {
    pub const LEN: usize = 8 + Treasury::INIT_SPACE;

    pub fn init(
        &mut self,
        params: NewTreasury,
        treasurer: Pubkey,
        mint: Pubkey,
        slot: u64,
        bump: u8,
        now_ts: u64,
    ) -> Result<()> {
        require!(!self.initialized, ErrorCode::AddressCollision);

        self.initialized = true;
        self.version = ACCOUNT_VERSION;
        self.bump = bump;
        self.slot = slot;
        self.name = params.name;
        self.treasurer_address = treasurer;
        self.associated_token_address = mint;
        self.treasury_type = params.treasury_type as u8;
        self.auto_close_on_empty_streams = params.auto_close_on_empty_streams;
        self.auto_close_on_empty_balance = params.auto_close_on_empty_balance;
        self.category = params.category;
        self.sub_category = params.sub_category;
        self.balance_units = 0;
        self.last_balance_update_slot = 0;
        self.last_balance_update_block_time = 0;
        self.allocation_reserved_units = 0;
        self.total_withdrawals_units = 0;
        self.total_fees_units = 0;
        self.total_streams = 0;
        self.active_streams = 0;
        self.created_on_utc = now_ts;
        Ok(())
    }

    pub fn kind(&self) -> Result<TreasuryType> {
        TreasuryType::try_from(self.treasury_type)
    }

    /// Gets the unallocated balance as
    /// `balance_units` - `allocation_reserved_units`
    pub fn unallocated_balance(&self) -> Result<u64> {
        let result = self
            .balance_units
            .checked_sub(self.allocation_reserved_units)
            .ok_or(ErrorCode::Overflow)?;
        #[cfg(feature = "test")]
        msg!("unallocated_balance: {0}", result);
        Ok(result)
    }

    fn touch(&mut self, now_ts: u64, now_slot: u64) {
        self.last_balance_update_slot = now_slot;
        self.last_balance_update_block_time = now_ts;
    }

    /// Credits a deposit net of its fee. Returns the new balance.
    pub fn deposit(&mut self, credited: u64, fee: u64, now_ts: u64, now_slot: u64) -> Result<u64> {
        let balance = self
            .balance_units
            .checked_add(credited)
            .ok_or(ErrorCode::Overflow)?;
        let fees = self
            .total_fees_units
            .checked_add(fee)
            .ok_or(ErrorCode::Overflow)?;

        self.balance_units = balance;
        self.total_fees_units = fees;
        self.touch(now_ts, now_slot);
        Ok(balance)
    }

    /// Reserves `allocation` units for a new stream
    pub fn register_stream(&mut self, allocation: u64) -> Result<()> {
        require!(allocation <= self.unallocated_balance()?, ErrorCode::OverAllocation);

        self.allocation_reserved_units = self
            .allocation_reserved_units
            .checked_add(allocation)
            .ok_or(ErrorCode::Overflow)?;
        self.total_streams = self.total_streams.checked_add(1).ok_or(ErrorCode::Overflow)?;
        self.active_streams = self.active_streams.checked_add(1).ok_or(ErrorCode::Overflow)?;
        Ok(())
    }

    /// Moves a stream allocation from `previous` to `current` units.
    /// `was_active` and `is_active` tell whether the stream had, and has,
    /// allocation left to withdraw.
    pub fn reallocate_stream(
        &mut self,
        previous: u64,
        current: u64,
        was_active: bool,
        is_active: bool,
    ) -> Result<()> {
        if current > previous {
            let extra = current - previous;
            require!(extra <= self.unallocated_balance()?, ErrorCode::OverAllocation);
            self.allocation_reserved_units = self
                .allocation_reserved_units
                .checked_add(extra)
                .ok_or(ErrorCode::Overflow)?;
        } else {
            self.allocation_reserved_units = self
                .allocation_reserved_units
                .checked_sub(previous - current)
                .ok_or(ErrorCode::Overflow)?;
        }
        match (was_active, is_active) {
            (false, true) => {
                self.active_streams = self.active_streams.checked_add(1).ok_or(ErrorCode::Overflow)?
            }
            (true, false) => self.active_streams = self.active_streams.saturating_sub(1),
            _ => {}
        }
        Ok(())
    }

    /// Pays `amount` units out of a stream allocation. `drained` tells whether
    /// the stream has nothing left to withdraw afterwards.
    pub fn stream_withdrawal(
        &mut self,
        amount: u64,
        drained: bool,
        now_ts: u64,
        now_slot: u64,
    ) -> Result<()> {
        let reserved = self
            .allocation_reserved_units
            .checked_sub(amount)
            .ok_or(ErrorCode::Overflow)?;
        let balance = self
            .balance_units
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientFunds)?;

        self.allocation_reserved_units = reserved;
        self.balance_units = balance;
        self.total_withdrawals_units = self
            .total_withdrawals_units
            .checked_add(amount)
            .ok_or(ErrorCode::Overflow)?;
        if drained {
            self.active_streams = self.active_streams.saturating_sub(1);
        }
        self.touch(now_ts, now_slot);
        Ok(())
    }

    /// Removes a cancelled stream: `payout` units go to the beneficiary and
    /// `released` units return to the unallocated balance
    pub fn close_stream(
        &mut self,
        payout: u64,
        released: u64,
        was_active: bool,
        now_ts: u64,
        now_slot: u64,
    ) -> Result<()> {
        let deallocated = payout.checked_add(released).ok_or(ErrorCode::Overflow)?;
        let reserved = self
            .allocation_reserved_units
            .checked_sub(deallocated)
            .ok_or(ErrorCode::Overflow)?;
        let balance = self
            .balance_units
            .checked_sub(payout)
            .ok_or(ErrorCode::InsufficientFunds)?;
        let total_streams = self
            .total_streams
            .checked_sub(1)
            .ok_or(ErrorCode::TreasuryContainsStreams)?;

        self.allocation_reserved_units = reserved;
        self.balance_units = balance;
        self.total_withdrawals_units = self
            .total_withdrawals_units
            .checked_add(payout)
            .ok_or(ErrorCode::Overflow)?;
        self.total_streams = total_streams;
        if was_active {
            self.active_streams = self.active_streams.saturating_sub(1);
        }
        self.touch(now_ts, now_slot);
        Ok(())
    }

    /// Treasurer reclaims unallocated units. Only `Open` treasuries allow it.
    pub fn withdraw_unallocated(&mut self, amount: u64, now_ts: u64, now_slot: u64) -> Result<u64> {
        require!(self.kind()? == TreasuryType::Open, ErrorCode::InvalidTreasuryType);
        require!(amount > 0, ErrorCode::InvalidWithdrawalAmount);
        require!(amount <= self.unallocated_balance()?, ErrorCode::InsufficientFunds);

        self.balance_units -= amount;
        self.touch(now_ts, now_slot);
        Ok(self.balance_units)
    }

    /// Syncs the tracked balance with the token account amount
    pub fn refresh_balance(&mut self, token_amount: u64, now_ts: u64, now_slot: u64) -> Result<()> {
        require!(
            token_amount >= self.allocation_reserved_units,
            ErrorCode::InsufficientFunds
        );
        self.balance_units = token_amount;
        self.touch(now_ts, now_slot);
        Ok(())
    }

    /// Units handed back to the treasurer when the treasury closes
    pub fn closing_refund(&self) -> Result<u64> {
        require!(
            self.active_streams == 0 && self.allocation_reserved_units == 0,
            ErrorCode::TreasuryContainsStreams
        );
        if self.kind()? == TreasuryType::Locked {
            require!(self.balance_units == 0, ErrorCode::InvalidTreasuryType);
        }
        Ok(self.balance_units)
    }

    /// Whether the last draining operation left the treasury ready to be
    /// closed. An `Open` treasury without live streams refunds its surplus
    /// first, so only the allocation has to be empty.
    pub fn auto_close_due(&self) -> Result<bool> {
        let streams_done = self.active_streams == 0 && self.allocation_reserved_units == 0;
        let empty_balance = self.balance_units == 0;

        if self.auto_close_on_empty_balance && empty_balance && streams_done {
            return Ok(true);
        }
        if self.auto_close_on_empty_streams && streams_done {
            return Ok(empty_balance || self.kind()? == TreasuryType::Open);
        }
        Ok(false)
    }
}
