use anchor_lang::prelude::*;

pub mod categories;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod extensions;
pub mod fees;
pub mod instructions;
pub mod pda;
pub mod stream;
pub mod template;
pub mod treasury;
pub mod utils;

use crate::categories::*;
use crate::errors::ErrorCode;
use crate::events::*;
use crate::extensions::*;
use crate::fees::*;
use crate::instructions::*;
use crate::stream::*;
use crate::utils::*;

declare_id!("CYSPuj6TeNL2o5AMSdukhepDNsde5Ni8Q6PwwtSsvQ86");

#[program]
pub mod vesting_treasury {

    use super::*;

    /// Create Treasury
    pub fn create_treasury(
        ctx: Context<CreateTreasuryAccounts>,
        _idl_file_version: u8,
        slot: u64,
        name: String,
        treasury_type: u8,
        auto_close_on_empty_streams: bool,
        auto_close_on_empty_balance: bool,
        category: Category,
        sub_category: SubCategory,
    ) -> Result<()> {
        construct_treasury_account(
            &mut ctx.accounts.treasury,
            ctx.accounts.treasurer.key(),
            ctx.accounts.associated_token.key(),
            slot,
            ctx.bumps.treasury,
            name,
            treasury_type,
            auto_close_on_empty_streams,
            auto_close_on_empty_balance,
            category,
            sub_category,
            false,
        )
    }

    /// Create Treasury and its stream Template
    pub fn create_treasury_and_template(
        ctx: Context<CreateTreasuryAndTemplateAccounts>,
        _idl_file_version: u8,
        name: String,
        treasury_type: u8,
        auto_close_on_empty_streams: bool,
        auto_close_on_empty_balance: bool,
        category: Category,
        sub_category: SubCategory,
        start_utc: u64,
        rate_amount_units: u64,
        rate_interval_in_seconds: u64,
        cliff_vest_amount: u64,
        cliff_is_percentage: bool,
        slot: u64,
    ) -> Result<()> {
        construct_treasury_account(
            &mut ctx.accounts.treasury,
            ctx.accounts.treasurer.key(),
            ctx.accounts.associated_token.key(),
            slot,
            ctx.bumps.treasury,
            name,
            treasury_type,
            auto_close_on_empty_streams,
            auto_close_on_empty_balance,
            category,
            sub_category,
            true,
        )?;

        construct_template_account(
            &mut ctx.accounts.template,
            ctx.accounts.treasury.key(),
            ctx.bumps.template,
            start_utc,
            rate_amount_units,
            rate_interval_in_seconds,
            cliff_vest_amount,
            cliff_is_percentage,
        )
    }

    /// Add Funds
    pub fn add_funds(
        ctx: Context<AddFundsAccounts>,
        _idl_file_version: u8,
        amount: u64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let now_ts = clock.unix_timestamp as u64;

        let fees = FeeCalculator::new(FeeConfig::program_default())?;
        require_keys_eq!(
            ctx.accounts.fee_treasury.key(),
            *fees.collector(),
            ErrorCode::InvalidFeeTreasuryAccount
        );
        let (credited, fee) = fees.split(amount)?;

        let treasury = &mut ctx.accounts.treasury;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, ctb_bal: {3}, amount: {4}, fee: {5}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, ctx.accounts.contributor_token.amount, amount, fee);

        if fee > 0 {
            msg!("ctb{0}fee", fee);
            transfer_token_amount(
                &ctx.accounts.contributor_token.to_account_info(),
                &ctx.accounts.fee_treasury_token.to_account_info(),
                &ctx.accounts.associated_token,
                &ctx.accounts.contributor.to_account_info(),
                &ctx.accounts.token_program.to_account_info(),
                fee,
            )?;
        }

        msg!("ctb{0}tsy", credited);
        transfer_token_amount(
            &ctx.accounts.contributor_token.to_account_info(),
            &ctx.accounts.treasury_token.to_account_info(),
            &ctx.accounts.associated_token,
            &ctx.accounts.contributor.to_account_info(),
            &ctx.accounts.token_program.to_account_info(),
            credited,
        )?;

        let balance = treasury.deposit(credited, fee, now_ts, clock.slot)?;

        emit!(TreasuryAddFundsEvent {
            timestamp: now_ts,
            token_fee_charged: fee,
            amount,
            treasury_balance_after: balance,
            fee_collector: *fees.collector(),
            contributor: ctx.accounts.contributor.key(),
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Create Stream
    pub fn create_stream(
        ctx: Context<CreateStreamAccounts>,
        _idl_file_version: u8,
        name: String,
        start_utc: u64,
        rate_amount_units: u64,
        rate_interval_in_seconds: u64,
        allocation_assigned_units: u64,
        cliff_vest_amount: u64,
        cliff_is_percentage: bool,
        schedule_updatable: bool,
    ) -> Result<()> {
        let schedule = VestingSchedule {
            start_utc,
            rate_amount_units,
            rate_interval_in_seconds,
            cliff_vest_amount,
            cliff_is_percentage,
        };
        let address = StreamAddress::Random { key: ctx.accounts.stream.key() };

        construct_stream_account(
            &mut ctx.accounts.treasury,
            &mut ctx.accounts.stream,
            ctx.accounts.beneficiary.key(),
            name,
            schedule,
            allocation_assigned_units,
            schedule_updatable,
            address,
            false,
        )
    }

    /// Create Stream at a derived address
    pub fn create_stream_pda(
        ctx: Context<CreateStreamPdaAccounts>,
        _idl_file_version: u8,
        name: String,
        start_utc: u64,
        rate_amount_units: u64,
        rate_interval_in_seconds: u64,
        allocation_assigned_units: u64,
        cliff_vest_amount: u64,
        cliff_is_percentage: bool,
        schedule_updatable: bool,
        stream_pda_seed: Pubkey,
    ) -> Result<()> {
        let schedule = VestingSchedule {
            start_utc,
            rate_amount_units,
            rate_interval_in_seconds,
            cliff_vest_amount,
            cliff_is_percentage,
        };
        let address = StreamAddress::Derived {
            seed: stream_pda_seed,
            bump: ctx.bumps.stream,
        };

        construct_stream_account(
            &mut ctx.accounts.treasury,
            &mut ctx.accounts.stream,
            ctx.accounts.beneficiary.key(),
            name,
            schedule,
            allocation_assigned_units,
            schedule_updatable,
            address,
            false,
        )
    }

    /// Create Stream using the treasury template
    pub fn create_stream_with_template(
        ctx: Context<CreateStreamWithTemplateAccounts>,
        _idl_file_version: u8,
        name: String,
        allocation_assigned_units: u64,
    ) -> Result<()> {
        let schedule = ctx.accounts.template.schedule();
        let address = StreamAddress::Random { key: ctx.accounts.stream.key() };

        construct_stream_account(
            &mut ctx.accounts.treasury,
            &mut ctx.accounts.stream,
            ctx.accounts.beneficiary.key(),
            name,
            schedule,
            allocation_assigned_units,
            false,
            address,
            true,
        )
    }

    /// Create Stream at a derived address using the treasury template
    pub fn create_stream_pda_with_template(
        ctx: Context<CreateStreamPdaWithTemplateAccounts>,
        _idl_file_version: u8,
        name: String,
        allocation_assigned_units: u64,
        stream_pda_seed: Pubkey,
    ) -> Result<()> {
        let schedule = ctx.accounts.template.schedule();
        let address = StreamAddress::Derived {
            seed: stream_pda_seed,
            bump: ctx.bumps.stream,
        };

        construct_stream_account(
            &mut ctx.accounts.treasury,
            &mut ctx.accounts.stream,
            ctx.accounts.beneficiary.key(),
            name,
            schedule,
            allocation_assigned_units,
            false,
            address,
            true,
        )
    }

    /// Withdraw
    pub fn withdraw(
        ctx: Context<WithdrawAccounts>,
        _idl_file_version: u8,
        amount: u64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let now_ts = clock.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        let stream = &mut ctx.accounts.stream;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, tsy_wdths: {3}, stm_alloc: {4}, stm_wdths: {5}, wdth_a: {6}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, treasury.total_withdrawals_units, stream.allocation_assigned_units, stream.total_withdrawals_units, amount);

        let withdrawable_before = stream.withdrawable_units(now_ts)?;
        stream.withdraw(amount, now_ts, clock.slot)?;
        let drained = stream.remaining_allocation()? == 0;
        treasury.stream_withdrawal(amount, drained, now_ts, clock.slot)?;

        msg!("tsy{0}bfy", amount);
        treasury_transfer(
            treasury,
            &ctx.accounts.treasury_token.to_account_info(),
            &ctx.accounts.beneficiary_token.to_account_info(),
            &ctx.accounts.associated_token,
            &ctx.accounts.token_program.to_account_info(),
            amount,
        )?;

        let auto_closed = try_auto_close_treasury(
            treasury,
            &mut ctx.accounts.treasury_token,
            &ctx.accounts.associated_token,
            &ctx.accounts.treasurer.to_account_info(),
            ctx.accounts.treasurer_token.as_ref().map(|token| token.to_account_info()),
            &ctx.accounts.token_program.to_account_info(),
        )?;

        emit!(StreamWithdrawEvent {
            timestamp: now_ts,
            amount,
            stream_withdrawable_before: withdrawable_before,
            stream_allocation_after: stream.allocation_assigned_units,
            stream_total_withdrawals_after: stream.total_withdrawals_units,
            treasury_allocation_after: treasury.allocation_reserved_units,
            treasury_balance_after: treasury.balance_units,
            treasury_total_withdrawals_after: treasury.total_withdrawals_units,
            treasury_auto_closed: auto_closed,
            stream: stream.key(),
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Update the rate and allocation of an updatable stream
    pub fn update_stream_schedule(
        ctx: Context<UpdateStreamScheduleAccounts>,
        _idl_file_version: u8,
        rate_amount_units: u64,
        rate_interval_in_seconds: u64,
        allocation_assigned_units: u64,
    ) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        let stream = &mut ctx.accounts.stream;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, stm_alloc: {3}, stm_wdths: {4}, new_alloc: {5}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, stream.allocation_assigned_units, stream.total_withdrawals_units, allocation_assigned_units);

        let was_active = stream.remaining_allocation()? > 0;
        let allocation_before = stream.update_schedule(
            rate_amount_units,
            rate_interval_in_seconds,
            allocation_assigned_units,
            now_ts,
        )?;
        let is_active = stream.remaining_allocation()? > 0;
        treasury.reallocate_stream(allocation_before, allocation_assigned_units, was_active, is_active)?;

        emit!(StreamScheduleUpdateEvent {
            timestamp: now_ts,
            stream_start_ts: stream.schedule.start_utc,
            stream_rate_amount: rate_amount_units,
            stream_rate_interval: rate_interval_in_seconds,
            stream_cliff: stream.schedule.cliff_units(allocation_assigned_units)?,
            stream_allocation_before: allocation_before,
            stream_allocation_after: allocation_assigned_units,
            treasury_allocation_after: treasury.allocation_reserved_units,
            stream: stream.key(),
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Close (cancel) Stream
    pub fn close_stream(
        ctx: Context<CloseStreamAccounts>,
        _idl_file_version: u8,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let now_ts = clock.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        let stream = &mut ctx.accounts.stream;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, tsy_wdths: {3}, stm_alloc: {4}, stm_wdths: {5}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, treasury.total_withdrawals_units, stream.allocation_assigned_units, stream.total_withdrawals_units);

        let allocation_before = stream.allocation_assigned_units;
        let withdrawals_before = stream.total_withdrawals_units;
        let was_active = stream.remaining_allocation()? > 0;

        let (payout, released) = stream.cancel(now_ts, clock.slot)?;
        treasury.close_stream(payout, released, was_active, now_ts, clock.slot)?;

        if payout > 0 {
            msg!("tsy{0}bfy", payout);
            treasury_transfer(
                treasury,
                &ctx.accounts.treasury_token.to_account_info(),
                &ctx.accounts.beneficiary_token.to_account_info(),
                &ctx.accounts.associated_token,
                &ctx.accounts.token_program.to_account_info(),
                payout,
            )?;
        }

        let auto_closed = try_auto_close_treasury(
            treasury,
            &mut ctx.accounts.treasury_token,
            &ctx.accounts.associated_token,
            &ctx.accounts.treasurer.to_account_info(),
            ctx.accounts.treasurer_token.as_ref().map(|token| token.to_account_info()),
            &ctx.accounts.token_program.to_account_info(),
        )?;

        emit!(StreamCloseEvent {
            timestamp: now_ts,
            token_amount_sent_to_beneficiary: payout,
            token_amount_released_to_treasury: released,
            stream_allocation_before: allocation_before,
            stream_total_withdrawals_before: withdrawals_before,
            treasury_allocation_after: treasury.allocation_reserved_units,
            treasury_balance_after: treasury.balance_units,
            treasury_total_streams_after: treasury.total_streams,
            treasury_auto_closed: auto_closed,
            stream: stream.key(),
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Withdraw unallocated funds from an Open treasury
    pub fn treasury_withdraw(
        ctx: Context<TreasuryWithdrawAccounts>,
        _idl_file_version: u8,
        amount: u64,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let now_ts = clock.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, wdth_a: {3}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, amount);

        let balance = treasury.withdraw_unallocated(amount, now_ts, clock.slot)?;

        msg!("tsy{0}dst", amount);
        treasury_transfer(
            treasury,
            &ctx.accounts.treasury_token.to_account_info(),
            &ctx.accounts.destination_token_account.to_account_info(),
            &ctx.accounts.associated_token,
            &ctx.accounts.token_program.to_account_info(),
            amount,
        )?;

        emit!(TreasuryWithdrawEvent {
            timestamp: now_ts,
            amount,
            treasury_balance_after: balance,
            destination: ctx.accounts.destination_authority.key(),
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Sync the treasury balance with its token account
    pub fn refresh_treasury_data(
        ctx: Context<RefreshTreasuryDataAccounts>,
        _idl_file_version: u8,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let now_ts = clock.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        let token_amount = ctx.accounts.treasury_token.amount;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, tkn_bal: {3}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, token_amount);

        let balance_before = treasury.balance_units;
        treasury.refresh_balance(token_amount, now_ts, clock.slot)?;

        emit!(TreasuryRefreshEvent {
            timestamp: now_ts,
            treasury_balance_before: balance_before,
            treasury_balance_after: treasury.balance_units,
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Close Treasury
    pub fn close_treasury(
        ctx: Context<CloseTreasuryAccounts>,
        _idl_file_version: u8,
    ) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, tsy_wdths: {3}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, treasury.total_withdrawals_units);

        treasury.closing_refund()?;

        // tokens sent straight to the token account are swept as well
        let remaining = ctx.accounts.treasury_token.amount;
        if remaining > 0 {
            msg!("tsy{0}dst", remaining);
            treasury_transfer(
                treasury,
                &ctx.accounts.treasury_token.to_account_info(),
                &ctx.accounts.destination_token_account.to_account_info(),
                &ctx.accounts.associated_token,
                &ctx.accounts.token_program.to_account_info(),
                remaining,
            )?;
        }

        close_treasury_token_account(
            treasury,
            &ctx.accounts.treasury_token.to_account_info(),
            &ctx.accounts.treasurer.to_account_info(),
            &ctx.accounts.token_program.to_account_info(),
        )?;

        emit!(TreasuryCloseEvent {
            timestamp: now_ts,
            token_amount_sent_to_destination: remaining,
            auto_closed: false,
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Add units to the allocation of an updatable stream
    pub fn allocate(
        ctx: Context<AllocateAccounts>,
        _idl_file_version: u8,
        amount: u64,
    ) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;

        let treasury = &mut ctx.accounts.treasury;
        let stream = &mut ctx.accounts.stream;
        msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, stm_alloc: {3}, stm_wdths: {4}, alloc_a: {5}",
            now_ts, treasury.balance_units, treasury.allocation_reserved_units, stream.allocation_assigned_units, stream.total_withdrawals_units, amount);

        let was_active = stream.remaining_allocation()? > 0;
        let allocation_before = stream.allocate(amount)?;
        treasury.reallocate_stream(allocation_before, stream.allocation_assigned_units, was_active, true)?;

        emit!(StreamAllocateEvent {
            timestamp: now_ts,
            amount,
            stream_allocation_after: stream.allocation_assigned_units,
            treasury_allocation_after: treasury.allocation_reserved_units,
            stream: stream.key(),
            treasury: treasury.key(),
        });

        Ok(())
    }

    /// Pause Stream
    pub fn pause_stream(ctx: Context<PauseOrResumeStreamAccounts>, _idl_file_version: u8) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;

        let stream = &mut ctx.accounts.stream;
        let vested_units = stream.pause(now_ts)?;
        msg!("clock: {0}, stm_vested: {1}, stm_wdths: {2}", now_ts, vested_units, stream.total_withdrawals_units);

        emit!(StreamPauseEvent {
            timestamp: now_ts,
            vested_units,
            initializer: ctx.accounts.initializer.key(),
            stream: stream.key(),
            treasury: ctx.accounts.treasury.key(),
        });

        Ok(())
    }

    /// Resume Stream
    pub fn resume_stream(ctx: Context<PauseOrResumeStreamAccounts>, _idl_file_version: u8) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;

        let stream = &mut ctx.accounts.stream;
        let paused_seconds = stream.resume(now_ts)?;
        msg!("clock: {0}, paused: {1}, stm_start: {2}", now_ts, paused_seconds, stream.schedule.start_utc);

        emit!(StreamResumeEvent {
            timestamp: now_ts,
            paused_seconds,
            start_utc_after: stream.schedule.start_utc,
            initializer: ctx.accounts.initializer.key(),
            stream: stream.key(),
            treasury: ctx.accounts.treasury.key(),
        });

        Ok(())
    }

    /// Transfer Stream to a new beneficiary
    pub fn transfer_stream(
        ctx: Context<TransferStreamAccounts>,
        _idl_file_version: u8,
        new_beneficiary: Pubkey,
    ) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;

        let stream = &mut ctx.accounts.stream;
        require!(!stream.cancelled, ErrorCode::StreamCancelled);
        require_keys_neq!(new_beneficiary, stream.treasurer_address, ErrorCode::InvalidBeneficiary);

        let previous_beneficiary = stream.beneficiary_address;
        stream.beneficiary_address = new_beneficiary;

        emit!(StreamTransferEvent {
            timestamp: now_ts,
            stream: stream.key(),
            treasury: stream.treasury_address,
            previous_beneficiary,
            new_beneficiary,
        });

        Ok(())
    }

    /// Get Stream
    pub fn get_stream(
        ctx: Context<GetStreamAccounts>,
        _idl_file_version: u8,
    ) -> Result<()> {
        let now_ts = Clock::get()?.unix_timestamp as u64;
        msg!("clock: {0}", now_ts);

        emit!(get_stream_data_event(&ctx.accounts.stream, now_ts)?);

        Ok(())
    }
}
