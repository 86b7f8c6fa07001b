use anchor_lang::prelude::*;
use anchor_spl::token::*;

use crate::categories::*;
use crate::enums::*;
use crate::errors::ErrorCode;
use crate::events::*;
use crate::stream::*;
use crate::template::*;
use crate::treasury::*;
use crate::utils::*;

pub fn construct_treasury_account(
    treasury: &mut Account<'_, Treasury>,
    treasurer: Pubkey,
    mint: Pubkey,
    slot: u64,
    bump: u8,
    name: String,
    treasury_type: u8,
    auto_close_on_empty_streams: bool,
    auto_close_on_empty_balance: bool,
    category: Category,
    sub_category: SubCategory,
    with_template: bool,
) -> Result<()> {
    let now_ts = Clock::get()?.unix_timestamp as u64;
    msg!("clock: {0}, slot: {1}, tsy_type: {2}", now_ts, slot, treasury_type);

    let params = NewTreasury {
        name: string_to_bytes(name)?,
        treasury_type: TreasuryType::try_from(treasury_type)?,
        auto_close_on_empty_streams,
        auto_close_on_empty_balance,
        category: category as u8,
        sub_category: sub_category as u8,
    };
    treasury.init(params, treasurer, mint, slot, bump, now_ts)?;

    emit!(CreateTreasuryEvent {
        timestamp: now_ts,
        treasury_type,
        auto_close_on_empty_streams,
        auto_close_on_empty_balance,
        with_template,
        treasury: treasury.key(),
    });

    Ok(())
}

pub fn construct_template_account(
    template: &mut Account<'_, StreamTemplate>,
    treasury: Pubkey,
    bump: u8,
    start_utc: u64,
    rate_amount_units: u64,
    rate_interval_in_seconds: u64,
    cliff_vest_amount: u64,
    cliff_is_percentage: bool,
) -> Result<()> {
    let now_ts = Clock::get()?.unix_timestamp as u64;
    template.init(
        treasury,
        bump,
        start_utc,
        rate_amount_units,
        rate_interval_in_seconds,
        cliff_vest_amount,
        cliff_is_percentage,
    )?;

    emit!(CreateTemplateEvent {
        timestamp: now_ts,
        start_utc,
        rate_amount_units,
        rate_interval_in_seconds,
        cliff_vest_amount,
        cliff_is_percentage,
        template: template.key(),
        treasury,
    });

    Ok(())
}

/// Shared by the four stream creation instructions. Reserves the allocation
/// on the treasury and writes the stream record.
pub fn construct_stream_account(
    treasury: &mut Account<'_, Treasury>,
    stream: &mut Account<'_, Stream>,
    beneficiary: Pubkey,
    name: String,
    mut schedule: VestingSchedule,
    allocation_assigned_units: u64,
    schedule_updatable: bool,
    address: StreamAddress,
    with_template: bool,
) -> Result<()> {
    let clock = Clock::get()?;
    let now_ts = clock.unix_timestamp as u64;
    msg!("clock: {0}, tsy_bal: {1}, tsy_alloc: {2}, tsy_wdths: {3}, crt_alloc: {4}",
        now_ts, treasury.balance_units, treasury.allocation_reserved_units, treasury.total_withdrawals_units, allocation_assigned_units);

    if schedule_updatable {
        require!(treasury.kind()? == TreasuryType::Open, ErrorCode::InvalidTreasuryType);
    }
    if schedule.start_utc < now_ts {
        schedule.start_utc = now_ts;
    }

    let params = NewStream {
        name: string_to_bytes(name)?,
        schedule,
        allocation_assigned_units,
        schedule_updatable,
    };
    stream.init(
        params,
        address,
        treasury.key(),
        treasury.treasurer_address,
        beneficiary,
        treasury.associated_token_address,
        treasury.category,
        treasury.sub_category,
        now_ts,
    )?;
    treasury.register_stream(allocation_assigned_units)?;

    emit!(CreateStreamEvent {
        timestamp: now_ts,
        stream_start_ts: schedule.start_utc,
        stream_rate_amount: schedule.rate_amount_units,
        stream_rate_interval: schedule.rate_interval_in_seconds,
        stream_allocation: allocation_assigned_units,
        stream_cliff: schedule.cliff_units(allocation_assigned_units)?,
        stream_schedule_updatable: schedule_updatable,
        stream_is_pda: matches!(address, StreamAddress::Derived { .. }),
        with_template,
        treasury_allocation_after: treasury.allocation_reserved_units,
        treasury_balance_after: treasury.balance_units,
        stream: stream.key(),
        treasury: treasury.key(),
    });

    Ok(())
}

/// Closes the treasury if its auto-close flags say the last draining
/// operation emptied it. Any tokens left in the treasury token account go to
/// the treasurer token account, without one the treasury stays open until a
/// later call passes it. Returns whether the treasury was closed.
pub fn try_auto_close_treasury<'info>(
    treasury: &mut Account<'info, Treasury>,
    treasury_token: &mut Account<'info, TokenAccount>,
    mint: &Account<'info, Mint>,
    treasurer: &AccountInfo<'info>,
    treasurer_token: Option<AccountInfo<'info>>,
    token_program: &AccountInfo<'info>,
) -> Result<bool> {
    if !treasury.auto_close_due()? {
        return Ok(false);
    }
    treasury.closing_refund()?;

    treasury_token.reload()?;
    let remaining = treasury_token.amount;
    if remaining > 0 {
        let Some(treasurer_token) = treasurer_token else {
            msg!("tsy{0}left", remaining);
            return Ok(false);
        };
        msg!("tsy{0}tsr", remaining);
        treasury_transfer(
            treasury,
            &treasury_token.to_account_info(),
            &treasurer_token,
            mint,
            token_program,
            remaining,
        )?;
    }
    close_treasury_token_account(
        treasury,
        &treasury_token.to_account_info(),
        treasurer,
        token_program,
    )?;
    treasury.close(treasurer.clone())?;

    #[cfg(feature = "test")]
    msg!("auto closed treasury: {0}", treasury.key());

    Ok(true)
}
