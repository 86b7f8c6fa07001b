use anchor_lang::prelude::*;
use anchor_spl::token::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::events::*;
use crate::stream::*;
use crate::treasury::*;

/// Moves tokens out of an account the `authority` signs for
pub fn transfer_token_amount<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    mint: &Account<'info, Mint>,
    authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let cpi_accounts = TransferChecked {
        from: from.clone(),
        mint: mint.to_account_info(),
        to: to.clone(),
        authority: authority.clone(),
    };
    let cpi_ctx = CpiContext::new(token_program.clone(), cpi_accounts);
    transfer_checked(cpi_ctx, amount, mint.decimals)
}

/// Moves tokens out of the treasury token account, signing with the treasury
/// derived address
pub fn treasury_transfer<'info>(
    treasury: &Account<'info, Treasury>,
    treasury_token: &AccountInfo<'info>,
    to_token: &AccountInfo<'info>,
    mint: &Account<'info, Mint>,
    token_program: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let slot = treasury.slot.to_le_bytes();
    let bump = [treasury.bump];
    let treasury_signer_seed: &[&[&[u8]]] = &[&[
        TREASURY_SEED,
        treasury.treasurer_address.as_ref(),
        &slot,
        &bump,
    ]];
    let cpi_accounts = TransferChecked {
        from: treasury_token.clone(),
        mint: mint.to_account_info(),
        to: to_token.clone(),
        authority: treasury.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program.clone(), cpi_accounts, treasury_signer_seed);
    transfer_checked(cpi_ctx, amount, mint.decimals)
}

/// Closes the (empty) treasury token account, its rent goes to `destination`
pub fn close_treasury_token_account<'info>(
    treasury: &Account<'info, Treasury>,
    treasury_token: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
) -> Result<()> {
    let slot = treasury.slot.to_le_bytes();
    let bump = [treasury.bump];
    let treasury_signer_seed: &[&[&[u8]]] = &[&[
        TREASURY_SEED,
        treasury.treasurer_address.as_ref(),
        &slot,
        &bump,
    ]];
    let close_cpi_accounts = CloseAccount {
        account: treasury_token.clone(),
        destination: destination.clone(),
        authority: treasury.to_account_info(),
    };
    let close_cpi_ctx = CpiContext::new_with_signer(
        token_program.clone(),
        close_cpi_accounts,
        treasury_signer_seed,
    );
    close_account(close_cpi_ctx)
}

pub fn string_to_bytes(string: String) -> Result<[u8; 32]> {
    let string_bytes = string.as_bytes();
    require!(string_bytes.len() <= MAX_NAME_LEN, ErrorCode::StringTooLong);

    let mut string_data = [b' '; MAX_NAME_LEN];
    string_data[..string_bytes.len()].copy_from_slice(string_bytes);

    Ok(string_data)
}

pub fn get_stream_data_event(stream: &Stream, now_ts: u64) -> Result<StreamEvent> {
    let status = stream.status(now_ts)?;
    let schedule = &stream.schedule;

    let data = StreamEvent {
        // state data
        version: stream.version,
        name: stream.name,
        treasurer_address: stream.treasurer_address,
        beneficiary_address: stream.beneficiary_address,
        beneficiary_associated_token: stream.beneficiary_associated_token,
        treasury_address: stream.treasury_address,
        start_utc: schedule.start_utc,
        rate_amount_units: schedule.rate_amount_units,
        rate_interval_in_seconds: schedule.rate_interval_in_seconds,
        cliff_vest_amount: schedule.cliff_vest_amount,
        cliff_is_percentage: schedule.cliff_is_percentage,
        allocation_assigned_units: stream.allocation_assigned_units,
        total_withdrawals_units: stream.total_withdrawals_units,
        last_withdrawal_units: stream.last_withdrawal_units,
        last_withdrawal_slot: stream.last_withdrawal_slot,
        last_withdrawal_block_time: stream.last_withdrawal_block_time,
        schedule_updatable: stream.schedule_updatable,
        paused: stream.paused,
        last_manual_stop_block_time: stream.last_manual_stop_block_time,
        last_manual_resume_block_time: stream.last_manual_resume_block_time,
        is_pda: matches!(stream.address, StreamAddress::Derived { .. }),
        created_on_utc: stream.created_on_utc,
        category: stream.category,
        sub_category: stream.sub_category,
        // calculated data
        status: String::from(status.name()),
        current_block_time: now_ts,
        cliff_units: schedule.cliff_units(stream.allocation_assigned_units)?,
        vested_units: stream.vested_units(now_ts)?,
        withdrawable_units: stream.withdrawable_units(now_ts)?,
        remaining_allocation: stream.remaining_allocation()?,
        est_depletion_time: stream.est_depletion_time()?,
    };

    Ok(data)
}
