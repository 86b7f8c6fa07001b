use anchor_lang::prelude::*;

#[event]
pub struct StreamEvent {
    // state data
    pub version: u8,
    pub name: [u8; 32],
    pub treasurer_address: Pubkey,
    pub beneficiary_address: Pubkey,
    pub beneficiary_associated_token: Pubkey,
    pub treasury_address: Pubkey,
    pub start_utc: u64,
    pub rate_amount_units: u64,
    pub rate_interval_in_seconds: u64,
    pub cliff_vest_amount: u64,
    pub cliff_is_percentage: bool,
    pub allocation_assigned_units: u64,
    pub total_withdrawals_units: u64,
    pub last_withdrawal_units: u64,
    pub last_withdrawal_slot: u64,
    pub last_withdrawal_block_time: u64,
    pub schedule_updatable: bool,
    pub paused: bool,
    pub last_manual_stop_block_time: u64,
    pub last_manual_resume_block_time: u64,
    pub is_pda: bool,
    /// Unix timestamp (in seconds) when the stream was created
    pub created_on_utc: u64,
    pub category: u8,
    pub sub_category: u8,
    // calculated data
    pub status: String,
    pub current_block_time: u64,
    pub cliff_units: u64,
    pub vested_units: u64,
    pub withdrawable_units: u64,
    pub remaining_allocation: u64,
    pub est_depletion_time: u64,
}

#[event]
pub struct CreateTreasuryEvent {
    pub timestamp: u64,
    pub treasury_type: u8,
    pub auto_close_on_empty_streams: bool,
    pub auto_close_on_empty_balance: bool,
    pub with_template: bool,
    pub treasury: Pubkey,
}

#[event]
pub struct CreateTemplateEvent {
    pub timestamp: u64,
    pub start_utc: u64,
    pub rate_amount_units: u64,
    pub rate_interval_in_seconds: u64,
    pub cliff_vest_amount: u64,
    pub cliff_is_percentage: bool,
    pub template: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct TreasuryAddFundsEvent {
    pub timestamp: u64,
    pub token_fee_charged: u64,
    pub amount: u64,
    pub treasury_balance_after: u64,
    pub fee_collector: Pubkey,
    pub contributor: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct CreateStreamEvent {
    pub timestamp: u64,
    pub stream_start_ts: u64,
    pub stream_rate_amount: u64,
    pub stream_rate_interval: u64,
    pub stream_allocation: u64,
    pub stream_cliff: u64,
    pub stream_schedule_updatable: bool,
    pub stream_is_pda: bool,
    pub with_template: bool,
    pub treasury_allocation_after: u64,
    pub treasury_balance_after: u64,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct StreamWithdrawEvent {
    pub timestamp: u64,
    pub amount: u64,
    pub stream_withdrawable_before: u64,
    pub stream_allocation_after: u64,
    pub stream_total_withdrawals_after: u64,
    pub treasury_allocation_after: u64,
    pub treasury_balance_after: u64,
    pub treasury_total_withdrawals_after: u64,
    pub treasury_auto_closed: bool,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct StreamScheduleUpdateEvent {
    pub timestamp: u64,
    pub stream_start_ts: u64,
    pub stream_rate_amount: u64,
    pub stream_rate_interval: u64,
    pub stream_cliff: u64,
    pub stream_allocation_before: u64,
    pub stream_allocation_after: u64,
    pub treasury_allocation_after: u64,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct StreamCloseEvent {
    pub timestamp: u64,
    pub token_amount_sent_to_beneficiary: u64,
    pub token_amount_released_to_treasury: u64,
    pub stream_allocation_before: u64,
    pub stream_total_withdrawals_before: u64,
    pub treasury_allocation_after: u64,
    pub treasury_balance_after: u64,
    pub treasury_total_streams_after: u64,
    pub treasury_auto_closed: bool,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct TreasuryWithdrawEvent {
    pub timestamp: u64,
    pub amount: u64,
    pub treasury_balance_after: u64,
    pub destination: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct TreasuryRefreshEvent {
    pub timestamp: u64,
    pub treasury_balance_before: u64,
    pub treasury_balance_after: u64,
    pub treasury: Pubkey,
}

#[event]
pub struct TreasuryCloseEvent {
    pub timestamp: u64,
    pub token_amount_sent_to_destination: u64,
    pub auto_closed: bool,
    pub treasury: Pubkey,
}

#[event]
pub struct StreamTransferEvent {
    pub timestamp: u64,
    pub stream: Pubkey,
    pub treasury: Pubkey,
    pub previous_beneficiary: Pubkey,
    pub new_beneficiary: Pubkey,
}

#[event]
pub struct StreamAllocateEvent {
    pub timestamp: u64,
    pub amount: u64,
    pub stream_allocation_after: u64,
    pub treasury_allocation_after: u64,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct StreamPauseEvent {
    pub timestamp: u64,
    pub vested_units: u64,
    pub initializer: Pubkey,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct StreamResumeEvent {
    pub timestamp: u64,
    pub paused_seconds: u64,
    pub start_utc_after: u64,
    pub initializer: Pubkey,
    pub stream: Pubkey,
    pub treasury: Pubkey,
}
