// how to run:
// cargo test -p vesting-treasury --test vesting_ledger_test

use anchor_lang::error::{Error, ERROR_CODE_OFFSET};
use anchor_lang::prelude::*;
use vesting_treasury::{
    constants::*,
    enums::{StreamStatus, TreasuryType},
    errors::ErrorCode,
    fees::{FeeCalculator, FeeConfig},
    instructions::fee_treasury,
    pda,
    stream::{NewStream, Stream, StreamAddress, VestingSchedule},
    template::StreamTemplate,
    treasury::{NewTreasury, Treasury},
    utils::string_to_bytes,
};

const NOW: u64 = 1_700_000_000;

fn error_code<T>(result: Result<T>) -> u32 {
    match result {
        Err(Error::AnchorError(e)) => e.error_code_number,
        Err(e) => panic!("expected an anchor error, got {:?}", e),
        Ok(_) => panic!("expected an error"),
    }
}

fn code(error: ErrorCode) -> u32 {
    error as u32 + ERROR_CODE_OFFSET
}

fn new_treasury(treasury_type: TreasuryType, treasurer: Pubkey, slot: u64) -> Treasury {
    let (_, bump) = pda::treasury_address(&treasurer, slot);
    let mut treasury = Treasury {
        initialized: false,
        version: 0,
        bump: 0,
        slot: 0,
        name: [0; 32],
        treasurer_address: Pubkey::default(),
        associated_token_address: Pubkey::default(),
        treasury_type: 0,
        auto_close_on_empty_streams: false,
        auto_close_on_empty_balance: false,
        category: 0,
        sub_category: 0,
        balance_units: 0,
        last_balance_update_slot: 0,
        last_balance_update_block_time: 0,
        allocation_reserved_units: 0,
        total_withdrawals_units: 0,
        total_fees_units: 0,
        total_streams: 0,
        active_streams: 0,
        created_on_utc: 0,
    };
    treasury
        .init(
            NewTreasury {
                name: string_to_bytes(String::from("test treasury")).unwrap(),
                treasury_type,
                auto_close_on_empty_streams: false,
                auto_close_on_empty_balance: false,
                category: 1,
                sub_category: 8,
            },
            treasurer,
            Pubkey::new_unique(),
            slot,
            bump,
            NOW,
        )
        .unwrap();
    treasury
}

fn blank_stream() -> Stream {
    Stream {
        version: 0,
        initialized: false,
        name: [0; 32],
        treasurer_address: Pubkey::default(),
        treasury_address: Pubkey::default(),
        beneficiary_address: Pubkey::default(),
        beneficiary_associated_token: Pubkey::default(),
        address: StreamAddress::Random { key: Pubkey::default() },
        schedule: VestingSchedule {
            start_utc: 0,
            rate_amount_units: 0,
            rate_interval_in_seconds: 0,
            cliff_vest_amount: 0,
            cliff_is_percentage: false,
        },
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
    }
}

/// Mirrors the create stream instructions: write the record, then reserve
fn create_stream(
    treasury: &mut Treasury,
    stream: &mut Stream,
    address: StreamAddress,
    schedule: VestingSchedule,
    allocation: u64,
    updatable: bool,
) -> Result<()> {
    stream.init(
        NewStream {
            name: string_to_bytes(String::from("stream")).unwrap(),
            schedule,
            allocation_assigned_units: allocation,
            schedule_updatable: updatable,
        },
        address,
        Pubkey::new_unique(),
        treasury.treasurer_address,
        Pubkey::new_unique(),
        treasury.associated_token_address,
        treasury.category,
        treasury.sub_category,
        NOW,
    )?;
    treasury.register_stream(allocation)
}

fn fund(treasury: &mut Treasury, amount: u64) -> (u64, u64) {
    let fees = FeeCalculator::new(FeeConfig::program_default()).unwrap();
    let (credited, fee) = fees.split(amount).unwrap();
    let balance = treasury.deposit(credited, fee, NOW, 1).unwrap();
    (balance, fee)
}

fn linear(rate: u64, interval: u64) -> VestingSchedule {
    VestingSchedule {
        start_utc: NOW,
        rate_amount_units: rate,
        rate_interval_in_seconds: interval,
        cliff_vest_amount: 0,
        cliff_is_percentage: false,
    }
}

#[test]
fn add_funds_charges_the_protocol_fee() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    let (balance, fee) = fund(&mut treasury, 100_000_000);

    assert_eq!(fee, 250_000);
    assert_eq!(balance, 99_750_000);
    assert_eq!(balance + fee, 100_000_000);
    assert_eq!(treasury.total_fees_units, 250_000);
    assert_eq!(
        FeeCalculator::new(FeeConfig::program_default()).unwrap().collector(),
        &fee_treasury::ID
    );
}

#[test]
fn stream_fully_vests_and_is_drained() {
    let mut treasury = new_treasury(TreasuryType::Locked, Pubkey::new_unique(), 0);
    fund(&mut treasury, 100_000_000);

    let mut stream = blank_stream();
    let key = Pubkey::new_unique();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key },
        linear(10, 1),
        1_000,
        false,
    )
    .unwrap();
    assert_eq!(treasury.allocation_reserved_units, 1_000);
    assert_eq!(stream.status(NOW + 50).unwrap(), StreamStatus::Running);

    let later = NOW + 100;
    assert_eq!(stream.vested_units(later).unwrap(), 1_000);
    stream.withdraw(1_000, later, 2).unwrap();
    treasury
        .stream_withdrawal(1_000, stream.remaining_allocation().unwrap() == 0, later, 2)
        .unwrap();

    assert_eq!(treasury.allocation_reserved_units, 0);
    assert_eq!(treasury.balance_units, 99_749_000);
    assert_eq!(treasury.active_streams, 0);
    assert_eq!(stream.status(later).unwrap(), StreamStatus::Vested);

    assert_eq!(error_code(stream.withdraw(1, later + 1_000, 3)), code(ErrorCode::ExceedsVested));
    assert_eq!(error_code(stream.withdraw(0, later, 3)), code(ErrorCode::ZeroWithdrawalAmount));
}

#[test]
fn reusing_a_stream_seed_collides() {
    let treasurer = Pubkey::new_unique();
    let mut treasury = new_treasury(TreasuryType::Open, treasurer, 7);
    fund(&mut treasury, 10_000);
    let (treasury_key, _) = pda::treasury_address(&treasurer, 7);

    let seed = Pubkey::new_unique();
    let (first, bump) = pda::stream_address(&treasury_key, &seed);
    let (second, _) = pda::stream_address(&treasury_key, &seed);
    assert_eq!(first, second);

    // both creations land on the same account
    let mut account = blank_stream();
    let address = StreamAddress::Derived { seed, bump };
    create_stream(&mut treasury, &mut account, address, linear(1, 1), 100, true).unwrap();
    let result = create_stream(&mut treasury, &mut account, address, linear(1, 1), 100, true);

    assert_eq!(error_code(result), code(ErrorCode::AddressCollision));
    assert_eq!(treasury.allocation_reserved_units, 100);
    assert_eq!(treasury.total_streams, 1);
}

#[test]
fn stream_allocation_is_bounded_by_the_unallocated_balance() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();

    let mut a = blank_stream();
    create_stream(
        &mut treasury,
        &mut a,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(1, 1),
        800,
        true,
    )
    .unwrap();

    let mut b = blank_stream();
    let result = create_stream(
        &mut treasury,
        &mut b,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(1, 1),
        201,
        true,
    );
    assert_eq!(error_code(result), code(ErrorCode::OverAllocation));
    assert!(treasury.allocation_reserved_units <= treasury.balance_units);

    assert_eq!(
        error_code(treasury.withdraw_unallocated(201, NOW, 2)),
        code(ErrorCode::InsufficientFunds)
    );
    assert_eq!(treasury.withdraw_unallocated(200, NOW, 2).unwrap(), 800);
}

#[test]
fn template_streams_vest_like_explicit_ones() {
    let treasury_key = Pubkey::new_unique();
    let (template_key, bump) = pda::template_address(&treasury_key);
    assert_eq!(pda::template_address(&treasury_key).0, template_key);

    let mut template = StreamTemplate {
        version: 0,
        bump: 0,
        treasury_address: Pubkey::default(),
        start_utc: 0,
        rate_amount_units: 0,
        rate_interval_in_seconds: 0,
        cliff_vest_amount: 0,
        cliff_is_percentage: false,
    };
    template.init(treasury_key, bump, NOW, 25, 60, 100_000, true).unwrap();

    let explicit = VestingSchedule {
        start_utc: NOW,
        rate_amount_units: 25,
        rate_interval_in_seconds: 60,
        cliff_vest_amount: 100_000,
        cliff_is_percentage: true,
    };
    assert_eq!(template.schedule(), explicit);

    let mut treasury = new_treasury(TreasuryType::Locked, Pubkey::new_unique(), 0);
    treasury.deposit(10_000, 0, NOW, 1).unwrap();
    let mut from_template = blank_stream();
    let mut from_params = blank_stream();
    create_stream(
        &mut treasury,
        &mut from_template,
        StreamAddress::Random { key: Pubkey::new_unique() },
        template.schedule(),
        5_000,
        false,
    )
    .unwrap();
    create_stream(
        &mut treasury,
        &mut from_params,
        StreamAddress::Random { key: Pubkey::new_unique() },
        explicit,
        5_000,
        false,
    )
    .unwrap();

    for t in [NOW - 1, NOW, NOW + 59, NOW + 60, NOW + 3_600, NOW + 1_000_000] {
        assert_eq!(
            from_template.vested_units(t).unwrap(),
            from_params.vested_units(t).unwrap()
        );
    }
    assert_eq!(from_template.vested_units(NOW).unwrap(), 500);
}

#[test]
fn locked_treasury_keeps_its_funds() {
    let mut treasury = new_treasury(TreasuryType::Locked, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();

    assert_eq!(
        error_code(treasury.withdraw_unallocated(1, NOW, 2)),
        code(ErrorCode::InvalidTreasuryType)
    );
    assert_eq!(error_code(treasury.closing_refund()), code(ErrorCode::InvalidTreasuryType));
    assert_eq!(error_code(TreasuryType::try_from(2)), code(ErrorCode::InvalidTreasuryType));
}

#[test]
fn fixed_schedules_reject_updates() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();
    let mut stream = blank_stream();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(1, 1),
        500,
        false,
    )
    .unwrap();

    assert_eq!(
        error_code(stream.update_schedule(2, 1, 500, NOW + 10)),
        code(ErrorCode::ImmutableSchedule)
    );
    assert_eq!(error_code(stream.cancel(NOW + 10, 2)), code(ErrorCode::ImmutableSchedule));
}

#[test]
fn cancelling_returns_the_unvested_allocation() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();
    let mut stream = blank_stream();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(10, 1),
        1_000,
        true,
    )
    .unwrap();

    let (payout, released) = stream.cancel(NOW + 30, 2).unwrap();
    treasury.close_stream(payout, released, true, NOW + 30, 2).unwrap();

    assert_eq!((payout, released), (300, 700));
    assert_eq!(treasury.balance_units, 700);
    assert_eq!(treasury.allocation_reserved_units, 0);
    assert_eq!(treasury.unallocated_balance().unwrap(), 700);
    assert_eq!(treasury.closing_refund().unwrap(), 700);
}

#[test]
fn growing_a_drained_stream_reactivates_it() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    treasury.deposit(2_000, 0, NOW, 1).unwrap();
    let mut stream = blank_stream();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(10, 1),
        100,
        true,
    )
    .unwrap();

    stream.withdraw(100, NOW + 10, 2).unwrap();
    treasury.stream_withdrawal(100, true, NOW + 10, 2).unwrap();
    assert_eq!(treasury.active_streams, 0);

    let was_active = stream.remaining_allocation().unwrap() > 0;
    let previous = stream.update_schedule(10, 1, 600, NOW + 20).unwrap();
    let is_active = stream.remaining_allocation().unwrap() > 0;
    treasury.reallocate_stream(previous, 600, was_active, is_active).unwrap();

    assert_eq!(treasury.active_streams, 1);
    assert_eq!(treasury.allocation_reserved_units, 500);
    assert_eq!(stream.withdrawable_units(NOW + 20).unwrap(), 0);
    assert_eq!(stream.withdrawable_units(NOW + 30).unwrap(), 100);
}

#[test]
fn paused_streams_stop_vesting_until_resumed() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();
    let mut stream = blank_stream();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(10, 1),
        1_000,
        true,
    )
    .unwrap();

    assert_eq!(stream.pause(NOW + 20).unwrap(), 200);
    assert_eq!(stream.status(NOW + 40).unwrap(), StreamStatus::Paused);
    assert_eq!(stream.withdrawable_units(NOW + 40).unwrap(), 200);
    assert_eq!(error_code(stream.pause(NOW + 30)), code(ErrorCode::StreamPaused));
    assert_eq!(
        error_code(stream.update_schedule(5, 1, 1_000, NOW + 30)),
        code(ErrorCode::StreamPaused)
    );

    assert_eq!(stream.resume(NOW + 50).unwrap(), 30);
    assert_eq!(error_code(stream.resume(NOW + 50)), code(ErrorCode::StreamNotPaused));
    assert_eq!(stream.vested_units(NOW + 60).unwrap(), 300);
    assert_eq!(stream.est_depletion_time().unwrap(), NOW + 130);
    assert_eq!(stream.last_manual_stop_block_time, NOW + 20);
    assert_eq!(stream.last_manual_resume_block_time, NOW + 50);

    // treasury reservations are untouched by pausing
    assert_eq!(treasury.allocation_reserved_units, 1_000);
    assert_eq!(treasury.active_streams, 1);
}

#[test]
fn fixed_schedules_can_not_be_paused_or_grown() {
    let mut treasury = new_treasury(TreasuryType::Locked, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();
    let mut stream = blank_stream();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(1, 1),
        500,
        false,
    )
    .unwrap();

    assert_eq!(error_code(stream.pause(NOW + 10)), code(ErrorCode::ImmutableSchedule));
    assert_eq!(error_code(stream.resume(NOW + 10)), code(ErrorCode::StreamNotPaused));
    assert_eq!(error_code(stream.allocate(100)), code(ErrorCode::ImmutableSchedule));
}

#[test]
fn allocating_reserves_treasury_funds() {
    let mut treasury = new_treasury(TreasuryType::Open, Pubkey::new_unique(), 0);
    treasury.deposit(1_000, 0, NOW, 1).unwrap();
    let mut stream = blank_stream();
    create_stream(
        &mut treasury,
        &mut stream,
        StreamAddress::Random { key: Pubkey::new_unique() },
        linear(10, 1),
        100,
        true,
    )
    .unwrap();

    stream.withdraw(100, NOW + 10, 2).unwrap();
    treasury.stream_withdrawal(100, true, NOW + 10, 2).unwrap();
    assert_eq!(treasury.active_streams, 0);

    let was_active = stream.remaining_allocation().unwrap() > 0;
    let previous = stream.allocate(300).unwrap();
    treasury
        .reallocate_stream(previous, stream.allocation_assigned_units, was_active, true)
        .unwrap();

    assert_eq!(treasury.active_streams, 1);
    assert_eq!(treasury.allocation_reserved_units, 300);
    assert_eq!(stream.withdrawable_units(NOW + 10).unwrap(), 0);
    assert_eq!(stream.withdrawable_units(NOW + 40).unwrap(), 300);

    // 900 in the treasury, 300 reserved
    let previous = stream.allocate(601).unwrap();
    let result = treasury.reallocate_stream(previous, stream.allocation_assigned_units, true, true);
    assert_eq!(error_code(result), code(ErrorCode::OverAllocation));
    assert_eq!(treasury.allocation_reserved_units, 300);
    assert_eq!(error_code(stream.allocate(0)), code(ErrorCode::InvalidRequestedStreamAllocation));
}
