use anchor_lang::prelude::*;
use anchor_spl::associated_token::*;
use anchor_spl::token::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::stream::*;
use crate::template::*;
use crate::treasury::*;

pub mod fee_treasury {
    anchor_lang::declare_id!("5NcYYKRrMbA2SXrqwcWqkBwTWC2UbSGBSKLpCmakyXAN");
}

/// Create Treasury
#[derive(Accounts)]
#[instruction(
    idl_file_version: u8,
    slot: u64,
)]
pub struct CreateTreasuryAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    pub treasurer: Signer<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &slot.to_le_bytes()],
        bump,
        space = Treasury::LEN
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    pub associated_token: Box<Account<'info, Mint>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Create Treasury and Template
#[derive(Accounts)]
#[instruction(
    idl_file_version: u8,
    name: String,
    treasury_type: u8,
    auto_close_on_empty_streams: bool,
    auto_close_on_empty_balance: bool,
    category: crate::categories::Category,
    sub_category: crate::categories::SubCategory,
    start_utc: u64,
    rate_amount_units: u64,
    rate_interval_in_seconds: u64,
    cliff_vest_amount: u64,
    cliff_is_percentage: bool,
    slot: u64,
)]
pub struct CreateTreasuryAndTemplateAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    pub treasurer: Signer<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &slot.to_le_bytes()],
        bump,
        space = Treasury::LEN
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [TEMPLATE_SEED, treasury.key().as_ref()],
        bump,
        space = StreamTemplate::LEN
    )]
    pub template: Box<Account<'info, StreamTemplate>>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    pub associated_token: Box<Account<'info, Mint>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Add Funds
#[derive(Accounts)]
#[instruction(
    idl_file_version: u8,
    amount: u64,
)]
pub struct AddFundsAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(constraint = amount > 0 @ ErrorCode::ZeroContributionAmount)]
    pub contributor: Signer<'info>,
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = contributor,
        constraint = contributor_token.amount >= amount @ ErrorCode::InsufficientFunds,
    )]
    pub contributor_token: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.treasurer_address.as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    #[account(
        constraint = associated_token.key() == treasury.associated_token_address @ ErrorCode::InvalidAssociatedToken
    )]
    pub associated_token: Box<Account<'info, Mint>>,
    pub fee_treasury: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = fee_treasury
    )]
    pub fee_treasury_token: Box<Account<'info, TokenAccount>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Create Stream (random stream keypair)
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct CreateStreamAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::NotAuthorized)]
    pub treasurer: Signer<'info>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(constraint = beneficiary.key() != treasurer.key() @ ErrorCode::InvalidBeneficiary)]
    pub beneficiary: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        space = Stream::LEN
    )]
    pub stream: Box<Account<'info, Stream>>,
    pub system_program: Program<'info, System>,
}

/// Create Stream at `["stream", treasury, stream_pda_seed]`
#[derive(Accounts)]
#[instruction(
    idl_file_version: u8,
    name: String,
    start_utc: u64,
    rate_amount_units: u64,
    rate_interval_in_seconds: u64,
    allocation_assigned_units: u64,
    cliff_vest_amount: u64,
    cliff_is_percentage: bool,
    schedule_updatable: bool,
    stream_pda_seed: Pubkey,
)]
pub struct CreateStreamPdaAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::NotAuthorized)]
    pub treasurer: Signer<'info>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(constraint = beneficiary.key() != treasurer.key() @ ErrorCode::InvalidBeneficiary)]
    pub beneficiary: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [STREAM_SEED, treasury.key().as_ref(), stream_pda_seed.as_ref()],
        bump,
        space = Stream::LEN
    )]
    pub stream: Box<Account<'info, Stream>>,
    pub system_program: Program<'info, System>,
}

/// Create Stream With Template (random stream keypair)
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct CreateStreamWithTemplateAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::NotAuthorized)]
    pub treasurer: Signer<'info>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        seeds = [TEMPLATE_SEED, treasury.key().as_ref()],
        bump = template.bump,
        constraint = template.treasury_address == treasury.key() @ ErrorCode::InvalidTemplate,
        constraint = template.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub template: Box<Account<'info, StreamTemplate>>,
    #[account(constraint = beneficiary.key() != treasurer.key() @ ErrorCode::InvalidBeneficiary)]
    pub beneficiary: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        space = Stream::LEN
    )]
    pub stream: Box<Account<'info, Stream>>,
    pub system_program: Program<'info, System>,
}

/// Create Stream With Template at `["stream", treasury, stream_pda_seed]`
#[derive(Accounts)]
#[instruction(
    idl_file_version: u8,
    name: String,
    allocation_assigned_units: u64,
    stream_pda_seed: Pubkey,
)]
pub struct CreateStreamPdaWithTemplateAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::NotAuthorized)]
    pub treasurer: Signer<'info>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        seeds = [TEMPLATE_SEED, treasury.key().as_ref()],
        bump = template.bump,
        constraint = template.treasury_address == treasury.key() @ ErrorCode::InvalidTemplate,
        constraint = template.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub template: Box<Account<'info, StreamTemplate>>,
    #[account(constraint = beneficiary.key() != treasurer.key() @ ErrorCode::InvalidBeneficiary)]
    pub beneficiary: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [STREAM_SEED, treasury.key().as_ref(), stream_pda_seed.as_ref()],
        bump,
        space = Stream::LEN
    )]
    pub stream: Box<Account<'info, Stream>>,
    pub system_program: Program<'info, System>,
}

/// Withdraw
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct WithdrawAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(constraint = beneficiary.key() == stream.beneficiary_address @ ErrorCode::InvalidBeneficiary)]
    pub beneficiary: Signer<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = beneficiary
    )]
    pub beneficiary_token: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        address = treasury.treasurer_address @ ErrorCode::InvalidTreasurer
    )]
    pub treasurer: SystemAccount<'info>,
    /// Receives the leftover tokens when the treasury auto-closes
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasurer
    )]
    pub treasurer_token: Option<Box<Account<'info, TokenAccount>>>,
    #[account(
        constraint = (
            associated_token.key() == treasury.associated_token_address &&
            associated_token.key() == stream.beneficiary_associated_token
        ) @ ErrorCode::InvalidAssociatedToken
    )]
    pub associated_token: Box<Account<'info, Mint>>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.treasurer_address.as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        constraint = stream.treasury_address == treasury.key() @ ErrorCode::InvalidTreasury,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Update Stream Schedule
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct UpdateStreamScheduleAccounts<'info> {
    #[account(
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema,
        constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::InvalidTreasurer
    )]
    pub treasurer: Signer<'info>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        constraint = stream.treasury_address == treasury.key() @ ErrorCode::InvalidTreasury,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
}

/// Allocate
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct AllocateAccounts<'info> {
    #[account(
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema,
        constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::InvalidTreasurer
    )]
    pub treasurer: Signer<'info>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        constraint = stream.treasury_address == treasury.key() @ ErrorCode::InvalidTreasury,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
}

/// Pause or Resume Stream
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct PauseOrResumeStreamAccounts<'info> {
    #[account(
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema,
        constraint = (
            initializer.key() == stream.treasurer_address ||
            initializer.key() == stream.beneficiary_address
        ) @ ErrorCode::NotAuthorized
    )]
    pub initializer: Signer<'info>,
    #[account(
        seeds = [TREASURY_SEED, treasury.treasurer_address.as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        constraint = stream.treasury_address == treasury.key() @ ErrorCode::InvalidTreasury,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
}

/// Close (cancel) Stream
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct CloseStreamAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(
        mut,
        constraint = (
            treasurer.key() == stream.treasurer_address &&
            treasurer.key() == treasury.treasurer_address
        ) @ ErrorCode::InvalidTreasurer
    )]
    pub treasurer: Signer<'info>,
    /// Receives the leftover tokens when the treasury auto-closes
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasurer
    )]
    pub treasurer_token: Option<Box<Account<'info, TokenAccount>>>,
    #[account(constraint = beneficiary.key() == stream.beneficiary_address @ ErrorCode::InvalidBeneficiary)]
    pub beneficiary: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = beneficiary
    )]
    pub beneficiary_token: Box<Account<'info, TokenAccount>>,
    #[account(
        constraint = (
            associated_token.key() == stream.beneficiary_associated_token &&
            associated_token.key() == treasury.associated_token_address
        ) @ ErrorCode::InvalidAssociatedToken,
    )]
    pub associated_token: Box<Account<'info, Mint>>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        close = payer,
        constraint = stream.treasury_address == treasury.key() @ ErrorCode::InvalidTreasury,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Treasury Withdraw (unallocated surplus)
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct TreasuryWithdrawAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(address = treasury.treasurer_address @ ErrorCode::InvalidTreasurer)]
    pub treasurer: Signer<'info>,
    pub destination_authority: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = destination_authority,
    )]
    pub destination_token_account: Box<Account<'info, TokenAccount>>,
    #[account(address = treasury.associated_token_address @ ErrorCode::InvalidAssociatedToken)]
    pub associated_token: Box<Account<'info, Mint>>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Refresh Treasury Data
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct RefreshTreasuryDataAccounts<'info> {
    #[account(
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema,
        constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::InvalidTreasurer
    )]
    pub treasurer: Signer<'info>,
    #[account(constraint = associated_token.key() == treasury.associated_token_address @ ErrorCode::InvalidAssociatedToken)]
    pub associated_token: Box<Account<'info, Mint>>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
}

/// Close Treasury
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct CloseTreasuryAccounts<'info> {
    #[account(
        mut,
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema
    )]
    pub payer: Signer<'info>,
    #[account(
        mut,
        constraint = treasurer.key() == treasury.treasurer_address @ ErrorCode::InvalidTreasurer
    )]
    pub treasurer: Signer<'info>,
    pub destination_authority: SystemAccount<'info>,
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::mint = associated_token,
        associated_token::authority = destination_authority,
    )]
    pub destination_token_account: Box<Account<'info, TokenAccount>>,
    #[account(constraint = associated_token.key() == treasury.associated_token_address @ ErrorCode::InvalidAssociatedToken)]
    pub associated_token: Box<Account<'info, Mint>>,
    #[account(
        mut,
        seeds = [TREASURY_SEED, treasurer.key().as_ref(), &treasury.slot.to_le_bytes()],
        bump = treasury.bump,
        close = treasurer,
        constraint = treasury.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub treasury: Box<Account<'info, Treasury>>,
    #[account(
        mut,
        associated_token::mint = associated_token,
        associated_token::authority = treasury
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Transfer Stream
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct TransferStreamAccounts<'info> {
    #[account(
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema,
        constraint = beneficiary.key() == stream.beneficiary_address @ ErrorCode::NotAuthorized
    )]
    pub beneficiary: Signer<'info>,
    #[account(
        mut,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
}

/// Get Stream
#[derive(Accounts)]
#[instruction(idl_file_version: u8)]
pub struct GetStreamAccounts<'info> {
    #[account(
        constraint = idl_file_version == IDL_FILE_VERSION @ ErrorCode::StaleSchema,
        constraint = stream.version == ACCOUNT_VERSION @ ErrorCode::StaleSchema,
    )]
    pub stream: Box<Account<'info, Stream>>,
}
