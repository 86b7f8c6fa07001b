use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // Ledger
    #[msg("Insufficient funds")]
    InsufficientFunds,
    #[msg("Stream allocation exceeds the treasury unallocated balance")]
    OverAllocation,
    #[msg("Withdrawal amount exceeds the vested amount")]
    ExceedsVested,
    #[msg("Operation not allowed for this treasury type")]
    InvalidTreasuryType,
    #[msg("Account address is already in use")]
    AddressCollision,
    #[msg("The stream schedule can not be modified")]
    ImmutableSchedule,
    #[msg("Client and account schema versions do not match")]
    StaleSchema, // 6006
    // General
    #[msg("Overflow")]
    Overflow,
    #[msg("Not Authorized")]
    NotAuthorized,
    #[msg("Invalid associated token address")]
    InvalidAssociatedToken,
    #[msg("Invalid fee treasury account")]
    InvalidFeeTreasuryAccount,
    #[msg("Invalid fee configuration")]
    InvalidFeeConfig,
    #[msg("Could not find a valid bump for the derived address")]
    AddressDerivationFailed,
    #[msg("Account address does not match its derived address")]
    InvalidDerivedAddress,
    #[msg("The string length is larger than 32 bytes")]
    StringTooLong,
    // Treasury
    #[msg("Invalid treasury account")]
    InvalidTreasury,
    #[msg("Invalid treasurer")]
    InvalidTreasurer,
    #[msg("Contribution amount is zero")]
    ZeroContributionAmount,
    #[msg("This treasury contains one or more streams")]
    TreasuryContainsStreams,
    // Template
    #[msg("Invalid template account")]
    InvalidTemplate,
    // Stream
    #[msg("Invalid beneficiary")]
    InvalidBeneficiary,
    #[msg("Invalid stream rate")]
    InvalidStreamRate,
    #[msg("Invalid cliff")]
    InvalidCliff,
    #[msg("Invalid requested stream allocation")]
    InvalidRequestedStreamAllocation,
    #[msg("Withdrawal amount is zero")]
    ZeroWithdrawalAmount,
    #[msg("Invalid withdrawal amount")]
    InvalidWithdrawalAmount,
    #[msg("The stream was cancelled")]
    StreamCancelled,
    #[msg("The stream is paused")]
    StreamPaused,
    #[msg("The stream is not paused")]
    StreamNotPaused,
}
