use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

#[derive(Debug, PartialEq)]
pub enum StreamStatus {
    Scheduled = 0,
    Running = 1,
    Paused = 2,
    /// Fully vested, whatever is left is withdrawable
    Vested = 3,
    Cancelled = 4,
}

impl StreamStatus {
    pub fn name(&self) -> &'static str {
        match self {
            StreamStatus::Scheduled => "Scheduled",
            StreamStatus::Running => "Running",
            StreamStatus::Paused => "Paused",
            StreamStatus::Vested => "Vested",
            StreamStatus::Cancelled => "Cancelled",
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum TreasuryType {
    Open = 0,
    Locked = 1,
}

impl TryFrom<u8> for TreasuryType {
    type Error = anchor_lang::error::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TreasuryType::Open),
            1 => Ok(TreasuryType::Locked),
            _ => err!(ErrorCode::InvalidTreasuryType),
        }
    }
}
