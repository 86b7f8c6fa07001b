use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// Seeds of a derived address, in the order they are hashed
fn seeds<'a>(namespace: &'a [u8], owner: &'a Pubkey, seed: Option<&'a [u8]>) -> Vec<&'a [u8]> {
    let mut seeds = vec![namespace, owner.as_ref()];
    if let Some(seed) = seed {
        seeds.push(seed);
    }
    seeds
}

/// Derives `(address, bump)` for `[namespace, owner, seed?]`.
///
/// Returns `AddressDerivationFailed` if no bump in `0..=255` yields an
/// off-curve address.
pub fn try_derive(namespace: &[u8], owner: &Pubkey, seed: Option<&[u8]>) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(&seeds(namespace, owner, seed), &crate::ID)
        .ok_or_else(|| error!(ErrorCode::AddressDerivationFailed))
}

/// Derives `(address, bump)` for `[namespace, owner, seed?]`.
///
/// Exhausting the bump space is not reachable in practice, callers that must
/// not panic use [`try_derive`].
pub fn derive(namespace: &[u8], owner: &Pubkey, seed: Option<&[u8]>) -> (Pubkey, u8) {
    Pubkey::find_program_address(&seeds(namespace, owner, seed), &crate::ID)
}

pub fn treasury_address(treasurer: &Pubkey, slot: u64) -> (Pubkey, u8) {
    derive(TREASURY_SEED, treasurer, Some(&slot.to_le_bytes()))
}

pub fn template_address(treasury: &Pubkey) -> (Pubkey, u8) {
    derive(TEMPLATE_SEED, treasury, None)
}

pub fn stream_address(treasury: &Pubkey, stream_pda_seed: &Pubkey) -> (Pubkey, u8) {
    derive(STREAM_SEED, treasury, Some(stream_pda_seed.as_ref()))
}

/// Verifies that `address` is the canonical derived address for the seeds
pub fn verify(
    address: &Pubkey,
    namespace: &[u8],
    owner: &Pubkey,
    seed: Option<&[u8]>,
) -> Result<u8> {
    let (expected, bump) = try_derive(namespace, owner, seed)?;
    require_keys_eq!(*address, expected, ErrorCode::InvalidDerivedAddress);
    Ok(bump)
}
