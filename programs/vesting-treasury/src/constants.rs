// Schema versions
pub const IDL_FILE_VERSION: u8 = 1;
pub const ACCOUNT_VERSION: u8 = 1;

// Seed namespaces
pub const TREASURY_SEED: &[u8] = b"treasury";
pub const TEMPLATE_SEED: &[u8] = b"template";
pub const STREAM_SEED: &[u8] = b"stream";

// Fee constants
pub const ADD_FUNDS_PERCENT_FEE: u64 = 2_500;
pub const PERCENT_DENOMINATOR: u64 = 1_000_000;

// General
pub const MAX_NAME_LEN: usize = 32;
