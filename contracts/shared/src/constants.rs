/// Base denomination of the settlement token and the scale of every fee percent.
pub const UNIT: i128 = 1_000_000_000_000_000_000;

/// Fixed-point scale of the reward-per-share accumulator.
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Strkey of the all-zero ed25519 account, used as the null recipient.
pub const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// Shares minted to the creator when a subject is opened.
pub const CREATOR_INITIAL_SHARES: u64 = 1;
