use shared::types::{Amount, Hash};
use soroban_sdk::{contracttype, Address};

/// Which relation to the gating subject a claimant must have
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum ClaimGate {
    /// Claimant holds at least one unit of the subject
    ShareHolder = 0,
    /// Claimant opened the subject
    Creator = 1,
}

/// Airdrop parameters fixed at initialization
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AirdropConfig {
    /// Shares market queried for the gate
    pub shares_market: Address,
    /// Token being distributed
    pub token: Address,
    /// Root over `(claimant, amount)` leaves
    pub merkle_root: Hash,
    /// Last timestamp at which claims are accepted
    pub deadline: u64,
    pub max_claims: u32,
    pub gate: ClaimGate,
    /// Number of equal tranches a claim is released in
    pub vesting_periods: u32,
    /// Seconds between tranches
    pub period_length: u64,
}

/// A claimant's vesting schedule
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct VestingSchedule {
    pub amount: Amount,
    pub claimed_amount: Amount,
    /// Timestamp of the claim
    pub start: u64,
}
