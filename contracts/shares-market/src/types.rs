use shared::types::{Amount, Subject};
use soroban_sdk::{contracttype, Address, Env, U256};

/// Market state of a single subject.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubjectInfo {
    /// Address that opened the subject; receives the creator fee
    pub creator: Address,
    /// Units in circulation, never below 1 once created
    pub supply: u64,
    /// Curve steepness, fixed at creation
    pub decline_ratio: u64,
    /// Holder-fee accumulator scaled by `PRECISION`
    pub reward_per_share_stored: U256,
}

/// A holder's balance and reward checkpoint in one subject.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HolderPosition {
    pub balance: u64,
    /// Accumulator value this position was last settled against
    pub reward_per_share_paid: U256,
    /// Settled but not yet withdrawn reward
    pub pending_reward: Amount,
}

impl HolderPosition {
    pub fn empty(env: &Env) -> Self {
        Self {
            balance: 0,
            reward_per_share_paid: U256::from_u32(env, 0),
            pending_reward: 0,
        }
    }
}

/// Owner-controlled fee parameters. Percents are parts-per-`UNIT`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    pub protocol_fee_percent: Amount,
    pub creator_fee_percent: Amount,
    pub holder_fee_percent: Amount,
    pub lp_farming_fee_percent: Amount,
    pub protocol_fee_destination: Address,
    pub dev_fund_destination: Address,
    pub lp_farming_address: Address,
    /// Flat fee in the native asset charged when a subject is opened
    pub create_shares_eth_fee: Amount,
}

/// Per-trade fee split.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeeBreakdown {
    pub protocol_fee: Amount,
    pub creator_fee: Amount,
    pub holder_fee: Amount,
    pub lp_farming_fee: Amount,
}

/// Record of a completed trade, published as the `trade` event.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TradeRecord {
    pub trader: Address,
    pub recipient: Address,
    pub subject: Subject,
    pub is_buy: bool,
    pub shares: u64,
    pub price: Amount,
    pub protocol_fee: Amount,
    pub creator_fee: Amount,
    pub holder_fee: Amount,
    pub lp_farming_fee: Amount,
    /// Supply after the trade
    pub supply: u64,
}

/// Published when a subject is opened.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateRecord {
    pub creator: Address,
    pub subject: Subject,
    pub decline_ratio: u64,
    pub eth_fee: Amount,
}

/// One row of the batched holder lookup.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubjectHolding {
    pub subject: Subject,
    pub shares: u64,
    pub earnings: Amount,
}
