use soroban_sdk::{symbol_short, Symbol};

// Shares market
pub const SHARES_CREATED: Symbol = symbol_short!("create");
pub const SHARES_TRADED: Symbol = symbol_short!("trade");
pub const REWARD_WITHDRAWN: Symbol = symbol_short!("wd_reward");
pub const CONFIG_UPDATED: Symbol = symbol_short!("cfg_set");
pub const OWNER_CHANGED: Symbol = symbol_short!("owner_set");

// Vesting lock
pub const LOCK_CREATED: Symbol = symbol_short!("lock_new");
pub const LOCK_CLAIMED: Symbol = symbol_short!("lock_clm");
pub const LOCK_SPLIT: Symbol = symbol_short!("lock_spl");

// Airdrop
pub const AIRDROP_CLAIMED: Symbol = symbol_short!("ad_claim");
pub const AIRDROP_VESTED: Symbol = symbol_short!("ad_vest");
pub const AIRDROP_SWEPT: Symbol = symbol_short!("ad_sweep");
