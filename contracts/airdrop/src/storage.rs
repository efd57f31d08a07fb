use crate::types::{AirdropConfig, VestingSchedule};
use shared::{errors::Error, types::Amount};
use soroban_sdk::{contracttype, Address, Env};

/// Storage keys for the airdrop
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Address allowed to sweep unclaimed tokens
    Admin,
    Config,
    /// Number of successful claims
    ClaimsCount,
    /// Claimed amounts not yet paid out
    Committed,
    /// Vesting schedule keyed by claimant
    Vesting(Address),
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInit)
}

pub fn set_config(env: &Env, config: &AirdropConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Result<AirdropConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInit)
}

pub fn get_claims_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ClaimsCount)
        .unwrap_or(0)
}

pub fn set_claims_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::ClaimsCount, &count);
}

pub fn get_committed(env: &Env) -> Amount {
    env.storage()
        .instance()
        .get(&DataKey::Committed)
        .unwrap_or(0)
}

pub fn set_committed(env: &Env, committed: Amount) {
    env.storage().instance().set(&DataKey::Committed, &committed);
}

pub fn get_vesting(env: &Env, claimant: &Address) -> Option<VestingSchedule> {
    env.storage()
        .persistent()
        .get(&DataKey::Vesting(claimant.clone()))
}

pub fn set_vesting(env: &Env, claimant: &Address, schedule: &VestingSchedule) {
    env.storage()
        .persistent()
        .set(&DataKey::Vesting(claimant.clone()), schedule);
}
