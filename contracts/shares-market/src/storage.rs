use crate::types::{FeeConfig, HolderPosition, SubjectInfo};
use shared::errors::Error;
use shared::types::Subject;
use soroban_sdk::{contracttype, Address, Env};

/// Storage keys for the shares market
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Market owner
    Owner,
    /// Settlement token
    Token,
    /// Token standing in for the native currency (creation fee)
    NativeToken,
    /// Current fee parameters
    FeeConfig,
    /// Subject state keyed by subject id
    Subject(Subject),
    /// Holder position keyed by (subject, holder)
    Position(Subject, Address),
}

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInit)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInit)
}

pub fn set_native_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::NativeToken, token);
}

pub fn get_native_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::NativeToken)
        .ok_or(Error::NotInit)
}

pub fn set_fee_config(env: &Env, config: &FeeConfig) {
    env.storage().instance().set(&DataKey::FeeConfig, config);
}

pub fn get_fee_config(env: &Env) -> Result<FeeConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::FeeConfig)
        .ok_or(Error::NotInit)
}

pub fn subject_exists(env: &Env, subject: &Subject) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Subject(subject.clone()))
}

pub fn set_subject(env: &Env, subject: &Subject, info: &SubjectInfo) {
    env.storage()
        .persistent()
        .set(&DataKey::Subject(subject.clone()), info);
}

pub fn get_subject(env: &Env, subject: &Subject) -> Result<SubjectInfo, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Subject(subject.clone()))
        .ok_or(Error::ShareNotExists)
}

pub fn find_subject(env: &Env, subject: &Subject) -> Option<SubjectInfo> {
    env.storage()
        .persistent()
        .get(&DataKey::Subject(subject.clone()))
}

/// Positions are created lazily; an unknown holder reads as an empty position.
pub fn get_position(env: &Env, subject: &Subject, holder: &Address) -> HolderPosition {
    env.storage()
        .persistent()
        .get(&DataKey::Position(subject.clone(), holder.clone()))
        .unwrap_or_else(|| HolderPosition::empty(env))
}

pub fn set_position(env: &Env, subject: &Subject, holder: &Address, position: &HolderPosition) {
    env.storage()
        .persistent()
        .set(&DataKey::Position(subject.clone(), holder.clone()), position);
}
