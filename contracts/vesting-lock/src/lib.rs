#![no_std]

//! Linear token lock. A single funded balance unlocks linearly between `start`
//! and `end`; a beneficiary may hand part of their unvested balance to a new
//! beneficiary, after which both schedules run independently to the same end.

use shared::{
    errors::Error,
    events::{LOCK_CLAIMED, LOCK_CREATED, LOCK_SPLIT},
    math::mul_div_floor,
    types::Amount,
};
use soroban_sdk::{contract, contractimpl, contracttype, log, token::TokenClient, Address, Env};


/// Storage keys for the lock contract
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Locked token
    Token,
    /// Shared end of every schedule
    End,
    /// Seconds after `End` during which schedules may still be split
    GracePeriod,
    /// Schedule keyed by beneficiary
    Lock(Address),
}

/// One beneficiary's schedule
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct LockInfo {
    /// Total amount this schedule releases
    pub amount: Amount,
    /// Amount already paid out of `amount`
    pub claimed_amount: Amount,
    pub start: u64,
    pub end: u64,
}

/// Split of a lock between two beneficiaries
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct LockSplit {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
    /// Vested amount paid to `from` before the split
    pub released: Amount,
}

fn load_lock(env: &Env, beneficiary: &Address) -> Result<LockInfo, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Lock(beneficiary.clone()))
        .ok_or(Error::NoVestedAmount)
}

fn store_lock(env: &Env, beneficiary: &Address, lock: &LockInfo) {
    env.storage()
        .persistent()
        .set(&DataKey::Lock(beneficiary.clone()), lock);
}

fn get_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInit)
}

/// Amount vested by `now` and not yet claimed.
fn claimable_at(env: &Env, lock: &LockInfo, now: u64) -> Result<Amount, Error> {
    if now <= lock.start {
        return Ok(0);
    }
    let elapsed = now.min(lock.end) - lock.start;
    let duration = lock.end - lock.start;
    let vested = mul_div_floor(env, lock.amount, elapsed as i128, duration as i128)?;
    Ok(vested - lock.claimed_amount)
}

#[contract]
pub struct VestingLock;

#[contractimpl]
impl VestingLock {
    /// Initialize the lock with its first schedule, pulling `amount` of
    /// `token` from `funder`
    ///
    /// # Arguments
    /// * `funder` - Address paying for the lock
    /// * `token` - Token being released
    /// * `beneficiary` - Owner of the first schedule
    /// * `amount` - Total released over the schedule
    /// * `start` - Timestamp the release begins
    /// * `end` - Timestamp everything is released
    /// * `grace_period` - Seconds after `end` during which splits are allowed
    ///
    /// # Errors
    /// * `AlreadyInit` - lock already holds a schedule
    /// * `InvalidTime` - `start >= end`
    /// * `InvInput` - `amount` is not positive
    pub fn initialize(
        env: Env,
        funder: Address,
        token: Address,
        beneficiary: Address,
        amount: Amount,
        start: u64,
        end: u64,
        grace_period: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Token) {
            return Err(Error::AlreadyInit);
        }
        funder.require_auth();

        if start >= end {
            return Err(Error::InvalidTime);
        }
        if amount <= 0 {
            return Err(Error::InvInput);
        }

        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::End, &end);
        env.storage()
            .instance()
            .set(&DataKey::GracePeriod, &grace_period);

        let lock = LockInfo {
            amount,
            claimed_amount: 0,
            start,
            end,
        };
        store_lock(&env, &beneficiary, &lock);

        let token = TokenClient::new(&env, &token);
        token.transfer(&funder, &env.current_contract_address(), &amount);

        env.events().publish((LOCK_CREATED, beneficiary), lock);
        Ok(())
    }

    /// Amount `beneficiary` could claim right now
    ///
    /// # Errors
    /// * `NoVestedAmount` - `beneficiary` has no schedule
    pub fn claimable(env: Env, beneficiary: Address) -> Result<Amount, Error> {
        let lock = load_lock(&env, &beneficiary)?;
        claimable_at(&env, &lock, env.ledger().timestamp())
    }

    /// Pay out everything vested so far. Claiming nothing is not an error.
    pub fn claim(env: Env, beneficiary: Address) -> Result<Amount, Error> {
        beneficiary.require_auth();

        let mut lock = load_lock(&env, &beneficiary)?;
        let amount = claimable_at(&env, &lock, env.ledger().timestamp())?;
        if amount == 0 {
            return Ok(0);
        }
        lock.claimed_amount += amount;
        store_lock(&env, &beneficiary, &lock);

        let token = TokenClient::new(&env, &get_token(&env)?);
        token.transfer(&env.current_contract_address(), &beneficiary, &amount);

        env.events()
            .publish((LOCK_CLAIMED, beneficiary), (amount, lock.claimed_amount));
        Ok(amount)
    }

    /// Move `amount` of `from`'s unvested balance into a new schedule for `to`
    ///
    /// Before `start` the new schedule copies `from`'s timing. After `start`
    /// `from` is paid what has vested and both schedules restart now.
    ///
    /// # Errors
    /// * `Ended` - past `end` plus the grace period
    /// * `TransferAmountGt0` - `amount` is not positive
    /// * `TransferAccExists` - `to` already has a schedule
    /// * `NoVestedAmount` - `from` has no schedule
    /// * `InvInput` - `amount` exceeds `from`'s unvested balance
    pub fn transfer(env: Env, from: Address, to: Address, amount: Amount) -> Result<(), Error> {
        from.require_auth();

        let now = env.ledger().timestamp();
        let end: u64 = env
            .storage()
            .instance()
            .get(&DataKey::End)
            .ok_or(Error::NotInit)?;
        let grace: u64 = env
            .storage()
            .instance()
            .get(&DataKey::GracePeriod)
            .unwrap_or(0);
        if now > end.saturating_add(grace) {
            return Err(Error::Ended);
        }
        if amount <= 0 {
            return Err(Error::TransferAmountGt0);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::Lock(to.clone()))
        {
            return Err(Error::TransferAccExists);
        }
        let mut lock = load_lock(&env, &from)?;

        let released = claimable_at(&env, &lock, now)?;
        let remaining = lock.amount - lock.claimed_amount - released;
        if amount > remaining {
            return Err(Error::InvInput);
        }

        let split = if now < lock.start {
            lock.amount -= amount;
            LockInfo {
                amount,
                claimed_amount: 0,
                start: lock.start,
                end: lock.end,
            }
        } else {
            lock = LockInfo {
                amount: remaining - amount,
                claimed_amount: 0,
                start: now,
                end: lock.end,
            };
            LockInfo {
                amount,
                claimed_amount: 0,
                start: now,
                end: lock.end,
            }
        };
        store_lock(&env, &from, &lock);
        store_lock(&env, &to, &split);

        if released > 0 {
            let token = TokenClient::new(&env, &get_token(&env)?);
            token.transfer(&env.current_contract_address(), &from, &released);
        }

        log!(&env, "lock split", amount, released, now);
        env.events().publish(
            (LOCK_SPLIT,),
            LockSplit {
                from,
                to,
                amount,
                released,
            },
        );
        Ok(())
    }

    pub fn get_lock(env: Env, beneficiary: Address) -> Option<LockInfo> {
        env.storage()
            .persistent()
            .get(&DataKey::Lock(beneficiary))
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        get_token(&env)
    }
}
