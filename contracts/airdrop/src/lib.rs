#![no_std]

//! Merkle airdrop gated on a shares-market subject. A successful claim opens
//! a vesting schedule that releases the claimed amount in equal tranches,
//! the first of them immediately.

use shared::{
    errors::Error,
    events::{AIRDROP_CLAIMED, AIRDROP_SWEPT, AIRDROP_VESTED},
    interfaces::ShareRegistryClient,
    math::mul_div_floor,
    types::{Amount, Hash, Subject},
};
use soroban_sdk::{contract, contractimpl, log, token::TokenClient, Address, Env, Vec};

mod merkle;
mod storage;
mod types;


pub use types::*;

/// Amount of `schedule` released by `now`, claimed or not.
fn vested_at(env: &Env, config: &AirdropConfig, schedule: &VestingSchedule, now: u64) -> Result<Amount, Error> {
    let elapsed = now.saturating_sub(schedule.start) / config.period_length;
    let periods = config.vesting_periods as u64;
    let unlocked = elapsed.saturating_add(1).min(periods);
    mul_div_floor(env, schedule.amount, unlocked as i128, periods as i128)
}

fn check_gate(env: &Env, config: &AirdropConfig, claimant: &Address, subject: &Subject) -> Result<(), Error> {
    let market = ShareRegistryClient::new(env, &config.shares_market);
    match config.gate {
        ClaimGate::ShareHolder => {
            if market.shares_balance(subject, claimant) == 0 {
                return Err(Error::NotShareHolder);
            }
        }
        ClaimGate::Creator => {
            if market.subject_creator(subject).as_ref() != Some(claimant) {
                return Err(Error::NotCreator);
            }
        }
    }
    Ok(())
}

#[contract]
pub struct Airdrop;

#[contractimpl]
impl Airdrop {
    /// Initialize the airdrop
    ///
    /// # Arguments
    /// * `admin` - Address allowed to sweep unclaimed tokens after the deadline
    /// * `config` - Market, token, root, deadline, claim cap, gate and vesting
    ///
    /// # Errors
    /// * `AlreadyInit` - already initialized
    /// * `InvInput` - zero vesting periods or period length
    pub fn initialize(env: Env, admin: Address, config: AirdropConfig) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInit);
        }
        admin.require_auth();

        if config.vesting_periods == 0 || config.period_length == 0 {
            return Err(Error::InvInput);
        }

        storage::set_admin(&env, &admin);
        storage::set_config(&env, &config);
        Ok(())
    }

    /// Claim `amount` against the Merkle root and start vesting it
    ///
    /// # Arguments
    /// * `claimant` - Address named in the leaf
    /// * `proof` - Sibling hashes from the leaf up to the root
    /// * `subject` - Subject the gate is checked against
    /// * `amount` - Amount named in the leaf
    ///
    /// # Errors
    /// * `ClaimEnded` - past the deadline
    /// * `MaxClaimsReached` - claim cap already hit
    /// * `OnlyClaimOnceAllowed` - claimant already has a schedule
    /// * `InvalidProof` - proof does not lead to the root
    /// * `NotShareHolder` - gate requires a unit of `subject`
    /// * `NotCreator` - gate requires having opened `subject`
    pub fn claim(
        env: Env,
        claimant: Address,
        proof: Vec<Hash>,
        subject: Subject,
        amount: Amount,
    ) -> Result<VestingSchedule, Error> {
        claimant.require_auth();

        let config = storage::get_config(&env)?;
        let now = env.ledger().timestamp();
        if now > config.deadline {
            return Err(Error::ClaimEnded);
        }
        let count = storage::get_claims_count(&env);
        if count >= config.max_claims {
            return Err(Error::MaxClaimsReached);
        }
        if storage::get_vesting(&env, &claimant).is_some() {
            return Err(Error::OnlyClaimOnceAllowed);
        }

        let leaf = merkle::leaf_hash(&env, &claimant, amount);
        if !merkle::verify(&env, &proof, &config.merkle_root, leaf) {
            return Err(Error::InvalidProof);
        }
        check_gate(&env, &config, &claimant, &subject)?;

        let schedule = VestingSchedule {
            amount,
            claimed_amount: 0,
            start: now,
        };
        storage::set_vesting(&env, &claimant, &schedule);
        storage::set_claims_count(&env, count + 1);
        let committed = storage::get_committed(&env)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        storage::set_committed(&env, committed);

        log!(&env, "airdrop claimed", amount, count + 1);
        env.events()
            .publish((AIRDROP_CLAIMED, claimant), (subject, amount));
        Ok(schedule)
    }

    /// Pay out every tranche released since the last call
    ///
    /// # Errors
    /// * `NoVestedAmount` - no schedule, or nothing new has vested
    pub fn claim_vested_airdrop(env: Env, claimant: Address) -> Result<Amount, Error> {
        claimant.require_auth();

        let config = storage::get_config(&env)?;
        let mut schedule = storage::get_vesting(&env, &claimant).ok_or(Error::NoVestedAmount)?;

        let vested = vested_at(&env, &config, &schedule, env.ledger().timestamp())?;
        let payout = vested - schedule.claimed_amount;
        if payout <= 0 {
            return Err(Error::NoVestedAmount);
        }
        schedule.claimed_amount = vested;
        storage::set_vesting(&env, &claimant, &schedule);
        storage::set_committed(&env, storage::get_committed(&env) - payout);

        let token = TokenClient::new(&env, &config.token);
        token.transfer(&env.current_contract_address(), &claimant, &payout);

        env.events()
            .publish((AIRDROP_VESTED, claimant), (payout, schedule.claimed_amount));
        Ok(payout)
    }

    /// Send tokens nobody claimed to `to`. Admin only, after the deadline.
    ///
    /// # Errors
    /// * `Unauthorized` - `admin` is not the airdrop admin
    /// * `ClaimNotEnded` - the deadline has not passed
    /// * `InvInput` - `amount` is not positive
    /// * `InsufficientUnclaimed` - `amount` would dip into tokens owed to claimants
    pub fn withdraw_unclaimed(env: Env, admin: Address, to: Address, amount: Amount) -> Result<(), Error> {
        if storage::get_admin(&env)? != admin {
            return Err(Error::Unauthorized);
        }
        admin.require_auth();

        let config = storage::get_config(&env)?;
        if env.ledger().timestamp() <= config.deadline {
            return Err(Error::ClaimNotEnded);
        }
        if amount <= 0 {
            return Err(Error::InvInput);
        }

        let token = TokenClient::new(&env, &config.token);
        let unclaimed = token.balance(&env.current_contract_address()) - storage::get_committed(&env);
        if amount > unclaimed {
            return Err(Error::InsufficientUnclaimed);
        }
        token.transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish((AIRDROP_SWEPT, to), amount);
        Ok(())
    }

    pub fn config(env: Env) -> Result<AirdropConfig, Error> {
        storage::get_config(&env)
    }

    pub fn vesting(env: Env, claimant: Address) -> Option<VestingSchedule> {
        storage::get_vesting(&env, &claimant)
    }

    /// Amount `claimant` could withdraw with `claim_vested_airdrop` right now
    pub fn vested_claimable(env: Env, claimant: Address) -> Result<Amount, Error> {
        let config = storage::get_config(&env)?;
        let Some(schedule) = storage::get_vesting(&env, &claimant) else {
            return Ok(0);
        };
        let vested = vested_at(&env, &config, &schedule, env.ledger().timestamp())?;
        Ok(vested - schedule.claimed_amount)
    }

    /// Claimed amounts still owed to claimants
    pub fn committed(env: Env) -> Amount {
        storage::get_committed(&env)
    }

    pub fn claims_count(env: Env) -> u32 {
        storage::get_claims_count(&env)
    }

    pub fn has_claimed(env: Env, claimant: Address) -> bool {
        storage::get_vesting(&env, &claimant).is_some()
    }
}
