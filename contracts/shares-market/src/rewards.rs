//! # Holder-fee reward accumulator
//!
//! Each subject keeps a monotonically increasing `reward_per_share_stored`
//! (scaled by `PRECISION`). A trade's holder fee raises it by
//! `holder_fee · PRECISION / supply`, where `supply` is the supply *before*
//! the trade changes any balance. Every position carries the accumulator value
//! it was last settled against, so a holder's unsettled reward is
//!
//! ```text
//! balance · (stored - paid) / PRECISION
//! ```
//!
//! and distribution costs O(1) per trade regardless of the number of holders.
//!
//! On every balance change the ledger must call, in order:
//! 1. [`accrue`] with the trade's holder fee (pre-trade supply),
//! 2. [`settle`] on the position whose balance changes (pre-trade balance),
//! 3. the balance/supply mutation itself.
//!
//! Units minted by a trade are therefore not paid from that trade's own fee,
//! while the units the trader already held are.

use crate::types::{HolderPosition, SubjectInfo};
use shared::{constants::PRECISION, errors::Error, types::Amount};
use soroban_sdk::{Env, U256};

fn to_amount(value: U256) -> Result<Amount, Error> {
    value
        .to_u128()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or(Error::Overflow)
}

/// Adds a holder fee to the subject's accumulator.
pub fn accrue(env: &Env, info: &mut SubjectInfo, holder_fee: Amount) -> Result<(), Error> {
    if holder_fee < 0 {
        return Err(Error::InvInput);
    }
    if holder_fee == 0 {
        return Ok(());
    }
    if info.supply == 0 {
        return Err(Error::ShareNotExists);
    }

    let increment = U256::from_u128(env, holder_fee as u128)
        .mul(&U256::from_u128(env, PRECISION))
        .div(&U256::from_u128(env, info.supply as u128));
    info.reward_per_share_stored = info.reward_per_share_stored.add(&increment);
    Ok(())
}

/// Reward accrued since the position's checkpoint.
pub fn earned(env: &Env, position: &HolderPosition, stored: &U256) -> Result<Amount, Error> {
    if position.balance == 0 {
        return Ok(0);
    }
    let delta = stored.sub(&position.reward_per_share_paid);
    let owed = U256::from_u128(env, position.balance as u128)
        .mul(&delta)
        .div(&U256::from_u128(env, PRECISION));
    to_amount(owed)
}

/// Moves newly accrued reward into `pending_reward` and checkpoints the position.
pub fn settle(env: &Env, position: &mut HolderPosition, stored: &U256) -> Result<(), Error> {
    let accrued = earned(env, position, stored)?;
    position.pending_reward = position
        .pending_reward
        .checked_add(accrued)
        .ok_or(Error::Overflow)?;
    position.reward_per_share_paid = stored.clone();
    Ok(())
}

/// Claimable reward without touching state.
pub fn claimable(env: &Env, position: &HolderPosition, stored: &U256) -> Result<Amount, Error> {
    position
        .pending_reward
        .checked_add(earned(env, position, stored)?)
        .ok_or(Error::Overflow)
}
