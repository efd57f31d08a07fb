use crate::{
    rewards, storage,
    types::{HolderPosition, SubjectInfo},
};
use shared::{
    constants::{CREATOR_INITIAL_SHARES, ZERO_ACCOUNT},
    errors::Error,
    types::{Amount, Subject},
};
use soroban_sdk::{Address, Env, String, U256};

/// Direction of a balance change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BalanceChange {
    Credit(u64),
    Debit(u64),
}

/// Rejects the all-zero account as a recipient.
pub fn ensure_recipient(env: &Env, recipient: &Address) -> Result<(), Error> {
    let zero = Address::from_string(&String::from_str(env, ZERO_ACCOUNT));
    if *recipient == zero {
        return Err(Error::Address0);
    }
    Ok(())
}

/// Writes a new subject holding the creator's first unit.
///
/// The caller has already rejected an existing `subject`.
pub fn open_subject(env: &Env, subject: &Subject, creator: &Address, decline_ratio: u64) -> SubjectInfo {
    let info = SubjectInfo {
        creator: creator.clone(),
        supply: CREATOR_INITIAL_SHARES,
        decline_ratio,
        reward_per_share_stored: U256::from_u32(env, 0),
    };
    let position = HolderPosition {
        balance: CREATOR_INITIAL_SHARES,
        ..HolderPosition::empty(env)
    };

    storage::set_subject(env, subject, &info);
    storage::set_position(env, subject, creator, &position);
    info
}

/// Books a trade against `holder`'s position.
///
/// The holder fee is accrued against the supply before the trade, the
/// position is settled with its balance before the trade, and only then are
/// balance and supply changed.
pub fn commit_trade(
    env: &Env,
    subject: &Subject,
    info: &mut SubjectInfo,
    holder: &Address,
    holder_fee: Amount,
    change: BalanceChange,
) -> Result<HolderPosition, Error> {
    rewards::accrue(env, info, holder_fee)?;

    let mut position = storage::get_position(env, subject, holder);
    rewards::settle(env, &mut position, &info.reward_per_share_stored)?;

    match change {
        BalanceChange::Credit(units) => {
            position.balance = position.balance.checked_add(units).ok_or(Error::Overflow)?;
            info.supply = info.supply.checked_add(units).ok_or(Error::Overflow)?;
        }
        BalanceChange::Debit(units) => {
            position.balance = position
                .balance
                .checked_sub(units)
                .ok_or(Error::InsufficientShares)?;
            info.supply = info
                .supply
                .checked_sub(units)
                .filter(|supply| *supply > 0)
                .ok_or(Error::CannotSellLastShare)?;
        }
    }

    storage::set_position(env, subject, holder, &position);
    storage::set_subject(env, subject, info);
    Ok(position)
}
