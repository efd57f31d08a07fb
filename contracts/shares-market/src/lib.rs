#![no_std]

//! Subject shares market: one bonding-curve market per 32-byte subject, with
//! every trade's fees split between the protocol, the subject's creator, an
//! LP-farming sink and the subject's current holders.

use shared::{
    errors::Error,
    events::{OWNER_CHANGED, REWARD_WITHDRAWN, SHARES_CREATED, SHARES_TRADED},
    types::{Amount, Subject},
};
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token::TokenClient, Address, Env, Vec, U256,
};

mod admin;
mod curve;
mod fees;
mod ledger;
mod rewards;
mod storage;
mod trade;
mod types;

#[cfg(test)]
mod tests;

pub use types::*;

#[contract]
pub struct SharesMarket;

#[contractimpl]
impl SharesMarket {
    /// Initialize the market
    ///
    /// All fee percents start at 0 and every fee destination starts at the owner.
    ///
    /// # Arguments
    /// * `owner` - Address allowed to change the fee configuration
    /// * `token` - Settlement token for trades and rewards
    /// * `native_token` - Token charged for the flat creation fee
    pub fn initialize(env: Env, owner: Address, token: Address, native_token: Address) -> Result<(), Error> {
        if storage::has_owner(&env) {
            return Err(Error::AlreadyInit);
        }
        owner.require_auth();

        storage::set_owner(&env, &owner);
        storage::set_token(&env, &token);
        storage::set_native_token(&env, &native_token);
        storage::set_fee_config(
            &env,
            &FeeConfig {
                protocol_fee_percent: 0,
                creator_fee_percent: 0,
                holder_fee_percent: 0,
                lp_farming_fee_percent: 0,
                protocol_fee_destination: owner.clone(),
                dev_fund_destination: owner.clone(),
                lp_farming_address: owner.clone(),
                create_shares_eth_fee: 0,
            },
        );

        env.events().publish((OWNER_CHANGED,), owner);
        Ok(())
    }

    // ---------- Admin ----------

    /// Hand the market over to `new_owner`. Owner only.
    pub fn transfer_ownership(env: Env, owner: Address, new_owner: Address) -> Result<(), Error> {
        admin::require_owner(&env, &owner)?;
        storage::set_owner(&env, &new_owner);
        env.events().publish((OWNER_CHANGED,), new_owner);
        Ok(())
    }

    /// Set the protocol fee percent (parts per 1e18). Owner only.
    ///
    /// # Errors
    /// * `Unauthorized` - `owner` is not the market owner
    /// * `InvalidParams` - percent out of `[0, 1e18)` or all percents sum to 1e18 or more
    pub fn set_protocol_fee_percent(env: Env, owner: Address, percent: Amount) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("protocol"), |c| {
            c.protocol_fee_percent = percent
        })?;
        Ok(())
    }

    /// Set the creator fee percent (parts per 1e18). Owner only.
    pub fn set_creator_fee_percent(env: Env, owner: Address, percent: Amount) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("creator"), |c| {
            c.creator_fee_percent = percent
        })?;
        Ok(())
    }

    /// Set the holder fee percent (parts per 1e18). Owner only.
    pub fn set_holder_fee_percent(env: Env, owner: Address, percent: Amount) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("holder"), |c| {
            c.holder_fee_percent = percent
        })?;
        Ok(())
    }

    /// Set the LP farming fee percent (parts per 1e18). Owner only.
    pub fn set_lp_farming_fee_percent(env: Env, owner: Address, percent: Amount) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("lp_farm"), |c| {
            c.lp_farming_fee_percent = percent
        })?;
        Ok(())
    }

    /// Set where protocol fees are sent. Owner only.
    pub fn set_protocol_fee_destination(env: Env, owner: Address, destination: Address) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("proto_dst"), |c| {
            c.protocol_fee_destination = destination
        })?;
        Ok(())
    }

    /// Set where creation fees are sent. Owner only.
    ///
    /// The destination is only checked when a creation fee is collected.
    pub fn set_dev_fund_destination(env: Env, owner: Address, destination: Address) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("dev_fund"), |c| {
            c.dev_fund_destination = destination
        })?;
        Ok(())
    }

    /// Set where LP farming fees are sent. Owner only.
    pub fn set_lp_farming_address(env: Env, owner: Address, destination: Address) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("lp_addr"), |c| {
            c.lp_farming_address = destination
        })?;
        Ok(())
    }

    /// Set the flat native-token fee for opening a subject. Owner only.
    pub fn set_create_shares_eth_fee(env: Env, owner: Address, fee: Amount) -> Result<(), Error> {
        admin::update_fee_config(&env, &owner, symbol_short!("eth_fee"), |c| {
            c.create_shares_eth_fee = fee
        })?;
        Ok(())
    }

    // ---------- Trading ----------

    /// Open a market for `subject`, minting its first unit to `creator`
    ///
    /// # Arguments
    /// * `creator` - Address opening the subject
    /// * `subject` - 32-byte subject identifier
    /// * `decline_ratio` - Curve parameter, must divide 1e18
    /// * `max_eth_fee` - Most native token the creator is willing to pay
    ///
    /// # Errors
    /// * `ShareCreated` - subject already exists
    /// * `InvalidDeclineRatio` - ratio is 0 or does not divide 1e18
    /// * `InsufficientEth` - `max_eth_fee` is below the creation fee
    /// * `UnableSendDevFund` - the dev fund destination is this market
    pub fn create_shares(
        env: Env,
        creator: Address,
        subject: Subject,
        decline_ratio: u64,
        max_eth_fee: Amount,
    ) -> Result<TradeRecord, Error> {
        creator.require_auth();

        if storage::subject_exists(&env, &subject) {
            return Err(Error::ShareCreated);
        }
        curve::validate_decline_ratio(decline_ratio)?;

        let config = storage::get_fee_config(&env)?;
        let eth_fee = config.create_shares_eth_fee;
        if eth_fee > 0 {
            if max_eth_fee < eth_fee {
                return Err(Error::InsufficientEth);
            }
            if config.dev_fund_destination == env.current_contract_address() {
                return Err(Error::UnableSendDevFund);
            }
        }
        let native = TokenClient::new(&env, &storage::get_native_token(&env)?);

        let info = ledger::open_subject(&env, &subject, &creator, decline_ratio);

        env.events().publish(
            (SHARES_CREATED, subject.clone()),
            CreateRecord {
                creator: creator.clone(),
                subject: subject.clone(),
                decline_ratio,
                eth_fee,
            },
        );
        let trade = TradeRecord {
            trader: creator.clone(),
            recipient: creator.clone(),
            subject: subject.clone(),
            is_buy: true,
            shares: info.supply,
            price: 0,
            protocol_fee: 0,
            creator_fee: 0,
            holder_fee: 0,
            lp_farming_fee: 0,
            supply: info.supply,
        };
        env.events()
            .publish((SHARES_TRADED, subject), trade.clone());

        if eth_fee > 0 {
            native.transfer(&creator, &config.dev_fund_destination, &eth_fee);
        }
        Ok(trade)
    }

    /// Buy `amount` units of `subject` for `recipient`, paid by `buyer`
    ///
    /// Zero units is a valid trade: nothing moves but a record is still emitted.
    ///
    /// # Errors
    /// * `Address0` - recipient is the zero account
    /// * `ShareNotExists` - subject was never created
    /// * `InAmountNotEnough` - price plus fees exceeds `max_in_amount`
    pub fn buy_shares(
        env: Env,
        buyer: Address,
        recipient: Address,
        subject: Subject,
        amount: u64,
        max_in_amount: Amount,
    ) -> Result<TradeRecord, Error> {
        buyer.require_auth();
        trade::buy(&env, &buyer, &recipient, &subject, amount, max_in_amount)
    }

    /// Sell `amount` of `seller`'s units of `subject`, paying proceeds to `recipient`
    ///
    /// # Errors
    /// * `Address0` - recipient is the zero account
    /// * `ShareNotExists` - subject was never created
    /// * `CannotSellLastShare` - the sale would take supply to 0
    /// * `InsufficientShares` - seller holds fewer than `amount` units
    /// * `OutAmountNotEnough` - proceeds after fees are below `min_out_amount`
    pub fn sell_shares(
        env: Env,
        seller: Address,
        recipient: Address,
        subject: Subject,
        amount: u64,
        min_out_amount: Amount,
    ) -> Result<TradeRecord, Error> {
        seller.require_auth();
        trade::sell(&env, &seller, &recipient, &subject, amount, min_out_amount)
    }

    /// Pay out `holder`'s accrued holder-fee reward in `subject`
    ///
    /// # Errors
    /// * `NoRewards` - nothing has accrued since the last withdrawal
    pub fn withdraw_reward(env: Env, holder: Address, subject: Subject) -> Result<Amount, Error> {
        holder.require_auth();

        let info = storage::find_subject(&env, &subject).ok_or(Error::NoRewards)?;
        let token = TokenClient::new(&env, &storage::get_token(&env)?);

        let mut position = storage::get_position(&env, &subject, &holder);
        rewards::settle(&env, &mut position, &info.reward_per_share_stored)?;
        let reward = position.pending_reward;
        if reward == 0 {
            return Err(Error::NoRewards);
        }
        position.pending_reward = 0;
        storage::set_position(&env, &subject, &holder, &position);

        token.transfer(&env.current_contract_address(), &holder, &reward);

        log!(&env, "reward withdrawn", subject.clone(), reward);
        env.events()
            .publish((REWARD_WITHDRAWN, subject), (holder, reward));
        Ok(reward)
    }

    // ---------- Queries ----------

    pub fn owner(env: Env) -> Result<Address, Error> {
        storage::get_owner(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    pub fn native_token(env: Env) -> Result<Address, Error> {
        storage::get_native_token(&env)
    }

    pub fn fee_config(env: Env) -> Result<FeeConfig, Error> {
        storage::get_fee_config(&env)
    }

    /// Curve price of `amount` units following `supply`
    pub fn get_price(_env: Env, supply: u64, amount: u64, decline_ratio: u64) -> Result<Amount, Error> {
        curve::price(supply, amount, decline_ratio)
    }

    pub fn get_buy_price(env: Env, subject: Subject, amount: u64) -> Result<Amount, Error> {
        curve::buy_price(&storage::get_subject(&env, &subject)?, amount)
    }

    pub fn get_sell_price(env: Env, subject: Subject, amount: u64) -> Result<Amount, Error> {
        curve::sell_price(&storage::get_subject(&env, &subject)?, amount)
    }

    /// Price plus all fees at the current configuration
    pub fn get_buy_price_with_fees(env: Env, subject: Subject, amount: u64) -> Result<Amount, Error> {
        let price = Self::get_buy_price(env.clone(), subject, amount)?;
        let fees = fees::compute_fees(&env, price, &storage::get_fee_config(&env)?)?;
        fees::buy_total(price, &fees)
    }

    /// Price minus all fees at the current configuration
    pub fn get_sell_price_with_fees(env: Env, subject: Subject, amount: u64) -> Result<Amount, Error> {
        let price = Self::get_sell_price(env.clone(), subject, amount)?;
        let fees = fees::compute_fees(&env, price, &storage::get_fee_config(&env)?)?;
        fees::sell_proceeds(price, &fees)
    }

    /// Fee split of a trade whose curve price is `price`
    pub fn compute_fees(env: Env, price: Amount) -> Result<FeeBreakdown, Error> {
        if price < 0 {
            return Err(Error::InvInput);
        }
        fees::compute_fees(&env, price, &storage::get_fee_config(&env)?)
    }

    /// Units in circulation, 0 for an unknown subject
    pub fn shares_supply(env: Env, subject: Subject) -> u64 {
        storage::find_subject(&env, &subject).map_or(0, |info| info.supply)
    }

    /// Units of `subject` held by `holder`, 0 when absent
    pub fn shares_balance(env: Env, subject: Subject, holder: Address) -> u64 {
        storage::get_position(&env, &subject, &holder).balance
    }

    pub fn subject_creator(env: Env, subject: Subject) -> Option<Address> {
        storage::find_subject(&env, &subject).map(|info| info.creator)
    }

    pub fn get_subject(env: Env, subject: Subject) -> Result<SubjectInfo, Error> {
        storage::get_subject(&env, &subject)
    }

    pub fn reward_per_share_stored(env: Env, subject: Subject) -> U256 {
        storage::find_subject(&env, &subject)
            .map(|info| info.reward_per_share_stored)
            .unwrap_or_else(|| U256::from_u32(&env, 0))
    }

    /// Raw position with its checkpoint, without settling
    pub fn holder_position(env: Env, subject: Subject, holder: Address) -> HolderPosition {
        storage::get_position(&env, &subject, &holder)
    }

    /// Reward `holder` could withdraw from `subject` right now
    pub fn get_reward(env: Env, subject: Subject, holder: Address) -> Result<Amount, Error> {
        let Some(info) = storage::find_subject(&env, &subject) else {
            return Ok(0);
        };
        let position = storage::get_position(&env, &subject, &holder);
        rewards::claimable(&env, &position, &info.reward_per_share_stored)
    }

    /// Units held and withdrawable reward of `holder` for each of `subjects`
    pub fn get_shares_and_earnings(
        env: Env,
        holder: Address,
        subjects: Vec<Subject>,
    ) -> Result<Vec<SubjectHolding>, Error> {
        let mut holdings = Vec::new(&env);
        for subject in subjects.iter() {
            let shares = Self::shares_balance(env.clone(), subject.clone(), holder.clone());
            let earnings = Self::get_reward(env.clone(), subject.clone(), holder.clone())?;
            holdings.push_back(SubjectHolding {
                subject,
                shares,
                earnings,
            });
        }
        Ok(holdings)
    }
}
