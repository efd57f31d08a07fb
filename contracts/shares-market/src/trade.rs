//! # Trade execution
//!
//! A trade moves through
//! `Quoted → FeesComputed → AccrualUpdated → Settled → LedgerUpdated →
//! ValueTransferred → EventEmitted`. Everything up to `LedgerUpdated` is
//! internal bookkeeping; token transfers come last and a failing transfer
//! traps the invocation, which discards every write made before it.

use crate::{
    curve, fees,
    ledger::{self, BalanceChange},
    storage,
    types::{FeeBreakdown, TradeRecord},
};
use shared::{
    errors::Error,
    events::SHARES_TRADED,
    types::{Amount, Subject},
};
use soroban_sdk::{log, token::TokenClient, Address, Env};

fn pay(token: &TokenClient, from: &Address, to: &Address, amount: Amount) {
    if amount > 0 {
        token.transfer(from, to, &amount);
    }
}

fn record(
    trader: &Address,
    recipient: &Address,
    subject: &Subject,
    is_buy: bool,
    shares: u64,
    price: Amount,
    fees: &FeeBreakdown,
    supply: u64,
) -> TradeRecord {
    TradeRecord {
        trader: trader.clone(),
        recipient: recipient.clone(),
        subject: subject.clone(),
        is_buy,
        shares,
        price,
        protocol_fee: fees.protocol_fee,
        creator_fee: fees.creator_fee,
        holder_fee: fees.holder_fee,
        lp_farming_fee: fees.lp_farming_fee,
        supply,
    }
}

/// `buyer` pays for `amount` units credited to `recipient`.
///
/// # Errors
/// * `Address0` - recipient is the zero account
/// * `ShareNotExists` - subject was never created
/// * `InAmountNotEnough` - price plus fees exceeds `max_in_amount`
pub fn buy(
    env: &Env,
    buyer: &Address,
    recipient: &Address,
    subject: &Subject,
    amount: u64,
    max_in_amount: Amount,
) -> Result<TradeRecord, Error> {
    ledger::ensure_recipient(env, recipient)?;
    let config = storage::get_fee_config(env)?;
    let token = TokenClient::new(env, &storage::get_token(env)?);
    let mut info = storage::get_subject(env, subject)?;

    let price = curve::trade_price(info.supply, amount, info.decline_ratio)?;
    let fees = fees::compute_fees(env, price, &config)?;
    let total_in = fees::buy_total(price, &fees)?;
    if total_in > max_in_amount {
        return Err(Error::InAmountNotEnough);
    }

    ledger::commit_trade(
        env,
        subject,
        &mut info,
        recipient,
        fees.holder_fee,
        BalanceChange::Credit(amount),
    )?;

    let market = env.current_contract_address();
    let escrowed = price.checked_add(fees.holder_fee).ok_or(Error::Overflow)?;
    pay(&token, buyer, &market, escrowed);
    pay(&token, buyer, &config.protocol_fee_destination, fees.protocol_fee);
    pay(&token, buyer, &info.creator, fees.creator_fee);
    pay(&token, buyer, &config.lp_farming_address, fees.lp_farming_fee);

    log!(env, "buy settled", subject.clone(), amount, total_in, info.supply);

    let trade = record(buyer, recipient, subject, true, amount, price, &fees, info.supply);
    env.events()
        .publish((SHARES_TRADED, subject.clone()), trade.clone());
    Ok(trade)
}

/// `seller` sells `amount` units; proceeds go to `recipient`.
///
/// # Errors
/// * `Address0` - recipient is the zero account
/// * `ShareNotExists` - subject was never created
/// * `CannotSellLastShare` - the sale would empty the subject
/// * `InsufficientShares` - seller holds fewer than `amount` units
/// * `OutAmountNotEnough` - proceeds after fees are below `min_out_amount`
pub fn sell(
    env: &Env,
    seller: &Address,
    recipient: &Address,
    subject: &Subject,
    amount: u64,
    min_out_amount: Amount,
) -> Result<TradeRecord, Error> {
    ledger::ensure_recipient(env, recipient)?;
    let config = storage::get_fee_config(env)?;
    let token = TokenClient::new(env, &storage::get_token(env)?);
    let mut info = storage::get_subject(env, subject)?;

    if amount > 0 && info.supply <= amount {
        return Err(Error::CannotSellLastShare);
    }
    if storage::get_position(env, subject, seller).balance < amount {
        return Err(Error::InsufficientShares);
    }

    let price = curve::trade_price(info.supply - amount, amount, info.decline_ratio)?;
    let fees = fees::compute_fees(env, price, &config)?;
    let proceeds = fees::sell_proceeds(price, &fees)?;
    if proceeds < min_out_amount {
        return Err(Error::OutAmountNotEnough);
    }

    ledger::commit_trade(
        env,
        subject,
        &mut info,
        seller,
        fees.holder_fee,
        BalanceChange::Debit(amount),
    )?;

    // the holder fee stays in the market as reward backing
    let market = env.current_contract_address();
    pay(&token, &market, recipient, proceeds);
    pay(&token, &market, &config.protocol_fee_destination, fees.protocol_fee);
    pay(&token, &market, &info.creator, fees.creator_fee);
    pay(&token, &market, &config.lp_farming_address, fees.lp_farming_fee);

    log!(env, "sell settled", subject.clone(), amount, proceeds, info.supply);

    let trade = record(seller, recipient, subject, false, amount, price, &fees, info.supply);
    env.events()
        .publish((SHARES_TRADED, subject.clone()), trade.clone());
    Ok(trade)
}
