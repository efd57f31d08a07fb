use crate::types::{FeeBreakdown, FeeConfig};
use shared::{constants::UNIT, errors::Error, math::mul_div_floor, types::Amount};
use soroban_sdk::Env;

impl FeeBreakdown {
    pub fn total(&self) -> Result<Amount, Error> {
        self.protocol_fee
            .checked_add(self.creator_fee)
            .and_then(|v| v.checked_add(self.holder_fee))
            .and_then(|v| v.checked_add(self.lp_farming_fee))
            .ok_or(Error::Overflow)
    }
}

/// Splits a trade's gross price, each fee truncated independently.
pub fn compute_fees(env: &Env, price: Amount, config: &FeeConfig) -> Result<FeeBreakdown, Error> {
    if price == 0 {
        return Ok(FeeBreakdown::default());
    }
    Ok(FeeBreakdown {
        protocol_fee: mul_div_floor(env, price, config.protocol_fee_percent, UNIT)?,
        creator_fee: mul_div_floor(env, price, config.creator_fee_percent, UNIT)?,
        holder_fee: mul_div_floor(env, price, config.holder_fee_percent, UNIT)?,
        lp_farming_fee: mul_div_floor(env, price, config.lp_farming_fee_percent, UNIT)?,
    })
}

/// Amount a buyer pays: price plus every fee.
pub fn buy_total(price: Amount, fees: &FeeBreakdown) -> Result<Amount, Error> {
    price.checked_add(fees.total()?).ok_or(Error::Overflow)
}

/// Amount a seller receives: price minus every fee.
pub fn sell_proceeds(price: Amount, fees: &FeeBreakdown) -> Result<Amount, Error> {
    // percents sum below UNIT, so floored fees never exceed the price
    price.checked_sub(fees.total()?).ok_or(Error::Overflow)
}

/// Each percent must lie in `[0, UNIT)` and so must their sum.
pub fn validate_config(config: &FeeConfig) -> Result<(), Error> {
    let percents = [
        config.protocol_fee_percent,
        config.creator_fee_percent,
        config.holder_fee_percent,
        config.lp_farming_fee_percent,
    ];

    let mut sum: Amount = 0;
    for percent in percents {
        if !(0..UNIT).contains(&percent) {
            return Err(Error::InvalidParams);
        }
        sum = sum.checked_add(percent).ok_or(Error::InvalidParams)?;
    }
    if sum >= UNIT {
        return Err(Error::InvalidParams);
    }

    if config.create_shares_eth_fee < 0 {
        return Err(Error::InvalidParams);
    }
    Ok(())
}
