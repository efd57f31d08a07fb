//! # Quadratic bonding curve
//!
//! The unit that takes supply from `s` to `s + 1` costs
//!
//! ```text
//! s² · UNIT / decline_ratio
//! ```
//!
//! so the unit minted when a subject is opened (0 → 1) is free and the first
//! unit bought after it (1 → 2) costs `UNIT / decline_ratio`. A range of units
//! is priced with the sum-of-squares closed form
//! `S(n) = n(n + 1)(2n + 1) / 6`, which matches the unit-by-unit sum exactly
//! because `decline_ratio` must divide `UNIT`.

use crate::types::SubjectInfo;
use shared::{constants::UNIT, errors::Error, types::Amount};

/// Rejects ratios that are zero or do not divide `UNIT`.
pub fn validate_decline_ratio(decline_ratio: u64) -> Result<(), Error> {
    if decline_ratio == 0 || UNIT % (decline_ratio as i128) != 0 {
        return Err(Error::InvalidDeclineRatio);
    }
    Ok(())
}

/// `1² + 2² + … + n²`
fn sum_of_squares(n: u64) -> Result<i128, Error> {
    let n = n as i128;
    n.checked_mul(n + 1)
        .and_then(|v| v.checked_mul(2 * n + 1))
        .map(|v| v / 6)
        .ok_or(Error::Overflow)
}

/// Cost of the `amount` units following `supply`.
///
/// # Errors
/// * `InvalidRange` - `amount` is 0, or more than the creation unit is priced
///   from an empty subject
/// * `InvalidDeclineRatio` - see [`validate_decline_ratio`]
/// * `Overflow` - the range is too large to price
pub fn price(supply: u64, amount: u64, decline_ratio: u64) -> Result<Amount, Error> {
    if amount == 0 || (supply == 0 && amount > 1) {
        return Err(Error::InvalidRange);
    }
    validate_decline_ratio(decline_ratio)?;

    let last = supply.checked_add(amount - 1).ok_or(Error::Overflow)?;
    let upper = sum_of_squares(last)?;
    let lower = match supply {
        0 => 0,
        s => sum_of_squares(s - 1)?,
    };

    let unit_price = UNIT / decline_ratio as i128;
    (upper - lower)
        .checked_mul(unit_price)
        .ok_or(Error::Overflow)
}

/// Curve cost of a trade; a zero-unit trade is free.
pub fn trade_price(supply: u64, amount: u64, decline_ratio: u64) -> Result<Amount, Error> {
    if amount == 0 {
        return Ok(0);
    }
    price(supply, amount, decline_ratio)
}

/// Price of buying `amount` units at the subject's current supply.
pub fn buy_price(info: &SubjectInfo, amount: u64) -> Result<Amount, Error> {
    price(info.supply, amount, info.decline_ratio)
}

/// Price of the top `amount` units of the subject's current supply.
pub fn sell_price(info: &SubjectInfo, amount: u64) -> Result<Amount, Error> {
    let from = info.supply.checked_sub(amount).ok_or(Error::InvalidRange)?;
    price(from, amount, info.decline_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATIO: u64 = 16_000;

    fn iterative_price(supply: u64, amount: u64, decline_ratio: u64) -> Amount {
        (supply..supply + amount)
            .map(|i| (i as i128) * (i as i128) * UNIT / decline_ratio as i128)
            .sum()
    }

    #[test]
    fn test_first_unit_is_free() {
        assert_eq!(price(0, 1, RATIO), Ok(0));
    }

    #[test]
    fn test_single_unit_price() {
        assert_eq!(price(1, 1, RATIO), Ok(UNIT / 16_000));
        assert_eq!(price(3, 1, RATIO), Ok(9 * UNIT / 16_000));
    }

    #[test]
    fn test_multi_unit_price() {
        // units 1 and 2
        assert_eq!(price(1, 2, RATIO), Ok(5 * UNIT / 16_000));
    }

    #[test]
    fn test_closed_form_matches_iterative_sum() {
        for ratio in [1u64, 2, 16_000, 1_000_000_000_000_000_000] {
            assert_eq!(price(0, 1, ratio), Ok(iterative_price(0, 1, ratio)));
            for supply in 1..40u64 {
                for amount in 1..25u64 {
                    assert_eq!(
                        price(supply, amount, ratio),
                        Ok(iterative_price(supply, amount, ratio))
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_range_rejected() {
        assert_eq!(price(5, 0, RATIO), Err(Error::InvalidRange));
        assert_eq!(price(0, 2, RATIO), Err(Error::InvalidRange));
    }

    #[test]
    fn test_trade_price_of_zero_units() {
        assert_eq!(trade_price(5, 0, RATIO), Ok(0));
    }

    #[test]
    fn test_decline_ratio_validation() {
        assert_eq!(price(1, 1, 0), Err(Error::InvalidDeclineRatio));
        assert_eq!(price(1, 1, 3), Err(Error::InvalidDeclineRatio));
        assert_eq!(validate_decline_ratio(RATIO), Ok(()));
    }

    #[test]
    fn test_price_is_monotonic_in_supply() {
        let mut previous = 0;
        for supply in 1..200u64 {
            let next = price(supply, 1, RATIO).unwrap();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_overflow_reported() {
        assert_eq!(price(u64::MAX, 2, 1), Err(Error::Overflow));
    }
}
