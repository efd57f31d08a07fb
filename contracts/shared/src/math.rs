use crate::{errors::Error, types::Amount};
use soroban_sdk::{Env, U256};

/// `floor(a * b / denominator)` with a 256-bit intermediate product.
///
/// Operands must be non-negative and the denominator positive; a quotient
/// that does not fit back into `i128` is reported as `Overflow`.
pub fn mul_div_floor(env: &Env, a: Amount, b: Amount, denominator: Amount) -> Result<Amount, Error> {
    if a < 0 || b < 0 || denominator <= 0 {
        return Err(Error::InvInput);
    }
    if a == 0 || b == 0 {
        return Ok(0);
    }

    let product = U256::from_u128(env, a as u128).mul(&U256::from_u128(env, b as u128));
    let quotient = product.div(&U256::from_u128(env, denominator as u128));

    quotient
        .to_u128()
        .and_then(|q| i128::try_from(q).ok())
        .ok_or(Error::Overflow)
}
