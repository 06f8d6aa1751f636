use crate::error::Error;
use crate::storage::{
    read_dividend_per_unit, read_dividend_tokens, read_holder_dividend, write_dividend_per_unit,
    write_dividend_tokens, write_holder_dividend, HolderDividend, PRECISION,
};
use soroban_sdk::{Address, Env};

/// Dividend earned since the holder's last checkpoint
/// Formula: pending = balance * (dividend_per_unit - dividend_debt) / PRECISION
pub fn calculate_pending(
    balance: i128,
    dividend_per_unit: i128,
    dividend_debt: i128,
) -> Result<i128, Error> {
    if balance == 0 {
        return Ok(0);
    }

    let diff = dividend_per_unit
        .checked_sub(dividend_debt)
        .ok_or(Error::MathOverflow)?;

    balance
        .checked_mul(diff)
        .ok_or(Error::MathOverflow)?
        .checked_div(PRECISION)
        .ok_or(Error::MathOverflow)
}

/// Increase of the cumulative dividend per unit for an injection
/// Formula: delta = amount * PRECISION / total_supply
pub fn calculate_per_unit_increase(amount: i128, total_supply: i128) -> Result<i128, Error> {
    if total_supply <= 0 {
        return Err(Error::NoSupply);
    }

    amount
        .checked_mul(PRECISION)
        .ok_or(Error::MathOverflow)?
        .checked_div(total_supply)
        .ok_or(Error::MathOverflow)
}

/// Credit everything `holder` earned on `balance` across every dividend
/// token of the funding. Must run before the holder's balance changes.
pub fn settle_holder(
    env: &Env,
    funding_id: u64,
    holder: &Address,
    balance: i128,
) -> Result<(), Error> {
    for token in read_dividend_tokens(env, funding_id).iter() {
        settle_holder_token(env, funding_id, holder, &token, balance)?;
    }
    Ok(())
}

pub fn settle_holder_token(
    env: &Env,
    funding_id: u64,
    holder: &Address,
    token: &Address,
    balance: i128,
) -> Result<HolderDividend, Error> {
    let per_unit = read_dividend_per_unit(env, funding_id, token);
    let mut position = read_holder_dividend(env, funding_id, holder, token);

    let pending = calculate_pending(balance, per_unit, position.dividend_debt)?;
    position.unclaimed = position
        .unclaimed
        .checked_add(pending)
        .ok_or(Error::MathOverflow)?;
    position.dividend_debt = per_unit;

    write_holder_dividend(env, funding_id, holder, token, &position);
    Ok(position)
}

/// Spread `amount` of `token` over the current supply of `funding_id`
pub fn distribute(
    env: &Env,
    funding_id: u64,
    token: &Address,
    amount: i128,
    total_supply: i128,
) -> Result<i128, Error> {
    let increase = calculate_per_unit_increase(amount, total_supply)?;

    let mut tokens = read_dividend_tokens(env, funding_id);
    if !tokens.contains(token) {
        tokens.push_back(token.clone());
        write_dividend_tokens(env, funding_id, &tokens);
    }

    let per_unit = read_dividend_per_unit(env, funding_id, token)
        .checked_add(increase)
        .ok_or(Error::MathOverflow)?;
    write_dividend_per_unit(env, funding_id, token, per_unit);

    Ok(per_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: i128 = 10_000_000;

    #[test]
    fn test_pending_zero_balance() {
        assert_eq!(calculate_pending(0, PRECISION, 0).unwrap(), 0);
    }

    #[test]
    fn test_pending_after_injection() {
        // 100 units, 10 tokens injected over 1000 units of supply
        let per_unit = calculate_per_unit_increase(10 * SCALE, 1000 * SCALE).unwrap();
        let pending = calculate_pending(100 * SCALE, per_unit, 0).unwrap();

        assert_eq!(pending, SCALE);
    }

    #[test]
    fn test_pending_respects_debt() {
        let per_unit = 2 * PRECISION / 100;
        let debt = PRECISION / 100;

        let pending = calculate_pending(50 * SCALE, per_unit, debt).unwrap();
        assert_eq!(pending, 50 * SCALE / 100);
    }

    #[test]
    fn test_increase_requires_supply() {
        assert_eq!(
            calculate_per_unit_increase(SCALE, 0),
            Err(Error::NoSupply)
        );
    }
}
