use crate::error::Error;
use crate::storage::PRECISION;

/// Value of one share, scaled by PRECISION
///
/// Formula: index = total_value * PRECISION / total_shares
/// An empty vault keeps the last index it had.
pub fn calculate_income_index(
    total_value: i128,
    total_shares: i128,
    last_index: i128,
) -> Result<i128, Error> {
    if total_shares == 0 {
        return Ok(last_index);
    }

    total_value
        .checked_mul(PRECISION)
        .ok_or(Error::MathOverflow)?
        .checked_div(total_shares)
        .ok_or(Error::DivisionByZero)
}

/// Shares minted for a deposit of `amount`
///
/// Formula:
/// - Empty vault: shares = amount * PRECISION / last_index
/// - Otherwise: shares = amount * total_shares / value_before
pub fn calculate_shares_to_mint(
    amount: i128,
    value_before: i128,
    total_shares: i128,
    last_index: i128,
) -> Result<i128, Error> {
    if total_shares == 0 || value_before == 0 {
        return amount
            .checked_mul(PRECISION)
            .ok_or(Error::MathOverflow)?
            .checked_div(last_index)
            .ok_or(Error::DivisionByZero);
    }

    amount
        .checked_mul(total_shares)
        .ok_or(Error::MathOverflow)?
        .checked_div(value_before)
        .ok_or(Error::DivisionByZero)
}

/// Shares burned to release `amount`, rounded up so the index never drops
///
/// Formula: shares = ceil(amount * total_shares / total_value)
pub fn calculate_shares_to_burn(
    amount: i128,
    total_value: i128,
    total_shares: i128,
) -> Result<i128, Error> {
    if total_value <= 0 {
        return Err(Error::InsufficientLiquidity);
    }

    let numerator = amount.checked_mul(total_shares).ok_or(Error::MathOverflow)?;
    let shares = numerator
        .checked_add(total_value - 1)
        .ok_or(Error::MathOverflow)?
        .checked_div(total_value)
        .ok_or(Error::DivisionByZero)?;

    Ok(shares.min(total_shares))
}
