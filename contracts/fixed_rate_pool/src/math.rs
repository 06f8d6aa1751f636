use crate::error::Error;
use crate::storage::{Surplus, PRECISION};

/// a * b / c, rounded down
pub fn mul_div(a: i128, b: i128, c: i128) -> Result<i128, Error> {
    if c == 0 {
        return Err(Error::DivisionByZero);
    }

    a.checked_mul(b)
        .ok_or(Error::MathOverflow)?
        .checked_div(c)
        .ok_or(Error::MathOverflow)
}

/// a * b / c, rounded up (non-negative operands)
pub fn mul_div_up(a: i128, b: i128, c: i128) -> Result<i128, Error> {
    if c == 0 {
        return Err(Error::DivisionByZero);
    }

    a.checked_mul(b)
        .ok_or(Error::MathOverflow)?
        .checked_add(c - 1)
        .ok_or(Error::MathOverflow)?
        .checked_div(c)
        .ok_or(Error::MathOverflow)
}

pub fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::MathOverflow)
}

pub fn sub(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_sub(b).ok_or(Error::MathOverflow)
}

/// Slice of `total` matching `amount` out of `supply`. Taking the whole
/// supply returns `total` exactly so no dust is left behind.
pub fn pro_rata(total: i128, amount: i128, supply: i128) -> Result<i128, Error> {
    if amount == supply {
        return Ok(total);
    }
    mul_div(total, amount, supply)
}

/// Venue shares worth `amount` at `index`
pub fn to_scaled(amount: i128, index: i128) -> Result<i128, Error> {
    mul_div(amount, PRECISION, index)
}

pub fn to_scaled_up(amount: i128, index: i128) -> Result<i128, Error> {
    mul_div_up(amount, PRECISION, index)
}

/// Value of `scaled` venue shares at `index`
pub fn from_scaled(scaled: i128, index: i128) -> Result<i128, Error> {
    mul_div(scaled, index, PRECISION)
}

/// Yield earned by `funded_virtual_amount` since `recorded_index`
///
/// Formula: interest = funded * (index - recorded) / recorded
/// A flat or falling index earns nothing.
pub fn funder_interest(
    funded_virtual_amount: i128,
    recorded_index: i128,
    index: i128,
) -> Result<i128, Error> {
    if funded_virtual_amount == 0 || index <= recorded_index {
        return Ok(0);
    }
    mul_div(funded_virtual_amount, index - recorded_index, recorded_index)
}

/// Contribution of one funding to `funded_virtual_index_sum`
pub fn index_weight(funded_virtual_amount: i128, recorded_index: i128) -> Result<i128, Error> {
    mul_div(funded_virtual_amount, PRECISION, recorded_index)
}

/// Refund owed to funders when a funded slice leaves before maturity:
/// the yield they expected on it for the rest of the term, but never more
/// than the principal they put behind it.
///
/// Formula: refund = min(funded_slice * rate * remaining, principal_share)
pub fn early_refund(
    funded_slice: i128,
    rate: i128,
    remaining: u64,
    principal_share: i128,
) -> Result<i128, Error> {
    let rate_over_period = rate
        .checked_mul(remaining as i128)
        .ok_or(Error::MathOverflow)?;
    let lost_interest = mul_div(funded_slice, rate_over_period, PRECISION)?;

    Ok(lost_interest.min(principal_share).max(0))
}

impl Surplus {
    pub fn between(value: i128, liability: i128) -> Result<Surplus, Error> {
        if value >= liability {
            Ok(Surplus {
                is_negative: false,
                amount: sub(value, liability)?,
            })
        } else {
            Ok(Surplus {
                is_negative: true,
                amount: sub(liability, value)?,
            })
        }
    }

    /// Shortfall, or zero when there is none
    pub fn deficit(&self) -> i128 {
        if self.is_negative {
            self.amount
        } else {
            0
        }
    }
}
