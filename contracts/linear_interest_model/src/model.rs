use crate::error::Error;
use crate::storage::{ModelParameters, PRECISION, YEAR_IN_SECONDS};

/// Share of the market rate a deposit of `period` seconds is promised
///
/// Formula: multiplier = max(0, intercept - slope * period / YEAR)
///
/// Example:
/// - intercept: 0.5, slope: 0.25, period: 1 year
/// - multiplier: 0.5 - 0.25 = 0.25
pub fn calculate_multiplier(params: &ModelParameters, period: u64) -> Result<i128, Error> {
    let decay = params
        .multiplier_slope
        .checked_mul(period as i128)
        .ok_or(Error::MathOverflow)?
        .checked_div(YEAR_IN_SECONDS as i128)
        .ok_or(Error::MathOverflow)?;

    Ok((params.multiplier_intercept - decay).max(0))
}

/// Guaranteed gross interest
///
/// Formula: interest = principal * rate * period * multiplier
/// (rate per second and multiplier both scaled by PRECISION)
///
/// Example:
/// - principal: 100, rate: 10% APY, period: 1 year, multiplier: 0.25
/// - interest: 100 * 0.10 * 0.25 = 2.5
pub fn calculate_interest(
    params: &ModelParameters,
    principal: i128,
    period: u64,
    rate: i128,
) -> Result<i128, Error> {
    let multiplier = calculate_multiplier(params, period)?;
    let rate_over_period = rate
        .checked_mul(period as i128)
        .ok_or(Error::MathOverflow)?;

    principal
        .checked_mul(rate_over_period)
        .ok_or(Error::MathOverflow)?
        .checked_div(PRECISION)
        .ok_or(Error::MathOverflow)?
        .checked_mul(multiplier)
        .ok_or(Error::MathOverflow)?
        .checked_div(PRECISION)
        .ok_or(Error::MathOverflow)
}
