use crate::error::Error;
use crate::storage::PRECISION;

/// EMA weight for one interval, scaled by PRECISION
///
/// Formula: alpha = smoothing_factor / (average_window + 1)
pub fn calculate_alpha(smoothing_factor: u32, average_window: u32) -> Result<i128, Error> {
    let denominator = (average_window as i128) + 1;
    if smoothing_factor == 0 || (smoothing_factor as i128) > denominator {
        return Err(Error::InvalidSmoothingFactor);
    }

    (smoothing_factor as i128)
        .checked_mul(PRECISION)
        .ok_or(Error::MathOverflow)?
        .checked_div(denominator)
        .ok_or(Error::MathOverflow)
}

/// Per-second growth rate between two index samples, scaled by PRECISION.
/// A flat or falling index yields zero.
///
/// Formula: rate = (new_index / last_index - 1) / elapsed
pub fn calculate_incoming_rate(
    last_index: i128,
    new_index: i128,
    elapsed: u64,
) -> Result<i128, Error> {
    if new_index <= last_index || last_index <= 0 || elapsed == 0 {
        return Ok(0);
    }

    let growth = new_index
        .checked_mul(PRECISION)
        .ok_or(Error::MathOverflow)?
        .checked_div(last_index)
        .ok_or(Error::MathOverflow)?
        - PRECISION;

    Ok(growth / (elapsed as i128))
}

/// `base ^ exp` in PRECISION fixed point, by repeated squaring
pub fn pow_fixed(base: i128, mut exp: u64) -> Result<i128, Error> {
    let mut result = PRECISION;
    let mut factor = base;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(factor).ok_or(Error::MathOverflow)? / PRECISION;
        }
        exp >>= 1;
        if exp > 0 {
            factor = factor.checked_mul(factor).ok_or(Error::MathOverflow)? / PRECISION;
        }
    }

    Ok(result)
}

/// Fold `intervals` samples of `incoming` into `ema`
///
/// Formula: ema' = incoming + (ema - incoming) * (1 - alpha)^intervals
pub fn calculate_ema(ema: i128, incoming: i128, alpha: i128, intervals: u64) -> Result<i128, Error> {
    let decay = pow_fixed(PRECISION - alpha, intervals)?;
    let carried = (ema - incoming)
        .checked_mul(decay)
        .ok_or(Error::MathOverflow)?
        / PRECISION;

    incoming.checked_add(carried).ok_or(Error::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i128 = 31_536_000;

    #[test]
    fn test_alpha() {
        assert_eq!(calculate_alpha(2, 1).unwrap(), PRECISION);
        assert_eq!(calculate_alpha(2, 3).unwrap(), PRECISION / 2);
        assert_eq!(calculate_alpha(0, 3), Err(Error::InvalidSmoothingFactor));
        assert_eq!(calculate_alpha(5, 3), Err(Error::InvalidSmoothingFactor));
    }

    #[test]
    fn test_incoming_rate() {
        // 10% growth over one year
        let rate = calculate_incoming_rate(PRECISION, PRECISION + PRECISION / 10, YEAR as u64)
            .unwrap();
        assert_eq!(rate, PRECISION / 10 / YEAR);

        assert_eq!(calculate_incoming_rate(PRECISION, PRECISION / 2, 100).unwrap(), 0);
    }

    #[test]
    fn test_pow_fixed() {
        let half = PRECISION / 2;
        assert_eq!(pow_fixed(half, 0).unwrap(), PRECISION);
        assert_eq!(pow_fixed(half, 1).unwrap(), half);
        assert_eq!(pow_fixed(half, 3).unwrap(), PRECISION / 8);
    }

    #[test]
    fn test_ema_single_interval() {
        // alpha = 0.5: halfway between stored and incoming
        let ema = calculate_ema(100, 200, PRECISION / 2, 1).unwrap();
        assert_eq!(ema, 150);
    }

    #[test]
    fn test_ema_converges() {
        let ema = calculate_ema(1_000_000, 0, PRECISION / 2, 20).unwrap();
        assert!(ema < 2);

        let same = calculate_ema(500, 500, PRECISION / 3, 7).unwrap();
        assert_eq!(same, 500);
    }
}
