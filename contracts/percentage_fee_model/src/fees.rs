use crate::error::Error;
use crate::storage::{BASIS_POINTS, MAX_EARLY_WITHDRAW_FEE_BPS, MAX_INTEREST_FEE_BPS};

/// Formula: fee = amount * fee_bps / 10,000
///
/// Example:
/// - amount: 2.5 of interest
/// - fee_bps: 2000 (20%)
/// - fee: 0.5
pub fn calculate_bps_fee(amount: i128, fee_bps: i128) -> Result<i128, Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }

    amount
        .checked_mul(fee_bps)
        .ok_or(Error::MathOverflow)?
        .checked_div(BASIS_POINTS)
        .ok_or(Error::MathOverflow)
}

pub fn validate_interest_fee(fee_bps: i128) -> Result<(), Error> {
    if !(0..=MAX_INTEREST_FEE_BPS).contains(&fee_bps) {
        return Err(Error::InvalidFeeRate);
    }
    Ok(())
}

pub fn validate_early_withdraw_fee(fee_bps: i128) -> Result<(), Error> {
    if !(0..=MAX_EARLY_WITHDRAW_FEE_BPS).contains(&fee_bps) {
        return Err(Error::InvalidFeeRate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: i128 = 10_000_000;

    #[test]
    fn test_interest_fee() {
        // 20% of 2.5
        assert_eq!(calculate_bps_fee(25 * SCALE / 10, 2000).unwrap(), 5 * SCALE / 10);
    }

    #[test]
    fn test_fee_rounds_down() {
        assert_eq!(calculate_bps_fee(24_999_999, 2000).unwrap(), 4_999_999);
        assert_eq!(calculate_bps_fee(99, 100).unwrap(), 0);
    }

    #[test]
    fn test_zero_fee() {
        assert_eq!(calculate_bps_fee(100 * SCALE, 0).unwrap(), 0);
    }

    #[test]
    fn test_fee_bounds() {
        assert!(validate_interest_fee(5_000).is_ok());
        assert_eq!(validate_interest_fee(5_001), Err(Error::InvalidFeeRate));
        assert_eq!(validate_interest_fee(-1), Err(Error::InvalidFeeRate));
        assert!(validate_early_withdraw_fee(1_000).is_ok());
        assert_eq!(validate_early_withdraw_fee(1_001), Err(Error::InvalidFeeRate));
    }
}
