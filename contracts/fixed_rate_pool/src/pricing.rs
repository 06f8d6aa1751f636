use crate::error::Error;
use crate::interfaces::{FeeModelClient, InterestModelClient, InterestOracleClient};
use crate::storage::PoolConfig;
use soroban_sdk::Env;

/// Guaranteed interest on a new principal slice
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestQuote {
    pub gross: i128,
    pub fee: i128,
    /// gross - fee, owed to the depositor
    pub interest: i128,
}

pub struct Pricing;

impl Pricing {
    /// Smoothed venue rate per second, refreshing the oracle if due
    pub fn oracle_rate(env: &Env, config: &PoolConfig) -> Result<i128, Error> {
        let rate = InterestOracleClient::new(env, &config.interest_oracle).update_and_query();
        if rate < 0 {
            return Err(Error::InvalidStrategyResult);
        }
        Ok(rate)
    }

    /// Price `amount` over `period` seconds at the current oracle rate
    pub fn quote(
        env: &Env,
        config: &PoolConfig,
        amount: i128,
        period: u64,
    ) -> Result<InterestQuote, Error> {
        let rate = Self::oracle_rate(env, config)?;

        let gross = InterestModelClient::new(env, &config.interest_model)
            .calculate_interest_amount(&amount, &period, &rate);
        let fee = FeeModelClient::new(env, &config.fee_model).calculate_fee_amount(&gross);

        Self::split(gross, fee)
    }

    /// Check what the strategies returned and derive the net interest
    pub fn split(gross: i128, fee: i128) -> Result<InterestQuote, Error> {
        if gross < 0 || fee < 0 || fee > gross {
            return Err(Error::InvalidStrategyResult);
        }

        Ok(InterestQuote {
            gross,
            fee,
            interest: gross - fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let quote = Pricing::split(24_999_999, 4_999_999).unwrap();
        assert_eq!(quote.interest, 20_000_000);
        assert_eq!(quote.fee, 4_999_999);
    }

    #[test]
    fn test_split_rejects_bad_strategy_output() {
        assert_eq!(Pricing::split(-1, 0), Err(Error::InvalidStrategyResult));
        assert_eq!(Pricing::split(10, 11), Err(Error::InvalidStrategyResult));
        assert_eq!(Pricing::split(10, -1), Err(Error::InvalidStrategyResult));
        assert_eq!(Pricing::split(0, 0).unwrap().interest, 0);
    }
}
