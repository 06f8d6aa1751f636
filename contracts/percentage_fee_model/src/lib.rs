#![no_std]

mod error;
mod fees;
mod storage;

pub use error::Error;
pub use storage::{FeeConfig, BASIS_POINTS, MAX_EARLY_WITHDRAW_FEE_BPS, MAX_INTEREST_FEE_BPS};
use storage::{DataKey, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// Flat-percentage fee strategy: a cut of guaranteed interest, and a
/// penalty on principal withdrawn before maturity.
#[contract]
pub struct PercentageFeeModel;

#[contractimpl]
impl PercentageFeeModel {
    /// Initialize the fee model
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidFeeRate`: A rate is negative or above its cap
    pub fn initialize(
        env: Env,
        admin: Address,
        beneficiary: Address,
        interest_fee_bps: i128,
        early_withdraw_fee_bps: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        fees::validate_interest_fee(interest_fee_bps)?;
        fees::validate_early_withdraw_fee(early_withdraw_fee_bps)?;

        let config = FeeConfig {
            beneficiary,
            interest_fee_bps,
            early_withdraw_fee_bps,
        };

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        Ok(())
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidFeeRate`: Above `MAX_INTEREST_FEE_BPS`
    pub fn set_interest_fee(env: Env, interest_fee_bps: i128) -> Result<(), Error> {
        fees::validate_interest_fee(interest_fee_bps)?;

        let mut config = Self::admin_config(&env)?;
        config.interest_fee_bps = interest_fee_bps;
        Self::store(&env, &config);
        Ok(())
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidFeeRate`: Above `MAX_EARLY_WITHDRAW_FEE_BPS`
    pub fn set_early_withdraw_fee(env: Env, early_withdraw_fee_bps: i128) -> Result<(), Error> {
        fees::validate_early_withdraw_fee(early_withdraw_fee_bps)?;

        let mut config = Self::admin_config(&env)?;
        config.early_withdraw_fee_bps = early_withdraw_fee_bps;
        Self::store(&env, &config);
        Ok(())
    }

    pub fn set_beneficiary(env: Env, beneficiary: Address) -> Result<(), Error> {
        let mut config = Self::admin_config(&env)?;
        config.beneficiary = beneficiary;
        Self::store(&env, &config);
        Ok(())
    }

    /// Protocol cut of `interest_amount`
    pub fn calculate_fee_amount(env: Env, interest_amount: i128) -> Result<i128, Error> {
        let config = Self::config(&env)?;
        fees::calculate_bps_fee(interest_amount, config.interest_fee_bps)
    }

    /// Penalty on `principal` withdrawn before maturity
    pub fn calculate_early_withdraw_fee(env: Env, principal: i128) -> Result<i128, Error> {
        let config = Self::config(&env)?;
        fees::calculate_bps_fee(principal, config.early_withdraw_fee_bps)
    }

    pub fn beneficiary(env: Env) -> Result<Address, Error> {
        Ok(Self::config(&env)?.beneficiary)
    }

    pub fn get_config(env: Env) -> Result<FeeConfig, Error> {
        Self::config(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn config(env: &Env) -> Result<FeeConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn admin_config(env: &Env) -> Result<FeeConfig, Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Self::config(env)
    }

    fn store(env: &Env, config: &FeeConfig) {
        env.storage().instance().set(&DataKey::Config, config);
        env.events()
            .publish((Symbol::new(env, "fee_config_updated"),), config.clone());
    }
}
