#![no_std]

mod error;
mod model;
mod storage;

pub use error::Error;
pub use storage::{ModelParameters, PRECISION, YEAR_IN_SECONDS};
use storage::{DataKey, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// Guaranteed-interest strategy whose share of the market rate shrinks
/// linearly with the deposit period.
#[contract]
pub struct LinearInterestModel;

#[contractimpl]
impl LinearInterestModel {
    /// Initialize the model
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidParameters`: Negative intercept or slope
    pub fn initialize(
        env: Env,
        admin: Address,
        multiplier_intercept: i128,
        multiplier_slope: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        let params = Self::validated(multiplier_intercept, multiplier_slope)?;

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Parameters, &params);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        Ok(())
    }

    /// Replace the multiplier line
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidParameters`: Negative intercept or slope
    pub fn set_parameters(
        env: Env,
        multiplier_intercept: i128,
        multiplier_slope: i128,
    ) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        let params = Self::validated(multiplier_intercept, multiplier_slope)?;
        env.storage().instance().set(&DataKey::Parameters, &params);

        env.events()
            .publish((Symbol::new(&env, "parameters_updated"),), params);

        Ok(())
    }

    /// Gross interest promised on `principal` over `period` seconds at
    /// `rate` per second (scaled by PRECISION)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Negative principal or rate
    pub fn calculate_interest_amount(
        env: Env,
        principal: i128,
        period: u64,
        rate: i128,
    ) -> Result<i128, Error> {
        if principal < 0 || rate < 0 {
            return Err(Error::InvalidAmount);
        }

        let params = Self::parameters(env)?;
        model::calculate_interest(&params, principal, period, rate)
    }

    pub fn parameters(env: Env) -> Result<ModelParameters, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Parameters)
            .ok_or(Error::NotInitialized)
    }

    fn validated(
        multiplier_intercept: i128,
        multiplier_slope: i128,
    ) -> Result<ModelParameters, Error> {
        if multiplier_intercept < 0 || multiplier_slope < 0 {
            return Err(Error::InvalidParameters);
        }

        Ok(ModelParameters {
            multiplier_intercept,
            multiplier_slope,
        })
    }
}
