#![no_std]

mod accounting;
mod admin;
mod deposits;
mod error;
mod events;
mod funding;
mod guard;
pub mod interfaces;
mod math;
mod pricing;
mod settlement;
mod storage;
mod validation;

use accounting::Accounting;
use admin::AdminOps;
use deposits::DepositOps;
pub use error::Error;
use funding::FundingOps;
use guard::Guard;
use pricing::Pricing;
pub use storage::{
    Deposit, Funding, PoolAccounting, PoolConfig, Surplus, MAX_AMOUNT, MAX_BATCH_SIZE, PRECISION,
    YEAR_IN_SECONDS,
};
use storage::Storage;

use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

/// Fixed-rate, fixed-term deposit pool on top of a floating-rate money
/// market. Depositors lock in their interest up front; funders cover the
/// gap to the venue's yield and collect that yield as dividends.
#[contract]
pub struct FixedRatePool;

#[contractimpl]
impl FixedRatePool {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the pool
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidLimits`: Deposit or period limits inconsistent
    /// - `InvalidOracle`: Oracle tracks a different money market
    pub fn initialize(env: Env, admin: Address, config: PoolConfig) -> Result<(), Error> {
        AdminOps::initialize(&env, &admin, &config)
    }

    /// Pause deposits, top-ups, rollovers and funding (emergency)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn pause(env: Env) -> Result<(), Error> {
        AdminOps::set_paused(&env, true)
    }

    /// Unpause contract
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn unpause(env: Env) -> Result<(), Error> {
        AdminOps::set_paused(&env, false)
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidLimits`: min <= 0 or max < min
    pub fn set_deposit_limits(env: Env, min_amount: i128, max_amount: i128) -> Result<(), Error> {
        AdminOps::set_deposit_limits(&env, min_amount, max_amount)
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidLimits`: min == 0 or max < min
    pub fn set_period_limits(env: Env, min_period: u64, max_period: u64) -> Result<(), Error> {
        AdminOps::set_period_limits(&env, min_period, max_period)
    }

    pub fn set_interest_model(env: Env, interest_model: Address) -> Result<(), Error> {
        AdminOps::set_interest_model(&env, &interest_model)
    }

    pub fn set_fee_model(env: Env, fee_model: Address) -> Result<(), Error> {
        AdminOps::set_fee_model(&env, &fee_model)
    }

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidOracle`: Oracle tracks a different money market
    pub fn set_interest_oracle(env: Env, interest_oracle: Address) -> Result<(), Error> {
        AdminOps::set_interest_oracle(&env, &interest_oracle)
    }

    pub fn set_reward_minter(
        env: Env,
        reward_minter: Option<Address>,
        reward_token: Option<Address>,
    ) -> Result<(), Error> {
        AdminOps::set_reward_minter(&env, &reward_minter, &reward_token)
    }

    // ============================================
    // DEPOSITS
    // ============================================

    /// Deposit `amount` until `maturation_timestamp`. Returns the deposit id
    /// (also the NFT id) and the guaranteed interest.
    pub fn deposit(
        env: Env,
        depositor: Address,
        amount: i128,
        maturation_timestamp: u64,
    ) -> Result<(u64, i128), Error> {
        depositor.require_auth();

        let result = Guard::run(&env, || {
            DepositOps::deposit(&env, &depositor, amount, maturation_timestamp)
        })?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    /// Add to an open deposit. Returns the extra guaranteed interest.
    pub fn topup_deposit(
        env: Env,
        owner: Address,
        deposit_id: u64,
        amount: i128,
    ) -> Result<i128, Error> {
        owner.require_auth();

        let result = Guard::run(&env, || DepositOps::topup(&env, &owner, deposit_id, amount))?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    /// Roll a matured deposit into a new one. Returns the new deposit id and
    /// its guaranteed interest.
    pub fn rollover_deposit(
        env: Env,
        owner: Address,
        deposit_id: u64,
        maturation_timestamp: u64,
    ) -> Result<(u64, i128), Error> {
        owner.require_auth();

        let result = Guard::run(&env, || {
            DepositOps::rollover(&env, &owner, deposit_id, maturation_timestamp)
        })?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    /// Withdraw `virtual_token_amount` (MAX_AMOUNT for everything). Returns
    /// what was paid to `owner`.
    pub fn withdraw(
        env: Env,
        owner: Address,
        deposit_id: u64,
        virtual_token_amount: i128,
        early: bool,
    ) -> Result<i128, Error> {
        owner.require_auth();

        let result = Guard::run(&env, || {
            DepositOps::withdraw(&env, &owner, deposit_id, virtual_token_amount, early)
        })?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    pub fn multi_deposit(
        env: Env,
        depositor: Address,
        amounts: Vec<i128>,
        maturation_timestamps: Vec<u64>,
    ) -> Result<Vec<u64>, Error> {
        depositor.require_auth();

        let result = Guard::run(&env, || {
            DepositOps::multi_deposit(&env, &depositor, &amounts, &maturation_timestamps)
        })?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    pub fn multi_withdraw(
        env: Env,
        owner: Address,
        deposit_ids: Vec<u64>,
        virtual_token_amounts: Vec<i128>,
        early: Vec<bool>,
    ) -> Result<i128, Error> {
        owner.require_auth();

        let result = Guard::run(&env, || {
            DepositOps::multi_withdraw(&env, &owner, &deposit_ids, &virtual_token_amounts, &early)
        })?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    // ============================================
    // FUNDING
    // ============================================

    /// Cover up to `amount` of a deposit's deficit (MAX_AMOUNT for all of
    /// it). Returns the funding id and the amount funded.
    pub fn fund(
        env: Env,
        funder: Address,
        deposit_id: u64,
        amount: i128,
    ) -> Result<(u64, i128), Error> {
        funder.require_auth();

        let result = Guard::run(&env, || FundingOps::fund(&env, &funder, deposit_id, amount))?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    pub fn fund_multiple(
        env: Env,
        funder: Address,
        from_deposit_id: u64,
        count: u32,
    ) -> Result<i128, Error> {
        funder.require_auth();

        let result = Guard::run(&env, || {
            FundingOps::fund_multiple(&env, &funder, from_deposit_id, count)
        })?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    /// Fund the deficits of the next `MAX_BATCH_SIZE` deposits that may
    /// still need it
    pub fn fund_all(env: Env, funder: Address) -> Result<i128, Error> {
        funder.require_auth();

        let result = Guard::run(&env, || FundingOps::fund_all(&env, &funder))?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    /// Pay funders the yield accrued on a deposit. Anyone may call.
    pub fn pay_interest_to_funders(env: Env, deposit_id: u64) -> Result<i128, Error> {
        let result = Guard::run(&env, || FundingOps::pay_interest_to_funders(&env, deposit_id))?;
        Storage::extend_instance(&env);
        Ok(result)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Net interest a deposit of `amount` over `period` would get right now
    pub fn calculate_interest_amount(env: Env, amount: i128, period: u64) -> Result<i128, Error> {
        Guard::check(&env)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let config = Storage::get_config(&env)?;
        Ok(Pricing::quote(&env, &config, amount, period)?.interest)
    }

    pub fn surplus(env: Env) -> Result<Surplus, Error> {
        Guard::check(&env)?;
        Accounting::surplus(&env)
    }

    pub fn surplus_of_deposit(env: Env, deposit_id: u64) -> Result<Surplus, Error> {
        Guard::check(&env)?;
        Accounting::surplus_of_deposit(&env, deposit_id)
    }

    pub fn total_interest_owed_to_funders(env: Env) -> Result<i128, Error> {
        Guard::check(&env)?;
        Accounting::total_interest_owed_to_funders(&env)
    }

    pub fn get_deposit(env: Env, deposit_id: u64) -> Result<Deposit, Error> {
        Guard::check(&env)?;
        Storage::get_deposit(&env, deposit_id)
    }

    pub fn get_funding(env: Env, funding_id: u64) -> Result<Funding, Error> {
        Guard::check(&env)?;
        Storage::get_funding(&env, funding_id)
    }

    pub fn get_accounting(env: Env) -> Result<PoolAccounting, Error> {
        Guard::check(&env)?;
        Ok(Storage::get_accounting(&env))
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, Error> {
        Storage::get_config(&env)
    }

    pub fn deposit_count(env: Env) -> u64 {
        Storage::deposit_count(&env)
    }

    pub fn funding_count(env: Env) -> u64 {
        Storage::funding_count(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        Storage::is_paused(&env)
    }
}
