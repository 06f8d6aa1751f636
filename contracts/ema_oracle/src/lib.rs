#![no_std]

mod ema;
mod error;
mod events;
mod storage;

pub use error::Error;
use events::RateUpdatedEvent;
pub use storage::{OracleConfig, OracleState, PRECISION};
use storage::{DataKey, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};

use soroban_sdk::{contract, contractclient, contractimpl, log, Address, Env, Symbol};

/// The slice of the venue interface the oracle samples
#[contractclient(name = "MoneyMarketClient")]
pub trait MoneyMarket {
    fn income_index(env: Env) -> i128;
}

/// Exponential moving average of a venue's per-second yield, sampled at
/// most once per update interval.
#[contract]
pub struct EmaOracle;

#[contractimpl]
impl EmaOracle {
    /// Initialize the oracle and take the first index sample
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidInterval`: Update interval is zero
    /// - `InvalidSmoothingFactor`: Weight outside (0, 1]
    /// - `InvalidRate`: Initial rate is negative
    pub fn initialize(
        env: Env,
        admin: Address,
        money_market: Address,
        update_interval: u64,
        smoothing_factor: u32,
        average_window: u32,
        initial_rate: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if update_interval == 0 {
            return Err(Error::InvalidInterval);
        }
        if initial_rate < 0 {
            return Err(Error::InvalidRate);
        }
        ema::calculate_alpha(smoothing_factor, average_window)?;

        let income_index = MoneyMarketClient::new(&env, &money_market).income_index();

        let config = OracleConfig {
            money_market,
            update_interval,
            smoothing_factor,
            average_window,
        };
        let state = OracleState {
            ema_rate: initial_rate,
            last_income_index: income_index,
            last_update_timestamp: env.ledger().timestamp(),
        };

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::State, &state);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        Ok(())
    }

    /// Sample the venue if an interval has passed, then return the
    /// smoothed rate per second (scaled by PRECISION)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn update_and_query(env: Env) -> Result<i128, Error> {
        let config = Self::config(&env)?;
        let mut state = Self::state(&env)?;

        let now = env.ledger().timestamp();
        let elapsed = now.saturating_sub(state.last_update_timestamp);
        if elapsed < config.update_interval {
            return Ok(state.ema_rate);
        }

        let income_index = MoneyMarketClient::new(&env, &config.money_market).income_index();
        let incoming_rate =
            ema::calculate_incoming_rate(state.last_income_index, income_index, elapsed)?;

        let alpha = ema::calculate_alpha(config.smoothing_factor, config.average_window)?;
        let intervals = elapsed / config.update_interval;
        let ema_rate = ema::calculate_ema(state.ema_rate, incoming_rate, alpha, intervals)?;

        state = OracleState {
            ema_rate,
            last_income_index: income_index,
            last_update_timestamp: now,
        };
        env.storage().instance().set(&DataKey::State, &state);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        log!(&env, "oracle sample", incoming_rate, ema_rate);

        env.events().publish(
            (Symbol::new(&env, "rate_updated"),),
            RateUpdatedEvent {
                income_index,
                incoming_rate,
                ema_rate,
                intervals,
            },
        );

        Ok(ema_rate)
    }

    /// Stored smoothed rate, without sampling
    pub fn query(env: Env) -> Result<i128, Error> {
        Ok(Self::state(&env)?.ema_rate)
    }

    pub fn money_market(env: Env) -> Result<Address, Error> {
        Ok(Self::config(&env)?.money_market)
    }

    pub fn get_config(env: Env) -> Result<OracleConfig, Error> {
        Self::config(&env)
    }

    pub fn get_state(env: Env) -> Result<OracleState, Error> {
        Self::state(&env)
    }

    fn config(env: &Env) -> Result<OracleConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn state(env: &Env) -> Result<OracleState, Error> {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .ok_or(Error::NotInitialized)
    }
}
