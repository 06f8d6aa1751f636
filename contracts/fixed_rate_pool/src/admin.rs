use crate::error::Error;
use crate::events::{AddressUpdatedEvent, LimitsUpdatedEvent, PausedEvent, RewardMinterUpdatedEvent};
use crate::interfaces::InterestOracleClient;
use crate::storage::{DataKey, PoolAccounting, PoolConfig, Storage};
use crate::validation::Validator;
use soroban_sdk::{Address, Env, Symbol};

pub struct AdminOps;

impl AdminOps {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidLimits`: Deposit or period limits inconsistent
    /// - `InvalidOracle`: Oracle tracks a different money market
    pub fn initialize(env: &Env, admin: &Address, config: &PoolConfig) -> Result<(), Error> {
        if Storage::is_initialized(env) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        Validator::validate_limits(
            config.min_deposit_amount,
            config.max_deposit_amount,
            config.min_deposit_period,
            config.max_deposit_period,
        )?;
        Self::check_oracle(env, &config.interest_oracle, &config.money_market)?;

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, admin);
        Storage::set_config(env, config);
        Storage::set_accounting(env, &PoolAccounting::default());
        Storage::set_paused(env, false);
        Storage::extend_instance(env);

        Ok(())
    }

    pub fn set_paused(env: &Env, paused: bool) -> Result<(), Error> {
        let admin = Self::require_admin(env)?;

        Storage::set_paused(env, paused);

        let name = if paused { "paused" } else { "unpaused" };
        env.events()
            .publish((Symbol::new(env, name),), PausedEvent { admin });
        Ok(())
    }

    // ============================================
    // LIMITS
    // ============================================

    pub fn set_deposit_limits(env: &Env, min_amount: i128, max_amount: i128) -> Result<(), Error> {
        Self::require_admin(env)?;
        let mut config = Storage::get_config(env)?;

        config.min_deposit_amount = min_amount;
        config.max_deposit_amount = max_amount;
        Self::store_limits(env, &config)
    }

    pub fn set_period_limits(env: &Env, min_period: u64, max_period: u64) -> Result<(), Error> {
        Self::require_admin(env)?;
        let mut config = Storage::get_config(env)?;

        config.min_deposit_period = min_period;
        config.max_deposit_period = max_period;
        Self::store_limits(env, &config)
    }

    fn store_limits(env: &Env, config: &PoolConfig) -> Result<(), Error> {
        Validator::validate_limits(
            config.min_deposit_amount,
            config.max_deposit_amount,
            config.min_deposit_period,
            config.max_deposit_period,
        )?;
        Storage::set_config(env, config);

        env.events().publish(
            (Symbol::new(env, "limits_updated"),),
            LimitsUpdatedEvent {
                min_deposit_amount: config.min_deposit_amount,
                max_deposit_amount: config.max_deposit_amount,
                min_deposit_period: config.min_deposit_period,
                max_deposit_period: config.max_deposit_period,
            },
        );
        Ok(())
    }

    // ============================================
    // STRATEGIES
    // ============================================

    pub fn set_interest_model(env: &Env, interest_model: &Address) -> Result<(), Error> {
        Self::require_admin(env)?;
        let mut config = Storage::get_config(env)?;

        config.interest_model = interest_model.clone();
        Storage::set_config(env, &config);
        Self::emit_address(env, "interest_model", interest_model);
        Ok(())
    }

    pub fn set_fee_model(env: &Env, fee_model: &Address) -> Result<(), Error> {
        Self::require_admin(env)?;
        let mut config = Storage::get_config(env)?;

        config.fee_model = fee_model.clone();
        Storage::set_config(env, &config);
        Self::emit_address(env, "fee_model", fee_model);
        Ok(())
    }

    /// # Errors
    /// - `InvalidOracle`: Oracle tracks a different money market
    pub fn set_interest_oracle(env: &Env, interest_oracle: &Address) -> Result<(), Error> {
        Self::require_admin(env)?;
        let mut config = Storage::get_config(env)?;

        Self::check_oracle(env, interest_oracle, &config.money_market)?;

        config.interest_oracle = interest_oracle.clone();
        Storage::set_config(env, &config);
        Self::emit_address(env, "interest_oracle", interest_oracle);
        Ok(())
    }

    /// Pass `None` for both to switch rewards off
    pub fn set_reward_minter(
        env: &Env,
        reward_minter: &Option<Address>,
        reward_token: &Option<Address>,
    ) -> Result<(), Error> {
        Self::require_admin(env)?;
        let mut config = Storage::get_config(env)?;

        config.reward_minter = reward_minter.clone();
        config.reward_token = reward_token.clone();
        Storage::set_config(env, &config);

        env.events().publish(
            (Symbol::new(env, "reward_minter_updated"),),
            RewardMinterUpdatedEvent {
                reward_minter: reward_minter.clone(),
                reward_token: reward_token.clone(),
            },
        );
        Ok(())
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_admin(env: &Env) -> Result<Address, Error> {
        let admin = Storage::get_admin(env)?;
        admin.require_auth();
        Ok(admin)
    }

    fn check_oracle(env: &Env, oracle: &Address, money_market: &Address) -> Result<(), Error> {
        let tracked = InterestOracleClient::new(env, oracle).money_market();
        if tracked != *money_market {
            return Err(Error::InvalidOracle);
        }
        Ok(())
    }

    fn emit_address(env: &Env, field: &str, address: &Address) {
        env.events().publish(
            (Symbol::new(env, "address_updated"),),
            AddressUpdatedEvent {
                field: Symbol::new(env, field),
                address: address.clone(),
            },
        );
    }
}
