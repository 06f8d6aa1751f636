use crate::error::Error;
use crate::interfaces::DepositNftClient;
use crate::storage::{Deposit, PoolConfig, Storage, MAX_BATCH_SIZE};
use soroban_sdk::{Address, Env};

pub struct Validator;

impl Validator {
    pub fn check_not_paused(env: &Env) -> Result<(), Error> {
        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    pub fn validate_limits(
        min_deposit_amount: i128,
        max_deposit_amount: i128,
        min_deposit_period: u64,
        max_deposit_period: u64,
    ) -> Result<(), Error> {
        if min_deposit_amount <= 0 || max_deposit_amount < min_deposit_amount {
            return Err(Error::InvalidLimits);
        }
        if min_deposit_period == 0 || max_deposit_period < min_deposit_period {
            return Err(Error::InvalidLimits);
        }
        Ok(())
    }

    /// Amount must fall in [min_deposit_amount, max_deposit_amount]
    pub fn validate_amount(config: &PoolConfig, amount: i128) -> Result<(), Error> {
        if amount < config.min_deposit_amount || amount > config.max_deposit_amount {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }

    /// Period until `maturation_timestamp` must fall in
    /// [min_deposit_period, max_deposit_period]. Returns the period.
    pub fn validate_period(
        config: &PoolConfig,
        now: u64,
        maturation_timestamp: u64,
    ) -> Result<u64, Error> {
        if maturation_timestamp <= now {
            return Err(Error::InvalidPeriod);
        }

        let period = maturation_timestamp - now;
        if period < config.min_deposit_period || period > config.max_deposit_period {
            return Err(Error::InvalidPeriod);
        }
        Ok(period)
    }

    /// A fully withdrawn or rolled-over deposit no longer exists
    pub fn require_active(deposit: &Deposit) -> Result<(), Error> {
        if deposit.virtual_token_total_supply == 0 {
            return Err(Error::DepositNotFound);
        }
        Ok(())
    }

    pub fn require_not_matured(deposit: &Deposit, now: u64) -> Result<(), Error> {
        if now >= deposit.maturation_timestamp {
            return Err(Error::AlreadyMatured);
        }
        Ok(())
    }

    pub fn require_matured(deposit: &Deposit, now: u64) -> Result<(), Error> {
        if now < deposit.maturation_timestamp {
            return Err(Error::NotMatured);
        }
        Ok(())
    }

    /// Early exits only before maturity, normal exits only after
    pub fn validate_withdraw_phase(deposit: &Deposit, now: u64, early: bool) -> Result<(), Error> {
        if early {
            Self::require_not_matured(deposit, now)
        } else {
            Self::require_matured(deposit, now)
        }
    }

    /// `owner` must hold the deposit NFT
    pub fn require_owner(
        env: &Env,
        config: &PoolConfig,
        owner: &Address,
        deposit_id: u64,
    ) -> Result<(), Error> {
        let nft = DepositNftClient::new(env, &config.deposit_nft);
        match nft.try_owner_of(&deposit_id) {
            Ok(Ok(holder)) if holder == *owner => Ok(()),
            _ => Err(Error::NotOwner),
        }
    }

    pub fn validate_batch_size(len: u32) -> Result<(), Error> {
        if len == 0 {
            return Err(Error::InvalidAmount);
        }
        if len > MAX_BATCH_SIZE {
            return Err(Error::BatchTooLarge);
        }
        Ok(())
    }
}
