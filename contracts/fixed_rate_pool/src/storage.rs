use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env};

// Constants
pub const PRECISION: i128 = 1_000_000_000_000_000_000; // rates and indices, 1e18
pub const YEAR_IN_SECONDS: u64 = 31_536_000;
/// "Everything" sentinel for withdraw and fund amounts
pub const MAX_AMOUNT: i128 = i128::MAX;
/// Upper bound on items handled by one batch call
pub const MAX_BATCH_SIZE: u32 = 25;

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const RECORD_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Collaborators and limits, set at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// SEP-41 token deposited and paid out
    pub stablecoin: Address,
    pub money_market: Address,
    pub interest_oracle: Address,
    pub interest_model: Address,
    pub fee_model: Address,
    pub deposit_nft: Address,
    pub funding_multitoken: Address,
    /// Incentive minter, if rewards are enabled
    pub reward_minter: Option<Address>,
    /// Token the reward minter pays funders in
    pub reward_token: Option<Address>,
    pub min_deposit_amount: i128,
    pub max_deposit_amount: i128,
    pub min_deposit_period: u64,
    pub max_deposit_period: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    /// Also the deposit NFT token id
    pub id: u64,
    pub principal: i128,
    /// Guaranteed interest, net of fee
    pub interest_owed: i128,
    pub fee_owed: i128,
    /// principal + interest_owed; the unit of partial withdrawal
    pub virtual_token_total_supply: i128,
    /// Share of the venue: each inflow adds amount * PRECISION / income_index
    pub scaled_balance: i128,
    pub creation_timestamp: u64,
    pub maturation_timestamp: u64,
    /// 0 when unfunded
    pub funding_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Funding {
    /// Also the funding multitoken id
    pub id: u64,
    pub deposit_id: u64,
    /// Stablecoin funders put in, shrinking as the deposit is withdrawn
    pub principal_paid: i128,
    /// Part of the deposit's virtual supply whose yield belongs to funders
    pub funded_virtual_amount: i128,
    /// Venue index at the last payout
    pub recorded_income_index: i128,
    pub creation_timestamp: u64,
    pub last_payout_timestamp: u64,
    pub total_interest_paid: i128,
    /// Paid back to funders when the deposit exited early
    pub total_refunded: i128,
}

/// Pool-wide totals, kept in step with every record change
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolAccounting {
    /// Sum of active principals
    pub total_deposit: i128,
    pub total_interest_owed: i128,
    pub total_fee_owed: i128,
    pub total_funded_virtual_amount: i128,
    /// Sum of funded_virtual_amount * PRECISION / recorded_income_index
    pub funded_virtual_index_sum: i128,
    pub total_interest_paid_to_funders: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Surplus {
    pub is_negative: bool,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    Accounting,
    Initialized,
    Paused,
    Locked,
    DepositCount,
    FundingCount,
    FundCursor,
    Deposit(u64),
    Funding(u64),
}

pub struct Storage;

impl Storage {
    pub fn extend_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Initialized)
    }

    pub fn get_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_config(env: &Env) -> Result<PoolConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn set_config(env: &Env, config: &PoolConfig) {
        env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn get_accounting(env: &Env) -> PoolAccounting {
        env.storage()
            .instance()
            .get(&DataKey::Accounting)
            .unwrap_or_default()
    }

    pub fn set_accounting(env: &Env, accounting: &PoolAccounting) {
        env.storage().instance().set(&DataKey::Accounting, accounting);
    }

    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn set_paused(env: &Env, paused: bool) {
        env.storage().instance().set(&DataKey::Paused, &paused);
    }

    // Deposits
    pub fn deposit_count(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::DepositCount)
            .unwrap_or(0)
    }

    pub fn next_deposit_id(env: &Env) -> u64 {
        let id = Self::deposit_count(env) + 1;
        env.storage().instance().set(&DataKey::DepositCount, &id);
        id
    }

    pub fn get_deposit(env: &Env, deposit_id: u64) -> Result<Deposit, Error> {
        let key = DataKey::Deposit(deposit_id);
        let deposit = env
            .storage()
            .persistent()
            .get::<DataKey, Deposit>(&key)
            .ok_or(Error::DepositNotFound)?;
        env.storage()
            .persistent()
            .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
        Ok(deposit)
    }

    pub fn set_deposit(env: &Env, deposit: &Deposit) {
        let key = DataKey::Deposit(deposit.id);
        env.storage().persistent().set(&key, deposit);
        env.storage()
            .persistent()
            .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }

    /// Lowest deposit id `fund_all` still has to look at
    pub fn fund_cursor(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::FundCursor)
            .unwrap_or(1)
    }

    pub fn set_fund_cursor(env: &Env, cursor: u64) {
        env.storage().instance().set(&DataKey::FundCursor, &cursor);
    }

    // Fundings
    pub fn funding_count(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::FundingCount)
            .unwrap_or(0)
    }

    pub fn next_funding_id(env: &Env) -> u64 {
        let id = Self::funding_count(env) + 1;
        env.storage().instance().set(&DataKey::FundingCount, &id);
        id
    }

    pub fn get_funding(env: &Env, funding_id: u64) -> Result<Funding, Error> {
        let key = DataKey::Funding(funding_id);
        let funding = env
            .storage()
            .persistent()
            .get::<DataKey, Funding>(&key)
            .ok_or(Error::FundingNotFound)?;
        env.storage()
            .persistent()
            .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
        Ok(funding)
    }

    pub fn set_funding(env: &Env, funding: &Funding) {
        let key = DataKey::Funding(funding.id);
        env.storage().persistent().set(&key, funding);
        env.storage()
            .persistent()
            .extend_ttl(&key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }
}
