#![allow(dead_code)]

use deposit_nft::{DepositNft, DepositNftClient};
use ema_oracle::{EmaOracle, EmaOracleClient};
use fixed_rate_pool::{FixedRatePool, FixedRatePoolClient, PoolConfig, PRECISION};
use funding_multitoken::{FundingMultitoken, FundingMultitokenClient};
use linear_interest_model::{LinearInterestModel, LinearInterestModelClient};
use percentage_fee_model::{PercentageFeeModel, PercentageFeeModelClient};
use vault_money_market::{VaultMoneyMarket, VaultMoneyMarketClient};

use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, Ledger},
    token::{self, StellarAssetClient},
    Address, Env,
};

// Constants
pub const SCALE: i128 = 10_000_000;
pub const DAY: u64 = 86_400;
pub const YEAR: u64 = 31_536_000;
pub const START: u64 = 1_700_000_000;
/// 10% a year, per second
pub const INITIAL_RATE: i128 = PRECISION / 10 / YEAR as i128;
pub const USER_BALANCE: i128 = 1_000_000 * SCALE;

// ============================================
// REWARD MINTER DOUBLE
// ============================================
pub use reward_minter::*;

mod reward_minter {
use super::*;

#[contracttype]
#[derive(Clone)]
enum MinterKey {
    RewardToken,
    Pool,
    Booked(Address),
    TakenBack(Address),
    TakeBackRequested(Address),
}

/// Books depositor rewards and mints funder rewards of
/// principal * elapsed / YEAR to the pool
#[contract]
pub struct MockRewardMinter;

#[contractimpl]
impl MockRewardMinter {
    pub fn initialize(env: Env, reward_token: Address, pool: Address) {
        env.storage()
            .instance()
            .set(&MinterKey::RewardToken, &reward_token);
        env.storage().instance().set(&MinterKey::Pool, &pool);
    }

    pub fn accrue_depositor_reward(env: Env, depositor: Address, amount: i128, period: u64) -> i128 {
        let booked = amount * period as i128 / YEAR as i128;
        let key = MinterKey::Booked(depositor);
        let total: i128 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(total + booked));
        booked
    }

    pub fn take_back_depositor_reward(
        env: Env,
        depositor: Address,
        amount: i128,
        early: bool,
    ) -> i128 {
        let requested = MinterKey::TakeBackRequested(depositor.clone());
        let total: i128 = env.storage().instance().get(&requested).unwrap_or(0);
        env.storage().instance().set(&requested, &(total + amount));

        if !early {
            return 0;
        }
        let key = MinterKey::TakenBack(depositor);
        let total: i128 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(total + amount));
        amount
    }

    pub fn accrue_funder_reward(
        env: Env,
        _funding_id: u64,
        principal_at_risk: i128,
        elapsed: u64,
    ) -> i128 {
        let reward = principal_at_risk * elapsed as i128 / YEAR as i128;
        if reward > 0 {
            let token: Address = env.storage().instance().get(&MinterKey::RewardToken).unwrap();
            let pool: Address = env.storage().instance().get(&MinterKey::Pool).unwrap();
            StellarAssetClient::new(&env, &token).mint(&pool, &reward);
        }
        reward
    }

    pub fn booked(env: Env, depositor: Address) -> i128 {
        env.storage()
            .instance()
            .get(&MinterKey::Booked(depositor))
            .unwrap_or(0)
    }

    pub fn taken_back(env: Env, depositor: Address) -> i128 {
        env.storage()
            .instance()
            .get(&MinterKey::TakenBack(depositor))
            .unwrap_or(0)
    }

    /// Every amount the pool asked to take back, early or not
    pub fn take_back_requested(env: Env, depositor: Address) -> i128 {
        env.storage()
            .instance()
            .get(&MinterKey::TakeBackRequested(depositor))
            .unwrap_or(0)
    }
}

}

// ============================================
// RE-ENTERING MONEY MARKET
// ============================================
pub use reentrant_market::*;

mod reentrant_market {
use super::*;

#[contracttype]
#[derive(Clone)]
enum MarketKey {
    Pool,
}

/// Money market that calls back into the pool while taking a deposit
#[contract]
pub struct ReentrantMoneyMarket;

#[contractimpl]
impl ReentrantMoneyMarket {
    pub fn initialize(env: Env, pool: Address) {
        env.storage().instance().set(&MarketKey::Pool, &pool);
    }

    pub fn deposit(env: Env, _amount: i128) {
        let pool: Address = env.storage().instance().get(&MarketKey::Pool).unwrap();
        FixedRatePoolClient::new(&env, &pool).surplus();
    }

    pub fn withdraw(_env: Env, amount: i128) -> i128 {
        amount
    }

    pub fn total_value(_env: Env) -> i128 {
        0
    }

    pub fn income_index(_env: Env) -> i128 {
        PRECISION
    }
}

}

// ============================================
// TEST CONTEXT
// ============================================

pub struct TestContext {
    pub env: Env,
    pub admin: Address,
    pub beneficiary: Address,
    pub stablecoin: Address,
    pub pool_id: Address,
    pub vault_id: Address,
    pub oracle_id: Address,
    pub interest_model_id: Address,
    pub fee_model_id: Address,
    pub nft_id: Address,
    pub multitoken_id: Address,
    pub reward_minter_id: Address,
    pub reward_token: Address,
}

impl TestContext {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().with_mut(|li| li.timestamp = START);

        let admin = Address::generate(&env);
        let beneficiary = Address::generate(&env);

        // Deploy stablecoin (use Stellar Asset Contract)
        let stablecoin = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();

        // The vault needs the pool address up front
        let pool_id = env.register(FixedRatePool, ());

        let vault_id = env.register(VaultMoneyMarket, ());
        VaultMoneyMarketClient::new(&env, &vault_id).initialize(&admin, &pool_id, &stablecoin);

        let oracle_id = env.register(EmaOracle, ());
        EmaOracleClient::new(&env, &oracle_id).initialize(
            &admin,
            &vault_id,
            &DAY,
            &2u32,
            &29u32,
            &INITIAL_RATE,
        );

        // multiplier 0.5 at zero term, 0.25 at one year
        let interest_model_id = env.register(LinearInterestModel, ());
        LinearInterestModelClient::new(&env, &interest_model_id).initialize(
            &admin,
            &(PRECISION / 2),
            &(PRECISION / 4),
        );

        // 20% of interest, 1% of early withdrawals
        let fee_model_id = env.register(PercentageFeeModel, ());
        PercentageFeeModelClient::new(&env, &fee_model_id).initialize(
            &admin,
            &beneficiary,
            &2000i128,
            &100i128,
        );

        let nft_id = env.register(DepositNft, ());
        let nft = DepositNftClient::new(&env, &nft_id);
        nft.initialize(&admin);
        nft.set_minter(&pool_id);

        let multitoken_id = env.register(FundingMultitoken, ());
        let multitoken = FundingMultitokenClient::new(&env, &multitoken_id);
        multitoken.initialize(&admin);
        multitoken.set_minter(&pool_id);

        let reward_minter_id = env.register(MockRewardMinter, ());
        let reward_token = env
            .register_stellar_asset_contract_v2(reward_minter_id.clone())
            .address();
        MockRewardMinterClient::new(&env, &reward_minter_id).initialize(&reward_token, &pool_id);

        let config = PoolConfig {
            stablecoin: stablecoin.clone(),
            money_market: vault_id.clone(),
            interest_oracle: oracle_id.clone(),
            interest_model: interest_model_id.clone(),
            fee_model: fee_model_id.clone(),
            deposit_nft: nft_id.clone(),
            funding_multitoken: multitoken_id.clone(),
            reward_minter: None,
            reward_token: None,
            min_deposit_amount: SCALE,
            max_deposit_amount: 1_000_000 * SCALE,
            min_deposit_period: DAY,
            max_deposit_period: 3 * YEAR,
        };
        FixedRatePoolClient::new(&env, &pool_id).initialize(&admin, &config);

        TestContext {
            env,
            admin,
            beneficiary,
            stablecoin,
            pool_id,
            vault_id,
            oracle_id,
            interest_model_id,
            fee_model_id,
            nft_id,
            multitoken_id,
            reward_minter_id,
            reward_token,
        }
    }

    // Clients
    pub fn pool(&self) -> FixedRatePoolClient<'_> {
        FixedRatePoolClient::new(&self.env, &self.pool_id)
    }

    pub fn vault(&self) -> VaultMoneyMarketClient<'_> {
        VaultMoneyMarketClient::new(&self.env, &self.vault_id)
    }

    pub fn oracle(&self) -> EmaOracleClient<'_> {
        EmaOracleClient::new(&self.env, &self.oracle_id)
    }

    pub fn nft(&self) -> DepositNftClient<'_> {
        DepositNftClient::new(&self.env, &self.nft_id)
    }

    pub fn multitoken(&self) -> FundingMultitokenClient<'_> {
        FundingMultitokenClient::new(&self.env, &self.multitoken_id)
    }

    pub fn reward_minter(&self) -> MockRewardMinterClient<'_> {
        MockRewardMinterClient::new(&self.env, &self.reward_minter_id)
    }

    pub fn token(&self) -> token::Client<'_> {
        token::Client::new(&self.env, &self.stablecoin)
    }

    pub fn balance(&self, holder: &Address) -> i128 {
        self.token().balance(holder)
    }

    // Actors
    pub fn user(&self) -> Address {
        let user = Address::generate(&self.env);
        StellarAssetClient::new(&self.env, &self.stablecoin).mint(&user, &USER_BALANCE);
        user
    }

    pub fn enable_rewards(&self) {
        self.pool().set_reward_minter(
            &Some(self.reward_minter_id.clone()),
            &Some(self.reward_token.clone()),
        );
    }

    // Time & yield
    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn advance(&self, seconds: u64) {
        self.env.ledger().with_mut(|li| li.timestamp += seconds);
    }

    /// Floating yield: tokens arriving at the vault raise its income index
    pub fn accrue_yield(&self, amount: i128) {
        StellarAssetClient::new(&self.env, &self.stablecoin).mint(&self.vault_id, &amount);
    }

    /// Second pool, sharing this context's strategies and stablecoin, whose
    /// money market re-enters it on every deposit
    pub fn reentrant_pool(&self) -> Address {
        let env = &self.env;
        let pool_id = env.register(FixedRatePool, ());

        let market_id = env.register(ReentrantMoneyMarket, ());
        ReentrantMoneyMarketClient::new(env, &market_id).initialize(&pool_id);

        let oracle_id = env.register(EmaOracle, ());
        EmaOracleClient::new(env, &oracle_id).initialize(
            &self.admin,
            &market_id,
            &DAY,
            &2u32,
            &29u32,
            &INITIAL_RATE,
        );

        let config = PoolConfig {
            stablecoin: self.stablecoin.clone(),
            money_market: market_id,
            interest_oracle: oracle_id,
            interest_model: self.interest_model_id.clone(),
            fee_model: self.fee_model_id.clone(),
            deposit_nft: self.nft_id.clone(),
            funding_multitoken: self.multitoken_id.clone(),
            reward_minter: None,
            reward_token: None,
            min_deposit_amount: SCALE,
            max_deposit_amount: 1_000_000 * SCALE,
            min_deposit_period: DAY,
            max_deposit_period: 3 * YEAR,
        };
        FixedRatePoolClient::new(env, &pool_id).initialize(&self.admin, &config);
        pool_id
    }

    pub fn deposit(&self, depositor: &Address, amount: i128, period: u64) -> u64 {
        let (deposit_id, _) = self.pool().deposit(depositor, &amount, &(self.now() + period));
        deposit_id
    }
}

pub fn assert_close(actual: i128, expected: i128, tolerance: i128) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {}, got {}",
        expected,
        tolerance,
        actual
    );
}
