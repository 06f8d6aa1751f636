//! Call contracts of the pool's collaborators. The pool only ever holds
//! their addresses, so any venue or strategy honoring these signatures
//! can be plugged in through `PoolConfig`.

use soroban_sdk::{contractclient, Address, Env};

/// Yield venue the pool parks all stablecoin in
#[contractclient(name = "MoneyMarketClient")]
pub trait MoneyMarket {
    /// Credit `amount` the caller already transferred to the venue
    fn deposit(env: Env, amount: i128);
    /// Send `amount` back to the caller
    fn withdraw(env: Env, amount: i128) -> i128;
    /// Redeemable value of everything the venue holds for the pool
    fn total_value(env: Env) -> i128;
    /// Value of one venue share, scaled by 1e18
    fn income_index(env: Env) -> i128;
}

#[contractclient(name = "InterestOracleClient")]
pub trait InterestOracle {
    /// Smoothed venue rate per second, scaled by 1e18
    fn update_and_query(env: Env) -> i128;
    fn money_market(env: Env) -> Address;
}

#[contractclient(name = "InterestModelClient")]
pub trait InterestModel {
    fn calculate_interest_amount(env: Env, principal: i128, period: u64, rate: i128) -> i128;
}

#[contractclient(name = "FeeModelClient")]
pub trait FeeModel {
    fn calculate_fee_amount(env: Env, interest_amount: i128) -> i128;
    fn calculate_early_withdraw_fee(env: Env, principal: i128) -> i128;
    fn beneficiary(env: Env) -> Address;
}

#[contractclient(name = "DepositNftClient")]
pub trait DepositNft {
    fn mint(env: Env, to: Address, token_id: u64);
    fn burn(env: Env, token_id: u64);
    fn owner_of(env: Env, token_id: u64) -> Address;
}

#[contractclient(name = "FundingMultitokenClient")]
pub trait FundingMultitoken {
    fn mint(env: Env, to: Address, funding_id: u64, amount: i128);
    /// Spread `amount` of `token`, already held by the multitoken, over the
    /// holders of `funding_id`
    fn inject_dividend(env: Env, funding_id: u64, token: Address, amount: i128);
}

/// Incentive minter. Depositor calls return what the minter booked in its
/// own ledger; `accrue_funder_reward` mints to the caller and returns the
/// amount minted.
#[contractclient(name = "RewardMinterClient")]
pub trait RewardMinter {
    fn accrue_depositor_reward(env: Env, depositor: Address, amount: i128, period: u64) -> i128;
    fn take_back_depositor_reward(env: Env, depositor: Address, amount: i128, early: bool) -> i128;
    fn accrue_funder_reward(env: Env, funding_id: u64, principal_at_risk: i128, elapsed: u64)
        -> i128;
}
