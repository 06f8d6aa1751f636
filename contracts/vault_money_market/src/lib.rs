#![no_std]

mod error;
mod events;
mod shares;
mod storage;

pub use error::Error;
use events::{DepositedEvent, WithdrawnEvent};
pub use storage::PRECISION;
use storage::{
    extend_instance, read_last_index, read_total_shares, write_last_index, write_total_shares,
    DataKey,
};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

/// Single-asset yield venue holding the pool's stablecoin. Yield shows up
/// as tokens arriving at the vault address, which raises the income index
/// of the outstanding shares.
#[contract]
pub struct VaultMoneyMarket;

#[contractimpl]
impl VaultMoneyMarket {
    /// Initialize the vault
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        pool: Address,
        stablecoin: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Pool, &pool);
        env.storage().instance().set(&DataKey::Stablecoin, &stablecoin);
        write_total_shares(&env, 0);
        write_last_index(&env, PRECISION);
        extend_instance(&env);

        Ok(())
    }

    /// Point the vault at a new pool
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn set_pool(env: Env, pool: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Pool, &pool);
        Ok(())
    }

    /// Credit `amount` of stablecoin the pool already transferred in
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0, or the tokens never arrived
    pub fn deposit(env: Env, amount: i128) -> Result<(), Error> {
        Self::require_pool(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let total_value = Self::balance(&env)?;
        let value_before = total_value.checked_sub(amount).ok_or(Error::MathOverflow)?;
        if value_before < 0 {
            return Err(Error::InvalidAmount);
        }

        let total_shares = read_total_shares(&env);
        let last_index = read_last_index(&env);
        let minted =
            shares::calculate_shares_to_mint(amount, value_before, total_shares, last_index)?;
        let new_shares = total_shares.checked_add(minted).ok_or(Error::MathOverflow)?;
        write_total_shares(&env, new_shares);

        let income_index = shares::calculate_income_index(total_value, new_shares, last_index)?;
        write_last_index(&env, income_index);
        extend_instance(&env);

        env.events().publish(
            (Symbol::new(&env, "deposited"),),
            DepositedEvent {
                amount,
                shares_minted: minted,
                income_index,
            },
        );

        Ok(())
    }

    /// Send `amount` of stablecoin back to the pool
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientLiquidity`: Vault holds less than `amount`
    pub fn withdraw(env: Env, amount: i128) -> Result<i128, Error> {
        let pool = Self::require_pool(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let total_value = Self::balance(&env)?;
        if amount > total_value {
            return Err(Error::InsufficientLiquidity);
        }

        let total_shares = read_total_shares(&env);
        let last_index = read_last_index(&env);
        let income_index = shares::calculate_income_index(total_value, total_shares, last_index)?;
        let burned = shares::calculate_shares_to_burn(amount, total_value, total_shares)?;

        write_total_shares(&env, total_shares - burned);
        write_last_index(&env, income_index);
        extend_instance(&env);

        let stablecoin = Self::stablecoin(&env)?;
        token::Client::new(&env, &stablecoin).transfer(
            &env.current_contract_address(),
            &pool,
            &amount,
        );

        log!(&env, "vault withdraw", amount, burned);

        env.events().publish(
            (Symbol::new(&env, "withdrawn"),),
            WithdrawnEvent {
                amount,
                shares_burned: burned,
                income_index,
            },
        );

        Ok(amount)
    }

    /// Everything the vault currently holds
    pub fn total_value(env: Env) -> Result<i128, Error> {
        Self::balance(&env)
    }

    /// Current value of one share, scaled by PRECISION
    pub fn income_index(env: Env) -> Result<i128, Error> {
        let total_value = Self::balance(&env)?;
        shares::calculate_income_index(total_value, read_total_shares(&env), read_last_index(&env))
    }

    pub fn total_shares(env: Env) -> i128 {
        read_total_shares(&env)
    }

    pub fn stablecoin_address(env: Env) -> Result<Address, Error> {
        Self::stablecoin(&env)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_pool(env: &Env) -> Result<Address, Error> {
        let pool: Address = env
            .storage()
            .instance()
            .get(&DataKey::Pool)
            .ok_or(Error::NotInitialized)?;
        pool.require_auth();
        Ok(pool)
    }

    fn stablecoin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Stablecoin)
            .ok_or(Error::NotInitialized)
    }

    fn balance(env: &Env) -> Result<i128, Error> {
        let stablecoin = Self::stablecoin(env)?;
        Ok(token::Client::new(env, &stablecoin).balance(&env.current_contract_address()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, token::StellarAssetClient, Address, Env};

    const SCALE: i128 = 10_000_000;

    struct Setup<'a> {
        client: VaultMoneyMarketClient<'a>,
        pool: Address,
        token: token::Client<'a>,
        token_admin: StellarAssetClient<'a>,
    }

    fn setup(env: &Env) -> Setup<'_> {
        let issuer = Address::generate(env);
        let stablecoin = env.register_stellar_asset_contract_v2(issuer).address();

        let contract_id = env.register(VaultMoneyMarket, ());
        let client = VaultMoneyMarketClient::new(env, &contract_id);

        let pool = Address::generate(env);
        client.initialize(&Address::generate(env), &pool, &stablecoin);

        Setup {
            client,
            pool,
            token: token::Client::new(env, &stablecoin),
            token_admin: StellarAssetClient::new(env, &stablecoin),
        }
    }

    fn deposit(s: &Setup, amount: i128) {
        s.token_admin.mint(&s.client.address, &amount);
        s.client.deposit(&amount);
    }

    #[test]
    fn test_initialize() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        assert_eq!(s.client.income_index(), PRECISION);
        assert_eq!(s.client.total_value(), 0);

        let result = s.client.try_initialize(&s.pool, &s.pool, &s.token.address);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_deposit_mints_shares() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        deposit(&s, 100 * SCALE);

        assert_eq!(s.client.total_shares(), 100 * SCALE);
        assert_eq!(s.client.total_value(), 100 * SCALE);
        assert_eq!(s.client.income_index(), PRECISION);
    }

    #[test]
    fn test_yield_raises_index() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        deposit(&s, 100 * SCALE);
        s.token_admin.mint(&s.client.address, &(10 * SCALE));

        assert_eq!(s.client.income_index(), PRECISION + PRECISION / 10);

        // New money buys shares at the higher index
        deposit(&s, 11 * SCALE);
        assert_eq!(s.client.total_shares(), 110 * SCALE);
        assert_eq!(s.client.income_index(), PRECISION + PRECISION / 10);
    }

    #[test]
    fn test_withdraw_to_pool() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        deposit(&s, 100 * SCALE);

        let paid = s.client.withdraw(&(40 * SCALE));
        assert_eq!(paid, 40 * SCALE);
        assert_eq!(s.token.balance(&s.pool), 40 * SCALE);
        assert_eq!(s.client.total_shares(), 60 * SCALE);
        assert_eq!(s.client.income_index(), PRECISION);
    }

    #[test]
    fn test_withdraw_more_than_held() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        deposit(&s, 10 * SCALE);

        let result = s.client.try_withdraw(&(11 * SCALE));
        assert_eq!(result, Err(Ok(Error::InsufficientLiquidity)));
    }

    #[test]
    fn test_deposit_without_transfer() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        let result = s.client.try_deposit(&SCALE);
        assert_eq!(result, Err(Ok(Error::InvalidAmount)));
    }

    #[test]
    fn test_empty_vault_keeps_index() {
        let env = Env::default();
        env.mock_all_auths();

        let s = setup(&env);
        deposit(&s, 100 * SCALE);
        s.token_admin.mint(&s.client.address, &(20 * SCALE));

        s.client.withdraw(&(120 * SCALE));
        assert_eq!(s.client.total_shares(), 0);
        assert_eq!(s.client.income_index(), PRECISION + PRECISION / 5);
    }
}
