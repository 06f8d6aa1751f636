#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{BurnEvent, MintEvent, TransferEvent};
use storage::{
    extend_instance, read_balance, read_owner, remove_owner, write_balance, write_owner, DataKey,
};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// Non-fungible claim on a single pool deposit. The token id equals the
/// deposit id, and whoever holds it may withdraw, top up or roll over.
#[contract]
pub struct DepositNft;

#[contractimpl]
impl DepositNft {
    /// Initialize the token contract
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        extend_instance(&env);

        Ok(())
    }

    /// Set the minter (the pool contract)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn set_minter(env: Env, minter: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Minter, &minter);
        extend_instance(&env);
        Ok(())
    }

    pub fn minter(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Minter)
    }

    /// Mint `token_id` to `to` (minter only)
    ///
    /// # Errors
    /// - `NotInitialized`: No minter configured
    /// - `TokenAlreadyExists`: Token id is already held
    pub fn mint(env: Env, to: Address, token_id: u64) -> Result<(), Error> {
        Self::require_minter(&env)?;

        if read_owner(&env, token_id).is_some() {
            return Err(Error::TokenAlreadyExists);
        }

        write_owner(&env, token_id, &to);
        let balance = read_balance(&env, &to);
        write_balance(&env, &to, balance.saturating_add(1));

        env.events().publish(
            (Symbol::new(&env, "mint"), token_id),
            MintEvent { token_id, to },
        );

        Ok(())
    }

    /// Burn `token_id` (minter only)
    ///
    /// # Errors
    /// - `NotInitialized`: No minter configured
    /// - `TokenNotFound`: Token does not exist
    pub fn burn(env: Env, token_id: u64) -> Result<(), Error> {
        Self::require_minter(&env)?;

        let owner = read_owner(&env, token_id).ok_or(Error::TokenNotFound)?;

        remove_owner(&env, token_id);
        let balance = read_balance(&env, &owner);
        write_balance(&env, &owner, balance.saturating_sub(1));

        env.events().publish(
            (Symbol::new(&env, "burn"), token_id),
            BurnEvent { token_id, owner },
        );

        Ok(())
    }

    /// Transfer `token_id` between holders
    ///
    /// # Errors
    /// - `TokenNotFound`: Token does not exist
    /// - `NotTokenOwner`: `from` does not hold the token
    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64) -> Result<(), Error> {
        from.require_auth();

        let owner = read_owner(&env, token_id).ok_or(Error::TokenNotFound)?;
        if owner != from {
            return Err(Error::NotTokenOwner);
        }

        write_owner(&env, token_id, &to);
        write_balance(&env, &from, read_balance(&env, &from).saturating_sub(1));
        write_balance(&env, &to, read_balance(&env, &to).saturating_add(1));

        env.events().publish(
            (Symbol::new(&env, "transfer"), token_id),
            TransferEvent { token_id, from, to },
        );

        Ok(())
    }

    /// Current holder of `token_id`
    ///
    /// # Errors
    /// - `TokenNotFound`: Token does not exist or was burned
    pub fn owner_of(env: Env, token_id: u64) -> Result<Address, Error> {
        read_owner(&env, token_id).ok_or(Error::TokenNotFound)
    }

    pub fn balance_of(env: Env, holder: Address) -> u32 {
        read_balance(&env, &holder)
    }

    pub fn exists(env: Env, token_id: u64) -> bool {
        read_owner(&env, token_id).is_some()
    }

    fn require_minter(env: &Env) -> Result<(), Error> {
        let minter: Address = env
            .storage()
            .instance()
            .get(&DataKey::Minter)
            .ok_or(Error::NotInitialized)?;
        minter.require_auth();
        extend_instance(env);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    fn setup(env: &Env) -> (DepositNftClient<'_>, Address) {
        let contract_id = env.register(DepositNft, ());
        let client = DepositNftClient::new(env, &contract_id);

        let admin = Address::generate(env);
        let minter = Address::generate(env);
        client.initialize(&admin);
        client.set_minter(&minter);

        (client, minter)
    }

    #[test]
    fn test_initialize() {
        let env = Env::default();
        env.mock_all_auths();

        let (client, _) = setup(&env);
        let admin = Address::generate(&env);

        let result = client.try_initialize(&admin);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_mint_and_owner() {
        let env = Env::default();
        env.mock_all_auths();

        let (client, _) = setup(&env);
        let user = Address::generate(&env);

        client.mint(&user, &1);
        client.mint(&user, &2);

        assert_eq!(client.owner_of(&1), user);
        assert_eq!(client.balance_of(&user), 2);
        assert!(client.exists(&2));

        let result = client.try_mint(&user, &1);
        assert_eq!(result, Err(Ok(Error::TokenAlreadyExists)));
    }

    #[test]
    fn test_transfer() {
        let env = Env::default();
        env.mock_all_auths();

        let (client, _) = setup(&env);
        let user1 = Address::generate(&env);
        let user2 = Address::generate(&env);

        client.mint(&user1, &7);
        client.transfer(&user1, &user2, &7);

        assert_eq!(client.owner_of(&7), user2);
        assert_eq!(client.balance_of(&user1), 0);
        assert_eq!(client.balance_of(&user2), 1);

        let result = client.try_transfer(&user1, &user2, &7);
        assert_eq!(result, Err(Ok(Error::NotTokenOwner)));
    }

    #[test]
    fn test_burn() {
        let env = Env::default();
        env.mock_all_auths();

        let (client, _) = setup(&env);
        let user = Address::generate(&env);

        client.mint(&user, &3);
        client.burn(&3);

        assert!(!client.exists(&3));
        assert_eq!(client.balance_of(&user), 0);
        assert_eq!(client.try_owner_of(&3), Err(Ok(Error::TokenNotFound)));
        assert_eq!(client.try_burn(&3), Err(Ok(Error::TokenNotFound)));
    }

    #[test]
    fn test_mint_without_minter() {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register(DepositNft, ());
        let client = DepositNftClient::new(&env, &contract_id);
        client.initialize(&Address::generate(&env));

        let result = client.try_mint(&Address::generate(&env), &1);
        assert_eq!(result, Err(Ok(Error::NotInitialized)));
    }
}
