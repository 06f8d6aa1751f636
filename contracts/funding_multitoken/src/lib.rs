#![no_std]

mod dividend;
mod error;
mod events;
mod storage;

pub use error::Error;
use events::{BurnEvent, DividendInjectedEvent, DividendWithdrawnEvent, MintEvent, TransferEvent};
pub use storage::PRECISION;
use storage::{
    extend_instance, read_balance, read_dividend_per_unit, read_dividend_tokens,
    read_holder_dividend, read_total_supply, write_balance, write_holder_dividend,
    write_total_supply, DataKey,
};

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

/// Multi-holder claim on pool fundings. Each funding id is its own
/// fungible class, and any token injected against an id is paid out
/// pro rata to that id's holders.
#[contract]
pub struct FundingMultitoken;

#[contractimpl]
impl FundingMultitoken {
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

    /// Mint funding units (minter only)
    ///
    /// # Errors
    /// - `NotInitialized`: No minter configured
    /// - `InvalidAmount`: Amount <= 0
    pub fn mint(env: Env, to: Address, funding_id: u64, amount: i128) -> Result<(), Error> {
        Self::require_minter(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance = read_balance(&env, funding_id, &to);
        dividend::settle_holder(&env, funding_id, &to, balance)?;

        let new_balance = balance.checked_add(amount).ok_or(Error::MathOverflow)?;
        let new_supply = read_total_supply(&env, funding_id)
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;

        write_balance(&env, funding_id, &to, new_balance);
        write_total_supply(&env, funding_id, new_supply);

        env.events().publish(
            (Symbol::new(&env, "mint"), funding_id),
            MintEvent {
                funding_id,
                to,
                amount,
            },
        );

        Ok(())
    }

    /// Burn funding units (minter only)
    ///
    /// # Errors
    /// - `NotInitialized`: No minter configured
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn(env: Env, from: Address, funding_id: u64, amount: i128) -> Result<(), Error> {
        Self::require_minter(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance = read_balance(&env, funding_id, &from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }

        dividend::settle_holder(&env, funding_id, &from, balance)?;

        write_balance(&env, funding_id, &from, balance - amount);
        write_total_supply(&env, funding_id, read_total_supply(&env, funding_id) - amount);

        env.events().publish(
            (Symbol::new(&env, "burn"), funding_id),
            BurnEvent {
                funding_id,
                from,
                amount,
            },
        );

        Ok(())
    }

    /// Transfer funding units between holders. Dividends earned so far
    /// stay with the sender.
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer(
        env: Env,
        from: Address,
        to: Address,
        funding_id: u64,
        amount: i128,
    ) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        let from_balance = read_balance(&env, funding_id, &from);
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }
        let to_balance = read_balance(&env, funding_id, &to);

        dividend::settle_holder(&env, funding_id, &from, from_balance)?;
        dividend::settle_holder(&env, funding_id, &to, to_balance)?;

        let new_to_balance = to_balance.checked_add(amount).ok_or(Error::MathOverflow)?;
        write_balance(&env, funding_id, &from, from_balance - amount);
        write_balance(&env, funding_id, &to, new_to_balance);

        env.events().publish(
            (Symbol::new(&env, "transfer"), funding_id),
            TransferEvent {
                funding_id,
                from,
                to,
                amount,
            },
        );

        Ok(())
    }

    /// Distribute `amount` of `token` to the holders of `funding_id`.
    /// The tokens must already have been transferred to this contract.
    ///
    /// # Errors
    /// - `NotInitialized`: No minter configured
    /// - `InvalidAmount`: Amount <= 0
    /// - `NoSupply`: Nobody holds the funding id
    pub fn inject_dividend(
        env: Env,
        funding_id: u64,
        token: Address,
        amount: i128,
    ) -> Result<(), Error> {
        Self::require_minter(&env)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let supply = read_total_supply(&env, funding_id);
        let dividend_per_unit = dividend::distribute(&env, funding_id, &token, amount, supply)?;

        env.events().publish(
            (Symbol::new(&env, "dividend"), funding_id),
            DividendInjectedEvent {
                funding_id,
                token,
                amount,
                dividend_per_unit,
            },
        );

        Ok(())
    }

    /// Pay out everything `holder` has earned in `token` on `funding_id`
    pub fn withdraw_dividend(
        env: Env,
        holder: Address,
        funding_id: u64,
        token: Address,
    ) -> Result<i128, Error> {
        holder.require_auth();

        let balance = read_balance(&env, funding_id, &holder);
        let mut position =
            dividend::settle_holder_token(&env, funding_id, &holder, &token, balance)?;

        let amount = position.unclaimed;
        if amount == 0 {
            return Ok(0);
        }

        position.unclaimed = 0;
        write_holder_dividend(&env, funding_id, &holder, &token, &position);

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &holder,
            &amount,
        );

        env.events().publish(
            (Symbol::new(&env, "dividend_withdrawn"), funding_id),
            DividendWithdrawnEvent {
                funding_id,
                holder,
                token,
                amount,
            },
        );

        Ok(amount)
    }

    /// Dividend `holder` could withdraw right now
    pub fn dividend_of(
        env: Env,
        holder: Address,
        funding_id: u64,
        token: Address,
    ) -> Result<i128, Error> {
        let balance = read_balance(&env, funding_id, &holder);
        let per_unit = read_dividend_per_unit(&env, funding_id, &token);
        let position = read_holder_dividend(&env, funding_id, &holder, &token);

        let pending = dividend::calculate_pending(balance, per_unit, position.dividend_debt)?;
        position
            .unclaimed
            .checked_add(pending)
            .ok_or(Error::MathOverflow)
    }

    pub fn balance_of(env: Env, holder: Address, funding_id: u64) -> i128 {
        read_balance(&env, funding_id, &holder)
    }

    pub fn total_supply(env: Env, funding_id: u64) -> i128 {
        read_total_supply(&env, funding_id)
    }

    pub fn dividend_tokens(env: Env, funding_id: u64) -> Vec<Address> {
        read_dividend_tokens(&env, funding_id)
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
