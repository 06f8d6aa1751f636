use crate::accounting::Accounting;
use crate::error::Error;
use crate::events::{
    DepositCreatedEvent, DepositRolledOverEvent, DepositToppedUpEvent, FundersRefundedEvent,
    WithdrawnEvent,
};
use crate::funding::FundingOps;
use crate::interfaces::FeeModelClient;
use crate::math;
use crate::pricing::Pricing;
use crate::settlement::Settlement;
use crate::storage::{Deposit, Storage, MAX_AMOUNT};
use crate::validation::Validator;
use soroban_sdk::{log, Address, Env, Symbol, Vec};

pub struct DepositOps;

impl DepositOps {
    // ============================================
    // DEPOSIT
    // ============================================

    /// Lock `amount` until `maturation_timestamp` at the rate quoted now.
    /// Returns the deposit id and the guaranteed interest.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `InvalidAmount`: Amount outside the deposit limits
    /// - `InvalidPeriod`: Term outside the period limits
    /// - `InvalidStrategyResult`: Oracle, interest model or fee model misbehaved
    pub fn deposit(
        env: &Env,
        depositor: &Address,
        amount: i128,
        maturation_timestamp: u64,
    ) -> Result<(u64, i128), Error> {
        Validator::check_not_paused(env)?;
        let config = Storage::get_config(env)?;

        Validator::validate_amount(&config, amount)?;
        let now = env.ledger().timestamp();
        let period = Validator::validate_period(&config, now, maturation_timestamp)?;

        let quote = Pricing::quote(env, &config, amount, period)?;
        let index = Accounting::income_index(env, &config)?;

        let deposit = Deposit {
            id: Storage::next_deposit_id(env),
            principal: amount,
            interest_owed: quote.interest,
            fee_owed: quote.fee,
            virtual_token_total_supply: math::add(amount, quote.interest)?,
            scaled_balance: math::to_scaled(amount, index)?,
            creation_timestamp: now,
            maturation_timestamp,
            funding_id: 0,
        };

        let mut accounting = Storage::get_accounting(env);
        accounting.add_deposit(amount, quote.interest, quote.fee)?;

        Storage::set_deposit(env, &deposit);
        Storage::set_accounting(env, &accounting);

        let mut settlement = Settlement::new(env);
        settlement.pull(depositor, amount);
        settlement.mint_nft(depositor, deposit.id);
        settlement.accrue_depositor_reward(depositor, amount, period);
        settlement.execute(env, &config)?;

        env.events().publish(
            (Symbol::new(env, "deposit_created"), deposit.id),
            DepositCreatedEvent {
                deposit_id: deposit.id,
                depositor: depositor.clone(),
                amount,
                interest_owed: quote.interest,
                fee_owed: quote.fee,
                maturation_timestamp,
            },
        );

        Ok((deposit.id, quote.interest))
    }

    /// Add `amount` to an open deposit, priced over the time it has left
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `DepositNotFound`: Deposit doesn't exist or is closed
    /// - `NotOwner`: Caller doesn't hold the deposit NFT
    /// - `AlreadyMatured`: Deposit has matured
    /// - `InvalidAmount`: Amount outside the deposit limits
    pub fn topup(
        env: &Env,
        owner: &Address,
        deposit_id: u64,
        amount: i128,
    ) -> Result<i128, Error> {
        Validator::check_not_paused(env)?;
        let config = Storage::get_config(env)?;

        let mut deposit = Storage::get_deposit(env, deposit_id)?;
        Validator::require_active(&deposit)?;
        Validator::require_owner(env, &config, owner, deposit_id)?;
        let now = env.ledger().timestamp();
        Validator::require_not_matured(&deposit, now)?;
        Validator::validate_amount(&config, amount)?;

        let period = deposit.maturation_timestamp - now;
        let quote = Pricing::quote(env, &config, amount, period)?;
        let index = Accounting::income_index(env, &config)?;

        deposit.principal = math::add(deposit.principal, amount)?;
        deposit.interest_owed = math::add(deposit.interest_owed, quote.interest)?;
        deposit.fee_owed = math::add(deposit.fee_owed, quote.fee)?;
        deposit.virtual_token_total_supply = math::add(
            deposit.virtual_token_total_supply,
            math::add(amount, quote.interest)?,
        )?;
        deposit.scaled_balance =
            math::add(deposit.scaled_balance, math::to_scaled(amount, index)?)?;

        let mut accounting = Storage::get_accounting(env);
        accounting.add_deposit(amount, quote.interest, quote.fee)?;

        Storage::set_deposit(env, &deposit);
        Storage::set_accounting(env, &accounting);

        let mut settlement = Settlement::new(env);
        settlement.pull(owner, amount);
        settlement.accrue_depositor_reward(owner, amount, period);
        settlement.execute(env, &config)?;

        env.events().publish(
            (Symbol::new(env, "deposit_topped_up"), deposit_id),
            DepositToppedUpEvent {
                deposit_id,
                owner: owner.clone(),
                amount,
                interest_added: quote.interest,
                fee_added: quote.fee,
            },
        );

        Ok(quote.interest)
    }

    /// Re-deposit a matured deposit's principal and interest for a new term.
    /// Returns the new deposit id and its guaranteed interest.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `DepositNotFound`: Deposit doesn't exist or is closed
    /// - `NotOwner`: Caller doesn't hold the deposit NFT
    /// - `NotMatured`: Deposit hasn't matured yet
    /// - `InvalidPeriod`: New term outside the period limits
    pub fn rollover(
        env: &Env,
        owner: &Address,
        deposit_id: u64,
        maturation_timestamp: u64,
    ) -> Result<(u64, i128), Error> {
        Validator::check_not_paused(env)?;
        let config = Storage::get_config(env)?;

        let mut old = Storage::get_deposit(env, deposit_id)?;
        Validator::require_active(&old)?;
        Validator::require_owner(env, &config, owner, deposit_id)?;
        let now = env.ledger().timestamp();
        Validator::require_matured(&old, now)?;
        let period = Validator::validate_period(&config, now, maturation_timestamp)?;

        let principal = math::add(old.principal, old.interest_owed)?;
        let quote = Pricing::quote(env, &config, principal, period)?;
        let index = Accounting::income_index(env, &config)?;
        let beneficiary = FeeModelClient::new(env, &config.fee_model).beneficiary();

        let mut accounting = Storage::get_accounting(env);
        let mut settlement = Settlement::new(env);

        // Funders keep what accrued up to now and stop covering the deposit
        if let Some(mut funding) = Accounting::funding_of(env, &old)? {
            FundingOps::settle_interest(
                &mut old,
                &mut funding,
                &mut accounting,
                index,
                now,
                &mut settlement,
            )?;
            accounting.remove_funding(
                funding.funded_virtual_amount,
                funding.recorded_income_index,
            )?;
            funding.funded_virtual_amount = 0;
            funding.principal_paid = 0;
            Storage::set_funding(env, &funding);
        }

        settlement.pay(&beneficiary, old.fee_owed)?;
        let fee_scaled = math::to_scaled_up(old.fee_owed, index)?.min(old.scaled_balance);
        let remaining_scaled = old.scaled_balance - fee_scaled;
        let scaled_balance = remaining_scaled.min(math::to_scaled(principal, index)?);

        let old_principal = old.principal;
        accounting.remove_deposit(old.principal, old.interest_owed, old.fee_owed)?;
        old.principal = 0;
        old.interest_owed = 0;
        old.fee_owed = 0;
        old.virtual_token_total_supply = 0;
        old.scaled_balance = 0;

        let new = Deposit {
            id: Storage::next_deposit_id(env),
            principal,
            interest_owed: quote.interest,
            fee_owed: quote.fee,
            virtual_token_total_supply: math::add(principal, quote.interest)?,
            scaled_balance,
            creation_timestamp: now,
            maturation_timestamp,
            funding_id: 0,
        };
        accounting.add_deposit(principal, quote.interest, quote.fee)?;

        Storage::set_deposit(env, &old);
        Storage::set_deposit(env, &new);
        Storage::set_accounting(env, &accounting);
        FundingOps::advance_cursor(env, now);

        settlement.take_back_depositor_reward(owner, old_principal, false);
        settlement.burn_nft(deposit_id);
        settlement.mint_nft(owner, new.id);
        settlement.accrue_depositor_reward(owner, principal, period);
        settlement.execute(env, &config)?;

        env.events().publish(
            (Symbol::new(env, "deposit_rolled_over"), deposit_id, new.id),
            DepositRolledOverEvent {
                old_deposit_id: deposit_id,
                new_deposit_id: new.id,
                owner: owner.clone(),
                principal,
                interest_owed: quote.interest,
                maturation_timestamp,
            },
        );

        Ok((new.id, quote.interest))
    }

    // ============================================
    // WITHDRAW
    // ============================================

    /// Redeem `virtual_token_amount` of a deposit (MAX_AMOUNT for all of
    /// it). Early exits forfeit interest and pay the early withdrawal fee.
    ///
    /// # Errors
    /// - `DepositNotFound`: Deposit doesn't exist or is closed
    /// - `NotOwner`: Caller doesn't hold the deposit NFT
    /// - `NotMatured`: Normal withdrawal before maturity
    /// - `AlreadyMatured`: Early withdrawal at or after maturity
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Amount above the remaining virtual supply
    pub fn withdraw(
        env: &Env,
        owner: &Address,
        deposit_id: u64,
        virtual_token_amount: i128,
        early: bool,
    ) -> Result<i128, Error> {
        let config = Storage::get_config(env)?;

        let mut deposit = Storage::get_deposit(env, deposit_id)?;
        Validator::require_active(&deposit)?;
        Validator::require_owner(env, &config, owner, deposit_id)?;
        let now = env.ledger().timestamp();
        Validator::validate_withdraw_phase(&deposit, now, early)?;

        let supply = deposit.virtual_token_total_supply;
        let amount = if virtual_token_amount == MAX_AMOUNT {
            supply
        } else {
            virtual_token_amount
        };
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if amount > supply {
            return Err(Error::InsufficientBalance);
        }

        let principal_slice = math::pro_rata(deposit.principal, amount, supply)?;
        let interest_slice = math::sub(amount, principal_slice)?;
        let fee_slice = math::pro_rata(deposit.fee_owed, amount, supply)?;

        let index = Accounting::income_index(env, &config)?;
        let mut funding = Accounting::funding_of(env, &deposit)?;
        let rate = if early && funding.is_some() {
            Pricing::oracle_rate(env, &config)?
        } else {
            0
        };

        let fee_model = FeeModelClient::new(env, &config.fee_model);
        let early_fee = if early {
            let fee = fee_model.calculate_early_withdraw_fee(&principal_slice);
            if fee < 0 || fee > principal_slice {
                return Err(Error::InvalidStrategyResult);
            }
            fee
        } else {
            0
        };
        let beneficiary = fee_model.beneficiary();

        let mut accounting = Storage::get_accounting(env);
        let mut settlement = Settlement::new(env);

        let mut refund: i128 = 0;
        if let Some(funding) = funding.as_mut() {
            FundingOps::settle_interest(
                &mut deposit,
                funding,
                &mut accounting,
                index,
                now,
                &mut settlement,
            )?;

            let funded_slice = math::pro_rata(funding.funded_virtual_amount, amount, supply)?;
            let principal_share = math::pro_rata(funding.principal_paid, amount, supply)?;

            accounting.remove_funding(
                funding.funded_virtual_amount,
                funding.recorded_income_index,
            )?;
            funding.funded_virtual_amount = math::sub(funding.funded_virtual_amount, funded_slice)?;
            funding.principal_paid = math::sub(funding.principal_paid, principal_share)?;
            accounting.add_funding(funding.funded_virtual_amount, funding.recorded_income_index)?;

            if early && funded_slice > 0 {
                let remaining = deposit.maturation_timestamp - now;
                refund = math::early_refund(funded_slice, rate, remaining, principal_share)?;
                settlement.pay_dividend(funding.id, refund)?;
                funding.total_refunded = math::add(funding.total_refunded, refund)?;
            }

            Storage::set_funding(env, funding);
        }

        let (payout, fee) = if early {
            (math::sub(principal_slice, early_fee)?, early_fee)
        } else {
            (math::add(principal_slice, interest_slice)?, fee_slice)
        };
        settlement.pay(owner, payout)?;
        settlement.pay(&beneficiary, fee)?;
        settlement.take_back_depositor_reward(owner, principal_slice, early);

        let scaled_slice = math::pro_rata(deposit.scaled_balance, amount, supply)?;
        deposit.scaled_balance = math::sub(deposit.scaled_balance, scaled_slice)?;
        deposit.principal = math::sub(deposit.principal, principal_slice)?;
        deposit.interest_owed = math::sub(deposit.interest_owed, interest_slice)?;
        deposit.fee_owed = math::sub(deposit.fee_owed, fee_slice)?;
        deposit.virtual_token_total_supply = math::sub(supply, amount)?;
        accounting.remove_deposit(principal_slice, interest_slice, fee_slice)?;

        if deposit.virtual_token_total_supply == 0 {
            settlement.burn_nft(deposit_id);
        }

        Storage::set_deposit(env, &deposit);
        Storage::set_accounting(env, &accounting);
        if deposit.virtual_token_total_supply == 0 {
            FundingOps::advance_cursor(env, now);
        }

        settlement.execute(env, &config)?;

        log!(env, "withdraw", deposit_id, payout, fee, refund);

        if refund > 0 {
            if let Some(funding) = funding {
                env.events().publish(
                    (Symbol::new(env, "funders_refunded"), funding.id),
                    FundersRefundedEvent {
                        funding_id: funding.id,
                        deposit_id,
                        refund,
                    },
                );
            }
        }

        env.events().publish(
            (Symbol::new(env, "withdrawn"), deposit_id),
            WithdrawnEvent {
                deposit_id,
                owner: owner.clone(),
                virtual_token_amount: amount,
                payout,
                fee,
                early,
            },
        );

        Ok(payout)
    }

    // ============================================
    // BATCHES
    // ============================================

    /// # Errors
    /// - `InvalidAmount`: Empty batch or mismatched lengths
    /// - `BatchTooLarge`: More than MAX_BATCH_SIZE entries
    pub fn multi_deposit(
        env: &Env,
        depositor: &Address,
        amounts: &Vec<i128>,
        maturation_timestamps: &Vec<u64>,
    ) -> Result<Vec<u64>, Error> {
        if amounts.len() != maturation_timestamps.len() {
            return Err(Error::InvalidAmount);
        }
        Validator::validate_batch_size(amounts.len())?;

        let mut ids = Vec::new(env);
        for (amount, maturation_timestamp) in amounts.iter().zip(maturation_timestamps.iter()) {
            let (deposit_id, _) = Self::deposit(env, depositor, amount, maturation_timestamp)?;
            ids.push_back(deposit_id);
        }
        Ok(ids)
    }

    /// Returns the total paid out to `owner`
    ///
    /// # Errors
    /// - `InvalidAmount`: Empty batch or mismatched lengths
    /// - `BatchTooLarge`: More than MAX_BATCH_SIZE entries
    pub fn multi_withdraw(
        env: &Env,
        owner: &Address,
        deposit_ids: &Vec<u64>,
        virtual_token_amounts: &Vec<i128>,
        early: &Vec<bool>,
    ) -> Result<i128, Error> {
        if deposit_ids.len() != virtual_token_amounts.len() || deposit_ids.len() != early.len() {
            return Err(Error::InvalidAmount);
        }
        Validator::validate_batch_size(deposit_ids.len())?;

        let mut total_payout: i128 = 0;
        for i in 0..deposit_ids.len() {
            let deposit_id = deposit_ids.get(i).ok_or(Error::InvalidAmount)?;
            let amount = virtual_token_amounts.get(i).ok_or(Error::InvalidAmount)?;
            let is_early = early.get(i).ok_or(Error::InvalidAmount)?;

            let payout = Self::withdraw(env, owner, deposit_id, amount, is_early)?;
            total_payout = math::add(total_payout, payout)?;
        }
        Ok(total_payout)
    }
}
