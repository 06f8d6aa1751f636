use crate::accounting::Accounting;
use crate::error::Error;
use crate::events::{FundedEvent, FunderInterestPaidEvent};
use crate::math;
use crate::settlement::Settlement;
use crate::storage::{
    Deposit, Funding, PoolAccounting, Storage, MAX_AMOUNT, MAX_BATCH_SIZE,
};
use crate::validation::Validator;
use soroban_sdk::{log, Address, Env, Symbol};

pub struct FundingOps;

impl FundingOps {
    // ============================================
    // FUNDER INTEREST
    // ============================================

    /// Pay a funding the yield its covered amount earned since the last
    /// payout, move its recorded index up to `index` and queue the funder
    /// reward for the elapsed time. The payout never exceeds what the
    /// deposit holds in the venue.
    pub fn settle_interest(
        deposit: &mut Deposit,
        funding: &mut Funding,
        accounting: &mut PoolAccounting,
        index: i128,
        now: u64,
        settlement: &mut Settlement,
    ) -> Result<i128, Error> {
        let accrued = math::funder_interest(
            funding.funded_virtual_amount,
            funding.recorded_income_index,
            index,
        )?;
        let value = math::from_scaled(deposit.scaled_balance, index)?;
        let interest = accrued.min(value);

        if index > funding.recorded_income_index {
            accounting.remove_funding(
                funding.funded_virtual_amount,
                funding.recorded_income_index,
            )?;
            funding.recorded_income_index = index;
            accounting.add_funding(funding.funded_virtual_amount, index)?;
        }

        if interest > 0 {
            let scaled = math::to_scaled_up(interest, index)?.min(deposit.scaled_balance);
            deposit.scaled_balance -= scaled;
            funding.total_interest_paid = math::add(funding.total_interest_paid, interest)?;
            accounting.record_funder_payout(interest)?;
            settlement.pay_dividend(funding.id, interest)?;
        }

        let elapsed = now.saturating_sub(funding.last_payout_timestamp);
        settlement.accrue_funder_reward(funding.id, funding.principal_paid, elapsed);
        funding.last_payout_timestamp = now;

        Ok(interest)
    }

    /// # Errors
    /// - `DepositNotFunded`: Deposit was never funded
    pub fn pay_interest_to_funders(env: &Env, deposit_id: u64) -> Result<i128, Error> {
        let config = Storage::get_config(env)?;
        let mut deposit = Storage::get_deposit(env, deposit_id)?;
        if deposit.funding_id == 0 {
            return Err(Error::DepositNotFunded);
        }
        let mut funding = Storage::get_funding(env, deposit.funding_id)?;

        let index = Accounting::income_index(env, &config)?;
        let now = env.ledger().timestamp();

        let mut accounting = Storage::get_accounting(env);
        let mut settlement = Settlement::new(env);
        let interest = Self::settle_interest(
            &mut deposit,
            &mut funding,
            &mut accounting,
            index,
            now,
            &mut settlement,
        )?;

        Storage::set_deposit(env, &deposit);
        Storage::set_funding(env, &funding);
        Storage::set_accounting(env, &accounting);

        settlement.execute(env, &config)?;

        env.events().publish(
            (Symbol::new(env, "funder_interest_paid"), funding.id),
            FunderInterestPaidEvent {
                funding_id: funding.id,
                deposit_id,
                interest,
                income_index: index,
            },
        );

        Ok(interest)
    }

    // ============================================
    // FUNDING
    // ============================================

    /// Cover up to `amount` of a deposit's deficit. Returns the funding id
    /// and the stablecoin actually taken.
    ///
    /// # Errors
    /// - `ContractPaused`: Contract is paused
    /// - `DepositNotFound`: Deposit doesn't exist or is closed
    /// - `AlreadyMatured`: Deposit has matured
    /// - `InvalidAmount`: Amount <= 0, or too small to cover anything
    /// - `NoDeficitToFund`: Deposit is in surplus or fully covered
    pub fn fund(
        env: &Env,
        funder: &Address,
        deposit_id: u64,
        amount: i128,
    ) -> Result<(u64, i128), Error> {
        Validator::check_not_paused(env)?;
        let config = Storage::get_config(env)?;

        let mut deposit = Storage::get_deposit(env, deposit_id)?;
        Validator::require_active(&deposit)?;
        let now = env.ledger().timestamp();
        Validator::require_not_matured(&deposit, now)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let index = Accounting::income_index(env, &config)?;
        let existing = Accounting::funding_of(env, &deposit)?;

        let deficit = Accounting::deposit_surplus(&deposit, existing.as_ref(), index)?.deficit();
        let covered_before = existing
            .as_ref()
            .map(|f| f.funded_virtual_amount)
            .unwrap_or(0);
        let uncovered = math::sub(deposit.virtual_token_total_supply, covered_before)?;
        if deficit <= 0 || uncovered <= 0 {
            return Err(Error::NoDeficitToFund);
        }

        let funded_amount = amount.min(deficit);
        let covered = math::mul_div(uncovered, funded_amount, deficit)?;
        if covered <= 0 {
            return Err(Error::InvalidAmount);
        }

        let mut accounting = Storage::get_accounting(env);
        let mut settlement = Settlement::new(env);

        let mut funding = match existing {
            Some(mut funding) => {
                Self::settle_interest(
                    &mut deposit,
                    &mut funding,
                    &mut accounting,
                    index,
                    now,
                    &mut settlement,
                )?;
                funding
            }
            None => Funding {
                id: Storage::next_funding_id(env),
                deposit_id,
                principal_paid: 0,
                funded_virtual_amount: 0,
                recorded_income_index: index,
                creation_timestamp: now,
                last_payout_timestamp: now,
                total_interest_paid: 0,
                total_refunded: 0,
            },
        };

        accounting.remove_funding(funding.funded_virtual_amount, funding.recorded_income_index)?;
        funding.funded_virtual_amount = math::add(funding.funded_virtual_amount, covered)?;
        funding.recorded_income_index = index;
        accounting.add_funding(funding.funded_virtual_amount, index)?;

        funding.principal_paid = math::add(funding.principal_paid, funded_amount)?;
        deposit.scaled_balance = math::add(
            deposit.scaled_balance,
            math::to_scaled(funded_amount, index)?,
        )?;
        deposit.funding_id = funding.id;

        Storage::set_deposit(env, &deposit);
        Storage::set_funding(env, &funding);
        Storage::set_accounting(env, &accounting);

        settlement.pull(funder, funded_amount);
        settlement.mint_funding(funder, funding.id, covered);
        settlement.execute(env, &config)?;

        log!(env, "funded", deposit_id, funded_amount, covered);

        env.events().publish(
            (Symbol::new(env, "funded"), funding.id),
            FundedEvent {
                funding_id: funding.id,
                deposit_id,
                funder: funder.clone(),
                funded_amount,
                covered_virtual_amount: covered,
            },
        );

        Ok((funding.id, funded_amount))
    }

    /// Fund the whole deficit of every deposit in
    /// `[from_deposit_id, from_deposit_id + count)` that has one
    ///
    /// # Errors
    /// - `InvalidAmount`: count is 0
    /// - `BatchTooLarge`: count above MAX_BATCH_SIZE
    /// - `NoDeficitToFund`: Nothing in range needed funding
    pub fn fund_multiple(
        env: &Env,
        funder: &Address,
        from_deposit_id: u64,
        count: u32,
    ) -> Result<i128, Error> {
        Validator::validate_batch_size(count)?;

        let last_id = Storage::deposit_count(env);
        let first_id = from_deposit_id.max(1);
        let end_id = from_deposit_id
            .saturating_add(count as u64)
            .min(last_id.saturating_add(1));

        let mut total_funded: i128 = 0;
        for deposit_id in first_id..end_id {
            match Self::fund(env, funder, deposit_id, MAX_AMOUNT) {
                Ok((_, funded)) => {
                    total_funded = math::add(total_funded, funded)?;
                }
                Err(Error::NoDeficitToFund)
                | Err(Error::AlreadyMatured)
                | Err(Error::DepositNotFound) => continue,
                Err(e) => return Err(e),
            }
        }

        if total_funded == 0 {
            return Err(Error::NoDeficitToFund);
        }
        Ok(total_funded)
    }

    /// Fund every deficit in the `MAX_BATCH_SIZE` deposit ids starting at the
    /// funding cursor. Deposits past that window are reached with
    /// `fund_multiple`, or by `fund_all` once the ones ahead of them close.
    ///
    /// # Errors
    /// - `NoDeficitToFund`: No deposit in the window needed funding
    pub fn fund_all(env: &Env, funder: &Address) -> Result<i128, Error> {
        let count = Storage::deposit_count(env);
        let cursor = Self::advance_cursor(env, env.ledger().timestamp());
        if cursor > count {
            return Err(Error::NoDeficitToFund);
        }

        let window = (count - cursor + 1).min(MAX_BATCH_SIZE as u64);
        Self::fund_multiple(env, funder, cursor, window as u32)
    }

    /// Move the funding cursor past deposits that can never be funded again
    /// (closed or matured). Looks at no more than `MAX_BATCH_SIZE` ids per
    /// call; each id is passed once over the life of the pool.
    pub fn advance_cursor(env: &Env, now: u64) -> u64 {
        let count = Storage::deposit_count(env);
        let start = Storage::fund_cursor(env);

        let mut cursor = start;
        let mut steps: u32 = 0;
        while cursor <= count && steps < MAX_BATCH_SIZE {
            match Storage::get_deposit(env, cursor) {
                Ok(deposit)
                    if deposit.virtual_token_total_supply > 0
                        && now < deposit.maturation_timestamp =>
                {
                    break
                }
                _ => {}
            }
            cursor += 1;
            steps += 1;
        }

        if cursor != start {
            Storage::set_fund_cursor(env, cursor);
        }
        cursor
    }
}
