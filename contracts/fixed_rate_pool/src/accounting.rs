use crate::error::Error;
use crate::interfaces::MoneyMarketClient;
use crate::math;
use crate::storage::{Deposit, Funding, PoolAccounting, PoolConfig, Storage, Surplus, PRECISION};
use soroban_sdk::Env;

impl PoolAccounting {
    pub fn add_deposit(&mut self, principal: i128, interest: i128, fee: i128) -> Result<(), Error> {
        self.total_deposit = math::add(self.total_deposit, principal)?;
        self.total_interest_owed = math::add(self.total_interest_owed, interest)?;
        self.total_fee_owed = math::add(self.total_fee_owed, fee)?;
        Ok(())
    }

    pub fn remove_deposit(
        &mut self,
        principal: i128,
        interest: i128,
        fee: i128,
    ) -> Result<(), Error> {
        self.total_deposit = math::sub(self.total_deposit, principal)?;
        self.total_interest_owed = math::sub(self.total_interest_owed, interest)?;
        self.total_fee_owed = math::sub(self.total_fee_owed, fee)?;
        Ok(())
    }

    pub fn add_funding(&mut self, funded_virtual_amount: i128, recorded_index: i128) -> Result<(), Error> {
        self.total_funded_virtual_amount =
            math::add(self.total_funded_virtual_amount, funded_virtual_amount)?;
        self.funded_virtual_index_sum = math::add(
            self.funded_virtual_index_sum,
            math::index_weight(funded_virtual_amount, recorded_index)?,
        )?;
        Ok(())
    }

    /// Must be called with the same values the funding was added with
    pub fn remove_funding(
        &mut self,
        funded_virtual_amount: i128,
        recorded_index: i128,
    ) -> Result<(), Error> {
        self.total_funded_virtual_amount =
            math::sub(self.total_funded_virtual_amount, funded_virtual_amount)?;
        self.funded_virtual_index_sum = math::sub(
            self.funded_virtual_index_sum,
            math::index_weight(funded_virtual_amount, recorded_index)?,
        )?;
        Ok(())
    }

    pub fn record_funder_payout(&mut self, interest: i128) -> Result<(), Error> {
        self.total_interest_paid_to_funders =
            math::add(self.total_interest_paid_to_funders, interest)?;
        Ok(())
    }

    /// Yield accrued to every funding since its last payout
    ///
    /// Formula: sum(funded * index / recorded) - sum(funded)
    pub fn interest_owed_to_funders(&self, index: i128) -> Result<i128, Error> {
        let grown = math::mul_div(self.funded_virtual_index_sum, index, PRECISION)?;
        Ok((grown - self.total_funded_virtual_amount).max(0))
    }

    /// Everything the venue balance has to cover
    pub fn liabilities(&self, index: i128) -> Result<i128, Error> {
        let owed = math::add(self.total_deposit, self.total_interest_owed)?;
        let owed = math::add(owed, self.total_fee_owed)?;
        math::add(owed, self.interest_owed_to_funders(index)?)
    }
}

pub struct Accounting;

impl Accounting {
    pub fn income_index(env: &Env, config: &PoolConfig) -> Result<i128, Error> {
        let index = MoneyMarketClient::new(env, &config.money_market).income_index();
        if index <= 0 {
            return Err(Error::InvalidStrategyResult);
        }
        Ok(index)
    }

    /// Pool-wide surplus: venue value against every outstanding claim
    pub fn surplus(env: &Env) -> Result<Surplus, Error> {
        let config = Storage::get_config(env)?;
        let market = MoneyMarketClient::new(env, &config.money_market);

        let value = market.total_value();
        let index = Self::income_index(env, &config)?;
        let liabilities = Storage::get_accounting(env).liabilities(index)?;

        Surplus::between(value, liabilities)
    }

    pub fn total_interest_owed_to_funders(env: &Env) -> Result<i128, Error> {
        let config = Storage::get_config(env)?;
        let index = Self::income_index(env, &config)?;
        Storage::get_accounting(env).interest_owed_to_funders(index)
    }

    pub fn surplus_of_deposit(env: &Env, deposit_id: u64) -> Result<Surplus, Error> {
        let config = Storage::get_config(env)?;
        let deposit = Storage::get_deposit(env, deposit_id)?;
        let funding = Self::funding_of(env, &deposit)?;
        let index = Self::income_index(env, &config)?;

        Self::deposit_surplus(&deposit, funding.as_ref(), index)
    }

    /// Value attributable to one deposit against its own claims, funder
    /// yield accrued on it included
    pub fn deposit_surplus(
        deposit: &Deposit,
        funding: Option<&Funding>,
        index: i128,
    ) -> Result<Surplus, Error> {
        let value = math::from_scaled(deposit.scaled_balance, index)?;

        let owed_to_funders = match funding {
            Some(f) => {
                math::funder_interest(f.funded_virtual_amount, f.recorded_income_index, index)?
            }
            None => 0,
        };

        let liability = math::add(deposit.principal, deposit.interest_owed)?;
        let liability = math::add(liability, deposit.fee_owed)?;
        let liability = math::add(liability, owed_to_funders)?;

        Surplus::between(value, liability)
    }

    pub fn funding_of(env: &Env, deposit: &Deposit) -> Result<Option<Funding>, Error> {
        if deposit.funding_id == 0 {
            return Ok(None);
        }
        Ok(Some(Storage::get_funding(env, deposit.funding_id)?))
    }
}
