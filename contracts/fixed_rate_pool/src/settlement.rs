use crate::error::Error;
use crate::interfaces::{
    DepositNftClient, FundingMultitokenClient, MoneyMarketClient, RewardMinterClient,
};
use crate::storage::PoolConfig;
use soroban_sdk::{log, token, vec, Address, Env, Vec};

/// External effects of one ledger operation. Operations write all of their
/// own state first and queue every token movement and collaborator call
/// here, then run `execute` as the very last step.
pub struct Settlement {
    /// (payer, amount) pulled into the money market
    inflows: Vec<(Address, i128)>,
    /// Stablecoin taken out of the money market for payouts and dividends
    market_withdrawal: i128,
    /// (recipient, amount) paid in stablecoin
    transfers: Vec<(Address, i128)>,
    /// (funding_id, amount) stablecoin dividends
    dividends: Vec<(u64, i128)>,
    /// (funding_id, principal_at_risk, elapsed)
    funder_rewards: Vec<(u64, i128, u64)>,
    /// (depositor, amount, period)
    depositor_rewards: Vec<(Address, i128, u64)>,
    /// (depositor, amount, early)
    reward_take_backs: Vec<(Address, i128, bool)>,
    nft_burns: Vec<u64>,
    /// (owner, deposit_id)
    nft_mints: Vec<(Address, u64)>,
    /// (funder, funding_id, units)
    funding_mints: Vec<(Address, u64, i128)>,
}

impl Settlement {
    pub fn new(env: &Env) -> Self {
        Settlement {
            inflows: vec![env],
            market_withdrawal: 0,
            transfers: vec![env],
            dividends: vec![env],
            funder_rewards: vec![env],
            depositor_rewards: vec![env],
            reward_take_backs: vec![env],
            nft_burns: vec![env],
            nft_mints: vec![env],
            funding_mints: vec![env],
        }
    }

    pub fn pull(&mut self, payer: &Address, amount: i128) {
        if amount > 0 {
            self.inflows.push_back((payer.clone(), amount));
        }
    }

    pub fn pay(&mut self, recipient: &Address, amount: i128) -> Result<(), Error> {
        if amount > 0 {
            self.market_withdrawal = self
                .market_withdrawal
                .checked_add(amount)
                .ok_or(Error::MathOverflow)?;
            self.transfers.push_back((recipient.clone(), amount));
        }
        Ok(())
    }

    pub fn pay_dividend(&mut self, funding_id: u64, amount: i128) -> Result<(), Error> {
        if amount > 0 {
            self.market_withdrawal = self
                .market_withdrawal
                .checked_add(amount)
                .ok_or(Error::MathOverflow)?;
            self.dividends.push_back((funding_id, amount));
        }
        Ok(())
    }

    pub fn accrue_funder_reward(&mut self, funding_id: u64, principal_at_risk: i128, elapsed: u64) {
        if principal_at_risk > 0 && elapsed > 0 {
            self.funder_rewards
                .push_back((funding_id, principal_at_risk, elapsed));
        }
    }

    pub fn accrue_depositor_reward(&mut self, depositor: &Address, amount: i128, period: u64) {
        if amount > 0 {
            self.depositor_rewards
                .push_back((depositor.clone(), amount, period));
        }
    }

    pub fn take_back_depositor_reward(&mut self, depositor: &Address, amount: i128, early: bool) {
        if amount > 0 {
            self.reward_take_backs
                .push_back((depositor.clone(), amount, early));
        }
    }

    pub fn burn_nft(&mut self, deposit_id: u64) {
        self.nft_burns.push_back(deposit_id);
    }

    pub fn mint_nft(&mut self, owner: &Address, deposit_id: u64) {
        self.nft_mints.push_back((owner.clone(), deposit_id));
    }

    pub fn mint_funding(&mut self, funder: &Address, funding_id: u64, units: i128) {
        if units > 0 {
            self.funding_mints
                .push_back((funder.clone(), funding_id, units));
        }
    }

    // ============================================
    // EXECUTION
    // ============================================

    /// Run every queued effect, money first
    ///
    /// # Errors
    /// - `InvalidStrategyResult`: Money market returned less than requested
    pub fn execute(self, env: &Env, config: &PoolConfig) -> Result<(), Error> {
        let pool = env.current_contract_address();
        let stablecoin = token::Client::new(env, &config.stablecoin);
        let market = MoneyMarketClient::new(env, &config.money_market);

        let mut inflow_total: i128 = 0;
        for (payer, amount) in self.inflows.iter() {
            stablecoin.transfer(&payer, &config.money_market, &amount);
            inflow_total = inflow_total.checked_add(amount).ok_or(Error::MathOverflow)?;
        }
        if inflow_total > 0 {
            market.deposit(&inflow_total);
        }

        if self.market_withdrawal > 0 {
            let received = market.withdraw(&self.market_withdrawal);
            if received < self.market_withdrawal {
                return Err(Error::InvalidStrategyResult);
            }
        }

        log!(env, "settlement", inflow_total, self.market_withdrawal);

        for (recipient, amount) in self.transfers.iter() {
            stablecoin.transfer(&pool, &recipient, &amount);
        }

        let multitoken = FundingMultitokenClient::new(env, &config.funding_multitoken);
        for (funding_id, amount) in self.dividends.iter() {
            stablecoin.transfer(&pool, &config.funding_multitoken, &amount);
            multitoken.inject_dividend(&funding_id, &config.stablecoin, &amount);
        }

        Self::run_rewards(
            env,
            config,
            &multitoken,
            &self.funder_rewards,
            &self.depositor_rewards,
            &self.reward_take_backs,
        );

        let nft = DepositNftClient::new(env, &config.deposit_nft);
        for deposit_id in self.nft_burns.iter() {
            nft.burn(&deposit_id);
        }
        for (owner, deposit_id) in self.nft_mints.iter() {
            nft.mint(&owner, &deposit_id);
        }

        for (funder, funding_id, units) in self.funding_mints.iter() {
            multitoken.mint(&funder, &funding_id, &units);
        }

        Ok(())
    }

    /// Reward calls are skipped entirely while no minter is configured
    fn run_rewards(
        env: &Env,
        config: &PoolConfig,
        multitoken: &FundingMultitokenClient,
        funder_rewards: &Vec<(u64, i128, u64)>,
        depositor_rewards: &Vec<(Address, i128, u64)>,
        take_backs: &Vec<(Address, i128, bool)>,
    ) {
        let minter_address = match &config.reward_minter {
            Some(address) => address,
            None => return,
        };
        let minter = RewardMinterClient::new(env, minter_address);

        if let Some(reward_token) = &config.reward_token {
            let reward = token::Client::new(env, reward_token);
            for (funding_id, principal_at_risk, elapsed) in funder_rewards.iter() {
                let minted = minter.accrue_funder_reward(&funding_id, &principal_at_risk, &elapsed);
                if minted > 0 {
                    reward.transfer(
                        &env.current_contract_address(),
                        &config.funding_multitoken,
                        &minted,
                    );
                    multitoken.inject_dividend(&funding_id, reward_token, &minted);
                }
            }
        }

        for (depositor, amount, period) in depositor_rewards.iter() {
            let booked = minter.accrue_depositor_reward(&depositor, &amount, &period);
            log!(env, "depositor reward", amount, booked);
        }

        for (depositor, amount, early) in take_backs.iter() {
            let taken = minter.take_back_depositor_reward(&depositor, &amount, &early);
            log!(env, "depositor reward taken back", amount, taken);
        }
    }
}
