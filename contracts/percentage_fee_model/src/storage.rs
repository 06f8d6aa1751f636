use soroban_sdk::{contracttype, Address};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const BASIS_POINTS: i128 = 10_000;
/// Upper bound on the cut of guaranteed interest (50%)
pub const MAX_INTEREST_FEE_BPS: i128 = 5_000;
/// Upper bound on the early-withdrawal penalty on principal (10%)
pub const MAX_EARLY_WITHDRAW_FEE_BPS: i128 = 1_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Receives every fee the pool collects
    pub beneficiary: Address,
    pub interest_fee_bps: i128,
    pub early_withdraw_fee_bps: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    Initialized,
}
