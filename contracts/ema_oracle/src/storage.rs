use soroban_sdk::{contracttype, Address};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Fixed-point scale of rates and indices
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfig {
    /// Venue whose income index is tracked
    pub money_market: Address,
    /// Minimum seconds between two samples
    pub update_interval: u64,
    /// Numerator of the EMA weight: alpha = smoothing_factor / (average_window + 1)
    pub smoothing_factor: u32,
    /// EMA length in intervals
    pub average_window: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleState {
    /// Smoothed rate per second, scaled by PRECISION
    pub ema_rate: i128,
    pub last_income_index: i128,
    pub last_update_timestamp: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Config,
    State,
    Initialized,
}
