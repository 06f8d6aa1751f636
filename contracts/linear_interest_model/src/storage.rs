use soroban_sdk::contracttype;

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const PRECISION: i128 = 1_000_000_000_000_000_000;
pub const YEAR_IN_SECONDS: u64 = 31_536_000;

/// multiplier(period) = intercept - slope * period / YEAR, floored at zero
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelParameters {
    pub multiplier_intercept: i128,
    pub multiplier_slope: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Parameters,
    Initialized,
}
