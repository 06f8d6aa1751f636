use soroban_sdk::{contracttype, Env};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Fixed-point scale of the income index
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Pool,
    Stablecoin,
    TotalShares,
    /// Index observed when the vault last held shares
    LastIndex,
    Initialized,
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn read_total_shares(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalShares)
        .unwrap_or(0)
}

pub fn write_total_shares(env: &Env, shares: i128) {
    env.storage().instance().set(&DataKey::TotalShares, &shares);
}

pub fn read_last_index(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::LastIndex)
        .unwrap_or(PRECISION)
}

pub fn write_last_index(env: &Env, index: i128) {
    env.storage().instance().set(&DataKey::LastIndex, &index);
}
