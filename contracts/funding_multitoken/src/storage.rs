use soroban_sdk::{contracttype, Address, Env, Vec};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const BALANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Fixed-point scale of the cumulative dividend per unit
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

/// A holder's dividend position in one (funding id, token) pair.
/// pending = balance * (dividend_per_unit - dividend_debt) / PRECISION
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HolderDividend {
    /// Dividend per unit already credited to this holder
    pub dividend_debt: i128,
    /// Credited but not yet withdrawn
    pub unclaimed: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Minter,
    Initialized,
    Balance(u64, Address), // (funding_id, holder)
    TotalSupply(u64),
    DividendTokens(u64),
    DividendPerUnit(u64, Address),          // (funding_id, token)
    HolderDividend(u64, Address, Address), // (funding_id, holder, token)
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = env.storage().persistent().get::<DataKey, V>(key);
    if value.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
    }
    value
}

fn write_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}

pub fn read_balance(env: &Env, funding_id: u64, holder: &Address) -> i128 {
    read_persistent(env, &DataKey::Balance(funding_id, holder.clone())).unwrap_or(0)
}

pub fn write_balance(env: &Env, funding_id: u64, holder: &Address, amount: i128) {
    let key = DataKey::Balance(funding_id, holder.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        write_persistent(env, &key, &amount);
    }
}

pub fn read_total_supply(env: &Env, funding_id: u64) -> i128 {
    read_persistent(env, &DataKey::TotalSupply(funding_id)).unwrap_or(0)
}

pub fn write_total_supply(env: &Env, funding_id: u64, amount: i128) {
    write_persistent(env, &DataKey::TotalSupply(funding_id), &amount);
}

pub fn read_dividend_tokens(env: &Env, funding_id: u64) -> Vec<Address> {
    read_persistent(env, &DataKey::DividendTokens(funding_id)).unwrap_or_else(|| Vec::new(env))
}

pub fn write_dividend_tokens(env: &Env, funding_id: u64, tokens: &Vec<Address>) {
    write_persistent(env, &DataKey::DividendTokens(funding_id), tokens);
}

pub fn read_dividend_per_unit(env: &Env, funding_id: u64, token: &Address) -> i128 {
    read_persistent(env, &DataKey::DividendPerUnit(funding_id, token.clone())).unwrap_or(0)
}

pub fn write_dividend_per_unit(env: &Env, funding_id: u64, token: &Address, value: i128) {
    write_persistent(env, &DataKey::DividendPerUnit(funding_id, token.clone()), &value);
}

pub fn read_holder_dividend(
    env: &Env,
    funding_id: u64,
    holder: &Address,
    token: &Address,
) -> HolderDividend {
    read_persistent(
        env,
        &DataKey::HolderDividend(funding_id, holder.clone(), token.clone()),
    )
    .unwrap_or_default()
}

pub fn write_holder_dividend(
    env: &Env,
    funding_id: u64,
    holder: &Address,
    token: &Address,
    position: &HolderDividend,
) {
    write_persistent(
        env,
        &DataKey::HolderDividend(funding_id, holder.clone(), token.clone()),
        position,
    );
}
