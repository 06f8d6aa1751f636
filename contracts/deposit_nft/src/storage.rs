use soroban_sdk::{contracttype, Address, Env};

pub(crate) const DAY_IN_LEDGERS: u32 = 17280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const TOKEN_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const TOKEN_LIFETIME_THRESHOLD: u32 = TOKEN_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Minter,
    Initialized,
    Owner(u64),       // token_id -> holder
    Balance(Address), // holder -> number of tokens held
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn read_owner(env: &Env, token_id: u64) -> Option<Address> {
    let key = DataKey::Owner(token_id);
    let owner = env.storage().persistent().get::<DataKey, Address>(&key);
    if owner.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TOKEN_LIFETIME_THRESHOLD, TOKEN_BUMP_AMOUNT);
    }
    owner
}

pub fn write_owner(env: &Env, token_id: u64, owner: &Address) {
    let key = DataKey::Owner(token_id);
    env.storage().persistent().set(&key, owner);
    env.storage()
        .persistent()
        .extend_ttl(&key, TOKEN_LIFETIME_THRESHOLD, TOKEN_BUMP_AMOUNT);
}

pub fn remove_owner(env: &Env, token_id: u64) {
    env.storage().persistent().remove(&DataKey::Owner(token_id));
}

pub fn read_balance(env: &Env, holder: &Address) -> u32 {
    env.storage()
        .persistent()
        .get::<DataKey, u32>(&DataKey::Balance(holder.clone()))
        .unwrap_or(0)
}

pub fn write_balance(env: &Env, holder: &Address, balance: u32) {
    let key = DataKey::Balance(holder.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        env.storage()
            .persistent()
            .extend_ttl(&key, TOKEN_LIFETIME_THRESHOLD, TOKEN_BUMP_AMOUNT);
    }
}
