use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateUpdatedEvent {
    pub income_index: i128,
    pub incoming_rate: i128,
    pub ema_rate: i128,
    pub intervals: u64,
}
