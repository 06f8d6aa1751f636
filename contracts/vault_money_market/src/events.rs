use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub amount: i128,
    pub shares_minted: i128,
    pub income_index: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub amount: i128,
    pub shares_burned: i128,
    pub income_index: i128,
}
