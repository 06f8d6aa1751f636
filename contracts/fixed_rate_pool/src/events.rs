use soroban_sdk::{contracttype, Address, Symbol};

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositCreatedEvent {
    pub deposit_id: u64,
    pub depositor: Address,
    pub amount: i128,
    pub interest_owed: i128,
    pub fee_owed: i128,
    pub maturation_timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositToppedUpEvent {
    pub deposit_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub interest_added: i128,
    pub fee_added: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositRolledOverEvent {
    pub old_deposit_id: u64,
    pub new_deposit_id: u64,
    pub owner: Address,
    pub principal: i128,
    pub interest_owed: i128,
    pub maturation_timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawnEvent {
    pub deposit_id: u64,
    pub owner: Address,
    pub virtual_token_amount: i128,
    pub payout: i128,
    pub fee: i128,
    pub early: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FundedEvent {
    pub funding_id: u64,
    pub deposit_id: u64,
    pub funder: Address,
    pub funded_amount: i128,
    pub covered_virtual_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FunderInterestPaidEvent {
    pub funding_id: u64,
    pub deposit_id: u64,
    pub interest: i128,
    pub income_index: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FundersRefundedEvent {
    pub funding_id: u64,
    pub deposit_id: u64,
    pub refund: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct LimitsUpdatedEvent {
    pub min_deposit_amount: i128,
    pub max_deposit_amount: i128,
    pub min_deposit_period: u64,
    pub max_deposit_period: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct AddressUpdatedEvent {
    pub field: Symbol,
    pub address: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardMinterUpdatedEvent {
    pub reward_minter: Option<Address>,
    pub reward_token: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PausedEvent {
    pub admin: Address,
}
