use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Parameter errors
    InvalidFeeRate = 3,
    InvalidAmount = 4,

    // Math errors
    MathOverflow = 5,
}
