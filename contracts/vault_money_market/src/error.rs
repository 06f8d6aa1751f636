use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors
    Unauthorized = 3,

    // Amount errors
    InvalidAmount = 4,
    InsufficientLiquidity = 5,

    // Math errors
    MathOverflow = 6,
    DivisionByZero = 7,
}
