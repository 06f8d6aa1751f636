use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Parameter errors
    InvalidInterval = 3,
    InvalidSmoothingFactor = 4,
    InvalidRate = 5,

    // Math errors
    MathOverflow = 6,
}
