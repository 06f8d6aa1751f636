use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller does not hold the deposit NFT
    NotOwner = 10,

    // ============================================
    // OPERATIONAL ERRORS (20-29)
    // ============================================
    /// Contract is paused
    ContractPaused = 20,
    /// A pool entry point is already running
    ReentrantCall = 21,
    /// Batch longer than MAX_BATCH_SIZE
    BatchTooLarge = 22,

    // ============================================
    // AMOUNT/BALANCE ERRORS (30-39)
    // ============================================
    /// Amount outside the configured deposit range, or not positive
    InvalidAmount = 30,
    /// Withdrawing more than the deposit's remaining virtual supply
    InsufficientBalance = 31,
    /// Deposit has no uncovered deficit
    NoDeficitToFund = 32,
    /// Deposit limits are inconsistent
    InvalidLimits = 33,

    // ============================================
    // TIMESTAMP ERRORS (40-49)
    // ============================================
    /// Deposit period outside the configured range
    InvalidPeriod = 40,
    /// Operation needs a matured deposit
    NotMatured = 41,
    /// Operation needs a deposit that has not matured
    AlreadyMatured = 42,

    // ============================================
    // RECORD ERRORS (50-59)
    // ============================================
    /// Deposit doesn't exist or was fully withdrawn
    DepositNotFound = 50,
    /// Funding doesn't exist
    FundingNotFound = 51,
    /// Deposit has never been funded
    DepositNotFunded = 52,

    // ============================================
    // COLLABORATOR ERRORS (60-69)
    // ============================================
    /// A strategy returned a negative amount or a fee above the interest
    InvalidStrategyResult = 60,
    /// Oracle tracks a different money market
    InvalidOracle = 61,

    // ============================================
    // MATH ERRORS (70-79)
    // ============================================
    MathOverflow = 70,
    DivisionByZero = 71,
}
