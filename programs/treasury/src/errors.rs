use anchor_lang::prelude::*;

/// Custom error codes for the Treasury program
#[error_code]
pub enum TreasuryError {
    #[msg("Unauthorized - caller is not a treasury owner")]
    Unauthorized,

    #[msg("Invalid index - registry id is zero or unassigned")]
    InvalidIndex,

    #[msg("Currency or protocol is not active")]
    InactiveEntity,

    #[msg("Insufficient balance for the requested debit")]
    InsufficientBalance,

    #[msg("Asset transfer was rejected")]
    TransferFailed,

    #[msg("Adapter call failed or returned invalid data")]
    AdapterCallFailed,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Name too long - maximum 32 characters")]
    NameTooLong,

    #[msg("Name or asset already registered")]
    AlreadyRegistered,

    #[msg("Percentage must be between 0 and 100")]
    InvalidPercentage,

    #[msg("Active protocol percentages for this asset would exceed 100")]
    AllocationExceeded,

    #[msg("Registry is full - maximum entries reached")]
    RegistryFull,

    #[msg("Owner set is full")]
    OwnerSetFull,

    #[msg("Depositor ledger is full")]
    LedgerFull,

    #[msg("Invalid token mint - does not match currency asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Protocol is not tied to this currency")]
    AssetMismatch,

    #[msg("Adapter accounts do not match the protocol registry")]
    InvalidAdapterAccounts,
}
