use anchor_lang::prelude::*;

#[error_code]
pub enum AdapterError {
    #[msg("Signer is not an owner of this adapter")]
    Unauthorized,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Withdrawal exceeds the holder's position")]
    InsufficientPosition,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Owner set is full")]
    OwnerSetFull,

    #[msg("Position table is full")]
    PositionsFull,

    #[msg("Token account mint does not match the adapter asset")]
    InvalidMint,

    #[msg("Reserve account does not belong to this adapter")]
    InvalidReserve,
}
