use anchor_lang::prelude::*;

#[event]
pub struct AdapterInitialized {
    pub adapter: Pubkey,
    pub asset_mint: Pubkey,
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub yield_rate: u128,
    pub timestamp: i64,
}

#[event]
pub struct AdapterOwnerAdded {
    pub adapter: Pubkey,
    pub owner: Pubkey,
    pub added_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct YieldRateSet {
    pub adapter: Pubkey,
    pub yield_rate: u128,
    pub timestamp: i64,
}

/// Event emitted when a holder supplies funds to the pool
#[event]
pub struct Supplied {
    pub adapter: Pubkey,
    pub holder: Pubkey,
    pub amount: u64,
    pub position: u64,
    pub total_deposited: u64,
    pub timestamp: i64,
}

/// Event emitted when a holder redeems funds from the pool
#[event]
pub struct Redeemed {
    pub adapter: Pubkey,
    pub holder: Pubkey,
    pub amount: u64,
    pub position: u64,
    pub total_deposited: u64,
    pub timestamp: i64,
}
