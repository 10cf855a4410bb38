use anchor_lang::prelude::*;

/// Event emitted when the treasury is initialized
#[event]
pub struct TreasuryInitialized {
    pub treasury: Pubkey,
    pub owner: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnerAdded {
    pub treasury: Pubkey,
    pub owner: Pubkey,
    pub added_by: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a currency is registered
#[event]
pub struct CurrencyAdded {
    pub currency_id: u64,
    pub name: String,
    pub asset_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct CurrencyToggled {
    pub currency_id: u64,
    pub active: bool,
    pub timestamp: i64,
}

/// Event emitted when a protocol is registered
#[event]
pub struct ProtocolAdded {
    pub protocol_id: u64,
    pub name: String,
    pub adapter: Pubkey,
    pub asset_mint: Pubkey,
    pub percentage: u8,
    pub timestamp: i64,
}

/// Event emitted when a protocol's mutable fields are replaced
#[event]
pub struct ProtocolUpdated {
    pub protocol_id: u64,
    pub name: String,
    pub adapter: Pubkey,
    pub asset_mint: Pubkey,
    pub percentage: u8,
    pub timestamp: i64,
}

#[event]
pub struct ProtocolToggled {
    pub protocol_id: u64,
    pub active: bool,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited into custody
#[event]
pub struct Deposited {
    pub depositor: Pubkey,
    pub currency_id: u64,
    pub amount: u64,
    pub custody_balance: u64,
    pub timestamp: i64,
}

/// Event emitted per protocol share routed by an invest call
#[event]
pub struct AllocationRouted {
    pub depositor: Pubkey,
    pub protocol_id: u64,
    pub protocol_name: String,
    pub amount: u64,
    pub timestamp: i64,
}

/// Event emitted once per invest call
#[event]
pub struct Invested {
    pub depositor: Pubkey,
    pub currency_id: u64,
    pub amount: u64,
    pub routed: u64,
    pub remainder: u64,
    pub timestamp: i64,
}

/// Event emitted when funds are pulled back from a protocol
#[event]
pub struct Withdrawn {
    pub depositor: Pubkey,
    pub protocol_id: u64,
    pub currency_id: u64,
    pub amount: u64,
    pub remaining_investment: u64,
    pub timestamp: i64,
}

/// Event emitted when uninvested custody balance leaves the treasury
#[event]
pub struct BalanceWithdrawn {
    pub depositor: Pubkey,
    pub currency_id: u64,
    pub amount: u64,
    pub custody_balance: u64,
    pub timestamp: i64,
}
