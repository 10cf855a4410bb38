// Multi-strategy treasury: custody of registered currencies, percentage-based
// routing of investments into yield protocols through adapter programs
// Architecture: Registries + per-depositor ledger, adapters reached by CPI

use anchor_lang::prelude::*;

pub mod adapter;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::{Currency, Protocol};

declare_id!("HNcKs5j4GYrCT5xYDvSJ3oGcYCvtSvS6ny2SnckeHX4q");

#[program]
pub mod treasury {
    use super::*;

    /// Create the treasury, its registries and the custody authority
    ///
    /// Security considerations:
    /// - Singleton PDA, can only run once
    /// - Signer becomes the first owner
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// Add a principal to the owner set (owner-only, idempotent)
    pub fn add_owner(ctx: Context<AddOwner>, principal: Pubkey) -> Result<()> {
        instructions::add_owner::handler(ctx, principal)
    }

    pub fn is_owner(ctx: Context<IsOwner>, principal: Pubkey) -> Result<bool> {
        instructions::is_owner::handler(ctx, principal)
    }

    /// Register a currency and open its custody account
    ///
    /// Security considerations:
    /// - Owner-only function
    /// - Names and mints are unique within the registry
    /// - Emits event for tracking
    pub fn add_currency(ctx: Context<AddCurrency>, name: String) -> Result<u64> {
        instructions::add_currency::handler(ctx, name)
    }

    pub fn get_currency(ctx: Context<GetCurrency>, currency_id: u64) -> Result<Currency> {
        instructions::get_currency::handler(ctx, currency_id)
    }

    pub fn toggle_currency(
        ctx: Context<ToggleCurrency>,
        currency_id: u64,
        active: bool,
    ) -> Result<()> {
        instructions::toggle_currency::handler(ctx, currency_id, active)
    }

    /// Register a protocol behind an adapter
    ///
    /// Security considerations:
    /// - Owner-only function
    /// - Adapter program, state and reserve validated structurally
    /// - Active percentages of one currency never exceed 100
    /// - Emits event for tracking
    pub fn add_protocol(
        ctx: Context<ConfigureProtocol>,
        name: String,
        external_ref: Pubkey,
        percentage: u8,
    ) -> Result<u64> {
        instructions::add_protocol::handler(ctx, name, external_ref, percentage)
    }

    /// Replace every mutable field of a protocol (owner-only)
    ///
    /// Security: the asset mint is fixed and a retired name stays reserved
    /// for the protocol that gave it up
    pub fn update_protocol(
        ctx: Context<ConfigureProtocol>,
        protocol_id: u64,
        name: String,
        external_ref: Pubkey,
        percentage: u8,
    ) -> Result<()> {
        instructions::update_protocol::handler(ctx, protocol_id, name, external_ref, percentage)
    }

    pub fn get_protocol(ctx: Context<GetProtocol>, protocol_id: u64) -> Result<Protocol> {
        instructions::get_protocol::handler(ctx, protocol_id)
    }

    /// Toggle a protocol on/off
    ///
    /// Security considerations:
    /// - Owner-only function
    /// - Emergency shutdown capability per protocol
    /// - Emits event for tracking
    pub fn toggle_protocol(
        ctx: Context<ToggleProtocol>,
        protocol_id: u64,
        active: bool,
    ) -> Result<()> {
        instructions::toggle_protocol::handler(ctx, protocol_id, active)
    }

    /// Deposit assets into custody and credit the caller
    ///
    /// Security considerations:
    /// - Validates user token accounts (mint, owner)
    /// - Follows checks-effects-interactions pattern
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<Deposit>, currency_id: u64, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, currency_id, amount)
    }

    /// Deposit and route the amount across the currency's active protocols
    ///
    /// Architecture: Each active protocol receives floor(amount * pct / 100)
    /// through its adapter; the remainder is credited to the caller.
    /// Security considerations:
    /// - Adapter accounts validated against the protocol registry
    /// - All-or-nothing: any adapter failure aborts the call
    /// - Emits events per routed share and for the whole call
    pub fn invest<'info>(
        ctx: Context<'_, '_, 'info, 'info, Invest<'info>>,
        currency_id: u64,
        amount: u64,
    ) -> Result<()> {
        instructions::invest::handler(ctx, currency_id, amount)
    }

    /// Pull funds back from one protocol and pay them out to the caller
    pub fn withdraw(
        ctx: Context<Withdraw>,
        protocol_id: u64,
        currency_id: u64,
        amount: u64,
    ) -> Result<()> {
        instructions::withdraw::handler(ctx, protocol_id, currency_id, amount)
    }

    pub fn withdraw_balance(
        ctx: Context<WithdrawBalance>,
        currency_id: u64,
        amount: u64,
    ) -> Result<()> {
        instructions::withdraw_balance::handler(ctx, currency_id, amount)
    }

    pub fn invest_of(
        ctx: Context<InvestOf>,
        protocol_name: String,
        depositor: Pubkey,
    ) -> Result<u64> {
        instructions::invest_of::handler(ctx, protocol_name, depositor)
    }

    pub fn balance_of(
        ctx: Context<BalanceOf>,
        currency_name: String,
        depositor: Pubkey,
    ) -> Result<u64> {
        instructions::balance_of::handler(ctx, currency_name, depositor)
    }

    /// Weighted yield of a currency: sum of pct * current_yield / 100 over
    /// its active protocols, read from the adapters
    pub fn calculate_aggregated_percentage_yield<'info>(
        ctx: Context<'_, '_, 'info, 'info, AggregatedYield<'info>>,
        currency_id: u64,
    ) -> Result<u128> {
        instructions::aggregated_yield::handler(ctx, currency_id)
    }

    pub fn position_of(ctx: Context<PositionOf>, protocol_id: u64) -> Result<u64> {
        instructions::position_of::handler(ctx, protocol_id)
    }
}
