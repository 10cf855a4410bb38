// Lending adapter - reference implementation of the treasury adapter interface
// Wraps one lending pool per (asset, pool) pair and reports its liquidity rate

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;

declare_id!("79DAu3gyv7s4wDrGpVmC8sY4wMD8K4oSZ3A2vbx3aBkF");

#[program]
pub mod lending_adapter {
    use super::*;

    /// Create the adapter state and its reserve; the signer becomes an owner
    pub fn initialize(ctx: Context<Initialize>, pool: Pubkey, yield_rate: u128) -> Result<()> {
        instructions::initialize::handler(ctx, pool, yield_rate)
    }

    /// Add a principal to the owner set (owner-only, idempotent)
    ///
    /// The treasury authority must be added before the treasury can invest.
    pub fn add_owner(ctx: Context<AddOwner>, principal: Pubkey) -> Result<()> {
        instructions::add_owner::handler(ctx, principal)
    }

    pub fn set_yield_rate(ctx: Context<SetYieldRate>, yield_rate: u128) -> Result<()> {
        instructions::set_yield_rate::handler(ctx, yield_rate)
    }

    /// Supply funds into the pool (owner-only)
    pub fn invest(ctx: Context<Invest>, amount: u64) -> Result<()> {
        instructions::invest::handler(ctx, amount)
    }

    /// Redeem funds from the pool (owner-only, bounded by the signer's position)
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    pub fn current_yield(ctx: Context<View>) -> Result<u128> {
        instructions::views::current_yield_handler(ctx)
    }

    pub fn balance_of(ctx: Context<View>, holder: Pubkey) -> Result<u64> {
        instructions::views::balance_of_handler(ctx, holder)
    }
}
