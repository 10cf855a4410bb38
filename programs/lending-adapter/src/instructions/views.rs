use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

/// Read-only access to an adapter, shared by `current_yield` and `balance_of`
#[derive(Accounts)]
pub struct View<'info> {
    #[account(
        seeds = [ADAPTER_SEED, adapter_state.asset_mint.as_ref(), adapter_state.pool.as_ref()],
        bump = adapter_state.bump,
    )]
    pub adapter_state: Account<'info, AdapterState>,
}

pub fn current_yield_handler(ctx: Context<View>) -> Result<u128> {
    Ok(ctx.accounts.adapter_state.yield_rate)
}

pub fn balance_of_handler(ctx: Context<View>, holder: Pubkey) -> Result<u64> {
    Ok(ctx.accounts.adapter_state.position_of(&holder))
}
