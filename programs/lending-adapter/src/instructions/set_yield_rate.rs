use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

#[derive(Accounts)]
pub struct SetYieldRate<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [ADAPTER_SEED, adapter_state.asset_mint.as_ref(), adapter_state.pool.as_ref()],
        bump = adapter_state.bump,
        constraint = adapter_state.is_owner(&owner.key()) @ AdapterError::Unauthorized,
    )]
    pub adapter_state: Account<'info, AdapterState>,
}

pub fn handler(ctx: Context<SetYieldRate>, yield_rate: u128) -> Result<()> {
    let state = &mut ctx.accounts.adapter_state;
    state.yield_rate = yield_rate;

    emit!(YieldRateSet {
        adapter: state.key(),
        yield_rate,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
