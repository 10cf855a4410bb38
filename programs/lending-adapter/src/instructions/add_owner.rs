use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

#[derive(Accounts)]
pub struct AddOwner<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [ADAPTER_SEED, adapter_state.asset_mint.as_ref(), adapter_state.pool.as_ref()],
        bump = adapter_state.bump,
    )]
    pub adapter_state: Account<'info, AdapterState>,
}

pub fn handler(ctx: Context<AddOwner>, principal: Pubkey) -> Result<()> {
    let caller = ctx.accounts.owner.key();
    let state = &mut ctx.accounts.adapter_state;

    if state.add_owner(&caller, principal)? {
        emit!(AdapterOwnerAdded {
            adapter: state.key(),
            owner: principal,
            added_by: caller,
            timestamp: Clock::get()?.unix_timestamp,
        });
    }

    Ok(())
}
