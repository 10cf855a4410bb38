use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

#[derive(Accounts)]
pub struct IsOwner<'info> {
    #[account(
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
}

pub fn handler(ctx: Context<IsOwner>, principal: Pubkey) -> Result<bool> {
    Ok(ctx.accounts.treasury.is_owner(&principal))
}
