use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

#[derive(Accounts)]
pub struct AddOwner<'info> {
    /// Security: Must be signer and a current owner (checked in handler)
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,
}

pub fn handler(ctx: Context<AddOwner>, principal: Pubkey) -> Result<()> {
    let caller = ctx.accounts.owner.key();
    let treasury = &mut ctx.accounts.treasury;

    if !treasury.add_owner(&caller, principal)? {
        msg!("{} is already an owner", principal);
        return Ok(());
    }

    emit!(OwnerAdded {
        treasury: treasury.key(),
        owner: principal,
        added_by: caller,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
