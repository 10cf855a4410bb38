use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Supply funds from an owner's token account into the pool reserve
///
/// Account order is part of the treasury adapter interface.
#[derive(Accounts)]
pub struct Invest<'info> {
    #[account(
        mut,
        seeds = [ADAPTER_SEED, adapter_state.asset_mint.as_ref(), adapter_state.pool.as_ref()],
        bump = adapter_state.bump,
        constraint = adapter_state.is_owner(&authority.key()) @ AdapterError::Unauthorized,
    )]
    pub adapter_state: Account<'info, AdapterState>,

    #[account(
        mut,
        address = adapter_state.reserve @ AdapterError::InvalidReserve,
    )]
    pub reserve: Account<'info, TokenAccount>,

    /// Security: Must hold the adapter asset
    #[account(
        mut,
        constraint = source.mint == adapter_state.asset_mint @ AdapterError::InvalidMint,
    )]
    pub source: Account<'info, TokenAccount>,

    /// Holder of the position, signs for `source`
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Invest>, amount: u64) -> Result<()> {
    let holder = ctx.accounts.authority.key();

    // EFFECTS
    let state = &mut ctx.accounts.adapter_state;
    let position = state.supply(holder, amount)?;
    let total_deposited = state.total_deposited;

    // INTERACTIONS
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.source.to_account_info(),
                to: ctx.accounts.reserve.to_account_info(),
                authority: ctx.accounts.authority.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(Supplied {
        adapter: ctx.accounts.adapter_state.key(),
        holder,
        amount,
        position,
        total_deposited,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
