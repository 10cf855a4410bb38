use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Redeem funds from the pool reserve back to an owner's token account
///
/// Account order is part of the treasury adapter interface.
#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    #[account(
        mut,
        constraint = destination.mint == adapter_state.asset_mint @ AdapterError::InvalidMint,
    )]
    pub destination: Account<'info, TokenAccount>,

    /// Holder of the position being redeemed
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let holder = ctx.accounts.authority.key();

    // EFFECTS
    let state = &mut ctx.accounts.adapter_state;
    let position = state.redeem(&holder, amount)?;
    let total_deposited = state.total_deposited;

    // INTERACTIONS: The adapter state signs for its reserve
    let asset_mint = state.asset_mint;
    let pool = state.pool;
    let bump = [state.bump];
    let state_seeds: &[&[u8]] = &[ADAPTER_SEED, asset_mint.as_ref(), pool.as_ref(), &bump];
    let signer_seeds = &[state_seeds];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.reserve.to_account_info(),
                to: ctx.accounts.destination.to_account_info(),
                authority: ctx.accounts.adapter_state.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(Redeemed {
        adapter: ctx.accounts.adapter_state.key(),
        holder,
        amount,
        position,
        total_deposited,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
