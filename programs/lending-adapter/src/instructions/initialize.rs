use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{constants::*, events::*, state::*};

/// Create an adapter for one (asset, pool) pair with its reserve account
#[derive(Accounts)]
#[instruction(pool: Pubkey)]
pub struct Initialize<'info> {
    /// First owner of the adapter
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = AdapterState::SPACE,
        seeds = [ADAPTER_SEED, asset_mint.key().as_ref(), pool.as_ref()],
        bump
    )]
    pub adapter_state: Account<'info, AdapterState>,

    pub asset_mint: Account<'info, Mint>,

    /// Reserve holding supplied funds
    /// Security: Token authority is the adapter state PDA
    #[account(
        init,
        payer = authority,
        seeds = [RESERVE_SEED, adapter_state.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = adapter_state,
    )]
    pub reserve: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, pool: Pubkey, yield_rate: u128) -> Result<()> {
    let owner = ctx.accounts.authority.key();
    let state = &mut ctx.accounts.adapter_state;

    state.owners = vec![owner];
    state.asset_mint = ctx.accounts.asset_mint.key();
    state.pool = pool;
    state.reserve = ctx.accounts.reserve.key();
    state.yield_rate = yield_rate;
    state.total_deposited = 0;
    state.positions = Vec::new();
    state.bump = ctx.bumps.adapter_state;
    state.reserve_bump = ctx.bumps.reserve;

    emit!(AdapterInitialized {
        adapter: state.key(),
        asset_mint: state.asset_mint,
        pool,
        owner,
        yield_rate,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
