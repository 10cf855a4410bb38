use anchor_lang::prelude::*;

use crate::{
    adapter::{Adapter, CpiAdapter},
    constants::*,
    state::*,
};

/// Position the treasury holds in one protocol, as reported by its adapter
#[derive(Accounts)]
pub struct PositionOf<'info> {
    #[account(
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    /// CHECK: PDA holding adapter positions, validated by seeds
    #[account(
        seeds = [TREASURY_AUTHORITY_SEED],
        bump = treasury.authority_bump,
    )]
    pub treasury_authority: UncheckedAccount<'info>,

    #[account(
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,

    /// CHECK: Validated against the protocol registry before the call
    pub adapter_program: UncheckedAccount<'info>,

    /// CHECK: Validated against the protocol registry before the call
    pub adapter_state: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<PositionOf>, protocol_id: u64) -> Result<u64> {
    let protocol = ctx.accounts.protocol_registry.get_protocol(protocol_id)?;
    let adapter = CpiAdapter::read_only(
        protocol,
        &ctx.accounts.adapter_program.to_account_info(),
        &ctx.accounts.adapter_state.to_account_info(),
    )?;

    adapter.balance_of(&ctx.accounts.treasury_authority.key())
}
