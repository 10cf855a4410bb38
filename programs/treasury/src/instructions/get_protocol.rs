use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

#[derive(Accounts)]
pub struct GetProtocol<'info> {
    #[account(
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,
}

pub fn handler(ctx: Context<GetProtocol>, protocol_id: u64) -> Result<Protocol> {
    ctx.accounts
        .protocol_registry
        .get_protocol(protocol_id)
        .cloned()
}
