use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Toggle a protocol on/off
///
/// Security considerations:
/// - Owner-only function
/// - Reactivation re-checks the allocation cap of the protocol's currency
/// - Disabled protocols receive no new allocations but stay withdrawable
#[derive(Accounts)]
pub struct ToggleProtocol<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
        constraint = treasury.is_owner(&owner.key()) @ TreasuryError::Unauthorized,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,
}

pub fn handler(ctx: Context<ToggleProtocol>, protocol_id: u64, active: bool) -> Result<()> {
    ctx.accounts
        .protocol_registry
        .set_active(protocol_id, active)?;

    emit!(ProtocolToggled {
        protocol_id,
        active,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
