use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Activate or deactivate a currency
///
/// Deactivation blocks new deposits and invests; balances already held
/// stay withdrawable.
#[derive(Accounts)]
pub struct ToggleCurrency<'info> {
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
        seeds = [CURRENCY_REGISTRY_SEED, treasury.key().as_ref()],
        bump = currency_registry.bump,
    )]
    pub currency_registry: Account<'info, CurrencyRegistry>,
}

pub fn handler(ctx: Context<ToggleCurrency>, currency_id: u64, active: bool) -> Result<()> {
    ctx.accounts
        .currency_registry
        .set_active(currency_id, active)?;

    emit!(CurrencyToggled {
        currency_id,
        active,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
