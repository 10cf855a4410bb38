use anchor_lang::prelude::*;

use crate::{adapter::CpiAdapter, constants::*, engine, state::*};

/// Remaining accounts: `[adapter_program, adapter_state]` for every active
/// protocol of the currency, in ascending id order
#[derive(Accounts)]
pub struct AggregatedYield<'info> {
    #[account(
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [CURRENCY_REGISTRY_SEED, treasury.key().as_ref()],
        bump = currency_registry.bump,
    )]
    pub currency_registry: Account<'info, CurrencyRegistry>,

    #[account(
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, AggregatedYield<'info>>,
    currency_id: u64,
) -> Result<u128> {
    let currency = ctx.accounts.currency_registry.get_currency(currency_id)?;
    let protocols: Vec<&Protocol> = ctx
        .accounts
        .protocol_registry
        .active_for(&currency.asset_mint)
        .collect();

    let adapters = CpiAdapter::load_read_only(&protocols, ctx.remaining_accounts)?;
    engine::aggregate_yield(&protocols, &adapters)
}
