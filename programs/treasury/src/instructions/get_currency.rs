use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

#[derive(Accounts)]
pub struct GetCurrency<'info> {
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
}

pub fn handler(ctx: Context<GetCurrency>, currency_id: u64) -> Result<Currency> {
    ctx.accounts
        .currency_registry
        .get_currency(currency_id)
        .cloned()
}
