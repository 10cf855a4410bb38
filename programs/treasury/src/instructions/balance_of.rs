use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

#[derive(Accounts)]
#[instruction(currency_name: String, depositor: Pubkey)]
pub struct BalanceOf<'info> {
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

    /// CHECK: May not exist yet; address validated by seeds, contents by `DepositorLedger::load`
    #[account(
        seeds = [LEDGER_SEED, treasury.key().as_ref(), depositor.as_ref()],
        bump,
    )]
    pub ledger: UncheckedAccount<'info>,
}

/// Custody balance of `depositor` in the named currency; unknown names read as 0
pub fn handler(ctx: Context<BalanceOf>, currency_name: String, _depositor: Pubkey) -> Result<u64> {
    let Some(currency) = ctx.accounts.currency_registry.find_by_name(&currency_name) else {
        return Ok(0);
    };

    let ledger = DepositorLedger::load(&ctx.accounts.ledger)?;
    Ok(ledger.map_or(0, |ledger| ledger.balance_of(currency.id)))
}
