use anchor_lang::prelude::*;

use crate::{constants::*, state::*};

#[derive(Accounts)]
#[instruction(protocol_name: String, depositor: Pubkey)]
pub struct InvestOf<'info> {
    #[account(
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    /// CHECK: May not exist yet; address validated by seeds, contents by `DepositorLedger::load`
    #[account(
        seeds = [LEDGER_SEED, treasury.key().as_ref(), depositor.as_ref()],
        bump,
    )]
    pub ledger: UncheckedAccount<'info>,
}

/// Amount `depositor` holds in the named protocol; unknown names read as 0
pub fn handler(ctx: Context<InvestOf>, protocol_name: String, _depositor: Pubkey) -> Result<u64> {
    let ledger = DepositorLedger::load(&ctx.accounts.ledger)?;
    Ok(ledger.map_or(0, |ledger| ledger.invest_of(&protocol_name)))
}
