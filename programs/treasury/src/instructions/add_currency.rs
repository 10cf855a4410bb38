use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Register a currency and open its custody account
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Owner must be signer
/// ✅ 3. ACCESS CONTROL: Owner must be in the treasury owner set
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Custody is the ATA of the treasury authority
/// ✅ 10. EVENTS: Emits CurrencyAdded event
#[derive(Accounts)]
pub struct AddCurrency<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
        constraint = treasury.is_owner(&owner.key()) @ TreasuryError::Unauthorized,
    )]
    pub treasury: Account<'info, Treasury>,

    /// CHECK: PDA used as custody authority, validated by seeds
    #[account(
        seeds = [TREASURY_AUTHORITY_SEED],
        bump = treasury.authority_bump,
    )]
    pub treasury_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [CURRENCY_REGISTRY_SEED, treasury.key().as_ref()],
        bump = currency_registry.bump,
    )]
    pub currency_registry: Account<'info, CurrencyRegistry>,

    /// Underlying token of the new currency
    pub asset_mint: Account<'info, Mint>,

    /// Treasury custody account for the currency
    /// Security: Owned by treasury_authority PDA, correct mint
    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = asset_mint,
        associated_token::authority = treasury_authority,
    )]
    pub custody_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddCurrency>, name: String) -> Result<u64> {
    let asset_mint = ctx.accounts.asset_mint.key();
    let currency_id = ctx
        .accounts
        .currency_registry
        .add_currency(name.clone(), asset_mint)?;

    emit!(CurrencyAdded {
        currency_id,
        name,
        asset_mint,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(currency_id)
}
