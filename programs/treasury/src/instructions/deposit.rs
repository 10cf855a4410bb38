use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    engine::{self, Flow},
    errors::*,
    events::*,
    state::*,
    utils::token,
};

/// Deposit assets into treasury custody and credit the depositor
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: User must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Treasury, registry and ledger validated with seeds
/// ✅ 6. MATH SAFETY: Checked credit on the ledger
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 10. EVENTS: Emits Deposited event
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing assets
    /// Security: Must be signer, pays for ledger creation
    #[account(mut)]
    pub user: Signer<'info>,

    /// Treasury state PDA
    /// Security: Writable so treasury mutations are serialized
    #[account(
        mut,
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    /// CHECK: PDA used as custody authority, validated by seeds
    #[account(
        seeds = [TREASURY_AUTHORITY_SEED],
        bump = treasury.authority_bump,
    )]
    pub treasury_authority: UncheckedAccount<'info>,

    #[account(
        seeds = [CURRENCY_REGISTRY_SEED, treasury.key().as_ref()],
        bump = currency_registry.bump,
    )]
    pub currency_registry: Account<'info, CurrencyRegistry>,

    /// Depositor ledger PDA, created on first use
    #[account(
        init_if_needed,
        payer = user,
        space = DepositorLedger::SPACE,
        seeds = [LEDGER_SEED, treasury.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub ledger: Account<'info, DepositorLedger>,

    /// Security: Must match the currency's mint (checked in handler)
    pub asset_mint: Account<'info, Mint>,

    /// User's asset token account (source)
    /// Security: Must be owned by user and correct mint
    #[account(
        mut,
        constraint = user_asset_account.mint == asset_mint.key() @ TreasuryError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ TreasuryError::InvalidOwner,
    )]
    pub user_asset_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = asset_mint,
        associated_token::authority = treasury_authority,
    )]
    pub custody_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, currency_id: u64, amount: u64) -> Result<()> {
    // CHECKS
    require!(amount > 0, TreasuryError::ZeroAmount);

    let asset_mint = ctx
        .accounts
        .currency_registry
        .get_active_currency(currency_id)?
        .asset_mint;
    require_keys_eq!(
        asset_mint,
        ctx.accounts.asset_mint.key(),
        TreasuryError::InvalidMint
    );
    require!(
        ctx.accounts.user_asset_account.amount >= amount,
        TreasuryError::TransferFailed
    );

    // EFFECTS
    let depositor = ctx.accounts.user.key();
    let treasury_key = ctx.accounts.treasury.key();
    let ledger = &mut ctx.accounts.ledger;
    ledger.ensure_initialized(treasury_key, depositor, ctx.bumps.ledger);
    let custody_balance = ledger.credit(currency_id, amount)?;

    // INTERACTIONS
    let user_before = ctx.accounts.user_asset_account.amount;
    let custody_before = ctx.accounts.custody_account.amount;
    token::transfer_into_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_asset_account.to_account_info(),
        ctx.accounts.custody_account.to_account_info(),
        ctx.accounts.user.to_account_info(),
        amount,
    )?;
    ctx.accounts.user_asset_account.reload()?;
    ctx.accounts.custody_account.reload()?;
    engine::ensure_transfer_flow(
        user_before,
        ctx.accounts.user_asset_account.amount,
        amount,
        Flow::Out,
    )?;
    engine::ensure_transfer_flow(
        custody_before,
        ctx.accounts.custody_account.amount,
        amount,
        Flow::In,
    )?;

    emit!(Deposited {
        depositor,
        currency_id,
        amount,
        custody_balance,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
