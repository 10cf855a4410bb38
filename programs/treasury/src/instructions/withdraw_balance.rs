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

/// Withdraw uninvested custody balance back to the depositor
#[derive(Accounts)]
pub struct WithdrawBalance<'info> {
    pub user: Signer<'info>,

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

    #[account(
        mut,
        seeds = [LEDGER_SEED, treasury.key().as_ref(), user.key().as_ref()],
        bump = ledger.bump,
    )]
    pub ledger: Account<'info, DepositorLedger>,

    pub asset_mint: Account<'info, Mint>,

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
}

pub fn handler(ctx: Context<WithdrawBalance>, currency_id: u64, amount: u64) -> Result<()> {
    // CHECKS
    require!(amount > 0, TreasuryError::ZeroAmount);

    let asset_mint = ctx
        .accounts
        .currency_registry
        .get_currency(currency_id)?
        .asset_mint;
    require_keys_eq!(
        asset_mint,
        ctx.accounts.asset_mint.key(),
        TreasuryError::InvalidMint
    );

    // EFFECTS
    let custody_balance = ctx.accounts.ledger.debit(currency_id, amount)?;

    // INTERACTIONS
    require!(
        ctx.accounts.custody_account.amount >= amount,
        TreasuryError::TransferFailed
    );

    let bump = [ctx.accounts.treasury.authority_bump];
    let signer_seeds: &[&[u8]] = &[TREASURY_AUTHORITY_SEED, &bump];
    let user_before = ctx.accounts.user_asset_account.amount;
    token::transfer_from_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.custody_account.to_account_info(),
        ctx.accounts.user_asset_account.to_account_info(),
        ctx.accounts.treasury_authority.to_account_info(),
        amount,
        signer_seeds,
    )?;
    ctx.accounts.user_asset_account.reload()?;
    engine::ensure_transfer_flow(
        user_before,
        ctx.accounts.user_asset_account.amount,
        amount,
        Flow::In,
    )?;

    emit!(BalanceWithdrawn {
        depositor: ctx.accounts.user.key(),
        currency_id,
        amount,
        custody_balance,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
