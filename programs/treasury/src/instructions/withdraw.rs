use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    adapter::{CpiAdapter, FundingAccounts},
    constants::*,
    engine::{self, Flow},
    errors::*,
    events::*,
    state::*,
    utils::token,
};

/// Pull funds back from one protocol and pay them out to the depositor
///
/// Inactive protocols and currencies stay withdrawable.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
    )]
    pub treasury: Account<'info, Treasury>,

    /// CHECK: PDA used as custody authority and adapter signer, validated by seeds
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
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,

    /// Security: Only the depositor's own ledger, validated by seeds
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

    /// CHECK: Validated against the protocol registry before any call
    pub adapter_program: UncheckedAccount<'info>,

    /// CHECK: Validated against the protocol registry before any call
    #[account(mut)]
    pub adapter_state: UncheckedAccount<'info>,

    /// CHECK: Validated against the protocol registry before any call
    #[account(mut)]
    pub adapter_reserve: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(
    ctx: Context<Withdraw>,
    protocol_id: u64,
    currency_id: u64,
    amount: u64,
) -> Result<()> {
    let currency = ctx
        .accounts
        .currency_registry
        .get_currency(currency_id)?
        .clone();
    require_keys_eq!(
        currency.asset_mint,
        ctx.accounts.asset_mint.key(),
        TreasuryError::InvalidMint
    );
    let protocol = ctx
        .accounts
        .protocol_registry
        .get_protocol(protocol_id)?
        .clone();

    let bump = [ctx.accounts.treasury.authority_bump];
    let signer_seeds: &[&[u8]] = &[TREASURY_AUTHORITY_SEED, &bump];
    let funding = FundingAccounts {
        custody: ctx.accounts.custody_account.to_account_info(),
        authority: ctx.accounts.treasury_authority.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    };
    let mut adapter = CpiAdapter::funded(
        &protocol,
        &ctx.accounts.adapter_program.to_account_info(),
        &ctx.accounts.adapter_state.to_account_info(),
        &ctx.accounts.adapter_reserve.to_account_info(),
        funding,
    )?;

    let custody_before = ctx.accounts.custody_account.amount;
    let remaining_investment = engine::execute_withdrawal(
        &mut ctx.accounts.ledger,
        &currency,
        &protocol,
        &mut adapter,
        amount,
    )?;

    // Custody is shared by every depositor; the adapter must have returned
    // exactly `amount` before anything is paid out
    ctx.accounts.custody_account.reload()?;
    engine::ensure_adapter_flow(
        custody_before,
        ctx.accounts.custody_account.amount,
        amount,
        Flow::In,
    )?;

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

    emit!(Withdrawn {
        depositor: ctx.accounts.user.key(),
        protocol_id,
        currency_id,
        amount,
        remaining_investment,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
