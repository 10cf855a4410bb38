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

/// Deposit and split the amount across every active protocol of the currency
///
/// Remaining accounts: `[adapter_program, adapter_state, adapter_reserve]`
/// for each protocol that receives a non-zero share, in ascending id order.
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: User must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Treasury, registries and ledger validated with seeds
/// ✅ 5. CPI SAFETY: Adapter accounts must match the protocol registry
/// ✅ 6. MATH SAFETY: Shares floored with u128 intermediates
/// ✅ 8. BUSINESS LOGIC: Ledger committed only after every adapter accepted
/// ✅ 10. EVENTS: Emits AllocationRouted per protocol and Invested
#[derive(Accounts)]
pub struct Invest<'info> {
    #[account(mut)]
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

    #[account(
        init_if_needed,
        payer = user,
        space = DepositorLedger::SPACE,
        seeds = [LEDGER_SEED, treasury.key().as_ref(), user.key().as_ref()],
        bump,
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
    pub system_program: Program<'info, System>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Invest<'info>>,
    currency_id: u64,
    amount: u64,
) -> Result<()> {
    // CHECKS: Resolve the currency and plan every share before moving funds
    require!(amount > 0, TreasuryError::ZeroAmount);

    let currency = ctx
        .accounts
        .currency_registry
        .get_active_currency(currency_id)?
        .clone();
    require_keys_eq!(
        currency.asset_mint,
        ctx.accounts.asset_mint.key(),
        TreasuryError::InvalidMint
    );
    require!(
        ctx.accounts.user_asset_account.amount >= amount,
        TreasuryError::TransferFailed
    );

    let registry = &ctx.accounts.protocol_registry;
    let plan = engine::plan_investment(registry, &currency, amount)?;
    let routed = plan
        .allocations
        .iter()
        .map(|allocation| registry.get_protocol(allocation.protocol_id))
        .collect::<Result<Vec<_>>>()?;

    let bump = [ctx.accounts.treasury.authority_bump];
    let signer_seeds: &[&[u8]] = &[TREASURY_AUTHORITY_SEED, &bump];
    let funding = FundingAccounts {
        custody: ctx.accounts.custody_account.to_account_info(),
        authority: ctx.accounts.treasury_authority.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    };
    let mut adapters = CpiAdapter::load_funded(&routed, ctx.remaining_accounts, &funding)?;

    // INTERACTIONS: Pull the full amount into custody, then route the shares
    let user_before = ctx.accounts.user_asset_account.amount;
    let custody_before = ctx.accounts.custody_account.amount;
    token::transfer_into_custody(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_asset_account.to_account_info(),
        ctx.accounts.custody_account.to_account_info(),
        ctx.accounts.user.to_account_info(),
        amount,
    )?;

    // EFFECTS: The engine commits the ledger once every adapter accepted
    let depositor = ctx.accounts.user.key();
    let treasury_key = ctx.accounts.treasury.key();
    let ledger = &mut ctx.accounts.ledger;
    ledger.ensure_initialized(treasury_key, depositor, ctx.bumps.ledger);
    engine::execute_investment(ledger, &plan, adapters.as_mut_slice())?;

    // Only the unrouted remainder may stay behind in custody
    ctx.accounts.user_asset_account.reload()?;
    ctx.accounts.custody_account.reload()?;
    engine::ensure_transfer_flow(
        user_before,
        ctx.accounts.user_asset_account.amount,
        amount,
        Flow::Out,
    )?;
    engine::ensure_adapter_flow(
        custody_before,
        ctx.accounts.custody_account.amount,
        plan.remainder,
        Flow::In,
    )?;

    let timestamp = Clock::get()?.unix_timestamp;
    for allocation in &plan.allocations {
        emit!(AllocationRouted {
            depositor,
            protocol_id: allocation.protocol_id,
            protocol_name: allocation.protocol_name.clone(),
            amount: allocation.amount,
            timestamp,
        });
    }

    emit!(Invested {
        depositor,
        currency_id,
        amount,
        routed: plan.routed(),
        remainder: plan.remainder,
        timestamp,
    });

    Ok(())
}
