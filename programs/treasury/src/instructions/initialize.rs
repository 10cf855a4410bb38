use anchor_lang::prelude::*;

use crate::{constants::*, events::*, state::*};

/// Create the treasury with the caller as its first owner, plus both registries
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// First owner of the treasury
    /// Security: Must be signer, stored in the owner set
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Treasury state PDA
    /// Security: Singleton, a second initialize fails on the existing account
    #[account(
        init,
        payer = authority,
        space = Treasury::SPACE,
        seeds = [TREASURY_SEED],
        bump
    )]
    pub treasury: Account<'info, Treasury>,

    /// CHECK: PDA used as custody authority and adapter signer, validated by seeds
    #[account(
        seeds = [TREASURY_AUTHORITY_SEED],
        bump
    )]
    pub treasury_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        space = CurrencyRegistry::SPACE,
        seeds = [CURRENCY_REGISTRY_SEED, treasury.key().as_ref()],
        bump
    )]
    pub currency_registry: Account<'info, CurrencyRegistry>,

    #[account(
        init,
        payer = authority,
        space = ProtocolRegistry::SPACE,
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    let owner = ctx.accounts.authority.key();
    let treasury = &mut ctx.accounts.treasury;

    // EFFECTS: Initialize treasury state
    treasury.owners = vec![owner];
    treasury.bump = ctx.bumps.treasury;
    treasury.authority_bump = ctx.bumps.treasury_authority;
    treasury._reserved = [0; 64];
    let treasury_key = treasury.key();

    let currency_registry = &mut ctx.accounts.currency_registry;
    currency_registry.treasury = treasury_key;
    currency_registry.currencies = Vec::new();
    currency_registry.bump = ctx.bumps.currency_registry;

    let protocol_registry = &mut ctx.accounts.protocol_registry;
    protocol_registry.treasury = treasury_key;
    protocol_registry.protocols = Vec::new();
    protocol_registry.retired_names = Vec::new();
    protocol_registry.bump = ctx.bumps.protocol_registry;

    emit!(TreasuryInitialized {
        treasury: treasury_key,
        owner,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Treasury initialized, owner: {}", owner);

    Ok(())
}
