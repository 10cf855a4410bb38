use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::{constants::*, errors::*, events::*, state::*};

/// Accounts shared by `add_protocol` and `update_protocol`
///
/// The adapter triple is validated structurally here; the reserve mint
/// decides which currency the protocol serves.
#[derive(Accounts)]
pub struct ConfigureProtocol<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED],
        bump = treasury.bump,
        constraint = treasury.is_owner(&owner.key()) @ TreasuryError::Unauthorized,
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [CURRENCY_REGISTRY_SEED, treasury.key().as_ref()],
        bump = currency_registry.bump,
    )]
    pub currency_registry: Account<'info, CurrencyRegistry>,

    #[account(
        mut,
        seeds = [PROTOCOL_REGISTRY_SEED, treasury.key().as_ref()],
        bump = protocol_registry.bump,
    )]
    pub protocol_registry: Account<'info, ProtocolRegistry>,

    /// CHECK: Adapter program, must be executable
    #[account(executable)]
    pub adapter_program: UncheckedAccount<'info>,

    /// CHECK: Adapter state, must be owned by the adapter program
    #[account(
        owner = adapter_program.key() @ TreasuryError::InvalidAdapterAccounts,
    )]
    pub adapter_state: UncheckedAccount<'info>,

    /// Token account where the adapter holds invested funds
    /// Security: Must be controlled by the adapter state
    #[account(
        constraint = adapter_reserve.owner == adapter_state.key() @ TreasuryError::InvalidAdapterAccounts,
    )]
    pub adapter_reserve: Account<'info, TokenAccount>,
}

impl<'info> ConfigureProtocol<'info> {
    pub(crate) fn protocol_config(
        &self,
        name: String,
        external_ref: Pubkey,
        percentage: u8,
    ) -> Result<ProtocolConfig> {
        let asset_mint = self.adapter_reserve.mint;
        require!(
            self.currency_registry.find_by_mint(&asset_mint).is_some(),
            TreasuryError::AssetMismatch
        );

        Ok(ProtocolConfig {
            name,
            external_ref,
            adapter: self.adapter_state.key(),
            adapter_program: self.adapter_program.key(),
            adapter_reserve: self.adapter_reserve.key(),
            asset_mint,
            percentage,
        })
    }
}

pub fn handler(
    ctx: Context<ConfigureProtocol>,
    name: String,
    external_ref: Pubkey,
    percentage: u8,
) -> Result<u64> {
    let config = ctx
        .accounts
        .protocol_config(name, external_ref, percentage)?;
    let (name, adapter, asset_mint) = (config.name.clone(), config.adapter, config.asset_mint);

    let protocol_id = ctx.accounts.protocol_registry.add_protocol(config)?;

    emit!(ProtocolAdded {
        protocol_id,
        name,
        adapter,
        asset_mint,
        percentage,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(protocol_id)
}
