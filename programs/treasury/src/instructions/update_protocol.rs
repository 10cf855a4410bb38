use anchor_lang::prelude::*;

use crate::{events::*, instructions::ConfigureProtocol};

pub fn handler(
    ctx: Context<ConfigureProtocol>,
    protocol_id: u64,
    name: String,
    external_ref: Pubkey,
    percentage: u8,
) -> Result<()> {
    let config = ctx
        .accounts
        .protocol_config(name, external_ref, percentage)?;
    let (name, adapter, asset_mint) = (config.name.clone(), config.adapter, config.asset_mint);

    ctx.accounts
        .protocol_registry
        .update_protocol(protocol_id, config)?;

    emit!(ProtocolUpdated {
        protocol_id,
        name,
        adapter,
        asset_mint,
        percentage,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
