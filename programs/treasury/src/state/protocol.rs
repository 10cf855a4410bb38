use anchor_lang::prelude::*;

use crate::{constants::*, errors::TreasuryError};

/// Registered yield strategy, reachable only through its adapter
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct Protocol {
    /// Sequential id, starting at 1
    pub id: u64,                    // 8 bytes

    /// Human-readable name (e.g., "AAVE"); keys investment records
    pub name: String,               // 4 + up to 32 bytes

    /// Reference to the wrapped external protocol (pool, market, ...)
    pub external_ref: Pubkey,       // 32 bytes

    /// Adapter state account
    pub adapter: Pubkey,            // 32 bytes

    /// Program owning the adapter state
    pub adapter_program: Pubkey,    // 32 bytes

    /// Adapter token account holding invested funds
    pub adapter_reserve: Pubkey,    // 32 bytes

    /// Mint of the reserve; ties the protocol to a currency
    pub asset_mint: Pubkey,         // 32 bytes

    /// Parts-per-hundred of each invested amount routed here
    pub percentage: u8,             // 1 byte

    pub active: bool,               // 1 byte
}

impl Protocol {
    pub const SPACE: usize = 8 + 4 + MAX_NAME_LEN + (5 * 32) + 1 + 1;
}

/// Name a protocol held before a rename
///
/// Investment records stay keyed by the old name, so it remains reserved for
/// the protocol that gave it up.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct RetiredName {
    pub protocol_id: u64,           // 8 bytes
    pub name: String,               // 4 + up to 32 bytes
}

impl RetiredName {
    pub const SPACE: usize = 8 + 4 + MAX_NAME_LEN;
}

/// Fields of a protocol, supplied on add and on update
#[derive(Clone, Debug, PartialEq)]
pub struct ProtocolConfig {
    pub name: String,
    pub external_ref: Pubkey,
    pub adapter: Pubkey,
    pub adapter_program: Pubkey,
    pub adapter_reserve: Pubkey,
    pub asset_mint: Pubkey,
    pub percentage: u8,
}

/// Indexed registry of yield strategies
///
/// Allocation policy: the percentages of active protocols sharing an asset
/// mint never sum above 100. Under-allocation is allowed; the unrouted
/// remainder of an invest stays in custody.
#[account]
pub struct ProtocolRegistry {
    /// Treasury this registry belongs to
    pub treasury: Pubkey,               // 32 bytes

    pub protocols: Vec<Protocol>,       // 4 + (10 * 206) bytes

    pub retired_names: Vec<RetiredName>, // 4 + (10 * 44) bytes

    /// Bump seed for PDA
    pub bump: u8,                       // 1 byte
}

impl ProtocolRegistry {
    /// 8 (discriminator) + 32 (treasury) + 4 + (10 * 206) + 4 + (10 * 44) + 1 (bump)
    pub const SPACE: usize = 8
        + 32
        + 4
        + (MAX_PROTOCOLS * Protocol::SPACE)
        + 4
        + (MAX_RETIRED_NAMES * RetiredName::SPACE)
        + 1;

    /// Register a protocol as active and return its id
    pub fn add_protocol(&mut self, config: ProtocolConfig) -> Result<u64> {
        self.validate(&config, None)?;
        require!(
            self.protocols.len() < MAX_PROTOCOLS,
            TreasuryError::RegistryFull
        );
        self.ensure_allocation(&config.asset_mint, config.percentage, None)?;

        let id = self.protocols.len() as u64 + 1;
        self.protocols.push(Protocol {
            id,
            name: config.name,
            external_ref: config.external_ref,
            adapter: config.adapter,
            adapter_program: config.adapter_program,
            adapter_reserve: config.adapter_reserve,
            asset_mint: config.asset_mint,
            percentage: config.percentage,
            active: true,
        });

        Ok(id)
    }

    /// Replace the mutable fields of an existing protocol
    ///
    /// The id, the asset mint and the active flag are left untouched. A
    /// rename retires the previous name for this protocol.
    pub fn update_protocol(&mut self, id: u64, config: ProtocolConfig) -> Result<()> {
        let index = self.index_of(id)?;
        // Records are denominated in the protocol's asset
        require_keys_eq!(
            config.asset_mint,
            self.protocols[index].asset_mint,
            TreasuryError::AssetMismatch
        );
        self.validate(&config, Some(id))?;
        if self.protocols[index].active {
            self.ensure_allocation(&config.asset_mint, config.percentage, Some(id))?;
        }

        let previous = self.protocols[index].name.clone();
        if previous != config.name && !self.is_retired(id, &previous) {
            require!(
                self.retired_names.len() < MAX_RETIRED_NAMES,
                TreasuryError::RegistryFull
            );
            self.retired_names.push(RetiredName {
                protocol_id: id,
                name: previous,
            });
        }

        let protocol = &mut self.protocols[index];
        protocol.name = config.name;
        protocol.external_ref = config.external_ref;
        protocol.adapter = config.adapter;
        protocol.adapter_program = config.adapter_program;
        protocol.adapter_reserve = config.adapter_reserve;
        protocol.percentage = config.percentage;

        Ok(())
    }

    pub fn get_protocol(&self, id: u64) -> Result<&Protocol> {
        let index = self.index_of(id)?;
        Ok(&self.protocols[index])
    }

    pub fn set_active(&mut self, id: u64, active: bool) -> Result<()> {
        let index = self.index_of(id)?;
        let protocol = &self.protocols[index];
        if active && !protocol.active {
            let (asset_mint, percentage) = (protocol.asset_mint, protocol.percentage);
            self.ensure_allocation(&asset_mint, percentage, Some(id))?;
        }

        self.protocols[index].active = active;
        Ok(())
    }

    /// Active protocols tied to `asset_mint`, in ascending id order
    pub fn active_for<'a>(&'a self, asset_mint: &'a Pubkey) -> impl Iterator<Item = &'a Protocol> + 'a {
        self.protocols
            .iter()
            .filter(move |p| p.active && p.asset_mint == *asset_mint)
    }

    /// Sum of active percentages for `asset_mint`, optionally skipping one id
    pub fn allocated_percentage(&self, asset_mint: &Pubkey, excluding: Option<u64>) -> u64 {
        self.active_for(asset_mint)
            .filter(|p| Some(p.id) != excluding)
            .map(|p| p.percentage as u64)
            .sum()
    }

    fn index_of(&self, id: u64) -> Result<usize> {
        match id.checked_sub(1) {
            Some(index) if (index as usize) < self.protocols.len() => Ok(index as usize),
            _ => Err(error!(TreasuryError::InvalidIndex)),
        }
    }

    fn is_retired(&self, id: u64, name: &str) -> bool {
        self.retired_names
            .iter()
            .any(|retired| retired.protocol_id == id && retired.name == name)
    }

    /// Names are unique across current protocols and names retired by others
    fn validate(&self, config: &ProtocolConfig, id: Option<u64>) -> Result<()> {
        require!(config.name.len() <= MAX_NAME_LEN, TreasuryError::NameTooLong);
        require!(
            config.percentage as u64 <= PERCENTAGE_BASE,
            TreasuryError::InvalidPercentage
        );
        require!(
            !self
                .protocols
                .iter()
                .any(|p| p.name == config.name && Some(p.id) != id),
            TreasuryError::AlreadyRegistered
        );
        require!(
            !self
                .retired_names
                .iter()
                .any(|r| r.name == config.name && Some(r.protocol_id) != id),
            TreasuryError::AlreadyRegistered
        );
        Ok(())
    }

    fn ensure_allocation(&self, asset_mint: &Pubkey, percentage: u8, id: Option<u64>) -> Result<()> {
        let allocated = self.allocated_percentage(asset_mint, id);
        require!(
            allocated + percentage as u64 <= PERCENTAGE_BASE,
            TreasuryError::AllocationExceeded
        );
        Ok(())
    }
}
