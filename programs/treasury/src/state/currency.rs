use anchor_lang::prelude::*;

use crate::{constants::*, errors::TreasuryError};

/// Registered fungible asset the treasury can custody and invest
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct Currency {
    /// Sequential id, starting at 1
    pub id: u64,                    // 8 bytes

    /// Display name (e.g., "USDC"), unique within the registry
    pub name: String,               // 4 + up to 32 bytes

    /// Mint of the underlying SPL token
    pub asset_mint: Pubkey,         // 32 bytes

    pub active: bool,               // 1 byte
}

impl Currency {
    pub const SPACE: usize = 8 + 4 + MAX_NAME_LEN + 32 + 1;
}

/// Append-only registry of tradable currencies
///
/// Ids are assigned sequentially and equal `index + 1`; id 0 is never
/// assigned and always resolves to `InvalidIndex`.
#[account]
pub struct CurrencyRegistry {
    /// Treasury this registry belongs to
    pub treasury: Pubkey,               // 32 bytes

    pub currencies: Vec<Currency>,      // 4 + (16 * 77) bytes

    /// Bump seed for PDA
    pub bump: u8,                       // 1 byte
}

impl CurrencyRegistry {
    /// 8 (discriminator) + 32 (treasury) + 4 (vec len) + (16 * 77) + 1 (bump)
    pub const SPACE: usize = 8 + 32 + 4 + (MAX_CURRENCIES * Currency::SPACE) + 1;

    /// Register a currency and return its id
    pub fn add_currency(&mut self, name: String, asset_mint: Pubkey) -> Result<u64> {
        require!(name.len() <= MAX_NAME_LEN, TreasuryError::NameTooLong);
        require!(
            !self
                .currencies
                .iter()
                .any(|c| c.name == name || c.asset_mint == asset_mint),
            TreasuryError::AlreadyRegistered
        );
        require!(
            self.currencies.len() < MAX_CURRENCIES,
            TreasuryError::RegistryFull
        );

        let id = self.currencies.len() as u64 + 1;
        self.currencies.push(Currency {
            id,
            name,
            asset_mint,
            active: true,
        });

        Ok(id)
    }

    pub fn get_currency(&self, id: u64) -> Result<&Currency> {
        id.checked_sub(1)
            .and_then(|index| self.currencies.get(index as usize))
            .ok_or_else(|| error!(TreasuryError::InvalidIndex))
    }

    /// Lookup that additionally rejects deactivated currencies
    pub fn get_active_currency(&self, id: u64) -> Result<&Currency> {
        let currency = self.get_currency(id)?;
        require!(currency.active, TreasuryError::InactiveEntity);
        Ok(currency)
    }

    pub fn set_active(&mut self, id: u64, active: bool) -> Result<()> {
        self.get_currency(id)?;
        self.currencies[(id - 1) as usize].active = active;
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.name == name)
    }

    pub fn find_by_mint(&self, asset_mint: &Pubkey) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.asset_mint == *asset_mint)
    }
}
