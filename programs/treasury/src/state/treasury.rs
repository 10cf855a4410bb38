use anchor_lang::prelude::*;

use crate::{constants::*, errors::TreasuryError};

/// Global treasury state: the owner set and PDA bumps
///
/// Security considerations:
/// - Every mutating instruction takes this account writable, so the runtime
///   write lock serializes all ledger and registry mutations
/// - Owner set is self-expanding: any owner may add another
/// - 64 bytes padding for future upgrades
#[account]
pub struct Treasury {
    /// Principals allowed to manage registries and the owner set
    pub owners: Vec<Pubkey>,        // 4 + (10 * 32) bytes

    /// Bump seed for treasury state PDA
    pub bump: u8,                   // 1 byte

    /// Bump seed for treasury authority PDA
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 64],        // 64 bytes
}

impl Treasury {
    /// 8 (discriminator) + 4 (vec len) + (10 * 32) + 1 + 1 + 64 (padding)
    pub const SPACE: usize = 8 + 4 + (MAX_OWNERS * 32) + 1 + 1 + 64;

    pub fn is_owner(&self, principal: &Pubkey) -> bool {
        self.owners.iter().any(|owner| owner == principal)
    }

    /// Add `principal` to the owner set on behalf of `caller`
    ///
    /// Re-adding an existing owner is a no-op and returns `Ok(false)`.
    pub fn add_owner(&mut self, caller: &Pubkey, principal: Pubkey) -> Result<bool> {
        require!(self.is_owner(caller), TreasuryError::Unauthorized);

        if self.is_owner(&principal) {
            return Ok(false);
        }

        require!(self.owners.len() < MAX_OWNERS, TreasuryError::OwnerSetFull);
        self.owners.push(principal);
        Ok(true)
    }
}
