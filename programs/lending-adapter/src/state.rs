use anchor_lang::prelude::*;

use crate::{constants::*, errors::AdapterError};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct Position {
    pub holder: Pubkey,     // 32 bytes
    pub amount: u64,        // 8 bytes
}

/// Adapter state PDA wrapping one lending pool for one asset
///
/// Funds sit in the reserve token account, whose token authority is this
/// account. Only owners may supply or redeem; positions are tracked per
/// signing holder.
#[account]
pub struct AdapterState {
    pub owners: Vec<Pubkey>,        // 4 + (10 * 32) bytes

    pub asset_mint: Pubkey,         // 32 bytes

    /// Wrapped lending pool
    pub pool: Pubkey,               // 32 bytes

    pub reserve: Pubkey,            // 32 bytes

    /// Pool liquidity rate, scaled by `RATE_SCALE`
    pub yield_rate: u128,           // 16 bytes

    pub total_deposited: u64,       // 8 bytes

    pub positions: Vec<Position>,   // 4 + (10 * 40) bytes

    pub bump: u8,                   // 1 byte
    pub reserve_bump: u8,           // 1 byte
}

impl AdapterState {
    pub const SPACE: usize = 8
        + 4 + (MAX_OWNERS * 32)
        + 32 + 32 + 32
        + 16 + 8
        + 4 + (MAX_POSITIONS * 40)
        + 1 + 1;

    pub fn is_owner(&self, principal: &Pubkey) -> bool {
        self.owners.iter().any(|owner| owner == principal)
    }

    /// Returns `Ok(false)` when `principal` already is an owner
    pub fn add_owner(&mut self, caller: &Pubkey, principal: Pubkey) -> Result<bool> {
        require!(self.is_owner(caller), AdapterError::Unauthorized);
        if self.is_owner(&principal) {
            return Ok(false);
        }

        require!(self.owners.len() < MAX_OWNERS, AdapterError::OwnerSetFull);
        self.owners.push(principal);
        Ok(true)
    }

    pub fn position_of(&self, holder: &Pubkey) -> u64 {
        self.positions
            .iter()
            .find(|p| p.holder == *holder)
            .map_or(0, |p| p.amount)
    }

    /// Grow `holder`'s position, returning the new position
    pub fn supply(&mut self, holder: Pubkey, amount: u64) -> Result<u64> {
        require!(amount > 0, AdapterError::ZeroAmount);

        let total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(AdapterError::MathOverflow)?;

        let position = match self.positions.iter().position(|p| p.holder == holder) {
            Some(index) => {
                let updated = self.positions[index]
                    .amount
                    .checked_add(amount)
                    .ok_or(AdapterError::MathOverflow)?;
                self.positions[index].amount = updated;
                updated
            }
            None => {
                require!(
                    self.positions.len() < MAX_POSITIONS,
                    AdapterError::PositionsFull
                );
                self.positions.push(Position { holder, amount });
                amount
            }
        };

        self.total_deposited = total_deposited;
        Ok(position)
    }

    /// Shrink `holder`'s position, returning the new position
    pub fn redeem(&mut self, holder: &Pubkey, amount: u64) -> Result<u64> {
        require!(amount > 0, AdapterError::ZeroAmount);

        let index = self
            .positions
            .iter()
            .position(|p| p.holder == *holder)
            .ok_or(AdapterError::InsufficientPosition)?;
        let remaining = self.positions[index]
            .amount
            .checked_sub(amount)
            .ok_or(AdapterError::InsufficientPosition)?;

        self.total_deposited = self
            .total_deposited
            .checked_sub(amount)
            .ok_or(AdapterError::MathOverflow)?;

        if remaining == 0 {
            self.positions.remove(index);
        } else {
            self.positions[index].amount = remaining;
        }

        Ok(remaining)
    }
}
