use anchor_lang::prelude::*;

use crate::{constants::*, errors::TreasuryError};

/// Uninvested funds held for the depositor in one currency
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct CustodyBalance {
    pub currency_id: u64,           // 8 bytes
    pub amount: u64,                // 8 bytes
}

/// Amount the depositor currently has deployed into one protocol
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct InvestmentRecord {
    pub protocol_name: String,      // 4 + up to 32 bytes
    pub amount: u64,                // 8 bytes
}

/// Per-depositor bookkeeping: custody balances and investment records
///
/// Security considerations:
/// - PDA seeded by treasury and depositor, so a caller can only ever
///   touch their own ledger
/// - Records never go negative; an over-debit is an error, not a clamp
/// - Zeroed entries are pruned to keep capacity available
#[account]
pub struct DepositorLedger {
    pub treasury: Pubkey,                       // 32 bytes
    pub depositor: Pubkey,                      // 32 bytes
    pub balances: Vec<CustodyBalance>,          // 4 + (16 * 16) bytes
    pub investments: Vec<InvestmentRecord>,     // 4 + (10 * 44) bytes
    pub bump: u8,                               // 1 byte
}

impl DepositorLedger {
    pub const SPACE: usize = 8
        + 32
        + 32
        + 4
        + (MAX_CURRENCIES * 16)
        + 4
        + (MAX_PROTOCOLS * (4 + MAX_NAME_LEN + 8))
        + 1;

    /// Fill in identity fields on first use of an `init_if_needed` ledger
    pub fn ensure_initialized(&mut self, treasury: Pubkey, depositor: Pubkey, bump: u8) {
        if self.depositor == Pubkey::default() {
            self.treasury = treasury;
            self.depositor = depositor;
            self.bump = bump;
        }
    }

    /// Read a ledger that may not exist yet; a missing ledger is `None`
    pub fn load(info: &AccountInfo) -> Result<Option<Self>> {
        if info.data_is_empty() {
            return Ok(None);
        }
        require_keys_eq!(*info.owner, crate::ID, TreasuryError::InvalidOwner);

        let data = info.try_borrow_data()?;
        Self::try_deserialize(&mut &data[..]).map(Some)
    }

    pub fn balance_of(&self, currency_id: u64) -> u64 {
        self.balances
            .iter()
            .find(|b| b.currency_id == currency_id)
            .map_or(0, |b| b.amount)
    }

    pub fn invest_of(&self, protocol_name: &str) -> u64 {
        self.investments
            .iter()
            .find(|r| r.protocol_name == protocol_name)
            .map_or(0, |r| r.amount)
    }

    /// Increase the custody balance, returning the new balance
    pub fn credit(&mut self, currency_id: u64, amount: u64) -> Result<u64> {
        let balance = self
            .balance_of(currency_id)
            .checked_add(amount)
            .ok_or(error!(TreasuryError::MathOverflow))?;
        self.set_balance(currency_id, balance)?;
        Ok(balance)
    }

    /// Decrease the custody balance, returning the new balance
    pub fn debit(&mut self, currency_id: u64, amount: u64) -> Result<u64> {
        let balance = self
            .balance_of(currency_id)
            .checked_sub(amount)
            .ok_or(error!(TreasuryError::InsufficientBalance))?;
        self.set_balance(currency_id, balance)?;
        Ok(balance)
    }

    /// Apply a signed delta to an investment record, returning the new amount
    pub fn record_investment(&mut self, protocol_name: &str, delta: i128) -> Result<u64> {
        let current = self.invest_of(protocol_name) as i128;
        let updated = current
            .checked_add(delta)
            .ok_or(error!(TreasuryError::MathOverflow))?;
        require!(updated >= 0, TreasuryError::InsufficientBalance);
        let updated = u64::try_from(updated).map_err(|_| error!(TreasuryError::MathOverflow))?;

        match self
            .investments
            .iter()
            .position(|r| r.protocol_name == protocol_name)
        {
            Some(index) if updated == 0 => {
                self.investments.remove(index);
            }
            Some(index) => self.investments[index].amount = updated,
            None if updated == 0 => {}
            None => {
                require!(
                    self.investments.len() < MAX_PROTOCOLS,
                    TreasuryError::LedgerFull
                );
                self.investments.push(InvestmentRecord {
                    protocol_name: protocol_name.to_string(),
                    amount: updated,
                });
            }
        }

        Ok(updated)
    }

    fn set_balance(&mut self, currency_id: u64, amount: u64) -> Result<()> {
        match self
            .balances
            .iter()
            .position(|b| b.currency_id == currency_id)
        {
            Some(index) if amount == 0 => {
                self.balances.remove(index);
            }
            Some(index) => self.balances[index].amount = amount,
            None if amount == 0 => {}
            None => {
                require!(
                    self.balances.len() < MAX_CURRENCIES,
                    TreasuryError::LedgerFull
                );
                self.balances.push(CustodyBalance {
                    currency_id,
                    amount,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_ledger() -> DepositorLedger {
        DepositorLedger {
            treasury: Pubkey::new_unique(),
            depositor: Pubkey::new_unique(),
            balances: Vec::new(),
            investments: Vec::new(),
            bump: 0,
        }
    }

    #[test]
    fn test_credit_and_debit() {
        let mut ledger = mock_ledger();
        assert_eq!(ledger.credit(1, 500).unwrap(), 500);
        assert_eq!(ledger.credit(1, 250).unwrap(), 750);
        assert_eq!(ledger.debit(1, 700).unwrap(), 50);
        assert_eq!(ledger.balance_of(1), 50);
        assert_eq!(ledger.balance_of(2), 0);
    }

    #[test]
    fn test_debit_beyond_balance() {
        let mut ledger = mock_ledger();
        ledger.credit(1, 100).unwrap();

        let err = ledger.debit(1, 101).unwrap_err();
        assert_eq!(err, TreasuryError::InsufficientBalance.into());
        assert_eq!(ledger.balance_of(1), 100);

        let err = ledger.debit(2, 1).unwrap_err();
        assert_eq!(err, TreasuryError::InsufficientBalance.into());
    }

    #[test]
    fn test_credit_overflow() {
        let mut ledger = mock_ledger();
        ledger.credit(1, u64::MAX).unwrap();
        let err = ledger.credit(1, 1).unwrap_err();
        assert_eq!(err, TreasuryError::MathOverflow.into());
        assert_eq!(ledger.balance_of(1), u64::MAX);
    }

    #[test]
    fn test_record_investment_signed_delta() {
        let mut ledger = mock_ledger();
        assert_eq!(ledger.record_investment("AAVE", 1000).unwrap(), 1000);
        assert_eq!(ledger.record_investment("AAVE", -400).unwrap(), 600);
        assert_eq!(ledger.invest_of("AAVE"), 600);
        assert_eq!(ledger.invest_of("Compound"), 0);
    }

    #[test]
    fn test_record_investment_never_negative() {
        let mut ledger = mock_ledger();
        ledger.record_investment("AAVE", 100).unwrap();

        let err = ledger.record_investment("AAVE", -101).unwrap_err();
        assert_eq!(err, TreasuryError::InsufficientBalance.into());
        assert_eq!(ledger.invest_of("AAVE"), 100);

        let err = ledger.record_investment("Compound", -1).unwrap_err();
        assert_eq!(err, TreasuryError::InsufficientBalance.into());
    }

    #[test]
    fn test_zeroed_entries_are_pruned() {
        let mut ledger = mock_ledger();
        ledger.credit(1, 10).unwrap();
        ledger.record_investment("AAVE", 10).unwrap();

        ledger.debit(1, 10).unwrap();
        ledger.record_investment("AAVE", -10).unwrap();

        assert!(ledger.balances.is_empty());
        assert!(ledger.investments.is_empty());
    }

    #[test]
    fn test_ledger_capacity() {
        let mut ledger = mock_ledger();
        for i in 0..MAX_PROTOCOLS {
            ledger.record_investment(&format!("P{i}"), 1).unwrap();
        }
        let err = ledger.record_investment("Overflow", 1).unwrap_err();
        assert_eq!(err, TreasuryError::LedgerFull.into());
    }

    #[test]
    fn test_ensure_initialized_only_once() {
        let mut ledger = mock_ledger();
        ledger.depositor = Pubkey::default();
        let treasury = Pubkey::new_unique();
        let depositor = Pubkey::new_unique();

        ledger.ensure_initialized(treasury, depositor, 254);
        ledger.ensure_initialized(Pubkey::new_unique(), Pubkey::new_unique(), 1);

        assert_eq!(ledger.treasury, treasury);
        assert_eq!(ledger.depositor, depositor);
        assert_eq!(ledger.bump, 254);
    }
}
