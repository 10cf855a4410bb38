use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke, invoke_signed},
};
use anchor_spl::token::accessor;

use crate::{
    constants::*,
    engine::{self, Flow},
    errors::TreasuryError,
    state::Protocol,
};

// Instruction discriminators of the adapter interface:
// first 8 bytes of sha256("global:<instruction name>")
pub const INVEST_DISCRIMINATOR: [u8; 8] = [13, 245, 180, 103, 254, 182, 121, 4];
pub const WITHDRAW_DISCRIMINATOR: [u8; 8] = [183, 18, 70, 156, 148, 109, 161, 34];
pub const CURRENT_YIELD_DISCRIMINATOR: [u8; 8] = [163, 188, 183, 97, 103, 249, 42, 220];
pub const BALANCE_OF_DISCRIMINATOR: [u8; 8] = [118, 207, 187, 208, 110, 235, 118, 198];

/// Capability set every yield protocol adapter provides
///
/// Implementations report rejected calls as errors and never swallow them.
pub trait Adapter {
    /// Move `amount` of the underlying currency into the wrapped protocol
    fn invest(&mut self, amount: u64) -> Result<()>;

    /// Redeem `amount` from the wrapped protocol back into treasury custody
    fn withdraw(&mut self, amount: u64) -> Result<()>;

    /// Current yield estimate, fixed point with `YIELD_SCALE`
    fn current_yield(&self) -> Result<u128>;

    /// Position currently held by `holder`
    fn balance_of(&self, holder: &Pubkey) -> Result<u64>;
}

/// Treasury-side accounts an adapter needs to move funds
#[derive(Clone)]
pub struct FundingAccounts<'a, 'info> {
    /// Treasury custody token account for the currency
    pub custody: AccountInfo<'info>,
    /// Treasury authority PDA, signs for custody
    pub authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [u8]],
}

/// Adapter reached by CPI into an adapter program
///
/// Account layout of the adapter interface:
/// - invest / withdraw: adapter state (w), reserve (w), treasury custody (w),
///   treasury authority (signer), token program
/// - current_yield / balance_of: adapter state
pub struct CpiAdapter<'a, 'info> {
    program: AccountInfo<'info>,
    state: AccountInfo<'info>,
    funding: Option<(AccountInfo<'info>, FundingAccounts<'a, 'info>)>,
}

impl<'a, 'info> CpiAdapter<'a, 'info> {
    /// Adapter limited to view calls
    ///
    /// Security: program and state must match the registered protocol
    pub fn read_only(
        protocol: &Protocol,
        program: &AccountInfo<'info>,
        state: &AccountInfo<'info>,
    ) -> Result<Self> {
        require_keys_eq!(
            *program.key,
            protocol.adapter_program,
            TreasuryError::InvalidAdapterAccounts
        );
        require_keys_eq!(
            *state.key,
            protocol.adapter,
            TreasuryError::InvalidAdapterAccounts
        );

        Ok(Self {
            program: program.clone(),
            state: state.clone(),
            funding: None,
        })
    }

    /// Adapter able to invest and withdraw on behalf of the treasury
    pub fn funded(
        protocol: &Protocol,
        program: &AccountInfo<'info>,
        state: &AccountInfo<'info>,
        reserve: &AccountInfo<'info>,
        funding: FundingAccounts<'a, 'info>,
    ) -> Result<Self> {
        let mut adapter = Self::read_only(protocol, program, state)?;
        require_keys_eq!(
            *reserve.key,
            protocol.adapter_reserve,
            TreasuryError::InvalidAdapterAccounts
        );
        adapter.funding = Some((reserve.clone(), funding));
        Ok(adapter)
    }

    /// Build funded adapters from remaining accounts, one
    /// `[program, state, reserve]` triple per protocol in order
    pub fn load_funded(
        protocols: &[&Protocol],
        accounts: &[AccountInfo<'info>],
        funding: &FundingAccounts<'a, 'info>,
    ) -> Result<Vec<Self>> {
        require!(
            accounts.len() == protocols.len() * FUNDED_ADAPTER_ACCOUNTS,
            TreasuryError::InvalidAdapterAccounts
        );

        protocols
            .iter()
            .zip(accounts.chunks(FUNDED_ADAPTER_ACCOUNTS))
            .map(|(protocol, chunk)| {
                Self::funded(protocol, &chunk[0], &chunk[1], &chunk[2], funding.clone())
            })
            .collect()
    }

    /// Build view-only adapters from remaining accounts, one
    /// `[program, state]` pair per protocol in order
    pub fn load_read_only(
        protocols: &[&Protocol],
        accounts: &[AccountInfo<'info>],
    ) -> Result<Vec<Self>> {
        require!(
            accounts.len() == protocols.len() * VIEW_ADAPTER_ACCOUNTS,
            TreasuryError::InvalidAdapterAccounts
        );

        protocols
            .iter()
            .zip(accounts.chunks(VIEW_ADAPTER_ACCOUNTS))
            .map(|(protocol, chunk)| Self::read_only(protocol, &chunk[0], &chunk[1]))
            .collect()
    }

    /// Security: custody must move by exactly `amount` in `flow`, whatever
    /// the adapter reports
    fn move_funds(&self, discriminator: [u8; 8], amount: u64, flow: Flow) -> Result<()> {
        let (reserve, funding) = self
            .funding
            .as_ref()
            .ok_or(error!(TreasuryError::InvalidAdapterAccounts))?;

        let mut data = discriminator.to_vec();
        data.extend_from_slice(&amount.to_le_bytes());

        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![
                AccountMeta::new(*self.state.key, false),
                AccountMeta::new(*reserve.key, false),
                AccountMeta::new(*funding.custody.key, false),
                AccountMeta::new_readonly(*funding.authority.key, true),
                AccountMeta::new_readonly(*funding.token_program.key, false),
            ],
            data,
        };

        let before = accessor::amount(&funding.custody)?;
        invoke_signed(
            &ix,
            &[
                self.state.clone(),
                reserve.clone(),
                funding.custody.clone(),
                funding.authority.clone(),
                funding.token_program.clone(),
                self.program.clone(),
            ],
            &[funding.signer_seeds],
        )
        .map_err(|err| {
            msg!("Adapter {} rejected call: {:?}", self.program.key, err);
            error!(TreasuryError::AdapterCallFailed)
        })?;
        let after = accessor::amount(&funding.custody)?;

        engine::ensure_adapter_flow(before, after, amount, flow)
    }

    fn view(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![AccountMeta::new_readonly(*self.state.key, false)],
            data,
        };

        invoke(&ix, &[self.state.clone(), self.program.clone()]).map_err(|err| {
            msg!("Adapter {} view failed: {:?}", self.program.key, err);
            error!(TreasuryError::AdapterCallFailed)
        })?;

        match get_return_data() {
            Some((program_id, data)) if program_id == *self.program.key => Ok(data),
            _ => {
                msg!("Adapter {} returned no data", self.program.key);
                Err(error!(TreasuryError::AdapterCallFailed))
            }
        }
    }
}

impl<'a, 'info> Adapter for CpiAdapter<'a, 'info> {
    fn invest(&mut self, amount: u64) -> Result<()> {
        self.move_funds(INVEST_DISCRIMINATOR, amount, Flow::Out)
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        self.move_funds(WITHDRAW_DISCRIMINATOR, amount, Flow::In)
    }

    fn current_yield(&self) -> Result<u128> {
        let data = self.view(CURRENT_YIELD_DISCRIMINATOR.to_vec())?;
        decode_le::<16>(&data).map(u128::from_le_bytes)
    }

    fn balance_of(&self, holder: &Pubkey) -> Result<u64> {
        let mut data = BALANCE_OF_DISCRIMINATOR.to_vec();
        data.extend_from_slice(holder.as_ref());
        let data = self.view(data)?;
        decode_le::<8>(&data).map(u64::from_le_bytes)
    }
}

/// Decode little-endian return data; the runtime may trim trailing zeros
pub fn decode_le<const N: usize>(data: &[u8]) -> Result<[u8; N]> {
    require!(data.len() <= N, TreasuryError::AdapterCallFailed);
    let mut bytes = [0u8; N];
    bytes[..data.len()].copy_from_slice(data);
    Ok(bytes)
}
