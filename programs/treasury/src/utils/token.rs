use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::errors::TreasuryError;

/// Move depositor funds into treasury custody; the depositor signs
pub fn transfer_into_custody<'a>(
    token_program: AccountInfo<'a>,
    from: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    authority: AccountInfo<'a>,
    amount: u64,
) -> Result<()> {
    token::transfer(
        CpiContext::new(
            token_program,
            Transfer {
                from,
                to: custody,
                authority,
            },
        ),
        amount,
    )
    .map_err(|err| {
        msg!("Custody transfer failed: {:?}", err);
        error!(TreasuryError::TransferFailed)
    })
}

/// Move funds out of treasury custody, signed by the treasury authority PDA
pub fn transfer_from_custody<'a>(
    token_program: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    to: AccountInfo<'a>,
    authority: AccountInfo<'a>,
    amount: u64,
    seeds: &[&[u8]],
) -> Result<()> {
    token::transfer(
        CpiContext::new_with_signer(
            token_program,
            Transfer {
                from: custody,
                to,
                authority,
            },
            &[seeds],
        ),
        amount,
    )
    .map_err(|err| {
        msg!("Payout transfer failed: {:?}", err);
        error!(TreasuryError::TransferFailed)
    })
}
