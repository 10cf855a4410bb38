//! Allocation engine: splits investments across protocols and moves
//! positions through adapters while keeping the depositor ledger consistent.

use anchor_lang::prelude::*;

use crate::{
    adapter::Adapter,
    constants::PERCENTAGE_BASE,
    errors::TreasuryError,
    state::{Currency, DepositorLedger, Protocol, ProtocolRegistry},
};

/// Share of an investment routed to one protocol
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub protocol_id: u64,
    pub protocol_name: String,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvestmentPlan {
    pub currency_id: u64,
    pub amount: u64,
    /// Ascending protocol id order
    pub allocations: Vec<Allocation>,
    /// Part of `amount` that stays in custody as depositor balance
    pub remainder: u64,
}

impl InvestmentPlan {
    pub fn routed(&self) -> u64 {
        self.amount - self.remainder
    }
}

/// floor(amount * percentage / 100)
pub fn share_of(amount: u64, percentage: u8) -> Result<u64> {
    let share = (amount as u128)
        .checked_mul(percentage as u128)
        .ok_or(TreasuryError::MathOverflow)?
        / PERCENTAGE_BASE as u128;

    u64::try_from(share).map_err(|_| error!(TreasuryError::MathOverflow))
}

/// Split `amount` of `currency` across every active protocol bound to it
///
/// Protocols whose floored share is zero are skipped.
pub fn plan_investment(
    protocols: &ProtocolRegistry,
    currency: &Currency,
    amount: u64,
) -> Result<InvestmentPlan> {
    require!(amount > 0, TreasuryError::ZeroAmount);

    let mut allocations = Vec::new();
    let mut routed: u64 = 0;

    for protocol in protocols.active_for(&currency.asset_mint) {
        let share = share_of(amount, protocol.percentage)?;
        if share == 0 {
            continue;
        }

        routed = routed
            .checked_add(share)
            .ok_or(TreasuryError::MathOverflow)?;
        allocations.push(Allocation {
            protocol_id: protocol.id,
            protocol_name: protocol.name.clone(),
            amount: share,
        });
    }

    let remainder = amount
        .checked_sub(routed)
        .ok_or(TreasuryError::AllocationExceeded)?;

    Ok(InvestmentPlan {
        currency_id: currency.id,
        amount,
        allocations,
        remainder,
    })
}

/// Execute a plan: one adapter per allocation, in plan order
///
/// The ledger is only written once every adapter accepted its share. When an
/// adapter fails, shares already invested are withdrawn again in reverse
/// order and `AdapterCallFailed` is returned.
pub fn execute_investment<A: Adapter>(
    ledger: &mut DepositorLedger,
    plan: &InvestmentPlan,
    adapters: &mut [A],
) -> Result<()> {
    require!(
        adapters.len() == plan.allocations.len(),
        TreasuryError::InvalidAdapterAccounts
    );

    let mut staged = ledger.clone();
    for allocation in &plan.allocations {
        staged.record_investment(&allocation.protocol_name, allocation.amount as i128)?;
    }
    staged.credit(plan.currency_id, plan.remainder)?;

    for (index, allocation) in plan.allocations.iter().enumerate() {
        if let Err(err) = adapters[index].invest(allocation.amount) {
            msg!(
                "Invest into {} failed: {:?}, unwinding {} allocation(s)",
                allocation.protocol_name,
                err,
                index
            );
            unwind(&mut adapters[..index], &plan.allocations[..index]);
            return Err(error!(TreasuryError::AdapterCallFailed));
        }
    }

    *ledger = staged;
    Ok(())
}

fn unwind<A: Adapter>(adapters: &mut [A], allocations: &[Allocation]) {
    for (adapter, allocation) in adapters.iter_mut().zip(allocations).rev() {
        if let Err(err) = adapter.withdraw(allocation.amount) {
            msg!(
                "Compensating withdraw from {} failed: {:?}",
                allocation.protocol_name,
                err
            );
        }
    }
}

/// Pull `amount` out of `protocol` for the depositor, returns the remaining
/// recorded investment
pub fn execute_withdrawal<A: Adapter>(
    ledger: &mut DepositorLedger,
    currency: &Currency,
    protocol: &Protocol,
    adapter: &mut A,
    amount: u64,
) -> Result<u64> {
    require!(amount > 0, TreasuryError::ZeroAmount);
    require_keys_eq!(
        protocol.asset_mint,
        currency.asset_mint,
        TreasuryError::AssetMismatch
    );
    require!(
        ledger.invest_of(&protocol.name) >= amount,
        TreasuryError::InsufficientBalance
    );

    let mut staged = ledger.clone();
    let remaining = staged.record_investment(&protocol.name, -(amount as i128))?;

    adapter.withdraw(amount).map_err(|err| {
        msg!("Withdraw from {} failed: {:?}", protocol.name, err);
        error!(TreasuryError::AdapterCallFailed)
    })?;

    *ledger = staged;
    Ok(remaining)
}

/// Direction a token balance is expected to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    In,
    Out,
}

/// Amount a balance moved in `flow`, `None` when it moved the other way
pub fn moved(before: u64, after: u64, flow: Flow) -> Option<u64> {
    match flow {
        Flow::In => after.checked_sub(before),
        Flow::Out => before.checked_sub(after),
    }
}

/// Custody must move by exactly `expected` across an adapter call
pub fn ensure_adapter_flow(before: u64, after: u64, expected: u64, flow: Flow) -> Result<()> {
    if moved(before, after, flow) != Some(expected) {
        msg!(
            "Custody moved from {} to {}, expected {:?} of {}",
            before,
            after,
            flow,
            expected
        );
        return err!(TreasuryError::AdapterCallFailed);
    }
    Ok(())
}

/// A token transfer must move a balance by exactly `expected`
pub fn ensure_transfer_flow(before: u64, after: u64, expected: u64, flow: Flow) -> Result<()> {
    require!(
        moved(before, after, flow) == Some(expected),
        TreasuryError::TransferFailed
    );
    Ok(())
}

/// Sum of `percentage * current_yield / 100` over the given protocols
pub fn aggregate_yield<A: Adapter>(protocols: &[&Protocol], adapters: &[A]) -> Result<u128> {
    require!(
        adapters.len() == protocols.len(),
        TreasuryError::InvalidAdapterAccounts
    );

    let mut aggregated: u128 = 0;
    for (protocol, adapter) in protocols.iter().zip(adapters) {
        let current = adapter.current_yield().map_err(|err| {
            msg!("Yield read from {} failed: {:?}", protocol.name, err);
            error!(TreasuryError::AdapterCallFailed)
        })?;

        let weighted = current
            .checked_mul(protocol.percentage as u128)
            .ok_or(TreasuryError::MathOverflow)?
            / PERCENTAGE_BASE as u128;
        aggregated = aggregated
            .checked_add(weighted)
            .ok_or(TreasuryError::MathOverflow)?;
    }

    Ok(aggregated)
}
