/// Allocation engine and yield aggregation tests
///
/// The engine is generic over `Adapter`, so every flow runs here against an
/// in-memory adapter: routing, staging, compensation on failure, withdrawal
/// bookkeeping, the weighted yield formula and the exact token flows the
/// handlers verify around every transfer.

use std::{cell::Cell, rc::Rc};

use anchor_lang::prelude::*;
use treasury::{
    adapter::Adapter,
    constants::*,
    engine::{self, Allocation, Flow},
    errors::TreasuryError,
    state::{Currency, CurrencyRegistry, DepositorLedger, ProtocolConfig, ProtocolRegistry},
};

// =============================================================================
// Fixtures
// =============================================================================

/// In-memory adapter holding a single position
#[derive(Default)]
struct MockAdapter {
    position: u64,
    yield_rate: u128,
    fail_invest: bool,
    fail_withdraw: bool,
    fail_yield: bool,
    invest_calls: usize,
    withdraw_calls: usize,
    /// Treasury custody balance the adapter moves tokens against
    custody: Option<Rc<Cell<u64>>>,
    /// Tokens withheld from every withdraw
    shortfall: u64,
}

impl MockAdapter {
    fn with_yield(yield_rate: u128) -> Self {
        Self {
            yield_rate,
            ..Default::default()
        }
    }

    fn failing_invest() -> Self {
        Self {
            fail_invest: true,
            ..Default::default()
        }
    }

    fn against(custody: &Rc<Cell<u64>>) -> Self {
        Self {
            custody: Some(custody.clone()),
            ..Default::default()
        }
    }
}

impl Adapter for MockAdapter {
    fn invest(&mut self, amount: u64) -> Result<()> {
        self.invest_calls += 1;
        if self.fail_invest {
            return err!(TreasuryError::AdapterCallFailed);
        }
        self.position += amount;
        if let Some(custody) = &self.custody {
            custody.set(custody.get() - amount);
        }
        Ok(())
    }

    fn withdraw(&mut self, amount: u64) -> Result<()> {
        self.withdraw_calls += 1;
        if self.fail_withdraw {
            return err!(TreasuryError::AdapterCallFailed);
        }
        require!(self.position >= amount, TreasuryError::InsufficientBalance);
        self.position -= amount;
        if let Some(custody) = &self.custody {
            custody.set(custody.get() + amount - self.shortfall);
        }
        Ok(())
    }

    fn current_yield(&self) -> Result<u128> {
        if self.fail_yield {
            return err!(TreasuryError::AdapterCallFailed);
        }
        Ok(self.yield_rate)
    }

    fn balance_of(&self, _holder: &Pubkey) -> Result<u64> {
        Ok(self.position)
    }
}

struct Fixture {
    currencies: CurrencyRegistry,
    protocols: ProtocolRegistry,
    ledger: DepositorLedger,
    usdc: Currency,
}

impl Fixture {
    fn new() -> Self {
        let treasury = Pubkey::new_unique();
        let mut currencies = CurrencyRegistry {
            treasury,
            currencies: Vec::new(),
            bump: 0,
        };
        let id = currencies
            .add_currency("USDC".to_string(), Pubkey::new_unique())
            .unwrap();
        let usdc = currencies.get_currency(id).unwrap().clone();

        Self {
            currencies,
            protocols: ProtocolRegistry {
                treasury,
                protocols: Vec::new(),
                retired_names: Vec::new(),
                bump: 0,
            },
            ledger: DepositorLedger {
                treasury,
                depositor: Pubkey::new_unique(),
                balances: Vec::new(),
                investments: Vec::new(),
                bump: 0,
            },
            usdc,
        }
    }

    fn add_protocol(&mut self, name: &str, asset_mint: Pubkey, percentage: u8) -> u64 {
        self.protocols
            .add_protocol(ProtocolConfig {
                name: name.to_string(),
                external_ref: Pubkey::new_unique(),
                adapter: Pubkey::new_unique(),
                adapter_program: Pubkey::new_unique(),
                adapter_reserve: Pubkey::new_unique(),
                asset_mint,
                percentage,
            })
            .unwrap()
    }

    fn invest(&mut self, amount: u64, adapters: &mut [MockAdapter]) -> Result<()> {
        let plan = engine::plan_investment(&self.protocols, &self.usdc, amount)?;
        engine::execute_investment(&mut self.ledger, &plan, adapters)
    }
}

// =============================================================================
// Invest
// =============================================================================

#[test]
fn test_single_protocol_scenario() {
    // USDC id 1, AAVE 10% id 1: invest 10000 then withdraw the routed 1000
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let aave_id = fx.add_protocol("AAVE", mint, 10);
    assert_eq!(fx.usdc.id, 1);
    assert_eq!(aave_id, 1);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(10_000, &mut adapters).unwrap();

    assert_eq!(fx.ledger.invest_of("AAVE"), 1_000);
    assert_eq!(fx.ledger.balance_of(fx.usdc.id), 9_000);
    assert_eq!(adapters[0].position, 1_000);

    let aave = fx.protocols.get_protocol(aave_id).unwrap().clone();
    let remaining =
        engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 1_000)
            .unwrap();

    assert_eq!(remaining, 0);
    assert_eq!(fx.ledger.invest_of("AAVE"), 0);
    assert_eq!(adapters[0].position, 0);
}

#[test]
fn test_plan_routes_active_protocols_of_currency_in_id_order() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 20);
    let paused = fx.add_protocol("COMPOUND", mint, 40);
    fx.add_protocol("OTHER_ASSET", Pubkey::new_unique(), 50);
    fx.add_protocol("MORPHO", mint, 30);
    fx.protocols.set_active(paused, false).unwrap();

    let plan = engine::plan_investment(&fx.protocols, &fx.usdc, 10_000).unwrap();

    assert_eq!(
        plan.allocations,
        vec![
            Allocation {
                protocol_id: 1,
                protocol_name: "AAVE".to_string(),
                amount: 2_000,
            },
            Allocation {
                protocol_id: 4,
                protocol_name: "MORPHO".to_string(),
                amount: 3_000,
            },
        ]
    );
    assert_eq!(plan.routed(), 5_000);
    assert_eq!(plan.remainder, 5_000);
}

#[test]
fn test_sub_unit_shares_are_skipped() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);

    let mut adapters: Vec<MockAdapter> = Vec::new();
    fx.invest(9, &mut adapters).unwrap();

    assert_eq!(fx.ledger.invest_of("AAVE"), 0);
    assert_eq!(fx.ledger.balance_of(fx.usdc.id), 9);
}

#[test]
fn test_no_active_protocols_keeps_everything_in_custody() {
    let mut fx = Fixture::new();

    let mut adapters: Vec<MockAdapter> = Vec::new();
    fx.invest(500, &mut adapters).unwrap();

    assert!(fx.ledger.investments.is_empty());
    assert_eq!(fx.ledger.balance_of(fx.usdc.id), 500);
}

#[test]
fn test_invest_zero_amount_rejected() {
    let mut fx = Fixture::new();
    let mut adapters: Vec<MockAdapter> = Vec::new();

    let err = fx.invest(0, &mut adapters).unwrap_err();
    assert_eq!(err, TreasuryError::ZeroAmount.into());
}

#[test]
fn test_repeated_invests_accumulate() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 50);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(1_000, &mut adapters).unwrap();
    fx.invest(3_000, &mut adapters).unwrap();

    assert_eq!(fx.ledger.invest_of("AAVE"), 2_000);
    assert_eq!(fx.ledger.balance_of(fx.usdc.id), 2_000);
    assert_eq!(adapters[0].position, 2_000);
}

#[test]
fn test_adapter_failure_unwinds_prior_invests() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);
    fx.add_protocol("COMPOUND", mint, 20);
    fx.ledger.credit(fx.usdc.id, 77).unwrap();

    let balances_before = fx.ledger.balances.clone();
    let investments_before = fx.ledger.investments.clone();

    let mut adapters = vec![MockAdapter::default(), MockAdapter::failing_invest()];
    let err = fx.invest(10_000, &mut adapters).unwrap_err();

    assert_eq!(err, TreasuryError::AdapterCallFailed.into());

    // Ledger untouched, first adapter compensated
    assert_eq!(fx.ledger.balances, balances_before);
    assert_eq!(fx.ledger.investments, investments_before);
    assert_eq!(adapters[0].invest_calls, 1);
    assert_eq!(adapters[0].withdraw_calls, 1);
    assert_eq!(adapters[0].position, 0);
    assert_eq!(adapters[1].withdraw_calls, 0);
}

#[test]
fn test_first_adapter_failure_needs_no_compensation() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);
    fx.add_protocol("COMPOUND", mint, 20);

    let mut adapters = vec![MockAdapter::failing_invest(), MockAdapter::default()];
    let err = fx.invest(10_000, &mut adapters).unwrap_err();

    assert_eq!(err, TreasuryError::AdapterCallFailed.into());
    assert_eq!(adapters[0].withdraw_calls, 0);
    assert_eq!(adapters[1].invest_calls, 0);
    assert!(fx.ledger.investments.is_empty());
    assert_eq!(fx.ledger.balance_of(fx.usdc.id), 0);
}

#[test]
fn test_adapter_count_must_match_plan() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);
    fx.add_protocol("COMPOUND", mint, 20);

    let mut adapters = vec![MockAdapter::default()];
    let err = fx.invest(10_000, &mut adapters).unwrap_err();

    assert_eq!(err, TreasuryError::InvalidAdapterAccounts.into());
    assert_eq!(adapters[0].invest_calls, 0);
}

// =============================================================================
// Withdraw
// =============================================================================

#[test]
fn test_withdraw_decrements_by_exact_amount() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 40);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(10_000, &mut adapters).unwrap();

    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    let remaining =
        engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 1_500)
            .unwrap();

    assert_eq!(remaining, 2_500);
    assert_eq!(fx.ledger.invest_of("AAVE"), 2_500);
    assert_eq!(adapters[0].position, 2_500);
}

#[test]
fn test_withdraw_more_than_invested_fails_before_adapter_call() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 10);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(10_000, &mut adapters).unwrap();

    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    let err =
        engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 1_001)
            .unwrap_err();

    assert_eq!(err, TreasuryError::InsufficientBalance.into());
    assert_eq!(adapters[0].withdraw_calls, 0);
    assert_eq!(fx.ledger.invest_of("AAVE"), 1_000);
}

#[test]
fn test_withdraw_zero_amount_rejected() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 10);
    let aave = fx.protocols.get_protocol(id).unwrap().clone();

    let mut adapter = MockAdapter::default();
    let err = engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapter, 0)
        .unwrap_err();
    assert_eq!(err, TreasuryError::ZeroAmount.into());
}

#[test]
fn test_withdraw_from_inactive_protocol_and_currency() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 10);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(10_000, &mut adapters).unwrap();

    fx.protocols.set_active(id, false).unwrap();
    fx.currencies.set_active(fx.usdc.id, false).unwrap();

    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    let usdc = fx.currencies.get_currency(fx.usdc.id).unwrap().clone();
    assert!(!aave.active);
    assert!(!usdc.active);

    engine::execute_withdrawal(&mut fx.ledger, &usdc, &aave, &mut adapters[0], 1_000).unwrap();
    assert_eq!(fx.ledger.invest_of("AAVE"), 0);
}

#[test]
fn test_withdraw_requires_protocol_of_currency() {
    let mut fx = Fixture::new();
    let id = fx.add_protocol("FOREIGN", Pubkey::new_unique(), 10);
    let foreign = fx.protocols.get_protocol(id).unwrap().clone();
    fx.ledger.record_investment("FOREIGN", 100).unwrap();

    let mut adapter = MockAdapter::default();
    let err = engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &foreign, &mut adapter, 50)
        .unwrap_err();

    assert_eq!(err, TreasuryError::AssetMismatch.into());
    assert_eq!(fx.ledger.invest_of("FOREIGN"), 100);
}

#[test]
fn test_failed_adapter_withdraw_keeps_record() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 10);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(10_000, &mut adapters).unwrap();
    adapters[0].fail_withdraw = true;

    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    let err = engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 500)
        .unwrap_err();

    assert_eq!(err, TreasuryError::AdapterCallFailed.into());
    assert_eq!(fx.ledger.invest_of("AAVE"), 1_000);
}

#[test]
fn test_invest_withdraw_round_trip_restores_state() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let aave = fx.add_protocol("AAVE", mint, 25);
    let compound = fx.add_protocol("COMPOUND", mint, 25);

    let mut adapters = vec![MockAdapter::default(), MockAdapter::default()];
    fx.invest(4_000, &mut adapters).unwrap();

    for (index, id) in [aave, compound].into_iter().enumerate() {
        let protocol = fx.protocols.get_protocol(id).unwrap().clone();
        let invested = fx.ledger.invest_of(&protocol.name);
        engine::execute_withdrawal(
            &mut fx.ledger,
            &fx.usdc,
            &protocol,
            &mut adapters[index],
            invested,
        )
        .unwrap();
    }

    assert!(fx.ledger.investments.is_empty());
    assert!(adapters.iter().all(|a| a.position == 0));
    assert_eq!(fx.ledger.balance_of(fx.usdc.id), 2_000);
}

#[test]
fn test_records_never_move_to_a_protocol_taking_an_old_name() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 100);

    let mut adapters = vec![MockAdapter::default()];
    fx.invest(1_000, &mut adapters).unwrap();

    let mut config = ProtocolConfig {
        name: "AAVE_OLD".to_string(),
        external_ref: Pubkey::new_unique(),
        adapter: Pubkey::new_unique(),
        adapter_program: Pubkey::new_unique(),
        adapter_reserve: Pubkey::new_unique(),
        asset_mint: mint,
        percentage: 100,
    };
    fx.protocols.update_protocol(id, config.clone()).unwrap();

    // A newcomer cannot claim the name the records are keyed by
    let mut newcomer = config.clone();
    newcomer.name = "AAVE".to_string();
    newcomer.percentage = 0;
    let err = fx.protocols.add_protocol(newcomer).unwrap_err();
    assert_eq!(err, TreasuryError::AlreadyRegistered.into());

    // Records stay with the original protocol once it takes its name back
    config.name = "AAVE".to_string();
    fx.protocols.update_protocol(id, config).unwrap();
    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 1_000).unwrap();
    assert_eq!(fx.ledger.invest_of("AAVE"), 0);
}

// =============================================================================
// Token flows
// =============================================================================

#[test]
fn test_invest_flows_match_plan() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);
    fx.add_protocol("COMPOUND", mint, 30);

    // Another depositor already holds 5,000 in custody
    let custody = Rc::new(Cell::new(5_000));
    let (user_before, custody_before) = (10_000u64, custody.get());

    let plan = engine::plan_investment(&fx.protocols, &fx.usdc, 10_000).unwrap();
    let user_after = user_before - plan.amount;
    custody.set(custody.get() + plan.amount);

    let mut adapters = vec![MockAdapter::against(&custody), MockAdapter::against(&custody)];
    engine::execute_investment(&mut fx.ledger, &plan, &mut adapters).unwrap();

    engine::ensure_transfer_flow(user_before, user_after, 10_000, Flow::Out).unwrap();
    engine::ensure_adapter_flow(custody_before, custody.get(), plan.remainder, Flow::In).unwrap();
    assert_eq!(custody.get(), 11_000);
    assert_eq!(plan.remainder, 6_000);
}

#[test]
fn test_withdraw_flows_pay_exact_amount() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 100);

    let custody = Rc::new(Cell::new(0));
    let mut adapters = vec![MockAdapter::against(&custody)];
    custody.set(1_000);
    fx.invest(1_000, &mut adapters).unwrap();
    assert_eq!(custody.get(), 0);

    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    let custody_before = custody.get();
    engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 400).unwrap();
    engine::ensure_adapter_flow(custody_before, custody.get(), 400, Flow::In).unwrap();

    let (user_before, user_after) = (0u64, 400u64);
    engine::ensure_transfer_flow(user_before, user_after, 400, Flow::In).unwrap();
}

#[test]
fn test_short_adapter_withdraw_is_not_covered_by_shared_custody() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    let id = fx.add_protocol("AAVE", mint, 10);

    let custody = Rc::new(Cell::new(0));
    let mut adapters = vec![MockAdapter::against(&custody)];
    custody.set(10_000);
    fx.invest(10_000, &mut adapters).unwrap();
    // 9,000 of uninvested balance sits in custody
    assert_eq!(custody.get(), 9_000);

    adapters[0].shortfall = 1_000;
    let aave = fx.protocols.get_protocol(id).unwrap().clone();
    let custody_before = custody.get();
    engine::execute_withdrawal(&mut fx.ledger, &fx.usdc, &aave, &mut adapters[0], 1_000).unwrap();

    // Custody alone still covers the payout, the delta does not
    assert!(custody.get() >= 1_000);
    let err = engine::ensure_adapter_flow(custody_before, custody.get(), 1_000, Flow::In)
        .unwrap_err();
    assert_eq!(err, TreasuryError::AdapterCallFailed.into());
}

#[test]
fn test_over_pulling_adapter_is_detected() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 50);

    let custody = Rc::new(Cell::new(3_000));
    let plan = engine::plan_investment(&fx.protocols, &fx.usdc, 2_000).unwrap();
    let custody_before = custody.get();
    custody.set(custody.get() + plan.amount);

    let mut adapters = vec![MockAdapter::against(&custody)];
    engine::execute_investment(&mut fx.ledger, &plan, &mut adapters).unwrap();
    // Drain beyond the routed share
    custody.set(custody.get() - 500);

    let err = engine::ensure_adapter_flow(custody_before, custody.get(), plan.remainder, Flow::In)
        .unwrap_err();
    assert_eq!(err, TreasuryError::AdapterCallFailed.into());
}

// =============================================================================
// Yield aggregation
// =============================================================================

#[test]
fn test_yield_single_protocol() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);

    let protocols: Vec<_> = fx.protocols.active_for(&mint).collect();
    let adapters = vec![MockAdapter::with_yield(5 * YIELD_SCALE)];

    // 10% of a 5% yield
    let aggregated = engine::aggregate_yield(&protocols, &adapters).unwrap();
    assert_eq!(aggregated, YIELD_SCALE / 2);
}

#[test]
fn test_yield_sums_weighted_terms() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);
    fx.add_protocol("COMPOUND", mint, 30);

    let protocols: Vec<_> = fx.protocols.active_for(&mint).collect();
    let adapters = vec![
        MockAdapter::with_yield(4 * YIELD_SCALE),
        MockAdapter::with_yield(2 * YIELD_SCALE),
    ];

    // 0.4% + 0.6%
    let aggregated = engine::aggregate_yield(&protocols, &adapters).unwrap();
    assert_eq!(aggregated, YIELD_SCALE);
}

#[test]
fn test_yield_without_protocols_is_zero() {
    let fx = Fixture::new();
    let protocols: Vec<_> = fx.protocols.active_for(&fx.usdc.asset_mint).collect();
    let adapters: Vec<MockAdapter> = Vec::new();

    assert_eq!(engine::aggregate_yield(&protocols, &adapters).unwrap(), 0);
}

#[test]
fn test_yield_failing_read_fails_query() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 10);
    fx.add_protocol("COMPOUND", mint, 30);

    let protocols: Vec<_> = fx.protocols.active_for(&mint).collect();
    let mut broken = MockAdapter::with_yield(YIELD_SCALE);
    broken.fail_yield = true;
    let adapters = vec![MockAdapter::with_yield(YIELD_SCALE), broken];

    let err = engine::aggregate_yield(&protocols, &adapters).unwrap_err();
    assert_eq!(err, TreasuryError::AdapterCallFailed.into());
}

#[test]
fn test_yield_overflow_is_reported() {
    let mut fx = Fixture::new();
    let mint = fx.usdc.asset_mint;
    fx.add_protocol("AAVE", mint, 100);

    let protocols: Vec<_> = fx.protocols.active_for(&mint).collect();
    let adapters = vec![MockAdapter::with_yield(u128::MAX)];

    let err = engine::aggregate_yield(&protocols, &adapters).unwrap_err();
    assert_eq!(err, TreasuryError::MathOverflow.into());
}
