// Constants for the Treasury program

/// Seed for the singleton treasury state PDA
pub const TREASURY_SEED: &[u8] = b"treasury";

/// Seed for the PDA that owns custody token accounts and signs adapter calls
pub const TREASURY_AUTHORITY_SEED: &[u8] = b"treasury_authority";

/// Seed for the currency registry PDA
pub const CURRENCY_REGISTRY_SEED: &[u8] = b"currency_registry";

/// Seed for the protocol registry PDA
pub const PROTOCOL_REGISTRY_SEED: &[u8] = b"protocol_registry";

/// Seed for per-depositor ledger PDAs
pub const LEDGER_SEED: &[u8] = b"ledger";

pub const MAX_OWNERS: usize = 10;
pub const MAX_CURRENCIES: usize = 16;
pub const MAX_PROTOCOLS: usize = 10;
pub const MAX_NAME_LEN: usize = 32;
/// Names given up through renames, kept so no other protocol can take them
pub const MAX_RETIRED_NAMES: usize = 10;

/// Protocol percentages are parts-per-hundred of an invested amount
pub const PERCENTAGE_BASE: u64 = 100;

/// Fixed-point scale of adapter yields (10^18 == 1%)
pub const YIELD_SCALE: u128 = 1_000_000_000_000_000_000;

/// Remaining accounts supplied per routed protocol on invest:
/// adapter program, adapter state, adapter reserve
pub const FUNDED_ADAPTER_ACCOUNTS: usize = 3;

/// Remaining accounts supplied per protocol on yield queries:
/// adapter program, adapter state
pub const VIEW_ADAPTER_ACCOUNTS: usize = 2;
