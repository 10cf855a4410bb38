// Constants for the lending adapter program

/// Seed for adapter state PDAs: ["adapter", asset_mint, pool]
pub const ADAPTER_SEED: &[u8] = b"adapter";

/// Seed for the reserve token account PDA: ["reserve", adapter_state]
pub const RESERVE_SEED: &[u8] = b"reserve";

pub const MAX_OWNERS: usize = 10;

/// Distinct holders tracked per adapter
pub const MAX_POSITIONS: usize = 10;

/// Fixed-point scale of the reported yield rate (10^18 == 1%)
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;
