use anchor_lang::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use lending_adapter::{
        constants::*,
        errors::AdapterError,
        state::AdapterState,
    };

    fn mock_state(owner: Pubkey) -> AdapterState {
        AdapterState {
            owners: vec![owner],
            asset_mint: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            reserve: Pubkey::new_unique(),
            yield_rate: 3 * RATE_SCALE,
            total_deposited: 0,
            positions: Vec::new(),
            bump: 255,
            reserve_bump: 255,
        }
    }

    #[test]
    fn test_pda_derivation() {
        let program_id = lending_adapter::id();
        let asset_mint = Pubkey::new_unique();
        let pool_a = Pubkey::new_unique();
        let pool_b = Pubkey::new_unique();

        let (state_a, _) = Pubkey::find_program_address(
            &[ADAPTER_SEED, asset_mint.as_ref(), pool_a.as_ref()],
            &program_id,
        );
        let (state_b, _) = Pubkey::find_program_address(
            &[ADAPTER_SEED, asset_mint.as_ref(), pool_b.as_ref()],
            &program_id,
        );
        let (reserve_a, _) =
            Pubkey::find_program_address(&[RESERVE_SEED, state_a.as_ref()], &program_id);

        // One adapter per (asset, pool) pair, each with its own reserve
        assert_ne!(state_a, state_b);
        assert_ne!(state_a, reserve_a);
    }

    #[test]
    fn test_full_state_fits_its_space() {
        let owner = Pubkey::new_unique();
        let mut state = mock_state(owner);
        for _ in 1..MAX_OWNERS {
            state.add_owner(&owner, Pubkey::new_unique()).unwrap();
        }
        for _ in 0..MAX_POSITIONS {
            state.supply(Pubkey::new_unique(), u64::MAX / 100).unwrap();
        }

        let mut data = Vec::new();
        state.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), AdapterState::SPACE);

        let err = state.add_owner(&owner, Pubkey::new_unique()).unwrap_err();
        assert_eq!(err, AdapterError::OwnerSetFull.into());
    }

    #[test]
    fn test_treasury_holder_flow() {
        // The treasury authority is added as owner, then supplies and redeems
        let operator = Pubkey::new_unique();
        let treasury_authority = Pubkey::new_unique();
        let mut state = mock_state(operator);

        state.add_owner(&operator, treasury_authority).unwrap();
        assert!(state.is_owner(&treasury_authority));

        state.supply(treasury_authority, 1_000).unwrap();
        state.supply(operator, 250).unwrap();
        assert_eq!(state.position_of(&treasury_authority), 1_000);
        assert_eq!(state.total_deposited, 1_250);

        state.redeem(&treasury_authority, 1_000).unwrap();
        assert_eq!(state.position_of(&treasury_authority), 0);
        assert_eq!(state.position_of(&operator), 250);
        assert_eq!(state.total_deposited, 250);
    }
}
