//! Fee rate of the current transaction
//!
//! The fee rate a contribution is judged by is the compute-unit price the
//! transaction declares through the compute budget program. It is read from
//! the instructions sysvar; the last `SetComputeUnitPrice` wins, and a
//! transaction without one has a fee rate of zero.

use anchor_lang::prelude::*;
use solana_program::sysvar::instructions::load_instruction_at_checked;

use crate::constants::{COMPUTE_BUDGET_PROGRAM_ID, SET_COMPUTE_UNIT_PRICE_TAG};

/// Micro-lamports per compute unit declared by the transaction
pub fn declared_compute_unit_price(instructions_sysvar: &AccountInfo) -> Result<u64> {
    let mut price = 0;
    let mut index = 0;
    while let Ok(ix) = load_instruction_at_checked(index, instructions_sysvar) {
        if let Some(declared) = parse_compute_unit_price(&ix.program_id, &ix.data) {
            price = declared;
        }
        index += 1;
    }
    Ok(price)
}

/// Price carried by a `SetComputeUnitPrice` instruction, if `data` is one
pub fn parse_compute_unit_price(program_id: &Pubkey, data: &[u8]) -> Option<u64> {
    if *program_id != COMPUTE_BUDGET_PROGRAM_ID {
        return None;
    }
    match data {
        [tag, rest @ ..] if *tag == SET_COMPUTE_UNIT_PRICE_TAG && rest.len() >= 8 => {
            let bytes: [u8; 8] = rest[..8].try_into().ok()?;
            Some(u64::from_le_bytes(bytes))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn set_price(price: u64) -> Vec<u8> {
        let mut data = vec![SET_COMPUTE_UNIT_PRICE_TAG];
        data.extend_from_slice(&price.to_le_bytes());
        data
    }

    #[test]
    fn test_program_id_constant() {
        let expected = Pubkey::from_str("ComputeBudget111111111111111111111111111111").unwrap();
        assert_eq!(COMPUTE_BUDGET_PROGRAM_ID, expected);
    }

    #[test]
    fn test_parses_set_compute_unit_price() {
        assert_eq!(
            parse_compute_unit_price(&COMPUTE_BUDGET_PROGRAM_ID, &set_price(100_000_000_001)),
            Some(100_000_000_001)
        );
    }

    #[test]
    fn test_ignores_other_instructions() {
        // SetComputeUnitLimit
        let mut limit = vec![2u8];
        limit.extend_from_slice(&200_000u32.to_le_bytes());
        assert_eq!(parse_compute_unit_price(&COMPUTE_BUDGET_PROGRAM_ID, &limit), None);

        assert_eq!(parse_compute_unit_price(&Pubkey::default(), &set_price(5)), None);
        assert_eq!(
            parse_compute_unit_price(&COMPUTE_BUDGET_PROGRAM_ID, &[SET_COMPUTE_UNIT_PRICE_TAG, 1, 2]),
            None
        );
    }

    proptest! {
        #[test]
        fn test_declared_price_survives_any_value(price in any::<u64>(), trailing in 0usize..8) {
            let mut data = set_price(price);
            data.extend(std::iter::repeat(0xAA).take(trailing));
            prop_assert_eq!(
                parse_compute_unit_price(&COMPUTE_BUDGET_PROGRAM_ID, &data),
                Some(price)
            );
        }

        #[test]
        fn test_price_only_from_compute_budget(price in any::<u64>(), tag in any::<u8>()) {
            prop_assert_eq!(
                parse_compute_unit_price(&Pubkey::new_unique(), &set_price(price)),
                None
            );
            prop_assume!(tag != SET_COMPUTE_UNIT_PRICE_TAG);
            let mut data = set_price(price);
            data[0] = tag;
            prop_assert_eq!(parse_compute_unit_price(&COMPUTE_BUDGET_PROGRAM_ID, &data), None);
        }
    }
}
