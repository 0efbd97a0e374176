//! # Safe Math Operations
//!
//! Overflow-checked arithmetic operations for both on-chain and off-chain use.

use crate::constants::PERCENT_DENOMINATOR;
use crate::errors::{PresaleError, PresaleResult};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        /// Checked arithmetic, mapping overflow/underflow to a presale error
        pub fn $fn_name(a: $type, b: $type) -> PresaleResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };

    // Simple cast with only max check
    (cast_max, $fn_name:ident, $from_type:ty, $to_type:ty, $max_val:expr) => {
        /// Narrowing cast that fails instead of truncating
        pub fn $fn_name(value: $from_type) -> PresaleResult<$to_type> {
            if value > $max_val {
                return Err(PresaleError::ConversionError);
            }
            Ok(value as $to_type)
        }
    };
}

// Generate basic arithmetic functions
safe_arith!(safe_add_u64, u64, checked_add, PresaleError::MathOverflow);
safe_arith!(safe_sub_u64, u64, checked_sub, PresaleError::MathUnderflow);

safe_arith!(safe_mul_u128, u128, checked_mul, PresaleError::MathOverflow);

safe_arith!(safe_add_i64, i64, checked_add, PresaleError::MathOverflow);

// Generate type conversion functions
safe_arith!(cast_max, safe_cast_u128_to_u64, u128, u64, u64::MAX as u128);

/// `floor(amount * percent / 100)`, computed in u128 so it cannot overflow
pub fn apply_percent_floor(amount: u64, percent: u8) -> PresaleResult<u64> {
    if percent as u64 > PERCENT_DENOMINATOR {
        return Err(PresaleError::MathOverflow);
    }
    let scaled = safe_mul_u128(amount as u128, percent as u128)?;
    safe_cast_u128_to_u64(scaled / PERCENT_DENOMINATOR as u128)
}

/// Token amount owed for `value` native units at `rate` tokens per unit
pub fn tokens_for_value(value: u64, rate: u64) -> PresaleResult<u128> {
    safe_mul_u128(value as u128, rate as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_and_sub() {
        assert_eq!(safe_add_u64(2, 3), Ok(5));
        assert_eq!(safe_add_u64(u64::MAX, 1), Err(PresaleError::MathOverflow));
        assert_eq!(safe_sub_u64(0, 1), Err(PresaleError::MathUnderflow));
    }

    #[test]
    fn test_percent_floors() {
        // 80% of 99 = 79.2 -> 79
        assert_eq!(apply_percent_floor(99, 80), Ok(79));
        assert_eq!(apply_percent_floor(100_000_000_000_000_000, 80), Ok(80_000_000_000_000_000));
        assert_eq!(apply_percent_floor(u64::MAX, 100), Ok(u64::MAX));
        assert_eq!(apply_percent_floor(7, 0), Ok(0));
        assert_eq!(apply_percent_floor(7, 101), Err(PresaleError::MathOverflow));
    }

    #[test]
    fn test_tokens_for_value_widens() {
        let tokens = tokens_for_value(u64::MAX, 1_000).unwrap();
        assert_eq!(tokens, u64::MAX as u128 * 1_000);
    }

    #[test]
    fn test_narrowing_cast() {
        assert_eq!(safe_cast_u128_to_u64(42), Ok(42));
        assert_eq!(
            safe_cast_u128_to_u64(u64::MAX as u128 + 1),
            Err(PresaleError::ConversionError)
        );
    }
}
