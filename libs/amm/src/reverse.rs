//! Parameters for the trade that reverses a swap

use types::tick::extreme_price_limit;
use types::SwapParams;

/// Swap parameters that trade `amount` back against `original`.
///
/// The direction flips and the sign of the specified amount flips, so the
/// backrun is denominated in the same currency as the original swap: an
/// exact-input sale of X becomes an exact-output purchase of X. The price
/// limit sits at the far end of the curve in the new direction.
pub fn reverse_swap(original: &SwapParams, amount: u128) -> SwapParams {
    let magnitude = i128::try_from(amount).unwrap_or(i128::MAX);
    let amount_specified = if original.amount_specified < 0 {
        magnitude
    } else {
        -magnitude
    };
    let zero_for_one = !original.zero_for_one;

    SwapParams {
        zero_for_one,
        amount_specified,
        sqrt_price_limit_x96: extreme_price_limit(zero_for_one),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U256;
    use types::tick::{max_sqrt_price, MIN_SQRT_PRICE};

    fn exact_in(zero_for_one: bool, amount: i128) -> SwapParams {
        SwapParams {
            zero_for_one,
            amount_specified: -amount,
            sqrt_price_limit_x96: U256::zero(),
        }
    }

    #[test]
    fn test_reverse_zero_for_one() {
        let reversed = reverse_swap(&exact_in(true, 1_000), 900);
        assert!(!reversed.zero_for_one);
        assert_eq!(reversed.amount_specified, 900);
        assert_eq!(reversed.sqrt_price_limit_x96, max_sqrt_price() - 1);
    }

    #[test]
    fn test_reverse_one_for_zero() {
        let reversed = reverse_swap(&exact_in(false, 1_000), 250);
        assert!(reversed.zero_for_one);
        assert_eq!(reversed.amount_specified, 250);
        assert_eq!(reversed.sqrt_price_limit_x96, U256::from(MIN_SQRT_PRICE + 1));
    }

    #[test]
    fn test_reverse_keeps_specified_currency() {
        let original = exact_in(true, 1_000);
        let reversed = reverse_swap(&original, 10);
        assert_eq!(
            original.specified_is_currency0(),
            reversed.specified_is_currency0()
        );
    }

    #[test]
    fn test_reverse_clamps_oversized_amount() {
        let reversed = reverse_swap(&exact_in(true, 1), u128::MAX);
        assert_eq!(reversed.amount_specified, i128::MAX);
    }
}
