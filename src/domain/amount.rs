use std::fmt;

use ethers::types::U256;

use crate::execution::errors::FlowError;

/// An amount in an asset's smallest unit (human amount × 10^decimals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct NormalizedAmount(U256);

impl NormalizedAmount {
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for NormalizedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scales a human decimal amount (`"15"`, `"0.000001"`, `"1e-6"`) by the asset's own precision.
///
/// Works on the digit string directly, so any number of fraction digits is accepted and digits
/// past `decimal_precision` are truncated toward zero: `"0.0000001"` at 6 decimals is `0`.
/// Empty, non-numeric, negative and > 256-bit results are rejected.
pub fn normalize(amount: &str, decimal_precision: u32) -> Result<NormalizedAmount, FlowError> {
    let raw = amount.trim();
    if raw.is_empty() {
        return Err(FlowError::InvalidAmount("amount is empty".to_string()));
    }

    let not_a_number = || FlowError::InvalidAmount(format!("`{}` is not a decimal number", raw));
    let too_large = || {
        FlowError::InvalidAmount(format!(
            "`{}` does not fit in 256 bits at {} decimals",
            raw, decimal_precision
        ))
    };

    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i64>().map_err(|_| not_a_number())?),
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(not_a_number());
    }

    let joined = format!("{}{}", int_part, frac_part);
    let digits = joined.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(NormalizedAmount::default());
    }
    if negative {
        return Err(FlowError::InvalidAmount(format!("`{}` is negative", raw)));
    }

    // value = digits * 10^shift in the smallest unit
    let shift = i64::from(decimal_precision)
        .checked_add(exponent)
        .and_then(|s| s.checked_sub(frac_part.len() as i64));
    let Some(shift) = shift else {
        return if exponent > 0 {
            Err(too_large())
        } else {
            Ok(NormalizedAmount::default())
        };
    };

    let scaled = if shift >= 0 {
        let factor = u32::try_from(shift).ok().and_then(pow10);
        U256::from_dec_str(digits)
            .ok()
            .zip(factor)
            .and_then(|(value, factor)| value.checked_mul(factor))
    } else {
        let dropped = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX);
        if dropped >= digits.len() {
            Some(U256::zero())
        } else {
            U256::from_dec_str(&digits[..digits.len() - dropped]).ok()
        }
    };

    scaled.map(NormalizedAmount).ok_or_else(too_large)
}

fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::errors::FlowErrorKind;

    fn units(amount: &str, decimals: u32) -> String {
        normalize(amount, decimals).unwrap().to_string()
    }

    #[test]
    fn one_is_ten_to_the_precision_for_every_precision() {
        for decimals in (0..=36).chain([77]) {
            let expected = U256::from(10u8).pow(U256::from(decimals));
            assert_eq!(
                normalize("1", decimals).unwrap().as_u256(),
                expected,
                "precision {}",
                decimals
            );
        }
    }

    #[test]
    fn eighteen_decimals() {
        assert_eq!(units("1", 18), "1000000000000000000");
        assert_eq!(units("0.5", 18), "500000000000000000");
        assert_eq!(units("15", 18), "15000000000000000000");
    }

    #[test]
    fn six_decimals_uses_the_asset_precision() {
        assert_eq!(units("1.5", 6), "1500000");
        assert_eq!(units("0.000001", 6), "1");
        assert_eq!(units("2000", 6), "2000000000");
    }

    #[test]
    fn eight_decimals() {
        assert_eq!(units("0.01", 8), "1000000");
    }

    #[test]
    fn digits_past_precision_are_truncated() {
        assert_eq!(units("0.0000001", 6), "0");
        assert_eq!(units("1.9999999", 6), "1999999");
        assert_eq!(units("2.7", 0), "2");
    }

    #[test]
    fn long_fractions_are_truncated_not_rounded() {
        assert_eq!(
            units("0.99999999999999999999999999999", 18),
            "999999999999999999"
        );
        assert_eq!(
            units("1.0000000000000000009999999999999999", 18),
            "1000000000000000000"
        );
        assert_eq!(units("0.9999999e-1", 6), "99999");
    }

    #[test]
    fn amounts_wider_than_96_bits_are_scaled() {
        let expected = U256::from(10u8).pow(U256::from(35));
        assert_eq!(
            normalize("100000000000000000000000000000", 6).unwrap().as_u256(),
            expected
        );
        assert_eq!(normalize("1e29", 6).unwrap().as_u256(), expected);
    }

    #[test]
    fn accepts_scientific_notation_and_whitespace() {
        assert_eq!(units("1e-6", 6), "1");
        assert_eq!(units("1e3", 0), "1000");
        assert_eq!(units("  3 ", 2), "300");
        assert_eq!(units("1.5E2", 0), "150");
        assert_eq!(units("+.5", 2), "50");
    }

    #[test]
    fn zero_is_allowed() {
        assert!(normalize("0", 18).unwrap().is_zero());
        assert!(normalize("-0", 18).unwrap().is_zero());
    }

    #[test]
    fn rejects_bad_input() {
        for bad in ["", "   ", "abc", "1,5", "-1", "-0.01", "NaN", ".", "1e", "1.2.3", "--1", "1e1.5"] {
            let err = normalize(bad, 18).unwrap_err();
            assert_eq!(err.kind(), FlowErrorKind::InvalidAmount, "input {:?}", bad);
        }
    }

    #[test]
    fn rejects_overflow() {
        let err = normalize("10", 77).unwrap_err();
        assert_eq!(err.kind(), FlowErrorKind::InvalidAmount);
        assert!(normalize("1", 78).is_err());
        assert!(normalize("1e100", 0).is_err());
        assert!(normalize(&"9".repeat(79), 0).is_err());
        assert!(normalize("0e100", 18).unwrap().is_zero());
    }
}
