//! Token amounts
//!
//! Balances, allowances and supply are 256-bit unsigned integers counted in
//! base units. These helpers convert between base units and the
//! human-readable decimal form (`1.5` tokens = `1_500_000_000_000_000_000`
//! base units at 18 decimals).

pub use primitive_types::U256;
use thiserror::Error;

/// Base-unit token amount
pub type Amount = U256;

/// Decimal places used by the ledger
pub const DECIMALS: u8 = 18;

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Too many decimal places: {found} (max {max})")]
    TooManyDecimals { found: usize, max: u8 },
    #[error("Amount does not fit in 256 bits")]
    Overflow,
}

/// `10^decimals` as an amount
pub fn unit(decimals: u8) -> Amount {
    U256::exp10(decimals as usize)
}

/// Parse a base-unit amount given in decimal, or in hex with a `0x` prefix
pub fn parse_amount(text: &str) -> Result<Amount, UnitsError> {
    let text = text.trim().replace('_', "");
    if text.is_empty() {
        return Err(UnitsError::InvalidAmount(text));
    }

    if let Some(digits) = text.strip_prefix("0x") {
        if digits.is_empty() || digits.len() > 64 {
            return Err(UnitsError::InvalidAmount(text.clone()));
        }
        return U256::from_str_radix(digits, 16)
            .map_err(|_| UnitsError::InvalidAmount(text.clone()));
    }

    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(UnitsError::InvalidAmount(text));
    }
    U256::from_dec_str(&text).map_err(|_| UnitsError::Overflow)
}

/// Parse a decimal token quantity ("1.25") into base units
pub fn parse_units(text: &str, decimals: u8) -> Result<Amount, UnitsError> {
    let text = text.trim().replace('_', "");
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text.as_str(), ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(UnitsError::InvalidAmount(text.clone()));
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(UnitsError::InvalidAmount(text.clone()));
    }
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals {
            found: fraction.len(),
            max: decimals,
        });
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| UnitsError::Overflow)?
    };
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let fraction = if padded.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&padded).map_err(|_| UnitsError::Overflow)?
    };

    whole
        .checked_mul(unit(decimals))
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Format base units as a decimal token quantity, trimming trailing zeros
pub fn format_units(amount: Amount, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let (whole, fraction) = amount.div_mod(unit(decimals));
    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = decimals as usize
    );
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_decimal_and_hex() {
        assert_eq!(parse_amount("12345").unwrap(), U256::from(12345u64));
        assert_eq!(parse_amount("1_000").unwrap(), U256::from(1000u64));
        assert_eq!(parse_amount("0xff").unwrap(), U256::from(255u64));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("1.5").is_err());
    }

    #[test]
    fn test_parse_amount_overflow() {
        let too_big = format!("{}0", U256::MAX);
        assert_eq!(parse_amount(&too_big), Err(UnitsError::Overflow));
        assert_eq!(parse_amount(&U256::MAX.to_string()).unwrap(), U256::MAX);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("1", 18).unwrap(), unit(18));
        assert_eq!(
            parse_units("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(parse_units(".25", 2).unwrap(), U256::from(25u64));
        assert_eq!(
            parse_units("10_000_000_000", 18).unwrap(),
            U256::from(10_000_000_000u64) * unit(18)
        );
        assert!(matches!(
            parse_units("0.001", 2),
            Err(UnitsError::TooManyDecimals { found: 3, max: 2 })
        ));
        assert!(parse_units(".", 18).is_err());
        assert!(parse_units("1.2.3", 18).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(unit(18), 18), "1");
        assert_eq!(
            format_units(U256::from(1_000_000_000_000_000u64), 18),
            "0.001"
        );
        assert_eq!(format_units(U256::from(1234u64), 2), "12.34");
        assert_eq!(format_units(U256::from(1200u64), 2), "12");
        assert_eq!(format_units(U256::from(7u64), 0), "7");
    }
}
