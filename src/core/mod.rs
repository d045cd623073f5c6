//! Core value types
//!
//! - Account addresses (20-byte identifiers, zero address as the null value)
//! - Token amounts (unsigned 256-bit integers) and decimal unit conversion

pub mod address;
pub mod units;

pub use address::{Address, AddressError, ADDRESS_LENGTH};
pub use units::{format_units, parse_amount, parse_units, unit, Amount, UnitsError, DECIMALS, U256};
