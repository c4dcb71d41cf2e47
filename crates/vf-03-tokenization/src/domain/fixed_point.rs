//! 18-decimal fixed-point carbon amounts.
//!
//! The on-chain token stores carbon mass as `kg * 10^18` in a `uint256`.
//! Encoding goes through the shortest decimal string that round-trips the
//! `f64` (Rust's `Display` for floats never uses exponent notation), so the
//! integer carries exactly the digits the caller sees and no binary drift.
//! Digits beyond the 18th decimal place are truncated.

use primitive_types::U256;
use thiserror::Error;

/// Decimal places of the on-chain carbon amount.
pub const CARBON_DECIMALS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedPointError {
    #[error("carbon amount must be finite and non-negative, got {0}")]
    OutOfDomain(String),

    #[error("carbon amount {0} does not fit in 256 bits")]
    Overflow(String),
}

/// Encode kilograms as a decimal string of `kg * 10^18`.
pub fn kg_to_fixed_point(carbon_kg: f64) -> Result<String, FixedPointError> {
    Ok(kg_to_units(carbon_kg)?.to_string())
}

pub fn kg_to_units(carbon_kg: f64) -> Result<U256, FixedPointError> {
    if !carbon_kg.is_finite() || carbon_kg < 0.0 {
        return Err(FixedPointError::OutOfDomain(carbon_kg.to_string()));
    }

    // +0.0 normalizes a negative zero
    let text = (carbon_kg + 0.0).to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac: String = frac_part
        .chars()
        .chain(std::iter::repeat('0'))
        .take(CARBON_DECIMALS)
        .collect();

    U256::from_dec_str(&format!("{int_part}{frac}"))
        .map_err(|_| FixedPointError::Overflow(text.clone()))
}

/// Decode a fixed-point amount back to kilograms.
pub fn fixed_point_to_kg(units: U256) -> f64 {
    let digits = format!("{:0>width$}", units.to_string(), width = CARBON_DECIMALS + 1);
    let (int_part, frac_part) = digits.split_at(digits.len() - CARBON_DECIMALS);
    // Always well-formed: only ASCII digits and one point.
    format!("{int_part}.{frac_part}").parse().unwrap_or(0.0)
}
