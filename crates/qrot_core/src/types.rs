//! Core types for QROT
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases, measurement bases, and formatting helpers shared by
//! every QROT crate.

use crate::error::{QrotError, QrotResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit (wire) identifier, 0-indexed
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
/// Gantree: Angle // pub type Angle = f64
pub type Angle = f64;

/// Sampled measurement counts: bitstring -> count
pub type Counts = HashMap<String, u64>;

/// Flat parameter vector for variational circuits
/// Gantree: ParamVec // pub type ParamVec = Vec<f64>
pub type ParamVec = Vec<f64>;

// ============================================================================
// Basis
// ============================================================================

/// Measurement basis for a single qubit
/// Gantree: Basis // X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// X (Hadamard) basis
    X,
    /// Y basis
    Y,
    /// Z (computational) basis
    Z,
}

// ============================================================================
// Angle Validation
// ============================================================================

/// Reject NaN and infinite angles
pub fn check_angle(angle: Angle) -> QrotResult<Angle> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(QrotError::InvalidAngle(angle))
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a slice of values as `[a, b, ...]` with fixed precision
pub fn format_values(values: &[f64], precision: usize) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Format a value as `d.ddde±XX`
pub fn format_scientific(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw,
    }
}

/// Format a slice of values as `[a, b, ...]`, switching every entry to
/// scientific notation when a non-zero magnitude is below 1e-4 or the
/// magnitudes span more than three decades
pub fn format_array(values: &[f64], precision: usize) -> String {
    let magnitudes: Vec<f64> = values
        .iter()
        .map(|v| v.abs())
        .filter(|&m| m > 0.0 && m.is_finite())
        .collect();
    let min = magnitudes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = magnitudes.iter().copied().fold(0.0, f64::max);

    if magnitudes.is_empty() || (min >= 1e-4 && max / min <= 1e3) {
        return format_values(values, precision);
    }

    let items: Vec<String> = values
        .iter()
        .map(|&v| format_scientific(v, precision))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Format a value with a leading space when non-negative (`{: .N}` style)
pub fn format_signed(value: f64, precision: usize) -> String {
    if value.is_sign_negative() && value != 0.0 {
        format!("{:.*}", precision, value)
    } else {
        format!(" {:.*}", precision, value.abs())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_angle() {
        assert!(check_angle(0.54).is_ok());
        assert!(check_angle(f64::NAN).is_err());
        assert!(check_angle(f64::INFINITY).is_err());
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&[0.5, -0.25], 3), "[0.500, -0.250]");
        assert_eq!(format_values(&[], 3), "[]");
    }

    #[test]
    fn test_format_array_small_angle() {
        let line = format_array(&[7.15266381e-18, std::f64::consts::PI], 8);
        assert_eq!(line, "[7.15266381e-18, 3.14159265e+00]");
    }

    #[test]
    fn test_format_array_fixed() {
        assert_eq!(format_array(&[0.0, std::f64::consts::PI], 8), "[0.00000000, 3.14159265]");
        assert_eq!(format_array(&[0.54, 0.12], 3), "[0.540, 0.120]");
        assert_eq!(format_array(&[], 3), "[]");
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(-1.5e-10, 2), "-1.50e-10");
        assert_eq!(format_scientific(1234.0, 3), "1.234e+03");
        assert_eq!(format_scientific(0.0, 1), "0.0e+00");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0.9961778, 7), " 0.9961778");
        assert_eq!(format_signed(-1.0, 7), "-1.0000000");
        // Negative zero prints without a sign
        assert_eq!(format_signed(-0.0, 2), " 0.00");
    }
}
