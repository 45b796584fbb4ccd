/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Number formatting for rendered scripts
//!
//! Values are always written as plain decimals so the solver's parser never
//! sees scientific notation.

use crate::utils::Vector3D;

/// Decimal places of parameter values, energies and broadenings
pub const VALUE_DECIMALS: usize = 4;

/// Significant digits of direction vector components
pub const VECTOR_DIGITS: i32 = 6;

/// Components smaller than this are written as `0`
const ZERO_TOLERANCE: f64 = 1e-12;

/// Format a value with four decimal places, e.g. `0.8000`
pub fn format_value(value: f64) -> String {
    // -0.0 would otherwise print as "-0.0000".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", VALUE_DECIMALS, value)
}

/// Format with `digits` significant digits and trailing zeros removed,
/// e.g. `0.707107`, `-1` or `0`.
pub fn format_significant(value: f64, digits: i32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.abs() < ZERO_TOLERANCE {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - exponent).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

/// Format a direction as a Lua table, e.g. `{0, 0, -1}`
pub fn format_vector(vector: &Vector3D) -> String {
    format!(
        "{{{}, {}, {}}}",
        format_significant(vector.x, VECTOR_DIGITS),
        format_significant(vector.y, VECTOR_DIGITS),
        format_significant(vector.z, VECTOR_DIGITS)
    )
}

/// `1` for true, `0` for false
pub fn format_flag(flag: bool) -> String {
    u8::from(flag).to_string()
}
