/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Solver input generation
//!
//! A template is plain solver input with `$Token` placeholders. Rendering
//! builds an ordered table of token replacements from a calculation and
//! substitutes them one after the other.

pub mod engine;
pub mod files;
pub mod format;
pub mod tokens;

pub use engine::{build_replacements, polarization_vectors, render, transliterate, GlobalSettings};
pub use files::{load_template, script_path, write_script};
pub use format::{format_flag, format_significant, format_value, format_vector};
pub use tokens::TokenTable;
