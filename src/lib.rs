/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! # quanty-setup
//!
//! Preparation of input scripts for Quanty, a many-body solver used to
//! simulate core-level spectra (XAS, XMCD, XLD, RIXS) of transition-metal
//! and rare-earth ions.
//!
//! The workflow is:
//!
//! 1. [`database::ParameterDatabase`] holds the physics defaults, keyed by
//!    element, charge, symmetry, experiment and edge.
//! 2. [`calculation::resolve`] turns a selection into a
//!    [`calculation::CalculationSpec`], falling back to legal values where
//!    the selection is not in the database.
//! 3. [`hamiltonian::ParameterTree`] holds the editable Hamiltonian
//!    parameters with tri-state check flags.
//! 4. [`template::render`] substitutes everything into a solver template.
//!
//! [`calculation::Calculation`] ties these together and validates every
//! user edit.

pub mod calculation;
pub mod cli;
pub mod config;
pub mod database;
pub mod hamiltonian;
pub mod spectra;
pub mod template;
pub mod utils;

pub use calculation::{Calculation, CalculationError, CalculationSpec, SelectionKey};
pub use database::{ParameterDatabase, ParameterLookup};
pub use hamiltonian::{CheckState, ParameterTree};
pub use template::GlobalSettings;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
