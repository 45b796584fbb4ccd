/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Hamiltonian parameters
//!
//! A calculation's Hamiltonian is a list of terms (atomic, crystal field,
//! hybridization, external fields). Each term holds one set of parameters
//! per electronic configuration, and both terms and configurations carry a
//! tri-state check flag deciding whether they end up in the solver input.

pub mod term;
pub mod tree;

pub use term::{CheckState, Configuration, Parameter, Term, TermKind};
pub use tree::{ParameterEntry, ParameterTree};
