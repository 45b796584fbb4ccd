/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Resolved calculation specification
//!
//! A [`CalculationSpec`] is the immutable result of resolving a
//! [`SelectionKey`] against the parameter database. It is rebuilt from
//! scratch whenever the selection changes.

use super::selection::{SelectionChoices, SelectionKey};
use serde::{Deserialize, Serialize};

/// One electronic configuration taking part in the calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    /// Role of the configuration: "Initial", "Intermediate" or "Final"
    pub role: String,
    /// Database id, e.g. `3d08` or `2p05,3d09`
    pub id: String,
    /// Occupation of the valence shell in this configuration
    pub n_electrons: u32,
}

impl ConfigurationEntry {
    /// Label of the matching configuration node in the parameter tree
    pub fn label(&self) -> String {
        format!("{} Hamiltonian", self.role)
    }
}

/// Energy grid and broadening along one axis of the spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAxis {
    pub label: String,
    /// Lower limit relative to the edge (eV)
    pub min: f64,
    /// Upper limit relative to the edge (eV)
    pub max: f64,
    pub n_points: usize,
    /// Edge energy (eV)
    pub edge: f64,
    /// Lorentzian FWHM; one value, or `[min, max]` / `[min, max, pivot]`
    /// for energy-dependent broadening
    pub lorentzian: Vec<f64>,
    /// Gaussian FWHM
    pub gaussian: f64,
}

impl EnergyAxis {
    /// Middle of the energy window
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Smallest number of points that still resolves the narrowest
    /// Lorentzian; `None` when the broadening is zero.
    pub fn min_points(&self) -> Option<usize> {
        let gamma = *self.lorentzian.first()?;
        if gamma > 0.0 {
            Some(((self.max - self.min) / gamma).floor().max(0.0) as usize)
        } else {
            None
        }
    }
}

/// Default value and scaling of one parameter as found in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefault {
    pub name: String,
    pub value: f64,
    pub scaling: Option<f64>,
}

/// Parameters of one term for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDefaults {
    /// Tree label, see [`ConfigurationEntry::label`]
    pub label: String,
    pub parameters: Vec<ParameterDefault>,
}

/// A Hamiltonian term and its defaults for every configuration it applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDefaults {
    pub name: String,
    pub configurations: Vec<ConfigurationDefaults>,
}

/// Everything the database says about one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSpec {
    /// Normalized selection; every component is a legal database key
    pub key: SelectionKey,
    /// Legal values at each level for the normalized selection
    pub choices: SelectionChoices,
    /// Name of the solver template file
    pub template_name: String,
    /// Valence shell of the initial configuration, e.g. `3d` or `4f`
    pub block: String,
    /// Valence electrons in the initial configuration
    pub n_electrons: u32,
    pub configurations: Vec<ConfigurationEntry>,
    /// One axis, or two for two-photon experiments
    pub energy_axes: Vec<EnergyAxis>,
    /// Whether dichroism calculations make sense for this edge and shell
    pub has_polarization: bool,
    pub n_states: usize,
    pub n_states_max: usize,
    /// Terms in first-declaration order
    pub terms: Vec<TermDefaults>,
    pub radial_matrix_elements: Vec<(String, f64)>,
}

impl CalculationSpec {
    /// Whether the experiment has a second (emission) energy axis
    pub fn is_two_photon(&self) -> bool {
        self.key.is_two_photon()
    }

    /// Whether the valence shell is a d-shell
    pub fn is_d_block(&self) -> bool {
        self.block.ends_with('d')
    }

    /// Whether the valence shell is an f-shell
    pub fn is_f_block(&self) -> bool {
        self.block.ends_with('f')
    }

    /// Largest number of ligand configurations the valence shell can hold,
    /// or `None` when the shell is neither d nor f.
    pub fn max_configurations(&self) -> Option<usize> {
        let capacity: usize = if self.is_d_block() {
            10
        } else if self.is_f_block() {
            14
        } else {
            return None;
        };
        Some(capacity.saturating_sub(self.n_electrons as usize) + 1)
    }
}
