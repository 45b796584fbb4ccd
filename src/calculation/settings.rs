/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! User-adjustable settings of a calculation

use super::spec::{CalculationSpec, EnergyAxis};
use crate::utils::Vector3D;
use serde::{Deserialize, Serialize};

/// Default temperature in Kelvin
pub const DEFAULT_TEMPERATURE: f64 = 10.0;

/// Default scaling of the direct Slater integrals
pub const DEFAULT_FK: f64 = 0.8;

/// Default scaling of the exchange Slater integrals
pub const DEFAULT_GK: f64 = 0.8;

/// Default scaling of the spin-orbit coupling
pub const DEFAULT_ZETA: f64 = 1.0;

/// Settings the user may change after a selection has been resolved.
///
/// Edits go through the validating setters of
/// [`Calculation`](super::Calculation); reading the fields directly is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSettings {
    /// Temperature in Kelvin
    pub temperature: f64,
    /// Magnetic field in Tesla, applied antiparallel to the wave vector
    pub magnetic_field: f64,
    /// Incident wave vector
    pub kin: Vector3D,
    /// First incident polarization vector, perpendicular to `kin`
    pub ein1: Vector3D,
    pub calculate_iso: bool,
    pub calculate_cd: bool,
    pub calculate_ld: bool,
    /// Let the solver pick the number of states from the temperature
    pub n_psis_auto: bool,
    pub n_psis: usize,
    pub fk: f64,
    pub gk: f64,
    pub zeta: f64,
    /// Editable copies of the resolved energy axes
    pub energy_axes: Vec<EnergyAxis>,
}

impl CalculationSettings {
    /// Defaults for a freshly resolved specification
    pub fn from_spec(spec: &CalculationSpec) -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            magnetic_field: 0.0,
            kin: Vector3D::new(0.0, 0.0, -1.0),
            ein1: Vector3D::new(0.0, 1.0, 0.0),
            calculate_iso: true,
            calculate_cd: false,
            calculate_ld: false,
            n_psis_auto: true,
            n_psis: spec.n_states,
            fk: DEFAULT_FK,
            gk: DEFAULT_GK,
            zeta: DEFAULT_ZETA,
            energy_axes: spec.energy_axes.clone(),
        }
    }
}
