/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Calculation setup
//!
//! A [`Calculation`] owns the resolved [`CalculationSpec`], the editable
//! [`ParameterTree`] and the [`CalculationSettings`] of one selection.
//! All edits are validated before anything is written; a rejected edit
//! leaves the calculation exactly as it was.

pub mod errors;
pub mod resolver;
pub mod selection;
pub mod settings;
pub mod spec;

pub use errors::{CalculationError, Result};
pub use resolver::{has_polarization, normalize, resolve};
pub use selection::{SelectionChoices, SelectionKey};
pub use settings::CalculationSettings;
pub use spec::{CalculationSpec, ConfigurationEntry, EnergyAxis};

use crate::database::ParameterLookup;
use crate::hamiltonian::ParameterTree;
use crate::template::{self, GlobalSettings};
use crate::utils::{parse_number_list, Vector3D};
use log::{debug, info, warn};
use ndarray::Array2;
use std::collections::BTreeMap;

/// One calculation: resolved specification, parameters and settings
#[derive(Debug, Clone)]
pub struct Calculation {
    spec: CalculationSpec,
    tree: ParameterTree,
    settings: CalculationSettings,
    /// Spectra read back after the solver has run, keyed by spectrum name
    pub spectra: BTreeMap<String, Array2<f64>>,
}

impl Calculation {
    /// Resolve a selection and build its parameter tree
    pub fn new<L: ParameterLookup + ?Sized>(database: &L, key: &SelectionKey) -> Result<Self> {
        let spec = resolve(database, key)?;
        let tree = ParameterTree::build(&spec);
        let settings = CalculationSettings::from_spec(&spec);
        info!("New calculation: {}", spec.key);
        Ok(Self {
            spec,
            tree,
            settings,
            spectra: BTreeMap::new(),
        })
    }

    /// Switch to another selection. The tree and settings are rebuilt from
    /// scratch and replace the current ones only once resolution succeeded.
    pub fn select<L: ParameterLookup + ?Sized>(
        &mut self,
        database: &L,
        key: &SelectionKey,
    ) -> Result<()> {
        *self = Self::new(database, key)?;
        Ok(())
    }

    pub fn spec(&self) -> &CalculationSpec {
        &self.spec
    }

    pub fn tree(&self) -> &ParameterTree {
        &self.tree
    }

    /// Mutable access for check-state, value and sync edits
    pub fn tree_mut(&mut self) -> &mut ParameterTree {
        &mut self.tree
    }

    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Short human-readable description of the selection
    pub fn label(&self) -> String {
        self.spec.key.to_string()
    }

    /// Render the solver input for this calculation
    pub fn render(&self, template: &str, globals: &GlobalSettings) -> Result<String> {
        template::render(template, &self.spec, &self.tree, &self.settings, globals)
    }

    /// Update a parameter value through the tree. A nonzero magnetic field
    /// component switches the XMCD calculation on together with the term.
    pub fn set_value(
        &mut self,
        term: &str,
        configuration: &str,
        parameter: &str,
        value: f64,
    ) -> Result<()> {
        if self.tree.set_value(term, configuration, parameter, value)? {
            self.settings.calculate_cd = true;
        }
        Ok(())
    }

    /// Set the temperature. Zero temperature only needs the ground state,
    /// so the number of states is fixed to one.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(CalculationError::OutOfRangeValue(
                "The temperature cannot be negative.".to_string(),
            ));
        }
        if temperature == 0.0 {
            self.settings.n_psis_auto = false;
            self.settings.n_psis = 1;
        }
        self.settings.temperature = temperature;
        Ok(())
    }

    /// Set the magnetic field and switch the magnetic field term and the
    /// XMCD calculation on or off with it.
    pub fn set_magnetic_field(&mut self, field: f64) -> Result<()> {
        if !field.is_finite() {
            return Err(CalculationError::OutOfRangeValue(
                "The magnetic field must be a finite number.".to_string(),
            ));
        }
        if field != 0.0 && !self.spec.has_polarization {
            return Err(CalculationError::OutOfRangeValue(format!(
                "A magnetic field cannot be used for the {} edge of a {} shell.",
                self.spec.key.edge, self.spec.block
            )));
        }
        let kin_hat = self.kin_hat()?;
        self.tree.apply_magnetic_field(field, kin_hat);
        self.settings.calculate_cd = field != 0.0;
        self.settings.magnetic_field = field;
        Ok(())
    }

    pub fn set_energy_min(&mut self, axis: usize, min: f64) -> Result<()> {
        let current = self.axis(axis)?;
        if !min.is_finite() || min > current.max {
            return Err(CalculationError::OutOfRangeValue(
                "The lower energy limit cannot be larger than the upper limit.".to_string(),
            ));
        }
        check_pivot(current, min, current.max)?;
        self.axis_mut(axis)?.min = min;
        Ok(())
    }

    pub fn set_energy_max(&mut self, axis: usize, max: f64) -> Result<()> {
        let current = self.axis(axis)?;
        if !max.is_finite() || max < current.min {
            return Err(CalculationError::OutOfRangeValue(
                "The upper energy limit cannot be smaller than the lower limit.".to_string(),
            ));
        }
        check_pivot(current, current.min, max)?;
        self.axis_mut(axis)?.max = max;
        Ok(())
    }

    /// Set the number of energy points; the grid must be fine enough to
    /// resolve the narrowest Lorentzian.
    pub fn set_energy_points(&mut self, axis: usize, n_points: usize) -> Result<()> {
        let minimum = self.axis(axis)?.min_points().unwrap_or(1).max(1);
        if n_points < minimum {
            return Err(CalculationError::OutOfRangeValue(format!(
                "The number of points must be greater than {}.",
                minimum
            )));
        }
        self.axis_mut(axis)?.n_points = n_points;
        Ok(())
    }

    /// Set the Lorentzian broadening: `[gamma]`, `[gamma_min, gamma_max]`
    /// or `[gamma_min, gamma_max, pivot]`.
    pub fn set_lorentzian(&mut self, axis: usize, lorentzian: &[f64]) -> Result<()> {
        let current = self.axis(axis)?;
        if lorentzian.is_empty() {
            return Err(CalculationError::MalformedList(
                "The broadening needs at least one element.".to_string(),
            ));
        }
        if lorentzian.len() > 3 {
            return Err(CalculationError::OutOfRangeValue(
                "The broadening can have at most three elements.".to_string(),
            ));
        }
        if lorentzian.iter().any(|value| !value.is_finite()) {
            return Err(CalculationError::OutOfRangeValue(
                "The broadening must be a finite number.".to_string(),
            ));
        }
        if lorentzian.iter().take(2).any(|gamma| *gamma < 0.0) {
            return Err(CalculationError::OutOfRangeValue(
                "The broadening cannot be negative.".to_string(),
            ));
        }
        if let Some(&pivot) = lorentzian.get(2) {
            if !(current.min < pivot && pivot < current.max) {
                return Err(CalculationError::OutOfRangeValue(
                    "The transition point must lie between the upper and lower energy limits."
                        .to_string(),
                ));
            }
        }
        self.axis_mut(axis)?.lorentzian = lorentzian.to_vec();
        Ok(())
    }

    /// Parse and set the Lorentzian broadening from user text
    pub fn set_lorentzian_text(&mut self, axis: usize, text: &str) -> Result<()> {
        let values = parse_number_list(text).ok_or_else(|| {
            CalculationError::MalformedList("Invalid data for the Lorentzian broadening.".to_string())
        })?;
        self.set_lorentzian(axis, &values)
    }

    pub fn set_gaussian(&mut self, axis: usize, gaussian: f64) -> Result<()> {
        self.axis(axis)?;
        if !gaussian.is_finite() || gaussian < 0.0 {
            return Err(CalculationError::OutOfRangeValue(
                "The broadening cannot be negative.".to_string(),
            ));
        }
        self.axis_mut(axis)?.gaussian = gaussian;
        Ok(())
    }

    /// Set the incident wave vector. If the current polarization vector is
    /// no longer perpendicular, a new perpendicular one is picked.
    pub fn set_wave_vector(&mut self, kin: Vector3D) -> Result<()> {
        if kin.is_null() {
            return Err(CalculationError::OutOfRangeValue(
                "The wave vector cannot be null.".to_string(),
            ));
        }
        self.settings.kin = kin;
        if !kin.is_perpendicular(&self.settings.ein1) {
            let ein1 = perpendicular_to(kin);
            debug!("Polarization vector reset to {}", ein1);
            self.settings.ein1 = ein1;
        }
        if self.settings.magnetic_field != 0.0 {
            let kin_hat = self.kin_hat()?;
            self.tree.apply_magnetic_field(self.settings.magnetic_field, kin_hat);
        }
        Ok(())
    }

    pub fn set_wave_vector_text(&mut self, text: &str) -> Result<()> {
        let kin = parse_vector(text, "wave vector")?;
        self.set_wave_vector(kin)
    }

    /// Set the first polarization vector; it must be perpendicular to the
    /// wave vector.
    pub fn set_polarization_vector(&mut self, ein1: Vector3D) -> Result<()> {
        if ein1.is_null() {
            return Err(CalculationError::OutOfRangeValue(
                "The polarization vector cannot be null.".to_string(),
            ));
        }
        if !self.settings.kin.is_perpendicular(&ein1) {
            return Err(CalculationError::OutOfRangeValue(
                "The wave and polarization vectors need to be perpendicular.".to_string(),
            ));
        }
        self.settings.ein1 = ein1;
        Ok(())
    }

    pub fn set_polarization_vector_text(&mut self, text: &str) -> Result<()> {
        let ein1 = parse_vector(text, "polarization vector")?;
        self.set_polarization_vector(ein1)
    }

    /// Choose which spectra the solver computes
    pub fn set_spectra_to_calculate(&mut self, iso: bool, cd: bool, ld: bool) {
        self.settings.calculate_iso = iso;
        self.settings.calculate_cd = cd;
        self.settings.calculate_ld = ld;
    }

    /// Set the scaling of the Slater integrals and of the spin-orbit
    /// coupling for every atomic parameter.
    pub fn set_scaling_factors(&mut self, fk: f64, gk: f64, zeta: f64) -> Result<()> {
        if [fk, gk, zeta].iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(CalculationError::OutOfRangeValue(
                "The scaling factors cannot be negative.".to_string(),
            ));
        }
        self.tree.apply_scaling_factors(fk, gk, zeta);
        self.settings.fk = fk;
        self.settings.gk = gk;
        self.settings.zeta = zeta;
        Ok(())
    }

    /// Automatic state selection always asks for the maximum
    pub fn set_n_psis_auto(&mut self, auto: bool) {
        if auto {
            self.settings.n_psis = self.spec.n_states_max;
        }
        self.settings.n_psis_auto = auto;
    }

    /// Set the number of states; values above the maximum are clamped.
    /// An explicit count switches automatic selection off.
    pub fn set_n_psis(&mut self, n_psis: usize) -> Result<()> {
        if n_psis == 0 {
            return Err(CalculationError::OutOfRangeValue(
                "The number of states must be larger than zero.".to_string(),
            ));
        }
        let max = self.spec.n_states_max;
        if n_psis > max {
            warn!("The selected number of states exceeds the maximum ({})", max);
        }
        if self.settings.n_psis_auto {
            debug!("Explicit number of states; automatic selection switched off");
            self.settings.n_psis_auto = false;
        }
        self.settings.n_psis = n_psis.min(max);
        Ok(())
    }

    /// Set the number of ligand configurations; clamped to what the valence
    /// shell can hold. Ignored for shells other than d and f.
    pub fn set_n_configurations(&mut self, n_configurations: usize) -> Result<()> {
        let Some(max) = self.spec.max_configurations() else {
            debug!("Ignoring configuration count for the {} shell", self.spec.block);
            return Ok(());
        };
        let ligand = self.tree.ligand_term_name();
        let enabled = self
            .tree
            .term(&ligand)
            .is_some_and(|term| term.state.is_enabled());
        if n_configurations > 1 && !enabled {
            return Err(CalculationError::OutOfRangeValue(format!(
                "More than one configuration requires the '{}' term.",
                ligand
            )));
        }
        if n_configurations > max {
            warn!("The maximum number of configurations is {}", max);
        }
        self.tree.set_n_configurations(n_configurations.min(max))
    }

    fn kin_hat(&self) -> Result<Vector3D> {
        self.settings.kin.normalize().ok_or_else(|| {
            CalculationError::DegenerateVectors("the wave vector is null".to_string())
        })
    }

    fn axis(&self, index: usize) -> Result<&EnergyAxis> {
        self.settings
            .energy_axes
            .get(index)
            .ok_or_else(|| CalculationError::UnknownNode(format!("energy axis {}", index + 1)))
    }

    fn axis_mut(&mut self, index: usize) -> Result<&mut EnergyAxis> {
        self.settings
            .energy_axes
            .get_mut(index)
            .ok_or_else(|| CalculationError::UnknownNode(format!("energy axis {}", index + 1)))
    }
}

/// An energy-dependent Lorentzian pivot must stay strictly inside the window
fn check_pivot(axis: &EnergyAxis, min: f64, max: f64) -> Result<()> {
    match axis.lorentzian.get(2) {
        Some(&pivot) if !(min < pivot && pivot < max) => Err(CalculationError::OutOfRangeValue(
            format!(
                "The energy limits must enclose the broadening transition point ({}).",
                pivot
            ),
        )),
        _ => Ok(()),
    }
}

/// A vector perpendicular to `kin`, used when a new wave vector is no
/// longer perpendicular to the polarization.
pub fn perpendicular_to(kin: Vector3D) -> Vector3D {
    if kin.z != 0.0 || (-kin.x - kin.y) != 0.0 {
        Vector3D::new(kin.z, kin.z, -kin.x - kin.y)
    } else {
        Vector3D::new(-kin.z - kin.y, kin.x, kin.x)
    }
}

fn parse_vector(text: &str, what: &str) -> Result<Vector3D> {
    match parse_number_list(text).as_deref() {
        Some(&[x, y, z]) => Ok(Vector3D::new(x, y, z)),
        _ => Err(CalculationError::MalformedList(format!(
            "Invalid data for the {}.",
            what
        ))),
    }
}
