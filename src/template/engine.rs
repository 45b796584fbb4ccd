/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Token table construction and rendering

use super::format::{format_flag, format_value, format_vector};
use super::tokens::TokenTable;
use crate::calculation::errors::{CalculationError, Result};
use crate::calculation::settings::CalculationSettings;
use crate::calculation::spec::{CalculationSpec, EnergyAxis};
use crate::hamiltonian::{ParameterTree, Term};
use crate::utils::Vector3D;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Base broadening used together with an energy-dependent Lorentzian
const BASE_GAMMA: f64 = 0.1;

/// Greek letters in parameter names and their ASCII spelling in tokens
const GREEK_LETTERS: [(char, &str); 4] = [('ζ', "zeta"), ('Δ', "Delta"), ('σ', "sigma"), ('τ', "tau")];

/// Settings that belong to the session rather than to one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Solver verbosity, written verbatim (e.g. `0x0000`)
    pub verbosity: String,
    /// Base name of the script and of the spectra the solver writes
    pub base_name: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            verbosity: "0x0000".to_string(),
            base_name: "untitled".to_string(),
        }
    }
}

/// Replace Greek letters with their ASCII names, e.g. `ζ(3d)` -> `zeta(3d)`
pub fn transliterate(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match GREEK_LETTERS.iter().find(|(letter, _)| *letter == c) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out
}

/// Build the ordered token table for a calculation.
///
/// Fails only when the polarization vectors are degenerate, i.e. the wave
/// vector is null or parallel to the first polarization vector.
pub fn build_replacements(
    spec: &CalculationSpec,
    tree: &ParameterTree,
    settings: &CalculationSettings,
    globals: &GlobalSettings,
) -> Result<TokenTable> {
    let mut table = TokenTable::new();

    table.insert("$Verbosity", globals.verbosity.as_str());
    table.insert("$NConfigurations", tree.n_configurations().to_string());
    table.insert(
        format!("$NElectrons_{}", spec.block),
        spec.n_electrons.to_string(),
    );
    table.insert("$T", format_value(settings.temperature));

    let mut axes = settings.energy_axes.iter();
    if let Some(axis) = axes.next() {
        insert_axis(&mut table, axis, 1);
        insert_incident_broadening(&mut table, axis, spec.has_polarization);
    }

    let (kin, ein1, ein2) = polarization_vectors(settings.kin, settings.ein1)?;
    table.insert("$kin", format_vector(&kin));
    table.insert("$ein1", format_vector(&ein1));
    table.insert("$ein2", format_vector(&ein2));

    table.insert("$calculateIso", format_flag(settings.calculate_iso));
    table.insert("$calculateCD", format_flag(settings.calculate_cd));
    table.insert("$calculateLD", format_flag(settings.calculate_ld));

    if spec.is_two_photon() {
        if let Some(axis) = axes.next() {
            insert_axis(&mut table, axis, 2);
            if let Some(gamma) = axis.lorentzian.first() {
                table.insert("$Gamma2", format_value(*gamma));
            }
        }
    }

    table.insert("$NPsisAuto", format_flag(settings.n_psis_auto));
    table.insert("$NPsis", settings.n_psis.to_string());

    for term in tree.terms() {
        insert_term(&mut table, term);
    }

    for (name, value) in &spec.radial_matrix_elements {
        table.insert(format!("${}", name), format_value(*value));
    }

    table.insert("$baseName", globals.base_name.as_str());

    if let Some((earlier, later)) = table.find_collision() {
        warn!("Token {} would corrupt {}", earlier, later);
    }
    debug!("Built {} template tokens", table.len());
    Ok(table)
}

/// Render a solver script from a template.
///
/// Tokens never bound by the calculation are left in the output as they
/// are. The output only depends on the arguments.
pub fn render(
    template: &str,
    spec: &CalculationSpec,
    tree: &ParameterTree,
    settings: &CalculationSettings,
    globals: &GlobalSettings,
) -> Result<String> {
    let table = build_replacements(spec, tree, settings, globals)?;
    Ok(table.apply(template))
}

/// Normalized wave vector, first polarization and the second polarization
/// `ein1 x kin`, renormalized.
pub fn polarization_vectors(
    kin: Vector3D,
    ein1: Vector3D,
) -> Result<(Vector3D, Vector3D, Vector3D)> {
    let kin = kin
        .normalize()
        .ok_or_else(|| CalculationError::DegenerateVectors("the wave vector is null".to_string()))?;
    let ein1 = ein1.normalize().ok_or_else(|| {
        CalculationError::DegenerateVectors("the polarization vector is null".to_string())
    })?;
    let ein2 = ein1.cross(&kin).normalize().ok_or_else(|| {
        CalculationError::DegenerateVectors(format!(
            "the wave vector {} and the polarization vector {} are parallel",
            kin, ein1
        ))
    })?;
    Ok((kin, ein1, ein2))
}

fn insert_axis(table: &mut TokenTable, axis: &EnergyAxis, index: usize) {
    table.insert(format!("$Emin{}", index), format_value(axis.min));
    table.insert(format!("$Emax{}", index), format_value(axis.max));
    table.insert(format!("$NE{}", index), axis.n_points.to_string());
    table.insert(format!("$Eedge{}", index), format_value(axis.edge));
}

/// Lorentzian of the incident axis. With polarization the solver applies an
/// energy-dependent broadening growing from `Gmin` to `Gmax` around
/// `Egamma` on top of a fixed base broadening.
fn insert_incident_broadening(table: &mut TokenTable, axis: &EnergyAxis, has_polarization: bool) {
    let Some(&gamma_min) = axis.lorentzian.first() else {
        return;
    };
    if !has_polarization {
        table.insert("$Gamma1", format_value(gamma_min));
        return;
    }
    let gamma_max = axis.lorentzian.get(1).copied().unwrap_or(gamma_min);
    let pivot = axis.lorentzian.get(2).copied().unwrap_or_else(|| axis.midpoint());
    table.insert("$Gamma1", format_value(BASE_GAMMA));
    table.insert("$Gmin1", format_value(gamma_min));
    table.insert("$Gmax1", format_value(gamma_max));
    table.insert("$Egamma1", format_value(pivot));
}

fn insert_term(table: &mut TokenTable, term: &Term) {
    for configuration in &term.configurations {
        let Some(suffix) = configuration.suffix() else {
            warn!(
                "No token suffix for '{}' of '{}'; its parameters are not rendered",
                configuration.label, term.name
            );
            continue;
        };
        for parameter in &configuration.parameters {
            let name = transliterate(&parameter.name);
            table.insert(
                format!("${}_{}_value", name, suffix),
                format_value(parameter.value),
            );
            table.insert(
                format!("${}_{}_scaling", name, suffix),
                parameter.scaling.map(format_value).unwrap_or_default(),
            );
        }
    }
    table.insert(
        format!("${}", term.switch_name()),
        format_flag(term.state.is_enabled()),
    );
}
