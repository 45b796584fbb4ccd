/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Resolution of a selection against the parameter database
//!
//! Every level of the selection is checked against the children of its
//! parent. A value that is not a legal child is replaced by the first legal
//! child, so resolution only fails when the element itself is unknown.

use super::errors::{CalculationError, Result};
use super::selection::{SelectionChoices, SelectionKey};
use super::spec::{
    CalculationSpec, ConfigurationDefaults, ConfigurationEntry, EnergyAxis, ParameterDefault,
    TermDefaults,
};
use crate::database::schema::{parameter_values, EdgeBranch, EnergyEntry};
use crate::database::{edge_path, read_edge_branch, DatabaseError, ParameterLookup};
use crate::hamiltonian::TermKind;
use log::{debug, warn};

/// Edge name of the K edge; p-d hybridization is only kept for it
const K_EDGE: &str = "K (1s)";

/// Whether magnetic circular and linear dichroism make sense for an edge
/// probing the given valence shell.
pub fn has_polarization(edge: &str, block: &str) -> bool {
    (edge.contains("L2,3 (2p)") && block.contains('d'))
        || (edge.contains("M4,5 (3d)") && block.contains('f'))
}

/// Resolve a selection into a calculation specification.
///
/// # Errors
///
/// `InvalidSelection` when the element is not in the database or a level
/// has no children at all; `Database` when a branch is malformed.
pub fn resolve<L: ParameterLookup + ?Sized>(
    database: &L,
    key: &SelectionKey,
) -> Result<CalculationSpec> {
    let (key, choices) = normalize(database, key)?;

    let path = edge_path(
        &key.element,
        &key.charge,
        &key.symmetry,
        &key.experiment,
        &key.edge,
    );
    let branch = read_edge_branch(database, &path)?;

    let first = branch.configurations.first().ok_or_else(|| {
        DatabaseError::InvalidFormat(format!("no configurations for {}", key))
    })?;
    let (block, n_electrons) = split_shell(&first.1).ok_or_else(|| {
        DatabaseError::InvalidFormat(format!("invalid configuration id '{}'", first.1))
    })?;
    let block = block.to_string();

    let configurations: Vec<ConfigurationEntry> = branch
        .configurations
        .iter()
        .map(|(role, id)| ConfigurationEntry {
            role: role.clone(),
            id: id.clone(),
            n_electrons: shell_occupation(id, &block).unwrap_or(0),
        })
        .collect();

    let has_polarization = has_polarization(&key.edge, &block);
    let energy_axes = energy_axes(&branch, key.is_two_photon())?;
    let terms = resolve_terms(database, &key, &configurations, has_polarization)?;

    debug!(
        "Resolved {}: {} configurations, {} terms, polarization = {}",
        key,
        configurations.len(),
        terms.len(),
        has_polarization
    );

    Ok(CalculationSpec {
        template_name: branch.template_name.clone(),
        block,
        n_electrons,
        configurations,
        energy_axes,
        has_polarization,
        n_states: branch.number_of_states,
        n_states_max: branch.number_of_states,
        terms,
        radial_matrix_elements: branch.radial_matrix_elements(),
        key,
        choices,
    })
}

/// Walk the selection hierarchy, replacing illegal values by the first
/// legal child at each level.
pub fn normalize<L: ParameterLookup + ?Sized>(
    database: &L,
    key: &SelectionKey,
) -> Result<(SelectionKey, SelectionChoices)> {
    let elements = owned(database.children(&["elements"]));
    if !elements.iter().any(|e| *e == key.element) {
        return Err(CalculationError::InvalidSelection(format!(
            "element '{}' is not in the parameter database",
            key.element
        )));
    }
    let element = key.element.clone();

    let charges = owned(database.children(&["elements", element.as_str(), "charges"]));
    let charge = pick("charge", &key.charge, &charges)?;

    let symmetries = owned(database.children(&[
        "elements",
        element.as_str(),
        "charges",
        charge.as_str(),
        "symmetries",
    ]));
    let symmetry = pick("symmetry", &key.symmetry, &symmetries)?;

    let experiments = owned(database.children(&[
        "elements",
        element.as_str(),
        "charges",
        charge.as_str(),
        "symmetries",
        symmetry.as_str(),
        "experiments",
    ]));
    let experiment = pick("experiment", &key.experiment, &experiments)?;

    let edges = owned(database.children(&[
        "elements",
        element.as_str(),
        "charges",
        charge.as_str(),
        "symmetries",
        symmetry.as_str(),
        "experiments",
        experiment.as_str(),
        "edges",
    ]));
    let edge = pick("edge", &key.edge, &edges)?;

    let key = SelectionKey {
        element,
        charge,
        symmetry,
        experiment,
        edge,
    };
    let choices = SelectionChoices {
        elements,
        charges,
        symmetries,
        experiments,
        edges,
    };
    Ok((key, choices))
}

fn owned(keys: Vec<&str>) -> Vec<String> {
    keys.into_iter().map(str::to_string).collect()
}

fn pick(level: &str, requested: &str, legal: &[String]) -> Result<String> {
    if legal.iter().any(|value| value == requested) {
        return Ok(requested.to_string());
    }
    let fallback = legal.first().ok_or_else(|| {
        CalculationError::InvalidSelection(format!("no {} available for the selection", level))
    })?;
    warn!(
        "Unknown {} '{}', falling back to '{}'",
        level, requested, fallback
    );
    Ok(fallback.clone())
}

/// Split `3d08` into `("3d", 8)`
fn split_shell(id: &str) -> Option<(&str, u32)> {
    let first = id.split(',').next()?.trim();
    let shell = first.get(..2)?;
    let occupation = first.get(2..)?.parse().ok()?;
    Some((shell, occupation))
}

/// Occupation of `block` in a configuration id like `2p05,3d09`
fn shell_occupation(id: &str, block: &str) -> Option<u32> {
    id.split(',')
        .filter_map(|part| split_shell(part.trim()))
        .find(|(shell, _)| *shell == block)
        .map(|(_, occupation)| occupation)
}

fn energy_axes(branch: &EdgeBranch, two_photon: bool) -> Result<Vec<EnergyAxis>> {
    let count = if two_photon { 2 } else { 1 };
    if branch.energies.len() < count {
        return Err(DatabaseError::InvalidFormat(format!(
            "expected {} energy axes, found {}",
            count,
            branch.energies.len()
        ))
        .into());
    }
    Ok(branch.energies[..count].iter().map(energy_axis).collect())
}

fn energy_axis(entry: &EnergyEntry) -> EnergyAxis {
    let EnergyEntry(label, min, max, n_points, edge, lorentzian, gaussian) = entry;
    EnergyAxis {
        label: label.clone(),
        min: *min,
        max: *max,
        n_points: *n_points,
        edge: *edge,
        lorentzian: lorentzian.clone(),
        gaussian: *gaussian,
    }
}

fn resolve_terms<L: ParameterLookup + ?Sized>(
    database: &L,
    key: &SelectionKey,
    configurations: &[ConfigurationEntry],
    has_polarization: bool,
) -> Result<Vec<TermDefaults>> {
    let mut terms: Vec<TermDefaults> = Vec::new();

    for configuration in configurations {
        let terms_path = [
            "elements",
            key.element.as_str(),
            "charges",
            key.charge.as_str(),
            "configurations",
            configuration.id.as_str(),
            "terms",
        ];
        if !database.contains(&terms_path) {
            return Err(DatabaseError::MissingKey(terms_path.join(".")).into());
        }

        for name in database.children(&terms_path) {
            let kind = TermKind::classify(name);
            if kind.needs_polarization() && !has_polarization {
                debug!("Skipping '{}': no polarization for {}", name, key.edge);
                continue;
            }
            if kind == TermKind::PdHybridization && !key.edge.contains(K_EDGE) {
                debug!("Skipping '{}': only used for K edges", name);
                continue;
            }

            let mut path = terms_path.to_vec();
            path.push(name);
            if kind.is_symmetry_dependent() {
                path.push(key.symmetry.as_str());
            }
            let Some(value) = database.get(&path) else {
                debug!("Skipping '{}' for {}: no {} branch", name, configuration.id, key.symmetry);
                continue;
            };
            let values = parameter_values(value).ok_or_else(|| {
                DatabaseError::InvalidFormat(format!("non-numeric parameters in {}", path.join(".")))
            })?;

            let parameters = values
                .into_iter()
                .map(|(parameter, value)| ParameterDefault {
                    scaling: kind.default_scaling(&parameter),
                    name: parameter,
                    value,
                })
                .collect();
            let defaults = ConfigurationDefaults {
                label: configuration.label(),
                parameters,
            };

            match terms.iter_mut().find(|t| t.name == name) {
                Some(term) => term.configurations.push(defaults),
                None => terms.push(TermDefaults {
                    name: name.to_string(),
                    configurations: vec![defaults],
                }),
            }
        }
    }

    Ok(terms)
}
