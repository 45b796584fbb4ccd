/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Hierarchical parameter container: term, configuration, parameter
//!
//! The tree keeps the declaration order of the database at every level.
//! Iteration order is what the template engine relies on, so it must not
//! change between edits.

use super::term::{CheckState, Configuration, Parameter, Term, TermKind};
use crate::calculation::errors::{CalculationError, Result};
use crate::calculation::spec::CalculationSpec;
use crate::utils::Vector3D;
use log::debug;
use serde::{Deserialize, Serialize};

/// Flattened view of one parameter leaf
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterEntry<'a> {
    pub term: &'a str,
    pub configuration: &'a str,
    pub parameter: &'a str,
    pub value: f64,
    pub scaling: Option<f64>,
}

/// In-memory Hamiltonian parameters for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTree {
    terms: Vec<Term>,
    /// Valence shell; selects which ligand term drives the configuration count
    block: String,
    n_configurations: usize,
    sync: bool,
}

impl ParameterTree {
    /// Materialize the tree with the defaults of a resolved specification
    pub fn build(spec: &CalculationSpec) -> Self {
        let terms = spec
            .terms
            .iter()
            .map(|defaults| {
                let kind = TermKind::classify(&defaults.name);
                let state = kind.default_state();
                let configurations = defaults
                    .configurations
                    .iter()
                    .map(|configuration| Configuration {
                        label: configuration.label.clone(),
                        state,
                        parameters: configuration
                            .parameters
                            .iter()
                            .map(|p| Parameter {
                                name: p.name.clone(),
                                value: p.value,
                                scaling: p.scaling,
                                default_value: p.value,
                            })
                            .collect(),
                    })
                    .collect();
                Term {
                    name: defaults.name.clone(),
                    kind,
                    state,
                    configurations,
                }
            })
            .collect();

        let mut tree = Self {
            terms,
            block: spec.block.clone(),
            n_configurations: 1,
            sync: false,
        };
        tree.n_configurations = tree.ligand_configurations().unwrap_or(1);
        tree
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name == name)
    }

    /// Current check state of a term
    pub fn check_state(&self, term: &str) -> Result<CheckState> {
        Ok(self.find_term(term)?.state)
    }

    /// Number of configurations the solver should mix; changes when the
    /// ligand hybridization term of the valence shell is toggled.
    pub fn n_configurations(&self) -> usize {
        self.n_configurations
    }

    pub fn sync_mode(&self) -> bool {
        self.sync
    }

    /// Toggle propagation of value edits to sibling configurations.
    ///
    /// Values edited before the switch are left as they are.
    pub fn set_sync_mode(&mut self, enabled: bool) {
        self.sync = enabled;
    }

    /// Name of the ligand hybridization term of the valence shell
    pub fn ligand_term_name(&self) -> String {
        format!("{}-Ligands Hybridization", self.block)
    }

    /// Set the check state of a term and all of its configurations
    pub fn set_check_state(&mut self, term: &str, state: CheckState) -> Result<()> {
        reject_partial(term, state)?;
        let index = self.term_index(term)?;
        let node = &mut self.terms[index];
        node.state = state;
        for configuration in &mut node.configurations {
            configuration.state = state;
        }
        debug!("Term '{}' set to {:?}", term, state);
        self.apply_ligand_rule(index);
        Ok(())
    }

    /// Set the check state of one configuration below a term; the term then
    /// becomes `Partial` if its configurations disagree.
    pub fn set_configuration_check_state(
        &mut self,
        term: &str,
        configuration: &str,
        state: CheckState,
    ) -> Result<()> {
        reject_partial(configuration, state)?;
        let index = self.term_index(term)?;
        let node = &mut self.terms[index];
        let child = node
            .configurations
            .iter_mut()
            .find(|c| c.label == configuration)
            .ok_or_else(|| unknown(term, Some(configuration), None))?;
        child.state = state;
        node.state = CheckState::combine(node.configurations.iter().map(|c| c.state));
        self.apply_ligand_rule(index);
        Ok(())
    }

    /// Update a parameter value.
    ///
    /// With sync mode on, every sibling configuration of the same term that
    /// has a parameter of the same name receives
    /// `value * sibling_default / edited_default`. Either every write
    /// happens or none does.
    ///
    /// A nonzero component of the magnetic field switches that term on.
    /// Returns `true` when the edit did so.
    pub fn set_value(
        &mut self,
        term: &str,
        configuration: &str,
        parameter: &str,
        value: f64,
    ) -> Result<bool> {
        let term_index = self.term_index(term)?;
        let node = &self.terms[term_index];
        let (config_index, param_index) = locate(node, configuration, parameter)?;
        check_value(node.kind, parameter, value)?;

        let mut writes = vec![(config_index, param_index, value)];
        if self.sync {
            let reference = node.configurations[config_index].parameters[param_index].default_value;
            if reference == 0.0 {
                debug!(
                    "Not synchronizing '{}': default value of '{}' is zero",
                    parameter, configuration
                );
            } else {
                for (index, sibling) in node.configurations.iter().enumerate() {
                    if index == config_index {
                        continue;
                    }
                    if let Some(position) = sibling.parameters.iter().position(|p| p.name == parameter) {
                        let ratio = sibling.parameters[position].default_value / reference;
                        let synced = value * ratio;
                        check_value(node.kind, parameter, synced)?;
                        writes.push((index, position, synced));
                    }
                }
            }
        }

        let node = &mut self.terms[term_index];
        for &(config_index, param_index, value) in &writes {
            node.configurations[config_index].parameters[param_index].value = value;
        }

        let field_on = node.kind == TermKind::MagneticField
            && node.state != CheckState::On
            && writes.iter().any(|&(_, _, value)| value != 0.0);
        if field_on {
            node.state = CheckState::On;
            for configuration in &mut node.configurations {
                configuration.state = CheckState::On;
            }
            debug!("Term '{}' switched on by a nonzero field", term);
        }
        Ok(field_on)
    }

    /// Update the scaling factor of a parameter that has one
    pub fn set_scaling(
        &mut self,
        term: &str,
        configuration: &str,
        parameter: &str,
        scaling: f64,
    ) -> Result<()> {
        if !scaling.is_finite() || scaling < 0.0 {
            return Err(CalculationError::OutOfRangeValue(format!(
                "The scaling factor of '{}' cannot be negative (got {}).",
                parameter, scaling
            )));
        }
        let term_index = self.term_index(term)?;
        let (config_index, param_index) = locate(&self.terms[term_index], configuration, parameter)?;
        let leaf = &mut self.terms[term_index].configurations[config_index].parameters[param_index];
        match leaf.scaling.as_mut() {
            Some(current) => {
                *current = scaling;
                Ok(())
            }
            None => Err(CalculationError::UnknownNode(format!(
                "parameter '{}' of '{}' has no scaling factor",
                parameter, term
            ))),
        }
    }

    /// Set the number of configurations directly; bounds are checked by
    /// the owning calculation.
    pub fn set_n_configurations(&mut self, n_configurations: usize) -> Result<()> {
        if n_configurations == 0 {
            return Err(CalculationError::OutOfRangeValue(
                "The number of configurations must be at least one.".to_string(),
            ));
        }
        self.n_configurations = n_configurations;
        Ok(())
    }

    /// Apply an external magnetic field along `-kin_hat`.
    ///
    /// A nonzero field switches the magnetic field term on, a zero field
    /// switches it off. Returns `false` when the tree has no such term.
    pub fn apply_magnetic_field(&mut self, field: f64, kin_hat: Vector3D) -> bool {
        let Some(term) = self.terms.iter_mut().find(|t| t.kind == TermKind::MagneticField) else {
            return false;
        };

        let state = if field == 0.0 { CheckState::Off } else { CheckState::On };
        term.state = state;
        let direction = (-kin_hat).components();
        for configuration in &mut term.configurations {
            configuration.state = state;
            for (parameter, component) in configuration.parameters.iter_mut().zip(direction) {
                let value = field * component;
                // Avoid rendering "-0.0000".
                parameter.value = if value == 0.0 { 0.0 } else { value };
                parameter.scaling = None;
            }
        }
        debug!("Magnetic field {} T applied along {}", field, -kin_hat);
        true
    }

    /// Replace the scaling of every atomic parameter starting with `F`,
    /// `G` or `ζ`.
    pub fn apply_scaling_factors(&mut self, fk: f64, gk: f64, zeta: f64) {
        let atomic = self.terms.iter_mut().filter(|t| t.kind == TermKind::Atomic);
        for term in atomic {
            for parameter in term.configurations.iter_mut().flat_map(|c| c.parameters.iter_mut()) {
                let scaling = if parameter.name.starts_with('F') {
                    fk
                } else if parameter.name.starts_with('G') {
                    gk
                } else if parameter.name.starts_with('ζ') {
                    zeta
                } else {
                    continue;
                };
                parameter.scaling = Some(scaling);
            }
        }
    }

    /// Lazily walk every parameter in term, configuration, parameter order
    pub fn iter(&self) -> impl Iterator<Item = ParameterEntry<'_>> + '_ {
        self.terms.iter().flat_map(|term| {
            term.configurations.iter().flat_map(move |configuration| {
                configuration.parameters.iter().map(move |p| ParameterEntry {
                    term: &term.name,
                    configuration: &configuration.label,
                    parameter: &p.name,
                    value: p.value,
                    scaling: p.scaling,
                })
            })
        })
    }

    /// Configuration count implied by the ligand term, if the tree has one
    fn ligand_configurations(&self) -> Option<usize> {
        let name = self.ligand_term_name();
        match self.term(&name)?.state {
            CheckState::Off => Some(1),
            CheckState::On => Some(2),
            CheckState::Partial => None,
        }
    }

    fn apply_ligand_rule(&mut self, index: usize) {
        if self.terms[index].name != self.ligand_term_name() {
            return;
        }
        if let Some(n_configurations) = self.ligand_configurations() {
            debug!("Number of configurations set to {}", n_configurations);
            self.n_configurations = n_configurations;
        }
    }

    fn find_term(&self, name: &str) -> Result<&Term> {
        self.term(name).ok_or_else(|| unknown(name, None, None))
    }

    fn term_index(&self, name: &str) -> Result<usize> {
        self.terms
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| unknown(name, None, None))
    }
}

fn locate(term: &Term, configuration: &str, parameter: &str) -> Result<(usize, usize)> {
    let config_index = term
        .configurations
        .iter()
        .position(|c| c.label == configuration)
        .ok_or_else(|| unknown(&term.name, Some(configuration), None))?;
    let param_index = term.configurations[config_index]
        .parameters
        .iter()
        .position(|p| p.name == parameter)
        .ok_or_else(|| unknown(&term.name, Some(configuration), Some(parameter)))?;
    Ok((config_index, param_index))
}

fn check_value(kind: TermKind, parameter: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CalculationError::OutOfRangeValue(format!(
            "The value of '{}' must be a finite number.",
            parameter
        )));
    }
    match kind.lower_bound(parameter) {
        Some(bound) if value < bound => Err(CalculationError::OutOfRangeValue(format!(
            "The value of '{}' cannot be smaller than {} (got {}).",
            parameter, bound, value
        ))),
        _ => Ok(()),
    }
}

fn reject_partial(node: &str, state: CheckState) -> Result<()> {
    if state == CheckState::Partial {
        return Err(CalculationError::InvalidCheckState(format!(
            "'{}' cannot be set to a partial state directly",
            node
        )));
    }
    Ok(())
}

fn unknown(term: &str, configuration: Option<&str>, parameter: Option<&str>) -> CalculationError {
    let path = [Some(term), configuration, parameter]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" / ");
    CalculationError::UnknownNode(path)
}
