/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Hamiltonian terms and the nodes of the parameter tree

use serde::{Deserialize, Serialize};

/// Default scaling of Slater integrals (`F`, `G`) in atomic terms
pub const DEFAULT_SLATER_SCALING: f64 = 0.8;

/// Default scaling of every other atomic parameter
pub const DEFAULT_ATOMIC_SCALING: f64 = 1.0;

/// Tri-state check flag of a tree node.
///
/// `Partial` only ever results from children with mixed states; it cannot
/// be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckState {
    Off,
    Partial,
    On,
}

impl CheckState {
    /// Anything above `Off` includes the node in the rendered script
    pub fn is_enabled(self) -> bool {
        self != CheckState::Off
    }

    /// Combined state of a set of children: `On`/`Off` when they agree,
    /// `Partial` otherwise. An empty set is `Off`.
    pub fn combine<I: IntoIterator<Item = CheckState>>(states: I) -> CheckState {
        let mut states = states.into_iter();
        let Some(first) = states.next() else {
            return CheckState::Off;
        };
        if states.all(|state| state == first) {
            first
        } else {
            CheckState::Partial
        }
    }
}

/// Physical interaction a term represents, derived from its database name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    /// Coulomb repulsion and spin-orbit coupling
    Atomic,
    CrystalField,
    /// Valence shell to ligand hybridization, e.g. `3d-Ligands Hybridization`
    LigandHybridization,
    /// Valence shell to p-shell hybridization, e.g. `3d-4p Hybridization`
    PdHybridization,
    MagneticField,
    ExchangeField,
    Other,
}

impl TermKind {
    /// Classify a term by its database name
    pub fn classify(name: &str) -> Self {
        if name.contains("Atomic") {
            TermKind::Atomic
        } else if name.contains("Crystal Field") {
            TermKind::CrystalField
        } else if name.contains("Magnetic Field") {
            TermKind::MagneticField
        } else if name.contains("Exchange Field") {
            TermKind::ExchangeField
        } else if name.contains("Ligands Hybridization") {
            TermKind::LigandHybridization
        } else if name.contains("Hybridization") && hybridized_shells(name).is_some() {
            TermKind::PdHybridization
        } else {
            TermKind::Other
        }
    }

    /// Magnetic and exchange fields only matter for dichroism
    pub fn needs_polarization(self) -> bool {
        matches!(self, TermKind::MagneticField | TermKind::ExchangeField)
    }

    /// Whether the term's parameters sit below a per-symmetry branch
    pub fn is_symmetry_dependent(self) -> bool {
        !matches!(
            self,
            TermKind::Atomic | TermKind::MagneticField | TermKind::ExchangeField
        )
    }

    /// Initial check state of a freshly built tree
    pub fn default_state(self) -> CheckState {
        match self {
            TermKind::Atomic | TermKind::CrystalField => CheckState::On,
            _ => CheckState::Off,
        }
    }

    /// Default scaling of a parameter of this kind of term
    pub fn default_scaling(self, parameter: &str) -> Option<f64> {
        match self {
            TermKind::Atomic if parameter.starts_with(['F', 'G']) => Some(DEFAULT_SLATER_SCALING),
            TermKind::Atomic => Some(DEFAULT_ATOMIC_SCALING),
            _ => None,
        }
    }

    /// Lower bound of a parameter value, if the physics imposes one
    pub fn lower_bound(self, parameter: &str) -> Option<f64> {
        match self {
            TermKind::Atomic if parameter.starts_with(['F', 'G', 'ζ']) => Some(0.0),
            _ => None,
        }
    }
}

/// Splits names like `3d-4p Hybridization` into `("3d", "4p")`; both sides
/// must be shell labels ending in `p` or `d`.
fn hybridized_shells(name: &str) -> Option<(&str, &str)> {
    let shells = name.split_whitespace().next()?;
    let (left, right) = shells.split_once('-')?;
    let is_shell = |s: &str| {
        s.len() == 2 && s.starts_with(|c: char| c.is_ascii_digit()) && s.ends_with(['p', 'd'])
    };
    (is_shell(left) && is_shell(right)).then_some((left, right))
}

/// Name of the `$H_...` switch token for a term, without the leading `$`
pub fn switch_name(name: &str, kind: TermKind) -> String {
    match kind {
        TermKind::Atomic => "H_atomic".to_string(),
        TermKind::CrystalField => "H_cf".to_string(),
        TermKind::MagneticField => "H_magnetic_field".to_string(),
        TermKind::ExchangeField => "H_exchange_field".to_string(),
        TermKind::LigandHybridization => {
            let shell = name.split('-').next().unwrap_or_default();
            format!("H_{}_Ld_hybridization", shell)
        }
        TermKind::PdHybridization => match hybridized_shells(name) {
            Some((left, right)) => format!("H_{}_{}_hybridization", left, right),
            None => generic_switch_name(name),
        },
        TermKind::Other => generic_switch_name(name),
    }
}

fn generic_switch_name(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();
    format!("H_{}", words.join("_"))
}

/// A parameter leaf: current value and scaling plus the database defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    /// Empty for parameters of non-atomic terms
    pub scaling: Option<f64>,
    pub default_value: f64,
}

/// Parameters of one configuration below a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// e.g. "Initial Hamiltonian"
    pub label: String,
    pub state: CheckState,
    pub parameters: Vec<Parameter>,
}

impl Configuration {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Single-letter suffix used in template tokens: `i`, `m` or `f`
    pub fn suffix(&self) -> Option<char> {
        if self.label.contains("Initial") {
            Some('i')
        } else if self.label.contains("Intermediate") {
            Some('m')
        } else if self.label.contains("Final") {
            Some('f')
        } else {
            None
        }
    }
}

/// A Hamiltonian term with its configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub kind: TermKind,
    pub state: CheckState,
    pub configurations: Vec<Configuration>,
}

impl Term {
    pub fn configuration(&self, label: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.label == label)
    }

    /// Name of the `$H_...` switch token, without the leading `$`
    pub fn switch_name(&self) -> String {
        switch_name(&self.name, self.kind)
    }
}
