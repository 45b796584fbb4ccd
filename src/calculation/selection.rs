/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Selection of element, charge, symmetry, experiment and edge

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five keys that pick one calculation out of the parameter database.
///
/// Each key must be a child of the previous one in the database hierarchy.
/// Keys that are not are replaced by the first legal child during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub element: String,
    pub charge: String,
    pub symmetry: String,
    pub experiment: String,
    pub edge: String,
}

impl SelectionKey {
    /// Create a selection from its five components
    pub fn new(
        element: impl Into<String>,
        charge: impl Into<String>,
        symmetry: impl Into<String>,
        experiment: impl Into<String>,
        edge: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            charge: charge.into(),
            symmetry: symmetry.into(),
            experiment: experiment.into(),
            edge: edge.into(),
        }
    }

    /// Whether the experiment involves two photons and so two energy axes
    pub fn is_two_photon(&self) -> bool {
        self.experiment.contains("RIXS")
    }
}

impl Default for SelectionKey {
    fn default() -> Self {
        Self::new("Ni", "2+", "Oh", "XAS", "L2,3 (2p)")
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.element, self.charge, self.symmetry, self.experiment, self.edge
        )
    }
}

/// Legal values at every level of the selection hierarchy, in database order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChoices {
    pub elements: Vec<String>,
    pub charges: Vec<String>,
    pub symmetries: Vec<String>,
    pub experiments: Vec<String>,
    pub edges: Vec<String>,
}
