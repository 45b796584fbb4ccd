/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Typed views of the database branches the resolver reads

use serde::Deserialize;
use serde_json::{Map, Value};

/// One energy axis as stored in the database:
/// `[label, min, max, nPoints, edge, [lorentzian..], gaussian]`
#[derive(Debug, Clone, Deserialize)]
pub struct EnergyEntry(
    pub String,
    pub f64,
    pub f64,
    pub usize,
    pub f64,
    pub Vec<f64>,
    pub f64,
);

/// Leaf branch reached at `...edges.<edge>`
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeBranch {
    /// File name of the solver template
    #[serde(rename = "template name")]
    pub template_name: String,

    /// Ordered `(role, configuration id)` pairs
    pub configurations: Vec<(String, String)>,

    /// Number of states to compute
    #[serde(rename = "number of states")]
    pub number_of_states: usize,

    /// Energy axes; the second one only exists for two-photon experiments
    pub energies: Vec<EnergyEntry>,

    #[serde(rename = "monoelectronic radial matrix elements", default)]
    pub radial_matrix_elements: Option<Map<String, Value>>,
}

impl EdgeBranch {
    /// Radial matrix elements in database order, skipping non-numeric entries
    pub fn radial_matrix_elements(&self) -> Vec<(String, f64)> {
        self.radial_matrix_elements
            .iter()
            .flat_map(|map| map.iter())
            .filter_map(|(name, value)| value.as_f64().map(|v| (name.clone(), v)))
            .collect()
    }
}

/// Reads a `parameter -> value` object, keeping the document order
pub fn parameter_values(value: &Value) -> Option<Vec<(String, f64)>> {
    let map = value.as_object()?;
    let mut parameters = Vec::with_capacity(map.len());
    for (name, value) in map {
        parameters.push((name.clone(), value.as_f64()?));
    }
    Some(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edge_branch_deserialization() {
        let value = json!({
            "template name": "Ni2+_Oh_XAS_L23.lua",
            "configurations": [["Initial", "3d08"], ["Final", "2p05,3d09"]],
            "number of states": 45,
            "energies": [["L2,3 (2p)", -10.0, 20.0, 2000, 853.0, [0.2, 0.4], 0.1]],
            "monoelectronic radial matrix elements": {"P1": 0.5, "P2": "n/a"}
        });

        let branch: EdgeBranch = serde_json::from_value(value).unwrap();
        assert_eq!(branch.template_name, "Ni2+_Oh_XAS_L23.lua");
        assert_eq!(branch.configurations.len(), 2);
        assert_eq!(branch.configurations[1].1, "2p05,3d09");
        assert_eq!(branch.energies[0].3, 2000);
        assert_eq!(branch.energies[0].5, vec![0.2, 0.4]);
        assert_eq!(branch.radial_matrix_elements(), vec![("P1".to_string(), 0.5)]);
    }

    #[test]
    fn test_parameter_values_keep_order() {
        let value = json!({"U(3d,3d)": 7.3, "F2(3d,3d)": 12.2, "ζ(3d)": 0.08});
        let parameters = parameter_values(&value).unwrap();
        let names: Vec<&str> = parameters.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["U(3d,3d)", "F2(3d,3d)", "ζ(3d)"]);

        assert!(parameter_values(&json!({"Dq": "x"})).is_none());
        assert!(parameter_values(&json!([1.0])).is_none());
    }
}
