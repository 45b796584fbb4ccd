/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Parameter database
//!
//! The database is a nested, string-keyed document with the layout
//!
//! ```text
//! elements.<E>.charges.<C>.symmetries.<S>.experiments.<X>.edges.<D>
//! elements.<E>.charges.<C>.configurations.<cfg>.terms.<term>[.<symmetry>].<parameter>
//! ```
//!
//! It is loaded once and only ever read afterwards, so a single instance can
//! be shared between any number of resolvers.

pub mod errors;
pub mod schema;

pub use errors::{DatabaseError, Result};
pub use schema::{EdgeBranch, EnergyEntry};

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read access to a hierarchical parameter store
///
/// Resolution only needs key lookup, child listing and containment, so the
/// storage behind it can be swapped without touching the resolver.
pub trait ParameterLookup {
    /// Node at `path`, if every key along the way exists
    fn get(&self, path: &[&str]) -> Option<&Value>;

    /// Keys of the object at `path` in document order; empty for leaves
    fn children(&self, path: &[&str]) -> Vec<&str>;

    /// Whether a node exists at `path`
    fn contains(&self, path: &[&str]) -> bool {
        self.get(path).is_some()
    }
}

/// JSON-backed parameter database
#[derive(Debug, Clone)]
pub struct ParameterDatabase {
    root: Value,
}

impl ParameterDatabase {
    /// Wrap an already materialized document
    pub fn from_value(root: Value) -> Result<Self> {
        match root.get("elements") {
            Some(Value::Object(_)) => Ok(Self { root }),
            _ => Err(DatabaseError::InvalidFormat(
                "top-level 'elements' object is missing".to_string(),
            )),
        }
    }

    /// Parse a database from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Load a database from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let database = Self::from_json_str(&text)?;
        log::info!(
            "Loaded parameter database from {} ({} elements)",
            path.display(),
            database.children(&["elements"]).len()
        );
        Ok(database)
    }
}

/// Path of the edge branch of a fully specified selection
pub fn edge_path<'a>(
    element: &'a str,
    charge: &'a str,
    symmetry: &'a str,
    experiment: &'a str,
    edge: &'a str,
) -> [&'a str; 10] {
    [
        "elements",
        element,
        "charges",
        charge,
        "symmetries",
        symmetry,
        "experiments",
        experiment,
        "edges",
        edge,
    ]
}

/// Deserialize the edge branch at `path`
pub fn read_edge_branch<L: ParameterLookup + ?Sized>(database: &L, path: &[&str]) -> Result<EdgeBranch> {
    let value = database
        .get(path)
        .ok_or_else(|| DatabaseError::MissingKey(path.join(".")))?;
    Ok(EdgeBranch::deserialize(value)?)
}

impl ParameterLookup for ParameterDatabase {
    fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.root, |node, key| node.get(*key))
    }

    fn children(&self, path: &[&str]) -> Vec<&str> {
        match self.get(path) {
            Some(Value::Object(map)) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}
