/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Session configuration
//!
//! Locations of the parameter database, the templates and the output, plus
//! the session-wide template settings. Values come from an optional JSON
//! file and can be overridden on the command line.

use crate::template::GlobalSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration of a setup session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Parameter database (JSON)
    pub database_path: PathBuf,
    /// Directory holding the solver templates
    pub template_dir: PathBuf,
    /// Directory the rendered scripts are written to
    pub output_dir: PathBuf,
    /// Solver verbosity, written verbatim into the script
    pub verbosity: String,
    /// Base name of the script and of the spectra
    pub base_name: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        let globals = GlobalSettings::default();
        Self {
            database_path: PathBuf::from("data/parameters.json"),
            template_dir: PathBuf::from("data/templates"),
            output_dir: PathBuf::from("."),
            verbosity: globals.verbosity,
            base_name: globals.base_name,
        }
    }
}

impl SetupConfig {
    /// Load a configuration file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Template settings shared by every calculation of the session
    pub fn globals(&self) -> GlobalSettings {
        GlobalSettings {
            verbosity: self.verbosity.clone(),
            base_name: self.base_name.clone(),
        }
    }
}
