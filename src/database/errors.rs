/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for the parameter database

use std::io;
use thiserror::Error;

/// Errors that can occur while loading or reading the parameter database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing database entry: {0}")]
    MissingKey(String),

    #[error("Invalid database format: {0}")]
    InvalidFormat(String),
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;
