/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for calculation setup

use crate::database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while resolving or editing a calculation
#[derive(Error, Debug)]
pub enum CalculationError {
    /// The selection cannot be resolved at all (the root element is absent)
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// An edit violates a known physical-domain constraint
    #[error("Value out of range: {0}")]
    OutOfRangeValue(String),

    /// A list or vector edit could not be parsed into numbers
    #[error("Malformed list: {0}")]
    MalformedList(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Invalid check state: {0}")]
    InvalidCheckState(String),

    #[error("Degenerate vectors: {0}")]
    DegenerateVectors(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl CalculationError {
    /// Whether the edit that produced this error can simply be retried
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidSelection(_) | Self::Database(_))
    }
}

/// Result type for calculation operations
pub type Result<T> = std::result::Result<T, CalculationError>;
