/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Error types for reading solver spectra

use std::io;
use thiserror::Error;

/// Errors that can occur while reading a spectrum file
#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type for spectrum operations
pub type Result<T> = std::result::Result<T, SpectrumError>;
