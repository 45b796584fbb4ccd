/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Spectra produced by the solver
//!
//! After the solver has run, its `.spec` output files are read back into
//! the [`spectra`](crate::calculation::Calculation::spectra) map of the
//! calculation. Only the spectra the calculation asked for are read, and
//! files that do not exist are skipped.

pub mod errors;
pub mod reader;

pub use errors::{Result, SpectrumError};
pub use reader::{parse_spectrum, read_spectrum, SpectrumKind};

use crate::calculation::Calculation;
use log::{debug, info};
use ndarray::s;
use std::path::Path;

/// Load the enabled spectra of a calculation from `dir`.
///
/// One-photon experiments keep only the first intensity column. Returns
/// the names of the spectra that were loaded.
pub fn load_spectra<P: AsRef<Path>>(
    calculation: &mut Calculation,
    dir: P,
    base_name: &str,
) -> Result<Vec<String>> {
    let settings = calculation.settings();
    let enabled: Vec<SpectrumKind> = SpectrumKind::ALL
        .into_iter()
        .filter(|kind| match kind {
            SpectrumKind::Isotropic => settings.calculate_iso,
            SpectrumKind::Xmcd => settings.calculate_cd,
            SpectrumKind::Xmld => settings.calculate_ld,
        })
        .collect();
    let two_photon = calculation.spec().is_two_photon();

    let mut loaded = Vec::new();
    for kind in enabled {
        let path = dir.as_ref().join(kind.file_name(base_name));
        if !path.is_file() {
            debug!("No {} spectrum at {}", kind.name(), path.display());
            continue;
        }
        let mut data = read_spectrum(&path)?;
        if !two_photon {
            data = data.slice(s![.., ..1]).to_owned();
        }
        info!("Loaded {} spectrum ({} points)", kind.name(), data.nrows());
        calculation.spectra.insert(kind.name().to_string(), data);
        loaded.push(kind.name().to_string());
    }
    Ok(loaded)
}
