/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Reader for the `.spec` files written by the solver

use super::errors::{Result, SpectrumError};
use ndarray::{s, Array2};
use std::fs;
use std::path::Path;

/// Header lines preceding the data block of a spectrum file
pub const HEADER_LINES: usize = 5;

/// Spectra the solver can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectrumKind {
    Isotropic,
    Xmcd,
    Xmld,
}

impl SpectrumKind {
    pub const ALL: [SpectrumKind; 3] = [Self::Isotropic, Self::Xmcd, Self::Xmld];

    /// Name the spectrum is stored under
    pub fn name(self) -> &'static str {
        match self {
            Self::Isotropic => "Isotropic",
            Self::Xmcd => "XMCD",
            Self::Xmld => "X(M)LD",
        }
    }

    /// File name suffix before `.spec`
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Isotropic => "_iso",
            Self::Xmcd => "_cd",
            Self::Xmld => "_ld",
        }
    }

    /// File name for a base name, e.g. `NiO_iso.spec`
    pub fn file_name(self, base_name: &str) -> String {
        format!("{}{}.spec", base_name, self.suffix())
    }
}

/// Parse the text of a spectrum file.
///
/// After the header, every line holds the energy followed by pairs of
/// columns; the intensities are the negated columns 2, 4, 6, ... (zero
/// based). Blank lines are ignored.
pub fn parse_spectrum(text: &str) -> Result<Array2<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (index, line) in text.lines().enumerate().skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|field| field.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SpectrumError::ParseError(format!("line {}: {}", index + 1, e)))?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(SpectrumError::ParseError(format!(
                    "line {}: expected {} columns, found {}",
                    index + 1,
                    first.len(),
                    row.len()
                )));
            }
        }
        rows.push(row);
    }

    let n_columns = rows.first().map_or(0, Vec::len);
    if n_columns < 3 {
        return Err(SpectrumError::ParseError(format!(
            "expected at least 3 data columns, found {}",
            n_columns
        )));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let n_rows = flat.len() / n_columns;
    let data = Array2::from_shape_vec((n_rows, n_columns), flat)
        .map_err(|e| SpectrumError::ParseError(e.to_string()))?;
    Ok(data.slice(s![.., 2..;2]).mapv(|value| -value))
}

/// Read one spectrum file
pub fn read_spectrum<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let text = fs::read_to_string(path)?;
    parse_spectrum(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const HEADER: &str = "#\n# Spectrum\n#\n# E  Re  Im\n#\n";

    #[test]
    fn test_parse_single_spectrum() {
        let text = format!("{}850.0 0.0 -1.5\n851.0 0.0 -2.5\n\n", HEADER);
        let data = parse_spectrum(&text).unwrap();
        assert_eq!(data.dim(), (2, 1));
        assert_relative_eq!(data[[0, 0]], 1.5);
        assert_relative_eq!(data[[1, 0]], 2.5);
    }

    #[test]
    fn test_parse_takes_every_other_column() {
        let text = format!("{}1 0 -1 0 -2 0 -3\n2 0 -4 0 -5 0 -6\n", HEADER);
        let data = parse_spectrum(&text).unwrap();
        assert_eq!(data.dim(), (2, 3));
        assert_relative_eq!(data[[0, 2]], 3.0);
        assert_relative_eq!(data[[1, 1]], 5.0);
    }

    #[test]
    fn test_parse_errors() {
        let ragged = format!("{}1 0 -1\n2 0\n", HEADER);
        assert!(matches!(parse_spectrum(&ragged), Err(SpectrumError::ParseError(_))));
        let garbage = format!("{}1 0 abc\n", HEADER);
        assert!(matches!(parse_spectrum(&garbage), Err(SpectrumError::ParseError(_))));
        assert!(parse_spectrum(HEADER).is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(SpectrumKind::Isotropic.file_name("NiO"), "NiO_iso.spec");
        assert_eq!(SpectrumKind::Xmcd.file_name("NiO"), "NiO_cd.spec");
        assert_eq!(SpectrumKind::Xmld.name(), "X(M)LD");
    }
}
