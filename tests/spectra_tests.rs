use approx::assert_relative_eq;
use quanty_setup::calculation::{Calculation, SelectionKey};
use quanty_setup::database::ParameterDatabase;
use quanty_setup::spectra::{load_spectra, SpectrumError, SpectrumKind};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DATABASE: &str = include_str!("../data/parameters.json");

const HEADER: &str = "#\n# Quanty spectrum\n#\n#  Energy  Re  Im\n#\n";

fn calculation(experiment: &str) -> Calculation {
    let database = ParameterDatabase::from_json_str(DATABASE).unwrap();
    let key = SelectionKey::new("Ni", "2+", "Oh", experiment, "");
    Calculation::new(&database, &key).unwrap()
}

/// Test helper to write a spectrum file next to a script
fn write_spectrum(dir: &Path, name: &str, rows: &[&str]) {
    let mut text = HEADER.to_string();
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(dir.join(name), text).unwrap();
}

#[test]
fn test_load_enabled_spectra() {
    let dir = tempdir().unwrap();
    write_spectrum(dir.path(), "NiO_iso.spec", &["850.0 0.0 -0.5", "851.0 0.0 -1.25"]);
    write_spectrum(dir.path(), "NiO_cd.spec", &["850.0 0.0 0.1", "851.0 0.0 0.2"]);

    let mut calculation = calculation("XAS");
    let loaded = load_spectra(&mut calculation, dir.path(), "NiO").unwrap();
    // XMCD is not enabled, so its file is ignored.
    assert_eq!(loaded, ["Isotropic"]);

    let isotropic = &calculation.spectra["Isotropic"];
    assert_eq!(isotropic.dim(), (2, 1));
    assert_relative_eq!(isotropic[[1, 0]], 1.25);
}

#[test]
fn test_missing_files_are_skipped() {
    let dir = tempdir().unwrap();
    let mut calculation = calculation("XAS");
    calculation.set_spectra_to_calculate(true, true, true);
    write_spectrum(dir.path(), "untitled_ld.spec", &["850.0 0.0 -2.0"]);

    let loaded = load_spectra(&mut calculation, dir.path(), "untitled").unwrap();
    assert_eq!(loaded, [SpectrumKind::Xmld.name()]);
    assert_eq!(calculation.spectra.len(), 1);
}

#[test]
fn test_two_photon_spectra_keep_every_column() {
    let dir = tempdir().unwrap();
    write_spectrum(
        dir.path(),
        "rixs_iso.spec",
        &["-2.0 0 -1.0 0 -2.0 0 -3.0", "-1.0 0 -4.0 0 -5.0 0 -6.0"],
    );
    let mut calculation = calculation("RIXS");
    load_spectra(&mut calculation, dir.path(), "rixs").unwrap();

    let map = &calculation.spectra["Isotropic"];
    assert_eq!(map.dim(), (2, 3));
    assert_relative_eq!(map[[1, 2]], 6.0);
}

#[test]
fn test_malformed_spectrum() {
    let dir = tempdir().unwrap();
    write_spectrum(dir.path(), "bad_iso.spec", &["850.0 0.0 oops"]);
    let mut calculation = calculation("XAS");
    let result = load_spectra(&mut calculation, dir.path(), "bad");
    assert!(matches!(result, Err(SpectrumError::ParseError(_))));
    assert!(calculation.spectra.is_empty());
}
