/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Reading templates and writing rendered scripts

use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of rendered solver scripts
pub const SCRIPT_EXTENSION: &str = "lua";

/// Read a template by file name from a template directory
pub fn load_template<P: AsRef<Path>>(dir: P, name: &str) -> io::Result<String> {
    let path = dir.as_ref().join(name);
    fs::read_to_string(&path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("cannot read template {}: {}", path.display(), e),
        )
    })
}

/// Path of the script written for a base name
pub fn script_path<P: AsRef<Path>>(dir: P, base_name: &str) -> PathBuf {
    dir.as_ref()
        .join(format!("{}.{}", base_name, SCRIPT_EXTENSION))
}

/// Write a rendered script as `<base_name>.lua` and return its path.
/// The output directory is created if needed.
pub fn write_script<P: AsRef<Path>>(dir: P, base_name: &str, script: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir.as_ref())?;
    let path = script_path(dir, base_name);
    fs::write(&path, script)?;
    info!("Wrote {}", path.display());
    Ok(path)
}
