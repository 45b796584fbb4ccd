/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

use crate::calculation::{Calculation, SelectionKey};
use crate::config::SetupConfig;
use crate::database::{ParameterDatabase, ParameterLookup};
use crate::hamiltonian::CheckState;
use crate::template::{load_template, write_script};
use anyhow::{bail, Context};
use log::{debug, info};
use std::path::PathBuf;

/// Database and (partial) selection
#[derive(clap::Args, Debug, Default)]
pub struct SelectionArgs {
    /// Parameter database (JSON); overrides the configuration file
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[arg(long)]
    pub element: Option<String>,

    #[arg(long)]
    pub charge: Option<String>,

    #[arg(long)]
    pub symmetry: Option<String>,

    #[arg(long)]
    pub experiment: Option<String>,

    #[arg(long)]
    pub edge: Option<String>,
}

impl SelectionArgs {
    /// Selection with defaults for the levels that were not given
    pub fn to_key(&self) -> SelectionKey {
        let defaults = SelectionKey::default();
        SelectionKey::new(
            self.element.clone().unwrap_or(defaults.element),
            self.charge.clone().unwrap_or(defaults.charge),
            self.symmetry.clone().unwrap_or(defaults.symmetry),
            self.experiment.clone().unwrap_or(defaults.experiment),
            self.edge.clone().unwrap_or(defaults.edge),
        )
    }

    fn load_database(&self, config: &SetupConfig) -> anyhow::Result<ParameterDatabase> {
        let path = self.database.as_ref().unwrap_or(&config.database_path);
        ParameterDatabase::from_file(path)
            .with_context(|| format!("cannot load parameter database {}", path.display()))
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Template directory; overrides the configuration file
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Output directory; overrides the configuration file
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Base name of the script and of the spectra
    #[arg(long)]
    pub base_name: Option<String>,

    /// Temperature (K)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Magnetic field (T), applied antiparallel to the wave vector
    #[arg(long, allow_negative_numbers = true)]
    pub magnetic_field: Option<f64>,

    /// Parameter edit, e.g. "Crystal Field/Initial/10Dq(3d)=1.2"
    #[arg(long, value_name = "TERM/CONFIGURATION/PARAMETER=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Switch a Hamiltonian term on
    #[arg(long, value_name = "TERM")]
    pub enable: Vec<String>,

    /// Switch a Hamiltonian term off
    #[arg(long, value_name = "TERM")]
    pub disable: Vec<String>,

    /// Propagate parameter edits to the other configurations of a term
    #[arg(long)]
    pub sync: bool,
}

/// A parameter edit given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub term: String,
    /// Full tree label, e.g. "Initial Hamiltonian"
    pub configuration: String,
    pub parameter: String,
    pub value: f64,
}

/// Parse `term/configuration/parameter=value`. The configuration may be
/// given by its role alone (`Initial`, `Intermediate`, `Final`).
pub fn parse_assignment(text: &str) -> Result<Assignment, String> {
    let (path, value) = text
        .rsplit_once('=')
        .ok_or_else(|| format!("expected TERM/CONFIGURATION/PARAMETER=VALUE, got '{}'", text))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value '{}': {}", value.trim(), e))?;
    let parts: Vec<&str> = path.split('/').map(str::trim).collect();
    let [term, configuration, parameter] = parts.as_slice() else {
        return Err(format!(
            "expected TERM/CONFIGURATION/PARAMETER, got '{}'",
            path
        ));
    };
    let configuration = if configuration.ends_with("Hamiltonian") {
        configuration.to_string()
    } else {
        format!("{} Hamiltonian", configuration)
    };
    Ok(Assignment {
        term: term.to_string(),
        configuration,
        parameter: parameter.to_string(),
        value,
    })
}

/// Legal values at the first selection level that was not given. Levels
/// must be given from the top down.
pub fn list_choices<L: ParameterLookup + ?Sized>(
    database: &L,
    selection: &SelectionArgs,
) -> anyhow::Result<Vec<String>> {
    let levels = [
        (&selection.element, "charges"),
        (&selection.charge, "symmetries"),
        (&selection.symmetry, "experiments"),
        (&selection.experiment, "edges"),
    ];
    let mut path = vec!["elements"];
    for (value, children) in levels {
        match value {
            Some(value) => {
                path.push(value.as_str());
                path.push(children);
            }
            None => break,
        }
    }
    if !database.contains(&path) {
        bail!("nothing in the database at {}", path.join(" / "));
    }
    Ok(database
        .children(&path)
        .into_iter()
        .map(str::to_string)
        .collect())
}

pub(super) fn run_list(args: &ListArgs, config: &SetupConfig) -> anyhow::Result<()> {
    let database = args.selection.load_database(config)?;
    for choice in list_choices(&database, &args.selection)? {
        println!("{}", choice);
    }
    Ok(())
}

pub(super) fn run_render(args: &RenderArgs, config: &SetupConfig) -> anyhow::Result<()> {
    let database = args.selection.load_database(config)?;
    let key = args.selection.to_key();
    let mut calculation = Calculation::new(&database, &key)
        .with_context(|| format!("cannot resolve {}", key))?;
    info!("Rendering {}", calculation.label());

    let tree = calculation.tree_mut();
    tree.set_sync_mode(args.sync);
    for term in &args.enable {
        tree.set_check_state(term, CheckState::On)?;
    }
    for term in &args.disable {
        tree.set_check_state(term, CheckState::Off)?;
    }
    for edit in &args.set {
        debug!(
            "Setting {} / {} / {} to {}",
            edit.term, edit.configuration, edit.parameter, edit.value
        );
        calculation.set_value(&edit.term, &edit.configuration, &edit.parameter, edit.value)?;
    }
    if let Some(temperature) = args.temperature {
        calculation.set_temperature(temperature)?;
    }
    if let Some(field) = args.magnetic_field {
        calculation.set_magnetic_field(field)?;
    }

    let template_dir = args.template_dir.as_ref().unwrap_or(&config.template_dir);
    let template_name = &calculation.spec().template_name;
    let template = load_template(template_dir, template_name)
        .with_context(|| format!("cannot load template {}", template_name))?;

    let mut globals = config.globals();
    if let Some(base_name) = &args.base_name {
        globals.base_name = base_name.clone();
    }
    let script = calculation.render(&template, &globals)?;

    let output_dir = args.output_dir.as_ref().unwrap_or(&config.output_dir);
    let path = write_script(output_dir, &globals.base_name, &script)
        .with_context(|| format!("cannot write script to {}", output_dir.display()))?;
    println!("{}", path.display());
    Ok(())
}
