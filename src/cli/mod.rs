/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Command line interface
//!
//! `list` walks the selection hierarchy of a parameter database and
//! `render` writes the solver script for one selection.

mod commands;

pub use commands::{list_choices, parse_assignment, Assignment, ListArgs, RenderArgs, SelectionArgs};

use crate::config::SetupConfig;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quanty-setup",
    version,
    about = "Prepare Quanty input scripts for core-level spectroscopy"
)]
pub struct Cli {
    /// Log debug messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session configuration file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the choices at the next level of the selection
    List(ListArgs),
    /// Resolve a selection, apply edits and write the solver script
    Render(RenderArgs),
}

/// Run a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => SetupConfig::from_file(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => SetupConfig::default(),
    };
    match cli.command {
        Command::List(args) => commands::run_list(&args, &config),
        Command::Render(args) => commands::run_render(&args, &config),
    }
}
