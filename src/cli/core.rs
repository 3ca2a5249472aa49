use clap::{Parser, Subcommand};
use lazy_static::lazy_static;
use log::error;
use std::path::Path;

use crate::cli::coverage::CoverageSettings;
use crate::cli::map_build::BuildSettings;
use crate::cli::relabel::RelabelSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.3.0-6bb9635-dirty` - while on a dirty branch
    /// * `0.3.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));
}

/// Shared after help string with the data attribution.
pub const AFTER_HELP: &str = "Gene identifiers and symbols are sourced from NCBI Gene (https://www.ncbi.nlm.nih.gov/gene).
This program comes with ABSOLUTELY NO WARRANTY.";

#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// entrezmap, relabels mutation gene symbols with Entrez gene IDs.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Download the reference, build the gene map, and check mutation coverage
    Build(Box<BuildSettings>),
    /// Check mutation coverage against an existing gene map
    Coverage(Box<CoverageSettings>),
    /// Add Entrez IDs to a mutation table using an existing gene map
    Relabel(Box<RelabelSettings>),
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) {
    if !filename.exists() {
        error!("{} does not exist: \"{}\"", label, filename.display());
        std::process::exit(exitcode::NOINPUT);
    } else {
        // file exists, we're good
    }
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `opt_filename` - the optional file path to check for
/// * `label` - the label to use for error messages
pub fn check_optional_filename(opt_filename: Option<&Path>, label: &str) {
    if let Some(filename) = opt_filename {
        check_required_filename(filename, label);
    }
}
