
use clap::Args;
use log::info;
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_required_filename};

#[derive(Clone, Args)]
#[clap(author, about,
    after_help = AFTER_HELP)]
pub struct RelabelSettings {
    /// Gene map produced by the build subcommand
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "gene-map")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub gene_map: PathBuf,

    /// Mutation table with "chr" and "gene" columns
    #[clap(required = true)]
    #[clap(short = 'm')]
    #[clap(long = "mutations")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub mutation_filename: PathBuf,

    /// Output mutation table with an added entrez_id column
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: PathBuf,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Dumps the settings to the logger and verifies the inputs exist.
/// # Errors
/// * if the output would overwrite the mutation input
pub fn check_relabel_settings(settings: RelabelSettings) -> Result<RelabelSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");
    check_required_filename(&settings.gene_map, "Gene map");
    info!("\tGene map: {:?}", settings.gene_map);
    check_required_filename(&settings.mutation_filename, "Mutation file");
    info!("\tMutations: {:?}", settings.mutation_filename);

    info!("Outputs:");
    info!("\tRelabeled mutations: {:?}", settings.output_filename);
    if settings.output_filename == settings.mutation_filename {
        bail!("--output cannot be the same as --mutations");
    }
    Ok(settings)
}
