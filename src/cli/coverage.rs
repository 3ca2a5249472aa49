
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_required_filename};

#[derive(Clone, Args)]
#[clap(author, about,
    after_help = AFTER_HELP)]
pub struct CoverageSettings {
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

    /// Optional coverage report output (JSON)
    #[clap(long = "report")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub report_filename: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_coverage_settings(settings: CoverageSettings) -> CoverageSettings {
    // dump stuff to the logger
    info!("Inputs:");
    check_required_filename(&settings.gene_map, "Gene map");
    info!("\tGene map: {:?}", settings.gene_map);
    check_required_filename(&settings.mutation_filename, "Mutation file");
    info!("\tMutations: {:?}", settings.mutation_filename);
    if let Some(report) = settings.report_filename.as_ref() {
        info!("Outputs:");
        info!("\tCoverage report: {report:?}");
    }
    settings
}
