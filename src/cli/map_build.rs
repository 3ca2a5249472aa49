
use clap::Args;
use log::info;
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename};

#[derive(Clone, Args)]
#[clap(author, about,
    after_help = AFTER_HELP)]
pub struct BuildSettings {
    /// Local gene_info reference, downloaded here if missing
    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(value_name = "TSV")]
    #[clap(default_value = "download/Homo_sapiens.gene_info.gz")]
    #[clap(help_heading = Some("Input/Output"))]
    pub reference_filename: PathBuf,

    /// Download location for the reference, overrides the build options
    #[clap(long = "reference-url")]
    #[clap(value_name = "URL")]
    #[clap(help_heading = Some("Input/Output"))]
    pub reference_url: Option<String>,

    /// Mutation table with "chr" and "gene" columns
    #[clap(short = 'm')]
    #[clap(long = "mutations")]
    #[clap(value_name = "TSV")]
    #[clap(default_value = "../../download/PANCAN_mutation.tsv.bz2")]
    #[clap(help_heading = Some("Input/Output"))]
    pub mutation_filename: PathBuf,

    /// Output gene map location
    #[clap(short = 'o')]
    #[clap(long = "output-map")]
    #[clap(value_name = "TSV")]
    #[clap(default_value = "PANCAN-mutation-gene-map.tsv")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_map: PathBuf,

    /// Optional build options (JSON)
    #[clap(long = "build-options")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub build_options: Option<PathBuf>,

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

/// Dumps the settings to the logger and checks the inputs that must already exist.
/// The reference is allowed to be missing since it gets downloaded.
/// # Errors
/// * if the output path would overwrite one of the inputs
pub fn check_build_settings(settings: BuildSettings) -> Result<BuildSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");
    info!("\tReference: {:?}", settings.reference_filename);
    if let Some(url) = settings.reference_url.as_ref() {
        info!("\tReference URL: {url}");
    }
    check_optional_filename(settings.build_options.as_deref(), "Build options file");
    if let Some(bo) = settings.build_options.as_ref() {
        info!("\tBuild options: {bo:?}");
    }
    info!("\tMutations: {:?}", settings.mutation_filename);

    info!("Outputs:");
    info!("\tGene map: {:?}", settings.output_map);
    if let Some(report) = settings.report_filename.as_ref() {
        info!("\tCoverage report: {report:?}");
    }

    if settings.output_map == settings.reference_filename || settings.output_map == settings.mutation_filename {
        bail!("--output-map cannot be the same as an input file");
    }
    Ok(settings)
}
