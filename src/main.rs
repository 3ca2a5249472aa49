
use log::{LevelFilter, error, info};
use std::path::Path;

use entrezmap::cli::core::{Commands, get_cli};
use entrezmap::cli::coverage::{CoverageSettings, check_coverage_settings};
use entrezmap::cli::map_build::{BuildSettings, check_build_settings};
use entrezmap::cli::relabel::{RelabelSettings, check_relabel_settings};
use entrezmap::data_types::coverage_report::CoverageReport;
use entrezmap::data_types::errors::exit_code;
use entrezmap::data_types::gene_map::GeneMap;
use entrezmap::data_types::mapping_options::MappingOptions;
use entrezmap::data_types::mutations::MutationTable;
use entrezmap::util::file_io::{load_json, save_json};

/// Sets up the logger at a level derived from the number of -v flags
/// # Arguments
/// * `verbosity` - 0 is Info, 1 is Debug, anything higher is Trace
fn setup_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Writes the coverage report if one was requested
fn save_report(report: &CoverageReport, opt_filename: Option<&Path>) {
    if let Some(filename) = opt_filename {
        info!("Saving coverage report to {filename:?}");
        if let Err(e) = save_json(report, filename) {
            error!("Error while writing coverage report to file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }
}

/// This will run the "build" mode of the tool
/// # Arguments
/// * `settings` - the BuildSettings object
fn run_build(settings: BuildSettings) {
    // immediately setup logging first
    setup_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: BuildSettings = match check_build_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    // build options are tiny, load them before anything slow
    let mut build_options: MappingOptions = if let Some(bo_filename) = cli_settings.build_options.as_ref() {
        match load_json(bo_filename) {
            Ok(bo) => bo,
            Err(e) => {
                error!("Error while loading build options: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }
    } else {
        MappingOptions::default()
    };
    if let Some(url) = cli_settings.reference_url.as_ref() {
        build_options.reference_url = url.clone();
    }
    info!("Build options: {build_options:#?}");

    if let Err(e) = entrezmap::build_map::fetch_reference(&build_options, &cli_settings.reference_filename) {
        error!("Error while downloading gene reference: {e}");
        std::process::exit(exitcode::IOERR);
    }

    // mutations have to exist locally, they are never downloaded
    entrezmap::cli::core::check_required_filename(&cli_settings.mutation_filename, "Mutation file");

    // all the work
    let (gene_map, report) = match entrezmap::build_map::build_and_check(
        &cli_settings.reference_filename,
        &cli_settings.mutation_filename,
        &build_options
    ) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while building gene map: {e}");
            std::process::exit(exit_code(e.as_ref()));
        }
    };

    save_report(&report, cli_settings.report_filename.as_deref());

    info!("Saving gene map to {:?}", cli_settings.output_map);
    if let Err(e) = gene_map.save(&cli_settings.output_map) {
        error!("Error while writing gene map to file: {e}");
        std::process::exit(exitcode::IOERR);
    }
}

/// Loads the map and mutation table shared by the coverage and relabel modes, exiting on failure
fn load_inputs(gene_map_filename: &Path, mutation_filename: &Path) -> (GeneMap, MutationTable) {
    let gene_map: GeneMap = match GeneMap::load(gene_map_filename) {
        Ok(gm) => gm,
        Err(e) => {
            error!("Error while loading gene map: {e}");
            std::process::exit(exit_code(e.as_ref()));
        }
    };

    let mutations: MutationTable = match MutationTable::load(mutation_filename) {
        Ok(m) => m,
        Err(e) => {
            error!("Error while loading mutation file: {e}");
            std::process::exit(exit_code(e.as_ref()));
        }
    };

    (gene_map, mutations)
}

/// This will run the "coverage" mode of the tool
/// # Arguments
/// * `settings` - the CoverageSettings object
fn run_coverage(settings: CoverageSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: CoverageSettings = check_coverage_settings(settings);

    let (gene_map, mutations) = load_inputs(&cli_settings.gene_map, &cli_settings.mutation_filename);
    let report = entrezmap::coverage::check_coverage(&gene_map, &mutations);
    entrezmap::coverage::log_coverage(&report);
    save_report(&report, cli_settings.report_filename.as_deref());
}

/// This will run the "relabel" mode of the tool
/// # Arguments
/// * `settings` - the RelabelSettings object
fn run_relabel(settings: RelabelSettings) {
    setup_logging(settings.verbosity);
    let cli_settings: RelabelSettings = match check_relabel_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    let (gene_map, mutations) = load_inputs(&cli_settings.gene_map, &cli_settings.mutation_filename);

    info!("Saving relabeled mutations to {:?}", cli_settings.output_filename);
    if let Err(e) = entrezmap::relabel::save_relabeled(&gene_map, &mutations, &cli_settings.output_filename) {
        error!("Error while writing relabeled mutations to file: {e}");
        std::process::exit(exitcode::IOERR);
    }
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Build(settings) => {
            run_build(*settings);
        },
        Commands::Coverage(settings) => {
            run_coverage(*settings);
        },
        Commands::Relabel(settings) => {
            run_relabel(*settings);
        }
    }

    info!("Process finished successfully.");
}
