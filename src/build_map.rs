
use log::{debug, info};
use std::path::Path;

use crate::coverage::{check_coverage, log_coverage};
use crate::data_types::coverage_report::CoverageReport;
use crate::data_types::errors::MappingError;
use crate::data_types::gene_info::load_gene_info;
use crate::data_types::gene_map::GeneMap;
use crate::data_types::mapping_options::MappingOptions;
use crate::data_types::mutations::MutationTable;
use crate::util::file_io::fetch_cached;

// NCBI gene_info docs: https://ftp.ncbi.nlm.nih.gov/gene/DATA/README
// The FTP path ftp://ftp.ncbi.nih.gov/gene/DATA/GENE_INFO/ is mirrored over HTTPS at the same location.

/// Makes sure the reference is available locally, downloading it if needed.
/// # Arguments
/// * `options` - provides the download URL
/// * `reference_filename` - the local cache path
/// # Errors
/// * if the download fails
pub fn fetch_reference(options: &MappingOptions, reference_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Checking for gene reference...");
    let downloaded = fetch_cached(&options.reference_url, reference_filename)?;
    if downloaded {
        info!("\tGene reference saved to {reference_filename:?}");
    }
    Ok(())
}

/// Loads the reference and builds the combined symbol map, before any cleanup.
/// # Arguments
/// * `reference_filename` - gene_info file, plain or gzip
/// * `options` - organism and chromosome prefix
/// # Errors
/// * if the reference fails to load
/// * if the resulting map is not unique
pub fn build_gene_map(reference_filename: &Path, options: &MappingOptions) -> Result<GeneMap, Box<dyn std::error::Error>> {
    let records = load_gene_info(reference_filename, options.tax_id)?;
    info!("Building gene map...");
    let gene_map = GeneMap::build(&records, &options.chromosome_prefix)?;
    Ok(gene_map)
}

/// Drops the sentinel symbols and checks uniqueness one more time before export.
/// Returns the number of entries removed.
/// # Errors
/// * `MappingError::DuplicateKey` if the map is not unique
pub fn finalize_gene_map(gene_map: &mut GeneMap, options: &MappingOptions) -> Result<usize, MappingError> {
    let removed = gene_map.remove_symbols(&options.sentinel_symbols);
    info!("Removed {removed} entries with sentinel symbols {:?}", options.sentinel_symbols);
    gene_map.validate()?;
    debug!("Final gene map passed uniqueness check with {} entries", gene_map.len());
    Ok(removed)
}

/// This is the primary call that runs everything after the reference is available:
/// build the map, check the mutation coverage against it, then clean it up for export.
/// Coverage is measured before the sentinel symbols are removed.
/// # Arguments
/// * `reference_filename` - gene_info file, plain or gzip
/// * `mutation_filename` - mutation table, plain, gzip, or bzip2
/// * `options` - build options
/// # Errors
/// * if either input fails to load or is missing a column
/// * if the map fails the uniqueness check at any point
pub fn build_and_check(reference_filename: &Path, mutation_filename: &Path, options: &MappingOptions) -> Result<(GeneMap, CoverageReport), Box<dyn std::error::Error>> {
    let mut gene_map = build_gene_map(reference_filename, options)?;

    let mutations = MutationTable::load(mutation_filename)?;
    info!("Checking mutation coverage...");
    let report = check_coverage(&gene_map, &mutations);
    log_coverage(&report);

    finalize_gene_map(&mut gene_map, options)?;
    Ok((gene_map, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data_types::gene_map::GeneMapEntry;

    #[test]
    fn test_build_and_check() {
        let options = MappingOptions::default();
        let (gene_map, report) = build_and_check(
            Path::new("test_data/gene_info_small.tsv.gz"),
            Path::new("test_data/mutations_small.tsv.bz2"),
            &options
        ).unwrap();

        let expected = GeneMap::load(Path::new("test_data/gene_map_small.tsv")).unwrap();
        assert_eq!(gene_map, expected);
        assert_eq!(report.failed_count(), 3);
        assert_eq!(report.total_mutations(), 10);
    }

    #[test]
    fn test_export_matches_expected() {
        let options = MappingOptions::default();
        let mut gene_map = build_gene_map(Path::new("test_data/gene_info_small.tsv"), &options).unwrap();
        assert!(gene_map.entries().contains(&GeneMapEntry::new(7504, "chrX", "NA")));
        assert_eq!(finalize_gene_map(&mut gene_map, &options).unwrap(), 2);

        let temp_dir = tempfile::tempdir().unwrap();
        let filename = temp_dir.path().join("map.tsv");
        gene_map.save(&filename).unwrap();
        assert_eq!(
            std::fs::read_to_string(&filename).unwrap(),
            std::fs::read_to_string("test_data/gene_map_small.tsv").unwrap()
        );
    }

    #[test]
    fn test_coverage_before_cleanup() {
        // sentinel symbols still count as mapped during the coverage check, then get removed
        let temp_dir = tempfile::tempdir().unwrap();
        let mutation_fn = temp_dir.path().join("mutations.tsv");
        std::fs::write(&mutation_fn, "sample\tchr\tgene\nS1\tchrX\tNA\nS2\tchr3\tNaN\n").unwrap();

        let (gene_map, report) = build_and_check(
            Path::new("test_data/gene_info_small.tsv"),
            &mutation_fn,
            &MappingOptions::default()
        ).unwrap();
        assert_eq!(report.total_mutations(), 2);
        assert_eq!(report.failed_count(), 0);
        assert!(gene_map.entries().iter().all(|e| e.symbol() != "NA" && e.symbol() != "NaN"));
        assert_eq!(gene_map.lookup().get("chrX", "NA"), None);
    }

    #[test]
    fn test_fetch_reference_cached() {
        let options = MappingOptions {
            reference_url: "http://127.0.0.1:1/Homo_sapiens.gene_info.gz".to_string(),
            ..Default::default()
        };
        fetch_reference(&options, Path::new("test_data/gene_info_small.tsv.gz")).unwrap();
    }

    #[test]
    fn test_missing_mutation_column() {
        let err = build_and_check(
            Path::new("test_data/gene_info_small.tsv"),
            Path::new("test_data/mutations_missing_gene.tsv"),
            &MappingOptions::default()
        ).unwrap_err();
        assert!(matches!(err.downcast_ref::<MappingError>(), Some(MappingError::MissingColumn { .. })));
    }
}
