
use itertools::Itertools;
use log::{debug, info};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::data_types::coverage_report::{CoverageReport, FailedChromosome, FailedPair};
use crate::data_types::gene_map::GeneMap;
use crate::data_types::mutations::MutationTable;

/// Compares the mutation table against the map and collects everything that fails to join.
/// Nothing is modified.
/// # Arguments
/// * `gene_map` - the (chromosome, symbol) map
/// * `mutations` - the mutation table
pub fn check_coverage(gene_map: &GeneMap, mutations: &MutationTable) -> CoverageReport {
    let mapped_pairs = gene_map.pairs();
    let mapped_chroms = gene_map.chromosomes();

    let failed_pairs: Vec<FailedPair> = mutations.records().iter()
        .map(|m| (m.chrom(), m.gene_symbol()))
        .filter(|pair| !mapped_pairs.contains(pair))
        .unique()
        .sorted()
        .map(|(chr, gene)| FailedPair { chr: chr.to_string(), gene: gene.to_string() })
        .collect();
    debug!("Found {} distinct unmapped (chr, gene) pairs", failed_pairs.len());

    // chromosomes where not a single symbol maps, usually unplaced contigs
    let failed_chroms: HashSet<&str> = mutations.records().iter()
        .map(|m| m.chrom())
        .filter(|c| !mapped_chroms.contains(c))
        .collect();

    let mut chrom_counts: HashMap<&str, usize> = Default::default();
    for mutation in mutations.records().iter() {
        if failed_chroms.contains(mutation.chrom()) {
            *chrom_counts.entry(mutation.chrom()).or_insert(0) += 1;
        }
    }
    let failed_chromosomes: Vec<FailedChromosome> = chrom_counts.into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(chr, mutation_count)| FailedChromosome { chr: chr.to_string(), mutation_count })
        .collect();

    CoverageReport::new(mutations.len(), failed_pairs, failed_chromosomes)
}

/// Logs the summary line followed by the per-chromosome breakdown.
pub fn log_coverage(report: &CoverageReport) {
    info!("{}", report.summary());
    if report.failed_chromosomes().is_empty() {
        info!("All mutation chromosomes have at least one mapping.");
    } else {
        let total: usize = report.failed_chromosomes().iter().map(|fc| fc.mutation_count).sum();
        info!("{total} mutations are on {} chromosomes with no mappings:", report.failed_chromosomes().len());
        for fc in report.failed_chromosomes().iter() {
            info!("\t{}\t{}", fc.chr, fc.mutation_count);
        }
    }
    for fp in report.failed_pairs().iter() {
        debug!("Unmapped: {}\t{}", fp.chr, fp.gene);
    }
}
