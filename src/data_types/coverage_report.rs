use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::core::FULL_VERSION;

/// A mutation (chromosome, symbol) pair with no map entry
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct FailedPair {
    pub chr: String,
    pub gene: String
}

/// A chromosome with no map entries at all, and how many mutations sit on it
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FailedChromosome {
    pub chr: String,
    pub mutation_count: usize
}

/// Summary of how well a mutation table joins against a gene map
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CoverageReport {
    /// Version of the tool that produced this report
    entrezmap_version: String,
    /// When the report was generated
    build_time: DateTime<Utc>,
    /// Number of mutation rows, duplicates included
    total_mutations: usize,
    /// Distinct (chromosome, gene) pairs that did not map, sorted
    failed_pairs: Vec<FailedPair>,
    /// Chromosomes with no mappings, most mutations first
    failed_chromosomes: Vec<FailedChromosome>
}

impl CoverageReport {
    /// Constructor, stamps the current version and time
    pub fn new(total_mutations: usize, failed_pairs: Vec<FailedPair>, failed_chromosomes: Vec<FailedChromosome>) -> Self {
        Self {
            entrezmap_version: FULL_VERSION.clone(),
            build_time: Utc::now(),
            total_mutations,
            failed_pairs,
            failed_chromosomes
        }
    }

    /// Number of distinct failed pairs
    pub fn failed_count(&self) -> usize {
        self.failed_pairs.len()
    }

    /// Failed distinct pairs over total mutation rows.
    /// The denominator counts rows, not distinct pairs.
    /// Returns 0.0 for an empty mutation table.
    pub fn failure_rate(&self) -> f64 {
        if self.total_mutations == 0 {
            0.0
        } else {
            self.failed_count() as f64 / self.total_mutations as f64
        }
    }

    /// Summary line for the log
    pub fn summary(&self) -> String {
        format!(
            "{} of {} mutations failed to map based on chromosome and either primary or alternate gene symbol. ({:.2}% of mutations.)",
            self.failed_count(),
            self.total_mutations,
            100.0 * self.failure_rate()
        )
    }

    // getters
    pub fn total_mutations(&self) -> usize {
        self.total_mutations
    }

    pub fn failed_pairs(&self) -> &[FailedPair] {
        &self.failed_pairs
    }

    pub fn failed_chromosomes(&self) -> &[FailedChromosome] {
        &self.failed_chromosomes
    }
}
