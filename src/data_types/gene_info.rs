
use log::{debug, info, trace};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::data_types::errors::check_columns;
use crate::util::file_io::{open_reader, tsv_reader};

// column labels in the NCBI gene_info dump
pub const TAX_ID_COLUMN: &str = "#tax_id";
pub const GENE_ID_COLUMN: &str = "GeneID";
pub const CHROMOSOME_COLUMN: &str = "chromosome";
pub const SYMBOL_COLUMN: &str = "Symbol";
pub const SYNONYMS_COLUMN: &str = "Synonyms";

/// NCBI uses this for an empty list
pub const EMPTY_FIELD: &str = "-";
/// Separator inside the Synonyms column
pub const SYNONYM_DELIMITER: char = '|';

/// One row of the raw dump, only the columns we care about
#[derive(Debug, Deserialize)]
struct RawGeneInfo {
    #[serde(rename = "#tax_id")]
    tax_id: u64,
    #[serde(rename = "GeneID")]
    entrez_id: u64,
    #[serde(rename = "chromosome")]
    chrom: String,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Synonyms")]
    synonyms: String
}

/// A single gene from the reference, after organism filtering
#[derive(Clone, Debug, PartialEq)]
pub struct GeneInfoRecord {
    /// Entrez gene ID
    entrez_id: u64,
    /// Chromosome as written by NCBI, e.g. "1" or "X"
    chrom: String,
    /// The symbol of record
    symbol: String,
    /// Alternate symbols in file order
    synonyms: Vec<String>
}

impl GeneInfoRecord {
    /// Constructor
    /// # Arguments
    /// * `entrez_id` - the gene identifier
    /// * `chrom` - unprefixed chromosome label
    /// * `symbol` - primary symbol
    /// * `synonyms` - alternate symbols, empty entries are ignored downstream
    pub fn new(entrez_id: u64, chrom: &str, symbol: &str, synonyms: &[&str]) -> Self {
        Self {
            entrez_id,
            chrom: chrom.to_string(),
            symbol: symbol.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect()
        }
    }

    // getters
    pub fn entrez_id(&self) -> u64 {
        self.entrez_id
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }
}

/// Splits a Synonyms field into the individual symbols, dropping empty entries and the "-" placeholder.
/// # Arguments
/// * `field` - raw pipe-delimited value
pub fn split_synonyms(field: &str) -> Vec<String> {
    field.split(SYNONYM_DELIMITER)
        .filter(|s| !s.is_empty() && *s != EMPTY_FIELD)
        .map(|s| s.to_string())
        .collect()
}

/// Loads the gene reference from a file, gzip is detected from the extension.
/// # Arguments
/// * `filename` - path to a gene_info file
/// * `tax_id` - organism to keep
/// # Errors
/// * if the file cannot be opened
/// * see `read_gene_info(...)`
pub fn load_gene_info(filename: &Path, tax_id: u64) -> Result<Vec<GeneInfoRecord>, Box<dyn std::error::Error>> {
    info!("Loading gene reference from {filename:?}...");
    let reader = open_reader(filename)?;
    read_gene_info(reader, tax_id)
}

/// Parses a gene_info table, keeping only rows for the given organism.
/// File order is preserved.
/// # Arguments
/// * `reader` - the table, already decompressed
/// * `tax_id` - organism to keep
/// # Errors
/// * if any of the required columns are missing
/// * if a row fails to parse, for example a non-numeric GeneID
pub fn read_gene_info<R: Read>(reader: R, tax_id: u64) -> Result<Vec<GeneInfoRecord>, Box<dyn std::error::Error>> {
    let mut csv_reader = tsv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    check_columns(
        &headers,
        &[TAX_ID_COLUMN, GENE_ID_COLUMN, CHROMOSOME_COLUMN, SYMBOL_COLUMN, SYNONYMS_COLUMN],
        "gene reference"
    )?;

    let mut records: Vec<GeneInfoRecord> = vec![];
    let mut skipped: usize = 0;
    for result in csv_reader.deserialize() {
        let raw: RawGeneInfo = result?;
        if raw.tax_id != tax_id {
            trace!("Skipping {} ({}) from tax_id {}", raw.symbol, raw.entrez_id, raw.tax_id);
            skipped += 1;
            continue;
        }

        records.push(GeneInfoRecord {
            entrez_id: raw.entrez_id,
            chrom: raw.chrom,
            symbol: raw.symbol,
            synonyms: split_synonyms(&raw.synonyms)
        });
    }

    debug!("Skipped {skipped} reference rows from other organisms");
    info!("\tLoaded {} reference genes for tax_id {tax_id}", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data_types::errors::MappingError;

    #[test]
    fn test_split_synonyms() {
        assert_eq!(split_synonyms("A1B|ABG|GAB"), vec!["A1B", "ABG", "GAB"]);
        assert!(split_synonyms("-").is_empty());
        assert!(split_synonyms("").is_empty());
        assert_eq!(split_synonyms("X||Y|"), vec!["X", "Y"]);
        // whitespace is part of the symbol
        assert_eq!(split_synonyms(" X|X"), vec![" X", "X"]);
    }

    #[test]
    fn test_load_gene_info() {
        let records = load_gene_info(Path::new("test_data/gene_info_small.tsv"), 9606).unwrap();

        // the mouse entry is dropped
        assert_eq!(records.len(), 9);
        assert!(records.iter().all(|r| r.entrez_id() != 11287));

        // order is preserved
        assert_eq!(records[0], GeneInfoRecord::new(1, "19", "A1BG", &["A1B", "ABG", "GAB", "HYST2477"]));
        assert_eq!(records[2], GeneInfoRecord::new(7504, "X", "XK", &["KX", "NA", "XKR1"]));
        assert_eq!(records[4], GeneInfoRecord::new(100, "1", "GENEA", &[]));
        assert_eq!(records[8].chrom(), "MT");

        // gzip loads the same thing
        let gz_records = load_gene_info(Path::new("test_data/gene_info_small.tsv.gz"), 9606).unwrap();
        assert_eq!(records, gz_records);
    }

    #[test]
    fn test_other_organism() {
        let records = load_gene_info(Path::new("test_data/gene_info_small.tsv"), 10090).unwrap();
        assert_eq!(records, vec![GeneInfoRecord::new(11287, "6", "Pzp", &["A1m", "A2m"])]);
    }

    #[test]
    fn test_missing_column() {
        let err = load_gene_info(Path::new("test_data/gene_info_missing_synonyms.tsv"), 9606).unwrap_err();
        let mapping_err = err.downcast_ref::<MappingError>().unwrap();
        assert_eq!(mapping_err, &MappingError::MissingColumn {
            column: SYNONYMS_COLUMN.to_string(),
            table: "gene reference".to_string()
        });
    }

    #[test]
    fn test_bad_gene_id() {
        let data = "#tax_id\tGeneID\tSymbol\tSynonyms\tchromosome\n9606\tnot_a_number\tA1BG\t-\t19\n";
        assert!(read_gene_info(data.as_bytes(), 9606).is_err());
    }
}
