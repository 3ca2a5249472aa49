use serde::{Deserialize, Serialize};

/// NCBI taxonomy identifier for Homo sapiens
pub const HUMAN_TAX_ID: u64 = 9606;

/// HTTPS mirror of the NCBI FTP gene_info dump for mammals, human subset
pub const GENE_INFO_URL: &str = "https://ftp.ncbi.nlm.nih.gov/gene/DATA/GENE_INFO/Mammalia/Homo_sapiens.gene_info.gz";

/// Options for building a gene map
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Only reference rows from this organism are kept
    pub tax_id: u64,
    /// Prepended to every reference chromosome so it matches the mutation notation
    pub chromosome_prefix: String,
    /// Symbols removed from the final map; these come from blank synonym fields that were read as values upstream
    pub sentinel_symbols: Vec<String>,
    /// Where to fetch the reference from when it is not cached
    pub reference_url: String
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            tax_id: HUMAN_TAX_ID,
            chromosome_prefix: "chr".to_string(),
            // "NaN" is from entrez 11280 and "NA" from 7504
            sentinel_symbols: vec!["NaN".to_string(), "NA".to_string()],
            reference_url: GENE_INFO_URL.to_string()
        }
    }
}
