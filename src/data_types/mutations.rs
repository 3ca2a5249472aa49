
use log::info;
use std::io::Read;
use std::path::Path;

use crate::data_types::errors::{check_columns, MappingError};
use crate::util::file_io::{open_reader, tsv_reader};

/// Column holding the chromosome in the mutation table
pub const MUTATION_CHROM_COLUMN: &str = "chr";
/// Column holding the gene symbol in the mutation table
pub const MUTATION_GENE_COLUMN: &str = "gene";

/// One mutation row; every field is kept as-is so the row can be written back out
#[derive(Clone, Debug, PartialEq)]
pub struct MutationRecord {
    chrom: String,
    gene_symbol: String,
    fields: Vec<String>
}

impl MutationRecord {
    // getters
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn gene_symbol(&self) -> &str {
        &self.gene_symbol
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

/// A fully loaded mutation table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationTable {
    headers: Vec<String>,
    records: Vec<MutationRecord>
}

impl MutationTable {
    /// Loads a mutation table; `.bz2` and `.gz` are decompressed based on the extension.
    /// # Arguments
    /// * `filename` - the mutation TSV
    /// # Errors
    /// * if the file cannot be opened or parsed
    /// * if the `chr` or `gene` columns are missing
    pub fn load(filename: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Loading mutations from {filename:?}...");
        let reader = open_reader(filename)?;
        let table = Self::read(reader)?;
        info!("\tLoaded {} mutations", table.len());
        Ok(table)
    }

    /// Parses a mutation table from any reader.
    /// The first column is a row label and has no special meaning here.
    pub fn read<R: Read>(reader: R) -> Result<Self, Box<dyn std::error::Error>> {
        let mut csv_reader = tsv_reader(reader);
        let header_record = csv_reader.headers()?.clone();
        check_columns(&header_record, &[MUTATION_CHROM_COLUMN, MUTATION_GENE_COLUMN], "mutation")?;

        let headers: Vec<String> = header_record.iter().map(|h| h.to_string()).collect();
        let chrom_index = column_index(&headers, MUTATION_CHROM_COLUMN)?;
        let gene_index = column_index(&headers, MUTATION_GENE_COLUMN)?;

        let mut records: Vec<MutationRecord> = vec![];
        for result in csv_reader.records() {
            let record = result?;
            let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
            records.push(MutationRecord {
                chrom: fields[chrom_index].clone(),
                gene_symbol: fields[gene_index].clone(),
                fields
            });
        }

        Ok(Self {
            headers,
            records
        })
    }

    // getters
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Position of a column, first match wins
fn column_index(headers: &[String], column: &str) -> Result<usize, MappingError> {
    headers.iter()
        .position(|h| h == column)
        .ok_or(MappingError::MissingColumn {
            column: column.to_string(),
            table: "mutation".to_string()
        })
}
