
use log::{debug, info};
use std::io::Write;
use std::path::Path;

use crate::data_types::gene_map::GeneMap;
use crate::data_types::mutations::MutationTable;
use crate::util::file_io::{open_writer, tsv_writer};

/// Label for the appended identifier column
pub const ENTREZ_COLUMN: &str = "entrez_id";

/// Counts from a relabel pass
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RelabelSummary {
    pub mapped: usize,
    pub unmapped: usize
}

/// Writes the mutation table to a file with an `entrez_id` column appended.
/// # Arguments
/// * `gene_map` - the (chromosome, symbol) map
/// * `mutations` - the rows to relabel
/// * `out_filename` - destination, gzip if it ends with .gz
/// # Errors
/// * if the output cannot be written
pub fn save_relabeled(gene_map: &GeneMap, mutations: &MutationTable, out_filename: &Path) -> Result<RelabelSummary, Box<dyn std::error::Error>> {
    let writer = open_writer(out_filename)?;
    let summary = write_relabeled(gene_map, mutations, writer)?;
    info!("\tRelabeled {} mutations, {} left without an identifier", summary.mapped, summary.unmapped);
    Ok(summary)
}

/// Writes every mutation row with its mapped identifier as the last column.
/// Unmapped rows get an empty value; that is not an error.
pub fn write_relabeled<W: Write>(gene_map: &GeneMap, mutations: &MutationTable, writer: W) -> Result<RelabelSummary, Box<dyn std::error::Error>> {
    let lookup = gene_map.lookup();
    let mut csv_writer = tsv_writer(writer);
    let mut summary = RelabelSummary::default();

    let mut header: Vec<&str> = mutations.headers().iter().map(|h| h.as_str()).collect();
    header.push(ENTREZ_COLUMN);
    csv_writer.write_record(&header)?;

    for mutation in mutations.records().iter() {
        let entrez_label: String = match lookup.get(mutation.chrom(), mutation.gene_symbol()) {
            Some(entrez_id) => {
                summary.mapped += 1;
                entrez_id.to_string()
            },
            None => {
                summary.unmapped += 1;
                debug!("No identifier for {}:{}", mutation.chrom(), mutation.gene_symbol());
                String::new()
            }
        };
        let mut row: Vec<&str> = mutation.fields().iter().map(|f| f.as_str()).collect();
        row.push(&entrez_label);
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(summary)
}
