/// Coverage summary of a mutation table against a gene map
pub mod coverage_report;
/// Error types shared by the loaders and the map builder
pub mod errors;
/// Loading of the NCBI gene_info reference
pub mod gene_info;
/// The combined (chromosome, symbol) -> Entrez ID map
pub mod gene_map;
/// Options controlling how the map is built
pub mod mapping_options;
/// Loading of the mutation table
pub mod mutations;
