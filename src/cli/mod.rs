/// the main CLI module
pub mod core;
/// The coverage CLI subcommand for checking a mutation table against an existing map
pub mod coverage;
/// The build CLI subcommand for constructing the gene map from the NCBI reference
pub mod map_build;
/// The relabel CLI subcommand for adding Entrez IDs to a mutation table
pub mod relabel;
