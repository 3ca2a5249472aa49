/// Contains the end-to-end gene map construction
pub mod build_map;
/// Contains all the CLI related functionality
pub mod cli;
/// Contains the mutation coverage check against a gene map
pub mod coverage;
/// Contains the tables and map types shared across the tooling
pub mod data_types;
/// Contains functionality for adding Entrez IDs to a mutation table
pub mod relabel;
/// Contains generic utilities that are handy wrappers
pub mod util;
