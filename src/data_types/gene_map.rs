
use log::{debug, info, trace};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

use crate::data_types::errors::{check_columns, MappingError};
use crate::data_types::gene_info::GeneInfoRecord;
use crate::util::file_io::{open_reader, open_writer, tsv_reader, tsv_writer};

/// Exported column order
pub const GENE_MAP_COLUMNS: [&str; 3] = ["entrez_id", "chr", "symbol"];

/// A single (chromosome, symbol) -> identifier row of the exported map
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct GeneMapEntry {
    entrez_id: u64,
    #[serde(rename = "chr")]
    chrom: String,
    symbol: String
}

impl GeneMapEntry {
    pub fn new(entrez_id: u64, chrom: &str, symbol: &str) -> Self {
        Self {
            entrez_id,
            chrom: chrom.to_string(),
            symbol: symbol.to_string()
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

    fn key(&self) -> (&str, &str) {
        (&self.chrom, &self.symbol)
    }
}

/// One alternate symbol pulled out of a reference record
#[derive(Clone, Debug, PartialEq)]
pub struct AlternateSymbol {
    entrez_id: u64,
    chrom: String,
    alt_symbol: String
}

impl AlternateSymbol {
    pub fn alt_symbol(&self) -> &str {
        &self.alt_symbol
    }
}

impl From<AlternateSymbol> for GeneMapEntry {
    fn from(alt: AlternateSymbol) -> Self {
        Self {
            entrez_id: alt.entrez_id,
            chrom: alt.chrom,
            symbol: alt.alt_symbol
        }
    }
}

/// Primary mapping, one row per record in reference order.
pub fn primary_entries(records: &[GeneInfoRecord]) -> Vec<GeneMapEntry> {
    records.iter()
        .map(|r| GeneMapEntry::new(r.entrez_id(), r.chrom(), r.symbol()))
        .collect()
}

/// Explodes every record's synonyms into one row each, keeping the parent identifier and chromosome.
pub fn alternate_symbols(records: &[GeneInfoRecord]) -> Vec<AlternateSymbol> {
    records.iter()
        .flat_map(|r| {
            r.synonyms().iter()
                .filter(|s| !s.is_empty())
                .map(move |s| AlternateSymbol {
                    entrez_id: r.entrez_id(),
                    chrom: r.chrom().to_string(),
                    alt_symbol: s.clone()
                })
        })
        .collect()
}

/// Removes every alternate whose (chromosome, symbol) shows up more than once among the alternates.
/// All copies are dropped.
pub fn drop_ambiguous(alternates: Vec<AlternateSymbol>) -> Vec<AlternateSymbol> {
    let unique_flags: Vec<bool> = {
        let mut counts: HashMap<(&str, &str), usize> = Default::default();
        for alt in alternates.iter() {
            *counts.entry((alt.chrom.as_str(), alt.alt_symbol.as_str())).or_insert(0) += 1;
        }
        alternates.iter()
            .map(|alt| counts[&(alt.chrom.as_str(), alt.alt_symbol.as_str())] == 1)
            .collect()
    };

    alternates.into_iter()
        .zip(unique_flags)
        .filter_map(|(alt, is_unique)| {
            if !is_unique {
                trace!("Dropping ambiguous alternate {}:{} -> {}", alt.chrom, alt.alt_symbol, alt.entrez_id);
            }
            is_unique.then_some(alt)
        })
        .collect()
}

/// Order-preserving dedup on (chromosome, symbol), the first occurrence wins.
pub fn dedup_keep_first(entries: Vec<GeneMapEntry>) -> Vec<GeneMapEntry> {
    let mut seen: HashSet<(String, String)> = Default::default();
    entries.into_iter()
        .filter(|e| {
            let first = seen.insert((e.chrom.clone(), e.symbol.clone()));
            if !first {
                trace!("Dropping shadowed mapping {}:{} -> {}", e.chrom, e.symbol, e.entrez_id);
            }
            first
        })
        .collect()
}

/// The combined primary + alternate symbol map.
/// (chromosome, symbol) is unique once built; `validate()` checks it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneMap {
    entries: Vec<GeneMapEntry>
}

impl GeneMap {
    /// Wraps a list of entries without any checks, mostly for tests and loading.
    pub fn from_entries(entries: Vec<GeneMapEntry>) -> Self {
        Self {
            entries
        }
    }

    /// Builds the map from reference records.
    /// Primary symbols are listed before alternates, so on a (chromosome, symbol) collision the primary always wins.
    /// Alternates that collide among themselves were already removed, so they never compete with each other here.
    /// # Arguments
    /// * `records` - reference records, already filtered to one organism
    /// * `chrom_prefix` - prepended to every chromosome, e.g. "chr"
    /// # Errors
    /// * `MappingError::DuplicateKey` if the result is somehow not unique
    pub fn build(records: &[GeneInfoRecord], chrom_prefix: &str) -> Result<Self, MappingError> {
        let primary = primary_entries(records);
        let alternates = alternate_symbols(records);
        let num_alternates = alternates.len();
        let alternates = drop_ambiguous(alternates);
        debug!("Primary symbols: {}", primary.len());
        debug!("Alternate symbols: {num_alternates} ({} ambiguous dropped)", num_alternates - alternates.len());

        let combined: Vec<GeneMapEntry> = primary.into_iter()
            .chain(alternates.into_iter().map(GeneMapEntry::from))
            .collect();
        let num_combined = combined.len();
        let mut entries = dedup_keep_first(combined);
        debug!("Combined symbols: {} ({} duplicates collapsed)", entries.len(), num_combined - entries.len());

        for entry in entries.iter_mut() {
            entry.chrom = format!("{chrom_prefix}{}", entry.chrom);
        }

        let gene_map = Self { entries };
        gene_map.validate()?;
        info!("\tBuilt gene map with {} entries", gene_map.len());
        Ok(gene_map)
    }

    /// Checks that no two entries share a (chromosome, symbol) pair.
    /// # Errors
    /// * `MappingError::DuplicateKey` for the first repeated pair
    pub fn validate(&self) -> Result<(), MappingError> {
        let mut seen: HashSet<(&str, &str)> = Default::default();
        for entry in self.entries.iter() {
            if !seen.insert(entry.key()) {
                return Err(MappingError::DuplicateKey {
                    chrom: entry.chrom.clone(),
                    symbol: entry.symbol.clone()
                });
            }
        }
        Ok(())
    }

    /// Removes every entry whose symbol matches one of the provided values, regardless of identifier.
    /// Returns the number of entries removed.
    /// # Arguments
    /// * `symbols` - exact symbols to drop
    pub fn remove_symbols(&mut self, symbols: &[String]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| {
            let keep = !symbols.iter().any(|s| s == &e.symbol);
            if !keep {
                debug!("Removing sentinel symbol {}:{} -> {}", e.chrom, e.symbol, e.entrez_id);
            }
            keep
        });
        before - self.entries.len()
    }

    /// All mapped (chromosome, symbol) pairs
    pub fn pairs(&self) -> HashSet<(&str, &str)> {
        self.entries.iter().map(|e| e.key()).collect()
    }

    /// All chromosomes with at least one mapping
    pub fn chromosomes(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.chrom()).collect()
    }

    /// Builds a chromosome -> symbol -> identifier index for lookups.
    pub fn lookup(&self) -> GeneLookup<'_> {
        let mut index: HashMap<&str, HashMap<&str, u64>> = Default::default();
        for entry in self.entries.iter() {
            index.entry(entry.chrom())
                .or_default()
                .insert(entry.symbol(), entry.entrez_id);
        }
        GeneLookup { index }
    }

    /// Writes the map as a TSV with columns entrez_id, chr, symbol.
    /// # Arguments
    /// * `out_filename` - destination, gzip if it ends with .gz
    /// # Errors
    /// * if the file cannot be written
    pub fn save(&self, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let writer = open_writer(out_filename)?;
        self.write(writer)
    }

    /// Writes the map as a TSV to any writer.
    pub fn write<W: Write>(&self, writer: W) -> Result<(), Box<dyn std::error::Error>> {
        let mut csv_writer = tsv_writer(writer);
        csv_writer.write_record(GENE_MAP_COLUMNS)?;
        for entry in self.entries.iter() {
            csv_writer.serialize(entry)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Loads a previously saved map and checks uniqueness.
    /// # Arguments
    /// * `filename` - the map TSV, gzip is detected from the extension
    /// # Errors
    /// * if the file cannot be read or has missing columns
    /// * if the loaded map has duplicate pairs
    pub fn load(filename: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Loading gene map from {filename:?}...");
        let reader = open_reader(filename)?;
        let gene_map = Self::read(reader)?;
        info!("\tLoaded {} gene map entries", gene_map.len());
        Ok(gene_map)
    }

    /// Reads a map TSV from any reader and checks uniqueness.
    pub fn read<R: Read>(reader: R) -> Result<Self, Box<dyn std::error::Error>> {
        let mut csv_reader = tsv_reader(reader);
        let headers = csv_reader.headers()?.clone();
        check_columns(&headers, &GENE_MAP_COLUMNS, "gene map")?;

        let mut entries: Vec<GeneMapEntry> = vec![];
        for result in csv_reader.deserialize() {
            entries.push(result?);
        }
        let gene_map = Self { entries };
        gene_map.validate()?;
        Ok(gene_map)
    }

    // getters
    pub fn entries(&self) -> &[GeneMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Borrowed index over a `GeneMap`
pub struct GeneLookup<'a> {
    index: HashMap<&'a str, HashMap<&'a str, u64>>
}

impl GeneLookup<'_> {
    /// Returns the identifier for a (chromosome, symbol) pair, if mapped.
    pub fn get(&self, chrom: &str, symbol: &str) -> Option<u64> {
        self.index.get(chrom)
            .and_then(|symbols| symbols.get(symbol))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data_types::gene_info::load_gene_info;

    fn sentinels() -> Vec<String> {
        vec!["NaN".to_string(), "NA".to_string()]
    }

    #[test]
    fn test_primary_precedence() {
        // end-to-end example: 200 lists "A" as an alternate, but 100 owns it as a primary
        let records = vec![
            GeneInfoRecord::new(100, "1", "A", &[]),
            GeneInfoRecord::new(200, "1", "B", &["A"])
        ];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        assert_eq!(gene_map.entries(), &[
            GeneMapEntry::new(100, "chr1", "A"),
            GeneMapEntry::new(200, "chr1", "B")
        ]);
        assert!(!gene_map.entries().contains(&GeneMapEntry::new(200, "chr1", "A")));
        assert_eq!(gene_map.lookup().get("chr1", "A"), Some(100));
    }

    #[test]
    fn test_primary_precedence_listed_later() {
        // the primary still wins when its record comes after the alternate's record
        let records = vec![
            GeneInfoRecord::new(200, "1", "B", &["A"]),
            GeneInfoRecord::new(100, "1", "A", &[])
        ];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        assert_eq!(gene_map.lookup().get("chr1", "A"), Some(100));
        assert_eq!(gene_map.len(), 2);
    }

    #[test]
    fn test_ambiguous_alternates() {
        let records = vec![
            GeneInfoRecord::new(1, "1", "X", &["SHARED", "ONLY_X"]),
            GeneInfoRecord::new(2, "1", "Y", &["SHARED"]),
            // same alternate on another chromosome is not ambiguous
            GeneInfoRecord::new(3, "2", "Z", &["SHARED"])
        ];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        let lookup = gene_map.lookup();
        assert_eq!(lookup.get("chr1", "SHARED"), None);
        assert_eq!(lookup.get("chr2", "SHARED"), Some(3));
        assert_eq!(lookup.get("chr1", "ONLY_X"), Some(1));
        assert_eq!(gene_map.len(), 5);
    }

    #[test]
    fn test_ambiguous_alternate_with_primary() {
        // the shared alternate is dropped, but a primary with the same symbol survives
        let records = vec![
            GeneInfoRecord::new(1, "1", "X", &["S"]),
            GeneInfoRecord::new(2, "1", "Y", &["S"]),
            GeneInfoRecord::new(3, "1", "S", &[])
        ];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        assert_eq!(gene_map.lookup().get("chr1", "S"), Some(3));
    }

    #[test]
    fn test_repeated_alternate_same_record() {
        let records = vec![GeneInfoRecord::new(1, "1", "X", &["DUP", "DUP"])];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        assert_eq!(gene_map.lookup().get("chr1", "DUP"), None);
    }

    #[test]
    fn test_drop_ambiguous_keeps_order() {
        let records = vec![
            GeneInfoRecord::new(1, "1", "X", &["K1", "S", "K2"]),
            GeneInfoRecord::new(2, "1", "Y", &["S", "K3"])
        ];
        let kept: Vec<String> = drop_ambiguous(alternate_symbols(&records)).iter()
            .map(|alt| alt.alt_symbol().to_string())
            .collect();
        assert_eq!(kept, vec!["K1", "K2", "K3"]);
    }

    #[test]
    fn test_duplicate_primaries_keep_first() {
        let records = vec![
            GeneInfoRecord::new(10, "7", "P", &[]),
            GeneInfoRecord::new(11, "7", "P", &[])
        ];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        assert_eq!(gene_map.entries(), &[GeneMapEntry::new(10, "chr7", "P")]);
    }

    #[test]
    fn test_chromosome_prefix() {
        let records = vec![
            GeneInfoRecord::new(1, "1", "A", &[]),
            GeneInfoRecord::new(2, "X", "B", &["B2"])
        ];
        let gene_map = GeneMap::build(&records, "chr").unwrap();
        let chroms: Vec<&str> = gene_map.entries().iter().map(|e| e.chrom()).collect();
        assert_eq!(chroms, vec!["chr1", "chrX", "chrX"]);

        let gene_map = GeneMap::build(&records, "").unwrap();
        assert_eq!(gene_map.entries()[0].chrom(), "1");
    }

    #[test]
    fn test_alternate_symbols_skip_empty() {
        let records = vec![
            GeneInfoRecord::new(1, "1", "A", &["", "A1"]),
            GeneInfoRecord::new(2, "1", "B", &[])
        ];
        let alternates = alternate_symbols(&records);
        assert_eq!(alternates.len(), 1);
        assert_eq!(alternates[0].alt_symbol(), "A1");
    }

    #[test]
    fn test_validate() {
        let gene_map = GeneMap::from_entries(vec![
            GeneMapEntry::new(1, "chr1", "A"),
            GeneMapEntry::new(2, "chr2", "A"),
            GeneMapEntry::new(3, "chr1", "A")
        ]);
        assert_eq!(gene_map.validate(), Err(MappingError::DuplicateKey {
            chrom: "chr1".to_string(),
            symbol: "A".to_string()
        }));
    }

    #[test]
    fn test_remove_symbols() {
        let mut gene_map = GeneMap::from_entries(vec![
            GeneMapEntry::new(7504, "chrX", "NA"),
            GeneMapEntry::new(11280, "chr3", "NaN"),
            // removal is by symbol, not identifier
            GeneMapEntry::new(99, "chr5", "NA"),
            GeneMapEntry::new(7504, "chrX", "XK")
        ]);
        assert_eq!(gene_map.remove_symbols(&sentinels()), 3);
        assert_eq!(gene_map.entries(), &[GeneMapEntry::new(7504, "chrX", "XK")]);
    }

    #[test]
    fn test_build_from_file() {
        let records = load_gene_info(Path::new("test_data/gene_info_small.tsv"), 9606).unwrap();
        let mut gene_map = GeneMap::build(&records, "chr").unwrap();

        // 9 primaries + 20 alternates - 2 ambiguous - 1 shadowed by a primary
        assert_eq!(gene_map.len(), 26);
        {
            let lookup = gene_map.lookup();
            assert_eq!(lookup.get("chr1", "GENEA"), Some(100));
            assert_eq!(lookup.get("chr1", "SHARED"), None);
            assert_eq!(lookup.get("chr2", "SHARED"), Some(400));
            assert_eq!(lookup.get("chr1", "GENEC2"), Some(300));
            assert_eq!(lookup.get("chr12", "A2MD"), Some(2));
            assert_eq!(lookup.get("chrX", "NA"), Some(7504));
            assert_eq!(lookup.get("chrMT", "MTGENE"), Some(500));
            // mouse was never loaded
            assert_eq!(lookup.get("chr6", "Pzp"), None);
        }

        assert_eq!(gene_map.remove_symbols(&sentinels()), 2);
        assert_eq!(gene_map.len(), 24);
        assert!(gene_map.entries().iter().all(|e| e.symbol() != "NA" && e.symbol() != "NaN"));
        assert!(gene_map.validate().is_ok());
    }

    #[test]
    fn test_write_and_read() {
        let gene_map = GeneMap::from_entries(vec![
            GeneMapEntry::new(100, "chr1", "A"),
            GeneMapEntry::new(200, "chr1", "B")
        ]);
        let mut buffer: Vec<u8> = vec![];
        gene_map.write(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text, "entrez_id\tchr\tsymbol\n100\tchr1\tA\n200\tchr1\tB\n");

        let loaded = GeneMap::read(buffer.as_slice()).unwrap();
        assert_eq!(loaded, gene_map);
    }

    #[test]
    fn test_write_empty() {
        let mut buffer: Vec<u8> = vec![];
        GeneMap::default().write(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "entrez_id\tchr\tsymbol\n");
    }

    #[test]
    fn test_read_rejects_duplicates() {
        let data = "entrez_id\tchr\tsymbol\n100\tchr1\tA\n200\tchr1\tA\n";
        let err = GeneMap::read(data.as_bytes()).unwrap_err();
        assert!(err.downcast_ref::<MappingError>().is_some());
    }

    #[test]
    fn test_save_gz() {
        let temp_dir = tempfile::tempdir().unwrap();
        let filename = temp_dir.path().join("map.tsv.gz");
        let gene_map = GeneMap::from_entries(vec![GeneMapEntry::new(1, "chr19", "A1BG")]);
        gene_map.save(&filename).unwrap();
        assert_eq!(GeneMap::load(&filename).unwrap(), gene_map);
    }
}
