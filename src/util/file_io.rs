
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Opens a file for reading, picking a decoder from the file extension.
/// `.gz` is gzip, `.bz2` is bzip2, anything else is read as-is.
/// # Arguments
/// * `filename` - the file path to open
/// # Errors
/// * if the file does not open properly
pub fn open_reader(filename: &Path) -> Result<Box<dyn Read>, Box<dyn std::error::Error>> {
    let file = BufReader::new(File::open(filename)?);
    let extension = filename.extension().unwrap_or_default();
    let reader: Box<dyn Read> = if extension == "gz" {
        Box::new(flate2::read::MultiGzDecoder::new(file))
    } else if extension == "bz2" {
        Box::new(bzip2::read::MultiBzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(reader)
}

/// Opens a file for writing, gzip compressing if the path ends with `.gz`.
/// # Arguments
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if the file cannot be created
pub fn open_writer(out_filename: &Path) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    let file: Box<dyn Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    Ok(Box::new(BufWriter::new(file)))
}

/// Wraps any reader in a tab-delimited CSV reader with a header line.
/// Quoting is disabled, NCBI tables use bare `"` inside free-text columns.
pub fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .quoting(false)
        .from_reader(reader)
}

/// Wraps any writer in a tab-delimited CSV writer.
/// Header lines are left to the caller so that empty tables still get one.
pub fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer)
}

/// Helper function that loads a file into some type, helpful generic
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let fp = open_reader(filename)?;
    let result: T = serde_json::from_reader(fp)?;
    Ok(result)
}

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = open_writer(out_filename)?;
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Downloads a URL into a local file.
/// The body is streamed into a temporary file next to the destination and only moved into place once complete,
/// so a failed transfer never leaves a partial file behind.
/// # Arguments
/// * `url` - the remote location to fetch
/// * `filename` - the final local path
/// # Errors
/// * if the request fails or returns a non-success status
/// * if the temporary file cannot be written or persisted
pub fn download_file(url: &str, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parent: PathBuf = match filename.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from(".")
    };
    std::fs::create_dir_all(&parent)?;

    info!("\tDownloading {url} to {filename:?}");
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    debug!("Response received.");

    let mut temp_file = tempfile::NamedTempFile::new_in(&parent)?;
    let num_bytes: u64 = response.copy_to(&mut temp_file)?;
    temp_file.flush()?;
    temp_file.persist(filename)?;
    debug!("Wrote {num_bytes} bytes to {filename:?}");
    Ok(())
}

/// Makes sure a local copy of `url` exists at `filename`, downloading only when it is missing.
/// Returns true if a download happened.
/// # Arguments
/// * `url` - the remote location to fetch
/// * `filename` - the local cache path
/// # Errors
/// * see `download_file(...)`
pub fn fetch_cached(url: &str, filename: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    if filename.exists() {
        info!("\tFound cached copy at {filename:?}, skipping download");
        Ok(false)
    } else {
        download_file(url, filename)?;
        Ok(true)
    }
}
