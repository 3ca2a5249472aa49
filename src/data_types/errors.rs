
/// Errors produced while loading tables or building the gene map; these abort the run
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MappingError {
    #[error("required column \"{column}\" was not found in the {table} table")]
    MissingColumn { column: String, table: String },
    #[error("gene map contains duplicate (chromosome, symbol) pair: ({chrom}, {symbol})")]
    DuplicateKey { chrom: String, symbol: String }
}

/// Verifies that every required column is present in a header line.
/// # Arguments
/// * `headers` - the parsed header line
/// * `required` - the column labels that must be present
/// * `table` - a label for the table, used in the error message
/// # Errors
/// * `MappingError::MissingColumn` naming the first absent column
pub fn check_columns(headers: &csv::StringRecord, required: &[&str], table: &str) -> Result<(), MappingError> {
    for &column in required.iter() {
        if !headers.iter().any(|h| h == column) {
            return Err(MappingError::MissingColumn {
                column: column.to_string(),
                table: table.to_string()
            });
        }
    }
    Ok(())
}

/// Picks a process exit code for a failed run.
/// Schema, consistency, and row parse problems are data errors, everything else is treated as I/O.
/// # Arguments
/// * `e` - the error that stopped the run
pub fn exit_code(e: &(dyn std::error::Error + 'static)) -> exitcode::ExitCode {
    if e.downcast_ref::<MappingError>().is_some() {
        return exitcode::DATAERR;
    }
    if let Some(csv_err) = e.downcast_ref::<csv::Error>() {
        match csv_err.kind() {
            csv::ErrorKind::Deserialize { .. } |
            csv::ErrorKind::UnequalLengths { .. } => return exitcode::DATAERR,
            _ => {}
        }
    }
    exitcode::IOERR
}
