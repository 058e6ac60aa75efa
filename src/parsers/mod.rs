// ==============================================================================
// parsers/mod.rs - Pipeline output parsers
// ==============================================================================
// Description: Parsers for PCA, pairwise FST and allele frequency outputs
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

pub mod pca;
pub mod fst;
pub mod allele_freq;

pub use pca::{load_pca, PcaPoint, SampleRecord, PC_COUNT};
pub use fst::{
    aggregate_pairs, load_differentiation, parse_pair_name, read_statistic_column,
    Differentiation, DifferentiationMatrix, PairFileNaming, PairValues, PairwiseStat,
};
pub use allele_freq::{
    load_allele_frequencies, AlleleFrequencyTable, VariantRecord, DEFAULT_AF_ROW_LIMIT,
};

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::DataError;

/// Open a pipeline output for reading; `.gz` files are decompressed on the fly
pub fn open_source(path: &Path) -> Result<Box<dyn BufRead>, DataError> {
    let file = File::open(path).map_err(|e| DataError::from_io(path, e))?;

    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(flate2::read::MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    Ok(Box::new(BufReader::new(reader)))
}

/// Tab-delimited reader with a header row, as written by vcftools and the
/// frequency merge step
pub(crate) fn tsv_reader(path: &Path) -> Result<csv::Reader<Box<dyn BufRead>>, DataError> {
    let source = open_source(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(source))
}

/// Locate a named header column
pub(crate) fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    path: &Path,
) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| DataError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

/// Parse a numeric table cell
///
/// `""`, `NA`, `nan` and `-nan` (vcftools) read as missing: `Some(None)`.
/// Text that is neither a number nor a missing marker yields `None`.
pub(crate) fn parse_numeric_cell(raw: &str) -> Option<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty()
        || raw.eq_ignore_ascii_case("na")
        || raw.eq_ignore_ascii_case("nan")
        || raw.eq_ignore_ascii_case("-nan")
    {
        return Some(None);
    }

    let value = raw.parse::<f64>().ok()?;
    Some((!value.is_nan()).then_some(value))
}

/// 1-based line number of a CSV record, falling back to the data row index
pub(crate) fn record_line(record: &csv::StringRecord, row_idx: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(row_idx + 2)
}
