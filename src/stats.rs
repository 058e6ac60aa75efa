// ==============================================================================
// stats.rs - Dataset Summary Statistics
// ==============================================================================
// Description: Sample, population and variant counts for the dataset overview
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use crate::error::DataError;
use crate::parsers::open_source;
use crate::parsers::pca::check_field_count;
use crate::populations::POPULATION_COUNT;

/// Snapshot of dataset-wide counts, computed fresh per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    #[serde(rename = "n_samples")]
    pub sample_count: usize,

    #[serde(rename = "n_populations")]
    pub population_count: usize,

    #[serde(rename = "n_variants")]
    pub variant_count: usize,

    #[serde(rename = "chromosome")]
    pub chromosome_label: String,
}

/// Count samples and variants without materializing records
///
/// # Arguments
/// * `pca_path` - Labeled PCA file (one sample per non-blank row, no header)
/// * `af_path` - Combined allele frequency table (one header line)
/// * `chromosome_label` - Label reported for this dataset (e.g., "chr22")
///
/// # Returns
/// * `Err(DataError)` naming the offending file if either source is absent
///   or structurally malformed; no partial stats are returned
pub fn compute_stats(
    pca_path: impl AsRef<Path>,
    af_path: impl AsRef<Path>,
    chromosome_label: &str,
) -> Result<DatasetStats, DataError> {
    let sample_count = count_pca_rows(pca_path.as_ref())?;
    let variant_count = count_data_lines(af_path.as_ref())?;

    debug!(
        "Dataset stats: {} samples, {} variants on {}",
        sample_count, variant_count, chromosome_label
    );

    Ok(DatasetStats {
        sample_count,
        population_count: POPULATION_COUNT,
        variant_count,
        chromosome_label: chromosome_label.to_string(),
    })
}

/// Non-blank rows in the PCA file; each row must have the full field count
fn count_pca_rows(path: &Path) -> Result<usize, DataError> {
    let reader = open_source(path)?;
    let mut count = 0;

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| DataError::from_io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        check_field_count(&line, idx + 1, path)?;
        count += 1;
    }

    Ok(count)
}

/// Total line count minus exactly one header line
///
/// Counts newline bytes, so the body is never decoded; a final line without a
/// trailing newline still counts.
fn count_data_lines(path: &Path) -> Result<usize, DataError> {
    let mut reader = open_source(path)?;
    let mut lines = 0usize;
    let mut last_byte = None;

    loop {
        let chunk = reader.fill_buf().map_err(|e| DataError::from_io(path, e))?;
        if chunk.is_empty() {
            break;
        }
        lines += chunk.iter().filter(|&&b| b == b'\n').count();
        last_byte = chunk.last().copied();
        let consumed = chunk.len();
        reader.consume(consumed);
    }

    if last_byte.is_some_and(|b| b != b'\n') {
        lines += 1;
    }

    lines.checked_sub(1).ok_or_else(|| DataError::MissingHeader {
        path: path.to_path_buf(),
    })
}
