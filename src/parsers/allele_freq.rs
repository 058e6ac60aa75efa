// ==============================================================================
// allele_freq.rs - Combined Allele Frequency Parser
// ==============================================================================
// Description: Parser for the merged per-population allele frequency table
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited with header
// Example:
//   CHROM  POS       REF  ALT  YRI_AF  LWK_AF  GWD_AF  MSL_AF  ESN_AF
//   22     16050075  A    G    0.0093  0.0     0.0044  0.0     0.0051
// ==============================================================================

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::{column_index, parse_numeric_cell, record_line, tsv_reader};
use crate::error::DataError;
use crate::populations::PopulationCode;

/// Row cap applied when the caller gives no explicit limit
pub const DEFAULT_AF_ROW_LIMIT: usize = 10_000;

/// One variant with its frequency in every registry population
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub chromosome: String,
    pub position: u64,
    pub ref_allele: String,
    pub alt_allele: String,

    /// Alternate allele frequency per population, in registry order;
    /// `None` where the table holds a missing marker
    pub frequencies: BTreeMap<PopulationCode, Option<f64>>,
}

impl VariantRecord {
    pub fn frequency(&self, code: PopulationCode) -> Option<f64> {
        self.frequencies.get(&code).copied().flatten()
    }
}

// Flat mapping keyed by the table column names
impl Serialize for VariantRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.frequencies.len()))?;
        map.serialize_entry("CHROM", &self.chromosome)?;
        map.serialize_entry("POS", &self.position)?;
        map.serialize_entry("REF", &self.ref_allele)?;
        map.serialize_entry("ALT", &self.alt_allele)?;
        for (code, freq) in &self.frequencies {
            map.serialize_entry(&code.af_column(), freq)?;
        }
        map.end()
    }
}

/// Loaded variants plus the population order used for their columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlleleFrequencyTable {
    pub data: Vec<VariantRecord>,
    pub populations: Vec<PopulationCode>,
}

impl AlleleFrequencyTable {
    /// `(freq_a, freq_b)` per variant for a two-population scatter plot;
    /// variants missing either frequency are left out
    pub fn frequency_pairs(&self, a: PopulationCode, b: PopulationCode) -> Vec<(f64, f64)> {
        self.data
            .iter()
            .filter_map(|v| Some((v.frequency(a)?, v.frequency(b)?)))
            .collect()
    }
}

struct ColumnLayout {
    chrom: usize,
    pos: usize,
    ref_allele: usize,
    alt_allele: usize,
    frequencies: Vec<(PopulationCode, usize)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self, DataError> {
        let frequencies = PopulationCode::all()
            .iter()
            .map(|code| Ok((*code, column_index(headers, &code.af_column(), path)?)))
            .collect::<Result<Vec<_>, DataError>>()?;

        Ok(Self {
            chrom: column_index(headers, "CHROM", path)?,
            pos: column_index(headers, "POS", path)?,
            ref_allele: column_index(headers, "REF", path)?,
            alt_allele: column_index(headers, "ALT", path)?,
            frequencies,
        })
    }
}

/// Parse at most `limit` variants from the combined frequency table
///
/// Every registry population must have a `<CODE>_AF` column, checked before
/// any row is read. Empty, `NA` and `nan` frequency cells load as missing.
/// Rows past `limit` are not read and no signal is given that the table was
/// truncated.
pub fn load_allele_frequencies(
    path: impl AsRef<Path>,
    limit: usize,
) -> Result<AlleleFrequencyTable, DataError> {
    let path = path.as_ref();
    let mut reader = tsv_reader(path)?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::from_csv(path, e))?
        .clone();
    if headers.is_empty() {
        return Err(DataError::MissingHeader {
            path: path.to_path_buf(),
        });
    }
    let layout = ColumnLayout::from_headers(&headers, path)?;

    let mut data = Vec::new();

    for (row_idx, result) in reader.records().take(limit).enumerate() {
        let record = result.map_err(|e| DataError::from_csv(path, e))?;
        let line = record_line(&record, row_idx);
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let position = field(layout.pos).parse::<u64>().map_err(|_| DataError::MalformedRow {
            path: path.to_path_buf(),
            line,
            details: format!("Invalid position value: {}", field(layout.pos)),
        })?;

        let mut frequencies = BTreeMap::new();
        for (code, idx) in &layout.frequencies {
            let raw = field(*idx);
            let freq = parse_numeric_cell(raw).ok_or_else(|| DataError::MalformedRow {
                path: path.to_path_buf(),
                line,
                details: format!("Invalid {} value: {}", code.af_column(), raw),
            })?;
            frequencies.insert(*code, freq);
        }

        data.push(VariantRecord {
            chromosome: field(layout.chrom).to_string(),
            position,
            ref_allele: field(layout.ref_allele).to_string(),
            alt_allele: field(layout.alt_allele).to_string(),
            frequencies,
        });
    }

    info!("Loaded {} variants (limit {}) from {:?}", data.len(), limit, path);

    Ok(AlleleFrequencyTable {
        data,
        populations: PopulationCode::all().to_vec(),
    })
}
