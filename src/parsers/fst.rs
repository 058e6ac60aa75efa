// ==============================================================================
// fst.rs - Pairwise FST Aggregator
// ==============================================================================
// Description: Builds a symmetric population differentiation matrix from one
//              vcftools --weir-fst-pop output file per population pair
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited with header, one file per unordered pair
// Example (results/fst/YRI_LWK.weir.fst):
//   CHROM   POS     WEIR_AND_COCKERHAM_FST
//   22      16050075        -nan
//   22      16050115        0.0123
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{column_index, parse_numeric_cell, record_line, tsv_reader};
use crate::error::DataError;
use crate::populations::{PopulationCode, POPULATION_COUNT};

/// Decimal places kept for mean FST values
const MEAN_PRECISION: i32 = 6;

/// Naming convention for per-pair statistic files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFileNaming {
    /// File suffix following `<POP1>_<POP2>` (e.g., ".weir.fst")
    pub extension: String,

    /// Header of the per-variant statistic column
    pub column: String,
}

impl Default for PairFileNaming {
    fn default() -> Self {
        Self {
            extension: ".weir.fst".to_string(),
            column: "WEIR_AND_COCKERHAM_FST".to_string(),
        }
    }
}

/// Raw per-variant values for one population pair; `None` marks a missing value
#[derive(Debug, Clone, PartialEq)]
pub struct PairValues {
    pub pop1: PopulationCode,
    pub pop2: PopulationCode,
    pub values: Vec<Option<f64>>,
}

/// Mean differentiation between two populations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseStat {
    pub pop1: PopulationCode,
    pub pop2: PopulationCode,

    /// Mean over finite values, rounded to 6 decimals
    #[serde(rename = "mean_fst")]
    pub mean_value: f64,

    /// Number of finite values that entered the mean
    #[serde(rename = "n_variants")]
    pub n_values: usize,
}

/// Symmetric matrix indexed by registry order; diagonal stays 0
#[derive(Debug, Clone, PartialEq)]
pub struct DifferentiationMatrix {
    cells: [[f64; POPULATION_COUNT]; POPULATION_COUNT],
}

impl Default for DifferentiationMatrix {
    fn default() -> Self {
        Self {
            cells: [[0.0; POPULATION_COUNT]; POPULATION_COUNT],
        }
    }
}

impl DifferentiationMatrix {
    pub fn get(&self, a: PopulationCode, b: PopulationCode) -> f64 {
        self.cells[a.index()][b.index()]
    }

    /// Write both (a, b) and (b, a)
    pub fn set_pair(&mut self, a: PopulationCode, b: PopulationCode, value: f64) {
        self.cells[a.index()][b.index()] = value;
        self.cells[b.index()][a.index()] = value;
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }
}

impl Serialize for DifferentiationMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.cells.serialize(serializer)
    }
}

/// Matrix plus per-pair details, as consumed by the FST heat map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Differentiation {
    pub matrix: DifferentiationMatrix,

    /// Registry order; matches matrix indices
    pub populations: Vec<PopulationCode>,

    /// One entry per pair with data, in file enumeration order
    pub details: Vec<PairwiseStat>,
}

impl Default for Differentiation {
    fn default() -> Self {
        Self {
            matrix: DifferentiationMatrix::default(),
            populations: PopulationCode::all().to_vec(),
            details: Vec::new(),
        }
    }
}

/// Load every `<POP1>_<POP2><extension>` file in `dir` and aggregate them
///
/// Files whose names do not resolve to two distinct registry codes are
/// skipped. A matching file that cannot be parsed fails the whole load.
pub fn load_differentiation(
    dir: impl AsRef<Path>,
    naming: &PairFileNaming,
) -> Result<Differentiation, DataError> {
    let dir = dir.as_ref();
    let mut pairs = Vec::new();

    for (path, pop1, pop2) in enumerate_pair_files(dir, &naming.extension)? {
        debug!("Reading {}-{} FST values from {:?}", pop1, pop2, path);
        let values = read_statistic_column(&path, &naming.column)?;
        pairs.push(PairValues { pop1, pop2, values });
    }

    let differentiation = aggregate_pairs(pairs);

    info!(
        "Aggregated FST for {} population pairs from {:?}",
        differentiation.details.len(),
        dir
    );

    Ok(differentiation)
}

/// Files (or links to files) directly inside `dir` whose names resolve to a
/// pair, sorted by file name
fn enumerate_pair_files(
    dir: &Path,
    extension: &str,
) -> Result<Vec<(PathBuf, PopulationCode, PopulationCode)>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::MissingSource {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => DataError::from_io(&path, io),
                None => DataError::MissingSource { path },
            }
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !file_name.ends_with(extension) {
            continue;
        }

        let Some((pop1, pop2)) = parse_pair_name(&file_name, extension) else {
            debug!("Skipping {:?}: not a known population pair", entry.path());
            continue;
        };

        // Symlinks resolve to their target; a dangling pair link is a missing source
        if file_type.is_symlink() {
            let target = std::fs::metadata(entry.path())
                .map_err(|e| DataError::from_io(entry.path(), e))?;
            if !target.is_file() {
                debug!("Skipping {:?}: link does not point to a file", entry.path());
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }

        files.push((entry.path().to_path_buf(), pop1, pop2));
    }

    Ok(files)
}

/// Resolve `<POP1>_<POP2><extension>` to two distinct registry codes
pub fn parse_pair_name(file_name: &str, extension: &str) -> Option<(PopulationCode, PopulationCode)> {
    let stem = file_name.strip_suffix(extension)?;

    let mut parts = stem.split('_');
    let pop1 = PopulationCode::parse(parts.next()?)?;
    let pop2 = PopulationCode::parse(parts.next()?)?;
    if parts.next().is_some() || pop1 == pop2 {
        return None;
    }

    Some((pop1, pop2))
}

/// Read one named column from a tab-delimited statistic file
///
/// Infinite values, NaN and the missing markers `""`/`NA` come back as `None`.
pub fn read_statistic_column(path: &Path, column: &str) -> Result<Vec<Option<f64>>, DataError> {
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
    let col = column_index(&headers, column, path)?;

    let mut values = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::from_csv(path, e))?;
        let raw = record.get(col).unwrap_or("");

        let value = parse_numeric_cell(raw).ok_or_else(|| DataError::MalformedRow {
            path: path.to_path_buf(),
            line: record_line(&record, row_idx),
            details: format!("{} is not numeric: {}", column, raw),
        })?;
        values.push(value.filter(|v| v.is_finite()));
    }

    Ok(values)
}

/// Aggregate in-memory pair values into a matrix and detail list
///
/// Pairs with no finite value, or whose mean is not finite, leave their cells
/// at 0 and produce no detail.
pub fn aggregate_pairs(pairs: impl IntoIterator<Item = PairValues>) -> Differentiation {
    let mut differentiation = Differentiation::default();

    for pair in pairs {
        let finite: Vec<f64> = pair
            .values
            .iter()
            .filter_map(|v| *v)
            .filter(|v| v.is_finite())
            .collect();

        if finite.is_empty() {
            warn!(
                "No finite FST values for {}-{} ({} rows), leaving matrix cell at 0",
                pair.pop1,
                pair.pop2,
                pair.values.len()
            );
            continue;
        }

        let mean = round_to(finite.iter().sum::<f64>() / finite.len() as f64, MEAN_PRECISION);
        if !mean.is_finite() {
            warn!(
                "Mean FST for {}-{} overflowed ({} values), leaving matrix cell at 0",
                pair.pop1,
                pair.pop2,
                finite.len()
            );
            continue;
        }

        differentiation.matrix.set_pair(pair.pop1, pair.pop2, mean);
        differentiation.details.push(PairwiseStat {
            pop1: pair.pop1,
            pop2: pair.pop2,
            mean_value: mean,
            n_values: finite.len(),
        });
    }

    differentiation
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
