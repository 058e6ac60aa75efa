// ==============================================================================
// config.rs - Dataset Configuration
// ==============================================================================
// Description: Locations of pipeline outputs and dataset constants
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Relative paths resolve against `base_dir`. A JSON config file may override
// any subset of fields, e.g.:
//   { "base_dir": "/data/african_popgen", "chromosome": "chr21" }
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DataError;
use crate::parsers::{PairFileNaming, DEFAULT_AF_ROW_LIMIT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Root of the pipeline output tree
    pub base_dir: PathBuf,

    /// Labeled PCA eigenvectors
    pub pca_file: PathBuf,

    /// Merged per-population allele frequency table
    pub af_file: PathBuf,

    /// Directory holding one FST file per population pair
    pub fst_dir: PathBuf,

    /// Per-pair file naming convention
    pub fst_naming: PairFileNaming,

    /// Chromosome the dataset covers
    pub chromosome: String,

    /// Row cap for allele frequency loads
    pub af_limit: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            pca_file: PathBuf::from("results/admixture/african_pca_labeled.txt"),
            af_file: PathBuf::from("results/combined_af.txt"),
            fst_dir: PathBuf::from("results/fst"),
            fst_naming: PairFileNaming::default(),
            chromosome: "chr22".to_string(),
            af_limit: DEFAULT_AF_ROW_LIMIT,
        }
    }
}

impl DatasetConfig {
    /// Default layout rooted at `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| DataError::from_io(path, e))?;

        serde_json::from_str(&contents).map_err(|source| DataError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn pca_path(&self) -> PathBuf {
        self.resolve(&self.pca_file)
    }

    pub fn af_path(&self) -> PathBuf {
        self.resolve(&self.af_file)
    }

    pub fn fst_path(&self) -> PathBuf {
        self.resolve(&self.fst_dir)
    }
}
