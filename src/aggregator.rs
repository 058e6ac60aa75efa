// ==============================================================================
// aggregator.rs - Dataset Aggregation Entry Points
// ==============================================================================
// Description: One call per presentation request; every call re-reads its
//              sources and returns an owned, self-contained result
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use tracing::info;

use crate::config::DatasetConfig;
use crate::error::DataError;
use crate::parsers::{
    load_allele_frequencies, load_differentiation, load_pca, AlleleFrequencyTable,
    Differentiation, PcaPoint,
};
use crate::populations::{population_catalog, PopulationCatalog};
use crate::stats::{compute_stats, DatasetStats};

pub struct DatasetAggregator {
    config: DatasetConfig,
}

impl DatasetAggregator {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Dataset overview counts
    pub fn stats(&self) -> Result<DatasetStats, DataError> {
        compute_stats(
            self.config.pca_path(),
            self.config.af_path(),
            &self.config.chromosome,
        )
    }

    /// PCA scatter points (first three components only)
    pub fn pca(&self) -> Result<Vec<PcaPoint>, DataError> {
        let records = load_pca(self.config.pca_path())?;
        Ok(records.iter().map(|r| r.to_point()).collect())
    }

    /// FST matrix and per-pair details
    pub fn differentiation(&self) -> Result<Differentiation, DataError> {
        load_differentiation(self.config.fst_path(), &self.config.fst_naming)
    }

    /// Allele frequency rows, capped at `limit` or the configured default
    pub fn allele_frequencies(&self, limit: Option<usize>) -> Result<AlleleFrequencyTable, DataError> {
        let limit = limit.unwrap_or(self.config.af_limit);
        info!("Loading allele frequencies (limit {})", limit);
        load_allele_frequencies(self.config.af_path(), limit)
    }

    pub fn populations(&self) -> PopulationCatalog {
        population_catalog()
    }
}
