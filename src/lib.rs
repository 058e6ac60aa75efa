// ==============================================================================
// lib.rs - Population Genetics Aggregator Library
// ==============================================================================
// Description: Library interface for loading PCA, FST and allele frequency
//              pipeline outputs into presentation-ready structures
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

pub mod error;
pub mod populations;
pub mod parsers;
pub mod stats;
pub mod config;
pub mod aggregator;

pub use aggregator::DatasetAggregator;
pub use config::DatasetConfig;
pub use error::DataError;
pub use populations::{PopulationCode, PopulationMeta};
pub use stats::{compute_stats, DatasetStats};
