// ==============================================================================
// populations.rs - Population Registry
// ==============================================================================
// Description: Fixed catalog of the five African 1000 Genomes populations
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Registry order (YRI, LWK, GWD, MSL, ESN) indexes every matrix and every
// ordered population list produced by this crate.
// ==============================================================================

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Known population code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PopulationCode {
    YRI,
    LWK,
    GWD,
    MSL,
    ESN,
}

/// Display metadata for a population
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationMeta {
    #[serde(skip)]
    pub code: PopulationCode,
    #[serde(rename = "name")]
    pub display_name: &'static str,
    #[serde(rename = "location")]
    pub origin_location: &'static str,
    #[serde(rename = "color")]
    pub display_color: &'static str,
}

static REGISTRY: [PopulationMeta; 5] = [
    PopulationMeta {
        code: PopulationCode::YRI,
        display_name: "Yoruba",
        origin_location: "Ibadan, Nigeria",
        display_color: "#e74c3c",
    },
    PopulationMeta {
        code: PopulationCode::LWK,
        display_name: "Luhya",
        origin_location: "Webuye, Kenya",
        display_color: "#3498db",
    },
    PopulationMeta {
        code: PopulationCode::GWD,
        display_name: "Gambian",
        origin_location: "Western Division, The Gambia",
        display_color: "#2ecc71",
    },
    PopulationMeta {
        code: PopulationCode::MSL,
        display_name: "Mende",
        origin_location: "Sierra Leone",
        display_color: "#9b59b6",
    },
    PopulationMeta {
        code: PopulationCode::ESN,
        display_name: "Esan",
        origin_location: "Nigeria",
        display_color: "#f39c12",
    },
];

static ALL_CODES: [PopulationCode; 5] = [
    PopulationCode::YRI,
    PopulationCode::LWK,
    PopulationCode::GWD,
    PopulationCode::MSL,
    PopulationCode::ESN,
];

/// Number of populations in the registry
pub const POPULATION_COUNT: usize = ALL_CODES.len();

impl PopulationCode {
    /// All codes in registry order
    pub fn all() -> &'static [PopulationCode] {
        &ALL_CODES
    }

    /// Resolve a code string; unknown codes yield `None`
    pub fn parse(code: &str) -> Option<PopulationCode> {
        ALL_CODES.iter().copied().find(|c| c.as_str() == code)
    }

    /// Metadata lookup by code string
    pub fn lookup(code: &str) -> Option<&'static PopulationMeta> {
        Self::parse(code).map(|c| c.meta())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PopulationCode::YRI => "YRI",
            PopulationCode::LWK => "LWK",
            PopulationCode::GWD => "GWD",
            PopulationCode::MSL => "MSL",
            PopulationCode::ESN => "ESN",
        }
    }

    /// Row/column index in every matrix
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn meta(&self) -> &'static PopulationMeta {
        &REGISTRY[self.index()]
    }

    /// Frequency column name in the combined allele frequency table
    pub fn af_column(&self) -> String {
        format!("{}_AF", self.as_str())
    }
}

impl fmt::Display for PopulationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry as an ordered code -> metadata mapping for the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct PopulationCatalog;

pub fn population_catalog() -> PopulationCatalog {
    PopulationCatalog
}

impl PopulationCatalog {
    pub fn iter(&self) -> impl Iterator<Item = &'static PopulationMeta> {
        REGISTRY.iter()
    }
}

impl Serialize for PopulationCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(REGISTRY.len()))?;
        for meta in REGISTRY.iter() {
            map.serialize_entry(meta.code.as_str(), meta)?;
        }
        map.end()
    }
}
