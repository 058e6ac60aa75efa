// ==============================================================================
// pca.rs - Labeled PCA Coordinate Parser
// ==============================================================================
// Description: Parser for PLINK eigenvector files with a population label column
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Format: Whitespace-delimited, no header, 13 columns
// Example:
//   NA18486 NA18486 -0.0213 0.0412 ... 0.0031 YRI
//   FID     IID     PC1     PC2    ... PC10   Population
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

use super::open_source;
use crate::error::DataError;
use crate::populations::PopulationCode;

/// Number of principal components per row
pub const PC_COUNT: usize = 10;

/// Fields per row: FID, IID, PC1..PC10, population
pub(crate) const PCA_FIELD_COUNT: usize = PC_COUNT + 3;

/// One sample's PCA coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Family identifier (column 1, not exposed downstream)
    pub family_id: String,

    /// Individual identifier (e.g., "NA18486")
    pub sample_id: String,

    /// PC1..PC10 in file order
    pub coordinates: [f64; PC_COUNT],

    /// Population label as written in the file
    pub population: String,
}

/// Flat per-sample mapping consumed by the PCA scatter plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaPoint {
    pub sample: String,
    pub pc1: f64,
    pub pc2: f64,
    pub pc3: f64,
    pub pop: String,
}

impl SampleRecord {
    /// Registry code for this sample's label, `None` if unknown
    pub fn population_code(&self) -> Option<PopulationCode> {
        PopulationCode::parse(&self.population)
    }

    /// Principal component by 1-based index (PC1 = 1)
    pub fn pc(&self, n: usize) -> Option<f64> {
        n.checked_sub(1).and_then(|i| self.coordinates.get(i).copied())
    }

    pub fn to_point(&self) -> PcaPoint {
        PcaPoint {
            sample: self.sample_id.clone(),
            pc1: self.coordinates[0],
            pc2: self.coordinates[1],
            pc3: self.coordinates[2],
            pop: self.population.clone(),
        }
    }
}

/// Parse a labeled PCA file
///
/// Blank lines are skipped. Any row with the wrong number of fields or a
/// non-numeric component fails the whole load; no partial result is returned.
pub fn load_pca(path: impl AsRef<Path>) -> Result<Vec<SampleRecord>, DataError> {
    let path = path.as_ref();
    let reader = open_source(path)?;

    let mut records = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| DataError::from_io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        records.push(parse_line(&line, idx + 1, path)?);
    }

    info!("Loaded {} PCA samples from {:?}", records.len(), path);

    let unlabeled = records.iter().filter(|r| r.population_code().is_none()).count();
    if unlabeled > 0 {
        debug!("{} PCA samples carry a population label outside the registry", unlabeled);
    }

    Ok(records)
}

/// Check a row's field count without parsing values
pub(crate) fn check_field_count(line: &str, line_number: usize, path: &Path) -> Result<(), DataError> {
    let count = line.split_whitespace().count();
    if count != PCA_FIELD_COUNT {
        return Err(DataError::MalformedRow {
            path: path.to_path_buf(),
            line: line_number,
            details: format!(
                "Expected {} whitespace-delimited fields, found {}",
                PCA_FIELD_COUNT, count
            ),
        });
    }
    Ok(())
}

fn parse_line(line: &str, line_number: usize, path: &Path) -> Result<SampleRecord, DataError> {
    check_field_count(line, line_number, path)?;
    let fields: Vec<&str> = line.split_whitespace().collect();

    let mut coordinates = [0.0; PC_COUNT];
    for (i, raw) in fields[2..2 + PC_COUNT].iter().enumerate() {
        coordinates[i] = raw.parse::<f64>().map_err(|_| DataError::MalformedRow {
            path: path.to_path_buf(),
            line: line_number,
            details: format!("PC{} is not numeric: {}", i + 1, raw),
        })?;
    }

    Ok(SampleRecord {
        family_id: fields[0].to_string(),
        sample_id: fields[1].to_string(),
        coordinates,
        population: fields[PCA_FIELD_COUNT - 1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn row(fid: &str, iid: &str, base: f64, pop: &str) -> String {
        let pcs: Vec<String> = (0..PC_COUNT).map(|i| format!("{:.2}", base + i as f64 / 100.0)).collect();
        format!("{} {} {} {}\n", fid, iid, pcs.join(" "), pop)
    }

    #[test]
    fn test_parse_valid_file() {
        let contents = format!(
            "{}{}{}",
            row("NA18486", "NA18486", 0.1, "YRI"),
            row("NA19017", "NA19017", -0.2, "LWK"),
            row("HG02461", "HG02461", 0.3, "GWD"),
        );
        let file = create_test_file(&contents);

        let records = load_pca(file.path()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].family_id, "NA18486");
        assert_eq!(records[0].sample_id, "NA18486");
        assert_eq!(records[0].coordinates[0], 0.1);
        assert_eq!(records[0].coordinates[9], 0.19);
        assert_eq!(records[0].population_code(), Some(PopulationCode::YRI));

        // File order preserved
        assert_eq!(records[1].sample_id, "NA19017");
        assert_eq!(records[2].population, "GWD");
    }

    #[test]
    fn test_tabs_and_repeated_spaces() {
        let contents = "F1\tS1   1 2 3 4 5 6 7 8 9 10\t\tMSL\n";
        let file = create_test_file(contents);

        let records = load_pca(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].coordinates, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(records[0].population_code(), Some(PopulationCode::MSL));
    }

    #[test]
    fn test_fifty_rows() {
        let contents: String = (0..50)
            .map(|i| row(&format!("F{}", i), &format!("S{}", i), i as f64, "ESN"))
            .collect();
        let file = create_test_file(&contents);

        let records = load_pca(file.path()).unwrap();
        assert_eq!(records.len(), 50);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.sample_id, format!("S{}", i));
        }
    }

    #[test]
    fn test_blank_lines_skipped() {
        let contents = format!("{}\n\n{}", row("F1", "S1", 0.0, "YRI"), row("F2", "S2", 0.0, "LWK"));
        let file = create_test_file(&contents);

        let records = load_pca(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_unknown_population_kept() {
        let file = create_test_file(&row("F1", "S1", 0.0, "CEU"));

        let records = load_pca(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].population, "CEU");
        assert_eq!(records[0].population_code(), None);
    }

    #[test]
    fn test_wrong_field_count() {
        let contents = format!("{}F2 S2 1 2 3 YRI\n", row("F1", "S1", 0.0, "YRI"));
        let file = create_test_file(&contents);

        match load_pca(file.path()).unwrap_err() {
            DataError::MalformedRow { line, details, .. } => {
                assert_eq!(line, 2);
                assert!(details.contains("found 6"));
            }
            e => panic!("Expected MalformedRow error, got {}", e),
        }
    }

    #[test]
    fn test_non_numeric_component() {
        let contents = "F1 S1 0.1 0.2 abc 0.4 0.5 0.6 0.7 0.8 0.9 1.0 YRI\n";
        let file = create_test_file(contents);

        match load_pca(file.path()).unwrap_err() {
            DataError::MalformedRow { line, details, .. } => {
                assert_eq!(line, 1);
                assert!(details.contains("PC3"));
            }
            e => panic!("Expected MalformedRow error, got {}", e),
        }
    }

    #[test]
    fn test_to_point_exposes_first_three_components() {
        let file = create_test_file(&row("F1", "S1", 1.0, "YRI"));
        let records = load_pca(file.path()).unwrap();

        let point = records[0].to_point();
        assert_eq!(point.sample, "S1");
        assert_eq!(point.pc1, 1.0);
        assert_eq!(point.pc2, 1.01);
        assert_eq!(point.pc3, 1.02);
        assert_eq!(point.pop, "YRI");

        assert_eq!(records[0].pc(10), Some(1.09));
        assert_eq!(records[0].pc(0), None);
        assert_eq!(records[0].pc(11), None);
    }
}
