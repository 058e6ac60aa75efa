// Integration tests: full dataset tree through DatasetAggregator

use popgen_aggregator::parsers::PairFileNaming;
use popgen_aggregator::{DataError, DatasetAggregator, DatasetConfig, PopulationCode};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_dataset(root: &Path, samples: usize, variants: usize) {
    let admixture = root.join("results/admixture");
    let fst = root.join("results/fst");
    fs::create_dir_all(&admixture).unwrap();
    fs::create_dir_all(&fst).unwrap();

    let codes = PopulationCode::all();
    let pca: String = (0..samples)
        .map(|i| {
            format!(
                "HG{i:05} HG{i:05} 0.{i:02} -0.{i:02} 0.5 0 0 0 0 0 0 0 {}\n",
                codes[i % codes.len()]
            )
        })
        .collect();
    fs::write(admixture.join("african_pca_labeled.txt"), pca).unwrap();

    let mut af = "CHROM\tPOS\tREF\tALT\tYRI_AF\tLWK_AF\tGWD_AF\tMSL_AF\tESN_AF\n".to_string();
    for i in 0..variants {
        af.push_str(&format!("22\t{}\tA\tG\t0.1\t0.2\t0.3\t0.4\t0.5\n", 16_050_000 + i));
    }
    fs::write(root.join("results/combined_af.txt"), af).unwrap();

    fs::write(
        fst.join("YRI_LWK.weir.fst"),
        "CHROM\tPOS\tWEIR_AND_COCKERHAM_FST\n22\t1\t0.02\n22\t2\t0.04\n22\t3\tinf\n",
    )
    .unwrap();
    fs::write(
        fst.join("GWD_MSL.weir.fst"),
        "CHROM\tPOS\tWEIR_AND_COCKERHAM_FST\n22\t1\t-nan\n22\t2\t-inf\n",
    )
    .unwrap();
    fs::write(
        fst.join("YRI_CEU.weir.fst"),
        "CHROM\tPOS\tWEIR_AND_COCKERHAM_FST\n22\t1\t0.9\n",
    )
    .unwrap();
    fs::write(fst.join("fst.log"), "vcftools log output").unwrap();
}

#[test]
fn test_full_dataset() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path(), 50, 3);
    let aggregator = DatasetAggregator::new(DatasetConfig::with_base_dir(dir.path()));

    let stats = aggregator.stats().unwrap();
    assert_eq!(stats.sample_count, 50);
    assert_eq!(stats.population_count, 5);
    assert_eq!(stats.variant_count, 3);
    assert_eq!(stats.chromosome_label, "chr22");

    let pca = aggregator.pca().unwrap();
    assert_eq!(pca.len(), stats.sample_count);
    assert_eq!(pca[0].sample, "HG00000");
    assert_eq!(pca[7].pop, "GWD");
    assert_eq!(pca[7].pc1, 0.07);
    assert_eq!(pca[7].pc2, -0.07);

    let fst = aggregator.differentiation().unwrap();
    assert_eq!(fst.details.len(), 1);
    assert_eq!(fst.details[0].n_values, 2);
    assert_eq!(fst.matrix.get(PopulationCode::YRI, PopulationCode::LWK), 0.03);
    assert_eq!(fst.matrix.get(PopulationCode::LWK, PopulationCode::YRI), 0.03);
    assert_eq!(fst.matrix.get(PopulationCode::GWD, PopulationCode::MSL), 0.0);

    let af = aggregator.allele_frequencies(Some(2)).unwrap();
    assert_eq!(af.data.len(), 2);
    assert_eq!(af.populations, PopulationCode::all().to_vec());
}

#[test]
fn test_af_limit_is_independent_of_variant_count() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path(), 5, 12);
    let config = DatasetConfig {
        af_limit: 10,
        ..DatasetConfig::with_base_dir(dir.path())
    };
    let aggregator = DatasetAggregator::new(config);

    assert_eq!(aggregator.stats().unwrap().variant_count, 12);
    assert_eq!(aggregator.allele_frequencies(None).unwrap().data.len(), 10);
    assert_eq!(aggregator.allele_frequencies(Some(100)).unwrap().data.len(), 12);
}

#[test]
fn test_repeated_aggregation_is_deterministic() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path(), 20, 4);
    let aggregator = DatasetAggregator::new(DatasetConfig::with_base_dir(dir.path()));

    let render = || {
        serde_json::json!({
            "stats": aggregator.stats().unwrap(),
            "pca": aggregator.pca().unwrap(),
            "fst": aggregator.differentiation().unwrap(),
            "af": aggregator.allele_frequencies(None).unwrap(),
            "populations": aggregator.populations(),
        })
        .to_string()
    };

    assert_eq!(render(), render());
}

#[test]
fn test_missing_sources_name_the_file() {
    let dir = tempdir().unwrap();
    let aggregator = DatasetAggregator::new(DatasetConfig::with_base_dir(dir.path()));

    let err = aggregator.stats().unwrap_err();
    assert!(matches!(err, DataError::MissingSource { .. }));
    assert!(err.path().ends_with("african_pca_labeled.txt"));

    let err = aggregator.differentiation().unwrap_err();
    assert!(err.path().ends_with("results/fst"));

    let err = aggregator.allele_frequencies(None).unwrap_err();
    assert!(err.path().ends_with("combined_af.txt"));
}

#[test]
fn test_custom_fst_naming() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path(), 5, 1);
    fs::write(
        dir.path().join("results/fst/MSL_ESN.hudson"),
        "POS\tHUDSON_FST\n1\t0.1\n2\t0.3\n",
    )
    .unwrap();

    let config = DatasetConfig {
        fst_naming: PairFileNaming {
            extension: ".hudson".to_string(),
            column: "HUDSON_FST".to_string(),
        },
        ..DatasetConfig::with_base_dir(dir.path())
    };
    let fst = DatasetAggregator::new(config).differentiation().unwrap();

    assert_eq!(fst.details.len(), 1);
    assert_eq!(fst.matrix.get(PopulationCode::ESN, PopulationCode::MSL), 0.2);
}

#[cfg(unix)]
#[test]
fn test_published_fst_links_are_aggregated() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    write_dataset(dir.path(), 5, 1);
    let fst = dir.path().join("results/fst");

    // Pipeline publishes the LWK-ESN table as a link into a run directory
    let run = dir.path().join("runs/2024-06-01");
    fs::create_dir_all(&run).unwrap();
    fs::write(
        run.join("LWK_ESN.weir.fst"),
        "CHROM\tPOS\tWEIR_AND_COCKERHAM_FST\n22\t1\t0.01\n22\t2\tNA\n22\t3\t0.05\n",
    )
    .unwrap();
    symlink(run.join("LWK_ESN.weir.fst"), fst.join("LWK_ESN.weir.fst")).unwrap();
    fs::create_dir(fst.join("archive")).unwrap();
    symlink(&run, fst.join("GWD_ESN.weir.fst")).unwrap();

    let result = DatasetAggregator::new(DatasetConfig::with_base_dir(dir.path()))
        .differentiation()
        .unwrap();

    assert_eq!(result.details.len(), 2);
    assert_eq!(result.details[0].pop1, PopulationCode::LWK);
    assert_eq!(result.details[0].n_values, 2);
    assert_eq!(result.matrix.get(PopulationCode::ESN, PopulationCode::LWK), 0.03);
    assert_eq!(result.matrix.get(PopulationCode::GWD, PopulationCode::ESN), 0.0);
    assert_eq!(result.matrix.get(PopulationCode::YRI, PopulationCode::LWK), 0.03);
}
