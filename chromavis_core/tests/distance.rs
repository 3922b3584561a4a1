use chromavis_core::{
    compute_distance, log_distance_summary, project_colour_space, subset_by_label, DistanceOptions,
    EngineConfig, NoiseMode, QuantumCatches, SpaceId, SpaceParams, VisionError, VisualMeta, Weber,
};
use rand::{Rng, SeedableRng};

fn catches(labels: &[&str], rows: &[Vec<f64>]) -> QuantumCatches {
    QuantumCatches::from_rows(labels, &["u", "s", "m", "l"], rows, VisualMeta::new(4))
        .expect("rows match declared cones")
}

fn random_catches(seed: u64, n: usize) -> QuantumCatches {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..4).map(|_| rng.gen_range(1.5..100.0)).collect())
        .collect();
    let labels: Vec<String> = (0..n).map(|i| format!("sample{i:02}")).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    catches(&labels, &rows)
}

#[test]
fn every_unordered_pair_appears_once() {
    for n in [2, 3, 7, 12] {
        let record = compute_distance(&random_catches(n as u64, n), &DistanceOptions::default()).unwrap();
        assert_eq!(record.len(), n * (n - 1) / 2);
        let mut seen = std::collections::HashSet::new();
        for p in record.pairs() {
            assert_ne!(p.patch1, p.patch2);
            let key = if p.patch1 < p.patch2 {
                (p.patch1.clone(), p.patch2.clone())
            } else {
                (p.patch2.clone(), p.patch1.clone())
            };
            assert!(seen.insert(key));
        }
    }
}

#[test]
fn distances_are_deterministic() {
    let input = random_catches(21, 15);
    let options = DistanceOptions::default().with_noise(NoiseMode::Quantum);
    let a = compute_distance(&input, &options).unwrap();
    let b = compute_distance(&input, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn swapping_sample_order_gives_the_same_distance() {
    let rows = vec![vec![12.0, 30.0, 41.0, 55.0], vec![20.0, 25.0, 33.0, 60.0]];
    let swapped = vec![rows[1].clone(), rows[0].clone()];
    for mode in [NoiseMode::Neural, NoiseMode::Quantum] {
        let options = DistanceOptions::default().with_noise(mode);
        let ab = compute_distance(&catches(&["A", "B"], &rows), &options).unwrap();
        let ba = compute_distance(&catches(&["B", "A"], &swapped), &options).unwrap();
        assert_eq!(ab.pairs()[0].ds, ba.pairs()[0].ds);
    }
}

#[test]
fn density_length_must_match_channels() {
    let input = random_catches(1, 3);
    for densities in [vec![1.0, 2.0, 2.0], vec![1.0, 1.0, 2.0, 2.0, 4.0], vec![1.0]] {
        let options = DistanceOptions::default().with_densities(densities.clone());
        let err = compute_distance(&input, &options).unwrap_err();
        assert!(
            matches!(err, VisionError::DensityMismatch { expected: 4, got } if got == densities.len()),
            "unexpected error {err:?}"
        );
    }
}

#[test]
fn per_channel_weber_length_must_match() {
    let options = DistanceOptions::default().with_weber(Weber::PerChannel(vec![0.1, 0.1]));
    let err = compute_distance(&random_catches(2, 3), &options).unwrap_err();
    assert!(matches!(err, VisionError::WeberMismatch { expected: 4, got: 2 }));
}

#[test]
fn tetrahedral_end_to_end() {
    let input = QuantumCatches::from_rows(
        &["grey", "uv", "long"],
        &["u", "s", "m", "l"],
        &[
            vec![0.25, 0.25, 0.25, 0.25],
            vec![0.4, 0.2, 0.2, 0.2],
            vec![0.1, 0.3, 0.3, 0.3],
        ],
        VisualMeta::new(4).with_relative(true),
    )
    .unwrap();
    let tcs = project_colour_space(&input, SpaceId::Tetrahedral, &SpaceParams::default()).unwrap();

    let origin = tcs.descriptors()[0];
    assert!(origin.r_vec.abs() < 1e-12);
    assert!(!origin.has_hue());

    let record = compute_distance(&tcs, &DistanceOptions::default()).unwrap();
    assert_eq!(record.len(), 3);
    for other in ["uv", "long"] {
        let index = tcs.index_of(other).unwrap();
        let pair = record.get("grey", other).unwrap();
        assert!((pair.ds - tcs.descriptors()[index].r_vec).abs() < 1e-12);
    }
}

#[test]
fn label_subset_is_a_union() {
    let input = catches(
        &["A1", "B1", "A2", "C1", "AB"],
        &[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 2.0, 3.0, 4.0],
            vec![3.0, 2.0, 3.0, 4.0],
            vec![4.0, 2.0, 3.0, 4.0],
            vec![5.0, 2.0, 3.0, 4.0],
        ],
    );
    let union = subset_by_label(&input, &["A", "B"]).unwrap();
    assert_eq!(union.labels(), &["A1", "B1", "A2", "AB"]);

    let tcs = project_colour_space(&input, SpaceId::Tetrahedral, &SpaceParams::default()).unwrap();
    let union = subset_by_label(&tcs, &["A", "B"]).unwrap();
    assert_eq!(union.len(), 4);
    assert_eq!(union.coords().row(3), tcs.coords().row(4));

    let distances = compute_distance(&input, &DistanceOptions::default()).unwrap();
    let touching_c = subset_by_label(&distances, &["C"]).unwrap();
    assert_eq!(touching_c.len(), 4);
    assert!(touching_c
        .pairs()
        .iter()
        .all(|p| p.patch1 == "C1" || p.patch2 == "C1"));
}

#[test]
fn shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/engine.toml");
    let config = EngineConfig::load_from_file(path).unwrap();
    assert_eq!(config.distance_options(), DistanceOptions::default());
    assert_eq!(config.space_params(), SpaceParams::default());
}

#[test]
fn journal_appends_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("distances.jsonl");
    let record = compute_distance(&random_catches(9, 4), &DistanceOptions::default()).unwrap();

    log_distance_summary(&path, &record).unwrap();
    log_distance_summary(&path, &record).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(entry["pairs"], 6);
    assert_eq!(entry["reference_pairs"], 4 * 5 + 10);
}
