use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::forest::{ForestParams, IsolationForest};
use super::tree::Node;
use crate::error::DetectorError;

const CENTER: [f64; 5] = [7.2, 8.5, 22.0, 2.1, 450.0];
const SPREAD: [f64; 5] = [0.1, 0.1, 0.2, 0.1, 5.0];

/// Tight cluster around CENTER with independent per-feature jitter
fn cluster(n: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            CENTER
                .iter()
                .zip(SPREAD.iter())
                .map(|(c, s)| c + rng.gen_range(-*s..*s))
                .collect()
        })
        .collect()
}

fn params(num_trees: usize, subsample_size: usize, contamination: f64) -> ForestParams {
    ForestParams {
        num_trees,
        subsample_size,
        contamination,
    }
}

#[test]
fn test_fit_empty_training_set() {
    let data: Vec<Vec<f64>> = Vec::new();
    let mut rng = StdRng::seed_from_u64(42);

    let result = IsolationForest::fit(&data, &ForestParams::default(), &mut rng);
    assert!(matches!(result, Err(DetectorError::InvalidTrainingData(_))));
}

#[test]
fn test_fit_rejects_ragged_and_non_finite() {
    let mut rng = StdRng::seed_from_u64(42);

    let ragged = vec![vec![1.0, 2.0], vec![1.0]];
    let result = IsolationForest::fit(&ragged, &ForestParams::default(), &mut rng);
    assert!(matches!(result, Err(DetectorError::InvalidTrainingData(_))));

    let nan = vec![vec![1.0, 2.0], vec![f64::NAN, 2.0]];
    let result = IsolationForest::fit(&nan, &ForestParams::default(), &mut rng);
    assert!(matches!(result, Err(DetectorError::InvalidTrainingData(_))));
}

#[test]
fn test_fit_rejects_unsplittable_span() {
    let mut rng = StdRng::seed_from_u64(42);

    // Each value is finite but max - min overflows to infinity
    let wide = vec![vec![-1.5e308, 8.0], vec![1.5e308, 8.5], vec![7.0, 9.0]];
    let result = IsolationForest::fit(&wide, &ForestParams::default(), &mut rng);
    assert!(matches!(result, Err(DetectorError::InvalidTrainingData(_))));

    let wide_but_ok = vec![vec![-1.0e307, 8.0], vec![1.0e307, 8.5], vec![7.0, 9.0]];
    assert!(IsolationForest::fit(&wide_but_ok, &ForestParams::default(), &mut rng).is_ok());
}

#[test]
fn test_fit_rejects_bad_params() {
    let data = cluster(10, 1);
    let mut rng = StdRng::seed_from_u64(42);

    let result = IsolationForest::fit(&data, &params(0, 10, 0.1), &mut rng);
    assert!(matches!(result, Err(DetectorError::InvalidConfig(_))));

    let result = IsolationForest::fit(&data, &params(10, 10, 0.9), &mut rng);
    assert!(matches!(result, Err(DetectorError::InvalidConfig(_))));
}

#[test]
fn test_subsample_capped_at_training_size() {
    let data = cluster(30, 2);
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(10, 256, 0.02), &mut rng).unwrap();

    assert_eq!(forest.num_trees(), 10);
    assert_eq!(forest.training_size(), 30);
    assert_eq!(forest.num_features(), 5);
    assert!(forest.trees().iter().all(|t| t.psi() == 30));
    assert_eq!(forest.mean_psi(), 30.0);
    assert!(forest.validate().is_ok());
}

#[test]
fn test_training_points_score_in_unit_interval() {
    let data = cluster(120, 3);
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(50, 64, 0.02), &mut rng).unwrap();

    for point in &data {
        let path = forest.average_path_length(point).unwrap();
        let score = forest.score(point).unwrap();
        assert!(path >= 0.0);
        assert!((0.0..=1.0).contains(&score), "score {}", score);
    }
}

#[test]
fn test_outlier_separated_from_cluster() {
    let data = cluster(200, 4);
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(100, 256, 0.02), &mut rng).unwrap();

    let normal = forest.score(&CENTER).unwrap();
    let outlier = forest.score(&[2.0, 1.0, 80.0, 90.0, 50.0]).unwrap();

    assert!(outlier > normal + 0.15, "outlier {} vs normal {}", outlier, normal);
    assert!(outlier > 0.6, "outlier {}", outlier);
    assert!(normal < 0.5, "normal {}", normal);
    assert!(forest.predict(&[2.0, 1.0, 80.0, 90.0, 50.0]).unwrap());
    assert!(!forest.predict(&CENTER).unwrap());
}

#[test]
fn test_same_seed_same_forest() {
    let data = cluster(80, 5);
    let p = params(20, 32, 0.05);

    let a = IsolationForest::fit(&data, &p, &mut StdRng::seed_from_u64(7)).unwrap();
    let b = IsolationForest::fit(&data, &p, &mut StdRng::seed_from_u64(7)).unwrap();
    let c = IsolationForest::fit(&data, &p, &mut StdRng::seed_from_u64(8)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_threshold_flags_at_most_contamination() {
    let data = cluster(200, 6);
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(100, 128, 0.05), &mut rng).unwrap();

    let flagged = data
        .iter()
        .filter(|p| forest.predict(p).unwrap())
        .count();
    assert!(flagged <= 10, "flagged {}", flagged);
    assert!(flagged >= 1, "flagged {}", flagged);
}

#[test]
fn test_score_dimension_mismatch() {
    let data = cluster(20, 7);
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(5, 16, 0.1), &mut rng).unwrap();

    let result = forest.score(&[7.0, 8.0, 20.0]);
    assert!(matches!(result, Err(DetectorError::ModelState(_))));
}

#[test]
fn test_score_zero_tree_forest() {
    let forest: IsolationForest = serde_json::from_value(serde_json::json!({
        "trees": [],
        "num_features": 5,
        "training_size": 10,
        "contamination": 0.02,
        "threshold": 0.6
    }))
    .unwrap();

    let result = forest.score(&CENTER);
    assert!(matches!(result, Err(DetectorError::ModelState(_))));
    assert!(forest.validate().is_err());
}

#[test]
fn test_single_point_training() {
    let data = vec![CENTER.to_vec()];
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(10, 256, 0.02), &mut rng).unwrap();

    for tree in forest.trees() {
        assert_eq!(tree.root(), &Node::Leaf { size: 1, depth: 0 });
    }
    assert_eq!(forest.score(&CENTER).unwrap(), 0.5);
    assert!(!forest.predict(&[0.0, 0.0, 0.0, 0.0, 0.0]).unwrap());
}

#[test]
fn test_identical_points_never_flag_training_value() {
    let data = vec![CENTER.to_vec(); 40];
    let mut rng = StdRng::seed_from_u64(42);
    let forest = IsolationForest::fit(&data, &params(10, 256, 0.02), &mut rng).unwrap();

    assert!(!forest.predict(&CENTER).unwrap());
}
