use super::*;

fn square() -> (Matrix<f64>, Vector<f64>) {
    let x = Matrix::from_rows(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).expect("4x2");
    let y = Vector::from_slice(&[0.0, 0.0, 1.0, 1.0]);
    (x, y)
}

fn clusters() -> (Matrix<f64>, Vector<f64>) {
    let x = Matrix::from_vec(
        6,
        2,
        vec![0.0, 0.0, 0.1, 0.1, 0.2, 0.2, 100.0, 100.0, 100.1, 100.1, 100.2, 100.2],
    )
    .expect("6x2");
    let y = Vector::from_slice(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    (x, y)
}

#[test]
fn test_zero_k_rejected() {
    for err in [
        KNeighborsClassifier::new(0).expect_err("k = 0"),
        KNeighborsRegressor::new(0).expect_err("k = 0"),
    ] {
        assert!(err.is_configuration());
    }
}

#[test]
fn test_nearest_corner() {
    let (x, y) = square();
    let mut knn = KNeighborsClassifier::new(1).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");

    let query = Matrix::from_rows(&[[0.1, 0.1]]).expect("1x2");
    assert_eq!(knn.predict(&query).expect("fitted").as_slice(), &[0.0]);
}

#[test]
fn test_k1_reproduces_training_targets() {
    let (x, y) = square();
    let mut knn = KNeighborsClassifier::new(1).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");
    assert_eq!(knn.predict(&x).expect("fitted"), y);
    assert_eq!(knn.score(&x, &y).expect("aligned"), 1.0);

    let targets = Vector::from_slice(&[0.5, -1.25, 3.0, 7.5]);
    let mut reg = KNeighborsRegressor::new(1).expect("k >= 1");
    reg.fit(&x, &targets).expect("valid training data");
    for i in 0..4 {
        let row = Matrix::from_vec(1, 2, x.row_slice(i).to_vec()).expect("1x2");
        assert_eq!(reg.predict(&row).expect("fitted")[0], targets[i]);
    }
}

#[test]
fn test_separable_clusters() {
    let (x, y) = clusters();
    let mut knn = KNeighborsClassifier::new(3).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");
    assert_eq!(knn.predict(&x).expect("fitted"), y);

    let queries = Matrix::from_vec(3, 2, vec![0.2, 0.2, 3.0, 3.0, 99.0, 99.0]).expect("3x2");
    let preds = knn.predict(&queries).expect("fitted");
    assert_eq!(preds.as_slice(), &[0.0, 0.0, 1.0]);
}

#[test]
fn test_vote_tie_goes_to_lowest_label() {
    // Two neighbors per class at equal distance from the origin.
    let x = Matrix::from_rows(&[[1.0], [-1.0], [2.0], [-2.0]]).expect("4x1");
    let y = Vector::from_slice(&[3.0, 3.0, 1.0, 1.0]);
    let mut knn = KNeighborsClassifier::new(4).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");

    let origin = Matrix::from_rows(&[[0.0]]).expect("1x1");
    assert_eq!(knn.predict(&origin).expect("fitted")[0], 1.0);
}

#[test]
fn test_majority_vote() {
    assert_eq!(majority_vote(&[2.0, 0.0, 2.0]), 2.0);
    assert_eq!(majority_vote(&[5.0, 4.0]), 4.0);
    assert_eq!(majority_vote(&[7.0]), 7.0);
}

#[test]
fn test_distance_ties_keep_training_order() {
    let x = Matrix::from_rows(&[[1.0], [-1.0], [1.0], [5.0]]).expect("4x1");
    let y = Vector::from_slice(&[10.0, 20.0, 30.0, 40.0]);
    let mut engine = NeighborEngine::new(2).expect("k >= 1");
    engine.fit(&x, &y).expect("valid training data");

    let origin = Matrix::from_rows(&[[0.0]]).expect("1x1");
    let neighbors = engine.kneighbors(&origin).expect("fitted");
    let indices: Vec<usize> = neighbors[0].iter().map(|n| n.index).collect();
    assert_eq!(indices, vec![0, 1]);
    assert_eq!(neighbors[0][0].distance, 1.0);
}

#[test]
fn test_kneighbors_sorted_by_distance() {
    let (x, y) = square();
    let mut engine = NeighborEngine::new(4).expect("k >= 1");
    engine.fit(&x, &y).expect("valid training data");

    let query = Matrix::from_rows(&[[0.9, 0.8]]).expect("1x2");
    let neighbors = engine.kneighbors(&query).expect("fitted");
    assert_eq!(neighbors[0].len(), 4);
    assert_eq!(neighbors[0][0].index, 3);
    for pair in neighbors[0].windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn test_regressor_mean() {
    let x = Matrix::from_rows(&[[0.0], [1.0], [2.0], [10.0]]).expect("4x1");
    let y = Vector::from_slice(&[1.0, 2.0, 6.0, 100.0]);
    let mut reg = KNeighborsRegressor::new(3).expect("k >= 1");
    reg.fit(&x, &y).expect("valid training data");

    let query = Matrix::from_rows(&[[1.0]]).expect("1x1");
    assert!((reg.predict(&query).expect("fitted")[0] - 3.0).abs() < 1e-12);
}

#[test]
fn test_regressor_score_is_r_squared() {
    let x = Matrix::from_rows(&[[0.0], [1.0], [2.0], [3.0]]).expect("4x1");
    let y = Vector::from_slice(&[0.0, 1.0, 2.0, 3.0]);
    let mut reg = KNeighborsRegressor::new(1).expect("k >= 1");
    reg.fit(&x, &y).expect("valid training data");
    assert!((reg.score(&x, &y).expect("defined") - 1.0).abs() < 1e-12);

    let flat = Vector::from_slice(&[2.0, 2.0, 2.0, 2.0]);
    assert!(matches!(
        reg.score(&x, &flat),
        Err(YlearnError::UndefinedMetric { .. })
    ));
}

#[test]
fn test_k_larger_than_training_set() {
    let (x, y) = square();
    let mut knn = KNeighborsClassifier::new(5).expect("k >= 1");
    let err = knn.fit(&x, &y).expect_err("k > n_samples");
    assert!(matches!(err, YlearnError::InvalidHyperparameter { .. }));
    assert!(!knn.is_fitted());
}

#[test]
fn test_k_equal_to_training_set() {
    let (x, y) = square();
    let mut reg = KNeighborsRegressor::new(4).expect("k >= 1");
    reg.fit(&x, &y).expect("k == n_samples is allowed");
    let query = Matrix::from_rows(&[[5.0, 5.0]]).expect("1x2");
    assert!((reg.predict(&query).expect("fitted")[0] - 0.5).abs() < 1e-12);
}

#[test]
fn test_invalid_labels() {
    let (x, _) = square();
    for bad in [-1.0, 0.5, f64::NAN] {
        let y = Vector::from_slice(&[0.0, 1.0, bad, 1.0]);
        let mut knn = KNeighborsClassifier::new(1).expect("k >= 1");
        let err = knn.fit(&x, &y).expect_err("not a label code");
        assert!(matches!(err, YlearnError::InvalidLabel { index: 2, .. }));
    }
}

#[test]
fn test_predict_before_fit() {
    let query = Matrix::from_rows(&[[0.0, 0.0]]).expect("1x2");
    assert!(matches!(
        KNeighborsClassifier::new(1).expect("k >= 1").predict(&query),
        Err(YlearnError::NotFitted {
            estimator: "KNeighborsClassifier"
        })
    ));
    assert!(NeighborEngine::new(1)
        .expect("k >= 1")
        .kneighbors(&query)
        .is_err());
}

#[test]
fn test_feature_mismatch() {
    let (x, y) = square();
    let mut knn = KNeighborsRegressor::new(2).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");

    let query = Matrix::from_rows(&[[0.0, 0.0, 0.0]]).expect("1x3");
    assert!(matches!(
        knn.predict(&query),
        Err(YlearnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_fit_validation() {
    let mut knn = KNeighborsRegressor::new(1).expect("k >= 1");
    let empty = Matrix::zeros(0, 2);
    assert!(matches!(
        knn.fit(&empty, &Vector::zeros(0)),
        Err(YlearnError::EmptyInput { .. })
    ));

    let (x, _) = square();
    assert!(matches!(
        knn.fit(&x, &Vector::from_slice(&[1.0])),
        Err(YlearnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_fit_copies_training_data() {
    let (mut x, y) = square();
    let mut knn = KNeighborsClassifier::new(1).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");

    x.set(0, 0, 50.0);
    let query = Matrix::from_rows(&[[0.0, 0.0]]).expect("1x2");
    assert_eq!(knn.predict(&query).expect("fitted")[0], 0.0);
    assert_eq!(knn.engine().n_samples(), 4);
}

#[test]
fn test_refit_replaces_training_set() {
    let (x, y) = square();
    let mut knn = KNeighborsClassifier::new(1).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");

    let flipped = Vector::from_slice(&[1.0, 1.0, 0.0, 0.0]);
    knn.fit(&x, &flipped).expect("valid training data");
    assert_eq!(knn.predict(&x).expect("fitted"), flipped);
}

#[test]
fn test_empty_query_batch() {
    let (x, y) = square();
    let mut knn = KNeighborsClassifier::new(2).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");
    assert!(knn.predict(&Matrix::zeros(0, 2)).expect("fitted").is_empty());
}

#[test]
fn test_large_label_codes_survive_the_vote() {
    let x = Matrix::from_rows(&[[0.0], [10.0]]).expect("2x1");
    let y = Vector::from_slice(&[1e20, 0.0]);
    let mut knn = KNeighborsClassifier::new(1).expect("k >= 1");
    knn.fit(&x, &y).expect("integer labels");

    assert_eq!(knn.predict(&x).expect("fitted"), y);
    assert_eq!(knn.score(&x, &y).expect("aligned"), 1.0);
    assert_eq!(majority_vote(&[1e20, 3.0, 1e20]), 1e20);
    assert_eq!(majority_vote(&[-0.0, 0.0, 2.0]), 0.0);
}

#[test]
fn test_serialized_state_round_trips() {
    let (x, y) = square();
    let mut knn = KNeighborsClassifier::new(3).expect("k >= 1");
    knn.fit(&x, &y).expect("valid training data");

    let json = serde_json::to_string(&knn).expect("serialize");
    let restored: KNeighborsClassifier = serde_json::from_str(&json).expect("valid state");
    assert_eq!(restored, knn);

    let unfitted = serde_json::to_string(&KNeighborsRegressor::new(2).expect("k >= 1"))
        .expect("serialize");
    let restored: KNeighborsRegressor = serde_json::from_str(&unfitted).expect("valid state");
    assert!(!restored.is_fitted());
}

#[test]
fn test_invalid_serialized_state_rejected() {
    let x = r#"{"data":[0.0,1.0],"rows":2,"cols":1}"#;
    let y2 = r#"{"data":[0.0,1.0]}"#;
    let engine = |k: usize, x: &str, y: &str| format!(r#"{{"k":{k},"x_train":{x},"y_train":{y}}}"#);

    let bad_regressors = [
        // k = 0
        format!(r#"{{"engine":{}}}"#, engine(0, x, y2)),
        // k larger than the training set
        format!(r#"{{"engine":{}}}"#, engine(3, x, y2)),
        // fewer targets than rows
        format!(r#"{{"engine":{}}}"#, engine(1, x, r#"{"data":[0.0]}"#)),
        // features without targets
        format!(r#"{{"engine":{}}}"#, engine(1, x, "null")),
        // data length disagrees with the shape
        format!(
            r#"{{"engine":{}}}"#,
            engine(1, r#"{"data":[0.0],"rows":2,"cols":1}"#, y2)
        ),
    ];
    for json in &bad_regressors {
        assert!(
            serde_json::from_str::<KNeighborsRegressor>(json).is_err(),
            "accepted {json}"
        );
    }

    let bad_labels = format!(
        r#"{{"engine":{}}}"#,
        engine(1, x, r#"{"data":[0.5,1.0]}"#)
    );
    assert!(serde_json::from_str::<KNeighborsRegressor>(&bad_labels).is_ok());
    assert!(serde_json::from_str::<KNeighborsClassifier>(&bad_labels).is_err());
}
