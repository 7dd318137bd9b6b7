//! End-to-end pipeline tests: CSV ingestion through model training,
//! evaluation, and persistence.

use aprendiz::prelude::*;
use std::io::Write;
use std::path::PathBuf;

/// Writes a small two-cluster classification dataset to a CSV file.
fn write_classification_csv(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("points.csv");
    let mut file = std::fs::File::create(&path).expect("create file");
    writeln!(file, "x1,x2,label").expect("write");
    // Class 0 clusters near the origin, class 1 near (10, 10).
    let rows = [
        (0.5, 1.0, 0),
        (1.0, 0.5, 0),
        (1.5, 1.5, 0),
        (0.0, 0.8, 0),
        (9.5, 10.0, 1),
        (10.0, 9.0, 1),
        (10.5, 10.5, 1),
        (9.0, 9.8, 1),
    ];
    for (a, b, label) in rows {
        writeln!(file, "{a},{b},{label}").expect("write");
    }
    path
}

#[test]
fn test_csv_to_decision_tree_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_classification_csv(&dir);

    let df = DataFrame::from_csv(&path).expect("valid CSV");
    assert_eq!(df.shape(), (8, 3));

    let x = df.select(&["x1", "x2"]).expect("feature columns").to_matrix();
    let y = df.labels("label").expect("label column");

    let mut model = DecisionTreeClassifier::new().with_max_depth(3);
    model.fit(&x, &y).expect("fit should succeed");

    let predictions = model.predict(&x).expect("predict");
    assert_eq!(predictions, y, "separable clusters classify perfectly");
    assert!((accuracy(&predictions, &y) - 1.0).abs() < 1e-6);

    let cm = confusion_matrix(&predictions, &y);
    assert_eq!(cm.get(0, 0), 4);
    assert_eq!(cm.get(1, 1), 4);
    assert_eq!(cm.get(0, 1), 0);
    assert_eq!(cm.get(1, 0), 0);
}

#[test]
fn test_tree_save_load_roundtrip_keeps_predictions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_classification_csv(&dir);

    let df = DataFrame::from_csv(&path).expect("valid CSV");
    let x = df.select(&["x1", "x2"]).expect("feature columns").to_matrix();
    let y = df.labels("label").expect("label column");

    let mut model = DecisionTreeClassifier::new().with_max_depth(3);
    model.fit(&x, &y).expect("fit should succeed");

    let model_path = dir.path().join("tree.bin");
    model.save(&model_path).expect("save should succeed");
    let restored = DecisionTreeClassifier::load(&model_path).expect("load should succeed");

    assert_eq!(
        model.predict(&x).expect("predict"),
        restored.predict(&x).expect("predict")
    );
}

#[test]
fn test_csv_to_logistic_regression_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_classification_csv(&dir);

    let df = DataFrame::from_csv(&path).expect("valid CSV");
    let x = df.select(&["x1", "x2"]).expect("feature columns").to_matrix();
    let y = df.labels("label").expect("label column");

    let mut model = LogisticRegression::new()
        .with_learning_rate(0.1)
        .with_max_iter(5000);
    model.fit(&x, &y).expect("fit should succeed");

    let predictions = model.predict(&x);
    assert_eq!(predictions, y, "well separated clusters classify perfectly");
    assert!(f1_score(&predictions, &y, Average::Macro) > 0.99);
}

#[test]
fn test_csv_to_linear_regression_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("line.csv");
    let mut file = std::fs::File::create(&path).expect("create file");
    writeln!(file, "x,y").expect("write");
    // y = 3x - 2 with no noise.
    for i in 0..6 {
        let x = i as f32;
        writeln!(file, "{x},{}", 3.0 * x - 2.0).expect("write");
    }
    drop(file);

    let df = DataFrame::from_csv(&path).expect("valid CSV");
    let x = df.select(&["x"]).expect("feature column").to_matrix();
    let y = df.column("y").expect("target column").clone();

    let mut model = LinearRegression::new();
    model.fit(&x, &y).expect("fit should succeed");

    assert!((model.coefficients()[0] - 3.0).abs() < 1e-2);
    assert!((model.intercept() + 2.0).abs() < 1e-2);

    let predictions = model.predict(&x);
    assert!(r_squared(&predictions, &y) > 0.999);
    assert!(rmse(&predictions, &y) < 0.1);
}

#[test]
fn test_pca_reduces_features_before_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_classification_csv(&dir);

    let df = DataFrame::from_csv(&path).expect("valid CSV");
    let x = df.select(&["x1", "x2"]).expect("feature columns").to_matrix();
    let y = df.labels("label").expect("label column");

    let mut pca = Pca::new().with_n_components(1);
    let reduced = pca.fit_transform(&x).expect("fit_transform");
    assert_eq!(reduced.shape(), (8, 1));

    // The clusters stay separable on the dominant axis.
    let mut model = DecisionTreeClassifier::new().with_max_depth(2);
    model.fit(&reduced, &y).expect("fit should succeed");
    assert_eq!(model.predict(&reduced).expect("predict"), y);

    let ratio = pca.explained_variance_ratio().expect("fitted");
    assert!(ratio[0] > 0.9, "cluster offset dominates the variance");
}
