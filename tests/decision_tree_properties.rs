//! Property-based tests using proptest.
//!
//! These tests verify invariants of the decision tree classifier over
//! randomly generated datasets.

use aprendiz::prelude::*;
use proptest::prelude::*;

// Strategy for generating small labeled datasets. Values are drawn
// from a small pool so duplicate rows and constant features occur.
fn dataset_strategy() -> impl Strategy<Value = (Matrix<f32>, Vec<usize>)> {
    (1_usize..20, 1_usize..5)
        .prop_flat_map(|(rows, cols)| {
            let values = proptest::sample::select(vec![-2.0_f32, -1.0, 0.0, 0.5, 1.0, 3.0]);
            (
                proptest::collection::vec(values, rows * cols),
                proptest::collection::vec(0_usize..4, rows),
                Just(rows),
                Just(cols),
            )
        })
        .prop_map(|(data, labels, rows, cols)| {
            let x = Matrix::from_vec(rows, cols, data).expect("Test data should be valid");
            (x, labels)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn tree_depth_never_exceeds_max_depth(
        (x, y) in dataset_strategy(),
        max_depth in 1_usize..6,
    ) {
        let mut model = DecisionTreeClassifier::new().with_max_depth(max_depth);
        model.fit(&x, &y).expect("fit should succeed");
        let root = model.root().expect("fitted tree has a root");
        prop_assert!(root.depth() <= max_depth);
    }

    #[test]
    fn predictions_come_from_training_labels((x, y) in dataset_strategy()) {
        let mut model = DecisionTreeClassifier::new();
        model.fit(&x, &y).expect("fit should succeed");
        let predictions = model.predict(&x).expect("predict should succeed");
        for pred in predictions {
            prop_assert!(y.contains(&pred));
        }
    }

    #[test]
    fn proba_rows_are_one_hot_and_stochastic((x, y) in dataset_strategy()) {
        let mut model = DecisionTreeClassifier::new();
        model.fit(&x, &y).expect("fit should succeed");
        let probas = model.predict_proba(&x).expect("predict_proba should succeed");
        let (n_rows, n_cols) = probas.shape();
        for row in 0..n_rows {
            let mut sum = 0.0_f32;
            let mut ones = 0_usize;
            for col in 0..n_cols {
                let p = probas.get(row, col);
                prop_assert!(p == 0.0 || p == 1.0);
                sum += p;
                if p == 1.0 {
                    ones += 1;
                }
            }
            prop_assert!((sum - 1.0).abs() < 1e-6);
            prop_assert_eq!(ones, 1);
        }
    }

    #[test]
    fn proba_argmax_matches_predict((x, y) in dataset_strategy()) {
        let mut model = DecisionTreeClassifier::new();
        model.fit(&x, &y).expect("fit should succeed");
        let classes = model.classes().expect("fitted");
        let predictions = model.predict(&x).expect("predict should succeed");
        let probas = model.predict_proba(&x).expect("predict_proba should succeed");
        for (row, &pred) in predictions.iter().enumerate() {
            let hot = (0..classes.len())
                .find(|&col| probas.get(row, col) == 1.0)
                .expect("one-hot row");
            prop_assert_eq!(classes[hot], pred);
        }
    }

    #[test]
    fn refitting_same_data_is_deterministic((x, y) in dataset_strategy()) {
        let mut a = DecisionTreeClassifier::new();
        let mut b = DecisionTreeClassifier::new();
        a.fit(&x, &y).expect("fit should succeed");
        b.fit(&x, &y).expect("fit should succeed");
        prop_assert_eq!(
            a.predict(&x).expect("predict"),
            b.predict(&x).expect("predict")
        );
    }

    #[test]
    fn single_class_data_yields_that_class(
        rows in 1_usize..10,
        label in 0_usize..5,
    ) {
        let data: Vec<f32> = (0..rows).map(|i| i as f32).collect();
        let x = Matrix::from_vec(rows, 1, data).expect("valid");
        let y = vec![label; rows];
        let mut model = DecisionTreeClassifier::new();
        model.fit(&x, &y).expect("fit should succeed");
        prop_assert_eq!(model.predict(&x).expect("predict"), y);
    }
}
