//! Decision tree classification.
//!
//! Implements a CART-style decision tree classifier that minimizes
//! weighted Gini impurity over exhaustive single-feature threshold
//! splits. Candidate thresholds are the observed feature values
//! themselves rather than midpoints, which guarantees the left
//! partition is never empty (the row whose value equals the threshold
//! always goes left) at the cost of asymmetric boundary semantics.
//!
//! # Example
//!
//! ```
//! use aprendiz::primitives::Matrix;
//! use aprendiz::tree::DecisionTreeClassifier;
//!
//! let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let y = vec![0, 0, 1, 1];
//!
//! let mut tree = DecisionTreeClassifier::new().with_max_depth(2);
//! tree.fit(&x, &y).unwrap();
//!
//! let predictions = tree.predict(&x).unwrap();
//! assert_eq!(predictions, vec![0, 0, 1, 1]);
//! ```

use crate::error::{AprendizError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Default depth bound, effectively unbounded for small datasets.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Internal node in a decision tree.
///
/// Carries a split condition (feature and threshold) and owns both
/// subtrees; there are no unary splits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class label for this leaf
    pub class_label: usize,
    /// Number of training samples that reached this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// A leaf has depth 0; an internal node has depth
    /// 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Collects the distinct class labels of all reachable leaves.
    fn gather_leaf_labels(&self, labels: &mut BTreeSet<usize>) {
        match self {
            TreeNode::Leaf(leaf) => {
                labels.insert(leaf.class_label);
            }
            TreeNode::Node(node) => {
                node.left.gather_leaf_labels(labels);
                node.right.gather_leaf_labels(labels);
            }
        }
    }
}

// ========================================================================
// Impurity / split engine
// ========================================================================

/// Gini impurity of a label set: 1 - sum(p_c^2).
///
/// Returns 0.0 for an empty set (its weight in a split is zero anyway).
fn gini_impurity(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let n = labels.len() as f32;
    let mut gini = 1.0;
    for count in counts.values() {
        let p = *count as f32 / n;
        gini -= p * p;
    }
    gini
}

/// Size-weighted Gini impurity of a binary partition.
fn gini_split(left_labels: &[usize], right_labels: &[usize]) -> f32 {
    let n_left = left_labels.len() as f32;
    let n_right = right_labels.len() as f32;
    let n_total = n_left + n_right;

    if n_total == 0.0 {
        return 0.0;
    }

    (n_left / n_total) * gini_impurity(left_labels)
        + (n_right / n_total) * gini_impurity(right_labels)
}

/// Sorted, deduplicated values of one feature column.
fn sorted_unique_values(x: &Matrix<f32>, feature_idx: usize) -> Vec<f32> {
    let mut values: Vec<f32> = (0..x.n_rows()).map(|i| x.get(i, feature_idx)).collect();
    values.sort_by(|a, b| a.partial_cmp(b).expect("feature values must not be NaN"));
    values.dedup();
    values
}

/// The winning split of an exhaustive candidate search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BestSplit {
    pub feature_idx: usize,
    pub threshold: f32,
    pub cost: f32,
}

/// Finds the (feature, threshold) pair with minimal weighted Gini cost.
///
/// Every distinct observed value of every column is a candidate
/// threshold; rows with `value <= threshold` go left. Candidates are
/// examined with the feature index ascending and thresholds ascending,
/// and only a strictly smaller cost replaces the incumbent, so the
/// first pair attaining the minimum wins ties.
///
/// Returns `None` when there is no candidate pair at all (a matrix
/// with zero columns or zero rows).
fn find_best_split(x: &Matrix<f32>, y: &[usize]) -> Option<BestSplit> {
    let (n_samples, n_features) = x.shape();
    let mut best: Option<BestSplit> = None;

    for feature_idx in 0..n_features {
        for &threshold in &sorted_unique_values(x, feature_idx) {
            let mut left_labels = Vec::new();
            let mut right_labels = Vec::new();
            for row in 0..n_samples {
                if x.get(row, feature_idx) <= threshold {
                    left_labels.push(y[row]);
                } else {
                    right_labels.push(y[row]);
                }
            }

            let cost = gini_split(&left_labels, &right_labels);
            let improves = match &best {
                Some(current) => cost < current.cost,
                None => true,
            };
            if improves {
                best = Some(BestSplit {
                    feature_idx,
                    threshold,
                    cost,
                });
            }
        }
    }

    best
}

// ========================================================================
// Mode resolver
// ========================================================================

/// Majority label of a non-empty label set.
///
/// Ties are broken by the first label, in vector order, whose total
/// count equals the maximum; later ties do not overwrite it.
///
/// # Panics
///
/// Panics if `labels` is empty. Callers guarantee non-emptiness.
fn mode(labels: &[usize]) -> usize {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let max_count = counts
        .values()
        .copied()
        .max()
        .expect("mode requires a non-empty label set");

    labels
        .iter()
        .copied()
        .find(|label| counts[label] == max_count)
        .expect("a label with the maximum count always exists")
}

// ========================================================================
// Tree builder
// ========================================================================

/// Partitions row indices by `x[row][feature] <= threshold`.
fn split_indices_by_threshold(
    x: &Matrix<f32>,
    feature_idx: usize,
    threshold: f32,
) -> (Vec<usize>, Vec<usize>) {
    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for row in 0..x.n_rows() {
        if x.get(row, feature_idx) <= threshold {
            left_indices.push(row);
        } else {
            right_indices.push(row);
        }
    }
    (left_indices, right_indices)
}

/// Copies the rows at `indices` into a new matrix and label vector.
fn split_data_by_indices(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
) -> (Matrix<f32>, Vec<usize>) {
    let n_cols = x.n_cols();
    let mut data = Vec::with_capacity(indices.len() * n_cols);
    let mut labels = Vec::with_capacity(indices.len());

    for &idx in indices {
        data.extend_from_slice(x.row(idx));
        labels.push(y[idx]);
    }

    let matrix = Matrix::from_vec(indices.len(), n_cols, data)
        .expect("subset data length always matches rows * cols");
    (matrix, labels)
}

/// Builds a decision tree recursively.
///
/// Stopping criteria, checked in order: depth bound reached, one or
/// fewer samples, all labels identical. Each produces a majority leaf.
/// A failed or degenerate split (one side empty, possible when a
/// column is constant) also falls back to a majority leaf.
fn build_tree(x: &Matrix<f32>, y: &[usize], depth: usize, max_depth: usize) -> TreeNode {
    let n_samples = y.len();

    let is_pure = y.iter().all(|&label| label == y[0]);
    if depth >= max_depth || n_samples <= 1 || is_pure {
        return TreeNode::Leaf(Leaf {
            class_label: mode(y),
            n_samples,
        });
    }

    let Some(split) = find_best_split(x, y) else {
        return TreeNode::Leaf(Leaf {
            class_label: mode(y),
            n_samples,
        });
    };

    let (left_indices, right_indices) =
        split_indices_by_threshold(x, split.feature_idx, split.threshold);
    if left_indices.is_empty() || right_indices.is_empty() {
        return TreeNode::Leaf(Leaf {
            class_label: mode(y),
            n_samples,
        });
    }

    let (left_x, left_y) = split_data_by_indices(x, y, &left_indices);
    let (right_x, right_y) = split_data_by_indices(x, y, &right_indices);

    let left = build_tree(&left_x, &left_y, depth + 1, max_depth);
    let right = build_tree(&right_x, &right_y, depth + 1, max_depth);

    TreeNode::Node(Node {
        feature_idx: split.feature_idx,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    })
}

// ========================================================================
// Classifier
// ========================================================================

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity as the splitting criterion and builds the tree
/// recursively down to `max_depth`. The fitted tree is owned
/// exclusively by the classifier and rebuilt from scratch on every
/// call to [`fit`](DecisionTreeClassifier::fit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: usize,
    /// Number of features the model was trained on (for validation)
    #[serde(default)]
    n_features: Option<usize>,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: DEFAULT_MAX_DEPTH,
            n_features: None,
        }
    }

    /// Sets the maximum depth of the tree.
    ///
    /// The root is at depth 0; no leaf ends up deeper than `depth`.
    /// A value of 0 is rejected by [`fit`](DecisionTreeClassifier::fit).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the configured maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Returns the fitted tree's root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Returns the distinct class labels among the fitted tree's
    /// leaves, ascending. This is the column order of
    /// [`predict_proba`](DecisionTreeClassifier::predict_proba).
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted.
    pub fn classes(&self) -> Result<Vec<usize>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("DecisionTreeClassifier"))?;
        let mut labels = BTreeSet::new();
        tree.gather_leaf_labels(&mut labels);
        Ok(labels.into_iter().collect())
    }

    /// Fits the decision tree to training data.
    ///
    /// Any previously fitted tree is discarded.
    ///
    /// # Arguments
    ///
    /// * `x` - Training features (n_samples × n_features)
    /// * `y` - Training labels (n_samples class indices)
    ///
    /// # Errors
    ///
    /// Returns an error if `max_depth` is 0, the row counts of `x` and
    /// `y` differ, or there are no samples.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        if self.max_depth == 0 {
            return Err(AprendizError::InvalidHyperparameter {
                param: "max_depth".to_string(),
                value: "0".to_string(),
                constraint: "max_depth >= 1".to_string(),
            });
        }

        let (n_rows, n_cols) = x.shape();
        if n_rows != y.len() {
            return Err(AprendizError::dimension_mismatch("rows", n_rows, y.len()));
        }
        if n_rows == 0 {
            return Err(AprendizError::empty_input("training labels"));
        }

        self.n_features = Some(n_cols);
        self.tree = Some(build_tree(x, y, 0, self.max_depth));
        Ok(())
    }

    /// Predicts class labels for samples.
    ///
    /// # Arguments
    ///
    /// * `x` - Feature matrix (n_samples × n_features)
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count
    /// doesn't match the training data.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("DecisionTreeClassifier"))?;
        self.check_feature_count(x)?;

        let (n_samples, _) = x.shape();
        let mut predictions = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            predictions.push(Self::predict_row(tree, x.row(row)));
        }
        Ok(predictions)
    }

    /// Predicts class probabilities for samples.
    ///
    /// The output has one column per distinct leaf label of the
    /// current tree (ascending; see
    /// [`classes`](DecisionTreeClassifier::classes)). Each row follows
    /// exactly one root-to-leaf path, so its single unit count
    /// normalizes to a one-hot distribution: 1.0 at the predicted
    /// class, 0.0 elsewhere. Leaf-internal label impurity is not
    /// blended in; this mirrors the plain-prediction pass and cannot
    /// express graded uncertainty.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count
    /// doesn't match the training data.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("DecisionTreeClassifier"))?;
        self.check_feature_count(x)?;

        let classes = self.classes()?;
        let (n_samples, _) = x.shape();
        let mut probabilities = Matrix::zeros(n_samples, classes.len());

        for row in 0..n_samples {
            // One unit count at the reached leaf, normalized by the total.
            let label = Self::predict_row(tree, x.row(row));
            let mut counts = vec![0.0_f32; classes.len()];
            if let Ok(col) = classes.binary_search(&label) {
                counts[col] += 1.0;
            }
            let total: f32 = counts.iter().sum();
            if total > 0.0 {
                for (col, count) in counts.iter().enumerate() {
                    probabilities.set(row, col, count / total);
                }
            }
        }

        Ok(probabilities)
    }

    /// Computes the accuracy score on test data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or dimensions don't
    /// match.
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        if y.is_empty() {
            return Err(AprendizError::empty_input("test labels"));
        }
        let predictions = self.predict(x)?;
        if predictions.len() != y.len() {
            return Err(AprendizError::dimension_mismatch(
                "rows",
                predictions.len(),
                y.len(),
            ));
        }
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, truth)| pred == truth)
            .count();
        Ok(correct as f32 / y.len() as f32)
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| AprendizError::Serialization(e.to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a model from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| AprendizError::Serialization(e.to_string()))
    }

    /// Root-to-leaf traversal for one sample.
    fn predict_row(tree: &TreeNode, sample: &[f32]) -> usize {
        let mut node = tree;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(internal) => {
                    if sample[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }

    fn check_feature_count(&self, x: &Matrix<f32>) -> Result<()> {
        if let Some(expected) = self.n_features {
            if x.n_cols() != expected {
                return Err(AprendizError::dimension_mismatch(
                    "features",
                    expected,
                    x.n_cols(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}
