//! Classification metrics for evaluating classifier performance.
//!
//! Provides accuracy, precision, recall, F1-score, and confusion matrix
//! computation for multi-class classification tasks.

use crate::primitives::Matrix;

/// Averaging strategy for multi-class metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Average {
    /// Calculate metrics for each label, return unweighted mean.
    Macro,
    /// Calculate metrics globally by counting total TP, FP, FN.
    Micro,
    /// Weighted mean by support (number of true instances per label).
    Weighted,
}

/// Computes classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use aprendiz::metrics::accuracy;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// assert!((accuracy(&y_pred, &y_true) - 0.333333).abs() < 0.001);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

/// Per-class true positive, false positive, false negative, and
/// support counts, indexed by class label.
fn per_class_counts(
    y_pred: &[usize],
    y_true: &[usize],
    n_classes: usize,
) -> (Vec<usize>, Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut tp = vec![0_usize; n_classes];
    let mut fp = vec![0_usize; n_classes];
    let mut fn_counts = vec![0_usize; n_classes];
    let mut support = vec![0_usize; n_classes];

    for (&pred, &truth) in y_pred.iter().zip(y_true.iter()) {
        support[truth] += 1;
        if pred == truth {
            tp[truth] += 1;
        } else {
            fp[pred] += 1;
            fn_counts[truth] += 1;
        }
    }
    (tp, fp, fn_counts, support)
}

/// Averages per-class scores according to the strategy. Classes with a
/// zero denominator score 0.0.
fn average_scores(
    numerators: &[usize],
    denominators: &[usize],
    support: &[usize],
    average: Average,
) -> f32 {
    let n_classes = numerators.len();
    let class_score = |i: usize| -> f32 {
        if denominators[i] == 0 {
            0.0
        } else {
            numerators[i] as f32 / denominators[i] as f32
        }
    };

    match average {
        Average::Micro => {
            let total_num: usize = numerators.iter().sum();
            let total_den: usize = denominators.iter().sum();
            if total_den == 0 {
                0.0
            } else {
                total_num as f32 / total_den as f32
            }
        }
        Average::Macro => {
            (0..n_classes).map(class_score).sum::<f32>() / n_classes as f32
        }
        Average::Weighted => {
            let total_support: usize = support.iter().sum();
            if total_support == 0 {
                return 0.0;
            }
            (0..n_classes)
                .map(|i| class_score(i) * support[i] as f32 / total_support as f32)
                .sum()
        }
    }
}

fn n_classes_of(y_pred: &[usize], y_true: &[usize]) -> usize {
    y_true
        .iter()
        .chain(y_pred.iter())
        .max()
        .map_or(0, |&m| m + 1)
}

/// Computes precision.
///
/// precision = TP / (TP + FP), averaged per `average`. Classes never
/// predicted contribute 0.0.
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use aprendiz::metrics::{precision, Average};
///
/// let y_true = vec![0, 1, 1, 0];
/// let y_pred = vec![0, 1, 0, 0];
/// let p = precision(&y_pred, &y_true, Average::Macro);
/// assert!((0.0..=1.0).contains(&p));
/// ```
#[must_use]
pub fn precision(y_pred: &[usize], y_true: &[usize], average: Average) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let n_classes = n_classes_of(y_pred, y_true);
    let (tp, fp, _, support) = per_class_counts(y_pred, y_true, n_classes);
    let denominators: Vec<usize> = tp.iter().zip(fp.iter()).map(|(a, b)| a + b).collect();
    average_scores(&tp, &denominators, &support, average)
}

/// Computes recall.
///
/// recall = TP / (TP + FN), averaged per `average`. Classes absent from
/// `y_true` contribute 0.0.
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn recall(y_pred: &[usize], y_true: &[usize], average: Average) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let n_classes = n_classes_of(y_pred, y_true);
    let (tp, _, fn_counts, support) = per_class_counts(y_pred, y_true, n_classes);
    let denominators: Vec<usize> = tp
        .iter()
        .zip(fn_counts.iter())
        .map(|(a, b)| a + b)
        .collect();
    average_scores(&tp, &denominators, &support, average)
}

/// Computes the F1-score, the harmonic mean of precision and recall.
///
/// F1 = 2 * (precision * recall) / (precision + recall), per class,
/// then averaged per `average`. A class with zero precision and recall
/// scores 0.0.
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn f1_score(y_pred: &[usize], y_true: &[usize], average: Average) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let n_classes = n_classes_of(y_pred, y_true);
    let (tp, fp, fn_counts, support) = per_class_counts(y_pred, y_true, n_classes);

    let class_f1 = |i: usize| -> f32 {
        let p_den = tp[i] + fp[i];
        let r_den = tp[i] + fn_counts[i];
        if p_den == 0 || r_den == 0 {
            return 0.0;
        }
        let p = tp[i] as f32 / p_den as f32;
        let r = tp[i] as f32 / r_den as f32;
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    };

    match average {
        Average::Micro => {
            // Micro-F1 equals micro precision equals micro recall.
            let total_tp: usize = tp.iter().sum();
            let total_fp: usize = fp.iter().sum();
            let total_fn: usize = fn_counts.iter().sum();
            let denom = 2 * total_tp + total_fp + total_fn;
            if denom == 0 {
                0.0
            } else {
                2.0 * total_tp as f32 / denom as f32
            }
        }
        Average::Macro => (0..n_classes).map(class_f1).sum::<f32>() / n_classes as f32,
        Average::Weighted => {
            let total_support: usize = support.iter().sum();
            if total_support == 0 {
                return 0.0;
            }
            (0..n_classes)
                .map(|i| class_f1(i) * support[i] as f32 / total_support as f32)
                .sum()
        }
    }
}

/// Computes the confusion matrix.
///
/// Entry `(i, j)` counts samples with true class `i` predicted as
/// class `j`. The matrix is square with side `max_label + 1`.
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use aprendiz::metrics::confusion_matrix;
///
/// let y_true = vec![0, 1, 1];
/// let y_pred = vec![0, 1, 0];
/// let cm = confusion_matrix(&y_pred, &y_true);
/// assert_eq!(cm.get(1, 0), 1);
/// ```
#[must_use]
pub fn confusion_matrix(y_pred: &[usize], y_true: &[usize]) -> Matrix<usize> {
    assert_eq!(y_pred.len(), y_true.len(), "Slices must have same length");
    assert!(!y_true.is_empty(), "Slices cannot be empty");

    let n_classes = n_classes_of(y_pred, y_true);
    let mut counts = vec![0_usize; n_classes * n_classes];
    for (&pred, &truth) in y_pred.iter().zip(y_true.iter()) {
        counts[truth * n_classes + pred] += 1;
    }
    Matrix::from_vec(n_classes, n_classes, counts)
        .expect("confusion matrix dimensions always match data length")
}
