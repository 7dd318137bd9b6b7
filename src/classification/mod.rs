//! Classification algorithms.
//!
//! Implements Logistic Regression for binary classification with
//! batch gradient descent and an optional F1-maximizing decision
//! threshold search.
//!
//! # Example
//!
//! ```
//! use aprendiz::classification::LogisticRegression;
//! use aprendiz::primitives::Matrix;
//!
//! let x = Matrix::from_vec(4, 1, vec![-2.0, -1.0, 1.0, 2.0]).unwrap();
//! let y = vec![0, 0, 1, 1];
//!
//! let mut model = LogisticRegression::new()
//!     .with_learning_rate(0.5)
//!     .with_max_iter(2000);
//! model.fit(&x, &y).unwrap();
//!
//! assert_eq!(model.predict(&x), vec![0, 0, 1, 1]);
//! ```

use crate::error::{AprendizError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};

/// Logistic Regression classifier for binary classification.
///
/// Uses sigmoid activation with batch gradient descent:
/// `θ ← θ − lr · Xᵀ(σ(Xθ) − y)/n`, iterated up to `max_iter` times
/// with early stopping once the gradient's largest component drops
/// below `tol`. Class labels must be 0 or 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Model coefficients (weights, excluding intercept)
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term
    intercept: f32,
    /// Learning rate for gradient descent
    learning_rate: f32,
    /// Maximum number of iterations
    max_iter: usize,
    /// Convergence tolerance on the gradient
    tol: f32,
    /// Decision threshold applied by predict()
    threshold: f32,
    /// Whether fit() searches for the F1-maximizing threshold
    optimize_threshold: bool,
}

impl LogisticRegression {
    /// Creates a new logistic regression classifier with default
    /// parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            learning_rate: 0.01,
            max_iter: 1000,
            tol: 1e-4,
            threshold: 0.5,
            optimize_threshold: false,
        }
    }

    /// Sets the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the decision threshold applied by
    /// [`predict`](LogisticRegression::predict).
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Enables or disables the post-fit F1-maximizing threshold search
    /// over the training data.
    #[must_use]
    pub fn with_optimize_threshold(mut self, optimize: bool) -> Self {
        self.optimize_threshold = optimize;
        self
    }

    /// Returns the current decision threshold.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Returns the coefficients (excluding intercept).
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f32> {
        self.coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Sigmoid activation: σ(z) = 1 / (1 + e^(-z))
    fn sigmoid(z: f32) -> f32 {
        1.0 / (1.0 + (-z).exp())
    }

    /// Fits the classifier with batch gradient descent.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match, there are no
    /// samples, a label is not 0/1, or the hyperparameters are
    /// invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples != y.len() {
            return Err(AprendizError::dimension_mismatch(
                "rows",
                n_samples,
                y.len(),
            ));
        }
        if n_samples == 0 {
            return Err(AprendizError::empty_input("training samples"));
        }
        if y.iter().any(|&label| label > 1) {
            return Err("LogisticRegression is binary: labels must be 0 or 1".into());
        }
        if self.learning_rate <= 0.0 {
            return Err(AprendizError::InvalidHyperparameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "learning_rate > 0".to_string(),
            });
        }

        // theta[0] is the intercept, theta[1..] the feature weights.
        let mut theta = vec![0.0_f32; n_features + 1];

        for _ in 0..self.max_iter {
            // Residuals sigma(X theta) - y per sample.
            let mut residuals = Vec::with_capacity(n_samples);
            for row in 0..n_samples {
                let mut z = theta[0];
                for (col, &value) in x.row(row).iter().enumerate() {
                    z += theta[col + 1] * value;
                }
                residuals.push(Self::sigmoid(z) - y[row] as f32);
            }

            let mut gradient = vec![0.0_f32; n_features + 1];
            for (row, &residual) in residuals.iter().enumerate() {
                gradient[0] += residual;
                for (col, &value) in x.row(row).iter().enumerate() {
                    gradient[col + 1] += residual * value;
                }
            }
            let n = n_samples as f32;
            for g in &mut gradient {
                *g /= n;
            }

            for (t, g) in theta.iter_mut().zip(gradient.iter()) {
                *t -= self.learning_rate * g;
            }

            let max_grad = gradient.iter().fold(0.0_f32, |acc, g| acc.max(g.abs()));
            if max_grad < self.tol {
                break;
            }
        }

        self.intercept = theta[0];
        self.coefficients = Some(Vector::from_slice(&theta[1..]));

        if self.optimize_threshold {
            self.optimize_threshold_on(x, y);
        }
        Ok(())
    }

    /// Predicts P(class 1) for each sample.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32> {
        let coef = self
            .coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.");
        let (n_samples, _) = x.shape();

        let mut probas = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            let mut z = self.intercept;
            for (col, &value) in x.row(row).iter().enumerate() {
                z += coef[col] * value;
            }
            probas.push(Self::sigmoid(z));
        }
        Vector::from_vec(probas)
    }

    /// Predicts class labels by applying the decision threshold to
    /// the probabilities.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        self.predict_proba(x)
            .iter()
            .map(|&p| usize::from(p >= self.threshold))
            .collect()
    }

    /// Computes accuracy on test data.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted or `y` is empty.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> f32 {
        assert!(!y.is_empty(), "Test labels cannot be empty");
        let predictions = self.predict(x);
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, truth)| pred == truth)
            .count();
        correct as f32 / y.len() as f32
    }

    /// Scans thresholds 0.00..=1.00 in steps of 0.01 and keeps the one
    /// maximizing F1 on the given data.
    fn optimize_threshold_on(&mut self, x: &Matrix<f32>, y: &[usize]) {
        let probas = self.predict_proba(x);

        let mut best_threshold = 0.5;
        let mut best_f1 = 0.0;

        for step in 0..=100 {
            let threshold = step as f32 / 100.0;

            let mut true_positive = 0_usize;
            let mut false_positive = 0_usize;
            let mut false_negative = 0_usize;
            for (&p, &truth) in probas.iter().zip(y.iter()) {
                let predicted = usize::from(p >= threshold);
                match (predicted, truth) {
                    (1, 1) => true_positive += 1,
                    (1, 0) => false_positive += 1,
                    (0, 1) => false_negative += 1,
                    _ => {}
                }
            }

            let precision = if true_positive + false_positive > 0 {
                true_positive as f32 / (true_positive + false_positive) as f32
            } else {
                0.0
            };
            let recall = if true_positive + false_negative > 0 {
                true_positive as f32 / (true_positive + false_negative) as f32
            } else {
                0.0
            };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            if f1 > best_f1 {
                best_f1 = f1;
                best_threshold = threshold;
            }
        }

        self.threshold = best_threshold;
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}
