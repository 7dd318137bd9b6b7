//! Linear models for regression.
//!
//! Includes Ordinary Least Squares (OLS) linear regression.

use crate::error::{AprendizError, Result};
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares
/// between observed and predicted targets:
///
/// ```text
/// y = X β + ε
/// ```
///
/// # Solver
///
/// Normal equations `β = (XᵀX)⁻¹ Xᵀy`, solved via Cholesky
/// decomposition on the intercept-augmented design matrix.
///
/// # Examples
///
/// ```
/// use aprendiz::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y) > 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
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

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Adds an intercept column of ones to the design matrix.
    fn add_intercept_column(x: &Matrix<f32>) -> Matrix<f32> {
        let (n_rows, n_cols) = x.shape();
        let mut data = Vec::with_capacity(n_rows * (n_cols + 1));

        for i in 0..n_rows {
            data.push(1.0);
            data.extend_from_slice(x.row(i));
        }

        Matrix::from_vec(n_rows, n_cols + 1, data)
            .expect("design matrix dimensions always match data length")
    }
}

impl Estimator for LinearRegression {
    /// Fits the model via the normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match, there are no
    /// samples, the system is underdetermined, or the normal matrix is
    /// singular.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
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

        let required_samples = if self.fit_intercept {
            n_features + 1
        } else {
            n_features
        };
        if n_samples < required_samples {
            return Err(AprendizError::InvalidHyperparameter {
                param: "n_samples".to_string(),
                value: n_samples.to_string(),
                constraint: format!("n_samples >= {required_samples} (underdetermined system)"),
            });
        }

        let design = if self.fit_intercept {
            Self::add_intercept_column(x)
        } else {
            x.clone()
        };

        let design_t = design.transpose();
        let xtx = design_t
            .matmul(&design)
            .map_err(|e| AprendizError::Other(e.to_string()))?;
        let xty = design_t
            .matvec(y)
            .map_err(|e| AprendizError::Other(e.to_string()))?;

        let beta = xtx.cholesky_solve(&xty).map_err(|e| {
            AprendizError::SingularMatrix {
                context: format!("normal equations: {e}"),
            }
        })?;

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some(Vector::from_slice(&beta.as_slice()[1..]));
        } else {
            self.intercept = 0.0;
            self.coefficients = Some(beta);
        }
        Ok(())
    }

    /// Predicts target values.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted or the feature count doesn't
    /// match the training data.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let coef = self
            .coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.");
        let (n_samples, n_features) = x.shape();
        assert_eq!(
            n_features,
            coef.len(),
            "Feature count must match training data"
        );

        let predictions: Vec<f32> = (0..n_samples)
            .map(|row| {
                self.intercept
                    + x.row(row)
                        .iter()
                        .zip(coef.as_slice().iter())
                        .map(|(a, b)| a * b)
                        .sum::<f32>()
            })
            .collect();
        Vector::from_vec(predictions)
    }

    /// Computes R² on test data.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let predictions = self.predict(x);
        r_squared(&predictions, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_exact_line() {
        // y = 2x + 1, no noise
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("matrix");
        let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit should succeed");

        assert!((model.coefficients()[0] - 2.0).abs() < 1e-3);
        assert!((model.intercept() - 1.0).abs() < 1e-3);
        assert!(model.score(&x, &y) > 0.999);
    }

    #[test]
    fn test_fit_two_features() {
        // y = x0 + 2*x1
        let x = Matrix::from_vec(
            4,
            2,
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0],
        )
        .expect("matrix");
        let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit should succeed");

        let predictions = model.predict(&x);
        for (pred, truth) in predictions.iter().zip(y.iter()) {
            assert!((pred - truth).abs() < 1e-2);
        }
    }

    #[test]
    fn test_fit_without_intercept() {
        // y = 3x through the origin
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("matrix");
        let y = Vector::from_slice(&[3.0, 6.0, 9.0]);

        let mut model = LinearRegression::new().with_intercept(false);
        model.fit(&x, &y).expect("fit should succeed");

        assert_eq!(model.intercept(), 0.0);
        assert!((model.coefficients()[0] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_dimension_mismatch_fails() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("matrix");
        let y = Vector::from_slice(&[1.0, 2.0]);
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_fit_underdetermined_fails() {
        let x = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("matrix");
        let y = Vector::from_slice(&[1.0, 2.0]);
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_is_fitted() {
        let mut model = LinearRegression::new();
        assert!(!model.is_fitted());
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("matrix");
        let y = Vector::from_slice(&[1.0, 2.0, 3.0]);
        model.fit(&x, &y).expect("fit should succeed");
        assert!(model.is_fitted());
    }

    #[test]
    #[should_panic(expected = "not fitted")]
    fn test_predict_before_fit_panics() {
        let model = LinearRegression::new();
        let x = Matrix::from_vec(1, 1, vec![1.0]).expect("matrix");
        let _ = model.predict(&x);
    }
}
