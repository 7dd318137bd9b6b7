//! Core traits for estimators and transformers.
//!
//! These traits define the API contracts shared by the algorithms in
//! this crate, following sklearn's fit/predict/transform conventions.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised learning estimators with real-valued targets.
///
/// # Examples
///
/// ```
/// use aprendiz::prelude::*;
///
/// // Training data: y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
/// let score = model.score(&x, &y);
/// assert!(score > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, singular
    /// matrix, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Computes the score (R² for regression).
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32;
}

/// Trait for data transformers (dimensionality reduction, scalers, etc.).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted or dimensions
    /// don't match.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting or transforming fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AprendizError;

    // Minimal transformer to exercise the trait's default method.
    struct Centering {
        mean: Option<f32>,
    }

    impl Transformer for Centering {
        fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
            if x.n_rows() == 0 {
                return Err(AprendizError::empty_input("transformer input"));
            }
            let total = (x.n_rows() * x.n_cols()) as f32;
            self.mean = Some(x.as_slice().iter().sum::<f32>() / total);
            Ok(())
        }

        fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
            let mean = self
                .mean
                .ok_or_else(|| AprendizError::not_fitted("Centering"))?;
            let data: Vec<f32> = x.as_slice().iter().map(|v| v - mean).collect();
            Matrix::from_vec(x.n_rows(), x.n_cols(), data)
                .map_err(|e| AprendizError::Other(e.to_string()))
        }
    }

    #[test]
    fn test_fit_transform_default_method() {
        let mut t = Centering { mean: None };
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("matrix");
        let out = t.fit_transform(&x).expect("fit_transform should succeed");
        assert!((out.get(0, 0) + 1.5).abs() < 1e-6);
        assert!((out.get(1, 1) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let t = Centering { mean: None };
        let x = Matrix::zeros(1, 1);
        let err = t.transform(&x).unwrap_err();
        assert!(err.to_string().contains("not fitted"));
    }

    #[test]
    fn test_fit_transform_propagates_fit_error() {
        let mut t = Centering { mean: None };
        let x = Matrix::from_vec(0, 2, vec![]).expect("matrix");
        assert!(t.fit_transform(&x).is_err());
    }
}
