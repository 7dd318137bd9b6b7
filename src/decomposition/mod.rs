//! Dimensionality reduction.
//!
//! Implements Principal Component Analysis (PCA) via power iteration
//! with deflation on the covariance matrix.

use crate::error::{AprendizError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Transformer;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Iteration cap for the power method.
const POWER_ITERATIONS: usize = 300;
/// Convergence tolerance on the eigenvector update.
const POWER_TOLERANCE: f32 = 1e-10;

/// Principal Component Analysis.
///
/// Centers the data, forms the sample covariance matrix
/// `XᵀX / (n − 1)`, and extracts the leading eigenvectors with power
/// iteration plus deflation. Components are ordered by descending
/// eigenvalue. The random starting vectors are seeded, so fits are
/// deterministic for a given `random_state`.
///
/// # Examples
///
/// ```
/// use aprendiz::decomposition::Pca;
/// use aprendiz::prelude::*;
///
/// let x = Matrix::from_vec(4, 2, vec![
///     1.0, 1.0,
///     2.0, 2.0,
///     3.0, 3.0,
///     4.0, 4.0,
/// ]).unwrap();
///
/// let mut pca = Pca::new().with_n_components(1);
/// let projected = pca.fit_transform(&x).unwrap();
/// assert_eq!(projected.shape(), (4, 1));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pca {
    /// Principal axes, one row per component.
    components: Option<Matrix<f32>>,
    /// Per-feature training means used for centering.
    mean: Option<Vector<f32>>,
    /// Eigenvalues of the retained components, descending.
    explained_variance: Option<Vector<f32>>,
    /// Total variance across all features, for ratio computation.
    total_variance: f32,
    /// Number of components to keep.
    n_components: usize,
    /// Seed for the power iteration starting vectors.
    random_state: u64,
}

impl Pca {
    /// Creates a new PCA keeping 2 components by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: None,
            mean: None,
            explained_variance: None,
            total_variance: 0.0,
            n_components: 2,
            random_state: 42,
        }
    }

    /// Sets the number of components to keep.
    #[must_use]
    pub fn with_n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    /// Sets the seed for the power iteration starting vectors.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Returns true if the transformer has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.components.is_some()
    }

    /// Returns the principal axes, one row per component.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    pub fn components(&self) -> Result<&Matrix<f32>> {
        self.components
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("Pca"))
    }

    /// Returns the eigenvalues of the retained components, descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    pub fn explained_variance(&self) -> Result<&Vector<f32>> {
        self.explained_variance
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("Pca"))
    }

    /// Returns the fraction of total variance captured by each
    /// retained component.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    pub fn explained_variance_ratio(&self) -> Result<Vector<f32>> {
        let variances = self.explained_variance()?;
        if self.total_variance <= 0.0 {
            return Ok(Vector::zeros(variances.len()));
        }
        Ok(Vector::from_vec(
            variances.iter().map(|&v| v / self.total_variance).collect(),
        ))
    }

    /// Covariance matrix `XcᵀXc / (n − 1)` of centered data.
    fn covariance(centered: &Matrix<f32>) -> Matrix<f32> {
        let (n_rows, n_cols) = centered.shape();
        let mut cov = Matrix::zeros(n_cols, n_cols);
        for i in 0..n_cols {
            for j in i..n_cols {
                let mut sum = 0.0;
                for row in 0..n_rows {
                    sum += centered.get(row, i) * centered.get(row, j);
                }
                let value = sum / (n_rows - 1) as f32;
                cov.set(i, j, value);
                cov.set(j, i, value);
            }
        }
        cov
    }

    /// Extracts the dominant eigenpair of `matrix` with power
    /// iteration, starting from a random unit vector.
    fn dominant_eigenpair(matrix: &Matrix<f32>, rng: &mut ChaCha8Rng) -> (f32, Vec<f32>) {
        let n = matrix.n_rows();
        let mut v: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        } else {
            v[0] = 1.0;
        }

        let mut eigenvalue = 0.0;
        for _ in 0..POWER_ITERATIONS {
            let mut next = vec![0.0_f32; n];
            for (i, out) in next.iter_mut().enumerate() {
                let row = matrix.row(i);
                *out = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
            }

            let next_norm = next.iter().map(|x| x * x).sum::<f32>().sqrt();
            if next_norm < POWER_TOLERANCE {
                // Null direction, eigenvalue is zero.
                return (0.0, v);
            }
            for x in &mut next {
                *x /= next_norm;
            }

            let delta: f32 = next
                .iter()
                .zip(v.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f32::max);
            v = next;
            eigenvalue = next_norm;
            if delta < POWER_TOLERANCE {
                break;
            }
        }
        (eigenvalue, v)
    }

    /// Removes an eigenpair's contribution: `M ← M − λ v vᵀ`.
    fn deflate(matrix: &mut Matrix<f32>, eigenvalue: f32, v: &[f32]) {
        let n = matrix.n_rows();
        for i in 0..n {
            for j in 0..n {
                let updated = matrix.get(i, j) - eigenvalue * v[i] * v[j];
                matrix.set(i, j, updated);
            }
        }
    }
}

impl Transformer for Pca {
    /// Fits the principal axes to the data.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 samples, no features,
    /// or `n_components` is out of range.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples < 2 {
            return Err(AprendizError::InvalidHyperparameter {
                param: "n_samples".to_string(),
                value: n_samples.to_string(),
                constraint: "n_samples >= 2".to_string(),
            });
        }
        if n_features == 0 {
            return Err(AprendizError::empty_input("features"));
        }
        if self.n_components == 0 || self.n_components > n_features {
            return Err(AprendizError::InvalidHyperparameter {
                param: "n_components".to_string(),
                value: self.n_components.to_string(),
                constraint: format!("1 <= n_components <= {n_features}"),
            });
        }

        let mut means = vec![0.0_f32; n_features];
        for row in 0..n_samples {
            for (col, &value) in x.row(row).iter().enumerate() {
                means[col] += value;
            }
        }
        for m in &mut means {
            *m /= n_samples as f32;
        }

        let mut centered_data = Vec::with_capacity(n_samples * n_features);
        for row in 0..n_samples {
            for (col, &value) in x.row(row).iter().enumerate() {
                centered_data.push(value - means[col]);
            }
        }
        let centered = Matrix::from_vec(n_samples, n_features, centered_data)
            .map_err(|e| AprendizError::Other(e.to_string()))?;

        let mut cov = Self::covariance(&centered);
        self.total_variance = (0..n_features).map(|i| cov.get(i, i)).sum();

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let mut component_data = Vec::with_capacity(self.n_components * n_features);
        let mut eigenvalues = Vec::with_capacity(self.n_components);
        for _ in 0..self.n_components {
            let (eigenvalue, v) = Self::dominant_eigenpair(&cov, &mut rng);
            Self::deflate(&mut cov, eigenvalue, &v);
            eigenvalues.push(eigenvalue);
            component_data.extend_from_slice(&v);
        }

        self.components = Some(
            Matrix::from_vec(self.n_components, n_features, component_data)
                .map_err(|e| AprendizError::Other(e.to_string()))?,
        );
        self.mean = Some(Vector::from_vec(means));
        self.explained_variance = Some(Vector::from_vec(eigenvalues));
        Ok(())
    }

    /// Projects data onto the fitted principal axes.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted or the
    /// feature count doesn't match the training data.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let components = self
            .components
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("Pca"))?;
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| AprendizError::not_fitted("Pca"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(AprendizError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut projected = Vec::with_capacity(n_samples * self.n_components);
        for row in 0..n_samples {
            let sample = x.row(row);
            for comp in 0..self.n_components {
                let axis = components.row(comp);
                let mut dot = 0.0;
                for col in 0..n_features {
                    dot += (sample[col] - mean[col]) * axis[col];
                }
                projected.push(dot);
            }
        }
        Matrix::from_vec(n_samples, self.n_components, projected)
            .map_err(|e| AprendizError::Other(e.to_string()))
    }
}

impl Default for Pca {
    fn default() -> Self {
        Self::new()
    }
}
