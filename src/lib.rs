//! Aprendiz: A small tabular machine learning toolkit in pure Rust.
//!
//! Aprendiz provides classic tabular estimators built around a decision
//! tree classifier, with ergonomic builder APIs and explicit error
//! handling.
//!
//! # Quick Start
//!
//! ```
//! use aprendiz::prelude::*;
//!
//! // Two separable classes on one feature.
//! let x = Matrix::from_vec(4, 1, vec![
//!     1.0,
//!     2.0,
//!     3.0,
//!     4.0,
//! ]).unwrap();
//! let y = vec![0, 0, 1, 1];
//!
//! let mut model = DecisionTreeClassifier::new().with_max_depth(3);
//! model.fit(&x, &y).unwrap();
//!
//! let predictions = model.predict(&x).unwrap();
//! assert_eq!(predictions, y);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: DataFrame for named columns and CSV ingestion
//! - [`tree`]: Decision tree classifiers (Gini splitting)
//! - [`linear_model`]: Linear regression
//! - [`classification`]: Logistic regression
//! - [`decomposition`]: Principal Component Analysis
//! - [`metrics`]: Evaluation metrics
//! - [`traits`]: Estimator and Transformer contracts

pub mod classification;
pub mod data;
pub mod decomposition;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod traits;
pub mod tree;

pub use error::{AprendizError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{Estimator, Transformer};
