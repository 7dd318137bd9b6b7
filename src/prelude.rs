//! Convenience re-exports for common usage.
//!
//! ```
//! use aprendiz::prelude::*;
//! ```

pub use crate::classification::LogisticRegression;
pub use crate::data::DataFrame;
pub use crate::decomposition::Pca;
pub use crate::error::{AprendizError, Result};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{
    accuracy, confusion_matrix, f1_score, mae, mse, precision, r_squared, recall, rmse, Average,
};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Estimator, Transformer};
pub use crate::tree::DecisionTreeClassifier;
