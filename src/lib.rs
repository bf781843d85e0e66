//! predvec: typed prediction containers for classification pipelines.
//!
//! This crate provides the value object that carries a model's output
//! (a scalar or vector prediction, an optional class label, and a
//! provenance reference to the producing component) through a
//! signal-processing/classification pipeline. Downstream stages treat
//! predictions uniformly whether they come from classification or
//! regression, and whether one component produced them or an ensemble.
//!
//! # Key Types
//!
//! - [`PredictionVector`] - The prediction with label, provenance, and tag
//! - [`PredictionValue`] - Scalar-or-vector payload with sanitization
//! - [`Label`] / [`PredictorRef`] - Class names and provenance handles
//! - [`VectorCodec`] - Framed binary persistence
//!
//! # Example
//!
//! ```
//! use predvec::{PredictionVector, PredictorRef};
//!
//! // A classifier emits one labeled decision value.
//! let vector = PredictionVector::builder()
//!     .prediction(0.73)
//!     .label("Target")
//!     .predictor(PredictorRef::new("svm"))
//!     .build()
//!     .unwrap();
//!
//! // Downstream stages read the label and value, never raw storage.
//! assert_eq!(vector.label().unwrap().to_string(), "Target");
//! assert_eq!(vector.value().get(0), Some(0.73));
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod error;
pub mod label;
pub mod persist;
pub mod predictor;
pub mod value;
pub mod vector;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use error::PredictionError;
pub use label::Label;
pub use persist::{DecodeError, EncodeError, VectorCodec};
pub use predictor::PredictorRef;
pub use value::PredictionValue;
pub use vector::{PredictionVector, PredictionVectorBuilder};
