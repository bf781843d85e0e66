//! Error types for prediction construction.

/// Errors raised when assembling a [`PredictionVector`](crate::PredictionVector).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// Neither a prediction value nor an input matrix was supplied.
    #[error("a prediction value or an input matrix must be supplied")]
    MissingPrediction,

    /// The prediction sequence carries no values.
    #[error("prediction sequence must contain at least one value")]
    EmptyPrediction,

    /// The input matrix is not a single row.
    #[error("input matrix must have exactly one row, got {rows}")]
    ShapeMismatch {
        /// Row count of the rejected matrix.
        rows: usize,
    },

    /// Label and prediction cardinality disagree.
    #[error("label count {labels} does not match prediction count {predictions}")]
    LabelMismatch {
        /// Number of class names supplied.
        labels: usize,
        /// Number of prediction values supplied.
        predictions: usize,
    },
}
