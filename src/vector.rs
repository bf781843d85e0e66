//! Prediction vectors with labels and provenance.
//!
//! A [`PredictionVector`] carries the output of one prediction event
//! through a pipeline: the numeric payload, an optional class label, and
//! an optional reference to the producing component. Evaluation stages
//! read the label and value; ensemble stages merge vectors and replace
//! the provenance reference; persistence sinks go through
//! [`persist`](crate::persist).
//!
//! The numeric payload is the single source of truth. The legacy
//! `(1, k)` matrix form is available as a derived view via
//! [`to_matrix`](PredictionVector::to_matrix) and is never stored
//! separately.

use std::fmt;
use std::ops::Range;

use ndarray::{Array2, ArrayView2};

use crate::error::PredictionError;
use crate::label::Label;
use crate::predictor::PredictorRef;
use crate::value::PredictionValue;

/// Validate label cardinality against a prediction payload.
///
/// A single label pairs with a scalar; a multi label pairs with a vector
/// of equal length. Anything else is a caller error, rejected before an
/// instance exists so rendering can never pair mismatched sequences.
pub(crate) fn check_label(label: &Label, value: &PredictionValue) -> Result<(), PredictionError> {
    let consistent = match (label, value) {
        (Label::Single(_), PredictionValue::Scalar(_)) => true,
        (Label::Multi(names), PredictionValue::Vector(values)) => names.len() == values.len(),
        _ => false,
    };
    if consistent {
        Ok(())
    } else {
        Err(PredictionError::LabelMismatch {
            labels: label.len(),
            predictions: value.len(),
        })
    }
}

/// The output of one prediction event.
///
/// Equality compares the label by value and the prediction under a float
/// tolerance (see [`PredictionValue::allclose`]); the provenance
/// reference and the derived matrix view play no role.
///
/// # Example
///
/// ```
/// use predvec::{PredictionVector, PredictorRef};
///
/// let vector = PredictionVector::builder()
///     .prediction(0.73)
///     .label("Target")
///     .predictor(PredictorRef::new("svm"))
///     .build()
///     .unwrap();
///
/// assert_eq!(vector.to_string(), "Target : 0.7300\t");
/// ```
#[derive(Debug, Clone)]
pub struct PredictionVector {
    value: PredictionValue,
    label: Option<Label>,
    predictor: Option<PredictorRef>,
    tag: Option<String>,
}

impl PredictionVector {
    /// Create an unlabeled vector from a prediction payload.
    ///
    /// Non-finite values are sanitized (see
    /// [`PredictionValue::sanitized`]).
    ///
    /// # Panics
    ///
    /// Panics if `value` is an empty sequence. Use
    /// [`builder`](Self::builder) for a fallible construction path.
    pub fn new(value: impl Into<PredictionValue>) -> Self {
        let value = value.into();
        assert!(
            !value.is_empty(),
            "prediction sequence must contain at least one value"
        );
        Self {
            value: value.sanitized(),
            label: None,
            predictor: None,
            tag: None,
        }
    }

    /// Start building a vector with label, provenance, and tag.
    pub fn builder() -> PredictionVectorBuilder {
        PredictionVectorBuilder::default()
    }

    /// Construct from the `(1, k)` matrix form alone.
    ///
    /// This is the path for callers holding only numeric storage: label
    /// and provenance come out absent. A one-element row collapses to a
    /// scalar payload.
    pub fn from_matrix(matrix: ArrayView2<'_, f64>) -> Result<Self, PredictionError> {
        let value = PredictionValue::from_row(matrix)?;
        Ok(Self {
            value: value.sanitized(),
            label: None,
            predictor: None,
            tag: None,
        })
    }

    /// Assemble from already-validated parts (persistence restore path).
    pub(crate) fn from_parts(
        value: PredictionValue,
        label: Option<Label>,
        predictor: Option<PredictorRef>,
        tag: Option<String>,
    ) -> Self {
        Self {
            value,
            label,
            predictor,
            tag,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The prediction payload.
    pub fn value(&self) -> &PredictionValue {
        &self.value
    }

    /// The class label, if any.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// The provenance reference, if any.
    pub fn predictor(&self) -> Option<&PredictorRef> {
        self.predictor.as_ref()
    }

    /// The tag supplied at construction, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Number of predictions carried.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Always `false`: a constructed vector carries at least one value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` for the multi-prediction form.
    #[inline]
    pub fn is_multi(&self) -> bool {
        !self.value.is_scalar()
    }

    /// The `(1, k)` matrix view of the payload.
    ///
    /// Freshly derived on every call; mutating the returned array does
    /// not touch the vector.
    pub fn to_matrix(&self) -> Array2<f64> {
        self.value.to_row()
    }

    // =========================================================================
    // Mutation by the owning stage
    // =========================================================================

    /// Replace the provenance reference.
    ///
    /// Ensemble stages use this to swap per-member provenance for an
    /// aggregated handle.
    pub fn set_predictor(&mut self, predictor: PredictorRef) {
        self.predictor = Some(predictor);
    }

    /// Replace the label, validating cardinality.
    pub fn set_label(&mut self, label: impl Into<Label>) -> Result<(), PredictionError> {
        let label = label.into();
        check_label(&label, &self.value)?;
        self.label = Some(label);
        Ok(())
    }

    /// Replace the tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Derive a new vector with a replaced payload.
    ///
    /// Label, provenance, and tag propagate from `self`; the payload is
    /// sanitized like any fresh construction.
    ///
    /// # Panics
    ///
    /// Panics if `value` is empty or no longer matches the carried
    /// label's cardinality.
    pub fn derive(&self, value: impl Into<PredictionValue>) -> Self {
        let value = value.into();
        assert!(
            !value.is_empty(),
            "derived prediction must contain at least one value"
        );
        let value = value.sanitized();
        if let Some(label) = &self.label {
            assert!(
                check_label(label, &value).is_ok(),
                "derived prediction no longer matches the carried label"
            );
        }
        Self {
            value,
            label: self.label.clone(),
            predictor: self.predictor.clone(),
            tag: self.tag.clone(),
        }
    }

    /// Derive a new vector by transforming every value.
    ///
    /// The arithmetic result is sanitized, so a transformation that
    /// produces non-finite values yields a usable vector rather than
    /// poisoning downstream thresholding.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let value = match &self.value {
            PredictionValue::Scalar(v) => PredictionValue::Scalar(f(*v)),
            PredictionValue::Vector(vs) => {
                PredictionValue::Vector(vs.iter().copied().map(&f).collect())
            }
        };
        Self {
            value: value.sanitized(),
            label: self.label.clone(),
            predictor: self.predictor.clone(),
            tag: self.tag.clone(),
        }
    }

    /// Derive a new vector from a column range of the payload.
    ///
    /// A multi label is sliced in step so each surviving prediction keeps
    /// its class name. Provenance and tag propagate unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or extends past
    /// [`len()`](Self::len).
    pub fn slice(&self, range: Range<usize>) -> Self {
        let values = self.value.to_vec();
        assert!(
            !range.is_empty() && range.end <= values.len(),
            "slice range {}..{} out of bounds for {} predictions",
            range.start,
            range.end,
            values.len()
        );
        let part = values[range.clone()].to_vec();
        let value = if self.value.is_scalar() {
            PredictionValue::Scalar(part[0])
        } else {
            PredictionValue::Vector(part)
        };
        let label = match &self.label {
            Some(Label::Multi(names)) => Some(Label::Multi(names[range].to_vec())),
            other => other.clone(),
        };
        Self {
            value,
            label,
            predictor: self.predictor.clone(),
            tag: self.tag.clone(),
        }
    }

    // =========================================================================
    // Ensemble combination
    // =========================================================================

    /// Combine member vectors into one multi-prediction vector.
    ///
    /// Values are flattened in member order. When every member carries a
    /// label the merged vector gets the concatenated multi label,
    /// otherwise no label. Member provenance is collected into one
    /// aggregated handle (see [`PredictorRef::ensemble_of`]), which the
    /// combining stage may later replace via
    /// [`set_predictor`](Self::set_predictor).
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::MissingPrediction`] for an empty
    /// member set.
    pub fn merge<I>(members: I) -> Result<Self, PredictionError>
    where
        I: IntoIterator<Item = PredictionVector>,
    {
        let mut values = Vec::new();
        let mut names = Vec::new();
        let mut all_labeled = true;
        let mut predictors = Vec::new();

        for member in members {
            values.extend(member.value.iter());
            match member.label {
                Some(Label::Single(name)) => names.push(name),
                Some(Label::Multi(member_names)) => names.extend(member_names),
                None => all_labeled = false,
            }
            if let Some(predictor) = member.predictor {
                predictors.push(predictor);
            }
        }

        if values.is_empty() {
            return Err(PredictionError::MissingPrediction);
        }

        let label = if all_labeled && names.len() == values.len() {
            Some(Label::Multi(names))
        } else {
            None
        };
        let predictor = if predictors.is_empty() {
            None
        } else {
            Some(PredictorRef::ensemble_of(&predictors))
        };

        Ok(Self {
            value: PredictionValue::Vector(values),
            label,
            predictor,
            tag: None,
        })
    }
}

/// Equality on label and prediction only.
///
/// The prediction comparison is tolerance-based, so round-off from
/// arithmetic or transport does not break equality. Reflexive and
/// symmetric; transitivity holds only up to the tolerance.
impl PartialEq for PredictionVector {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.value.allclose(&other.value)
    }
}

impl fmt::Display for PredictionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.value.iter().enumerate() {
            let name = match &self.label {
                Some(Label::Single(name)) => name.as_str(),
                Some(Label::Multi(names)) => names.get(i).map(String::as_str).unwrap_or("-"),
                None => "-",
            };
            write!(f, "{name} : {value:.4}\t")?;
        }
        Ok(())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`PredictionVector`].
///
/// At least one of [`prediction`](Self::prediction) and
/// [`matrix`](Self::matrix) is required. When both are given they are
/// trusted to agree and the explicit prediction is stored.
#[derive(Debug, Clone, Default)]
pub struct PredictionVectorBuilder {
    matrix: Option<Array2<f64>>,
    prediction: Option<PredictionValue>,
    label: Option<Label>,
    predictor: Option<PredictorRef>,
    tag: Option<String>,
}

impl PredictionVectorBuilder {
    /// Set the prediction payload (attribute form).
    pub fn prediction(mut self, value: impl Into<PredictionValue>) -> Self {
        self.prediction = Some(value.into());
        self
    }

    /// Set the `(1, k)` numeric storage form.
    pub fn matrix(mut self, matrix: Array2<f64>) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Set the class label.
    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the provenance reference.
    pub fn predictor(mut self, predictor: PredictorRef) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Set the tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Resolve, sanitize, and validate into a [`PredictionVector`].
    ///
    /// # Errors
    ///
    /// - [`PredictionError::MissingPrediction`] when neither payload form
    ///   was supplied.
    /// - [`PredictionError::EmptyPrediction`] for a zero-length sequence.
    /// - [`PredictionError::ShapeMismatch`] when the matrix is not a
    ///   single row.
    /// - [`PredictionError::LabelMismatch`] when label and prediction
    ///   cardinality disagree.
    pub fn build(self) -> Result<PredictionVector, PredictionError> {
        let original = match (self.prediction, self.matrix) {
            (Some(value), _) => value,
            (None, Some(matrix)) => PredictionValue::from_row(matrix.view())?,
            (None, None) => return Err(PredictionError::MissingPrediction),
        };
        if original.is_empty() {
            return Err(PredictionError::EmptyPrediction);
        }
        let value = original.sanitized();
        if let Some(label) = &self.label {
            check_label(label, &value)?;
        }
        Ok(PredictionVector {
            value,
            label: self.label,
            predictor: self.predictor,
            tag: self.tag,
        })
    }
}
