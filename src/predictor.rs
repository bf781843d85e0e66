//! Provenance handles for producing components.
//!
//! A [`PredictorRef`] identifies the pipeline stage that produced a
//! prediction, so evaluation stages can read out component parameters
//! (regularization constants, convergence figures) without holding the
//! component itself. The handle is a cheap clone; every derived instance
//! of a prediction shares the same underlying record.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared provenance record behind a [`PredictorRef`].
#[derive(Debug, Clone, PartialEq)]
struct PredictorInfo {
    name: String,
    // BTreeMap keeps parameter order deterministic across runs.
    params: BTreeMap<String, f64>,
}

/// Handle identifying the component that produced a prediction.
///
/// Cloning shares the underlying record; [`same_as`](Self::same_as)
/// checks for that shared identity. Value equality (`==`) compares the
/// record contents instead, which is what a restored handle satisfies
/// after a persistence round trip.
///
/// # Example
///
/// ```
/// use predvec::PredictorRef;
///
/// let svm = PredictorRef::new("svm").with_param("complexity", 1.0);
/// let shared = svm.clone();
/// assert!(svm.same_as(&shared));
/// assert_eq!(svm.param("complexity"), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorRef {
    inner: Arc<PredictorInfo>,
}

impl PredictorRef {
    /// Create a handle for a named component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PredictorInfo {
                name: name.into(),
                params: BTreeMap::new(),
            }),
        }
    }

    /// Attach an introspection parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        Arc::make_mut(&mut self.inner).params.insert(key.into(), value);
        self
    }

    /// Combine member handles into one aggregated handle.
    ///
    /// Used by ensemble stages that replace the per-member provenance of a
    /// merged prediction with a single reference carrying the member names.
    pub fn ensemble_of<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a PredictorRef>,
    {
        let names: Vec<&str> = members.into_iter().map(|m| m.name()).collect();
        Self::new(format!("ensemble({})", names.join(", ")))
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Introspection parameter by key.
    pub fn param(&self, key: &str) -> Option<f64> {
        self.inner.params.get(key).copied()
    }

    /// All introspection parameters in key order.
    pub fn params(&self) -> &BTreeMap<String, f64> {
        &self.inner.params
    }

    /// Returns `true` if both handles share the same underlying record.
    pub fn same_as(&self, other: &PredictorRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_identity() {
        let a = PredictorRef::new("svm");
        let b = a.clone();
        assert!(a.same_as(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn rebuilt_handle_is_equal_but_not_identical() {
        let a = PredictorRef::new("svm").with_param("c", 0.5);
        let b = PredictorRef::new("svm").with_param("c", 0.5);
        assert_eq!(a, b);
        assert!(!a.same_as(&b));
    }

    #[test]
    fn params_readout() {
        let predictor = PredictorRef::new("gauss")
            .with_param("mean", 0.1)
            .with_param("sigma", 2.0);
        assert_eq!(predictor.name(), "gauss");
        assert_eq!(predictor.param("sigma"), Some(2.0));
        assert_eq!(predictor.param("missing"), None);
        assert_eq!(predictor.params().len(), 2);
    }

    #[test]
    fn ensemble_handle_carries_member_names() {
        let a = PredictorRef::new("svm");
        let b = PredictorRef::new("lda");
        let merged = PredictorRef::ensemble_of([&a, &b]);
        assert_eq!(merged.name(), "ensemble(svm, lda)");
    }
}
