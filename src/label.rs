//! Semantic class labels.
//!
//! A label gives a prediction its class meaning, e.g. `"ill"` or
//! `"Target"`. Regression predictions carry no label. Multi-prediction
//! vectors carry one label per prediction.

use std::fmt;

/// Class name(s) attached to a prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// One class name for a scalar prediction.
    Single(String),
    /// One class name per prediction, in prediction order.
    Multi(Vec<String>),
}

impl Label {
    /// Number of class names carried.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi(names) => names.len(),
        }
    }

    /// Returns `true` if no class names are carried.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for the multi-prediction form.
    #[inline]
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// Class name at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            Self::Single(name) if index == 0 => Some(name),
            Self::Single(_) => None,
            Self::Multi(names) => names.get(index).map(String::as_str),
        }
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl From<Vec<String>> for Label {
    fn from(names: Vec<String>) -> Self {
        Self::Multi(names)
    }
}

impl From<Vec<&str>> for Label {
    fn from(names: Vec<&str>) -> Self {
        Self::Multi(names.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(name) => f.write_str(name),
            Self::Multi(names) => f.write_str(&names.join(", ")),
        }
    }
}
