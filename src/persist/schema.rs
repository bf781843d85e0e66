//! Schema types for prediction persistence.
//!
//! These types provide a stable serialization format independent of
//! runtime types, so the storage format can evolve without touching the
//! pipeline-facing API and payloads are validated during restore.
//!
//! The payload codec (postcard) is not self-describing: enums stay
//! externally tagged and no field is conditionally skipped. Parameter
//! maps use `BTreeMap` for deterministic output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted numeric storage: the `(1, k)` row in flat form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSchema {
    /// Column count of the single row.
    pub n_cols: u32,
    /// Row data in column order.
    pub data: Vec<f64>,
}

/// Persisted prediction payload (attribute form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueSchema {
    /// A single prediction value.
    Scalar(f64),
    /// Multiple prediction values.
    Vector(Vec<f64>),
}

/// Persisted class label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSchema {
    /// One class name.
    Single(String),
    /// One class name per prediction.
    Multi(Vec<String>),
}

/// Persisted provenance reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorSchema {
    /// Component name.
    pub name: String,
    /// Introspection parameters in key order.
    pub params: BTreeMap<String, f64>,
}

/// Attribute appendage stored next to the numeric payload.
///
/// The storage's own persisted form knows nothing about application
/// attributes; they ride along as this explicit record and are assigned
/// back explicitly on restore, never via derivation defaulting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrSchema {
    /// Class label, if any.
    pub label: Option<LabelSchema>,
    /// Provenance reference, if any.
    pub predictor: Option<PredictorSchema>,
    /// The prediction payload (authoritative on restore).
    pub prediction: ValueSchema,
}

/// Top-level persisted form of a prediction vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSchema {
    /// Numeric storage payload.
    pub storage: StorageSchema,
    /// Attribute appendage.
    pub attrs: AttrSchema,
    /// Construction tag, if any.
    pub tag: Option<String>,
}
