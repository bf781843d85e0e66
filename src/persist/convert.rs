//! Conversion between runtime vectors and schema types.
//!
//! `to_schema` captures both the numeric storage form and the attribute
//! appendage. `from_schema` rebuilds the vector from the appendage and
//! validates it against the storage payload before assigning the
//! attributes explicitly.

use crate::label::Label;
use crate::predictor::PredictorRef;
use crate::value::PredictionValue;
use crate::vector::{check_label, PredictionVector};

use super::native::DecodeError;
use super::schema::{AttrSchema, LabelSchema, PredictorSchema, StorageSchema, ValueSchema, VectorSchema};

/// Capture a vector as its persisted form.
pub fn to_schema(vector: &PredictionVector) -> VectorSchema {
    let data = vector.value().to_vec();
    VectorSchema {
        storage: StorageSchema {
            n_cols: data.len() as u32,
            data,
        },
        attrs: AttrSchema {
            label: vector.label().map(|label| match label {
                Label::Single(name) => LabelSchema::Single(name.clone()),
                Label::Multi(names) => LabelSchema::Multi(names.clone()),
            }),
            predictor: vector.predictor().map(|predictor| PredictorSchema {
                name: predictor.name().to_string(),
                params: predictor.params().clone(),
            }),
            prediction: match vector.value() {
                PredictionValue::Scalar(value) => ValueSchema::Scalar(*value),
                PredictionValue::Vector(values) => ValueSchema::Vector(values.clone()),
            },
        },
        tag: vector.tag().map(str::to_string),
    }
}

/// Restore a vector from its persisted form.
///
/// The attribute appendage is authoritative for the payload; the storage
/// record must agree on length. Violations surface as
/// [`DecodeError::Corrupt`].
pub fn from_schema(schema: VectorSchema) -> Result<PredictionVector, DecodeError> {
    let value = match schema.attrs.prediction {
        ValueSchema::Scalar(value) => PredictionValue::Scalar(value),
        ValueSchema::Vector(values) => PredictionValue::Vector(values),
    };
    if value.is_empty() {
        return Err(DecodeError::Corrupt("empty prediction payload".into()));
    }
    if !value.is_finite() {
        return Err(DecodeError::Corrupt(
            "non-finite value in prediction payload".into(),
        ));
    }
    if schema.storage.n_cols as usize != schema.storage.data.len() {
        return Err(DecodeError::Corrupt(
            "storage length disagrees with column count".into(),
        ));
    }
    if schema.storage.data.len() != value.len() {
        return Err(DecodeError::Corrupt(
            "storage and prediction length disagree".into(),
        ));
    }

    let label = schema.attrs.label.map(|label| match label {
        LabelSchema::Single(name) => Label::Single(name),
        LabelSchema::Multi(names) => Label::Multi(names),
    });
    if let Some(label) = &label {
        check_label(label, &value).map_err(|e| DecodeError::Corrupt(e.to_string()))?;
    }

    let predictor = schema.attrs.predictor.map(|schema| {
        schema
            .params
            .into_iter()
            .fold(PredictorRef::new(schema.name), |predictor, (key, value)| {
                predictor.with_param(key, value)
            })
    });

    Ok(PredictionVector::from_parts(
        value, label, predictor, schema.tag,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vector() -> PredictionVector {
        PredictionVector::builder()
            .prediction(vec![0.9, -0.4])
            .label(vec!["ill", "healthy"])
            .predictor(PredictorRef::new("svm").with_param("complexity", 1.0))
            .tag("trial 7")
            .build()
            .unwrap()
    }

    #[test]
    fn schema_captures_storage_and_appendage() {
        let schema = to_schema(&sample_vector());
        assert_eq!(schema.storage.n_cols, 2);
        assert_eq!(schema.storage.data, vec![0.9, -0.4]);
        assert_eq!(
            schema.attrs.prediction,
            ValueSchema::Vector(vec![0.9, -0.4])
        );
        assert_eq!(
            schema.attrs.label,
            Some(LabelSchema::Multi(vec![
                "ill".to_string(),
                "healthy".to_string()
            ]))
        );
        assert_eq!(schema.attrs.predictor.as_ref().unwrap().name, "svm");
        assert_eq!(schema.tag.as_deref(), Some("trial 7"));
    }

    #[test]
    fn schema_round_trip_is_attribute_identical() {
        let original = sample_vector();
        let restored = from_schema(to_schema(&original)).unwrap();

        assert_eq!(restored, original);
        assert_eq!(restored.label(), original.label());
        assert_eq!(restored.value(), original.value());
        assert_eq!(restored.tag(), original.tag());
        assert_eq!(restored.predictor(), original.predictor());
        assert_eq!(restored.to_matrix(), original.to_matrix());
    }

    #[test]
    fn restore_rejects_length_disagreement() {
        let mut schema = to_schema(&sample_vector());
        schema.storage.data.push(0.0);
        schema.storage.n_cols += 1;
        let result = from_schema(schema);
        assert!(matches!(result, Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn restore_rejects_bad_column_count() {
        let mut schema = to_schema(&sample_vector());
        schema.storage.n_cols = 7;
        let result = from_schema(schema);
        assert!(matches!(result, Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn restore_rejects_non_finite_payload() {
        let mut schema = to_schema(&sample_vector());
        schema.attrs.prediction = ValueSchema::Vector(vec![f64::NAN, 0.0]);
        let result = from_schema(schema);
        assert!(matches!(result, Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn restore_rejects_label_mismatch() {
        let mut schema = to_schema(&sample_vector());
        schema.attrs.label = Some(LabelSchema::Multi(vec!["only one".to_string()]));
        let result = from_schema(schema);
        assert!(matches!(result, Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn absent_predictor_restores_absent() {
        let original = PredictionVector::new(0.5);
        let restored = from_schema(to_schema(&original)).unwrap();
        assert!(restored.predictor().is_none());
    }
}
