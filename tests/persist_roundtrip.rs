//! End-to-end persistence round trips through the native codec.

use predvec::persist::{self, DecodeError, HEADER_SIZE};
use predvec::{PredictionVector, PredictorRef, VectorCodec};

fn classifier_vector() -> PredictionVector {
    PredictionVector::builder()
        .prediction(vec![0.9, -0.4])
        .label(vec!["ill", "healthy"])
        .predictor(PredictorRef::new("svm").with_param("complexity", 1.0))
        .tag("trial 7")
        .build()
        .unwrap()
}

#[test]
fn labeled_vector_roundtrip() {
    let codec = VectorCodec::new();
    let original = classifier_vector();

    let bytes = codec.encode(&original).unwrap();
    let restored = codec.decode(&bytes).unwrap();

    // Equal under the value contract and attribute-identical.
    assert_eq!(restored, original);
    assert_eq!(restored.label(), original.label());
    assert_eq!(restored.value(), original.value());
    assert_eq!(restored.tag(), original.tag());

    // Numeric storage content matches exactly.
    assert_eq!(restored.to_matrix(), original.to_matrix());
}

#[test]
fn regression_vector_roundtrip() {
    let codec = VectorCodec::new();
    let original = PredictionVector::new(17.25);

    let restored = codec.decode(&codec.encode(&original).unwrap()).unwrap();
    assert_eq!(restored, original);
    assert!(restored.label().is_none());
    assert!(restored.tag().is_none());
}

#[test]
fn absent_predictor_stays_absent() {
    let codec = VectorCodec::new();
    let original = PredictionVector::new(0.5);
    assert!(original.predictor().is_none());

    let restored = codec.decode(&codec.encode(&original).unwrap()).unwrap();
    assert!(restored.predictor().is_none());
}

#[test]
fn predictor_restores_by_value() {
    let codec = VectorCodec::new();
    let original = classifier_vector();

    let restored = codec.decode(&codec.encode(&original).unwrap()).unwrap();
    let predictor = restored.predictor().unwrap();
    assert_eq!(predictor, original.predictor().unwrap());
    assert_eq!(predictor.name(), "svm");
    assert_eq!(predictor.param("complexity"), Some(1.0));
}

#[test]
fn sanitized_vector_roundtrip() {
    let codec = VectorCodec::new();
    let original = PredictionVector::new(f64::NEG_INFINITY);

    let restored = codec.decode(&codec.encode(&original).unwrap()).unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored.value().get(0), Some(-1e9));
}

#[test]
fn corrupted_payload_is_rejected() {
    let codec = VectorCodec::new();
    let mut bytes = codec.encode(&classifier_vector()).unwrap();
    bytes[HEADER_SIZE + 1] ^= 0xFF;

    let result = codec.decode(&bytes);
    assert!(matches!(result, Err(DecodeError::ChecksumMismatch { .. })));
}

#[test]
fn truncated_frame_is_rejected() {
    let codec = VectorCodec::new();
    let bytes = codec.encode(&classifier_vector()).unwrap();

    let result = codec.decode(&bytes[..bytes.len() / 2]);
    assert!(matches!(result, Err(DecodeError::Truncated { .. })));
}

#[test]
fn foreign_bytes_are_rejected() {
    let codec = VectorCodec::new();
    let result = codec.decode(b"this is not a prediction vector frame");
    assert!(matches!(result, Err(DecodeError::NotAVector)));
}

#[test]
fn schema_stays_json_representable() {
    // Debugging sinks dump the schema as JSON; keep that path working.
    let schema = persist::to_schema(&classifier_vector());
    let json = serde_json::to_string(&schema).unwrap();
    assert!(json.contains("\"ill\""));
    assert!(json.contains("svm"));

    let parsed: predvec::persist::schema::VectorSchema = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, schema);
}
