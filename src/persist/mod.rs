//! Native persistence for prediction vectors.
//!
//! A persisted vector captures the full numeric storage content plus the
//! attribute triple (label, predictor, prediction) as an explicit
//! appendage, so a restored instance is equal and attribute-identical to
//! the original. See [`VectorCodec`] for the frame layout and [`schema`]
//! for the stable payload types.

mod convert;
mod native;
pub mod schema;

pub use convert::{from_schema, to_schema};
pub use native::{
    compute_checksum, DecodeError, EncodeError, FrameHeader, VectorCodec, CURRENT_VERSION_MAJOR,
    CURRENT_VERSION_MINOR, HEADER_SIZE, MAGIC,
};
