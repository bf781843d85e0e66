//! Framed binary codec for prediction vectors.
//!
//! A persisted vector is a 16-byte header followed by a postcard-encoded
//! [`VectorSchema`](super::schema::VectorSchema) payload.
//!
//! # Format Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Header (16 bytes)                        │
//! ├────────────────────────────────────────────────────────────┤
//! │                    Payload (variable)                       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use predvec::{PredictionVector, VectorCodec};
//!
//! let vector = PredictionVector::builder()
//!     .prediction(0.73)
//!     .label("Target")
//!     .build()
//!     .unwrap();
//!
//! let codec = VectorCodec::new();
//! let bytes = codec.encode(&vector).unwrap();
//! let restored = codec.decode(&bytes).unwrap();
//! assert_eq!(restored, vector);
//! ```

use std::io::{Read, Write};

use thiserror::Error;

use super::convert;
use super::schema::VectorSchema;
use crate::vector::PredictionVector;

// ============================================================================
// Constants
// ============================================================================

/// Magic bytes identifying a prediction vector frame.
pub const MAGIC: &[u8; 4] = b"PVEC";

/// Current format version (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Current format version (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Size of the frame header in bytes.
pub const HEADER_SIZE: usize = 16;

// ============================================================================
// Frame Header
// ============================================================================

/// 16-byte header for the native storage format.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     Magic ("PVEC")
/// 4       1     Version major
/// 5       1     Version minor
/// 6       2     Reserved
/// 8       4     Payload size (bytes)
/// 12      4     CRC32 checksum of payload
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Format version (major).
    pub version_major: u8,
    /// Format version (minor).
    pub version_minor: u8,
    /// Size of the payload in bytes.
    pub payload_size: u32,
    /// CRC32 checksum of the payload.
    pub checksum: u32,
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHeader {
    /// Create a header with the current version and an empty payload.
    pub fn new() -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            payload_size: 0,
            checksum: 0,
        }
    }

    /// Serialize the header to 16 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];

        // Magic (offset 0-3)
        buf[0..4].copy_from_slice(MAGIC);

        // Version (offset 4-5)
        buf[4] = self.version_major;
        buf[5] = self.version_minor;

        // Reserved (offset 6-7)
        buf[6..8].copy_from_slice(&[0, 0]);

        // Payload size (offset 8-11, little-endian)
        buf[8..12].copy_from_slice(&self.payload_size.to_le_bytes());

        // Checksum (offset 12-15, little-endian)
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());

        buf
    }

    /// Parse a header from 16 bytes.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, DecodeError> {
        if &buf[0..4] != MAGIC {
            return Err(DecodeError::NotAVector);
        }

        let version_major = buf[4];
        let version_minor = buf[5];

        if version_major > CURRENT_VERSION_MAJOR {
            return Err(DecodeError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        let payload_size = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let checksum = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);

        Ok(Self {
            version_major,
            version_minor,
            payload_size,
            checksum,
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard encoding error.
    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),
}

/// Errors that can occur during decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Bytes are not a prediction vector frame (wrong magic).
    #[error("not a prediction vector frame")]
    NotAVector,

    /// Frame requires a newer format version.
    #[error("frame requires format version {major}.{minor} or later")]
    UnsupportedVersion {
        /// Required major version.
        major: u8,
        /// Required minor version.
        minor: u8,
    },

    /// Payload checksum doesn't match.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        /// Checksum recorded in the header.
        expected: u32,
        /// Checksum of the received payload.
        actual: u32,
    },

    /// Frame was truncated or incomplete.
    #[error("frame truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes the header promised.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Payload decoded but violates the vector contract.
    #[error("corrupt payload: {0}")]
    Corrupt(String),

    /// I/O error during reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard decoding error.
    #[error("decoding error: {0}")]
    Decoding(#[from] postcard::Error),
}

// ============================================================================
// CRC32 Helper
// ============================================================================

/// Compute the CRC32 checksum of a payload.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// ============================================================================
// Vector Codec
// ============================================================================

/// Codec for persisting prediction vectors in the native frame format.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorCodec;

impl VectorCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }

    /// Encode a vector to a complete frame.
    pub fn encode(&self, vector: &PredictionVector) -> Result<Vec<u8>, EncodeError> {
        let schema = convert::to_schema(vector);
        let payload = postcard::to_allocvec(&schema)?;

        let mut header = FrameHeader::new();
        let mut output = Vec::with_capacity(HEADER_SIZE + payload.len());
        self.write_to(&mut output, &mut header, &payload)?;
        Ok(output)
    }

    /// Decode a vector from a complete frame.
    pub fn decode(&self, bytes: &[u8]) -> Result<PredictionVector, DecodeError> {
        use std::io::Cursor;
        let mut cursor = Cursor::new(bytes);
        let (_header, payload) = self.read_from(&mut cursor)?;
        let schema: VectorSchema = postcard::from_bytes(&payload)?;
        convert::from_schema(schema)
    }

    /// Write header and payload to a writer.
    ///
    /// Fills in the header's payload size and checksum before writing.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        header: &mut FrameHeader,
        payload: &[u8],
    ) -> Result<(), EncodeError> {
        header.payload_size = payload.len() as u32;
        header.checksum = compute_checksum(payload);

        writer.write_all(&header.to_bytes())?;
        writer.write_all(payload)?;
        Ok(())
    }

    /// Read header and verified payload from a reader.
    pub fn read_from<R: Read>(
        &self,
        reader: &mut R,
    ) -> Result<(FrameHeader, Vec<u8>), DecodeError> {
        let mut header_buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                DecodeError::Truncated {
                    expected: HEADER_SIZE,
                    actual: 0,
                }
            } else {
                DecodeError::Io(e)
            }
        })?;

        let header = FrameHeader::from_bytes(&header_buf)?;

        let mut payload = vec![0u8; header.payload_size as usize];
        reader.read_exact(&mut payload).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                DecodeError::Truncated {
                    expected: header.payload_size as usize,
                    actual: payload.len(),
                }
            } else {
                DecodeError::Io(e)
            }
        })?;

        let actual_checksum = compute_checksum(&payload);
        if actual_checksum != header.checksum {
            return Err(DecodeError::ChecksumMismatch {
                expected: header.checksum,
                actual: actual_checksum,
            });
        }

        Ok((header, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = FrameHeader {
            version_major: 1,
            version_minor: 2,
            payload_size: 12345,
            checksum: 0xDEADBEEF,
        };

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let parsed = FrameHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn header_wrong_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"XXXX");

        let result = FrameHeader::from_bytes(&buf);
        assert!(matches!(result, Err(DecodeError::NotAVector)));
    }

    #[test]
    fn header_unsupported_version() {
        let mut header = FrameHeader::new();
        header.version_major = 99;
        let bytes = header.to_bytes();

        let result = FrameHeader::from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(DecodeError::UnsupportedVersion { major: 99, .. })
        ));
    }

    #[test]
    fn checksum_changes_with_data() {
        let checksum = compute_checksum(b"prediction payload");
        assert_ne!(checksum, 0);
        assert_eq!(checksum, compute_checksum(b"prediction payload"));
        assert_ne!(checksum, compute_checksum(b"prediction payloae"));
    }

    #[test]
    fn codec_write_read_roundtrip() {
        let codec = VectorCodec::new();
        let mut header = FrameHeader::new();
        let payload = b"raw frame payload";

        let mut buffer = Vec::new();
        codec.write_to(&mut buffer, &mut header, payload).unwrap();

        let (read_header, read_payload) = codec.read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(read_header.payload_size as usize, payload.len());
        assert_eq!(read_payload, payload);
    }

    #[test]
    fn codec_detects_corruption() {
        let codec = VectorCodec::new();
        let vector = PredictionVector::new(0.5);
        let mut bytes = codec.encode(&vector).unwrap();

        bytes[HEADER_SIZE] ^= 0xFF;

        let result = codec.decode(&bytes);
        assert!(matches!(result, Err(DecodeError::ChecksumMismatch { .. })));
    }

    #[test]
    fn codec_detects_truncation() {
        let codec = VectorCodec::new();
        let vector = PredictionVector::new(vec![0.1, 0.2, 0.3]);
        let bytes = codec.encode(&vector).unwrap();

        let result = codec.decode(&bytes[..bytes.len() - 4]);
        assert!(matches!(result, Err(DecodeError::Truncated { .. })));

        let result = codec.decode(&bytes[..HEADER_SIZE - 2]);
        assert!(matches!(result, Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn codec_rejects_foreign_bytes() {
        let codec = VectorCodec::new();
        let result = codec.decode(b"definitely not a frame..");
        assert!(matches!(result, Err(DecodeError::NotAVector)));
    }
}
