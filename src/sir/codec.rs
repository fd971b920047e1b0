//! Serialization of SIR documents
//!
//! Documents are wrapped in a versioned JSON envelope:
//!
//! ```json
//! { "format": "stencilc.sir", "version": { "major": 1, "minor": 0 }, "sir": { ... } }
//! ```
//!
//! The encoding is deterministic: struct fields serialize in declaration
//! order and every sequence preserves source order, so documents compiled
//! from identical sources are byte-identical and diffable. Decoding rejects
//! truncated or corrupt input with a decode error, and refuses documents
//! whose major version exceeds [`SIR_FORMAT_MAJOR`]; unknown fields within
//! the same major version are ignored so minor versions may add optional
//! fields.

use super::SirDocument;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::debug;

/// Magic string identifying a serialized SIR document
pub const SIR_FORMAT_MAGIC: &str = "stencilc.sir";
/// Highest major format version this build understands
pub const SIR_FORMAT_MAJOR: u32 = 1;
/// Minor format version written by this build
pub const SIR_FORMAT_MINOR: u32 = 0;

#[derive(Serialize, Deserialize)]
struct Envelope {
    format: String,
    version: FormatVersion,
    sir: SirDocument,
}

#[derive(Serialize, Deserialize)]
struct FormatVersion {
    major: u32,
    minor: u32,
}

/// Serializes a document into its canonical byte encoding.
pub fn serialize(doc: &SirDocument) -> Result<Vec<u8>> {
    let envelope = Envelope {
        format: SIR_FORMAT_MAGIC.to_string(),
        version: FormatVersion {
            major: SIR_FORMAT_MAJOR,
            minor: SIR_FORMAT_MINOR,
        },
        sir: doc.clone(),
    };
    let bytes = serde_json::to_vec(&envelope)
        .map_err(|e| Error::decode(format!("failed to encode document: {}", e)))?;
    debug!(bytes = bytes.len(), "serialized SIR document");
    Ok(bytes)
}

/// Deserializes a document from its byte encoding.
///
/// Truncated or corrupt input fails with [`Error::Decode`]; a document from
/// an incompatible future major version fails with
/// [`Error::UnsupportedVersion`]. A partially populated document is never
/// returned.
pub fn deserialize(bytes: &[u8]) -> Result<SirDocument> {
    let envelope: Envelope = serde_json::from_slice(bytes)
        .map_err(|e| Error::decode(format!("malformed SIR document: {}", e)))?;

    if envelope.format != SIR_FORMAT_MAGIC {
        return Err(Error::decode(format!(
            "not an SIR document (format tag '{}')",
            envelope.format
        )));
    }
    if envelope.version.major > SIR_FORMAT_MAJOR {
        return Err(Error::UnsupportedVersion {
            found: envelope.version.major,
            supported: SIR_FORMAT_MAJOR,
        });
    }

    Ok(envelope.sir)
}

/// Serializes a document and writes it to a sink.
pub fn write_sir<W: Write>(doc: &SirDocument, mut sink: W) -> Result<()> {
    let bytes = serialize(doc)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

/// Reads a complete document from a source and deserializes it.
pub fn read_sir<R: Read>(mut source: R) -> Result<SirDocument> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    deserialize(&bytes)
}
