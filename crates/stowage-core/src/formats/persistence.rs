//! # Persistence Format
//!
//! Binary encoding of character records for the redb roster.
//!
//! Format: Header (5 bytes) + postcard-serialized character.
//! - 4 bytes: Magic ("STOW")
//! - 1 byte: Version
//!
//! Size and header are checked before the payload is decoded, so a
//! corrupted record fails with an error instead of a large allocation.

use crate::{Character, StowageError, primitives};

/// Maximum accepted size of one encoded character (16 MB).
pub const MAX_RECORD_SIZE: usize = 16 * 1024 * 1024;

const HEADER_SIZE: usize = 5;

// =============================================================================
// RECORD HEADER
// =============================================================================

/// The header precedes every encoded character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), StowageError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(StowageError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(StowageError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StowageError> {
        let Some(head) = bytes.get(..HEADER_SIZE) else {
            return Err(StowageError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&head[0..4]);
        Ok(Self {
            magic,
            version: head[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Encode a character (header + payload). No file I/O.
pub fn character_to_bytes(character: &Character) -> Result<Vec<u8>, StowageError> {
    let payload = postcard::to_stdvec(character)
        .map_err(|e| StowageError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&PersistenceHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Decode a character written by [`character_to_bytes`]. No file I/O.
pub fn character_from_bytes(bytes: &[u8]) -> Result<Character, StowageError> {
    if bytes.len() > MAX_RECORD_SIZE {
        return Err(StowageError::DeserializationError(format!(
            "Record size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_RECORD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        StowageError::DeserializationError(format!("Failed to decode character: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
