//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings. The digest is taken over
//! the full stored form of an object, `<kind>\x00<payload>`, which makes the
//! id a pure function of the content.
//!
//! ## Storage
//!
//! Objects are stored flat as `.ugit/objects/<40-hex-oid>`.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_type::ObjectType;
use sha1::{Digest, Sha1};

/// Object identifier (SHA-1 hash)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Compute the id of an object from its kind and payload
    ///
    /// The digest covers `kind || NUL || payload`, the exact bytes written to
    /// disk, so identical content always yields an identical id.
    pub fn digest(object_type: &ObjectType, payload: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(object_type.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(payload);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Check whether a string is a plausible full oid (40 hex chars)
    pub fn is_valid_hex(candidate: &str) -> bool {
        candidate.len() == OBJECT_ID_LENGTH
            && candidate.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
