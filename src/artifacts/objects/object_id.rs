//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings representing SHA-1
//! digests of a framed object (`<kind> <len>\0<payload>`).
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use crate::errors::CoreError;
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
///
/// Always holds a validated, lowercase, 40-character hexadecimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Upper-case digits are accepted and normalized to lower case.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidObjectId(id).into());
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Hash already-framed object bytes
    pub fn digest(framed: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(framed);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Write the object ID in binary format (20 bytes)
    ///
    /// Used when serializing tree entries and index entries.
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex40 = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from binary format (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_RAW_LENGTH];
        reader.read_exact(&mut raw)?;

        Ok(Self::from_raw(&raw))
    }

    pub fn from_raw(raw: &[u8; OBJECT_ID_RAW_LENGTH]) -> Self {
        Self(raw.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn digest_of_framed_blob_matches_git() {
        let oid = ObjectId::digest(b"blob 5\0hello");

        assert_eq!(oid.as_ref(), "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
        assert_eq!(
            oid.to_path(),
            PathBuf::from("b6").join("fc4c620b67d95f953a5c1c1230aaab5db5a1b0")
        );
        assert_eq!(oid.to_short_oid(), "b6fc4c6");
    }

    #[test]
    fn binary_form_survives_a_write_read_cycle() {
        let oid = ObjectId::digest(b"blob 0\0");
        let mut raw = Vec::new();
        oid.write_h40_to(&mut raw).unwrap();

        assert_eq!(raw.len(), OBJECT_ID_RAW_LENGTH);
        let parsed = ObjectId::read_h40_from(&mut raw.as_slice()).unwrap();
        assert_eq!(parsed, oid);
    }

    #[rstest]
    #[case("abc")]
    #[case("zzfc4c620b67d95f953a5c1c1230aaab5db5a1b0")]
    #[case("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b00")]
    fn malformed_ids_are_rejected(#[case] id: &str) {
        let error = ObjectId::try_parse(id.to_string()).unwrap_err();

        assert!(matches!(
            kind_of(&error),
            Some(CoreError::InvalidObjectId(_))
        ));
    }

    #[test]
    fn upper_case_ids_are_normalized() {
        let oid = ObjectId::try_parse("B6FC4C620B67D95F953A5C1C1230AAAB5DB5A1B0".to_string()).unwrap();

        assert_eq!(oid.as_ref(), "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
    }
}
