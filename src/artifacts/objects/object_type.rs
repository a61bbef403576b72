use crate::errors::CoreError;
use bytes::Bytes;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Prefix `payload` with the `<kind> <len>\0` header that is hashed and stored.
    pub fn frame(&self, payload: &[u8]) -> anyhow::Result<Bytes> {
        let mut framed = Vec::with_capacity(payload.len() + 16);
        write!(framed, "{} {}\0", self.as_str(), payload.len())?;
        framed.write_all(payload)?;

        Ok(Bytes::from(framed))
    }

    /// Split framed object bytes into kind and payload.
    ///
    /// The declared length must equal the number of payload bytes that follow the
    /// header; `oid` only names the object in the error.
    pub fn unframe(oid: &str, framed: Bytes) -> anyhow::Result<(ObjectType, Bytes)> {
        let corrupt = |reason: &str| CoreError::CorruptObject {
            oid: oid.to_string(),
            reason: reason.to_string(),
        };

        let header_end = framed
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing header terminator"))?;
        let header =
            std::str::from_utf8(&framed[..header_end]).map_err(|_| corrupt("header is not UTF-8"))?;
        let (kind, declared) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("malformed header"))?;

        let object_type =
            ObjectType::try_from(kind).map_err(|_| corrupt("unknown object kind"))?;
        let declared = declared
            .parse::<usize>()
            .map_err(|_| corrupt("malformed payload length"))?;

        let payload = framed.slice(header_end + 1..);
        if payload.len() != declared {
            return Err(CoreError::CorruptObject {
                oid: oid.to_string(),
                reason: format!(
                    "declared length {declared} but payload has {} bytes",
                    payload.len()
                ),
            }
            .into());
        }

        Ok((object_type, payload))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Invalid object type {value}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
