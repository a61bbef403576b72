use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::errors::CoreError;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn serialize(&self) -> anyhow::Result<Bytes> {
        // pack!(SIGNATURE, VERSION, self.entries_count => "a4N2")
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(SIGNATURE)?;
        bytes.write_u32::<byteorder::NetworkEndian>(VERSION)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }

    /// Decode and validate the 12-byte header at the start of `bytes`.
    pub(crate) fn deserialize(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CoreError::InvalidSignature(bytes.to_vec()).into());
        }

        if &bytes[0..4] != SIGNATURE {
            return Err(CoreError::InvalidSignature(bytes[0..4].to_vec()).into());
        }

        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        if version != VERSION {
            return Err(CoreError::UnsupportedVersion(version).into());
        }

        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader { entries_count })
    }
}
