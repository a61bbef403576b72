use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::CoreError;
use sha1::{Digest, Sha1};
use std::io::Write;

/// Writer that hashes everything passing through it, so the index trailer can
/// be appended once the body is complete.
#[derive(Debug)]
pub struct Checksum<W: Write> {
    inner: W,
    digest: Sha1,
}

impl<W: Write> Checksum<W> {
    pub(crate) fn new(inner: W) -> Self {
        Checksum {
            inner,
            digest: Sha1::new(),
        }
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.inner.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    /// Append the digest of everything written so far and hand back the sink.
    pub(crate) fn write_checksum(mut self) -> anyhow::Result<W> {
        let checksum = self.digest.finalize();
        self.inner.write_all(checksum.as_slice())?;

        Ok(self.inner)
    }
}

/// Check the trailing digest of a complete index file and return the bytes it covers.
pub(crate) fn verify(data: &[u8]) -> anyhow::Result<&[u8]> {
    if data.len() < CHECKSUM_SIZE {
        return Err(CoreError::InvalidChecksum.into());
    }

    let (body, expected) = data.split_at(data.len() - CHECKSUM_SIZE);
    let actual = Sha1::digest(body);

    if actual.as_slice() != expected {
        return Err(CoreError::InvalidChecksum.into());
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use pretty_assertions::assert_eq;

    #[test]
    fn written_trailer_verifies() {
        let mut writer = Checksum::new(Vec::new());
        writer.write(b"DIRC").unwrap();
        writer.write(&[0, 0, 0, 2]).unwrap();
        let data = writer.write_checksum().unwrap();

        assert_eq!(data.len(), 8 + CHECKSUM_SIZE);
        assert_eq!(verify(&data).unwrap(), b"DIRC\0\0\0\x02");
    }

    #[test]
    fn short_input_fails_closed() {
        let error = verify(b"DIRC").unwrap_err();

        assert_eq!(kind_of(&error), Some(&CoreError::InvalidChecksum));
    }
}
