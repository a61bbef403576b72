//! Object database
//!
//! Content-addressed storage for blobs, trees and commits. Each object is framed
//! as `<kind> <len>\0<payload>`, hashed with SHA-1, zlib-compressed and written to
//! `objects/<first 2 hex chars>/<remaining 38 hex chars>`.

use crate::artifacts::objects::MIN_PREFIX_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::CoreError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

/// A decoded object read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(blob) => blob.object_type(),
            ObjectBox::Tree(tree) => tree.object_type(),
            ObjectBox::Commit(commit) => commit.object_type(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Compute the ID `payload` would be stored under, without writing anything.
    pub fn hash(&self, object_type: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        let framed = object_type.frame(payload)?;
        Ok(ObjectId::digest(&framed))
    }

    /// Store a payload of the given kind and return its ID
    ///
    /// Idempotent: when an object with the same ID is already on disk nothing is
    /// compressed or written.
    pub fn put(&self, object_type: ObjectType, payload: &[u8]) -> anyhow::Result<ObjectId> {
        let framed = object_type.frame(payload)?;
        let object_id = ObjectId::digest(&framed);
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            debug!(oid = %object_id, kind = %object_type, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, framed)?;
        debug!(oid = %object_id, kind = %object_type, size = payload.len(), "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let payload = object.serialize()?;
        self.put(object.object_type(), &payload)
    }

    /// Read an object by full ID or unique prefix (at least 2 hex characters)
    pub fn get(&self, prefix: &str) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_id = self.resolve_prefix(prefix)?;
        self.load(&object_id)
    }

    /// Read an object by its full ID and check its declared length
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.exists() {
            return Err(CoreError::NotFound(object_id.to_string()).into());
        }

        let framed = self.read_object(object_path)?;
        let (object_type, payload) = ObjectType::unframe(object_id.as_ref(), framed)?;
        debug!(oid = %object_id, kind = %object_type, size = payload.len(), "loaded object");

        Ok((object_type, payload))
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, payload) = self.load(object_id)?;
        let object_reader = Cursor::new(payload);

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Blob::deserialize(object_reader)?)),
            ObjectType::Tree => Ok(ObjectBox::Tree(Tree::deserialize(object_reader)?)),
            ObjectType::Commit => Ok(ObjectBox::Commit(Commit::deserialize(object_reader)?)),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(commit)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        match self.parse_object(object_id)? {
            ObjectBox::Tree(tree) => Ok(Some(tree)),
            _ => Ok(None),
        }
    }

    /// Resolve a hex prefix to exactly one stored object
    ///
    /// Fails with `InvalidObjectId` for prefixes shorter than 2 characters or with
    /// non-hex characters, `NotFound` when nothing matches and
    /// `AmbiguousReference` when more than one object does.
    pub fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if prefix.len() < MIN_PREFIX_LENGTH || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidObjectId(prefix.to_string()).into());
        }

        let prefix = prefix.to_ascii_lowercase();
        let mut matches = self.find_objects_by_prefix(&prefix)?;

        match matches.len() {
            0 => Err(CoreError::NotFound(prefix).into()),
            1 => Ok(matches.remove(0)),
            _ => {
                matches.sort();
                Err(CoreError::AmbiguousReference {
                    prefix,
                    candidates: matches,
                }
                .into())
            }
        }
    }

    /// Find all objects whose ID starts with the given prefix.
    ///
    /// Only the shard directory named by the first two characters is listed.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let (dir_name, file_prefix) = prefix.split_at(MIN_PREFIX_LENGTH);
        let dir_path = self.path.join(dir_name);

        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)
            .context(format!("Unable to list {}", dir_path.display()))?
        {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix) {
                // temp files and strays are skipped
                if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                    matches.push(oid);
                }
            }
        }

        Ok(matches)
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
