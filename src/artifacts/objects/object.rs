use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Encode an object's payload (without the `<kind> <len>\0` header).
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decode an object's payload (the header has already been consumed).
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        let payload = self.serialize()?;
        let framed = self.object_type().frame(&payload)?;

        Ok(ObjectId::digest(&framed))
    }
}
