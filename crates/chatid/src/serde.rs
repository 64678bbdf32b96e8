//! Field adapters for storing identifiers in their wire forms.
//!
//! The derived `Serialize` impls describe an identifier field by field. Use
//! these with `#[serde(with = "...")]` when a document should carry the key
//! itself instead.

use serde::{Deserializer, Serializer};

/// Serializes any [`RawId`](crate::RawId) as its lowercase hex string.
pub mod as_hex {
    use super::*;
    use crate::RawId;

    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: RawId,
        S: Serializer,
    {
        s.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: RawId,
        D: Deserializer<'de>,
    {
        struct HexVisitor<ID>(core::marker::PhantomData<ID>);

        impl<ID: RawId> serde::de::Visitor<'_> for HexVisitor<ID> {
            type Value = ID;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(formatter, "a {}-character hex identifier", 2 * ID::RAW_LEN)
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ID::from_hex(v).map_err(E::custom)
            }
        }

        d.deserialize_str(HexVisitor(core::marker::PhantomData))
    }
}

/// Serializes any [`RawId`](crate::RawId) as its raw bytes.
pub mod as_bytes {
    use super::*;
    use crate::RawId;

    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: RawId,
        S: Serializer,
    {
        s.serialize_bytes(&id.encode())
    }

    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: RawId,
        D: Deserializer<'de>,
    {
        struct BytesVisitor<ID>(core::marker::PhantomData<ID>);

        impl<'de, ID: RawId> serde::de::Visitor<'de> for BytesVisitor<ID> {
            type Value = ID;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(formatter, "{} identifier bytes", ID::RAW_LEN)
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ID::decode(v).map_err(E::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut raw = Vec::with_capacity(ID::RAW_LEN);
                while let Some(b) = seq.next_element::<u8>()? {
                    if raw.len() == ID::RAW_LEN {
                        return Err(serde::de::Error::invalid_length(ID::RAW_LEN + 1, &self));
                    }
                    raw.push(b);
                }
                ID::decode(&raw).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_bytes(BytesVisitor(core::marker::PhantomData))
    }
}
