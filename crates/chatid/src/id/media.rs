use super::node::{NODE_ID_LEN, NodeId};
use crate::codec::{define_raw_id, get, put};
use crate::{Kind, RawId, Result};
use bytes::{Buf, BufMut};
use core::fmt;

/// Encoded length of a [`MediaId`].
pub const MEDIA_ID_LEN: usize = 1 + 8 + 4 + 4 + 2;

/// Encoded length of a [`MediaReference`].
pub const MEDIA_REF_LEN: usize = 1 + 8 + 2 + MEDIA_ID_LEN + 1;

/// Encoded length of a [`StickerRef`].
pub const STICKER_REF_LEN: usize = 1 + 8 + 2 + NODE_ID_LEN + MEDIA_ID_LEN + 1;

/// Width over height, carried as the bits of an IEEE-754 `f32`.
///
/// Equality and hashing are on the bits, so a decoded ratio always equals the
/// one that was encoded.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AspectRatio(u32);

impl AspectRatio {
    pub const SQUARE: Self = Self::new(1.0);

    #[must_use]
    pub const fn new(ratio: f32) -> Self {
        Self(ratio.to_bits())
    }

    /// `width / height`; a zero height yields an infinite ratio.
    #[must_use]
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(width as f32 / height as f32)
    }

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn as_f32(self) -> f32 {
        f32::from_bits(self.0)
    }
}

impl fmt::Debug for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AspectRatio({})", self.as_f32())
    }
}

/// What a media handle points at.
///
/// Kept open: clients may introduce types this crate does not know about, and
/// the value round-trips unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaType(pub u16);

impl MediaType {
    pub const IMAGE: Self = Self(0);
    pub const VIDEO: Self = Self(1);
    pub const AUDIO: Self = Self(2);
    pub const GIF: Self = Self(3);
}

/// Content handle of one piece of media, assigned once at upload.
///
/// ```text
///  Byte:   0      1          9       13             17           19
///          +------+----------+-------+--------------+------------+
///  Field:  | kind | ts (i64) | nonce | aspect ratio | media type |
///          +------+----------+-------+--------------+------------+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaId {
    timestamp: i64,
    nonce: u32,
    aspect_ratio: AspectRatio,
    media_type: MediaType,
}

impl MediaId {
    #[must_use]
    pub const fn from_components(
        timestamp: i64,
        nonce: u32,
        aspect_ratio: AspectRatio,
        media_type: MediaType,
    ) -> Self {
        Self {
            timestamp,
            nonce,
            aspect_ratio,
            media_type,
        }
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn nonce(&self) -> u32 {
        self.nonce
    }

    #[must_use]
    pub const fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        self.media_type
    }
}

impl RawId for MediaId {
    const RAW_LEN: usize = MEDIA_ID_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::Media.tag());
        put(buf, self.timestamp);
        put(buf, self.nonce);
        put(buf, self.aspect_ratio.to_bits());
        put(buf, self.media_type.0);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::Media.expect(get(buf, "media kind")?)?;
        Ok(Self {
            timestamp: get(buf, "media timestamp")?,
            nonce: get(buf, "media nonce")?,
            aspect_ratio: AspectRatio::from_bits(get(buf, "media aspect ratio")?),
            media_type: MediaType(get(buf, "media type")?),
        })
    }
}

define_raw_id!(MediaId, MEDIA_ID_LEN);

/// A placed use of a [`MediaId`]: which shard holds it and whether it is kept
/// permanently or may expire.
///
/// ```text
///  Byte:   0      1          9       11         30          31
///          +------+----------+-------+----------+-----------+
///  Field:  | kind | ts (i64) | place | media id | permanent |
///          +------+----------+-------+----------+-----------+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaReference {
    timestamp: i64,
    place: u16,
    media_id: MediaId,
    permanent: bool,
}

impl MediaReference {
    #[must_use]
    pub const fn from_components(
        timestamp: i64,
        place: u16,
        media_id: MediaId,
        permanent: bool,
    ) -> Self {
        Self {
            timestamp,
            place,
            media_id,
            permanent,
        }
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn place(&self) -> u16 {
        self.place
    }

    #[must_use]
    pub const fn media_id(&self) -> MediaId {
        self.media_id
    }

    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.permanent
    }
}

impl RawId for MediaReference {
    const RAW_LEN: usize = MEDIA_REF_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::MediaRef.tag());
        put(buf, self.timestamp);
        put(buf, self.place);
        self.media_id.write_to(buf);
        put(buf, self.permanent);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::MediaRef.expect(get(buf, "media ref kind")?)?;
        let timestamp = get(buf, "media ref timestamp")?;
        let place = get(buf, "media ref place")?;
        let media_id = MediaId::read_from(buf)?;
        let permanent = get(buf, "media ref permanent")?;
        Ok(Self {
            timestamp,
            place,
            media_id,
            permanent,
        })
    }
}

define_raw_id!(MediaReference, MEDIA_REF_LEN);

/// A [`MediaReference`] that belongs to a sticker pack, identified by the
/// pack owner's node.
///
/// ```text
///  Byte:   0      1          9       11     24         43          44
///          +------+----------+-------+------+----------+-----------+
///  Field:  | kind | ts (i64) | place | pack | media id | permanent |
///          +------+----------+-------+------+----------+-----------+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickerRef {
    timestamp: i64,
    place: u16,
    pack: NodeId,
    media_id: MediaId,
    permanent: bool,
}

impl StickerRef {
    #[must_use]
    pub const fn from_components(
        timestamp: i64,
        place: u16,
        pack: NodeId,
        media_id: MediaId,
        permanent: bool,
    ) -> Self {
        Self {
            timestamp,
            place,
            pack,
            media_id,
            permanent,
        }
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn place(&self) -> u16 {
        self.place
    }

    #[must_use]
    pub const fn pack(&self) -> NodeId {
        self.pack
    }

    #[must_use]
    pub const fn media_id(&self) -> MediaId {
        self.media_id
    }

    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// The same media without its pack.
    #[must_use]
    pub const fn media_reference(&self) -> MediaReference {
        MediaReference::from_components(self.timestamp, self.place, self.media_id, self.permanent)
    }
}

impl RawId for StickerRef {
    const RAW_LEN: usize = STICKER_REF_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::Sticker.tag());
        put(buf, self.timestamp);
        put(buf, self.place);
        self.pack.write_to(buf);
        self.media_id.write_to(buf);
        put(buf, self.permanent);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::Sticker.expect(get(buf, "sticker kind")?)?;
        let timestamp = get(buf, "sticker timestamp")?;
        let place = get(buf, "sticker place")?;
        let pack = NodeId::read_from(buf)?;
        let media_id = MediaId::read_from(buf)?;
        let permanent = get(buf, "sticker permanent")?;
        Ok(Self {
            timestamp,
            place,
            pack,
            media_id,
            permanent,
        })
    }
}

define_raw_id!(StickerRef, STICKER_REF_LEN);
