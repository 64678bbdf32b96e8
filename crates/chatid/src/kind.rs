use crate::{Error, Result};
use core::fmt;

/// The global kind-tag space.
///
/// The leading byte of most encoded identifiers is one of these values. The
/// tags never alias across entity types, so keys of different kinds can share
/// one keyspace without colliding. Decoders only accept the kind that is legal
/// in their own context; see [`Kind::expect`].
///
/// `TxRef`, `Snip` and `Boost` belong to entities outside this crate. They are
/// recognised so that a misplaced key is reported as the wrong kind instead of
/// an unknown byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Kind {
    /// Reserved for messages; a [`MessageId`](crate::MessageId) leads with its [`MessageType`] instead.
    Message = 0x00,
    /// A conversation [`Root`](crate::Root).
    Root = 0x01,
    /// A [`MediaId`](crate::MediaId).
    Media = 0x02,
    /// A [`MediaReference`](crate::MediaReference).
    MediaRef = 0x03,
    /// A transaction reference. Not decoded here.
    TxRef = 0x04,
    /// A [`NodeId`](crate::NodeId).
    Node = 0x05,
    /// A [`PushId`](crate::PushId).
    Push = 0x06,
    /// A snippet. Not decoded here.
    Snip = 0x07,
    /// A [`DeviceId`](crate::DeviceId).
    Iddev = 0x10,
    /// A [`StickerRef`](crate::StickerRef).
    Sticker = 0x11,
    /// A boost. Not decoded here.
    Boost = 0x70,
}

impl Kind {
    /// Returns the wire byte of this kind.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Validates that `tag` is exactly `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedField`] when the tag is unknown or names a
    /// different kind.
    pub fn expect(self, tag: u8) -> Result<()> {
        let found = Self::try_from(tag)?;
        if found != self {
            return Err(Error::malformed(
                "kind",
                format!("expected {self}, found {found}"),
            ));
        }
        Ok(())
    }
}

impl TryFrom<u8> for Kind {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Ok(match tag {
            0x00 => Self::Message,
            0x01 => Self::Root,
            0x02 => Self::Media,
            0x03 => Self::MediaRef,
            0x04 => Self::TxRef,
            0x05 => Self::Node,
            0x06 => Self::Push,
            0x07 => Self::Snip,
            0x10 => Self::Iddev,
            0x11 => Self::Sticker,
            0x70 => Self::Boost,
            _ => return Err(Error::malformed("kind", format!("unknown tag {tag:#04x}"))),
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({:#04x})", self.tag())
    }
}

/// Type/status tag leading an encoded [`MessageId`].
///
/// Message ids do not start with a [`Kind`]: their first byte says what the
/// message is, so range scans over one conversation can be split by type.
///
/// [`MessageId`]: crate::MessageId
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    Unsent = 0,
    Reaction = 1,
    Increment = 2,
    Chat = 3,
    Snip = 4,
    Placeholder = 5,
}

impl MessageType {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        Ok(match tag {
            0 => Self::Unsent,
            1 => Self::Reaction,
            2 => Self::Increment,
            3 => Self::Chat,
            4 => Self::Snip,
            5 => Self::Placeholder,
            _ => {
                return Err(Error::malformed(
                    "message type",
                    format!("unknown tag {tag:#04x}"),
                ));
            }
        })
    }
}
