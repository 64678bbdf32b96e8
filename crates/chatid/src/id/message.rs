use super::root::{ROOT_LEN, Root};
use crate::codec::{define_raw_id, get, leading, put};
use crate::{MessageType, RawId, Result};
use bytes::{Buf, BufMut};

/// Encoded length of a [`MessageId`].
pub const MESSAGE_ID_LEN: usize = 1 + ROOT_LEN + 8 + 4 + 1;

/// Length of the conversation prefix returned by [`MessageId::prefix`].
pub const MESSAGE_ID_PREFIX_LEN: usize = 1 + ROOT_LEN;

/// One message inside a conversation.
///
/// ```text
///  Byte:   0      1          43         51      55       56
///          +------+----------+----------+-------+--------+
///  Field:  | type | root     | ts (i64) | nonce | suffix |
///          +------+----------+----------+-------+--------+
///          |<-- prefix --->|
/// ```
///
/// The leading byte is a [`MessageType`], not a [`Kind`](crate::Kind).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId {
    message_type: MessageType,
    root: Root,
    timestamp: i64,
    nonce: u32,
    suffix: u8,
}

impl MessageId {
    #[must_use]
    pub const fn from_components(
        message_type: MessageType,
        root: Root,
        timestamp: i64,
        nonce: u32,
        suffix: u8,
    ) -> Self {
        Self {
            message_type,
            root,
            timestamp,
            nonce,
            suffix,
        }
    }

    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        self.message_type
    }

    #[must_use]
    pub const fn root(&self) -> Root {
        self.root
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
    pub const fn suffix(&self) -> u8 {
        self.suffix
    }

    /// Returns a copy with a different type tag, e.g. when an unsent message
    /// is delivered.
    #[must_use]
    pub const fn with_type(self, message_type: MessageType) -> Self {
        Self {
            message_type,
            ..self
        }
    }

    /// The leading type-plus-root bytes of an encoded message id.
    ///
    /// Every message of one type in one conversation shares this prefix, so it
    /// keys range scans over that conversation. Only the length of `raw` is
    /// checked.
    ///
    /// # Errors
    ///
    /// [`Error::TruncatedInput`](crate::Error::TruncatedInput) when `raw` is
    /// shorter than [`MESSAGE_ID_PREFIX_LEN`].
    pub fn prefix(raw: &[u8]) -> Result<[u8; MESSAGE_ID_PREFIX_LEN]> {
        leading(raw)
    }

    /// The prefix of this id without encoding the whole of it.
    #[must_use]
    pub fn key_prefix(&self) -> [u8; MESSAGE_ID_PREFIX_LEN] {
        Self::conversation_prefix(self.message_type, &self.root)
    }

    /// The prefix shared by every message of `message_type` under `root`.
    #[must_use]
    pub fn conversation_prefix(
        message_type: MessageType,
        root: &Root,
    ) -> [u8; MESSAGE_ID_PREFIX_LEN] {
        let mut raw = [0u8; MESSAGE_ID_PREFIX_LEN];
        let mut out: &mut [u8] = &mut raw;
        put(&mut out, message_type.tag());
        root.write_to(&mut out);
        raw
    }
}

impl RawId for MessageId {
    const RAW_LEN: usize = MESSAGE_ID_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, self.message_type.tag());
        self.root.write_to(buf);
        put(buf, self.timestamp);
        put(buf, self.nonce);
        put(buf, self.suffix);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        let message_type = MessageType::try_from(get::<u8, _>(buf, "message type")?)?;
        let root = Root::read_from(buf)?;
        Ok(Self {
            message_type,
            root,
            timestamp: get(buf, "message timestamp")?,
            nonce: get(buf, "message nonce")?,
            suffix: get(buf, "message suffix")?,
        })
    }
}

define_raw_id!(MessageId, MESSAGE_ID_LEN);
