use crate::codec::{define_raw_id, get, put};
use crate::{Kind, RandSource, RawId, Result, TimeSource};
use bytes::{Buf, BufMut};

/// Encoded length of a [`NodeId`]: kind, timestamp, nonce.
pub const NODE_ID_LEN: usize = 1 + 8 + 4;

/// The smallest addressable entity: a participant or device endpoint at the
/// moment it was created.
///
/// ```text
///  Byte:   0      1          9       13
///          +------+----------+-------+
///  Field:  | kind | ts (i64) | nonce |
///          +------+----------+-------+
/// ```
///
/// Identity is `(timestamp, nonce)`. The kind byte is always [`Kind::Node`]
/// and is framing only, so it is not stored.
///
/// The timestamp is a signed big-endian field. Encoded ids sort by time only
/// while timestamps are non-negative: a pre-1970 id sorts after every
/// post-1970 one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    timestamp: i64,
    nonce: u32,
}

impl NodeId {
    /// The placeholder node: timestamp and nonce both zero.
    pub const ZERO: Self = Self::from_components(0, 0);

    #[must_use]
    pub const fn from_components(timestamp: i64, nonce: u32) -> Self {
        Self { timestamp, nonce }
    }

    /// Mints a node id stamped with `time` and a nonce drawn from `rng`.
    #[must_use]
    pub fn generate<T, R>(time: &T, rng: &R) -> Self
    where
        T: TimeSource<i64>,
        R: RandSource<u32>,
    {
        Self::from_components(time.current_millis(), rng.rand())
    }

    /// Creation time, milliseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn nonce(&self) -> u32 {
        self.nonce
    }
}

impl RawId for NodeId {
    const RAW_LEN: usize = NODE_ID_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::Node.tag());
        put(buf, self.timestamp);
        put(buf, self.nonce);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::Node.expect(get(buf, "node kind")?)?;
        let timestamp = get(buf, "node timestamp")?;
        let nonce = get(buf, "node nonce")?;
        Ok(Self { timestamp, nonce })
    }
}

define_raw_id!(NodeId, NODE_ID_LEN);
