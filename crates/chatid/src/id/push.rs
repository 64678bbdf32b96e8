use super::node::{NODE_ID_LEN, NodeId};
use crate::codec::{define_raw_id, get, leading, put};
use crate::{Kind, RawId, Result};
use bytes::{Buf, BufMut};

/// Encoded length of a [`PushId`].
pub const PUSH_ID_LEN: usize = 1 + NODE_ID_LEN + 4 + 8 + 4;

/// Length of the per-device channel prefix returned by [`PushId::prefix`].
pub const PUSH_ID_PREFIX_LEN: usize = 1 + NODE_ID_LEN + 4;

/// Encoded length of a [`DeviceId`].
pub const DEVICE_ID_LEN: usize = 1 + NODE_ID_LEN + 4;

/// Opaque 4-byte tag telling apart the devices of one node.
pub type Device = [u8; 4];

/// One push notification queued for a device of a node.
///
/// ```text
///  Byte:   0      1      14       18         26      30
///          +------+------+--------+----------+-------+
///  Field:  | kind | node | device | ts (i64) | nonce |
///          +------+------+--------+----------+-------+
///          |<--- prefix ------->|
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PushId {
    node: NodeId,
    device: Device,
    timestamp: i64,
    nonce: u32,
}

impl PushId {
    #[must_use]
    pub const fn from_components(node: NodeId, device: Device, timestamp: i64, nonce: u32) -> Self {
        Self {
            node,
            device,
            timestamp,
            nonce,
        }
    }

    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub const fn device(&self) -> Device {
        self.device
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn nonce(&self) -> u32 {
        self.nonce
    }

    /// The device this push is addressed to.
    #[must_use]
    pub const fn device_id(&self) -> DeviceId {
        DeviceId::new(self.node, self.device)
    }

    /// The leading kind, node and device bytes of an encoded push id: the
    /// key of every pending push for one device.
    ///
    /// # Errors
    ///
    /// [`Error::TruncatedInput`](crate::Error::TruncatedInput) when `raw` is
    /// shorter than [`PUSH_ID_PREFIX_LEN`].
    pub fn prefix(raw: &[u8]) -> Result<[u8; PUSH_ID_PREFIX_LEN]> {
        leading(raw)
    }

    /// The channel prefix of this id.
    #[must_use]
    pub fn key_prefix(&self) -> [u8; PUSH_ID_PREFIX_LEN] {
        Self::channel_prefix(&self.node, self.device)
    }

    /// The prefix shared by every push to `device` of `node`.
    #[must_use]
    pub fn channel_prefix(node: &NodeId, device: Device) -> [u8; PUSH_ID_PREFIX_LEN] {
        let mut raw = [0u8; PUSH_ID_PREFIX_LEN];
        let mut out: &mut [u8] = &mut raw;
        put(&mut out, Kind::Push.tag());
        node.write_to(&mut out);
        put(&mut out, device);
        raw
    }
}

impl RawId for PushId {
    const RAW_LEN: usize = PUSH_ID_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::Push.tag());
        self.node.write_to(buf);
        put(buf, self.device);
        put(buf, self.timestamp);
        put(buf, self.nonce);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::Push.expect(get(buf, "push kind")?)?;
        let node = NodeId::read_from(buf)?;
        Ok(Self {
            node,
            device: get(buf, "push device")?,
            timestamp: get(buf, "push timestamp")?,
            nonce: get(buf, "push nonce")?,
        })
    }
}

define_raw_id!(PushId, PUSH_ID_LEN);

/// Device-qualified address of a node.
///
/// Same shape as a push prefix but under its own kind, so device records and
/// push queues never share keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceId {
    node: NodeId,
    device: Device,
}

impl DeviceId {
    #[must_use]
    pub const fn new(node: NodeId, device: Device) -> Self {
        Self { node, device }
    }

    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub const fn device(&self) -> Device {
        self.device
    }
}

impl RawId for DeviceId {
    const RAW_LEN: usize = DEVICE_ID_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::Iddev.tag());
        self.node.write_to(buf);
        put(buf, self.device);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::Iddev.expect(get(buf, "device kind")?)?;
        let node = NodeId::read_from(buf)?;
        let device = get(buf, "device tag")?;
        Ok(Self { node, device })
    }
}

define_raw_id!(DeviceId, DEVICE_ID_LEN);
