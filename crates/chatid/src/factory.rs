#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    AspectRatio, Device, MediaId, MediaReference, MediaType, MessageId, MessageType, NodeId,
    PushId, RandSource, Root, StalenessPolicy, StickerRef, SystemClock, ThreadRandom, TimeSource,
};

/// Mints identifiers from an injected clock and random source.
///
/// Every timestamp comes from `T` and every nonce from `R`, so tests can pin
/// both. The factory holds no mutable state: it is `Sync` whenever its sources
/// are, and one instance can serve any number of threads.
///
/// # Example
/// ```
/// use chatid::{IdFactory, RawId};
///
/// let ids = IdFactory::default();
/// let alice = ids.node_id();
/// let bob = ids.node_id();
/// let root = ids.root(alice, bob, 3);
/// assert_eq!(root, chatid::Root::new(bob, alice, 3, root.timestamp()));
/// assert_eq!(root.to_hex().len(), 2 * chatid::ROOT_LEN);
/// ```
#[derive(Clone, Debug)]
pub struct IdFactory<T = SystemClock, R = ThreadRandom>
where
    T: TimeSource<i64>,
    R: RandSource<u32>,
{
    time: T,
    rng: R,
    policy: StalenessPolicy,
}

impl Default for IdFactory {
    fn default() -> Self {
        Self::new(SystemClock, ThreadRandom)
    }
}

impl<T, R> IdFactory<T, R>
where
    T: TimeSource<i64>,
    R: RandSource<u32>,
{
    /// Creates a factory with the default [`StalenessPolicy`].
    ///
    /// # Parameters
    /// - `time`: A [`TimeSource`] used to stamp every identifier
    /// - `rng`: A [`RandSource`] used to draw nonces
    pub fn new(time: T, rng: R) -> Self {
        Self {
            time,
            rng,
            policy: StalenessPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(self, policy: StalenessPolicy) -> Self {
        Self { policy, ..self }
    }

    pub const fn policy(&self) -> &StalenessPolicy {
        &self.policy
    }

    /// Current time of the factory's clock.
    pub fn now(&self) -> i64 {
        self.time.current_millis()
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn node_id(&self) -> NodeId {
        NodeId::generate(&self.time, &self.rng)
    }

    /// The canonical root for `a` and `b`, stamped now. Argument order does
    /// not matter.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn root(&self, a: NodeId, b: NodeId, place: u16) -> Root {
        Root::make(a, b, place, &self.time)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn message_id(&self, message_type: MessageType, root: Root, suffix: u8) -> MessageId {
        MessageId::from_components(message_type, root, self.now(), self.rng.rand(), suffix)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn media_id(&self, aspect_ratio: AspectRatio, media_type: MediaType) -> MediaId {
        MediaId::from_components(self.now(), self.rng.rand(), aspect_ratio, media_type)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn media_reference(&self, media_id: MediaId, place: u16, permanent: bool) -> MediaReference {
        MediaReference::from_components(self.now(), place, media_id, permanent)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn sticker_ref(
        &self,
        pack: NodeId,
        media_id: MediaId,
        place: u16,
        permanent: bool,
    ) -> StickerRef {
        StickerRef::from_components(self.now(), place, pack, media_id, permanent)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn push_id(&self, node: NodeId, device: Device) -> PushId {
        PushId::from_components(node, device, self.now(), self.rng.rand())
    }

    /// Whether `root` is old enough to be replaced under this factory's
    /// policy and clock.
    pub fn could_update(&self, root: &Root) -> bool {
        let eligible = self.policy.could_update(root, self.now());
        #[cfg(feature = "tracing")]
        tracing::trace!(root = %root, eligible, "staleness check");
        eligible
    }
}
