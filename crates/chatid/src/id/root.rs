use super::node::{NODE_ID_LEN, NodeId};
use crate::codec::{define_raw_id, get, put};
use crate::time::duration_millis;
use crate::{Error, Kind, RawId, Result, TimeSource};
use bytes::{Buf, BufMut};
use core::time::Duration;

/// Encoded length of a [`Root`].
pub const ROOT_LEN: usize = 1 + 2 * NODE_ID_LEN + 8 + 4 + 2 + 1;

/// Default age a root must reach before its metadata may be replaced.
pub const DEFAULT_STALENESS_WINDOW: Duration = Duration::from_secs(31 * 24 * 60 * 60);

/// Canonical key of a two-party conversation.
///
/// ```text
///  Byte:   0      1           14            27         35      39      41          42
///          +------+-----------+-------------+----------+-------+-------+-----------+
///  Field:  | kind | primary   | secondary   | ts (i64) | nonce | place | confirmed |
///          +------+-----------+-------------+----------+-------+-------+-----------+
/// ```
///
/// The constructor puts the node with the greater `(timestamp, nonce)` in the
/// primary slot, so building a root from the same two nodes in either order
/// yields the same bytes. Decoded roots are trusted to already be in that
/// order.
///
/// The two nodes are the conversation's identity. `timestamp`, `nonce`,
/// `place` and `confirmed` describe one version of it; a newer version is a
/// new `Root` sharing the same pair (see [`Root::is_homological`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Root {
    primary: NodeId,
    secondary: NodeId,
    timestamp: i64,
    nonce: u32,
    place: u16,
    confirmed: bool,
}

impl Root {
    /// Builds the canonical root for the conversation between `a` and `b`.
    ///
    /// Total and deterministic: the result depends only on the arguments, not
    /// on their order. The nonce starts at zero and the root is unconfirmed.
    #[must_use]
    pub fn new(a: NodeId, b: NodeId, place: u16, timestamp: i64) -> Self {
        let (primary, secondary) = if (a.timestamp(), a.nonce()) >= (b.timestamp(), b.nonce()) {
            (a, b)
        } else {
            (b, a)
        };
        Self {
            primary,
            secondary,
            timestamp,
            nonce: 0,
            place,
            confirmed: false,
        }
    }

    /// As [`Root::new`], stamped with the current time of `time`.
    #[must_use]
    pub fn make<T: TimeSource<i64>>(a: NodeId, b: NodeId, place: u16, time: &T) -> Self {
        Self::new(a, b, place, time.current_millis())
    }

    #[must_use]
    pub const fn primary(&self) -> NodeId {
        self.primary
    }

    #[must_use]
    pub const fn secondary(&self) -> NodeId {
        self.secondary
    }

    /// When this version of the conversation metadata was created.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Shard that owns the conversation. Opaque to this crate.
    #[must_use]
    pub const fn place(&self) -> u16 {
        self.place
    }

    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    #[must_use]
    pub const fn with_nonce(self, nonce: u32) -> Self {
        Self { nonce, ..self }
    }

    /// Returns a confirmed copy of this root.
    #[must_use]
    pub const fn confirm(self) -> Self {
        Self {
            confirmed: true,
            ..self
        }
    }

    /// Whether `self` and `other` name the same conversation.
    ///
    /// Compares the node pair only; reflexive and symmetric.
    #[must_use]
    pub fn is_homological(&self, other: &Self) -> bool {
        self.primary == other.primary && self.secondary == other.secondary
    }

    /// Whether no homologous root among `candidates` is strictly newer.
    ///
    /// `self` may appear in `candidates`; it is never newer than itself.
    #[must_use]
    pub fn is_most_up_to_date<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a Self>,
    {
        !candidates
            .into_iter()
            .any(|r| self.is_homological(r) && r.timestamp > self.timestamp)
    }

    /// Whether the metadata is old enough to be replaced, under the default
    /// [`StalenessPolicy`].
    #[must_use]
    pub fn could_update<T: TimeSource<i64>>(&self, time: &T) -> bool {
        StalenessPolicy::default().could_update(self, time.current_millis())
    }
}

/// Picks the root with the greatest timestamp. Ties go to the later
/// candidate.
///
/// Homology is not checked: callers filter to one conversation first. Over a
/// mixed set this simply returns the newest root.
pub fn most_up_to_date<'a, I>(candidates: I) -> Option<&'a Root>
where
    I: IntoIterator<Item = &'a Root>,
{
    candidates
        .into_iter()
        .reduce(|best, r| if best.timestamp > r.timestamp { best } else { r })
}

/// As [`most_up_to_date`], failing on an empty set.
///
/// # Errors
///
/// [`Error::EmptyInputSet`] when `candidates` yields nothing.
pub fn try_most_up_to_date<'a, I>(candidates: I) -> Result<&'a Root>
where
    I: IntoIterator<Item = &'a Root>,
{
    most_up_to_date(candidates).ok_or(Error::EmptyInputSet)
}

/// Gate on how often shared conversation metadata may be rewritten.
///
/// A root is eligible for replacement only once its timestamp is older than
/// `now - window`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StalenessPolicy {
    #[cfg_attr(feature = "serde", serde(rename = "window_days", with = "window_days"))]
    window: Duration,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STALENESS_WINDOW)
    }
}

impl StalenessPolicy {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { window }
    }

    #[must_use]
    pub const fn from_days(days: u64) -> Self {
        Self::new(Duration::from_secs(days.saturating_mul(24 * 60 * 60)))
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Whether `root` is older than the window, with `now_millis` in Unix
    /// epoch milliseconds.
    #[must_use]
    pub fn could_update(&self, root: &Root, now_millis: i64) -> bool {
        root.timestamp < now_millis.saturating_sub(duration_millis(self.window))
    }
}

#[cfg(feature = "serde")]
mod window_days {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    const DAY_SECS: u64 = 24 * 60 * 60;

    pub fn serialize<S: Serializer>(window: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(window.as_secs() / DAY_SECS)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let days = u64::deserialize(d)?;
        days.checked_mul(DAY_SECS)
            .map(Duration::from_secs)
            .ok_or_else(|| serde::de::Error::custom("staleness window overflows"))
    }
}

impl RawId for Root {
    const RAW_LEN: usize = ROOT_LEN;

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        put(buf, Kind::Root.tag());
        self.primary.write_to(buf);
        self.secondary.write_to(buf);
        put(buf, self.timestamp);
        put(buf, self.nonce);
        put(buf, self.place);
        put(buf, self.confirmed);
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Kind::Root.expect(get(buf, "root kind")?)?;
        let primary = NodeId::read_from(buf)?;
        let secondary = NodeId::read_from(buf)?;
        Ok(Self {
            primary,
            secondary,
            timestamp: get(buf, "root timestamp")?,
            nonce: get(buf, "root nonce")?,
            place: get(buf, "root place")?,
            confirmed: get(buf, "root confirmed")?,
        })
    }
}

define_raw_id!(Root, ROOT_LEN);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DAY_MILLIS;

    struct MockTime {
        millis: i64,
    }

    impl TimeSource<i64> for MockTime {
        fn current_millis(&self) -> i64 {
            self.millis
        }
    }

    fn node(ts: i64, nonce: u32) -> NodeId {
        NodeId::from_components(ts, nonce)
    }

    fn versions(timestamps: &[i64]) -> Vec<Root> {
        timestamps
            .iter()
            .map(|&ts| Root::new(node(1000, 7), node(2000, 9), 5, ts))
            .collect()
    }

    #[test]
    fn conversation_key_symmetry() {
        let a = node(1000, 7);
        let b = node(2000, 9);
        let time = MockTime { millis: 42 };

        let ab = Root::make(a, b, 5, &time);
        let ba = Root::make(b, a, 5, &time);

        assert_eq!(ab.primary(), b);
        assert_eq!(ab.secondary(), a);
        assert_eq!(ab, ba);
        assert_eq!(ab.to_bytes(), ba.to_bytes());
        assert_eq!(ab.timestamp(), 42);
        assert_eq!(ab.place(), 5);
        assert!(!ab.is_confirmed());
    }

    #[test]
    fn equal_timestamps_still_commute() {
        let a = node(1000, 1);
        let b = node(1000, 2);
        assert_eq!(Root::new(a, b, 0, 0), Root::new(b, a, 0, 0));
        assert_eq!(Root::new(a, b, 0, 0).primary(), b);
    }

    #[test]
    fn layout() {
        let root = Root::new(node(1, 2), node(3, 4), 0x0102, 0x10)
            .with_nonce(0xdead_beef)
            .confirm();
        let raw = root.to_bytes();
        assert_eq!(raw.len(), 42);
        assert_eq!(raw[0], Kind::Root.tag());
        assert_eq!(raw[1..14], node(3, 4).to_bytes());
        assert_eq!(raw[14..27], node(1, 2).to_bytes());
        assert_eq!(raw[27..35], 0x10i64.to_be_bytes());
        assert_eq!(raw[35..39], [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(raw[39..41], [0x01, 0x02]);
        assert_eq!(raw[41], 1);
        assert_eq!(Root::decode(&raw), Ok(root));
    }

    #[test]
    fn homology_ignores_metadata() {
        let [old, new] = versions(&[100, 200]).try_into().unwrap();
        let new = new.confirm().with_nonce(3);
        assert!(old.is_homological(&old));
        assert!(old.is_homological(&new));
        assert!(new.is_homological(&old));

        let other = Root::new(node(1000, 7), node(2000, 10), 5, 100);
        assert!(!old.is_homological(&other));
        assert!(!other.is_homological(&old));
    }

    #[test]
    fn most_up_to_date_of_three() {
        let roots = versions(&[100, 200, 300]);
        assert_eq!(most_up_to_date(&roots).map(Root::timestamp), Some(300));
        assert!(!roots[0].is_most_up_to_date(&roots));
        assert!(!roots[1].is_most_up_to_date(&roots));
        assert!(roots[2].is_most_up_to_date(&roots));
    }

    #[test]
    fn newer_unrelated_roots_do_not_count() {
        let mine = Root::new(node(1, 1), node(2, 2), 0, 100);
        let unrelated = Root::new(node(3, 3), node(4, 4), 0, 500);
        assert!(mine.is_most_up_to_date([&mine, &unrelated]));
    }

    #[test]
    fn most_up_to_date_of_nothing() {
        let none: [Root; 0] = [];
        assert_eq!(most_up_to_date(&none), None);
        assert_eq!(try_most_up_to_date(&none), Err(Error::EmptyInputSet));
    }

    #[test]
    fn most_up_to_date_ignores_pairing() {
        let a = Root::new(node(1, 1), node(2, 2), 0, 100);
        let b = Root::new(node(3, 3), node(4, 4), 0, 500);
        assert_eq!(try_most_up_to_date([&a, &b]), Ok(&b));
    }

    #[test]
    fn most_up_to_date_ties_go_to_later_candidate() {
        let a = Root::new(node(1, 1), node(2, 2), 1, 100);
        let b = Root::new(node(1, 1), node(2, 2), 2, 100);
        assert_eq!(most_up_to_date([&a, &b]).map(Root::place), Some(2));
    }

    #[test]
    fn staleness_gate() {
        let now = 100 * DAY_MILLIS;
        let time = MockTime { millis: now };
        let stale = Root::new(node(1, 1), node(2, 2), 0, now - 32 * DAY_MILLIS);
        let fresh = Root::new(node(1, 1), node(2, 2), 0, now - 10 * DAY_MILLIS);
        assert!(stale.could_update(&time));
        assert!(!fresh.could_update(&time));

        let edge = Root::new(node(1, 1), node(2, 2), 0, now - 31 * DAY_MILLIS);
        assert!(!edge.could_update(&time));
    }

    #[test]
    fn staleness_window_is_configurable() {
        let now = 100 * DAY_MILLIS;
        let root = Root::new(node(1, 1), node(2, 2), 0, now - 10 * DAY_MILLIS);
        assert!(StalenessPolicy::from_days(7).could_update(&root, now));
        assert!(!StalenessPolicy::from_days(14).could_update(&root, now));
        assert_eq!(StalenessPolicy::default().window(), DEFAULT_STALENESS_WINDOW);
    }

    #[test]
    fn truncated_and_bad_flags() {
        let raw = Root::new(node(1, 1), node(2, 2), 0, 0).to_bytes();
        assert!(matches!(
            Root::decode(&raw[..41]),
            Err(Error::TruncatedInput { needed: 1, available: 0 })
        ));

        let mut bad = raw;
        bad[41] = 7;
        assert!(matches!(
            Root::decode(&bad),
            Err(Error::MalformedField { field: "root confirmed", .. })
        ));

        let mut wrong_inner = raw;
        wrong_inner[1] = Kind::Root.tag();
        assert!(matches!(
            Root::decode(&wrong_inner),
            Err(Error::MalformedField { field: "kind", .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn staleness_policy_serializes_as_days() {
        let policy = StalenessPolicy::from_days(31);
        let json = serde_json::to_string(&policy).expect("serialize");
        assert_eq!(json, r#"{"window_days":31}"#);
        let back: StalenessPolicy = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, policy);
    }
}
