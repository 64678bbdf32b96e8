use crate::{Error, Result};
use bytes::{Buf, BufMut};
use core::fmt;
use core::hash::Hash;

/// A fixed-width scalar with a big-endian wire form.
///
/// Scalars are written back to back with no padding and no length prefix, so
/// the order in which an identifier writes its fields *is* its wire format.
/// [`get`] and [`put`] are the only entry points identifiers use.
pub trait Scalar: Sized + Copy {
    /// Width on the wire, in bytes.
    const WIDTH: usize;

    /// Writes the value in big-endian order.
    fn put_be<B: BufMut>(self, buf: &mut B);

    /// Reads the value. `buf` is guaranteed to hold at least `WIDTH` bytes.
    fn get_be<B: Buf>(buf: &mut B, field: &'static str) -> Result<Self>;
}

macro_rules! int_scalar {
    ($($ty:ty => $put:ident, $get:ident;)*) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();

                fn put_be<B: BufMut>(self, buf: &mut B) {
                    buf.$put(self);
                }

                fn get_be<B: Buf>(buf: &mut B, _field: &'static str) -> Result<Self> {
                    Ok(buf.$get())
                }
            }
        )*
    };
}

int_scalar! {
    u8 => put_u8, get_u8;
    u16 => put_u16, get_u16;
    u32 => put_u32, get_u32;
    i64 => put_i64, get_i64;
}

impl Scalar for bool {
    const WIDTH: usize = 1;

    fn put_be<B: BufMut>(self, buf: &mut B) {
        buf.put_u8(u8::from(self));
    }

    fn get_be<B: Buf>(buf: &mut B, field: &'static str) -> Result<Self> {
        match buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::malformed(
                field,
                format!("flag byte must be 0 or 1, found {other:#04x}"),
            )),
        }
    }
}

impl<const N: usize> Scalar for [u8; N] {
    const WIDTH: usize = N;

    fn put_be<B: BufMut>(self, buf: &mut B) {
        buf.put_slice(&self);
    }

    fn get_be<B: Buf>(buf: &mut B, _field: &'static str) -> Result<Self> {
        let mut out = [0u8; N];
        buf.copy_to_slice(&mut out);
        Ok(out)
    }
}

/// Writes one scalar field.
#[inline]
pub fn put<T: Scalar, B: BufMut>(buf: &mut B, value: T) {
    value.put_be(buf);
}

/// Reads one scalar field named `field`.
///
/// # Errors
///
/// - [`Error::TruncatedInput`] if fewer than `T::WIDTH` bytes remain. Nothing
///   is consumed in that case and nothing is zero-filled.
/// - [`Error::MalformedField`] if the bytes are not a legal value of `T`.
pub fn get<T: Scalar, B: Buf>(buf: &mut B, field: &'static str) -> Result<T> {
    let available = buf.remaining();
    if available < T::WIDTH {
        return Err(Error::TruncatedInput {
            needed: T::WIDTH,
            available,
        });
    }
    T::get_be(buf, field)
}

/// A fixed-width identifier with a binary and a hex text form.
///
/// Nested identifiers are encoded by calling the inner type's
/// [`write_to`](RawId::write_to) / [`read_from`](RawId::read_from) in field
/// position, so every type owns exactly one description of its layout.
///
/// `decode(encode(id)) == id` and `from_hex(to_hex(id)) == id` hold for every
/// value a constructor can produce.
pub trait RawId: Sized + Copy + Eq + Hash + fmt::Debug {
    /// Encoded length in bytes.
    const RAW_LEN: usize;

    /// Appends the encoded identifier to `buf`.
    fn write_to<B: BufMut>(&self, buf: &mut B);

    /// Consumes exactly [`RAW_LEN`](RawId::RAW_LEN) bytes from `buf`.
    ///
    /// # Errors
    ///
    /// [`Error::TruncatedInput`] or [`Error::MalformedField`]; see [`get`].
    fn read_from<B: Buf>(buf: &mut B) -> Result<Self>;

    /// Encodes into a freshly allocated buffer of exactly `RAW_LEN` bytes.
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::RAW_LEN);
        self.write_to(&mut out);
        out
    }

    /// Decodes an identifier occupying all of `bytes`.
    ///
    /// # Errors
    ///
    /// As [`read_from`](RawId::read_from), plus [`Error::MalformedField`]
    /// when bytes are left over after the identifier.
    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;
        let decoded = Self::read_from(&mut buf).and_then(|id| {
            if buf.has_remaining() {
                return Err(Error::malformed(
                    "length",
                    format!("expected {} bytes, found {}", Self::RAW_LEN, bytes.len()),
                ));
            }
            Ok(id)
        });
        #[cfg(feature = "tracing")]
        if let Err(err) = &decoded {
            tracing::debug!(%err, len = bytes.len(), "identifier decode failed");
        }
        decoded
    }

    /// Lowercase hex of the encoded identifier, `2 * RAW_LEN` characters.
    fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Parses the output of [`to_hex`](RawId::to_hex).
    ///
    /// # Errors
    ///
    /// [`Error::MalformedField`] for text that is not hex, otherwise as
    /// [`decode`](RawId::decode).
    fn from_hex(s: &str) -> Result<Self> {
        let raw = hex::decode(s).map_err(|err| {
            let err = Error::from(err);
            #[cfg(feature = "tracing")]
            tracing::debug!(%err, len = s.len(), "identifier decode failed");
            err
        })?;
        Self::decode(&raw)
    }
}

/// Implements `to_bytes`/`from_bytes`, the fixed-array conversions, `Display`
/// (hex) and `FromStr` for a [`RawId`] of known length.
macro_rules! define_raw_id {
    ($name:ident, $len:expr) => {
        const _: () = assert!(<$name as $crate::RawId>::RAW_LEN == $len);

        impl $name {
            /// Encodes into a fixed-size array.
            #[must_use]
            pub fn to_bytes(&self) -> [u8; $len] {
                let mut raw = [0u8; $len];
                let mut out: &mut [u8] = &mut raw;
                $crate::RawId::write_to(self, &mut out);
                debug_assert!(out.is_empty(), "layout shorter than RAW_LEN");
                raw
            }

            /// Decodes an identifier occupying exactly `bytes`.
            ///
            /// # Errors
            ///
            /// As [`RawId::decode`](crate::RawId::decode).
            pub fn from_bytes(bytes: &[u8]) -> $crate::Result<Self> {
                <Self as $crate::RawId>::decode(bytes)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(id: $name) -> Self {
                id.to_bytes()
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = $crate::Error;

            fn try_from(bytes: &[u8]) -> $crate::Result<Self> {
                <Self as $crate::RawId>::decode(bytes)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&hex::encode(self.to_bytes()))
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> $crate::Result<Self> {
                <Self as $crate::RawId>::from_hex(s)
            }
        }
    };
}
pub(crate) use define_raw_id;

/// Checks that `raw` holds at least `len` bytes and returns that prefix.
pub(crate) fn leading<const LEN: usize>(raw: &[u8]) -> Result<[u8; LEN]> {
    match raw.get(..LEN) {
        Some(prefix) => {
            let mut out = [0u8; LEN];
            out.copy_from_slice(prefix);
            Ok(out)
        }
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!(needed = LEN, available = raw.len(), "identifier prefix truncated");
            Err(Error::TruncatedInput {
                needed: LEN,
                available: raw.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_are_big_endian_and_unpadded() {
        let mut out = Vec::new();
        put(&mut out, 0x05u8);
        put(&mut out, 0x0102u16);
        put(&mut out, 0x0304_0506u32);
        put(&mut out, -2i64);
        put(&mut out, true);
        put(&mut out, [0xaau8, 0xbb]);
        assert_eq!(
            out,
            [
                0x05, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
                0xff, 0xfe, 0x01, 0xaa, 0xbb
            ]
        );

        let mut buf = out.as_slice();
        assert_eq!(get::<u8, _>(&mut buf, "a"), Ok(0x05));
        assert_eq!(get::<u16, _>(&mut buf, "b"), Ok(0x0102));
        assert_eq!(get::<u32, _>(&mut buf, "c"), Ok(0x0304_0506));
        assert_eq!(get::<i64, _>(&mut buf, "d"), Ok(-2));
        assert_eq!(get::<bool, _>(&mut buf, "e"), Ok(true));
        assert_eq!(get::<[u8; 2], _>(&mut buf, "f"), Ok([0xaa, 0xbb]));
        assert!(buf.is_empty());
    }

    #[test]
    fn short_input_is_truncated_not_zero_filled() {
        let mut buf: &[u8] = &[1, 2, 3];
        assert_eq!(
            get::<i64, _>(&mut buf, "timestamp"),
            Err(Error::TruncatedInput {
                needed: 8,
                available: 3
            })
        );
        // nothing consumed
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn flag_outside_zero_one_is_malformed() {
        let mut buf: &[u8] = &[2];
        let err = get::<bool, _>(&mut buf, "confirmed").unwrap_err();
        assert!(matches!(err, Error::MalformedField { field: "confirmed", .. }));
    }

    #[test]
    fn leading_requires_enough_bytes() {
        assert_eq!(leading::<2>(&[1, 2, 3]), Ok([1, 2]));
        assert_eq!(
            leading::<4>(&[1, 2, 3]),
            Err(Error::TruncatedInput {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn from_bytes_requires_exact_length() {
        let node = crate::NodeId::from_components(7, 9);
        let raw = node.to_bytes();
        assert_eq!(crate::NodeId::from_bytes(&raw), Ok(node));
        assert!(matches!(
            crate::NodeId::from_bytes(&raw[..12]),
            Err(Error::TruncatedInput { .. })
        ));
        let mut long = raw.to_vec();
        long.push(0);
        assert!(matches!(
            crate::NodeId::from_bytes(&long),
            Err(Error::MalformedField { field: "length", .. })
        ));
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn every_decode_failure_emits_a_debug_event() {
        use crate::NodeId;
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut wrong_kind = NodeId::ZERO.to_bytes();
            wrong_kind[0] = 0x01;
            let mut bad_flag = crate::Root::new(NodeId::ZERO, NodeId::ZERO, 0, 0).to_bytes();
            bad_flag[crate::ROOT_LEN - 1] = 2;
            let mut trailing = NodeId::ZERO.encode();
            trailing.push(0);

            assert!(NodeId::decode(&wrong_kind).is_err());
            assert!(NodeId::decode(&[0xff; 13]).is_err());
            assert!(crate::Root::decode(&bad_flag).is_err());
            assert!(NodeId::decode(&trailing).is_err());
            assert!(NodeId::decode(&[0x05]).is_err());
            assert!(NodeId::from_hex("zz").is_err());
            assert!(NodeId::decode(&NodeId::ZERO.encode()).is_ok());
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("identifier decode failed").count(), 6);
    }
}
