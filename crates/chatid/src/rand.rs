use ::rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. Identifier nonces are `u32`.
///
/// # Example
/// ```
/// use chatid::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u32> for FixedRand {
///     fn rand(&self) -> u32 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&self) -> T;
}

impl<T, S: RandSource<T> + ?Sized> RandSource<T> for &S {
    fn rand(&self) -> T {
        (**self).rand()
    }
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is cryptographically secure (ChaCha-based) and automatically
/// reseeded periodically.
///
/// Each OS thread has its own RNG instance, so calls from multiple threads are
/// contention-free. This type does **not** store the RNG itself; it accesses
/// the thread-local generator on each call, so it may be freely shared across
/// threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u32> for ThreadRandom {
    fn rand(&self) -> u32 {
        rng().random()
    }
}
