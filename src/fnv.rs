//! 64-bit FNV-1a hashing.
//!
//! FNV-1a is cheap, deterministic, and good enough for short string keys in
//! tables that are not exposed to adversarial input. It is the hasher used
//! when the crate is built without `std` and without `foldhash`.

use core::hash::BuildHasher;
use core::hash::Hasher;

const FNV_OFFSET_BASIS: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// A [`Hasher`] computing the 64-bit FNV-1a digest of everything written to
/// it.
///
/// ```rust
/// use core::hash::Hasher;
///
/// use robin_hood_map::fnv::Fnv1aHasher;
///
/// let mut hasher = Fnv1aHasher::new();
/// hasher.write(b"a");
/// assert_eq!(hasher.finish(), 0xAF63_DC4C_8601_EC8C);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fnv1aHasher {
    hash: u64,
}

impl Fnv1aHasher {
    /// Creates a hasher seeded with the FNV offset basis.
    pub const fn new() -> Self {
        Fnv1aHasher {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash ^= byte as u64;
            self.hash = self.hash.wrapping_mul(FNV_PRIME);
        }
    }
}

/// A [`BuildHasher`] producing [`Fnv1aHasher`]s.
///
/// Every hasher it builds starts from the same state, so hashes are stable
/// across runs and across tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1aBuildHasher;

impl BuildHasher for Fnv1aBuildHasher {
    type Hasher = Fnv1aHasher;

    fn build_hasher(&self) -> Self::Hasher {
        Fnv1aHasher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fnv1a(bytes: &[u8]) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        hasher.write(bytes);
        hasher.finish()
    }

    #[test]
    fn known_digests() {
        assert_eq!(fnv1a(b""), FNV_OFFSET_BASIS);
        assert_eq!(fnv1a(b"a"), 0xAF63_DC4C_8601_EC8C);
        assert_eq!(fnv1a(b"foobar"), 0x8594_4171_F739_67E8);
    }

    #[test]
    fn incremental_writes_match_single_write() {
        let mut hasher = Fnv1aHasher::new();
        hasher.write(b"foo");
        hasher.write(b"bar");
        assert_eq!(hasher.finish(), fnv1a(b"foobar"));
    }

    #[test]
    fn build_hasher_is_deterministic() {
        let builder = Fnv1aBuildHasher;
        assert_eq!(builder.hash_one("key"), builder.hash_one("key"));
        assert_ne!(builder.hash_one("key"), builder.hash_one("other"));
    }
}
