//! Slot arithmetic shared by every table operation.
//!
//! Tables always hold `2^capacity_exp` slots, so every position computation
//! is a mask rather than a modulo. None of these functions know anything
//! about what is stored in the slots; they only map hashes to positions and
//! measure how far a bucket sits from where its hash wants it.

use core::fmt;

/// Smallest capacity exponent a table grows to on its first insertion.
pub const MIN_CAPACITY_EXP: u32 = 3;

cfg_if::cfg_if! {
    if #[cfg(feature = "density-ninety-seven")] {
        const DEFAULT_LOAD_PERMILLE: u16 = 970;
    } else if #[cfg(feature = "density-eighty-seven-point-five")] {
        const DEFAULT_LOAD_PERMILLE: u16 = 875;
    } else {
        const DEFAULT_LOAD_PERMILLE: u16 = 900;
    }
}

/// Mask selecting the low `capacity_exp` bits of a hash or position.
///
/// `capacity_exp` must be smaller than `usize::BITS`.
#[inline(always)]
pub const fn capacity_mask(capacity_exp: u32) -> usize {
    (1usize << capacity_exp) - 1
}

/// The home slot of `hash` in a table of `2^capacity_exp` slots.
#[inline(always)]
pub const fn home_slot(hash: u64, capacity_exp: u32) -> usize {
    hash as usize & capacity_mask(capacity_exp)
}

/// Cyclic forward distance from `home` to `pos`.
///
/// A bucket stored at `pos` whose hash maps to `home` has been displaced
/// this many slots. Positions wrap through the capacity mask, so a bucket
/// with home `3` stored at `0` in a four-slot table has distance `1`.
#[inline(always)]
pub const fn probe_distance(home: usize, pos: usize, capacity_exp: u32) -> usize {
    pos.wrapping_sub(home) & capacity_mask(capacity_exp)
}

/// The slot after `pos`, wrapping to `0` past the end of the table.
#[inline(always)]
pub const fn next_slot(pos: usize, capacity_exp: u32) -> usize {
    pos.wrapping_add(1) & capacity_mask(capacity_exp)
}

/// Number of slots for a capacity exponent, or `None` if it does not fit in
/// `usize`.
#[inline]
pub const fn slot_count(capacity_exp: u32) -> Option<usize> {
    if capacity_exp >= usize::BITS {
        None
    } else {
        Some(1usize << capacity_exp)
    }
}

/// Maximum ratio of live items to slots before a table grows.
///
/// Stored in per-mille and always strictly below one, so a table at its
/// threshold still has at least one empty slot. Lookups and backward-shift
/// deletion rely on that empty slot to terminate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadFactor {
    permille: u16,
}

impl LoadFactor {
    /// Builds a load factor from a percentage in `1..=99`.
    ///
    /// ```rust
    /// use robin_hood_map::probe::LoadFactor;
    ///
    /// assert!(LoadFactor::from_percent(90).is_some());
    /// assert!(LoadFactor::from_percent(100).is_none());
    /// assert!(LoadFactor::from_percent(0).is_none());
    /// ```
    pub const fn from_percent(percent: u8) -> Option<Self> {
        Self::from_permille(percent as u16 * 10)
    }

    /// Builds a load factor from a per-mille value in `1..=999`.
    pub const fn from_permille(permille: u16) -> Option<Self> {
        if permille == 0 || permille >= 1000 {
            None
        } else {
            Some(LoadFactor { permille })
        }
    }

    /// The threshold in per-mille.
    pub const fn permille(self) -> u16 {
        self.permille
    }

    /// Number of live items a table of `capacity` slots may hold.
    #[inline(always)]
    pub fn max_items(self, capacity: usize) -> usize {
        ((capacity as u128 * self.permille as u128) / 1000) as usize
    }

    /// Smallest capacity exponent, no smaller than [`MIN_CAPACITY_EXP`],
    /// whose threshold admits `items` live items.
    ///
    /// Returns `None` if no representable capacity is large enough.
    pub fn capacity_exponent_for(self, items: usize) -> Option<u32> {
        let mut exp = MIN_CAPACITY_EXP;
        loop {
            let slots = slot_count(exp)?;
            if self.max_items(slots) >= items {
                return Some(exp);
            }
            exp += 1;
        }
    }
}

impl Default for LoadFactor {
    fn default() -> Self {
        LoadFactor {
            permille: DEFAULT_LOAD_PERMILLE,
        }
    }
}

impl fmt::Debug for LoadFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoadFactor({}.{}%)", self.permille / 10, self.permille % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_slot_masks_low_bits() {
        assert_eq!(home_slot(0, 2), 0);
        assert_eq!(home_slot(3, 2), 3);
        assert_eq!(home_slot(4, 2), 0);
        assert_eq!(home_slot(0xFFFF_FFFF_FFFF_FFF6, 4), 6);
        assert_eq!(home_slot(u64::MAX, 0), 0);
    }

    #[test]
    fn distance_wraps_around_table_end() {
        assert_eq!(probe_distance(2, 2, 2), 0);
        assert_eq!(probe_distance(2, 3, 2), 1);
        assert_eq!(probe_distance(3, 0, 2), 1);
        assert_eq!(probe_distance(3, 2, 2), 3);
        assert_eq!(probe_distance(0, 3, 2), 3);
    }

    #[test]
    fn next_slot_wraps() {
        assert_eq!(next_slot(0, 2), 1);
        assert_eq!(next_slot(3, 2), 0);
        assert_eq!(next_slot(0, 0), 0);
    }

    #[test]
    fn slot_count_rejects_oversized_exponents() {
        assert_eq!(slot_count(0), Some(1));
        assert_eq!(slot_count(10), Some(1024));
        assert_eq!(slot_count(usize::BITS), None);
    }

    #[test]
    fn load_factor_bounds() {
        assert!(LoadFactor::from_permille(999).is_some());
        assert!(LoadFactor::from_permille(1000).is_none());
        assert_eq!(LoadFactor::from_percent(50).unwrap().permille(), 500);
    }

    #[test]
    fn max_items_always_leaves_an_empty_slot() {
        let lf = LoadFactor::from_permille(999).unwrap();
        for exp in 0..16 {
            let slots = 1usize << exp;
            assert!(lf.max_items(slots) < slots);
        }
    }

    #[test]
    fn capacity_exponent_for_items() {
        let lf = LoadFactor::from_percent(90).unwrap();
        assert_eq!(lf.capacity_exponent_for(0), Some(MIN_CAPACITY_EXP));
        assert_eq!(lf.capacity_exponent_for(7), Some(3));
        assert_eq!(lf.capacity_exponent_for(8), Some(4));
        assert_eq!(lf.capacity_exponent_for(1000), Some(11));
        assert_eq!(lf.capacity_exponent_for(usize::MAX), None);
    }
}
