//! A Robin Hood hash table driven by caller-supplied hashes.
//!
//! [`HashTable<K, V>`] stores `(hash, key, value)` buckets in a single
//! power-of-two sized slot array. Every operation takes the hash of the key it
//! is interested in plus an equality predicate, so the table itself never
//! hashes anything; [`HashMap`](crate::HashMap) layers a
//! [`BuildHasher`](core::hash::BuildHasher) on top.
//!
//! Buckets are kept ordered by probe distance: walking forward from any home
//! slot, a bucket is never stored past a slot whose occupant sits closer to its
//! own home than the bucket would. Insertion enforces this by letting the
//! bucket that is further from home keep a contested slot, deletion restores it
//! by shifting the trailing run of displaced buckets back by one, and lookup
//! uses it to stop as soon as the key it wants could no longer appear.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;

use crate::error::InsertError;
use crate::error::ResizeError;
use crate::probe::LoadFactor;
use crate::probe::home_slot;
use crate::probe::next_slot;
use crate::probe::probe_distance;
use crate::probe::slot_count;

/// One stored entry: the full hash of the key, the key, and its value.
///
/// Buckets are handed back by [`HashTable::set`] when an existing entry is
/// replaced and by [`HashTable::remove`]; receiving one transfers ownership of
/// its key and value to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<K, V> {
    /// The hash the bucket was inserted with.
    pub hash: u64,
    /// The stored key.
    pub key: K,
    /// The stored value.
    pub value: V,
}

impl<K, V> Bucket<K, V> {
    /// Splits the bucket into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Statistics describing the layout of a table.
///
/// Only available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live items.
    pub populated: usize,
    /// Number of items the table holds before it grows.
    pub capacity: usize,
    /// Number of allocated slots.
    pub total_slots: usize,
    /// Ratio of live items to slots.
    pub load_factor: f64,
    /// Largest probe distance of any stored bucket.
    pub max_probe_distance: usize,
    /// Mean probe distance over all stored buckets.
    pub mean_probe_distance: f64,
    /// Bytes allocated for the slot array.
    pub total_bytes: usize,
    /// Bytes allocated for slots that are currently empty.
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% of slots)",
            self.populated,
            self.total_slots,
            self.load_factor * 100.0
        );
        println!("Capacity before growth: {}", self.capacity);
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe_distance, self.mean_probe_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Number of buckets stored at each probe distance.
///
/// `counts[d]` is the number of buckets that sit `d` slots past their home.
/// Only available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Bucket counts indexed by probe distance.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Total number of buckets counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    7 => '▉',
                    _ => unreachable!(),
                };
                bar.push(ch);
            }
            bar
        };

        for (distance, &count) in self.counts.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// A hash table using Robin Hood hashing with backward-shift deletion.
///
/// `HashTable<K, V>` stores key/value pairs, but never hashes or compares keys
/// on its own: each operation is given the key's hash and an equality
/// predicate. Equal keys must produce equal hashes. Any `u64`, including zero,
/// is a valid hash.
///
/// The table grows by doubling before an insertion would push the number of
/// live items past its [`LoadFactor`]. Growth is fallible: when the allocator
/// refuses, [`set`](HashTable::set) returns the key and value inside an
/// [`InsertError`] and the table is left untouched. The table never shrinks on
/// removal.
///
/// ## Example
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use robin_hood_map::fnv::Fnv1aBuildHasher;
/// use robin_hood_map::hash_table::HashTable;
///
/// let hasher = Fnv1aBuildHasher;
/// let mut table: HashTable<String, u32> = HashTable::with_capacity_exponent(4);
///
/// let hash = hasher.hash_one("apples");
/// let evicted = table
///     .set(hash, "apples".to_string(), 3, |a, b| a == b)
///     .unwrap();
/// assert!(evicted.is_none());
///
/// let bucket = table.find(hash, |k| k == "apples").unwrap();
/// assert_eq!(bucket.value, 3);
/// ```
#[derive(Clone)]
pub struct HashTable<K, V> {
    slots: Vec<Option<Bucket<K, V>>>,
    capacity_exp: u32,
    populated: usize,
    max_pop: usize,
    load_factor: LoadFactor,
}

impl<K, V> Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        if self.slots.is_empty() {
            return f
                .debug_struct("HashTable")
                .field("slots", &"unallocated")
                .field("populated", &self.populated)
                .field("capacity", &self.max_pop)
                .finish();
        }

        let exp = self.capacity_exp;
        let cells = self
            .slots
            .iter()
            .enumerate()
            .map(|(pos, slot)| match slot {
                Some(bucket) => {
                    let home = home_slot(bucket.hash, exp);
                    format!("{home:04x}+{:02}", probe_distance(home, pos, exp))
                }
                None => ".......".to_string(),
            })
            .collect::<Vec<String>>();

        f.debug_struct("HashTable")
            .field(
                "slots",
                &cells
                    .chunks(8)
                    .map(|row| row.join(", "))
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.max_pop)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty table without allocating.
    ///
    /// The slot array is allocated on the first insertion.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64, u64> = HashTable::new();
    /// assert_eq!(table.num_slots(), 0);
    /// assert_eq!(table.capacity_exponent(), None);
    /// ```
    pub fn new() -> Self {
        Self::unallocated(LoadFactor::default())
    }

    fn unallocated(load_factor: LoadFactor) -> Self {
        HashTable {
            slots: Vec::new(),
            capacity_exp: 0,
            populated: 0,
            max_pop: 0,
            load_factor,
        }
    }

    /// Creates a table with exactly `2^capacity_exp` slots.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated. Use
    /// [`try_with_load_factor`](Self::try_with_load_factor) to handle that case.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64, u64> = HashTable::with_capacity_exponent(4);
    /// assert_eq!(table.num_slots(), 16);
    /// assert_eq!(table.capacity_exponent(), Some(4));
    /// ```
    pub fn with_capacity_exponent(capacity_exp: u32) -> Self {
        Self::with_load_factor(capacity_exp, LoadFactor::default())
    }

    /// Creates a table with exactly `2^capacity_exp` slots that grows once
    /// the live items would exceed `load_factor`.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated.
    pub fn with_load_factor(capacity_exp: u32, load_factor: LoadFactor) -> Self {
        Self::try_with_load_factor(capacity_exp, load_factor).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fallible version of [`with_load_factor`](Self::with_load_factor).
    pub fn try_with_load_factor(
        capacity_exp: u32,
        load_factor: LoadFactor,
    ) -> Result<Self, ResizeError> {
        let mut table = Self::unallocated(load_factor);
        table.resize(capacity_exp)?;
        Ok(table)
    }

    /// Creates a table that can hold at least `capacity` items before growing.
    ///
    /// A `capacity` of zero does not allocate.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64, String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Self::new();
        table.reserve(capacity);
        table
    }

    /// Returns the number of items in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no items.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of items the table can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.max_pop
    }

    /// Returns the number of allocated slots, always zero or a power of two.
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Returns the capacity exponent, or `None` if nothing is allocated yet.
    pub fn capacity_exponent(&self) -> Option<u32> {
        if self.slots.is_empty() {
            None
        } else {
            Some(self.capacity_exp)
        }
    }

    /// Returns the load factor that triggers growth.
    pub fn load_factor(&self) -> LoadFactor {
        self.load_factor
    }

    /// Returns the bucket stored in the physical slot `index`, if any.
    ///
    /// Slot positions change whenever other buckets are inserted or removed;
    /// this is meant for inspecting the table layout.
    pub fn bucket_at(&self, index: usize) -> Option<&Bucket<K, V>> {
        self.slots.get(index)?.as_ref()
    }

    /// Returns how far the bucket in slot `index` sits past its home slot, or
    /// `None` for an empty slot.
    pub fn probe_distance_at(&self, index: usize) -> Option<usize> {
        let bucket = self.bucket_at(index)?;
        let exp = self.capacity_exp;
        Some(probe_distance(home_slot(bucket.hash, exp), index, exp))
    }

    /// Returns the slot index of the entry with `hash` for which `eq` holds.
    ///
    /// The probe stops at the first empty slot, or at the first resident that
    /// is closer to its home than the sought entry would be at the same
    /// position. The index stays valid until the table is next modified; see
    /// [`bucket_at`](Self::bucket_at).
    #[inline]
    pub fn find_index(&self, hash: u64, eq: impl Fn(&K) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let exp = self.capacity_exp;
        let home = home_slot(hash, exp);
        let mut pos = home;
        for distance in 0..self.slots.len() {
            let resident = self.slots[pos].as_ref()?;
            if distance > probe_distance(home_slot(resident.hash, exp), pos, exp) {
                return None;
            }
            if resident.hash == hash && eq(&resident.key) {
                return Some(pos);
            }
            pos = next_slot(pos, exp);
        }

        None
    }

    /// Finds the bucket with `hash` whose key satisfies `eq`.
    ///
    /// The stored hash is compared before `eq` is called, so `eq` only runs
    /// for keys with an identical hash.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity_exponent(3);
    /// table.set(42, 42u64, "answer", |a, b| a == b).unwrap();
    ///
    /// let found = table.find(42, |&k| k == 42).map(|b| b.value);
    /// assert_eq!(found, Some("answer"));
    /// assert!(table.find(99, |&k| k == 99).is_none());
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&K) -> bool) -> Option<&Bucket<K, V>> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].as_ref()
    }

    /// Finds the entry with `hash` whose key satisfies `eq`, returning its key
    /// and a mutable reference to its value.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity_exponent(3);
    /// table.set(7, 7u64, 1, |a, b| a == b).unwrap();
    ///
    /// if let Some((_, value)) = table.find_mut(7, |&k| k == 7) {
    ///     *value += 9;
    /// }
    /// assert_eq!(table.find(7, |&k| k == 7).map(|b| b.value), Some(10));
    /// ```
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        let index = self.find_index(hash, eq)?;
        self.slots[index]
            .as_mut()
            .map(|bucket| (&bucket.key, &mut bucket.value))
    }

    /// Inserts `key` and `value` under `hash`, or replaces the entry whose key
    /// is equal according to `eq(resident, incoming)`.
    ///
    /// Returns `Ok(None)` when a new entry was added, and `Ok(Some(old))` with
    /// the previous bucket when an existing entry was replaced; replacing never
    /// changes [`len`](Self::len) and never grows the table.
    ///
    /// Adding a new entry grows the table first if it would push the live
    /// items past the load factor. If that growth fails, the table is left
    /// exactly as it was and the key and value are returned inside the error.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert!(table.set(1, "one", 1, |a, b| a == b).unwrap().is_none());
    /// assert_eq!(table.len(), 1);
    ///
    /// let old = table.set(1, "one", 11, |a, b| a == b).unwrap().unwrap();
    /// assert_eq!(old.value, 1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn set(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
    ) -> Result<Option<Bucket<K, V>>, InsertError<K, V>> {
        self.set_within(hash, key, value, eq, Self::max_capacity_exp())
    }

    /// [`set`](Self::set), growing to at most `2^max_capacity_exp` slots.
    fn set_within(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
        max_capacity_exp: u32,
    ) -> Result<Option<Bucket<K, V>>, InsertError<K, V>> {
        if self.populated >= self.max_pop {
            if let Some(index) = self.find_index(hash, |resident| eq(resident, &key)) {
                let slot = &mut self.slots[index];
                return Ok(slot.replace(Bucket { hash, key, value }));
            }
            if let Err(error) = self.grow(max_capacity_exp) {
                return Err(InsertError::new(key, value, error));
            }
        }

        let exp = self.capacity_exp;
        let mut pos = home_slot(hash, exp);
        let mut distance = 0;
        while let Some(resident) = &mut self.slots[pos] {
            if distance > probe_distance(home_slot(resident.hash, exp), pos, exp) {
                break;
            }
            if resident.hash == hash && eq(&resident.key, &key) {
                return Ok(Some(mem::replace(resident, Bucket { hash, key, value })));
            }
            pos = next_slot(pos, exp);
            distance += 1;
        }

        self.populated += 1;
        self.displace_from(pos, Bucket { hash, key, value });
        Ok(None)
    }

    /// Places `incoming` at `pos` and carries the Robin Hood displacement
    /// chain forward until an empty slot absorbs the last evicted bucket.
    ///
    /// `pos` must be empty or hold a bucket closer to its home than `incoming`
    /// is at `pos`, and no slot between `incoming`'s home and `pos` may be
    /// empty. Keys are never compared here.
    fn displace_from(&mut self, mut pos: usize, mut incoming: Bucket<K, V>) {
        let exp = self.capacity_exp;
        let mut distance = probe_distance(home_slot(incoming.hash, exp), pos, exp);
        loop {
            let slot = &mut self.slots[pos];
            match slot {
                None => {
                    *slot = Some(incoming);
                    return;
                }
                Some(resident) => {
                    let resident_distance =
                        probe_distance(home_slot(resident.hash, exp), pos, exp);
                    if distance > resident_distance {
                        mem::swap(resident, &mut incoming);
                        distance = resident_distance;
                    }
                }
            }
            pos = next_slot(pos, exp);
            distance += 1;
        }
    }

    /// Removes and returns the bucket with `hash` whose key satisfies `eq`.
    ///
    /// The buckets behind the removed one are shifted back by one slot until
    /// an empty slot or a bucket already in its home slot is reached, so no
    /// tombstones are left behind. Returns `None` without touching the table
    /// if no entry matches.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity_exponent(3);
    /// table.set(42, 42u64, 'x', |a, b| a == b).unwrap();
    ///
    /// let removed = table.remove(42, |&k| k == 42).unwrap();
    /// assert_eq!(removed.into_parts(), (42, 'x'));
    /// assert!(table.is_empty());
    /// assert!(table.remove(42, |&k| k == 42).is_none());
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&K) -> bool) -> Option<Bucket<K, V>> {
        let index = self.find_index(hash, eq)?;
        self.remove_at(index)
    }

    fn remove_at(&mut self, index: usize) -> Option<Bucket<K, V>> {
        let removed = self.slots[index].take()?;
        self.populated -= 1;

        let exp = self.capacity_exp;
        let mut gap = index;
        let mut next = next_slot(gap, exp);
        while self.probe_distance_at(next).is_some_and(|distance| distance > 0) {
            self.slots.swap(gap, next);
            gap = next;
            next = next_slot(next, exp);
        }

        Some(removed)
    }

    /// Grows the table to `2^capacity_exp` slots, rehashing every bucket.
    ///
    /// A target no larger than the current capacity is a successful no-op; the
    /// table never shrinks. The new slot array is fully built before it
    /// replaces the old one, so on failure the table is unchanged.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// # use robin_hood_map::ResizeError;
    /// #
    /// let mut table = HashTable::with_capacity_exponent(3);
    /// table.set(5, 5u64, 50u64, |a, b| a == b).unwrap();
    ///
    /// table.resize(6).unwrap();
    /// assert_eq!(table.num_slots(), 64);
    /// assert_eq!(table.find(5, |&k| k == 5).map(|b| b.value), Some(50));
    ///
    /// assert_eq!(table.resize(u32::MAX), Err(ResizeError::CapacityOverflow));
    /// assert_eq!(table.num_slots(), 64);
    /// ```
    pub fn resize(&mut self, capacity_exp: u32) -> Result<(), ResizeError> {
        if !self.slots.is_empty() && capacity_exp <= self.capacity_exp {
            return Ok(());
        }

        let slot_count = slot_count(capacity_exp).ok_or(ResizeError::CapacityOverflow)?;
        let mut slots = Vec::new();
        slots.try_reserve_exact(slot_count)?;
        slots.resize_with(slot_count, || None);

        let old_slots = mem::replace(&mut self.slots, slots);
        self.capacity_exp = capacity_exp;
        self.max_pop = self.load_factor.max_items(slot_count);

        // Buckets from the old table are already unique, so they go straight
        // into the displacement chain starting at their new home.
        for bucket in old_slots.into_iter().flatten() {
            let home = home_slot(bucket.hash, capacity_exp);
            self.displace_from(home, bucket);
        }

        Ok(())
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self, max_capacity_exp: u32) -> Result<(), ResizeError> {
        let mut capacity_exp = self
            .load_factor
            .capacity_exponent_for(self.populated + 1)
            .ok_or(ResizeError::CapacityOverflow)?;
        if !self.slots.is_empty() {
            capacity_exp = capacity_exp.max(self.capacity_exp + 1);
        }
        if capacity_exp > max_capacity_exp {
            return Err(ResizeError::CapacityOverflow);
        }
        self.resize(capacity_exp)
    }

    /// Largest exponent whose slot array stays within `isize::MAX` bytes.
    fn max_capacity_exp() -> u32 {
        let slot_bytes = mem::size_of::<Option<Bucket<K, V>>>().max(1);
        (isize::MAX as usize / slot_bytes).ilog2()
    }

    /// Makes room for at least `additional` more items without further
    /// growth.
    ///
    /// # Panics
    ///
    /// Panics if the new slot array cannot be allocated.
    ///
    /// ```rust
    /// # use robin_hood_map::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// table.reserve(50);
    /// assert!(table.capacity() >= 50);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            panic!("{err}");
        }
    }

    /// Fallible version of [`reserve`](Self::reserve); the table is unchanged
    /// on error.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), ResizeError> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or(ResizeError::CapacityOverflow)?;
        if required > self.max_pop {
            let capacity_exp = self
                .load_factor
                .capacity_exponent_for(required)
                .ok_or(ResizeError::CapacityOverflow)?;
            self.resize(capacity_exp)?;
        }
        Ok(())
    }

    /// Removes every item, keeping the allocated slots.
    pub fn clear(&mut self) {
        if self.populated > 0 {
            self.slots.iter_mut().for_each(|slot| *slot = None);
        }
        self.populated = 0;
    }

    /// Returns an iterator over the buckets in slot order.
    ///
    /// Slot order depends on the hashes and on the insertion history; it is
    /// not a stable ordering.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Removes every item, yielding the buckets in slot order.
    ///
    /// The table keeps its allocation. Items not consumed by the iterator are
    /// dropped when it is. While the iterator is alive the table is
    /// unallocated; if the iterator is leaked, it stays that way.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        let remaining = mem::take(&mut self.populated);
        let capacity_exp = mem::take(&mut self.capacity_exp);
        let slots = mem::take(&mut self.slots);
        self.max_pop = 0;
        Drain {
            table: self,
            slots,
            capacity_exp,
            pos: 0,
            remaining,
        }
    }

    /// Computes how many buckets sit at each probe distance.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();
        for index in 0..self.slots.len() {
            if let Some(distance) = self.probe_distance_at(index) {
                if counts.len() <= distance {
                    counts.resize(distance + 1, 0);
                }
                counts[distance] += 1;
            }
        }
        ProbeHistogram { counts }
    }

    /// Returns layout and memory statistics for the table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let total_slots = self.slots.len();
        let slot_bytes = mem::size_of::<Option<Bucket<K, V>>>();
        let distance_sum: usize = histogram
            .counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();

        DebugStats {
            populated: self.populated,
            capacity: self.max_pop,
            total_slots,
            load_factor: if total_slots == 0 {
                0.0
            } else {
                self.populated as f64 / total_slots as f64
            },
            max_probe_distance: histogram.counts.len().saturating_sub(1),
            mean_probe_distance: if self.populated == 0 {
                0.0
            } else {
                distance_sum as f64 / self.populated as f64
            },
            total_bytes: total_slots * slot_bytes,
            wasted_bytes: (total_slots - self.populated) * slot_bytes,
        }
    }

    #[cfg(test)]
    fn place(&mut self, index: usize, hash: u64, key: K, value: V) {
        assert!(self.slots[index].is_none(), "slot {index} already occupied");
        self.slots[index] = Some(Bucket { hash, key, value });
        self.populated += 1;
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = &'a Bucket<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for HashTable<K, V> {
    type IntoIter = IntoIter<K, V>;
    type Item = Bucket<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: self.slots.into_iter(),
        }
    }
}

/// An iterator over the buckets of a [`HashTable`], in slot order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Bucket<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(bucket) = slot {
                self.remaining -= 1;
                return Some(bucket);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A draining iterator over the buckets of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    slots: Vec<Option<Bucket<K, V>>>,
    capacity_exp: u32,
    pos: usize,
    remaining: usize,
}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}

        // Hand the emptied allocation back.
        let slots = mem::take(&mut self.slots);
        self.table.max_pop = self.table.load_factor.max_items(slots.len());
        self.table.capacity_exp = self.capacity_exp;
        self.table.slots = slots;
    }
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = Bucket<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while let Some(slot) = self.slots.get_mut(self.pos) {
            self.pos += 1;
            if let Some(bucket) = slot.take() {
                self.remaining -= 1;
                return Some(bucket);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

/// An owning iterator over the buckets of a [`HashTable`], in slot order.
pub struct IntoIter<K, V> {
    slots: alloc::vec::IntoIter<Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = Bucket<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bucket = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(bucket)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
