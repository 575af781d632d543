use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::mem;

use crate::DefaultHashBuilder;
use crate::error::InsertError;
use crate::error::ResizeError;
use crate::hash_table::Bucket;
use crate::hash_table::HashTable;
use crate::probe::LoadFactor;

/// A hash map backed by a Robin Hood [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. The full 64-bit
/// hash of every key is stored next to it, so growing the map never rehashes
/// keys and lookups only compare keys whose hashes match.
///
/// # Performance Characteristics
///
/// - **Memory**: one `u64` hash and an `Option` tag per slot on top of
///   `(K, V)`; slots are allocated in powers of two and at most
///   [`LoadFactor`] of them are occupied.
/// - **Lookups**: stop early once the probe passes a bucket that sits closer
///   to its home slot than the key would, so misses stay short even at high
///   load.
///
/// # Examples
///
/// ```rust
/// use robin_hood_map::HashMap;
///
/// let mut stock: HashMap<String, u32> = HashMap::new();
/// stock.insert("apples".to_string(), 3);
/// stock.insert("pears".to_string(), 5);
///
/// assert_eq!(stock.get("apples"), Some(&3));
/// assert_eq!(stock.remove("pears"), Some(5));
/// assert_eq!(stock.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<K, V>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map using `hash_builder` to hash keys.
    ///
    /// Nothing is allocated until the first insertion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    /// use robin_hood_map::fnv::Fnv1aBuildHasher;
    ///
    /// let mut map = HashMap::with_hasher(Fnv1aBuildHasher);
    /// assert!(map.is_empty());
    /// map.insert(1, "one");
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        HashMap {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map able to hold at least `capacity` entries without
    /// growing.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        HashMap {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Creates an empty map with exactly `2^capacity_exp` slots.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    /// use robin_hood_map::fnv::Fnv1aBuildHasher;
    ///
    /// let map: HashMap<u32, u32, _> =
    ///     HashMap::with_capacity_exponent_and_hasher(6, Fnv1aBuildHasher);
    /// assert_eq!(map.capacity_exponent(), Some(6));
    /// ```
    pub fn with_capacity_exponent_and_hasher(capacity_exp: u32, hash_builder: S) -> Self {
        HashMap {
            table: HashTable::with_capacity_exponent(capacity_exp),
            hash_builder,
        }
    }

    /// Creates an empty map with exactly `2^capacity_exp` slots that grows
    /// once its entries would exceed `load_factor`.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    /// use robin_hood_map::fnv::Fnv1aBuildHasher;
    /// use robin_hood_map::probe::LoadFactor;
    ///
    /// let half = LoadFactor::from_percent(50).unwrap();
    /// let map: HashMap<u32, u32, _> =
    ///     HashMap::with_load_factor_and_hasher(4, half, Fnv1aBuildHasher);
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn with_load_factor_and_hasher(
        capacity_exp: u32,
        load_factor: LoadFactor,
        hash_builder: S,
    ) -> Self {
        HashMap {
            table: HashTable::with_load_factor(capacity_exp, load_factor),
            hash_builder,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the map can hold before it grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let map: HashMap<i32, i32> = HashMap::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the capacity exponent of the backing table, or `None` if
    /// nothing has been allocated yet.
    pub fn capacity_exponent(&self) -> Option<u32> {
        self.table.capacity_exponent()
    }

    /// Returns the load factor that triggers growth.
    pub fn load_factor(&self) -> LoadFactor {
        self.table.load_factor()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the backing table.
    pub fn table(&self) -> &HashTable<K, V> {
        &self.table
    }

    /// Removes all entries, keeping the allocated slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(map.capacity() > 0);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the backing table to `2^capacity_exp` slots.
    ///
    /// Entries keep their stored hashes, so no key is hashed again. A target
    /// no larger than the current capacity does nothing. On error the map is
    /// unchanged.
    pub fn resize(&mut self, capacity_exp: u32) -> Result<(), ResizeError> {
        self.table.resize(capacity_exp)
    }

    /// Reserves room for at least `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the new slot array cannot be allocated.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Fallible version of [`reserve`](Self::reserve); the map is unchanged on
    /// error.
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<u64, u64> = HashMap::new();
    /// assert!(map.try_reserve(10).is_ok());
    /// assert!(map.try_reserve(usize::MAX).is_err());
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), ResizeError> {
        self.table.try_reserve(additional)
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(&"a", &1), (&"b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// An iterator visiting all keys in arbitrary order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in arbitrary order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    ///
    /// The allocation is kept. Pairs the iterator does not yield are dropped
    /// with it.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts a key-value pair, returning the previous value for an equal
    /// key.
    ///
    /// When the key is already present, only the value is replaced; the stored
    /// key is kept and the map does not grow.
    ///
    /// # Panics
    ///
    /// Panics if the map needs to grow and the allocation fails. Use
    /// [`try_insert`](Self::try_insert) to handle that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts a key-value pair, handing both back if the map could not grow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// match map.try_insert("answer", 42) {
    ///     Ok(previous) => assert_eq!(previous, None),
    ///     Err(err) => {
    ///         let (key, value) = err.into_parts();
    ///         panic!("could not store {key} = {value}");
    ///     }
    /// }
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, InsertError<K, V>> {
        let hash = self.hash_builder.hash_one(&key);
        if let Some((_, resident)) = self.table.find_mut(hash, |resident| *resident == key) {
            return Ok(Some(mem::replace(resident, value)));
        }
        let replaced = self
            .table
            .set(hash, key, value, |resident, incoming| resident == incoming)?;
        Ok(replaced.map(|bucket| bucket.value))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |k| k.borrow() == key)
            .map(|bucket| (&bucket.key, &bucket.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// map.insert(1, 10);
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x += 5;
    /// }
    /// assert_eq!(map.get(&1), Some(&15));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |k| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .remove(hash, |k| k.borrow() == key)
            .map(Bucket::into_parts)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    S: Default,
{
    /// Creates an empty map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hood_map::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map able to hold at least `capacity` entries without
    /// growing, using the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty map with exactly `2^capacity_exp` slots, using the
    /// default hasher builder.
    pub fn with_capacity_exponent(capacity_exp: u32) -> Self {
        Self::with_capacity_exponent_and_hasher(capacity_exp, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        // Duplicate keys are likely when extending a non-empty map, so only
        // reserve for half of them.
        let (lower, _) = iter.size_hint();
        let additional = if self.is_empty() {
            lower
        } else {
            lower.div_ceil(2)
        };
        self.reserve(additional);
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, K, V>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|bucket| (&bucket.key, &bucket.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, K, V>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Bucket::into_parts)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Bucket::into_parts)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
