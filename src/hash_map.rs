use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::error::InsertOutcome;
use crate::error::RemoveOutcome;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::infallible;

/// A hash map using the linear-probing `HashTable` as the underlying storage.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Only the key takes
/// part in hashing and equality.
///
/// Inserting an existing key or removing a missing one is an error under the
/// strict [`insert`](Self::insert) and [`remove`](Self::remove), and a reported
/// outcome under [`insert_if_absent`](Self::insert_if_absent) and
/// [`remove_if_present`](Self::remove_if_present).
///
/// # Performance Characteristics
///
/// - **Memory**: 1 byte per slot overhead, plus the size of `(K, V)`.
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Clone for HashMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        infallible(self.try_clone())
    }

    fn clone_from(&mut self, source: &Self) {
        infallible(self.try_clone_from(source))
    }
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.table.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder. Does not
    /// allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a new hash map with the specified capacity and hasher builder.
    ///
    /// # Errors
    ///
    /// Fails if the backing block cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_capacity_and_hasher(100, SimpleHasher)?;
    /// assert!(map.capacity() >= 100);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity(capacity)?,
            hash_builder,
        })
    }

    /// Builds a map from a list of key-value pairs.
    ///
    /// When the list repeats a key, the first pair is kept and later ones are
    /// dropped.
    pub fn from_list<I>(pairs: I, hash_builder: S) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity_and_hasher(pairs.size_hint().0, hash_builder)?;
        map.try_extend(pairs)?;
        Ok(map)
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the map can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots in the backing table.
    pub fn slot_count(&self) -> usize {
        self.table.slot_count()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all key-value pairs, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes all key-value pairs and releases the backing block.
    pub fn clear_and_shrink(&mut self) {
        self.table.clear_and_shrink();
    }

    /// Shrinks the backing table to the smallest size that holds the current
    /// pairs.
    ///
    /// # Errors
    ///
    /// Fails if the smaller block cannot be allocated. The map is unchanged in
    /// that case.
    pub fn shrink_to_fit(&mut self) -> Result<(), Error> {
        let hash_builder = &self.hash_builder;
        self.table.shrink_to_fit(|(k, _)| hash_builder.hash_one(k))
    }

    /// Reserves room for at least `additional` more pairs.
    ///
    /// # Errors
    ///
    /// Fails if the larger block cannot be allocated. The map is unchanged in
    /// that case.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let hash_builder = &self.hash_builder;
        self.table
            .reserve(additional, |(k, _)| hash_builder.hash_one(k))
    }

    /// Inserts a key-value pair, failing if the key is already present.
    ///
    /// Returns a mutable reference to the inserted value.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyAlreadyExists`] if the key is present. The map is
    ///   unchanged and the pair is dropped.
    /// - [`Error::OutOfMemory`] if growth fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::Error;
    /// use probe_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert(37, "a").map(|v| *v), Ok("a"));
    /// assert_eq!(map.insert(37, "b").map(|v| *v), Err(Error::KeyAlreadyExists));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut V, Error> {
        match self.entry(key)? {
            Entry::Occupied(_) => Err(Error::KeyAlreadyExists),
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        }
    }

    /// Inserts a key-value pair unless the key is present, reporting which
    /// happened. An existing value is left untouched.
    ///
    /// # Errors
    ///
    /// Only allocation failures are reported as errors.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> Result<InsertOutcome, Error> {
        match self.entry(key)? {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyPresent),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    /// Inserts a key-value pair, replacing and returning the value of an
    /// existing pair with the same key.
    ///
    /// # Errors
    ///
    /// Only allocation failures are reported as errors. Replacing never
    /// allocates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert_or_assign(37, "a")?, None);
    /// assert_eq!(map.insert_or_assign(37, "b")?, Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        match self.entry(key)? {
            Entry::Occupied(mut entry) => Ok(Some(entry.insert(value))),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map: HashMap<String, i32> = HashMap::new();
    /// map.insert("one".to_string(), 1)?;
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| k.borrow() == key)
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_slot(key).is_some()
    }

    /// Returns the slot holding `key`.
    ///
    /// The index is valid until the map is next mutated and can be resolved
    /// with [`slot`](Self::slot).
    pub fn find_slot<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_slot(hash, |(k, _)| k.borrow() == key)
    }

    /// Returns the pair stored at `index`, if that slot is occupied.
    pub fn slot(&self, index: usize) -> Option<(&K, &V)> {
        self.table.slot(index).map(|(k, v)| (k, v))
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyDoesNotExist`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::Error;
    /// use probe_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.insert(1, "a")?;
    /// assert_eq!(map.remove(&1), Ok("a"));
    /// assert_eq!(map.remove(&1), Err(Error::KeyDoesNotExist));
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .remove(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Removes `key` if present, reporting whether anything was removed.
    pub fn remove_if_present<Q>(&mut self, key: &Q) -> RemoveOutcome
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove_if_present(hash, |(k, _)| k.borrow() == key)
    }

    /// Removes `key` and returns the stored key and value, if present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key).ok()
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Errors
    ///
    /// Fails only if the key is absent and growing the table to make room
    /// fails. An occupied entry never grows the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut counts: HashMap<&str, u32> = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word)?.or_default() += 1;
    /// }
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.get("b"), Some(&1));
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V>, Error> {
        let hash_builder = &self.hash_builder;
        let hash = hash_builder.hash_one(&key);
        let entry = self.table.entry(
            hash,
            |(k, _)| *k == key,
            |(k, _)| hash_builder.hash_one(k),
        )?;

        Ok(match entry {
            TableEntry::Occupied(inner) => Entry::Occupied(OccupiedEntry { inner }),
            TableEntry::Vacant(inner) => Entry::Vacant(VacantEntry { key, inner }),
        })
    }

    /// Retains only the pairs for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|(k, v)| f(&*k, v));
    }

    /// Returns an iterator over the key-value pairs, in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the pairs with mutable references to the
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes and yields every pair, keeping the allocated slots.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Inserts every pair from `pairs`, skipping keys already present.
    ///
    /// # Errors
    ///
    /// Stops at the first allocation failure. Pairs inserted before the
    /// failure stay in the map.
    pub fn try_extend<I>(&mut self, pairs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            let _ = self.insert_if_absent(key, value)?;
        }
        Ok(())
    }

    /// Clones the map, reporting allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        Ok(Self {
            table: self.table.try_clone()?,
            hash_builder: self.hash_builder.clone(),
        })
    }

    /// Replaces the contents of `self` with clones of the pairs and hasher of
    /// `source`, keeping the current allocation when it is large enough.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if a larger block is needed and cannot
    /// be allocated. `self` is left empty in that case.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), Error>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        self.table.clear();
        self.hash_builder.clone_from(&source.hash_builder);
        let hash_builder = &self.hash_builder;
        self.table.try_clone_from(&source.table, |(k, _)| hash_builder.hash_one(k))
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder. Does not
    /// allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash map with the specified capacity using the default
    /// hasher builder.
    ///
    /// # Errors
    ///
    /// Fails if the backing block cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S, const N: usize> TryFrom<[(K, V); N]> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    type Error = Error;

    fn try_from(pairs: [(K, V); N]) -> Result<Self, Self::Error> {
        Self::from_list(pairs, S::default())
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        infallible(Self::from_list(iter, S::default()))
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        infallible(self.try_extend(iter));
    }
}

/// A view into a single entry in a map, which may be vacant or occupied.
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in a `HashMap`.
///
/// Room for the pair has already been made, so inserting cannot fail.
pub struct VacantEntry<'a, K, V> {
    key: K,
    inner: crate::hash_table::VacantEntry<'a, (K, V)>,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Returns a reference to the key that would be used for insertion.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the entry and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.inner.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in a `HashMap`.
pub struct OccupiedEntry<'a, K, V> {
    inner: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.inner.get().0
    }

    /// Returns a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.inner.get().1
    }

    /// Returns a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.inner.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.inner.into_mut().1
    }

    /// Replaces the value in the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry and returns its value.
    pub fn remove(self) -> V {
        self.inner.remove().1
    }

    /// Removes the entry and returns the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.inner.remove()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the key-value pairs of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

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

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

/// A consuming iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type Map<K, V> = HashMap<K, V, SipHashBuilder>;

    #[test]
    fn test_new_and_capacity() {
        let map: Map<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.slot_count(), 0);

        let map: Map<i32, String> = HashMap::with_capacity(50).unwrap();
        assert!(map.capacity() >= 50);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map: Map<i32, String> = HashMap::new();
        *map.insert(1, "one".to_string()).unwrap() += "!";
        map.insert(2, "two".to_string()).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1).map(String::as_str), Some("one!"));
        assert_eq!(map.get(&2).map(String::as_str), Some("two"));
        assert_eq!(map.get(&3), None);
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&3));
    }

    #[test]
    fn test_strict_insert_rejects_duplicate() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.insert(1, 10).unwrap();

        assert_eq!(map.insert(1, 20).map(|v| *v), Err(Error::KeyAlreadyExists));
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.insert_if_absent(1, 30), Ok(InsertOutcome::AlreadyPresent));
        assert_eq!(map.get(&1), Some(&10));
        assert_eq!(map.insert_if_absent(2, 30), Ok(InsertOutcome::Inserted));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_insert_or_assign() {
        let mut map: Map<&str, i32> = HashMap::new();
        assert_eq!(map.insert_or_assign("a", 1), Ok(None));
        assert_eq!(map.insert_or_assign("a", 2), Ok(Some(1)));
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_get_mut_and_key_value() {
        let mut map: Map<String, i32> = HashMap::new();
        map.insert("k".to_string(), 1).unwrap();

        *map.get_mut("k").unwrap() += 41;
        assert_eq!(
            map.get_key_value("k").map(|(k, v)| (k.as_str(), *v)),
            Some(("k", 42))
        );
        assert!(map.get_mut("missing").is_none());
    }

    #[test]
    fn test_remove_variants() {
        let mut map: Map<i32, &str> = HashMap::new();
        map.insert(1, "a").unwrap();
        map.insert(2, "b").unwrap();
        map.insert(3, "c").unwrap();

        assert_eq!(map.remove(&1), Ok("a"));
        assert_eq!(map.remove(&1), Err(Error::KeyDoesNotExist));
        assert_eq!(map.remove_entry(&2), Some((2, "b")));
        assert_eq!(map.remove_entry(&2), None);
        assert_eq!(map.remove_if_present(&3), RemoveOutcome::Removed);
        assert_eq!(map.remove_if_present(&3), RemoveOutcome::Absent);
        assert!(map.is_empty());
    }

    #[test]
    fn test_entry_api() {
        let mut map: Map<&str, i32> = HashMap::new();

        *map.entry("a").unwrap().or_insert(0) += 1;
        *map.entry("a").unwrap().or_insert(0) += 1;
        *map.entry("b").unwrap().or_insert_with(|| 10) += 1;
        map.entry("b").unwrap().and_modify(|v| *v *= 2).or_default();
        *map.entry("c").unwrap().or_default() += 3;

        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.get("b"), Some(&22));
        assert_eq!(map.get("c"), Some(&3));

        match map.entry("a").unwrap() {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &"a");
                assert_eq!(entry.insert(5), 2);
                assert_eq!(entry.remove_entry(), ("a", 5));
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }

        match map.entry("z").unwrap() {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &"z");
                assert_eq!(entry.into_key(), "z");
            }
            Entry::Occupied(_) => panic!("expected vacant"),
        }
        assert!(!map.contains_key("z"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_occupied_entry_does_not_grow() {
        let mut map: Map<u32, u32> = HashMap::with_capacity(3).unwrap();
        for k in 0..3 {
            map.insert(k, k).unwrap();
        }
        let slot_count = map.slot_count();
        assert_eq!(map.len(), map.capacity());

        let _ = map.entry(1).unwrap().or_insert(99);
        assert_eq!(map.slot_count(), slot_count);
        assert_eq!(map.insert(2, 0).map(|_| ()), Err(Error::KeyAlreadyExists));
        assert_eq!(map.slot_count(), slot_count);
    }

    #[test]
    fn test_iterators() {
        let mut map: Map<i32, i32> = (0..10).map(|i| (i, i * 10)).collect();
        assert_eq!(map.iter().len(), 10);

        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        for v in map.values_mut() {
            *v += 1;
        }
        for (_, v) in map.iter_mut() {
            *v += 1;
        }
        let mut values: Vec<i32> = map.values().copied().collect();
        values.sort();
        assert_eq!(values, (0..10).map(|i| i * 10 + 2).collect::<Vec<_>>());

        let mut pairs: Vec<(i32, i32)> = map.into_iter().collect();
        pairs.sort();
        assert_eq!(pairs[3], (3, 32));
    }

    #[test]
    fn test_drain_and_retain() {
        let mut map: Map<i32, i32> = (0..10).map(|i| (i, i)).collect();
        map.retain(|k, v| {
            *v += 100;
            k % 2 == 0
        });
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(&4), Some(&104));
        assert_eq!(map.get(&5), None);

        let slot_count = map.slot_count();
        let mut drained: Vec<(i32, i32)> = map.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![(0, 100), (2, 102), (4, 104), (6, 106), (8, 108)]);
        assert!(map.is_empty());
        assert_eq!(map.slot_count(), slot_count);
    }

    #[test]
    fn test_from_list_and_try_from() {
        let map = Map::from_list([(1, "first"), (2, "b"), (1, "second")], SipHashBuilder::default())
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"first"));

        let map: Map<i32, i32> = HashMap::try_from([(1, 1), (2, 2)]).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_slot_locator() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.insert(7, 70).unwrap();
        let index = map.find_slot(&7).unwrap();
        assert_eq!(map.slot(index), Some((&7, &70)));
        map.remove(&7).unwrap();
        assert_eq!(map.slot(index), None);
    }

    #[test]
    fn test_clone_and_eq() {
        let map: Map<i32, String> = (0..20).map(|i| (i, i.to_string())).collect();
        let cloned = map.clone();
        assert_eq!(map, cloned);

        let mut changed = map.try_clone().unwrap();
        changed.insert_or_assign(3, "x".to_string()).unwrap();
        assert_ne!(map, changed);
    }

    #[test]
    fn test_clone_from_reuses_allocation() {
        let source: Map<i32, String> = (0..20).map(|i| (i, i.to_string())).collect();

        let mut target: Map<i32, String> =
            HashMap::with_capacity_and_hasher(100, SipHashBuilder::default()).unwrap();
        target.insert(500, "stale".to_string()).unwrap();
        let slots = target.slot_count();

        target.clone_from(&source);
        assert_eq!(target.slot_count(), slots);
        assert_eq!(target, source);
        assert_eq!(target.get(&500), None);
        assert_eq!(target.get(&7).map(String::as_str), Some("7"));

        let mut small: Map<i32, String> = HashMap::new();
        small.try_clone_from(&source).unwrap();
        assert_eq!(small.slot_count(), 27);
        assert_eq!(small, source);
    }

    #[test]
    fn test_adapters_report_exact_len() {
        let mut map: Map<i32, i32> = (0..12).map(|i| (i, i)).collect();
        assert_eq!(map.keys().len(), 12);
        assert_eq!(map.values().len(), 12);
        assert_eq!(map.iter_mut().len(), 12);

        let mut values = map.values_mut();
        values.next();
        assert_eq!(values.len(), 11);

        let mut drain = map.drain();
        drain.next();
        assert_eq!(drain.len(), 11);
        drop(drain);
        assert!(map.is_empty());

        let map: Map<i32, i32> = (0..5).map(|i| (i, i)).collect();
        let mut iter = map.into_iter();
        assert_eq!(iter.len(), 5);
        iter.by_ref().for_each(drop);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_shrink_and_clear() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.reserve(500).unwrap();
        assert!(map.capacity() >= 500);
        for i in 0..5 {
            map.insert(i, i).unwrap();
        }
        map.shrink_to_fit().unwrap();
        assert!(map.capacity() < 500);
        for i in 0..5 {
            assert_eq!(map.get(&i), Some(&i));
        }

        map.clear();
        assert!(map.is_empty());
        assert!(map.slot_count() > 0);
        map.clear_and_shrink();
        assert_eq!(map.slot_count(), 0);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_many_insertions_and_removals() {
        let mut map: Map<u64, u64> = HashMap::new();
        for i in 0..10_000u64 {
            map.insert(i, i * 2).unwrap();
        }
        for i in (0..10_000u64).step_by(2) {
            assert_eq!(map.remove(&i), Ok(i * 2));
        }
        assert_eq!(map.len(), 5_000);
        for i in 0..10_000u64 {
            assert_eq!(map.get(&i).copied(), (i % 2 == 1).then_some(i * 2));
        }
    }

    #[test]
    fn test_debug() {
        let map = Map::from_list([(1, "a")], SipHashBuilder::default()).unwrap();
        assert_eq!(alloc::format!("{map:?}"), r#"{1: "a"}"#);
    }
}
