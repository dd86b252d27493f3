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

/// A hash set using the linear-probing `HashTable` as the underlying storage.
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values.
///
/// Every operation that may allocate returns a `Result`, so allocation failure
/// can be handled instead of aborting. The `FromIterator`, `Extend` and
/// `Clone` impls cannot report errors and abort through
/// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) instead.
///
/// # Performance Characteristics
///
/// - **Memory**: 1 byte per slot overhead, plus the size of `T`.
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> Clone for HashSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        infallible(self.try_clone())
    }

    fn clone_from(&mut self, source: &Self) {
        infallible(self.try_clone_from(source))
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder. Does not
    /// allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::hash::RandomState;
    ///
    /// use probe_hash::hash_set::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a new hash set with the specified capacity and hasher builder.
    ///
    /// # Errors
    ///
    /// Fails if the backing block cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::hash::RandomState;
    ///
    /// use probe_hash::hash_set::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_capacity_and_hasher(100, RandomState::new())?;
    /// assert!(set.capacity() >= 100);
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity(capacity)?,
            hash_builder,
        })
    }

    /// Builds a set from a list of values.
    ///
    /// The set is sized for the iterator's lower size bound up front. When the
    /// list holds equal values, the first one is kept and later ones are
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::DefaultHashBuilder;
    /// use probe_hash::HashSet;
    ///
    /// let set = HashSet::from_list([3, 1, 3, 2], DefaultHashBuilder::default())?;
    /// assert_eq!(set.len(), 3);
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn from_list<I>(values: I, hash_builder: S) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let mut set = Self::with_capacity_and_hasher(values.size_hint().0, hash_builder)?;
        set.try_extend(values)?;
        Ok(set)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1)?;
    /// assert_eq!(set.len(), 1);
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the set can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots in the backing table.
    pub fn slot_count(&self) -> usize {
        self.table.slot_count()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements, keeping the allocated slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(1)?;
    /// set.clear();
    /// assert!(set.is_empty());
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Removes all elements and releases the backing block.
    pub fn clear_and_shrink(&mut self) {
        self.table.clear_and_shrink();
    }

    /// Shrinks the backing table to the smallest size that holds the current
    /// elements.
    ///
    /// # Errors
    ///
    /// Fails if the smaller block cannot be allocated. The set is unchanged in
    /// that case.
    pub fn shrink_to_fit(&mut self) -> Result<(), Error> {
        let hash_builder = &self.hash_builder;
        self.table.shrink_to_fit(|v| hash_builder.hash_one(v))
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// Fails if the larger block cannot be allocated. The set is unchanged in
    /// that case.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let hash_builder = &self.hash_builder;
        self.table
            .reserve(additional, |v| hash_builder.hash_one(v))
    }

    /// Adds a value to the set, failing if an equal value is present.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyAlreadyExists`] if an equal value is present. The set is
    ///   unchanged and `value` is dropped.
    /// - [`Error::OutOfMemory`] if growth fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::Error;
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.insert(2), Ok(()));
    /// assert_eq!(set.insert(2), Err(Error::KeyAlreadyExists));
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        match self.insert_if_absent(value)? {
            InsertOutcome::Inserted => Ok(()),
            InsertOutcome::AlreadyPresent => Err(Error::KeyAlreadyExists),
        }
    }

    /// Adds a value to the set unless an equal value is present, reporting
    /// which happened.
    ///
    /// # Errors
    ///
    /// Only allocation failures are reported as errors.
    pub fn insert_if_absent(&mut self, value: T) -> Result<InsertOutcome, Error> {
        let hash_builder = &self.hash_builder;
        let hash = hash_builder.hash_one(&value);
        match self
            .table
            .entry(hash, |v| *v == value, |v| hash_builder.hash_one(v))?
        {
            TableEntry::Occupied(_) => Ok(InsertOutcome::AlreadyPresent),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    /// Returns `true` if the set contains the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::new();
    /// set.insert("a".to_string())?;
    /// assert!(set.contains("a"));
    /// assert!(!set.contains("b"));
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_slot(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v.borrow() == value)
    }

    /// Returns the slot holding the value equal to `value`.
    ///
    /// The index is valid until the set is next mutated and can be resolved
    /// with [`slot`](Self::slot).
    pub fn find_slot<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.find_slot(hash, |v| v.borrow() == value)
    }

    /// Returns the value stored at `index`, if that slot is occupied.
    pub fn slot(&self, index: usize) -> Option<&T> {
        self.table.slot(index)
    }

    /// Removes the value equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyDoesNotExist`] if no such value is present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::Error;
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(2)?;
    /// assert_eq!(set.remove(&2), Ok(()));
    /// assert_eq!(set.remove(&2), Err(Error::KeyDoesNotExist));
    /// # }
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> Result<(), Error>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v.borrow() == value).map(drop)
    }

    /// Removes the value equal to `value` if present, reporting whether
    /// anything was removed.
    pub fn remove_if_present<Q>(&mut self, value: &Q) -> RemoveOutcome
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove_if_present(hash, |v| v.borrow() == value)
    }

    /// Removes and returns the value equal to `value`, if any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v.borrow() == value).ok()
    }

    /// Retains only the elements for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|v| f(&*v));
    }

    /// Returns an iterator over the values of the set, in unspecified order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every value, keeping the allocated slots.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Inserts every value from `values`, skipping values already present.
    ///
    /// # Errors
    ///
    /// Stops at the first allocation failure. Values inserted before the
    /// failure stay in the set.
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            let _ = self.insert_if_absent(value)?;
        }
        Ok(())
    }

    /// Clones the set, reporting allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        T: Clone,
        S: Clone,
    {
        Ok(Self {
            table: self.table.try_clone()?,
            hash_builder: self.hash_builder.clone(),
        })
    }

    /// Replaces the contents of `self` with clones of the values and hasher
    /// of `source`, keeping the current allocation when it is large enough.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if a larger block is needed and cannot
    /// be allocated. `self` is left empty in that case.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), Error>
    where
        T: Clone,
        S: Clone,
    {
        self.table.clear();
        self.hash_builder.clone_from(&source.hash_builder);
        let hash_builder = &self.hash_builder;
        self.table.try_clone_from(&source.table, |v| hash_builder.hash_one(v))
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|v| !large.contains(v))
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every element of `other` is in `self`.
    pub fn is_superset(&self, other: &HashSet<T, S>) -> bool {
        other.is_subset(self)
    }

    /// Visits the values in `self` or `other`, without duplicates.
    pub fn union<'a>(&'a self, other: &'a HashSet<T, S>) -> Union<'a, T, S> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            first: self,
        }
    }

    /// Visits the values in both `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a HashSet<T, S>) -> Intersection<'a, T, S> {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Intersection {
            iter: small.iter(),
            other: large,
        }
    }

    /// Visits the values in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a HashSet<T, S>) -> Difference<'a, T, S> {
        Difference {
            iter: self.iter(),
            other,
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash set using the default hasher builder. Does not
    /// allocate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.slot_count(), 0);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash set with the specified capacity using the default
    /// hasher builder.
    ///
    /// # Errors
    ///
    /// Fails if the backing block cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, const N: usize> TryFrom<[T; N]> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    type Error = Error;

    fn try_from(values: [T; N]) -> Result<Self, Self::Error> {
        Self::from_list(values, S::default())
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

/// A consuming iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        infallible(Self::from_list(iter, S::default()))
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        infallible(self.try_extend(iter));
    }
}

/// An iterator over the union of two sets.
pub struct Union<'a, T, S> {
    iter: Iter<'a, T>,
    other_iter: Iter<'a, T>,
    first: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Union<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(v) = self.iter.next() {
            return Some(v);
        }
        loop {
            let v = self.other_iter.next()?;
            if !self.first.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Intersection<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Difference<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if !self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;
    use core::hash::Hasher;

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
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hashes a `u64` to itself, for laying out collisions by hand.
    #[derive(Clone, Default)]
    struct IdentityBuilder;

    #[derive(Default)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 = (self.0 << 8) | b as u64;
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    impl BuildHasher for IdentityBuilder {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> Self::Hasher {
            IdentityHasher::default()
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.slot_count(), 0);

        let set2 = HashSet::<i32, _>::with_hasher(SipHashBuilder::default());
        assert!(set2.is_empty());
        assert_eq!(set2.len(), 0);
    }

    #[test]
    fn test_with_capacity() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(100).unwrap();
        assert!(set.capacity() >= 100);
        assert!(set.is_empty());

        let set2 =
            HashSet::<i32, _>::with_capacity_and_hasher(200, SipHashBuilder::default()).unwrap();
        assert!(set2.capacity() >= 200);
        assert!(set2.is_empty());
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());

        assert_eq!(set.insert(1), Ok(()));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(set.contains(&1));

        assert_eq!(set.insert(1), Err(Error::KeyAlreadyExists));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&1));

        assert_eq!(set.insert_if_absent(2), Ok(InsertOutcome::Inserted));
        assert_eq!(set.insert_if_absent(2), Ok(InsertOutcome::AlreadyPresent));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_remove() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1).unwrap();
        set.insert(2).unwrap();
        set.insert(3).unwrap();

        assert_eq!(set.remove(&2), Ok(()));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));

        assert_eq!(set.remove(&2), Err(Error::KeyDoesNotExist));
        assert_eq!(set.remove_if_present(&4), RemoveOutcome::Absent);
        assert_eq!(set.remove_if_present(&3), RemoveOutcome::Removed);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_take() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1).unwrap();
        set.insert(2).unwrap();

        assert_eq!(set.take(&1), Some(1));
        assert_eq!(set.len(), 1);
        assert!(!set.contains(&1));
        assert!(set.contains(&2));

        assert_eq!(set.take(&1), None);
        assert_eq!(set.take(&3), None);
    }

    #[test]
    fn test_get_and_slot() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(42).unwrap();

        assert_eq!(set.get(&42), Some(&42));
        assert_eq!(set.get(&1), None);

        let index = set.find_slot(&42).unwrap();
        assert_eq!(set.slot(index), Some(&42));
        assert_eq!(set.find_slot(&1), None);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut set: HashSet<String, SipHashBuilder> = HashSet::new();
        set.insert("apple".to_string()).unwrap();

        assert!(set.contains("apple"));
        assert_eq!(set.get("apple").map(String::as_str), Some("apple"));
        assert_eq!(set.remove("apple"), Ok(()));
        assert!(!set.contains("apple"));
    }

    #[test]
    fn test_identity_scenario() {
        let mut set = HashSet::<u64, _>::with_capacity_and_hasher(3, IdentityBuilder).unwrap();
        assert_eq!(set.slot_count(), 5);
        for v in [1, 2, 3] {
            set.insert(v).unwrap();
        }
        assert_eq!(set.slot_count(), 5);

        set.remove(&2).unwrap();
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));
        assert_eq!(set.len(), 2);
        assert_eq!(set.slot_count(), 5);
    }

    #[test]
    fn test_clear() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1).unwrap();
        set.insert(2).unwrap();
        set.insert(3).unwrap();
        let slot_count = set.slot_count();

        assert_eq!(set.len(), 3);
        set.clear();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert_eq!(set.slot_count(), slot_count);
        assert!(!set.contains(&1));

        set.insert(4).unwrap();
        set.clear_and_shrink();
        assert!(set.is_empty());
        assert_eq!(set.slot_count(), 0);
    }

    #[test]
    fn test_reserve_and_shrink() {
        let mut set = HashSet::<i32, _>::with_hasher(SipHashBuilder::default());
        set.reserve(1000).unwrap();
        assert!(set.capacity() >= 1000);

        for i in 0..10 {
            set.insert(i).unwrap();
        }
        set.shrink_to_fit().unwrap();
        assert!(set.capacity() >= 10);
        assert!(set.capacity() < 1000);
        for i in 0..10 {
            assert!(set.contains(&i));
        }
    }

    #[test]
    fn test_from_list_keeps_first_duplicate() {
        #[derive(Debug, Clone)]
        struct Tagged {
            key: u32,
            origin: &'static str,
        }

        impl PartialEq for Tagged {
            fn eq(&self, other: &Self) -> bool {
                self.key == other.key
            }
        }

        impl Eq for Tagged {}

        impl core::hash::Hash for Tagged {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key.hash(state);
            }
        }

        let set = HashSet::from_list(
            [
                Tagged {
                    key: 1,
                    origin: "first",
                },
                Tagged {
                    key: 2,
                    origin: "only",
                },
                Tagged {
                    key: 1,
                    origin: "second",
                },
            ],
            SipHashBuilder::default(),
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        let kept = set
            .get(&Tagged {
                key: 1,
                origin: "",
            })
            .unwrap();
        assert_eq!(kept.origin, "first");
    }

    #[test]
    fn test_try_from_array() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::try_from([1, 2, 3, 2]).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.slot_count() >= 5);
    }

    #[test]
    fn test_iter_and_into_iter() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for i in 0..20 {
            set.insert(i).unwrap();
        }
        set.remove(&7).unwrap();

        assert_eq!(set.iter().len(), 19);
        let mut values: Vec<i32> = set.iter().copied().collect();
        values.sort();
        let expected: Vec<i32> = (0..20).filter(|&i| i != 7).collect();
        assert_eq!(values, expected);

        let mut owned: Vec<i32> = set.into_iter().collect();
        owned.sort();
        assert_eq!(owned, expected);
    }

    #[test]
    fn test_drain() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for i in 0..5 {
            set.insert(i).unwrap();
        }
        let mut drained: Vec<i32> = set.drain().collect();
        drained.sort();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_retain() {
        let mut set: HashSet<i32, SipHashBuilder> = (0..10).collect();
        set.retain(|&v| v % 3 == 0);
        assert_eq!(set.len(), 4);
        assert!(set.contains(&9));
        assert!(!set.contains(&4));
    }

    #[test]
    fn test_extend() {
        let mut set: HashSet<i32, SipHashBuilder> = HashSet::new();
        set.extend([1, 2]);
        set.extend([2, 3]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_clone_and_eq() {
        let set: HashSet<i32, SipHashBuilder> = (0..50).collect();
        let cloned = set.clone();
        assert_eq!(set, cloned);
        assert_eq!(cloned.slot_count(), set.slot_count());

        let mut other = set.try_clone().unwrap();
        other.remove(&0).unwrap();
        assert_ne!(set, other);
    }

    #[test]
    fn test_clone_from_reuses_allocation() {
        let source: HashSet<u64, SipHashBuilder> = (0..50).collect();

        let mut target =
            HashSet::with_capacity_and_hasher(200, SipHashBuilder::default()).unwrap();
        target.insert(1000).unwrap();
        let slots = target.slot_count();

        target.clone_from(&source);
        assert_eq!(target.slot_count(), slots);
        assert_eq!(target, source);
        assert!(!target.contains(&1000));
        target.insert(1000).unwrap();
        assert_eq!(target.insert(49), Err(Error::KeyAlreadyExists));

        let mut small: HashSet<u64, SipHashBuilder> = HashSet::new();
        small.try_clone_from(&source).unwrap();
        assert_eq!(small.slot_count(), 67);
        assert_eq!(small, source);
    }

    #[test]
    fn test_drain_and_into_iter_report_exact_len() {
        let mut set: HashSet<i32, SipHashBuilder> = (0..10).collect();
        let mut drain = set.drain();
        assert_eq!(drain.len(), 10);
        drain.next();
        assert_eq!(drain.len(), 9);
        drop(drain);

        let set: HashSet<i32, SipHashBuilder> = (0..7).collect();
        let mut iter = set.into_iter();
        assert_eq!(iter.len(), 7);
        iter.by_ref().for_each(drop);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_set_relations() {
        let a: HashSet<i32, SipHashBuilder> = HashSet::try_from([1, 2, 3]).unwrap();
        let b = HashSet::from_list([3, 4], a.hasher().clone()).unwrap();
        let c = HashSet::from_list([1, 2], a.hasher().clone()).unwrap();

        assert!(!a.is_disjoint(&b));
        assert!(b.is_disjoint(&c));
        assert!(c.is_subset(&a));
        assert!(a.is_superset(&c));
        assert!(!b.is_subset(&a));

        let mut union: Vec<i32> = a.union(&b).copied().collect();
        union.sort();
        assert_eq!(union, vec![1, 2, 3, 4]);

        let intersection: Vec<i32> = a.intersection(&b).copied().collect();
        assert_eq!(intersection, vec![3]);

        let mut difference: Vec<i32> = a.difference(&b).copied().collect();
        difference.sort();
        assert_eq!(difference, vec![1, 2]);
    }

    #[test]
    fn test_debug() {
        let set = HashSet::<i32, _>::from_list([5], SipHashBuilder::default()).unwrap();
        assert_eq!(alloc::format!("{set:?}"), "{5}");
    }

    #[test]
    fn test_string_values() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        let words = ["alpha", "beta", "gamma", "delta"];
        for w in words {
            set.insert(w.to_string()).unwrap();
        }
        for w in words {
            assert!(set.contains(w));
        }
        assert!(!set.contains("epsilon"));
    }
}
