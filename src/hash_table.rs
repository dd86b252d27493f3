//! A raw open-addressing hash table with linear probing and tombstones.
//!
//! [`HashTable`] stores values of type `V` in a single heap block: the value
//! array comes first, followed by one metadata byte per slot. The caller
//! supplies the hash and an equality predicate for every operation, plus a
//! hasher for any operation that may need to relocate values.

use alloc::alloc::handle_alloc_error;
use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::error::Error;
use crate::error::InsertOutcome;
use crate::error::RemoveOutcome;

/// Tag of a slot that holds nothing and never ends up inside a probe chain.
/// A probe that reaches it stops.
const EMPTY: u8 = 0b1000_0000;

/// Tag of a slot whose value was removed. Probes continue past it.
const TOMBSTONE: u8 = 0b1100_0000;

/// Set in both `EMPTY` and `TOMBSTONE`, clear in every occupied tag.
const AVAILABLE_BIT: u8 = 0b1000_0000;

const LOW_HASH_MASK: u64 = 0b0111_1111;

const MAX_LOAD_FACTOR_PERCENT: usize = 75;

#[inline(always)]
fn low_hash(hash: u64) -> u8 {
    (hash & LOW_HASH_MASK) as u8
}

#[inline(always)]
fn high_hash(hash: u64) -> u64 {
    hash >> 7
}

#[inline(always)]
fn is_available(tag: u8) -> bool {
    tag & AVAILABLE_BIT != 0
}

/// Smallest slot count that keeps `required` values under the load factor.
#[inline]
fn minimal_slot_count(required: usize) -> Result<usize, Error> {
    required
        .checked_mul(100)
        .map(|scaled| scaled / MAX_LOAD_FACTOR_PERCENT + 1)
        .ok_or(Error::CapacityOverflow)
}

#[inline]
fn next_slot_count(current: usize, required: usize) -> usize {
    current.saturating_mul(2).max(required)
}

/// Converts an error from a path that has no way to report it.
#[cold]
pub(crate) fn infallible<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::OutOfMemory { layout }) => handle_alloc_error(layout),
        Err(err) => panic!("{err}"),
    }
}

#[derive(Debug, Clone, Copy)]
struct DataLayout {
    layout: Layout,
    tags_offset: usize,
}

impl DataLayout {
    const UNALLOCATED: DataLayout = DataLayout {
        layout: Layout::new::<()>(),
        tags_offset: 0,
    };

    fn new<V>(slot_count: usize) -> Result<Self, Error> {
        let slots_layout = Layout::array::<V>(slot_count).map_err(|_| Error::CapacityOverflow)?;
        let tags_layout = Layout::array::<u8>(slot_count).map_err(|_| Error::CapacityOverflow)?;
        let (layout, tags_offset) = slots_layout
            .extend(tags_layout)
            .map_err(|_| Error::CapacityOverflow)?;

        Ok(DataLayout {
            layout,
            tags_offset,
        })
    }
}

/// The backing block: `slot_count` values followed by `slot_count` tags.
///
/// `RawSlots` owns the memory but not the values. Dropping it frees the block
/// without running any destructor, which is what lets a resize bit-copy values
/// into a fresh block and discard either side without double drops.
struct RawSlots<V> {
    alloc: NonNull<u8>,
    layout: DataLayout,
    slot_count: usize,
    _phantom: PhantomData<V>,
}

impl<V> RawSlots<V> {
    const fn unallocated() -> Self {
        Self {
            alloc: NonNull::<V>::dangling().cast(),
            layout: DataLayout::UNALLOCATED,
            slot_count: 0,
            _phantom: PhantomData,
        }
    }

    fn allocate(slot_count: usize) -> Result<Self, Error> {
        debug_assert!(slot_count > 0);
        let layout = DataLayout::new::<V>(slot_count)?;

        // SAFETY: `slot_count > 0`, so the tag array alone gives the layout a
        // non-zero size.
        let raw_alloc = unsafe { alloc::alloc::alloc(layout.layout) };
        let Some(block) = NonNull::new(raw_alloc) else {
            return Err(Error::OutOfMemory {
                layout: layout.layout,
            });
        };

        // SAFETY: The tag array occupies `[tags_offset, tags_offset + slot_count)`
        // of the block we just allocated.
        unsafe {
            core::ptr::write_bytes(block.as_ptr().add(layout.tags_offset), EMPTY, slot_count);
        }

        Ok(Self {
            alloc: block,
            layout,
            slot_count,
            _phantom: PhantomData,
        })
    }

    #[inline(always)]
    fn slots_ptr(&self) -> NonNull<V> {
        self.alloc.cast()
    }

    /// Pointer to the value storage of `index`.
    ///
    /// # Safety
    ///
    /// `index` must be less than `slot_count`.
    #[inline(always)]
    unsafe fn slot(&self, index: usize) -> *mut V {
        debug_assert!(index < self.slot_count);
        // SAFETY: Caller guarantees `index` is inside the value array.
        unsafe { self.slots_ptr().as_ptr().add(index) }
    }

    #[inline(always)]
    fn tags(&self) -> &[u8] {
        // SAFETY: The tag array is `slot_count` initialized bytes at
        // `tags_offset`. When unallocated the length is zero and the pointer
        // is dangling but non-null.
        unsafe {
            core::slice::from_raw_parts(
                self.alloc.as_ptr().add(self.layout.tags_offset),
                self.slot_count,
            )
        }
    }

    #[inline(always)]
    fn tags_mut(&mut self) -> &mut [u8] {
        // SAFETY: See `tags`; `&mut self` gives exclusive access to the block.
        unsafe {
            core::slice::from_raw_parts_mut(
                self.alloc.as_ptr().add(self.layout.tags_offset),
                self.slot_count,
            )
        }
    }

    /// The slot a probe for `hash` starts at. Requires `slot_count > 0`.
    #[inline(always)]
    fn home_slot(&self, hash: u64) -> usize {
        (high_hash(hash) % self.slot_count as u64) as usize
    }

    #[inline(always)]
    fn next_index(&self, index: usize) -> usize {
        if index + 1 == self.slot_count {
            0
        } else {
            index + 1
        }
    }

    /// First `EMPTY` or `TOMBSTONE` slot along the probe sequence of `hash`.
    ///
    /// Only called once the caller has confirmed a free slot exists, so
    /// coming up empty is a broken invariant.
    fn first_available(&self, hash: u64) -> usize {
        let tags = self.tags();
        let mut index = self.home_slot(hash);
        for _ in 0..self.slot_count {
            if is_available(tags[index]) {
                return index;
            }
            index = self.next_index(index);
        }

        panic!(
            "no available slot among {} slots after capacity was confirmed",
            self.slot_count
        );
    }
}

impl<V> Drop for RawSlots<V> {
    fn drop(&mut self) {
        if self.layout.layout.size() != 0 {
            // SAFETY: A non-zero layout means `alloc` came from `allocate` with
            // this exact layout.
            unsafe { alloc::alloc::dealloc(self.alloc.as_ptr(), self.layout.layout) }
        }
    }
}

enum Probe {
    Found(usize),
    Absent { available: Option<usize> },
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Maximum number of elements before the next insert grows the table
    pub capacity: usize,
    /// Total number of slots allocated
    pub slot_count: usize,
    /// Slots holding a tombstone
    pub tombstones: usize,
    /// Slots that have never been filled since the last clear or resize
    pub empty_slots: usize,
    /// populated / slot_count
    pub load_factor: f64,
    /// Largest distance of any element from its home slot
    pub max_probe_length: usize,
    /// Total memory in bytes used by the backing block
    pub total_bytes: usize,
    /// Bytes of value storage not holding a live element
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor, grows past {})",
            self.populated,
            self.slot_count,
            self.load_factor * 100.0,
            self.capacity
        );
        println!(
            "Slots: {} tombstones, {} empty",
            self.tombstones, self.empty_slots
        );
        println!("Longest probe: {}", self.max_probe_length);
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

/// Element counts bucketed by distance from their home slot.
///
/// `counts()[d]` is the number of elements stored `d` slots past the slot
/// their hash selects.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, Default)]
pub struct ProbeHistogram {
    counts: alloc::vec::Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Number of elements at each probe distance.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of elements recorded.
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
        println!("probe histogram ({} entries):", self.total());
        for (distance, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(width), count);
        }
    }
}

/// An open-addressing hash table with linear probing.
///
/// `HashTable<V>` stores values of type `V` and provides fast insertion,
/// lookup, and removal operations. Like a raw table, it requires you to
/// provide the hash value and an equality predicate for each operation, and a
/// `hasher` for any operation that may relocate values during growth. The
/// `hasher` must return the same hash that was supplied when each value was
/// inserted.
///
/// Removal leaves a tombstone so later elements of the same probe chain stay
/// reachable. The table grows when an insert would take it past a 75% load
/// factor and never shrinks on its own.
///
/// ## Performance Characteristics
///
/// - **Memory**: 1 byte per slot overhead, plus the size of `V`, in a single
///   allocation.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use probe_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(100)?;
///
/// table.insert(
///     hash_id(123),
///     Person {
///         id: 123,
///         name: "Alice".to_string(),
///     },
///     |p: &Person| p.id == 123,
///     |p: &Person| hash_id(p.id),
/// )?;
///
/// assert_eq!(
///     table.find(hash_id(123), |p| p.id == 123).map(|p| p.name.as_str()),
///     Some("Alice")
/// );
/// # Ok::<(), probe_hash::Error>(())
/// ```
pub struct HashTable<V> {
    raw: RawSlots<V>,
    populated: usize,
}

// SAFETY: The table uniquely owns its block and every value in it, so sending
// or sharing it is exactly as safe as sending or sharing the values.
unsafe impl<V: Send> Send for HashTable<V> {}
// SAFETY: See above. Shared access only ever hands out `&V`.
unsafe impl<V: Sync> Sync for HashTable<V> {}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;
        use alloc::vec::Vec;

        if self.raw.slot_count == 0 {
            return f
                .debug_struct("HashTable")
                .field("metadata", &"unallocated")
                .field("populated", &self.populated)
                .finish();
        }

        f.debug_struct("HashTable")
            .field(
                "metadata",
                &self
                    .raw
                    .tags()
                    .chunks(16)
                    .map(|w| {
                        w.iter()
                            .map(|&tag| match tag {
                                EMPTY => "..".to_string(),
                                TOMBSTONE => "xx".to_string(),
                                tag => format!("{tag:02x}"),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("slot_count", &self.raw.slot_count)
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        infallible(self.try_clone())
    }

    /// Reuses the block of `self` when it has the same slot count as
    /// `source`. Use [`HashTable::try_clone_from`] to reuse any block that is
    /// large enough.
    fn clone_from(&mut self, source: &Self) {
        if source.populated == 0 {
            self.clear();
        } else if self.raw.slot_count == source.raw.slot_count {
            self.clear();
            self.copy_slots_from(source);
        } else {
            *self = source.clone();
        }
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<V>() && self.populated > 0 {
            let slots = self.raw.slots_ptr();
            for (index, &tag) in self.raw.tags().iter().enumerate() {
                if !is_available(tag) {
                    // SAFETY: An occupied tag means the value at `index` is
                    // initialized, and nothing reads it after this.
                    unsafe { slots.add(index).drop_in_place() }
                }
            }
        }
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table without allocating.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::new();
    /// assert_eq!(table.slot_count(), 0);
    /// ```
    pub const fn new() -> Self {
        Self {
            raw: RawSlots::unallocated(),
            populated: 0,
        }
    }

    /// Creates a table that holds at least `capacity` values without growing.
    ///
    /// The table is sized to the smallest slot count that keeps `capacity`
    /// values under the 75% load factor. A `capacity` of zero does not
    /// allocate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the allocation fails, or
    /// [`Error::CapacityOverflow`] if the size computation overflows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(3)?;
    /// assert_eq!(table.slot_count(), 5);
    /// assert!(table.capacity() >= 3);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        Ok(Self {
            raw: RawSlots::allocate(minimal_slot_count(capacity)?)?,
            populated: 0,
        })
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of elements the table can hold before the next
    /// insert grows it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<i32> = HashTable::with_capacity(100)?;
    /// assert!(table.capacity() >= 100);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn capacity(&self) -> usize {
        // Largest `n` with `minimal_slot_count(n) <= slot_count`.
        ((self.raw.slot_count as u128 * MAX_LOAD_FACTOR_PERCENT as u128).saturating_sub(1) / 100)
            as usize
    }

    /// Returns the number of slots in the backing block. Zero means nothing is
    /// allocated.
    pub fn slot_count(&self) -> usize {
        self.raw.slot_count
    }

    /// Walks the probe chain for `hash` once and reports either the slot that
    /// holds a matching value or the first slot a new value could take.
    #[inline]
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let slot_count = self.raw.slot_count;
        if slot_count == 0 {
            return Probe::Absent { available: None };
        }

        let tag = low_hash(hash);
        let tags = self.raw.tags();
        let mut index = self.raw.home_slot(hash);
        let mut first_tombstone = None;

        for _ in 0..slot_count {
            match tags[index] {
                EMPTY => {
                    return Probe::Absent {
                        available: Some(first_tombstone.unwrap_or(index)),
                    };
                }
                TOMBSTONE => {
                    first_tombstone.get_or_insert(index);
                }
                current if current == tag => {
                    // SAFETY: An occupied tag means the value at `index` is
                    // initialized.
                    if eq(unsafe { &*self.raw.slot(index) }) {
                        return Probe::Found(index);
                    }
                }
                _ => {}
            }
            index = self.raw.next_index(index);
        }

        Probe::Absent {
            available: first_tombstone,
        }
    }

    /// Returns the slot index holding the value matching `hash` and `eq`.
    ///
    /// The index stays valid until the table is next mutated and can be
    /// resolved with [`slot`](Self::slot).
    pub fn find_slot(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        match self.probe(hash, eq) {
            Probe::Found(index) => Some(index),
            Probe::Absent { .. } => None,
        }
    }

    /// Returns the value stored at `index`, if that slot is occupied.
    pub fn slot(&self, index: usize) -> Option<&V> {
        let tag = *self.raw.tags().get(index)?;
        if is_available(tag) {
            return None;
        }
        // SAFETY: `index` is in bounds and its tag is occupied.
        Some(unsafe { &*self.raw.slot(index) })
    }

    /// Returns a mutable reference to the value stored at `index`, if that slot
    /// is occupied.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut V> {
        let tag = *self.raw.tags().get(index)?;
        if is_available(tag) {
            return None;
        }
        // SAFETY: `index` is in bounds and its tag is occupied.
        Some(unsafe { &mut *self.raw.slot(index) })
    }

    /// Finds a value by its hash and an equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use probe_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(hash_u64(42), 42u64, |&n| n == 42, |&n| hash_u64(n))?;
    ///
    /// assert_eq!(table.find(hash_u64(42), |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(hash_u64(7), |&n| n == 7), None);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_slot(hash, eq)?;
        // SAFETY: `find_slot` only returns occupied, in-bounds indices.
        Some(unsafe { &*self.raw.slot(index) })
    }

    /// Finds a value by its hash and an equality predicate, returning a
    /// mutable reference.
    ///
    /// The caller must not change the value in a way that changes its hash or
    /// its equality with other values.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_slot(hash, eq)?;
        // SAFETY: `find_slot` only returns occupied, in-bounds indices.
        Some(unsafe { &mut *self.raw.slot(index) })
    }

    /// Returns `true` if a value matching `hash` and `eq` is present.
    pub fn contains(&self, hash: u64, eq: impl Fn(&V) -> bool) -> bool {
        self.find_slot(hash, eq).is_some()
    }

    /// Gets the entry for `hash` and `eq`, growing the table first if the
    /// entry is vacant and one more value would exceed the load factor.
    ///
    /// An occupied entry never triggers growth. Once a vacant entry is
    /// returned, inserting into it cannot fail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] or [`Error::CapacityOverflow`] if the
    /// required growth fails. The table is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use probe_hash::hash_table::Entry;
    /// # use probe_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello", |s| hash_str(s))? {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// assert!(matches!(
    ///     table.entry(hash, |s: &String| s == "hello", |s| hash_str(s))?,
    ///     Entry::Occupied(_)
    /// ));
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<Entry<'_, V>, Error> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            Probe::Absent { available } => {
                let index = match (self.grow_for_insert(&hasher)?, available) {
                    (false, Some(index)) => index,
                    // The probe ran against the old block.
                    _ => self.raw.first_available(hash),
                };

                Ok(Entry::Vacant(VacantEntry {
                    table: self,
                    hash,
                    index,
                }))
            }
        }
    }

    /// Inserts `value`, failing if an equal value is already present.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyAlreadyExists`] if `eq` matches a stored value. The table
    ///   is not modified and does not grow.
    /// - [`Error::OutOfMemory`] / [`Error::CapacityOverflow`] if growth fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::Error;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(1, 1u64, |&v| v == 1, |&v| v)?;
    /// assert_eq!(
    ///     table.insert(1, 1u64, |&v| v == 1, |&v| v),
    ///     Err(Error::KeyAlreadyExists)
    /// );
    /// assert_eq!(table.len(), 1);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn insert(
        &mut self,
        hash: u64,
        value: V,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<&mut V, Error> {
        match self.entry(hash, eq, hasher)? {
            Entry::Occupied(_) => Err(Error::KeyAlreadyExists),
            Entry::Vacant(entry) => Ok(entry.insert(value)),
        }
    }

    /// Inserts `value` unless an equal value is already present, reporting
    /// which happened.
    ///
    /// # Errors
    ///
    /// Only allocation failures are reported as errors.
    pub fn insert_if_absent(
        &mut self,
        hash: u64,
        value: V,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<InsertOutcome, Error> {
        match self.entry(hash, eq, hasher)? {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyPresent),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    /// Removes and returns the value matching `hash` and `eq`.
    ///
    /// The slot becomes a tombstone, and the slot count is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyDoesNotExist`] if nothing matches. The table is not
    /// modified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::Error;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(42, 42u64, |&v| v == 42, |&v| v)?;
    ///
    /// assert_eq!(table.remove(42, |&v| v == 42), Ok(42));
    /// assert_eq!(table.remove(42, |&v| v == 42), Err(Error::KeyDoesNotExist));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<V, Error> {
        let index = self.find_slot(hash, eq).ok_or(Error::KeyDoesNotExist)?;
        // SAFETY: `find_slot` only returns occupied, in-bounds indices.
        Ok(unsafe { self.take_at(index) })
    }

    /// Removes and drops the value matching `hash` and `eq`, reporting whether
    /// anything was removed.
    pub fn remove_if_present(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> RemoveOutcome {
        match self.remove(hash, eq) {
            Ok(_) => RemoveOutcome::Removed,
            Err(_) => RemoveOutcome::Absent,
        }
    }

    /// Marks `index` as a tombstone and moves its value out.
    ///
    /// # Safety
    ///
    /// `index` must be in bounds and occupied.
    #[inline]
    unsafe fn take_at(&mut self, index: usize) -> V {
        debug_assert!(!is_available(self.raw.tags()[index]));
        self.raw.tags_mut()[index] = TOMBSTONE;
        self.populated -= 1;
        // SAFETY: Caller guarantees the slot was occupied; its tag now says
        // otherwise, so the value is read exactly once.
        unsafe { self.raw.slot(index).read() }
    }

    /// Retains only the values for which `f` returns `true`.
    ///
    /// Removed slots become tombstones.
    pub fn retain(&mut self, mut f: impl FnMut(&mut V) -> bool) {
        for index in 0..self.raw.slot_count {
            if self.populated == 0 {
                break;
            }
            if is_available(self.raw.tags()[index]) {
                continue;
            }

            // SAFETY: `index` is in bounds and occupied.
            let keep = f(unsafe { &mut *self.raw.slot(index) });
            if !keep {
                // SAFETY: As above.
                drop(unsafe { self.take_at(index) });
            }
        }
    }

    /// Removes all elements from the table.
    ///
    /// This operation preserves the table's allocated slots and also clears
    /// any tombstones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(1, 1u64, |&n| n == 1, |&n| n)?;
    /// table.insert(2, 2u64, |&n| n == 2, |&n| n)?;
    /// let slots = table.slot_count();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.slot_count(), slots);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn clear(&mut self) {
        if core::mem::needs_drop::<V>() && self.populated > 0 {
            let slots = self.raw.slots_ptr();
            for index in 0..self.raw.slot_count {
                if is_available(self.raw.tags()[index]) {
                    continue;
                }
                // Tombstoned before the drop: if it panics, the values not yet
                // dropped stay reachable and counted.
                self.raw.tags_mut()[index] = TOMBSTONE;
                self.populated -= 1;
                // SAFETY: The tag was occupied, so the value is initialized; it
                // is no longer tagged occupied, so it is dropped exactly once.
                unsafe { slots.add(index).drop_in_place() }
            }
        }

        self.populated = 0;
        self.raw.tags_mut().fill(EMPTY);
    }

    /// Removes all elements and releases the backing block.
    pub fn clear_and_shrink(&mut self) {
        self.clear();
        self.raw = RawSlots::unallocated();
    }

    /// Shrinks the table to the smallest slot count that holds its current
    /// elements. An empty table releases its block entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the smaller block cannot be
    /// allocated. The table is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::with_capacity(1000)?;
    /// table.insert(5, 5, |&v| v == 5, |&v| v)?;
    /// table.insert(10, 10, |&v| v == 10, |&v| v)?;
    ///
    /// table.shrink_to_fit(|&v| v)?;
    /// assert!(table.capacity() >= 2);
    /// assert!(table.capacity() < 1000);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn shrink_to_fit(&mut self, hasher: impl Fn(&V) -> u64) -> Result<(), Error> {
        if self.populated == 0 {
            self.clear_and_shrink();
            return Ok(());
        }

        let minimal = minimal_slot_count(self.populated)?;
        if minimal < self.raw.slot_count {
            self.resize(minimal, &hasher)?;
        }
        Ok(())
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// After a successful call, `capacity() >= len() + additional`. Does
    /// nothing if capacity is already sufficient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] or [`Error::CapacityOverflow`]. The table
    /// is unchanged in either case.
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&V) -> u64) -> Result<(), Error> {
        if additional == 0 {
            return Ok(());
        }

        let required = self
            .populated
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        let minimal = minimal_slot_count(required)?;
        if minimal > self.raw.slot_count {
            self.resize(minimal, &hasher)?;
        }
        Ok(())
    }

    /// Grows the table if one more element would break the load factor.
    /// Returns whether the backing block was replaced.
    #[inline]
    fn grow_for_insert(&mut self, hasher: &impl Fn(&V) -> u64) -> Result<bool, Error> {
        let minimal = minimal_slot_count(self.populated + 1)?;
        if minimal <= self.raw.slot_count {
            return Ok(false);
        }

        self.resize(next_slot_count(self.raw.slot_count, minimal), hasher)?;
        Ok(true)
    }

    /// Moves every element into a fresh block of `slot_count` slots.
    ///
    /// Values are bit-copied into the new block while the old block keeps
    /// ownership. Only after every element has been placed is the new block
    /// swapped in. An allocation failure or a panicking `hasher` therefore
    /// leaves the table exactly as it was.
    #[cold]
    #[inline(never)]
    fn resize(&mut self, slot_count: usize, hasher: &impl Fn(&V) -> u64) -> Result<(), Error> {
        debug_assert!(self.populated < slot_count);

        let mut fresh = RawSlots::<V>::allocate(slot_count)?;
        if self.populated > 0 {
            let old_slots = self.raw.slots_ptr();
            for (index, &tag) in self.raw.tags().iter().enumerate() {
                if is_available(tag) {
                    continue;
                }

                // SAFETY: An occupied tag means the source value is initialized.
                // `first_available` returns an in-bounds index of `fresh`, and
                // the two blocks never overlap. If `hasher` panics, `fresh` is
                // freed without dropping the copies it holds, and `self.raw`
                // still owns the originals.
                unsafe {
                    let source = old_slots.add(index).as_ptr();
                    let hash = hasher(&*source);
                    debug_assert_eq!(
                        low_hash(hash),
                        tag,
                        "hasher disagrees with the hash the value was inserted with"
                    );

                    let target = fresh.first_available(hash);
                    core::ptr::copy_nonoverlapping(source, fresh.slot(target), 1);
                    fresh.tags_mut()[target] = tag;
                }
            }
        }

        // The old block is freed here. Its values now live in `fresh`.
        self.raw = fresh;
        Ok(())
    }

    /// Clones the table, reporting allocation failure instead of aborting.
    ///
    /// The clone has the same slot count, with every element and tombstone at
    /// the same index as in `self`. An empty table clones to an unallocated
    /// one.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        V: Clone,
    {
        if self.populated == 0 {
            return Ok(Self::new());
        }

        let mut table = Self {
            raw: RawSlots::allocate(self.raw.slot_count)?,
            populated: 0,
        };
        table.copy_slots_from(self);
        Ok(table)
    }

    /// Clones every value of `source` into the same index of `self`, then
    /// copies the tombstones too. `self` must be empty with the same slot
    /// count as `source`.
    fn copy_slots_from(&mut self, source: &Self)
    where
        V: Clone,
    {
        debug_assert_eq!(self.populated, 0);
        debug_assert_eq!(self.raw.slot_count, source.raw.slot_count);

        for (index, &tag) in source.raw.tags().iter().enumerate() {
            if is_available(tag) {
                continue;
            }

            // SAFETY: `index` is occupied in `source`. Both blocks have the
            // same slot count, so it is in bounds for `self` as well.
            unsafe {
                let value = (*source.raw.slot(index)).clone();
                self.raw.slot(index).write(value);
            }
            // Tagged right away so a later panicking `clone` drops this value.
            self.raw.tags_mut()[index] = tag;
            self.populated += 1;
        }

        self.raw.tags_mut().copy_from_slice(source.raw.tags());
    }

    /// Replaces the contents of `self` with clones of the values in `source`.
    ///
    /// The current block is kept when it can hold `source.len()` values under
    /// the load factor; otherwise a block of the minimal slot count is
    /// allocated. Values are placed by `hasher`, so the layout may differ from
    /// `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] or [`Error::CapacityOverflow`] if a new
    /// block is needed and cannot be allocated. `self` is unchanged in that
    /// case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut source = HashTable::new();
    /// source.insert(1, 1u64, |&v| v == 1, |&v| v)?;
    ///
    /// let mut target: HashTable<u64> = HashTable::with_capacity(100)?;
    /// let slots = target.slot_count();
    /// target.try_clone_from(&source, |&v| v)?;
    ///
    /// assert_eq!(target.slot_count(), slots);
    /// assert!(target.contains(1, |&v| v == 1));
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn try_clone_from(
        &mut self,
        source: &Self,
        hasher: impl Fn(&V) -> u64,
    ) -> Result<(), Error>
    where
        V: Clone,
    {
        if source.populated == 0 {
            self.clear();
            return Ok(());
        }

        let required = minimal_slot_count(source.populated)?;
        if required > self.raw.slot_count {
            let raw = RawSlots::allocate(required)?;
            self.clear();
            self.raw = raw;
        } else {
            self.clear();
        }

        for value in source.iter() {
            let hash = hasher(value);
            let index = self.raw.first_available(hash);
            // SAFETY: `first_available` returns an in-bounds, unoccupied slot.
            unsafe { self.raw.slot(index).write(value.clone()) };
            self.raw.tags_mut()[index] = low_hash(hash);
            self.populated += 1;
        }

        Ok(())
    }

    /// Returns an iterator over all values in the table.
    ///
    /// The iterator yields `&V` references in physical slot order, which is
    /// unrelated to insertion order and changes whenever the table grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..10u64 {
    ///     table.insert(n, n, |&v| v == n, |&v| v)?;
    /// }
    ///
    /// let mut values: Vec<u64> = table.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, (0..10).collect::<Vec<_>>());
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Returns an iterator yielding mutable references to all values.
    ///
    /// The caller must not change any value in a way that changes its hash or
    /// its equality with other values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(self)
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The table keeps its slot count. Once the iterator is dropped, every
    /// slot is `EMPTY` again, even if the iterator was not run to completion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(1, 1u64, |&v| v == 1, |&v| v)?;
    ///
    /// let values: Vec<u64> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values, vec![1]);
    /// # Ok::<(), probe_hash::Error>(())
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            cursor: 0,
        }
    }

    /// Computes a histogram of each element's distance from its home slot.
    ///
    /// `hasher` must be the hasher the elements were inserted with.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self, hasher: impl Fn(&V) -> u64) -> ProbeHistogram {
        let mut counts = alloc::vec::Vec::new();
        for (index, value) in self.occupied() {
            let distance = self.probe_distance(index, hasher(value));
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }

        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// `hasher` must be the hasher the elements were inserted with.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self, hasher: impl Fn(&V) -> u64) -> DebugStats {
        let tags = self.raw.tags();
        let tombstones = tags.iter().filter(|&&tag| tag == TOMBSTONE).count();
        let empty_slots = tags.iter().filter(|&&tag| tag == EMPTY).count();
        let max_probe_length = self
            .occupied()
            .map(|(index, value)| self.probe_distance(index, hasher(value)))
            .max()
            .unwrap_or(0);

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            slot_count: self.raw.slot_count,
            tombstones,
            empty_slots,
            load_factor: if self.raw.slot_count == 0 {
                0.0
            } else {
                self.populated as f64 / self.raw.slot_count as f64
            },
            max_probe_length,
            total_bytes: self.raw.layout.layout.size(),
            wasted_bytes: (self.raw.slot_count - self.populated) * core::mem::size_of::<V>(),
        }
    }

    #[cfg(any(test, feature = "stats"))]
    fn occupied(&self) -> impl Iterator<Item = (usize, &V)> + '_ {
        self.raw
            .tags()
            .iter()
            .enumerate()
            .filter(|(_, tag)| !is_available(**tag))
            // SAFETY: Only occupied, in-bounds indices pass the filter.
            .map(|(index, _)| (index, unsafe { &*self.raw.slot(index) }))
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_distance(&self, index: usize, hash: u64) -> usize {
        let home = self.raw.home_slot(hash);
        (index + self.raw.slot_count - home) % self.raw.slot_count
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Ensures a value is in the entry by inserting `default` if empty, and
    /// returns a mutable reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of `default` if
    /// empty, and returns a mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A view into a vacant entry in the hash table.
///
/// Any growth the insert needs has already happened, so
/// [`insert`](Self::insert) cannot fail.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable reference to
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        debug_assert!(is_available(table.raw.tags()[self.index]));

        // SAFETY: `index` was chosen by `HashTable::entry` after any growth, so
        // it is an in-bounds, available slot of the current block.
        unsafe {
            let slot = table.raw.slot(self.index);
            slot.write(value);
            table.raw.tags_mut()[self.index] = low_hash(self.hash);
            table.populated += 1;
            &mut *slot
        }
    }

    /// The slot the value will be written to.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A view into an occupied entry in the hash table.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        // SAFETY: `index` came from a successful probe and the table is
        // borrowed for the lifetime of the entry.
        unsafe { &*self.table.raw.slot(self.index) }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        // SAFETY: See `get`.
        unsafe { &mut *self.table.raw.slot(self.index) }
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the entry.
    pub fn into_mut(self) -> &'a mut V {
        // SAFETY: See `get`.
        unsafe { &mut *self.table.raw.slot(self.index) }
    }

    /// Removes the entry from the table and returns the value. The slot becomes
    /// a tombstone.
    pub fn remove(self) -> V {
        // SAFETY: See `get`.
        unsafe { self.table.take_at(self.index) }
    }

    /// The slot holding the value.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// The cursor always rests on an occupied slot or on the end. It moves past
/// every `EMPTY` and `TOMBSTONE` slot as soon as it is created and again after
/// each step. The borrow on the table rules out mutation while iterating.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: NonNull<V>,
    tags: &'a [u8],
    cursor: usize,
    remaining: usize,
    _marker: PhantomData<&'a V>,
}

impl<'a, V> Iter<'a, V> {
    fn new(table: &'a HashTable<V>) -> Self {
        let tags = table.raw.tags();
        let mut iter = Iter {
            slots: table.raw.slots_ptr(),
            tags,
            cursor: if table.populated == 0 { tags.len() } else { 0 },
            remaining: table.populated,
            _marker: PhantomData,
        };
        iter.settle();
        iter
    }

    #[inline]
    fn settle(&mut self) {
        while self.cursor < self.tags.len() && is_available(self.tags[self.cursor]) {
            self.cursor += 1;
        }
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots,
            tags: self.tags,
            cursor: self.cursor,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.tags.len() {
            return None;
        }

        let index = self.cursor;
        self.cursor += 1;
        self.settle();
        self.remaining -= 1;

        // SAFETY: `settle` only stops on occupied, in-bounds slots, and the
        // shared borrow of the table keeps the value alive for `'a`.
        Some(unsafe { self.slots.add(index).as_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V> {
    slots: NonNull<V>,
    tags: &'a [u8],
    cursor: usize,
    remaining: usize,
    _marker: PhantomData<&'a mut V>,
}

impl<'a, V> IterMut<'a, V> {
    fn new(table: &'a mut HashTable<V>) -> Self {
        let slots = table.raw.slots_ptr();
        let remaining = table.populated;
        let tags = table.raw.tags();
        // SAFETY: The tags and the values live in disjoint parts of the block.
        // Only values are handed out mutably, so a shared view of the tags can
        // live for `'a` next to them.
        let tags: &'a [u8] = unsafe { core::slice::from_raw_parts(tags.as_ptr(), tags.len()) };

        let mut iter = IterMut {
            slots,
            tags,
            cursor: if remaining == 0 { tags.len() } else { 0 },
            remaining,
            _marker: PhantomData,
        };
        iter.settle();
        iter
    }

    #[inline]
    fn settle(&mut self) {
        while self.cursor < self.tags.len() && is_available(self.tags[self.cursor]) {
            self.cursor += 1;
        }
    }
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.tags.len() {
            return None;
        }

        let index = self.cursor;
        self.cursor += 1;
        self.settle();
        self.remaining -= 1;

        // SAFETY: `index` is occupied and in bounds, each index is yielded at
        // most once, and the exclusive borrow of the table lasts for `'a`.
        let mut slot = unsafe { self.slots.add(index) };
        Some(unsafe { slot.as_mut() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
/// It yields owned `V` values and empties the table as it iterates.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    cursor: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        self.table.raw.tags_mut().fill(EMPTY);
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        next_owned(self.table, &mut self.cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
///
/// Values not yielded are dropped together with the iterator.
pub struct IntoIter<V> {
    table: HashTable<V>,
    cursor: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        next_owned(&mut self.table, &mut self.cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table: self,
            cursor: 0,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut HashTable<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = &'a mut V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Moves the next occupied value at or after `cursor` out of `table`.
fn next_owned<V>(table: &mut HashTable<V>, cursor: &mut usize) -> Option<V> {
    if table.populated == 0 {
        return None;
    }

    while *cursor < table.raw.slot_count {
        let index = *cursor;
        *cursor += 1;
        if !is_available(table.raw.tags()[index]) {
            // SAFETY: `index` is in bounds and occupied.
            return Some(unsafe { table.take_at(index) });
        }
    }

    None
}
