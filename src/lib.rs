#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// A HashMap built on the linear-probing `HashTable`.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// A hash set built on the linear-probing `HashTable`.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub use error::Error;
pub use error::InsertOutcome;
pub use error::RemoveOutcome;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`HashMap`] and [`HashSet`] when none is
        /// named.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`HashMap`] and [`HashSet`] when none is
        /// named.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder hasher builder for builds with neither `foldhash` nor
        /// `std`.
        ///
        /// It has no values, so containers must be built with an explicit
        /// hasher through `with_hasher` or `with_capacity_and_hasher`.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}

        /// The hasher of [`DefaultHashBuilder`]. It has no values either.
        #[derive(Debug)]
        pub enum NoHasher {}

        impl core::hash::Hasher for NoHasher {
            fn finish(&self) -> u64 {
                match *self {}
            }

            fn write(&mut self, _bytes: &[u8]) {
                match *self {}
            }
        }

        impl core::hash::BuildHasher for DefaultHashBuilder {
            type Hasher = NoHasher;

            fn build_hasher(&self) -> Self::Hasher {
                match *self {}
            }
        }
    }
}
