#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Errors returned when a table cannot grow.
pub mod error;

pub mod fnv;

/// A HashMap implementation using Robin Hood hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

pub mod probe;

pub use error::InsertError;
pub use error::ResizeError;
pub use hash_map::HashMap;
pub use hash_table::Bucket;
pub use hash_table::HashTable;
pub use probe::LoadFactor;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder [`HashMap`] uses unless told otherwise.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder [`HashMap`] uses unless told otherwise.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder [`HashMap`] uses unless told otherwise.
        pub type DefaultHashBuilder = fnv::Fnv1aBuildHasher;
    }
}
