use alloc::collections::TryReserveError;
use core::fmt;

/// The error returned when a table cannot grow to a requested capacity.
///
/// A failed resize never modifies the table it was called on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResizeError {
    /// The requested capacity exponent does not fit in `usize`.
    CapacityOverflow,
    /// The allocator could not provide the new slot array.
    AllocFailed(TryReserveError),
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeError::CapacityOverflow => f.write_str("hash table capacity overflow"),
            ResizeError::AllocFailed(err) => write!(f, "hash table allocation failed: {err}"),
        }
    }
}

impl core::error::Error for ResizeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ResizeError::CapacityOverflow => None,
            ResizeError::AllocFailed(err) => Some(err),
        }
    }
}

impl From<TryReserveError> for ResizeError {
    fn from(err: TryReserveError) -> Self {
        ResizeError::AllocFailed(err)
    }
}

/// The error returned when an insertion needed to grow the table and the
/// growth failed.
///
/// The table is left exactly as it was before the call, and the key and
/// value are handed back to the caller.
pub struct InsertError<K, V> {
    key: K,
    value: V,
    error: ResizeError,
}

impl<K, V> InsertError<K, V> {
    pub(crate) fn new(key: K, value: V, error: ResizeError) -> Self {
        InsertError { key, value, error }
    }

    /// The key that could not be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value that could not be inserted.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The resize failure that prevented the insertion.
    pub fn resize_error(&self) -> &ResizeError {
        &self.error
    }

    /// Takes back ownership of the key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> fmt::Debug for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<K, V> fmt::Display for InsertError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insertion failed: {}", self.error)
    }
}

impl<K, V> core::error::Error for InsertError<K, V> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}
