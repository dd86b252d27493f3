use core::alloc::Layout;

/// Errors reported by fallible table operations.
///
/// Every variant is a recoverable condition. When an operation returns one of
/// these, the table is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The allocator could not provide the backing block.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    OutOfMemory {
        /// The layout of the block that was requested.
        layout: Layout,
    },
    /// The requested capacity does not fit in the address space.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// A strict insert found an equal element already in the table.
    #[error("key already exists")]
    KeyAlreadyExists,
    /// A strict remove found no matching element.
    #[error("key does not exist")]
    KeyDoesNotExist,
}

/// Result of an insert that tolerates an existing equal element.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The value was placed in a previously available slot.
    Inserted,
    /// An equal element was already present; the new value was dropped.
    AlreadyPresent,
}

/// Result of a remove that tolerates a missing element.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// A matching element was removed and dropped.
    Removed,
    /// No matching element was present.
    Absent,
}

impl InsertOutcome {
    /// Returns `true` if a new element was added.
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

impl RemoveOutcome {
    /// Returns `true` if an element was removed.
    pub fn is_removed(self) -> bool {
        matches!(self, RemoveOutcome::Removed)
    }
}
