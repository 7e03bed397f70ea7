use std::alloc::Layout;
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// The global allocator could not provide a region of this layout.
    AllocationFailed { layout: Layout },
    /// A region of `requested` slots does not fit in the address space.
    CapacityOverflow { requested: usize },
    /// A checked operation named a position outside the live run.
    NoSuchElement { index: usize, len: usize },
    /// A handle was used after blocks moved under it.
    StaleHandle { index: usize },
    /// A bounded structure has no free slot left.
    Full { capacity: usize },
}

impl Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::AllocationFailed { layout } => write!(f, "Failed to allocate a region of {} bytes (align {})", layout.size(), layout.align()),
            BlockError::CapacityOverflow { requested } => write!(f, "A region of {} blocks exceeds the maximum allocation size", requested),
            BlockError::NoSuchElement { index, len } => write!(f, "No element at index {}, sequence holds {} blocks", index, len),
            BlockError::StaleHandle { index } => write!(f, "Handle to slot {} was issued before blocks moved", index),
            BlockError::Full { capacity } => write!(f, "All {} slots are occupied", capacity),
        }
    }
}

impl std::error::Error for BlockError {}
