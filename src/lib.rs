//! Compacting block arena and the index-addressable sequences built on it.
//!
//! `CompactBlockManager` keeps blocks packed at the start of one growable region.
//! `IndexedSequence` turns it into a list with first/last/by-index access, and
//! `CyclicIndexedSequence` wraps neighbour arithmetic around to make a ring.

#[macro_use]
mod logging;
mod error;
mod block;
mod arena;
mod policy;
mod sequence;
mod iter;
mod traits;
mod queue;

pub use error::BlockError;
pub use block::{BlockManager, BlockHandle};
pub use arena::{CompactBlockManager, INIT_CAPACITY};
pub use policy::{IndexPolicy, Linear, Cyclic};
pub use sequence::{IndexedSequence, CyclicIndexedSequence};
pub use iter::{Iter, Cursor};
pub use traits::SequenceIterator;
pub use queue::{RingQueue, DEFAULT_QUEUE_CAPACITY};

#[cfg(test)]
pub mod dropflag;
