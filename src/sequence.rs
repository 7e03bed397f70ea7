use crate::arena::CompactBlockManager;
use crate::iter::{Cursor, Iter};
use crate::policy::{Cyclic, IndexPolicy, Linear};
use crate::BlockError;
use std::marker::PhantomData;

/// Index-addressable sequence stored in a `CompactBlockManager`.
///
/// Positions `0..len` are the logical order of the blocks. The policy `P` decides what
/// the neighbours of a position are: `Linear` stops at both ends, `Cyclic` wraps.
///
/// Blocks are addressed by index. Operations that act relative to a block ("insert
/// after", "remove next") take that block's index, which `index_of` recovers from a
/// reference.
pub struct IndexedSequence<T, P = Linear> {
    blocks: CompactBlockManager<T>,
    _policy: PhantomData<P>,
}

/// An `IndexedSequence` whose neighbours wrap around, usable as a ring buffer.
pub type CyclicIndexedSequence<T> = IndexedSequence<T, Cyclic>;

impl<T, P: IndexPolicy> IndexedSequence<T, P> {
    pub fn new() -> Result<IndexedSequence<T, P>, BlockError> {
        Ok(IndexedSequence::from_blocks(CompactBlockManager::new()?))
    }

    pub fn with_capacity(capacity: usize) -> Result<IndexedSequence<T, P>, BlockError> {
        Ok(IndexedSequence::from_blocks(CompactBlockManager::with_capacity(capacity)?))
    }

    /// Creates a sequence holding `len` default blocks in a region of exactly `len` slots.
    pub fn with_blocks(len: usize) -> Result<IndexedSequence<T, P>, BlockError> where T: Default {
        let mut blocks = CompactBlockManager::with_capacity(len)?;
        for index in 0..len {
            blocks.allocate_at(index, T::default())?;
        }
        Ok(IndexedSequence::from_blocks(blocks))
    }

    fn from_blocks(blocks: CompactBlockManager<T>) -> IndexedSequence<T, P> {
        IndexedSequence { blocks, _policy: PhantomData }
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.blocks.capacity()
    }

    fn no_such_element(&self, index: usize) -> BlockError {
        BlockError::NoSuchElement { index, len: self.len() }
    }

    pub fn access_first(&self) -> Option<&T> {
        self.access(0)
    }

    pub fn access_last(&self) -> Option<&T> {
        match self.len() {
            0 => None,
            len => self.access(len - 1),
        }
    }

    pub fn access(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            Some(self.blocks.block_at(index))
        } else {
            None
        }
    }

    pub fn access_first_mut(&mut self) -> Option<&mut T> {
        self.access_mut(0)
    }

    pub fn access_last_mut(&mut self) -> Option<&mut T> {
        match self.len() {
            0 => None,
            len => self.access_mut(len - 1),
        }
    }

    pub fn access_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            Some(self.blocks.block_at_mut(index))
        } else {
            None
        }
    }

    /// Neighbour of `block` following the sequence's policy.
    pub fn access_next(&self, block: &T) -> Option<&T> {
        self.index_of(block)
            .and_then(|index| self.index_of_next(index))
            .and_then(|index| self.access(index))
    }

    pub fn access_previous(&self, block: &T) -> Option<&T> {
        self.index_of(block)
            .and_then(|index| self.index_of_previous(index))
            .and_then(|index| self.access(index))
    }

    /// Position of `block` if it is a live block of this sequence.
    pub fn index_of(&self, block: &T) -> Option<usize> {
        self.blocks.index_of(block)
    }

    #[inline(always)]
    pub fn index_of_next(&self, index: usize) -> Option<usize> {
        P::next(index, self.len())
    }

    #[inline(always)]
    pub fn index_of_previous(&self, index: usize) -> Option<usize> {
        P::previous(index, self.len())
    }

    pub fn insert_first(&mut self, value: T) -> Result<&mut T, BlockError> {
        self.blocks.allocate_at(0, value)
    }

    pub fn insert_last(&mut self, value: T) -> Result<&mut T, BlockError> {
        let len = self.len();
        self.blocks.allocate_at(len, value)
    }

    /// Inserts `value` so that it ends up at `index`. `index == len` appends.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<&mut T, BlockError> {
        if index > self.len() {
            return Err(self.no_such_element(index));
        }
        self.blocks.allocate_at(index, value)
    }

    /// Inserts `value` in front of the live block at `index`.
    pub fn insert_before(&mut self, index: usize, value: T) -> Result<&mut T, BlockError> {
        if index >= self.len() {
            return Err(self.no_such_element(index));
        }
        self.blocks.allocate_at(index, value)
    }

    /// Inserts `value` behind the live block at `index`.
    pub fn insert_after(&mut self, index: usize, value: T) -> Result<&mut T, BlockError> {
        if index >= self.len() {
            return Err(self.no_such_element(index));
        }
        self.blocks.allocate_at(index + 1, value)
    }

    pub fn remove_first(&mut self) -> Result<T, BlockError> {
        self.remove_at(0)
    }

    pub fn remove_last(&mut self) -> Result<T, BlockError> {
        let len = self.len();
        self.blocks.release_last().ok_or(BlockError::NoSuchElement { index: 0, len })
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T, BlockError> {
        if index >= self.len() {
            return Err(self.no_such_element(index));
        }
        self.blocks.release_at(index)
    }

    /// Removes the neighbour following the block at `index`.
    pub fn remove_next(&mut self, index: usize) -> Result<T, BlockError> {
        match self.index_of_next(index) {
            Some(next) => self.blocks.release_at(next),
            None => Err(self.no_such_element(index)),
        }
    }

    /// Removes the neighbour preceding the block at `index`.
    pub fn remove_previous(&mut self, index: usize) -> Result<T, BlockError> {
        match self.index_of_previous(index) {
            Some(previous) => self.blocks.release_at(previous),
            None => Err(self.no_such_element(index)),
        }
    }

    /// Exchanges the blocks at two positions.
    pub fn swap(&mut self, first: usize, second: usize) -> Result<(), BlockError> {
        let len = self.len();
        if first >= len {
            return Err(self.no_such_element(first));
        }
        if second >= len {
            return Err(self.no_such_element(second));
        }
        self.blocks.swap(first, second);
        Ok(())
    }

    /// Grows the region to at least `capacity` slots. Never drops blocks.
    pub fn reserve_capacity(&mut self, capacity: usize) -> Result<(), BlockError> {
        if capacity > self.capacity() {
            self.blocks.change_capacity(capacity)?;
        }
        Ok(())
    }

    /// Resizes the region to exactly `capacity` slots, dropping blocks that do not fit.
    pub fn change_capacity(&mut self, capacity: usize) -> Result<(), BlockError> {
        self.blocks.change_capacity(capacity)
    }

    pub fn shrink_to_fit(&mut self) -> Result<(), BlockError> {
        self.blocks.shrink_to_fit()
    }

    /// Drops every block. The capacity stays as it is.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        self.blocks.as_slice()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.blocks.as_slice())
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item=&mut T> + ExactSizeIterator {
        self.blocks.as_mut_slice().iter_mut()
    }

    /// Cursor on the first block, detached if the sequence is empty.
    pub fn cursor_first(&self) -> Cursor {
        if self.is_empty() { Cursor::detached() } else { Cursor::at(0) }
    }

    /// Cursor on the last block, detached if the sequence is empty.
    pub fn cursor_last(&self) -> Cursor {
        match self.len() {
            0 => Cursor::detached(),
            len => Cursor::at(len - 1),
        }
    }

    pub fn try_clone(&self) -> Result<IndexedSequence<T, P>, BlockError> where T: Clone {
        Ok(IndexedSequence::from_blocks(self.blocks.try_clone()?))
    }

    pub fn assign(&mut self, other: &IndexedSequence<T, P>) -> Result<(), BlockError> where T: Clone {
        self.blocks.assign(&other.blocks)
    }
}

impl<T: Clone, P: IndexPolicy> Clone for IndexedSequence<T, P> {
    fn clone(&self) -> Self {
        IndexedSequence::from_blocks(self.blocks.clone())
    }
}

impl<T: PartialEq, P> PartialEq for IndexedSequence<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

impl<T: Eq, P> Eq for IndexedSequence<T, P> {}

impl<T, P> std::fmt::Debug for IndexedSequence<T, P> where T: std::fmt::Debug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.blocks.as_slice()).finish()
    }
}

impl<'a, T, P: IndexPolicy> IntoIterator for &'a IndexedSequence<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
