use crate::iter::Cursor;
use crate::{BlockError, CyclicIndexedSequence};
use std::fmt;

pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Bounded FIFO queue over a fixed ring of slots.
///
/// The ring is a `CyclicIndexedSequence` filled with default values up front. Pushing
/// writes into the slot under the insertion cursor, popping takes the value out of the
/// slot under the removal cursor and leaves a default behind. Nothing is ever shifted.
pub struct RingQueue<T> {
    slots: CyclicIndexedSequence<T>,
    insertion: usize,
    removal: usize,
    len: usize,
}

impl<T: Default> RingQueue<T> {
    pub fn new() -> Result<RingQueue<T>, BlockError> {
        RingQueue::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<RingQueue<T>, BlockError> {
        Ok(RingQueue {
            slots: CyclicIndexedSequence::with_blocks(capacity)?,
            insertion: 0,
            removal: 0,
            len: 0,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the ring.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        self.slots.index_of_next(index).unwrap_or(0)
    }

    pub fn push(&mut self, value: T) -> Result<(), BlockError> {
        if self.len == self.capacity() {
            return Err(BlockError::Full { capacity: self.capacity() });
        }
        let slot = self.slots.access_mut(self.insertion)
            .ok_or(BlockError::NoSuchElement { index: self.insertion, len: self.len })?;
        *slot = value;
        self.insertion = self.advance(self.insertion);
        self.len += 1;
        Ok(())
    }

    pub fn peek(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots.access(self.removal)
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        self.slots.access_mut(self.removal)
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = std::mem::take(self.slots.access_mut(self.removal)?);
        self.removal = self.advance(self.removal);
        self.len -= 1;
        Some(value)
    }

    /// Drops the queued values and resets both cursors to the first slot.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
        trace!("queue cleared, cursors reset from {}", self.removal);
        self.insertion = 0;
        self.removal = 0;
    }

    /// Queued values from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item=&T> {
        let mut cursor = Cursor::at(self.removal);
        let slots = &self.slots;
        (0..self.len).filter_map(move |_| {
            let value = cursor.get(slots);
            cursor.move_next(slots);
            value
        })
    }

    /// Replaces the contents with the values of `other`, laid out from the first slot.
    ///
    /// Fails with `BlockError::Full` if this ring has fewer slots than `other` has values.
    pub fn assign(&mut self, other: &RingQueue<T>) -> Result<(), BlockError> where T: Clone {
        if other.len > self.capacity() {
            return Err(BlockError::Full { capacity: self.capacity() });
        }
        self.clear();
        for value in other.iter() {
            self.push(value.clone())?;
        }
        Ok(())
    }
}

impl<T: Default + Clone> Clone for RingQueue<T> {
    fn clone(&self) -> Self {
        RingQueue {
            slots: self.slots.clone(),
            insertion: self.insertion,
            removal: self.removal,
            len: self.len,
        }
    }
}

impl<T: Default + PartialEq> PartialEq for RingQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Default + fmt::Debug> fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
