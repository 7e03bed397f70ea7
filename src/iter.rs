use crate::policy::IndexPolicy;
use crate::IndexedSequence;
use std::iter::FusedIterator;

/// Iterator over the blocks of an `IndexedSequence`, front to back or back to front.
pub struct Iter<'a, T> {
    blocks: &'a [T],
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(blocks: &'a [T]) -> Iter<'a, T> {
        Iter {
            blocks,
            front: 0,
            back: blocks.len(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = &self.blocks[self.front];
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.blocks[self.back])
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { blocks: self.blocks, front: self.front, back: self.back }
    }
}

/// A position in a sequence that is not tied to a borrow of it.
///
/// The cursor only remembers an index. It stays valid across reads and writes of other
/// blocks, but once a block is inserted or removed in front of it, it denotes whatever
/// block was shifted into its slot. Moving the cursor uses the sequence's neighbour
/// policy, so on a cyclic sequence it walks around the ring forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: Option<usize>,
}

impl Cursor {
    pub fn at(index: usize) -> Cursor {
        Cursor { index: Some(index) }
    }

    /// A cursor that points nowhere.
    pub fn detached() -> Cursor {
        Cursor { index: None }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn get<'a, T, P: IndexPolicy>(&self, sequence: &'a IndexedSequence<T, P>) -> Option<&'a T> {
        self.index.and_then(|index| sequence.access(index))
    }

    pub fn get_mut<'a, T, P: IndexPolicy>(&self, sequence: &'a mut IndexedSequence<T, P>) -> Option<&'a mut T> {
        match self.index {
            Some(index) => sequence.access_mut(index),
            None => None,
        }
    }

    /// Moves to the next index, or detaches at the end of a linear sequence.
    pub fn move_next<T, P: IndexPolicy>(&mut self, sequence: &IndexedSequence<T, P>) {
        self.index = self.index.and_then(|index| sequence.index_of_next(index));
    }

    /// Moves to the previous index, or detaches at the start of a linear sequence.
    pub fn move_previous<T, P: IndexPolicy>(&mut self, sequence: &IndexedSequence<T, P>) {
        self.index = self.index.and_then(|index| sequence.index_of_previous(index));
    }
}
