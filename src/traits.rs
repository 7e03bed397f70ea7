use crate::policy::IndexPolicy;
use crate::{BlockError, CyclicIndexedSequence, IndexedSequence, INIT_CAPACITY};

/// Implements collect to `IndexedSequence` storage.
pub trait SequenceIterator: Iterator {
    fn collect_sequence(self) -> Result<IndexedSequence<Self::Item>, BlockError>;

    fn collect_cyclic_sequence(self) -> Result<CyclicIndexedSequence<Self::Item>, BlockError>;

    fn collect_result_sequence<I, E>(self) -> Result<IndexedSequence<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            E: From<BlockError>;
}

fn collect_into<Q, P>(iter: Q) -> Result<IndexedSequence<Q::Item, P>, BlockError>
    where
        Q: Iterator,
        P: IndexPolicy,
{
    let (lower, _) = iter.size_hint();
    let mut sequence = IndexedSequence::with_capacity(lower.max(INIT_CAPACITY))?;
    for item in iter {
        sequence.insert_last(item)?;
    }
    Ok(sequence)
}

impl<Q: Iterator> SequenceIterator for Q {
    fn collect_sequence(self) -> Result<IndexedSequence<Self::Item>, BlockError> {
        collect_into(self)
    }

    fn collect_cyclic_sequence(self) -> Result<CyclicIndexedSequence<Self::Item>, BlockError> {
        collect_into(self)
    }

    fn collect_result_sequence<I, E>(self) -> Result<IndexedSequence<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>,
            E: From<BlockError>
    {
        let (lower, _) = self.size_hint();
        let mut sequence = IndexedSequence::with_capacity(lower.max(INIT_CAPACITY))?;
        for item in self {
            sequence.insert_last(item?)?;
        }
        Ok(sequence)
    }
}
