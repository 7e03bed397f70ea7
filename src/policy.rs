/// Neighbour arithmetic over the logical indices `0..len` of a sequence.
///
/// Policies are zero-sized and chosen through the sequence's type parameter, so the
/// choice costs nothing at run time.
pub trait IndexPolicy {
    fn next(index: usize, len: usize) -> Option<usize>;
    fn previous(index: usize, len: usize) -> Option<usize>;
}

/// Neighbours stop at both ends of the live run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

/// Neighbours wrap around the live run, turning it into a ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cyclic;

impl IndexPolicy for Linear {
    #[inline(always)]
    fn next(index: usize, len: usize) -> Option<usize> {
        if index < len && index + 1 < len {
            Some(index + 1)
        } else {
            None
        }
    }

    #[inline(always)]
    fn previous(index: usize, len: usize) -> Option<usize> {
        if index > 0 && index < len {
            Some(index - 1)
        } else {
            None
        }
    }
}

impl IndexPolicy for Cyclic {
    #[inline(always)]
    fn next(index: usize, len: usize) -> Option<usize> {
        if index >= len {
            None
        } else if index + 1 == len {
            Some(0)
        } else {
            Some(index + 1)
        }
    }

    #[inline(always)]
    fn previous(index: usize, len: usize) -> Option<usize> {
        if index >= len {
            None
        } else if index == 0 {
            Some(len - 1)
        } else {
            Some(index - 1)
        }
    }
}
