use crate::BlockError;

/// Minimal capability every block storage backend provides: make a block live,
/// give it back, and count what is live. Positions and ordering belong to the
/// sequence layer.
pub trait BlockManager {
    type Item;
    type Handle;

    /// Makes one new live block holding `value`.
    fn allocate(&mut self, value: Self::Item) -> Result<Self::Handle, BlockError>;

    /// Makes one new live block holding the default value.
    fn allocate_default(&mut self) -> Result<Self::Handle, BlockError>
        where Self::Item: Default
    {
        self.allocate(Default::default())
    }

    /// Takes the block out of the manager. The handle is consumed and can not be used again.
    fn release(&mut self, handle: Self::Handle) -> Result<Self::Item, BlockError>;

    fn block(&self, handle: &Self::Handle) -> Option<&Self::Item>;

    fn block_mut(&mut self, handle: &Self::Handle) -> Option<&mut Self::Item>;

    fn live_block_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.live_block_count() == 0
    }
}

/// Handle to a block in a `CompactBlockManager`.
///
/// A handle remembers the slot of its block and the manager's generation at the time
/// it was issued. Any operation of the manager that moves blocks to other slots, or
/// releases a block by position, starts a new generation, after which older handles
/// are refused instead of silently denoting a neighbour.
// not Clone: releasing consumes it
#[derive(Debug, PartialEq, Eq)]
pub struct BlockHandle {
    index: usize,
    generation: usize,
}

impl BlockHandle {
    #[inline(always)]
    pub(crate) fn new(index: usize, generation: usize) -> BlockHandle {
        BlockHandle { index, generation }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline(always)]
    pub(crate) fn generation(&self) -> usize {
        self.generation
    }
}
