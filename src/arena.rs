use crate::block::{BlockHandle, BlockManager};
use crate::BlockError;
use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

/// Number of slots a fresh region reserves, and the floor for `shrink_to_fit`.
pub const INIT_CAPACITY: usize = 4;

fn region_layout<T>(capacity: usize) -> Result<Layout, BlockError> {
    Layout::array::<T>(capacity).map_err(|_| BlockError::CapacityOverflow { requested: capacity })
}

fn allocate_region<T>(capacity: usize) -> Result<NonNull<T>, BlockError> {
    let layout = region_layout::<T>(capacity)?;
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    let ptr = unsafe { alloc::alloc(layout) } as *mut T;
    NonNull::new(ptr).ok_or(BlockError::AllocationFailed { layout })
}

/// Frees a region obtained from `allocate_region` with the same `capacity`.
/// Slots must not hold live values anymore.
unsafe fn release_region<T>(base: NonNull<T>, capacity: usize) {
    if let Ok(layout) = Layout::array::<T>(capacity) {
        if layout.size() != 0 {
            alloc::dealloc(base.as_ptr() as *mut u8, layout);
        }
    }
}

/// Owns a region until dropped, so it is freed even when a block's `drop` unwinds.
struct RegionGuard<T> {
    base: NonNull<T>,
    capacity: usize,
}

impl<T> Drop for RegionGuard<T> {
    fn drop(&mut self) {
        unsafe { release_region(self.base, self.capacity) };
    }
}

/// Block manager over a single contiguous region that grows and shrinks as a whole.
///
/// The region is split in two runs:
///
/// ```text
///   base                     base+len            base+capacity
///   ├── live blocks ─────────┼── reserved slots ──┤
///   │ 0 │ 1 │ 2 │ ... │len-1 │    uninitialized   │
/// ```
///
/// Live blocks are always packed at the start of the region, so the logical index of a
/// block is its slot number. Inserting at an index shifts the tail one slot towards
/// the end, removing shifts it back. When the live run reaches the end of the region,
/// the region is doubled before the insert.
///
/// Values are moved, never cloned, when the region is reallocated or shifted. Cloning
/// the manager clones every live value into a region sized exactly to the live count.
///
/// Raw addresses never leave this type; callers see indices, references and counts.
pub struct CompactBlockManager<T> {
    base: NonNull<T>,
    len: usize,
    capacity: usize,
    /// Bumped whenever blocks change position, which invalidates outstanding handles.
    generation: usize,
}

// The region is owned exclusively, like a `Vec`.
unsafe impl<T: Send> Send for CompactBlockManager<T> {}

impl<T> CompactBlockManager<T> {
    /// Creates an empty manager with `INIT_CAPACITY` reserved slots.
    pub fn new() -> Result<CompactBlockManager<T>, BlockError> {
        CompactBlockManager::with_capacity(INIT_CAPACITY)
    }

    /// Creates an empty manager with exactly `capacity` reserved slots.
    pub fn with_capacity(capacity: usize) -> Result<CompactBlockManager<T>, BlockError> {
        let base = allocate_region::<T>(capacity)?;
        trace!("reserved region of {} slots", capacity);
        Ok(CompactBlockManager {
            base,
            len: 0,
            capacity,
            generation: 0,
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

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot `index` of the region; `index` must not exceed the capacity.
    #[inline(always)]
    fn address_of(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity, "address_of: index within region");
        unsafe { self.base.as_ptr().add(index) }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.base.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.base.as_ptr(), self.len) }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Inserts `value` at logical position `index`, moving every block at `index` and
    /// after it one slot towards the end. Doubles the region first if it is full.
    ///
    /// `index` may be equal to `len`, which appends.
    pub fn allocate_at(&mut self, index: usize, value: T) -> Result<&mut T, BlockError> {
        if index > self.len {
            return Err(BlockError::NoSuchElement { index, len: self.len });
        }
        if self.len == self.capacity {
            self.grow()?;
        }
        unsafe {
            let slot = self.address_of(index);
            if index < self.len {
                ptr::copy(slot, slot.add(1), self.len - index);
                self.generation = self.generation.wrapping_add(1);
            }
            ptr::write(slot, value);
            self.len += 1;
            Ok(&mut *slot)
        }
    }

    /// Moves the block at `index` out and closes the hole by moving the tail one slot
    /// towards the base.
    pub fn release_at(&mut self, index: usize) -> Result<T, BlockError> {
        let value = self.take_at(index)?;
        // a handle to the released block may still be around
        self.generation = self.generation.wrapping_add(1);
        Ok(value)
    }

    /// Moves the trailing block out.
    pub fn release_last(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.release_at(self.len - 1).ok()
    }

    /// `release_at` without invalidating handles when no block changes position.
    fn take_at(&mut self, index: usize) -> Result<T, BlockError> {
        if index >= self.len {
            return Err(BlockError::NoSuchElement { index, len: self.len });
        }
        unsafe {
            let slot = self.address_of(index);
            let value = ptr::read(slot);
            if index + 1 < self.len {
                ptr::copy(slot.add(1), slot, self.len - index - 1);
                self.generation = self.generation.wrapping_add(1);
            }
            self.len -= 1;
            Ok(value)
        }
    }

    fn grow(&mut self) -> Result<(), BlockError> {
        let capacity = if self.len == 0 {
            INIT_CAPACITY
        } else {
            self.len.checked_mul(2).ok_or(BlockError::CapacityOverflow { requested: self.len })?
        };
        debug!("region full at {} blocks, growing to {}", self.len, capacity);
        self.change_capacity(capacity)
    }

    /// Moves the region to a new one of exactly `capacity` slots.
    ///
    /// Live blocks past the new capacity are dropped. Nothing happens when `capacity`
    /// equals the current capacity. If the new region can not be allocated, the manager
    /// is left untouched.
    pub fn change_capacity(&mut self, capacity: usize) -> Result<(), BlockError> {
        if capacity == self.capacity {
            return Ok(());
        }

        let base = allocate_region::<T>(capacity)?;
        let len = self.len;
        let kept = len.min(capacity);
        debug!("moving {} blocks from a region of {} to {} slots", kept, self.capacity, capacity);

        // survivors move first; the old region then only holds the trailing blocks
        unsafe { ptr::copy_nonoverlapping(self.base.as_ptr(), base.as_ptr(), kept) };
        let old = RegionGuard { base: self.base, capacity: self.capacity };
        self.base = base;
        self.capacity = capacity;
        self.len = kept;

        if kept < len {
            trace!("dropping {} trailing blocks", len - kept);
            self.generation = self.generation.wrapping_add(1);
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(old.base.as_ptr().add(kept), len - kept));
            }
        }
        Ok(())
    }

    /// Releases unused slots, keeping at least `INIT_CAPACITY` of them.
    pub fn shrink_to_fit(&mut self) -> Result<(), BlockError> {
        self.change_capacity(self.len.max(INIT_CAPACITY))
    }

    /// Drops every live block. The capacity stays as it is.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        self.generation = self.generation.wrapping_add(1);
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.base.as_ptr(), len));
        }
    }

    /// Logical index of `block` if it is one of the live blocks of this region.
    pub fn index_of(&self, block: &T) -> Option<usize> {
        let size = mem::size_of::<T>();
        if size == 0 {
            // every zero-sized block shares the base address
            return None;
        }
        let start = self.base.as_ptr() as usize;
        let address = block as *const T as usize;
        if address < start || address >= start + self.len * size {
            return None;
        }
        let offset = address - start;
        if offset % size != 0 {
            return None;
        }
        Some(offset / size)
    }

    #[inline(always)]
    pub fn contains(&self, block: &T) -> bool {
        self.index_of(block).is_some()
    }

    /// The live block at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`. Callers are expected to check first.
    #[inline(always)]
    pub fn block_at(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }

    /// The live block at `index`, mutable.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[inline(always)]
    pub fn block_at_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }

    /// Exchanges the values at two live positions.
    ///
    /// # Panics
    /// Panics if either index is out of the live run.
    pub fn swap(&mut self, first: usize, second: usize) {
        self.as_mut_slice().swap(first, second);
        if first != second {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Clones the live run into a new region of exactly `len` slots.
    pub fn try_clone(&self) -> Result<CompactBlockManager<T>, BlockError> where T: Clone {
        let mut copy = CompactBlockManager::with_capacity(self.len)?;
        trace!("cloning {} blocks", self.len);
        for value in self.iter() {
            // copy.len tracks every written slot, so a panicking clone drops only those
            unsafe { ptr::write(copy.address_of(copy.len), value.clone()) };
            copy.len += 1;
        }
        Ok(copy)
    }

    /// Replaces the contents of this manager with a copy of `other`.
    ///
    /// The copy is built in full before anything is dropped, so on error this manager
    /// is unchanged.
    pub fn assign(&mut self, other: &CompactBlockManager<T>) -> Result<(), BlockError> where T: Clone {
        let mut copy = other.try_clone()?;
        copy.generation = self.generation.wrapping_add(1);
        *self = copy;
        Ok(())
    }
}

impl<T> BlockManager for CompactBlockManager<T> {
    type Item = T;
    type Handle = BlockHandle;

    fn allocate(&mut self, value: T) -> Result<BlockHandle, BlockError> {
        let index = self.len;
        self.allocate_at(index, value)?;
        Ok(BlockHandle::new(index, self.generation))
    }

    fn release(&mut self, handle: BlockHandle) -> Result<T, BlockError> {
        if handle.generation() != self.generation {
            return Err(BlockError::StaleHandle { index: handle.index() });
        }
        self.take_at(handle.index())
    }

    fn block(&self, handle: &BlockHandle) -> Option<&T> {
        if handle.generation() != self.generation {
            return None;
        }
        self.as_slice().get(handle.index())
    }

    fn block_mut(&mut self, handle: &BlockHandle) -> Option<&mut T> {
        if handle.generation() != self.generation {
            return None;
        }
        self.as_mut_slice().get_mut(handle.index())
    }

    #[inline(always)]
    fn live_block_count(&self) -> usize {
        self.len
    }
}

impl<T> Drop for CompactBlockManager<T> {
    fn drop(&mut self) {
        let _region = RegionGuard { base: self.base, capacity: self.capacity };
        self.clear();
    }
}

impl<T: Clone> Clone for CompactBlockManager<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(BlockError::AllocationFailed { layout }) => alloc::handle_alloc_error(layout),
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: PartialEq> PartialEq for CompactBlockManager<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for CompactBlockManager<T> {}

impl<T: fmt::Debug> fmt::Debug for CompactBlockManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactBlockManager")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("block_size", &mem::size_of::<T>())
            .field("blocks", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod arena_tests {
    use super::{CompactBlockManager, INIT_CAPACITY};
    use crate::block::BlockManager;
    use crate::dropflag::{new_flag, Exploding, Tracked};
    use crate::BlockError;
    use std::panic::{self, AssertUnwindSafe};

    fn filled(values: &[i32]) -> CompactBlockManager<i32> {
        let mut blocks = CompactBlockManager::new().unwrap();
        for v in values {
            blocks.allocate(*v).unwrap();
        }
        blocks
    }

    #[test]
    fn starts_empty_with_default_capacity() {
        let blocks = CompactBlockManager::<i32>::new().unwrap();
        assert_eq!(0, blocks.len());
        assert_eq!(INIT_CAPACITY, blocks.capacity());
        assert!(blocks.is_empty());
    }

    #[test]
    fn doubles_capacity_when_full() {
        let mut blocks = filled(&[1, 2, 3, 4]);
        assert_eq!(4, blocks.capacity());
        blocks.allocate(5).unwrap();
        assert_eq!(8, blocks.capacity());
        assert_eq!(&[1, 2, 3, 4, 5], blocks.as_slice());
    }

    #[test]
    fn empty_region_grows_to_default_capacity() {
        let mut blocks = CompactBlockManager::with_capacity(0).unwrap();
        assert_eq!(0, blocks.capacity());
        blocks.allocate_at(0, 'a').unwrap();
        assert_eq!(INIT_CAPACITY, blocks.capacity());
        assert_eq!(&['a'], blocks.as_slice());
    }

    #[test]
    fn allocate_at_shifts_tail_towards_end() {
        let mut blocks = filled(&[10, 20, 30]);
        assert_eq!(15, *blocks.allocate_at(1, 15).unwrap());
        assert_eq!(&[10, 15, 20, 30], blocks.as_slice());
        blocks.allocate_at(4, 40).unwrap();
        blocks.allocate_at(0, 5).unwrap();
        assert_eq!(&[5, 10, 15, 20, 30, 40], blocks.as_slice());
    }

    #[test]
    fn allocate_at_past_end_is_rejected() {
        let mut blocks = filled(&[1]);
        assert_eq!(Err(BlockError::NoSuchElement { index: 2, len: 1 }), blocks.allocate_at(2, 9).map(|v| *v));
        assert_eq!(&[1], blocks.as_slice());
    }

    #[test]
    fn release_at_closes_the_hole() {
        let mut blocks = filled(&[10, 20, 30, 40, 50]);
        assert_eq!(Ok(30), blocks.release_at(2));
        assert_eq!(&[10, 20, 40, 50], blocks.as_slice());
        assert_eq!(Ok(10), blocks.release_at(0));
        assert_eq!(Ok(50), blocks.release_at(2));
        assert_eq!(&[20, 40], blocks.as_slice());
        assert_eq!(Err(BlockError::NoSuchElement { index: 2, len: 2 }), blocks.release_at(2));
    }

    #[test]
    fn release_last_removes_trailing_block() {
        let mut blocks = filled(&[1, 2]);
        assert_eq!(Some(2), blocks.release_last());
        assert_eq!(Some(1), blocks.release_last());
        assert_eq!(None, blocks.release_last());
        assert_eq!(INIT_CAPACITY, blocks.capacity());
    }

    #[test]
    fn live_count_follows_inserts_and_removes() {
        let mut blocks = CompactBlockManager::new().unwrap();
        let mut expected = 0usize;
        for i in 0..40 {
            blocks.allocate_at(i / 2, i).unwrap();
            expected += 1;
            if i % 3 == 0 {
                blocks.release_at(0).unwrap();
                expected -= 1;
            }
            assert_eq!(expected, blocks.live_block_count());
            assert_eq!(expected, blocks.len());
        }
    }

    #[test]
    fn change_capacity_preserves_values() {
        let mut blocks = filled(&[1, 2, 3]);
        blocks.change_capacity(100).unwrap();
        assert_eq!(100, blocks.capacity());
        assert_eq!(&[1, 2, 3], blocks.as_slice());
    }

    #[test]
    fn change_capacity_truncates_and_drops_trailing_blocks() {
        let flag = new_flag();
        let mut blocks = CompactBlockManager::new().unwrap();
        for i in 0..6 {
            blocks.allocate(Tracked::new(i, &flag)).unwrap();
        }
        blocks.change_capacity(2).unwrap();
        assert_eq!(4, flag.get());
        assert_eq!(2, blocks.len());
        assert_eq!(2, blocks.capacity());
        assert_eq!(vec![0, 1], blocks.iter().map(|t| t.value).collect::<Vec<_>>());
    }

    #[test]
    fn change_capacity_to_same_value_is_a_no_op() {
        let mut blocks = filled(&[1, 2, 3, 4, 5]);
        blocks.change_capacity(16).unwrap();
        let region = blocks.as_slice().as_ptr();
        blocks.change_capacity(16).unwrap();
        assert_eq!(region, blocks.as_slice().as_ptr());
        assert_eq!(16, blocks.capacity());
        assert_eq!(&[1, 2, 3, 4, 5], blocks.as_slice());
    }

    #[test]
    fn oversized_region_is_reported_and_leaves_manager_intact() {
        let mut blocks = filled(&[1, 2]);
        assert_eq!(Err(BlockError::CapacityOverflow { requested: usize::MAX }), blocks.change_capacity(usize::MAX));
        assert_eq!(&[1, 2], blocks.as_slice());
        assert_eq!(INIT_CAPACITY, blocks.capacity());
        assert!(CompactBlockManager::<u64>::with_capacity(usize::MAX).is_err());
    }

    #[test]
    fn failed_allocation_reports_layout_and_leaves_manager_intact() {
        let mut blocks = CompactBlockManager::<u64>::new().unwrap();
        blocks.allocate(1).unwrap();
        let requested = isize::MAX as usize / 8;
        match blocks.change_capacity(requested) {
            Err(BlockError::AllocationFailed { layout }) => assert_eq!(requested * 8, layout.size()),
            other => panic!("expected allocation failure, got {:?}", other),
        }
        assert_eq!(&[1], blocks.as_slice());
        assert_eq!(INIT_CAPACITY, blocks.capacity());
        blocks.allocate(2).unwrap();
        assert_eq!(&[1, 2], blocks.as_slice());
    }

    #[test]
    fn truncation_survives_a_panicking_drop() {
        let flag = new_flag();
        let mut blocks = CompactBlockManager::new().unwrap();
        for i in 0..4 {
            blocks.allocate(Exploding::new(i == 2, &flag)).unwrap();
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| blocks.change_capacity(1)));
        assert!(result.is_err());
        // the other trailing blocks are still dropped
        assert_eq!(3, flag.get());
        assert_eq!(1, blocks.len());
        assert_eq!(1, blocks.capacity());
        assert!(!blocks.block_at(0).panics);
        blocks.allocate(Exploding::new(false, &flag)).unwrap();
        assert_eq!(2, blocks.len());
        drop(blocks);
        assert_eq!(5, flag.get());
    }

    #[test]
    fn drop_survives_a_panicking_block() {
        let flag = new_flag();
        let mut blocks = CompactBlockManager::new().unwrap();
        for i in 0..3 {
            blocks.allocate(Exploding::new(i == 0, &flag)).unwrap();
        }
        let result = panic::catch_unwind(AssertUnwindSafe(move || drop(blocks)));
        assert!(result.is_err());
        assert_eq!(3, flag.get());
    }

    #[test]
    fn shrink_to_fit_never_goes_below_default() {
        let mut blocks = CompactBlockManager::<i32>::with_capacity(64).unwrap();
        blocks.shrink_to_fit().unwrap();
        assert_eq!(INIT_CAPACITY, blocks.capacity());

        let mut blocks = filled(&(0..9).collect::<Vec<_>>());
        assert_eq!(16, blocks.capacity());
        blocks.shrink_to_fit().unwrap();
        assert_eq!(9, blocks.capacity());
        blocks.clear();
        blocks.shrink_to_fit().unwrap();
        assert_eq!(INIT_CAPACITY, blocks.capacity());
    }

    #[test]
    fn clear_keeps_capacity_and_drops_blocks() {
        let flag = new_flag();
        let mut blocks = CompactBlockManager::new().unwrap();
        for i in 0..5 {
            blocks.allocate(Tracked::new(i, &flag)).unwrap();
        }
        let capacity = blocks.capacity();
        blocks.clear();
        assert_eq!(5, flag.get());
        assert_eq!(0, blocks.len());
        assert_eq!(capacity, blocks.capacity());
    }

    #[test]
    fn every_block_is_dropped_exactly_once() {
        let flag = new_flag();
        {
            let mut blocks = CompactBlockManager::new().unwrap();
            for i in 0..20 {
                blocks.allocate_at(0, Tracked::new(i, &flag)).unwrap();
            }
            let removed = blocks.release_at(3).unwrap();
            assert_eq!(16, removed.value);
            assert_eq!(0, flag.get());
            std::mem::drop(removed);
            assert_eq!(1, flag.get());
            blocks.shrink_to_fit().unwrap();
            assert_eq!(1, flag.get());
        }
        assert_eq!(20, flag.get());
    }

    #[test]
    fn index_of_recovers_position_of_live_blocks() {
        let blocks = filled(&[7, 8, 9]);
        let other = filled(&[7, 8, 9]);
        assert_eq!(Some(2), blocks.index_of(blocks.block_at(2)));
        assert_eq!(Some(0), blocks.index_of(&blocks.as_slice()[0]));
        assert_eq!(None, blocks.index_of(other.block_at(1)));
        assert!(!blocks.contains(&8));
        assert!(blocks.contains(blocks.block_at(1)));
    }

    #[test]
    fn swap_exchanges_values() {
        let mut blocks = filled(&[1, 2, 3]);
        blocks.swap(0, 2);
        assert_eq!(&[3, 2, 1], blocks.as_slice());
        *blocks.block_at_mut(1) = 20;
        assert_eq!(20, *blocks.block_at(1));
    }

    #[test]
    #[should_panic]
    fn block_at_out_of_range_panics() {
        let blocks = filled(&[1]);
        blocks.block_at(1);
    }

    #[test]
    fn clone_copies_only_the_live_run() {
        let source = filled(&[10, 20, 30, 40, 50]);
        assert_eq!(8, source.capacity());
        let mut copy = source.clone();
        assert_eq!(5, copy.capacity());
        assert_eq!(source, copy);
        copy.release_at(0).unwrap();
        *copy.block_at_mut(0) = 0;
        assert_eq!(&[10, 20, 30, 40, 50], source.as_slice());
        assert_ne!(source, copy);
    }

    #[test]
    fn assign_replaces_contents() {
        let source = filled(&[1, 2, 3]);
        let mut target = filled(&[9, 9, 9, 9, 9, 9]);
        target.assign(&source).unwrap();
        assert_eq!(source, target);
        assert_eq!(3, target.capacity());
    }

    #[test]
    fn equality_needs_same_count_and_values() {
        assert_eq!(filled(&[1, 2]), filled(&[1, 2]));
        assert_ne!(filled(&[1, 2]), filled(&[1, 2, 3]));
        assert_ne!(filled(&[1, 2]), filled(&[2, 1]));
        let mut roomy = CompactBlockManager::with_capacity(32).unwrap();
        roomy.allocate(1).unwrap();
        roomy.allocate(2).unwrap();
        assert_eq!(filled(&[1, 2]), roomy);
    }

    #[test]
    fn handles_address_blocks_through_the_contract() {
        let mut blocks = CompactBlockManager::new().unwrap();
        let first = blocks.allocate(String::from("a")).unwrap();
        let second = blocks.allocate_default().unwrap();
        blocks.block_mut(&second).unwrap().push('b');
        assert_eq!(Some(&String::from("a")), blocks.block(&first));
        assert_eq!(2, blocks.live_block_count());
        assert_eq!(Ok(String::from("b")), blocks.release(second));
        assert_eq!(Ok(String::from("a")), blocks.release(first));
        assert!(BlockManager::is_empty(&blocks));
    }

    #[test]
    fn handles_are_refused_once_blocks_move() {
        let mut blocks = CompactBlockManager::new().unwrap();
        let a = blocks.allocate('a').unwrap();
        let b = blocks.allocate('b').unwrap();
        let c = blocks.allocate('c').unwrap();
        assert_eq!(Ok('a'), blocks.release(a));
        assert_eq!(None, blocks.block(&c));
        assert_eq!(None, blocks.block_mut(&c));
        assert_eq!(Err(BlockError::StaleHandle { index: 1 }), blocks.release(b));
        assert_eq!(&['b', 'c'], blocks.as_slice());
    }

    #[test]
    fn appending_keeps_handles_valid() {
        let mut blocks = CompactBlockManager::new().unwrap();
        let first = blocks.allocate(1).unwrap();
        for v in 2..10 {
            blocks.allocate(v).unwrap();
        }
        assert_eq!(Some(&1), blocks.block(&first));
        blocks.allocate_at(0, 0).unwrap();
        assert_eq!(None, blocks.block(&first));
        let fresh = blocks.allocate(10).unwrap();
        blocks.release_at(3).unwrap();
        assert_eq!(Err(BlockError::StaleHandle { index: 10 }), blocks.release(fresh));
    }

    #[test]
    fn zero_sized_blocks_are_counted() {
        let mut blocks = CompactBlockManager::new().unwrap();
        for _ in 0..10 {
            blocks.allocate(()).unwrap();
        }
        assert_eq!(10, blocks.len());
        assert_eq!(None, blocks.index_of(&()));
        blocks.release_at(4).unwrap();
        assert_eq!(9, blocks.len());
    }

    #[test]
    fn debug_lists_live_blocks() {
        let blocks = filled(&[1, 2]);
        assert_eq!("CompactBlockManager { len: 2, capacity: 4, block_size: 4, blocks: [1, 2] }", format!("{:?}", blocks));
    }

    #[test]
    fn can_be_shared_behind_a_lock() {
        let blocks = std::sync::Arc::new(std::sync::Mutex::new(filled(&[1])));
        let other = blocks.clone();
        std::thread::spawn(move || {
            other.lock().unwrap().allocate(2).unwrap();
        }).join().unwrap();
        assert_eq!(&[1, 2], blocks.lock().unwrap().as_slice());
    }
}
