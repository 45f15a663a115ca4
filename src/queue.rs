//! Queue handles, descriptors and the handle validator (§4.4, §10.2).

use crate::bitmap::is_slot_set;
use crate::region::{Region, NONE_INDEX, NUM_SLOTS};

/// An opaque, caller-visible identifier for a queue.
///
/// Wraps the queue's slot index (not a raw pointer), per the design note in
/// §9: a well-typed `QueueHandle` obtained from [`crate::pool::QueuePool::create_queue`]
/// is always in range and can't alias descriptor bytes the way a raw pointer
/// could. It is exactly 2 bytes, matching the spec's handle-size budget.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct QueueHandle(u16);

impl QueueHandle {
    pub(crate) fn new(slot: u8) -> Self {
        Self(u16::from(slot))
    }

    fn raw_index(self) -> u16 {
        self.0
    }

    /// Build a handle from an arbitrary raw index, bypassing the normal
    /// `create_queue` path. Used only by tests to construct the
    /// out-of-range / stale handles that §4.4 and scenario S7 describe; a
    /// handle built this way is not guaranteed to be valid.
    #[cfg(test)]
    pub(crate) fn from_raw_index(index: u16) -> Self {
        Self(index)
    }
}

/// The 2-byte queue descriptor: `head_block_index`, `tail_block_index`.
/// Both are `NONE_INDEX` when the queue is empty.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct QueueDescriptor {
    pub head: u8,
    pub tail: u8,
}

impl QueueDescriptor {
    pub const EMPTY: Self = Self {
        head: NONE_INDEX,
        tail: NONE_INDEX,
    };

    pub fn is_empty(self) -> bool {
        self.head == NONE_INDEX
    }
}

/// Why a handle failed validation. Never surfaced to callers directly — the
/// one caller, [`crate::pool::QueuePool`], always resolves any variant into
/// the fatal `on_illegal_operation` call (§4.4, §7).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ValidationError {
    /// The region hasn't been initialized yet (check 1 of §4.4).
    Uninitialized,
    /// The handle's slot index is outside `[0, NUM_SLOTS)` — collapses
    /// checks 2-4 of §4.4.
    OutOfRange,
    /// The slot index is in range, but its bitmap bit isn't set (check 5).
    NotAllocated,
}

/// Validate `handle` against `region`, returning its slot index on success.
pub(crate) fn validate(region: &Region, handle: QueueHandle) -> Result<u8, ValidationError> {
    if !region.is_initialized() {
        return Err(ValidationError::Uninitialized);
    }
    let index = handle.raw_index();
    if index as usize >= NUM_SLOTS {
        return Err(ValidationError::OutOfRange);
    }
    let slot = index as u8;
    if !is_slot_set(region, slot) {
        return Err(ValidationError::NotAllocated);
    }
    Ok(slot)
}

pub(crate) fn read_descriptor(region: &Region, slot: u8) -> QueueDescriptor {
    let (head, tail) = region.descriptor(slot);
    QueueDescriptor { head, tail }
}

pub(crate) fn write_descriptor(region: &mut Region, slot: u8, descriptor: QueueDescriptor) {
    region.set_descriptor(slot, descriptor.head, descriptor.tail);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::mark_slot;

    #[test]
    fn handle_is_two_bytes() {
        assert_eq!(core::mem::size_of::<QueueHandle>(), 2);
    }

    #[test]
    fn validate_rejects_uninitialized_region() {
        let region = Region::new();
        let handle = QueueHandle::new(0);
        assert_eq!(validate(&region, handle), Err(ValidationError::Uninitialized));
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut region = Region::new();
        region.ensure_init();
        let handle = QueueHandle::from_raw_index(200);
        assert_eq!(validate(&region, handle), Err(ValidationError::OutOfRange));
    }

    #[test]
    fn validate_rejects_unallocated_slot() {
        let mut region = Region::new();
        region.ensure_init();
        let handle = QueueHandle::new(0);
        assert_eq!(validate(&region, handle), Err(ValidationError::NotAllocated));
    }

    #[test]
    fn validate_accepts_allocated_slot() {
        let mut region = Region::new();
        region.ensure_init();
        mark_slot(&mut region, 3);
        let handle = QueueHandle::new(3);
        assert_eq!(validate(&region, handle), Ok(3));
    }

    #[test]
    fn fresh_descriptor_round_trips_as_empty() {
        let mut region = Region::new();
        region.ensure_init();
        write_descriptor(&mut region, 0, QueueDescriptor::EMPTY);
        assert!(read_descriptor(&region, 0).is_empty());
    }
}
