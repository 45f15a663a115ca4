//! The public [`QueuePool`] API (§4.5, §4.6, §4.7, §10.3).

use spin::Mutex;

use crate::bitmap::{clear_slot, find_free_slot, mark_slot};
use crate::block::{alloc_block, free_block, pack_offsets, unpack_offsets};
use crate::queue::{read_descriptor, validate, write_descriptor, QueueDescriptor, QueueHandle};
use crate::region::{Region, NONE_INDEX};

/// A fatal collaborator: called when an operation cannot complete. Per §1
/// and §7, it must not return — whether it unwinds or terminates is the
/// host's choice, expressed by whatever the function pointer actually does.
pub type FaultFn = fn() -> !;

/// A fixed-footprint manager for up to 64 independent FIFO byte queues
/// sharing a single 2048-byte region (§1, §3).
///
/// `QueuePool` is the crate's single public type: a `const fn`-constructible
/// value meant to live in a `static`, whose `&self` methods reach into an
/// owned region through a spinlock-guarded interior-mutability cell. The
/// region size and slot/block counts are not generic parameters — they are
/// exactly the constants fixed in [`crate::region`] (§10.6).
pub struct QueuePool {
    region: Mutex<Region>,
    on_out_of_memory: FaultFn,
    on_illegal_operation: FaultFn,
}

impl QueuePool {
    /// Create a new, uninitialized pool with the given fatal collaborators.
    ///
    /// This is a `const fn`, so a `QueuePool` can be placed directly in a
    /// `static`.
    #[must_use = "bind this to a static or local to actually use the pool"]
    pub const fn new(on_out_of_memory: FaultFn, on_illegal_operation: FaultFn) -> Self {
        Self {
            region: Mutex::new(Region::new()),
            on_out_of_memory,
            on_illegal_operation,
        }
    }

    /// Create a pool whose fatal collaborators panic, for hosted (`std`)
    /// use: tests, fuzzing, or any context where panicking is an acceptable
    /// stand-in for a hardware fault trap (§10.3).
    pub fn with_default_handlers() -> Self {
        fn out_of_memory() -> ! {
            panic!("queue pool out of memory")
        }
        fn illegal_operation() -> ! {
            panic!("illegal queue operation")
        }
        Self::new(out_of_memory, illegal_operation)
    }

    /// Validate `handle` against `region`, invoking the illegal-operation
    /// fault on any failure (§4.4).
    fn validate_or_fault(&self, region: &Region, handle: QueueHandle) -> u8 {
        match validate(region, handle) {
            Ok(slot) => slot,
            Err(_) => (self.on_illegal_operation)(),
        }
    }

    /// Create a new, empty queue (§4.5).
    ///
    /// Initializes the region on first use. Invokes the out-of-memory fault
    /// if all 64 slots are already allocated.
    pub fn create_queue(&self) -> QueueHandle {
        let mut region = self.region.lock();
        region.ensure_init();

        let slot = match find_free_slot(&region) {
            Some(slot) => slot,
            None => (self.on_out_of_memory)(),
        };
        mark_slot(&mut region, slot);
        write_descriptor(&mut region, slot, QueueDescriptor::EMPTY);
        QueueHandle::new(slot)
    }

    /// Destroy `handle`, returning every block in its chain to the free list
    /// and releasing its slot (§4.5).
    pub fn destroy_queue(&self, handle: QueueHandle) {
        let mut region = self.region.lock();
        let slot = self.validate_or_fault(&region, handle);
        let descriptor = read_descriptor(&region, slot);

        let mut current = descriptor.head;
        while current != NONE_INDEX {
            let is_tail = current == descriptor.tail;
            let next = if is_tail {
                NONE_INDEX
            } else {
                region.block_meta(current)
            };
            free_block(&mut region, current);
            current = next;
        }

        write_descriptor(&mut region, slot, QueueDescriptor::EMPTY);
        clear_slot(&mut region, slot);
    }

    /// Append `byte` to `handle`'s queue (§4.6).
    ///
    /// Invokes the out-of-memory fault if the block pool is exhausted.
    pub fn enqueue_byte(&self, handle: QueueHandle, byte: u8) {
        let mut region = self.region.lock();
        let slot = self.validate_or_fault(&region, handle);
        let mut descriptor = read_descriptor(&region, slot);

        if descriptor.is_empty() {
            let block = match alloc_block(&mut region) {
                Some(block) => block,
                None => (self.on_out_of_memory)(),
            };
            region.set_block_payload_byte(block, 0, byte);
            region.set_block_meta(block, pack_offsets(0, 1));
            descriptor.head = block;
            descriptor.tail = block;
            write_descriptor(&mut region, slot, descriptor);
            return;
        }

        let tail = descriptor.tail;
        let (head_off, tail_off) = unpack_offsets(region.block_meta(tail));

        if tail_off < 7 {
            region.set_block_payload_byte(tail, tail_off, byte);
            region.set_block_meta(tail, pack_offsets(head_off, tail_off + 1));
            return;
        }

        // Tail block is full: grow the chain. `head_off` lives only in the
        // old tail's metadata, so it must be captured (done above) before
        // that byte is overwritten with the new-block next-pointer below.
        let new_block = match alloc_block(&mut region) {
            Some(block) => block,
            None => (self.on_out_of_memory)(),
        };
        region.set_block_meta(tail, new_block);
        region.set_block_payload_byte(new_block, 0, byte);
        region.set_block_meta(new_block, pack_offsets(head_off, 1));
        descriptor.tail = new_block;
        write_descriptor(&mut region, slot, descriptor);
    }

    /// Remove and return the oldest byte from `handle`'s queue (§4.7).
    ///
    /// Invokes the illegal-operation fault if the queue is empty.
    pub fn dequeue_byte(&self, handle: QueueHandle) -> u8 {
        let mut region = self.region.lock();
        let slot = self.validate_or_fault(&region, handle);
        let mut descriptor = read_descriptor(&region, slot);

        if descriptor.is_empty() {
            (self.on_illegal_operation)();
        }

        let head = descriptor.head;
        let tail = descriptor.tail;
        let (head_off, tail_off) = unpack_offsets(region.block_meta(tail));
        let result = region.block_payload_byte(head, head_off);
        let new_head_off = head_off + 1;

        if new_head_off == 7 {
            if head == tail {
                free_block(&mut region, head);
                descriptor = QueueDescriptor::EMPTY;
            } else {
                let next = region.block_meta(head);
                free_block(&mut region, head);
                descriptor.head = next;
                region.set_block_meta(tail, pack_offsets(0, tail_off));
            }
        } else {
            region.set_block_meta(tail, pack_offsets(new_head_off, tail_off));
            // Empty-collapse: collapse happens *during* this dequeue, not
            // deferred to the next call (§9, open question).
            if head == tail && new_head_off == tail_off {
                free_block(&mut region, head);
                descriptor = QueueDescriptor::EMPTY;
            }
        }

        write_descriptor(&mut region, slot, descriptor);
        result
    }
}
