//! A fixed-footprint, multi-queue byte buffer manager for embedded systems.
//!
//! This crate provides [`QueuePool`], a type that manages up to 64
//! independent FIFO byte queues inside a single statically sized 2048-byte
//! region. There is no heap beyond that region: queues grow and shrink by
//! claiming and releasing 8-byte blocks from a shared pool, and a queue
//! handle is only 2 bytes.
//!
//! # Usage
//! Place a [`QueuePool`] in a `static` and hand out handles from it:
//! ```
//! use queuepool::QueuePool;
//!
//! fn on_out_of_memory() -> ! {
//!     panic!("queue pool exhausted")
//! }
//! fn on_illegal_operation() -> ! {
//!     panic!("illegal queue operation")
//! }
//!
//! static POOL: QueuePool = QueuePool::new(on_out_of_memory, on_illegal_operation);
//!
//! let q = POOL.create_queue();
//! POOL.enqueue_byte(q, 0x41);
//! assert_eq!(POOL.dequeue_byte(q), 0x41);
//! POOL.destroy_queue(q);
//! ```
//!
//! # Implementation
//! The region is split into four fixed ranges: a slot bitmap, a free-block
//! head index plus an init sentinel, a 64-slot queue table (2 bytes per
//! slot), and a 238-block pool (8 bytes per block: 7 payload bytes and one
//! multi-role metadata byte). A queue's bytes live in a singly-linked chain
//! of blocks; the head and tail cursor for the chain are packed into the
//! *tail* block's metadata byte rather than stored in the queue descriptor,
//! which is what keeps the descriptor at 2 bytes.
//!
//! Misuse (dequeuing an empty queue, passing a stale or forged handle) and
//! resource exhaustion (all slots taken, no free blocks) are both fatal and
//! non-returning, resolved through the two `fn() -> !` collaborators passed
//! to [`QueuePool::new`] — there is no local recovery and no error return
//! value from the four operations themselves.
#![cfg_attr(not(test), no_std)]

mod bitmap;
mod block;
mod pool;
mod queue;
mod region;

pub use pool::{FaultFn, QueuePool};
pub use queue::QueueHandle;
