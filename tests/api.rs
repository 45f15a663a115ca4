use queuepool::QueuePool;

fn on_out_of_memory() -> ! {
    panic!("out of memory")
}
fn on_illegal_operation() -> ! {
    panic!("illegal operation")
}

#[test]
fn is_usable_in_const_contexts() {
    const _POOL1: QueuePool = QueuePool::new(on_out_of_memory, on_illegal_operation);
    static _POOL2: QueuePool = QueuePool::new(on_out_of_memory, on_illegal_operation);
}

#[test]
fn handle_is_two_bytes() {
    assert_eq!(core::mem::size_of::<queuepool::QueueHandle>(), 2);
}

#[test]
fn handle_is_copy_and_eq() {
    fn assert_copy_eq<T: Copy + Eq>() {}
    assert_copy_eq::<queuepool::QueueHandle>();
}

#[test]
fn default_handlers_panic_on_dequeue_of_empty_queue() {
    let pool = QueuePool::with_default_handlers();
    let q = pool.create_queue();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pool.dequeue_byte(q);
    }));
    assert!(result.is_err());
}
