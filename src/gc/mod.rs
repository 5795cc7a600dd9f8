//! Stop-the-world mark-sweep garbage collector.
//!
//! [`Heap`] owns every [`Value`](crate::object::Value) the evaluator ever allocates, addressed
//! by the opaque [`ObjHandle`] it hands back from [`Heap::alloc`]. Allocation increments a
//! counter; once it crosses [`Heap::DEFAULT_THRESHOLD`], the evaluator calls [`collect`] with
//! the current root set, which marks everything reachable and sweeps the rest.

mod heap;

pub use heap::{Heap, ObjHandle};

use crate::object::{Environment, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Mark everything reachable from `roots`, then sweep unreached, non-permanent objects.
/// Returns the number of objects freed.
pub fn collect(heap: &mut Heap, roots: &[Rc<RefCell<Environment>>]) -> usize {
    log::debug!("gc: starting collection, {} live objects", heap.live_count());

    for root in roots {
        mark_env(heap, root);
    }

    let freed = heap.sweep();
    heap.reset_allocation_counter();

    log::debug!("gc: collection done, freed {freed}, {} live objects remain", heap.live_count());
    freed
}

fn mark_env(heap: &mut Heap, env: &Rc<RefCell<Environment>>) {
    let borrowed = env.borrow();
    for &handle in borrowed.bindings() {
        mark_value(heap, handle);
    }
    if let Some(outer) = borrowed.outer() {
        let outer = outer.clone();
        drop(borrowed);
        mark_env(heap, &outer);
    }
}

/// Mark `handle` and recurse into whatever it references. Short-circuits if already marked, so
/// environments shared by mutually recursive closures terminate instead of looping forever.
fn mark_value(heap: &mut Heap, handle: ObjHandle) {
    if !heap.mark(handle) {
        return;
    }

    match heap.get(handle).clone() {
        Value::Array(elements) => {
            for element in elements {
                mark_value(heap, element);
            }
        }
        Value::Function(function) => mark_env(heap, &function.env),
        Value::ReturnValue(inner) => mark_value(heap, inner),
        Value::Integer(_)
        | Value::Boolean(_)
        | Value::Str(_)
        | Value::Null
        | Value::Builtin(_)
        | Value::Error(_) => {}
    }
}
