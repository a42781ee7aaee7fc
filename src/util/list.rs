//! Circular doubly linked list implementation.

use core::ptr::null_mut;

/// Double linked list. Embedded in the actual entry struct to give the entry struct
/// the linked list capability.
#[repr(C)]
pub struct List {
    pub prev: *mut List,
    pub next: *mut List,
}

impl List {
    /// Construct a node that is not linked into any list.
    #[inline(always)]
    pub const fn new_unlinked() -> Self {
        Self { prev: null_mut(), next: null_mut() }
    }

    /// Turn `self` into a single-node circular list (a fresh sentinel).
    ///
    /// # Safety
    ///
    /// `self` must not currently be linked into another list.
    #[inline]
    pub unsafe fn init_empty(list: *mut List) {
        (*list).prev = list;
        (*list).next = list;
    }

    /// `true` if `list` is an empty sentinel, i.e. it links only to itself.
    #[inline]
    pub unsafe fn is_empty(list: *mut List) -> bool {
        (*list).next == list
    }

    /// Insert `node` immediately after `list`.
    #[inline]
    pub unsafe fn insert_after(list: *mut List, node: *mut List) {
        let old_next = (*list).next;
        (*node).prev = list;
        (*node).next = old_next;
        (*old_next).prev = node;
        (*list).next = node;
    }

    /// Insert `node` immediately before `list`.
    #[inline]
    pub unsafe fn insert_before(list: *mut List, node: *mut List) {
        let old_prev = (*list).prev;
        (*node).next = list;
        (*node).prev = old_prev;
        (*old_prev).next = node;
        (*list).prev = node;
    }

    /// Unlink `node` from whatever list it is part of. `node` is left pointing at
    /// itself, i.e. it becomes an empty sentinel.
    #[inline]
    pub unsafe fn delete(node: *mut List) {
        let prev = (*node).prev;
        let next = (*node).next;
        (*prev).next = next;
        (*next).prev = prev;
        (*node).prev = node;
        (*node).next = node;
    }
}
