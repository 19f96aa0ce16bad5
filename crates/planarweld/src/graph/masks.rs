//! Reusable per-node tag bits (mask pool).
//!
//! Purpose
//! - The welding passes need to tag nodes (visited, slated for deletion,
//!   member of a null face) without allocating side tables. Every node owns a
//!   small mask word; algorithms borrow one bit at a time from a pool.
//!
//! Why this design
//! - `MaskGuard` ties the borrow to a scope: the bit returns to the pool on
//!   drop, so an early return cannot leak it. The pool is thread-local, which
//!   keeps `grab` free of any `&mut Graph` borrow and lets independent graphs
//!   on different threads proceed without contention.
//! - Grabbed bits are not guaranteed clear. Callers clear before first use
//!   (grab, then `clear_mask_in_graph`), which is cheaper than clearing on
//!   every return.
//!
//! At most three bits are live at once in the welding pipeline; the pool
//! holds 16, so exhaustion only signals a caller leak or runaway nesting.

use std::cell::Cell;
use std::ops::Deref;

use super::types::NodeId;
use super::Graph;

/// One reusable per-node tag bit. Obtained via [`MaskGuard::grab`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeMask(pub(crate) u32);

/// Number of grabbable bits in the per-thread pool.
const POOL_BITS: u32 = 16;

thread_local! {
    static FREE_BITS: Cell<u32> = Cell::new((1u32 << POOL_BITS) - 1);
}

/// Scoped handle on one pool bit; the bit returns to the pool on drop.
///
/// Derefs to the [`NodeMask`] it holds, which is `Copy` and is what the graph
/// mask operations take.
#[derive(Debug)]
pub struct MaskGuard {
    bit: NodeMask,
}

impl MaskGuard {
    /// Take a bit not currently in use on this thread.
    ///
    /// Panics when all 16 bits are live; that is a caller error (a leaked
    /// guard or deeply nested passes), never a data-dependent condition.
    pub fn grab() -> MaskGuard {
        FREE_BITS.with(|free| {
            let avail = free.get();
            assert!(avail != 0, "mask pool exhausted: 16 bits already live");
            let low = avail & avail.wrapping_neg();
            free.set(avail & !low);
            MaskGuard {
                bit: NodeMask(low),
            }
        })
    }

    /// The held bit.
    #[inline]
    pub fn mask(&self) -> NodeMask {
        self.bit
    }
}

impl Drop for MaskGuard {
    fn drop(&mut self) {
        FREE_BITS.with(|free| free.set(free.get() | self.bit.0));
    }
}

impl Deref for MaskGuard {
    type Target = NodeMask;
    #[inline]
    fn deref(&self) -> &NodeMask {
        &self.bit
    }
}

/// Per-node mask operations.
impl Graph {
    /// Set `mask` on one node.
    #[inline]
    pub fn set_mask(&mut self, n: NodeId, mask: NodeMask) {
        self.node_mut(n).mask |= mask.0;
    }

    /// Clear `mask` on one node.
    #[inline]
    pub fn clear_mask(&mut self, n: NodeId, mask: NodeMask) {
        self.node_mut(n).mask &= !mask.0;
    }

    /// Test `mask` on one node.
    #[inline]
    pub fn test_mask(&self, n: NodeId, mask: NodeMask) -> bool {
        self.node(n).mask & mask.0 != 0
    }

    /// Set `mask` on every node of `n`'s vertex ring.
    pub fn set_mask_around_vertex(&mut self, n: NodeId, mask: NodeMask) {
        let mut cur = n;
        loop {
            self.node_mut(cur).mask |= mask.0;
            cur = self.node(cur).vnext;
            if cur == n {
                break;
            }
        }
    }

    /// Set `mask` on both ends of `n`'s edge.
    #[inline]
    pub fn set_mask_on_edge(&mut self, n: NodeId, mask: NodeMask) {
        let m = self.mate(n);
        self.set_mask(n, mask);
        self.set_mask(m, mask);
    }

    /// Count nodes of `n`'s vertex ring carrying `mask`.
    pub fn count_mask_around_vertex(&self, n: NodeId, mask: NodeMask) -> usize {
        let mut count = 0;
        let mut cur = n;
        loop {
            if self.test_mask(cur, mask) {
                count += 1;
            }
            cur = self.node(cur).vnext;
            if cur == n {
                break;
            }
        }
        count
    }

    /// Clear `mask` on every live node. Call right after grabbing a bit.
    pub fn clear_mask_in_graph(&mut self, mask: NodeMask) {
        for slot in 0..self.slot_count() {
            if self.nodes[slot].live {
                self.nodes[slot].mask &= !mask.0;
            }
        }
    }
}
