//! Schedules and scheduled memory accesses.
//!
//! A schedule maps a depth-`d` loop iteration to a lexicographic
//! timestamp through a `d x d` transform `Phi` and an interleaving
//! offset vector `omega` of length `2*d + 1` (even positions order
//! statements between loops, odd positions sit under each loop level).

use crate::linalg::{MatrixView, MatrixViewMut};
use crate::polyhedral::ArrayReference;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A statement schedule: `(Phi, omega)` packed into one buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    data: SmallVec<[i64; 16]>,
    num_loops: usize,
}

impl Schedule {
    /// The identity schedule for a nest of the given depth: `Phi = I`,
    /// `omega = 0`.
    pub fn new(num_loops: usize) -> Self {
        let mut data = SmallVec::new();
        data.resize(num_loops * num_loops + 2 * num_loops + 1, 0);
        let mut s = Self { data, num_loops };
        for i in 0..num_loops {
            let mut phi = s.phi_mut();
            phi.row_mut(i)[i] = 1;
        }
        s
    }

    /// Nest depth.
    pub fn num_loops(&self) -> usize {
        self.num_loops
    }

    /// The scheduling transform `Phi` as a `d x d` view.
    pub fn phi(&self) -> MatrixView<'_, i64> {
        let n = self.num_loops;
        MatrixView::new(&self.data[..n * n], n, n, n.max(1))
    }

    /// Mutable view of `Phi`.
    pub fn phi_mut(&mut self) -> MatrixViewMut<'_, i64> {
        let n = self.num_loops;
        MatrixViewMut::new(&mut self.data[..n * n], n, n, n.max(1))
    }

    /// The offset vector `omega`, length `2*d + 1`.
    pub fn omega(&self) -> &[i64] {
        &self.data[self.num_loops * self.num_loops..]
    }

    /// Mutable `omega`.
    pub fn omega_mut(&mut self) -> &mut [i64] {
        &mut self.data[self.num_loops * self.num_loops..]
    }

    /// Whether two schedules are fused through the first
    /// `num_loops_common` levels: their `omega` entries agree at every
    /// even position below that depth.
    pub fn fused_through(&self, other: &Schedule, num_loops_common: usize) -> bool {
        let o0 = self.omega();
        let o1 = other.omega();
        (0..num_loops_common).all(|n| o0[2 * n] == o1[2 * n])
    }

    /// [`Schedule::fused_through`] at the common depth of the two
    /// schedules.
    pub fn fused_through_common(&self, other: &Schedule) -> bool {
        self.fused_through(other, self.num_loops.min(other.num_loops))
    }
}

/// A scheduled memory access: a node of the dependence graph. Edge
/// construction happens outside the kernel; the edge lists are plain
/// indices into the caller's access table.
#[derive(Debug, Clone)]
pub struct MemoryAccess {
    /// The array reference being accessed.
    pub reference: ArrayReference,
    /// Whether this access is a load (else a store).
    pub is_load: bool,
    /// The access's schedule.
    pub schedule: Schedule,
    edges_in: Vec<u32>,
    edges_out: Vec<u32>,
}

impl MemoryAccess {
    /// A new access with empty edge lists.
    pub fn new(reference: ArrayReference, is_load: bool, schedule: Schedule) -> Self {
        Self {
            reference,
            is_load,
            schedule,
            edges_in: Vec::new(),
            edges_out: Vec::new(),
        }
    }

    /// Record an incoming dependence edge.
    pub fn add_edge_in(&mut self, i: u32) {
        self.edges_in.push(i);
    }

    /// Record an outgoing dependence edge.
    pub fn add_edge_out(&mut self, i: u32) {
        self.edges_out.push(i);
    }

    /// Incoming dependence edges.
    pub fn edges_in(&self) -> &[u32] {
        &self.edges_in
    }

    /// Outgoing dependence edges.
    pub fn edges_out(&self) -> &[u32] {
        &self.edges_out
    }

    /// Whether this access and another run fused at their common depth.
    pub fn fused_through(&self, other: &MemoryAccess) -> bool {
        self.schedule.fused_through_common(&other.schedule)
    }

    /// Nest depth of the schedule.
    pub fn num_loops(&self) -> usize {
        self.schedule.num_loops()
    }
}
