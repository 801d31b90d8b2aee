//! Cluster traversal: flooding from a site over present bonds, in either
//! enumerate-all or stop-when-target-found mode.

use crate::config::Configuration;
use crate::geometry::Lattice;

/// Reusable flood-fill scratch space, owned by the update kernel and passed
/// by mutable reference into every traversal call so that the visited-set
/// and frontier buffers are never reallocated mid-run.
///
/// Visited sites are tagged with the current `epoch` rather than cleared
/// between calls — clearing a `Vec<bool>` the size of the lattice before
/// every one of the up-to-`V` bond-toggle attempts per sweep would itself be
/// an `O(V)` tax independent of how large the actual component turns out to
/// be.
pub struct Scratch {
    epoch_of: Vec<u32>,
    epoch: u32,
    stack: Vec<usize>,
}

impl Scratch {
    /// Allocates scratch space sized for a lattice of `volume` sites.
    #[must_use]
    pub fn new(volume: usize) -> Self {
        Self {
            epoch_of: vec![0; volume],
            epoch: 0,
            stack: Vec::new(),
        }
    }

    fn begin(&mut self) {
        self.epoch += 1;
        self.stack.clear();
    }

    fn visit(&mut self, site: usize) -> bool {
        if self.epoch_of[site] == self.epoch {
            false
        } else {
            self.epoch_of[site] = self.epoch;
            true
        }
    }
}

/// Present-bond neighbors of `site`: for every dimension `d`, the forward
/// neighbor is reachable iff `b[site, d]`, and the backward neighbor is
/// reachable iff `b[backward_neighbor, d]` (bonds are stored on their
/// forward side only).
fn bonded_neighbors<'a>(
    lattice: &'a Lattice,
    cfg: &'a Configuration,
    site: usize,
) -> impl Iterator<Item = usize> + 'a {
    let dim = lattice.dim();
    (0..dim).filter_map(move |d| {
        let forward = lattice.step(site, d);
        cfg.bond(site, d).then_some(forward)
    })
    .chain((0..dim).filter_map(move |d| {
        let backward = lattice.step(site, dim + d);
        cfg.bond(backward, d).then_some(backward)
    }))
}

/// Floods from `start` over present bonds, visiting each reachable site at
/// most once, and returns the full component membership.
pub fn enumerate(lattice: &Lattice, cfg: &Configuration, scratch: &mut Scratch, start: usize) -> Vec<usize> {
    scratch.begin();
    let mut members = Vec::new();
    scratch.visit(start);
    scratch.stack.push(start);
    members.push(start);
    while let Some(site) = scratch.stack.pop() {
        for neighbor in bonded_neighbors(lattice, cfg, site).collect::<Vec<_>>() {
            if scratch.visit(neighbor) {
                scratch.stack.push(neighbor);
                members.push(neighbor);
            }
        }
    }
    members
}

/// Outcome of a [`connected`] query.
pub enum Connectivity {
    /// `start` and `target` are in the same component; no enumeration was
    /// needed because the search exited early at `target`.
    Connected,
    /// `start` and `target` are in different components. Carries the full
    /// enumeration of `start`'s component, since the caller (the bond-toggle
    /// move, on a split) needs it regardless.
    Disconnected(Vec<usize>),
}

/// Floods from `start` over present bonds, exiting as soon as `target` is
/// reached. If the flood exhausts the component without finding `target`,
/// returns the full enumeration (the caller needs it to decide the split).
pub fn connected(
    lattice: &Lattice,
    cfg: &Configuration,
    scratch: &mut Scratch,
    start: usize,
    target: usize,
) -> Connectivity {
    if start == target {
        return Connectivity::Connected;
    }
    scratch.begin();
    let mut members = Vec::new();
    scratch.visit(start);
    scratch.stack.push(start);
    members.push(start);
    while let Some(site) = scratch.stack.pop() {
        for neighbor in bonded_neighbors(lattice, cfg, site).collect::<Vec<_>>() {
            if neighbor == target {
                return Connectivity::Connected;
            }
            if scratch.visit(neighbor) {
                scratch.stack.push(neighbor);
                members.push(neighbor);
            }
        }
    }
    Connectivity::Disconnected(members)
}
