//! Union-find over the lattice's cluster partition.
//!
//! Operates directly on a `root` slice owned by [`crate::config::Configuration`]
//! rather than on a standalone struct, since every caller already holds a
//! `&mut` borrow of the configuration and a second owning type would just
//! add an indirection.

/// Follows `root` until a fixed point and returns it, compressing every
/// visited link to point straight at that fixed point. Path compression is
/// a pure optimization — it does not change which sites end up sharing a
/// root, so it cannot affect the Markov chain.
pub fn find(root: &mut [usize], i: usize) -> usize {
    let mut r = i;
    while root[r] != r {
        r = root[r];
    }
    let mut cur = i;
    while root[cur] != r {
        let next = root[cur];
        root[cur] = r;
        cur = next;
    }
    r
}

/// Merges the clusters containing `i` and `j`, called only when adding a
/// bond between sites already known to be in different clusters. The root
/// of `i`'s cluster wins; this is an arbitrary but fixed convention that
/// every caller must agree on.
pub fn union(root: &mut [usize], i: usize, j: usize) {
    let ri = find(root, i);
    let rj = find(root, j);
    if ri != rj {
        root[rj] = ri;
    }
}
