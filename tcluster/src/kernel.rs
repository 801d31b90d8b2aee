//! Update kernel: the three move types and the sweep that composes them,
//! plus the acceptance-probability constants they share.

use crate::cluster::{self, Connectivity, Scratch};
use crate::config::Configuration;
use crate::geometry::Lattice;
use crate::rng::Stream;

/// Precomputed acceptance-probability constants, derived once per run from
/// the coupling `gamma` and never recomputed inside the sweep loop.
#[derive(Debug, Clone, Copy)]
pub struct Constants {
    /// `q = exp(-gamma)`, also the Metropolis factor for a no-op bond
    /// removal.
    pub q: f64,
    /// Probability of adding a bond that closes a loop within one cluster.
    pub p_add: f64,
    /// Probability of accepting a split that preserves triality.
    pub p_split: f64,
    /// Probability of accepting a merge of two clusters.
    pub p_merge: f64,
}

impl Constants {
    /// Derives the acceptance constants from the Potts coupling `gamma >
    /// 0`. `gamma = 0` is a valid corner case: `q = 1`, so `p_add = 0` and
    /// no bond is ever added.
    #[must_use]
    pub fn new(gamma: f64) -> Self {
        let q = (-gamma).exp();
        Self {
            q,
            p_add: 1.0 - q,
            p_split: 3.0 * q / (1.0 + 2.0 * q),
            p_merge: (1.0 - q) / (1.0 + 2.0 * q),
        }
    }
}

/// Per-move-type accept counts for a single sweep. Denominators are always
/// `V`: a site that had nothing to propose (e.g. `n[i] == 0` on move 2)
/// counts as neither an accept nor a reject, matching the reference
/// implementation's accounting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Acceptance {
    /// Accepted baryon hops (move 1).
    pub baryon_hop: usize,
    /// Accepted intra-cluster quark hops (move 2).
    pub quark_hop: usize,
    /// Accepted bond toggles (move 3): additions, same-cluster removals,
    /// and splits all count together.
    pub bond_toggle: usize,
}

/// Drives the Markov chain: owns the lattice geometry, the precomputed
/// acceptance constants, and the reusable cluster-traversal scratch space,
/// and exposes [`Sampler::sweep`] as the single entry point the CLI
/// orchestrator calls once per sweep.
pub struct Sampler {
    lattice: Lattice,
    constants: Constants,
    scratch: Scratch,
}

impl Sampler {
    /// Builds a sampler for `lattice` at coupling `gamma`.
    #[must_use]
    pub fn new(lattice: Lattice, gamma: f64) -> Self {
        let volume = lattice.volume();
        Self {
            lattice,
            constants: Constants::new(gamma),
            scratch: Scratch::new(volume),
        }
    }

    /// The lattice this sampler runs on.
    #[must_use]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// The precomputed acceptance constants.
    #[must_use]
    pub fn constants(&self) -> Constants {
        self.constants
    }

    /// Runs one sweep: `V` independent attempts of each of the three move
    /// types, drawing a fresh random site for every attempt.
    pub fn sweep(&mut self, cfg: &mut Configuration, rng: &mut Stream) -> Acceptance {
        let volume = self.lattice.volume();
        let mut accept = Acceptance::default();
        for _ in 0..volume {
            if self.try_baryon_hop(cfg, rng) {
                accept.baryon_hop += 1;
            }
            if self.try_quark_hop(cfg, rng) {
                accept.quark_hop += 1;
            }
            if self.try_bond_toggle(cfg, rng) {
                accept.bond_toggle += 1;
            }
        }
        accept
    }

    /// Move 1 — baryon hop. Unconditional on cluster identity: a baryon
    /// carries triality 0, so moving it anywhere leaves every cluster's
    /// occupation sum unchanged mod 3.
    fn try_baryon_hop(&self, cfg: &mut Configuration, rng: &mut Stream) -> bool {
        let i = rng.uniform_index(self.lattice.volume());
        if cfg.occupation(i) <= 2 {
            return false;
        }
        let d = rng.uniform_index(self.lattice.directions());
        let j = self.lattice.step(i, d);
        if cfg.occupation(j) >= 4 {
            return false;
        }
        cfg.move_baryon(i, j);
        true
    }

    /// Move 2 — intra-cluster quark hop. The same-cluster check is
    /// mandatory: moving a single quark across clusters would break
    /// triality on both halves.
    fn try_quark_hop(&self, cfg: &mut Configuration, rng: &mut Stream) -> bool {
        let i = rng.uniform_index(self.lattice.volume());
        if cfg.occupation(i) == 0 {
            return false;
        }
        let d = rng.uniform_index(self.lattice.directions());
        let j = self.lattice.step(i, d);
        if cfg.occupation(j) >= 6 {
            return false;
        }
        if cfg.find(i) != cfg.find(j) {
            return false;
        }
        cfg.move_quark(i, j);
        true
    }

    /// Move 3 — bond toggle. Dispatches to removal or addition depending on
    /// the current bond state.
    fn try_bond_toggle(&mut self, cfg: &mut Configuration, rng: &mut Stream) -> bool {
        let i = rng.uniform_index(self.lattice.volume());
        let d = rng.uniform_index(self.lattice.dim());
        let j = self.lattice.step(i, d);

        if cfg.bond(i, d) {
            self.try_remove_bond(cfg, rng, i, d, j)
        } else {
            self.try_add_bond(cfg, rng, i, d, j)
        }
    }

    fn try_remove_bond(
        &mut self,
        cfg: &mut Configuration,
        rng: &mut Stream,
        i: usize,
        d: usize,
        j: usize,
    ) -> bool {
        cfg.poke_bond(i, d, false);
        match cluster::connected(&self.lattice, cfg, &mut self.scratch, i, j) {
            Connectivity::Connected => {
                if rng.uniform_unit() < self.constants.q {
                    cfg.remove_bond_same_cluster(i, d);
                    true
                } else {
                    cfg.poke_bond(i, d, true);
                    false
                }
            }
            Connectivity::Disconnected(c_i) => {
                let sigma: u32 = c_i.iter().map(|&k| u32::from(cfg.occupation(k))).sum();
                if sigma % 3 != 0 {
                    cfg.poke_bond(i, d, true);
                    return false;
                }
                if rng.uniform_unit() < self.constants.p_split {
                    let c_j = cluster::enumerate(&self.lattice, cfg, &mut self.scratch, j);
                    cfg.split_bond(i, d, &c_i, i, &c_j, j);
                    true
                } else {
                    cfg.poke_bond(i, d, true);
                    false
                }
            }
        }
    }

    fn try_add_bond(
        &mut self,
        cfg: &mut Configuration,
        rng: &mut Stream,
        i: usize,
        d: usize,
        j: usize,
    ) -> bool {
        let root_i = cfg.find(i);
        let root_j = cfg.find(j);
        if root_i == root_j {
            if rng.uniform_unit() < self.constants.p_add {
                cfg.add_bond_same_cluster(i, d);
                true
            } else {
                false
            }
        } else if rng.uniform_unit() < self.constants.p_merge {
            cfg.add_bond_merging(i, d, root_i, root_j);
            true
        } else {
            false
        }
    }
}
