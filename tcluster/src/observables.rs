//! Per-sweep measurements: acceptance rates, cluster-size statistics, bond
//! density, and the action proxy.

use crate::config::Configuration;
use crate::geometry::Lattice;
use crate::kernel::{Acceptance, Constants};

/// Which physical system the action-proxy formula's sign convention
/// matches. The cluster update itself is convention-independent; only the
/// reported observable's sign changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionConvention {
    /// `action = numBond / p_add`, matching the 3-state Potts reference.
    Potts,
    /// `action = -numBond / p_add`, matching the SU(3) heavy-dense proxy.
    Su3,
}

impl ActionConvention {
    fn sign(self) -> f64 {
        match self {
            Self::Potts => 1.0,
            Self::Su3 => -1.0,
        }
    }
}

/// One row of the per-sweep measurement output.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    /// Sweep index, `0` for the initial configuration before any update.
    pub sweep: usize,
    /// Fraction of the `V` baryon-hop attempts accepted this sweep.
    pub accept_baryon: f64,
    /// Fraction of the `V` quark-hop attempts accepted this sweep.
    pub accept_quark: f64,
    /// Fraction of the `V` bond-toggle attempts accepted this sweep.
    pub accept_bond: f64,
    /// Largest cluster's site count.
    pub max_cluster_abs: usize,
    /// Largest cluster's site count as a fraction of the volume.
    pub max_cluster_rel: f64,
    /// Mean cluster size, `V / numCluster`.
    pub mean_cluster_abs: f64,
    /// Reciprocal cluster count, `1 / numCluster`.
    pub mean_cluster_rel: f64,
    /// Present bond count.
    pub num_bond_abs: usize,
    /// Present bond count as a fraction of `V * D`.
    pub num_bond_rel: f64,
    /// Action proxy, `±numBond / p_add`, or `0` when `gamma == 0` (`p_add ==
    /// 0`, the formula is undefined).
    pub action_total: f64,
    /// Action proxy per site.
    pub action_per_site: f64,
}

/// Recomputes the largest cluster's size by a fresh union-find sweep over
/// every site's root. `O(V)`, run once per sweep regardless of lattice
/// size — the reference implementation does the same.
fn max_cluster_size(cfg: &mut Configuration) -> usize {
    let volume = cfg.volume();
    let mut counts = std::collections::HashMap::new();
    for site in 0..volume {
        let root = cfg.find(site);
        *counts.entry(root).or_insert(0usize) += 1;
    }
    counts.into_values().max().unwrap_or(0)
}

/// Computes the full measurement row for the current configuration and the
/// acceptance counts from the sweep that produced it. Pass
/// `Acceptance::default()` for the initial (sweep-0) row, before any update
/// has run.
pub fn measure(
    lattice: &Lattice,
    cfg: &mut Configuration,
    accept: Acceptance,
    constants: Constants,
    convention: ActionConvention,
    sweep: usize,
) -> Measurement {
    let volume = lattice.volume();
    let directions_total = (volume * lattice.dim()) as f64;

    let max_abs = max_cluster_size(cfg);
    let num_cluster = cfg.num_cluster();
    let num_bond = cfg.num_bond();

    let (action_total, action_per_site) = if constants.p_add > 0.0 {
        let total = convention.sign() * num_bond as f64 / constants.p_add;
        (total, total / volume as f64)
    } else {
        (0.0, 0.0)
    };

    Measurement {
        sweep,
        accept_baryon: accept.baryon_hop as f64 / volume as f64,
        accept_quark: accept.quark_hop as f64 / volume as f64,
        accept_bond: accept.bond_toggle as f64 / volume as f64,
        max_cluster_abs: max_abs,
        max_cluster_rel: max_abs as f64 / volume as f64,
        mean_cluster_abs: volume as f64 / num_cluster as f64,
        mean_cluster_rel: 1.0 / num_cluster as f64,
        num_bond_abs: num_bond,
        num_bond_rel: num_bond as f64 / directions_total,
        action_total,
        action_per_site,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Stream;

    #[test]
    fn initial_configuration_has_volume_many_singleton_clusters() {
        let lattice = Lattice::new(&[2, 2, 2]).unwrap();
        let mut rng = Stream::new(1);
        let mut cfg = Configuration::new(&lattice, 0, &mut rng).unwrap();
        let constants = Constants::new(1.0);
        let m = measure(&lattice, &mut cfg, Acceptance::default(), constants, ActionConvention::Potts, 0);
        assert_eq!(m.sweep, 0);
        assert_eq!(m.max_cluster_abs, 1);
        assert!((m.mean_cluster_abs - 1.0).abs() < 1e-12);
        assert_eq!(m.num_bond_abs, 0);
        assert!((m.num_bond_rel - 0.0).abs() < 1e-12);
    }

    #[test]
    fn zero_coupling_reports_zero_action() {
        let lattice = Lattice::new(&[2, 2, 2]).unwrap();
        let mut rng = Stream::new(1);
        let mut cfg = Configuration::new(&lattice, 0, &mut rng).unwrap();
        let constants = Constants::new(0.0);
        let m = measure(&lattice, &mut cfg, Acceptance::default(), constants, ActionConvention::Potts, 0);
        assert_eq!(m.action_total, 0.0);
        assert_eq!(m.action_per_site, 0.0);
    }

    #[test]
    fn su3_convention_flips_the_action_sign() {
        let lattice = Lattice::new(&[4, 1, 1]).unwrap();
        let mut rng = Stream::new(1);
        let mut cfg = Configuration::new(&lattice, 0, &mut rng).unwrap();
        cfg.add_bond_same_cluster(0, 0);
        let constants = Constants::new(1.0);
        let potts = measure(&lattice, &mut cfg, Acceptance::default(), constants, ActionConvention::Potts, 1);
        let su3 = measure(&lattice, &mut cfg, Acceptance::default(), constants, ActionConvention::Su3, 1);
        assert!((potts.action_total + su3.action_total).abs() < 1e-12);
    }

    #[test]
    fn one_bond_merges_two_singleton_clusters_into_a_pair() {
        let lattice = Lattice::new(&[4, 1, 1]).unwrap();
        let mut rng = Stream::new(1);
        let mut cfg = Configuration::new(&lattice, 0, &mut rng).unwrap();
        let root0 = cfg.find(0);
        let root1 = cfg.find(1);
        cfg.add_bond_merging(0, 0, root0, root1);
        let constants = Constants::new(1.0);
        let m = measure(&lattice, &mut cfg, Acceptance::default(), constants, ActionConvention::Potts, 1);
        assert_eq!(m.max_cluster_abs, 2);
        assert_eq!(cfg.num_cluster(), 3);
    }
}
