//! Configuration store: occupation numbers, bond flags, the union-find
//! `root` array, and the running `numBond`/`numCluster` counters.

use crate::error::{Error, Result};
use crate::geometry::Lattice;
use crate::rng::Stream;
use crate::unionfind;
use ndarray::{Array1, Array2};

/// The full mutable state of a single run: quark occupation per site, bond
/// presence per (site, forward direction), and the union-find forest over
/// the cluster partition.
///
/// Created once at run start and mutated in place by the update kernel for
/// the remainder of the run; there is no persistence across runs in the
/// current scope.
pub struct Configuration {
    occupation: Array1<u8>,
    bonds: Array2<bool>,
    root: Array1<usize>,
    num_bond: usize,
    num_cluster: usize,
    quark_total: usize,
}

impl Configuration {
    /// Builds the initial configuration for `n_baryons` baryons on
    /// `lattice`. Refuses to construct if `n_baryons > 2 * volume` — the
    /// lattice cannot physically hold that many baryons (six quarks per
    /// site is the saturation point).
    ///
    /// If `n_baryons <= volume`, starts from an empty lattice and adds
    /// baryons one at a time, resampling a site until it has room (`n < 4`).
    /// Otherwise starts from a saturated lattice (`n = 6` everywhere) and
    /// removes `2*volume - n_baryons` baryons the same way, resampling
    /// until a site has one to give up (`n > 2`).
    ///
    /// All bonds start absent, every site starts as its own cluster, and
    /// the bond/cluster counters start at `0` and `volume` respectively.
    pub fn new(lattice: &Lattice, n_baryons: usize, rng: &mut Stream) -> Result<Self> {
        let volume = lattice.volume();
        if n_baryons > 2 * volume {
            return Err(Error::Config(format!(
                "cannot fit {n_baryons} baryons on a volume-{volume} lattice (max {})",
                2 * volume
            )));
        }

        let quark_total = 3 * n_baryons;
        let mut occupation = if n_baryons > volume {
            Array1::from_elem(volume, 6u8)
        } else {
            Array1::zeros(volume)
        };

        if n_baryons > volume {
            for _ in 0..(2 * volume - n_baryons) {
                loop {
                    let site = rng.uniform_index(volume);
                    if occupation[site] > 2 {
                        occupation[site] -= 3;
                        break;
                    }
                }
            }
        } else {
            for _ in 0..n_baryons {
                loop {
                    let site = rng.uniform_index(volume);
                    if occupation[site] < 4 {
                        occupation[site] += 3;
                        break;
                    }
                }
            }
        }

        Ok(Self {
            occupation,
            bonds: Array2::from_elem((volume, lattice.dim()), false),
            root: Array1::from_shape_fn(volume, |i| i),
            num_bond: 0,
            num_cluster: volume,
            quark_total,
        })
    }

    /// Occupation (quark count) at `site`, in `0..=6`.
    #[must_use]
    pub fn occupation(&self, site: usize) -> u8 {
        self.occupation[site]
    }

    fn set_occupation(&mut self, site: usize, value: u8) {
        self.occupation[site] = value;
    }

    /// Whether the forward bond out of `site` in dimension `d` is present.
    #[must_use]
    pub fn bond(&self, site: usize, d: usize) -> bool {
        self.bonds[(site, d)]
    }

    fn set_bond(&mut self, site: usize, d: usize, present: bool) {
        self.bonds[(site, d)] = present;
    }

    /// Number of present bonds.
    #[must_use]
    pub fn num_bond(&self) -> usize {
        self.num_bond
    }

    /// Number of clusters (distinct union-find roots).
    #[must_use]
    pub fn num_cluster(&self) -> usize {
        self.num_cluster
    }

    /// Total conserved quark count, `N_q = 3 * N_B`.
    #[must_use]
    pub fn quark_total(&self) -> usize {
        self.quark_total
    }

    /// Number of sites (and length of the occupation/root arrays).
    #[must_use]
    pub fn volume(&self) -> usize {
        self.occupation.len()
    }

    /// Union-find lookup with path compression.
    pub fn find(&mut self, site: usize) -> usize {
        unionfind::find(self.root.as_slice_mut().expect("contiguous root array"), site)
    }

    pub(crate) fn move_baryon(&mut self, from: usize, to: usize) {
        self.set_occupation(from, self.occupation(from) - 3);
        self.set_occupation(to, self.occupation(to) + 3);
    }

    pub(crate) fn move_quark(&mut self, from: usize, to: usize) {
        self.set_occupation(from, self.occupation(from) - 1);
        self.set_occupation(to, self.occupation(to) + 1);
    }

    pub(crate) fn add_bond_same_cluster(&mut self, site: usize, d: usize) {
        self.set_bond(site, d, true);
        self.num_bond += 1;
    }

    pub(crate) fn add_bond_merging(&mut self, site: usize, d: usize, root_i: usize, root_j: usize) {
        self.set_bond(site, d, true);
        self.num_bond += 1;
        self.num_cluster -= 1;
        unionfind::union(self.root.as_slice_mut().expect("contiguous root array"), root_i, root_j);
    }

    pub(crate) fn remove_bond_same_cluster(&mut self, site: usize, d: usize) {
        self.set_bond(site, d, false);
        self.num_bond -= 1;
    }

    /// Removes a bond whose tentative removal split the cluster, and
    /// rebuilds `root` over the two resulting components. `c_i`/`c_j` must
    /// partition the old cluster's membership with no overlap; `new_root_i`
    /// and `new_root_j` become the new roots of each half.
    pub(crate) fn split_bond(
        &mut self,
        site: usize,
        d: usize,
        c_i: &[usize],
        new_root_i: usize,
        c_j: &[usize],
        new_root_j: usize,
    ) {
        self.set_bond(site, d, false);
        self.num_bond -= 1;
        self.num_cluster += 1;
        for &k in c_i {
            self.root[k] = new_root_i;
        }
        for &k in c_j {
            self.root[k] = new_root_j;
        }
    }

    /// Flips the raw bond flag without touching `numBond`/`numCluster`.
    /// Used both to set up the tentative removal in the bond-toggle move
    /// before the connectivity check decides its fate, and to roll the flag
    /// back on rejection.
    pub(crate) fn poke_bond(&mut self, site: usize, d: usize, present: bool) {
        self.set_bond(site, d, present);
    }
}
