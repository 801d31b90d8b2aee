//! Lattice geometry: site indexing, neighbor traversal, and the
//! forward/backward direction convention.

use crate::error::{Error, Result};
use arrayvec::ArrayVec;

/// Maximum supported dimensionality. The sampler only ever runs in 3 or 4
/// dimensions, but coordinates are kept in a fixed-capacity [`ArrayVec`] of
/// this size rather than a heap-allocated `Vec` so that geometry routines —
/// called once per move, three times per site per sweep — stay allocation
/// free.
pub const MAX_DIM: usize = 4;

/// A set of lattice coordinates, one per dimension.
pub type Coords = ArrayVec<usize, MAX_DIM>;

/// A `D`-dimensional periodic box with side lengths `L = (L_0, …, L_{D-1})`.
///
/// Sites are numbered by the row-major mixed-radix index
/// `i = i_0 + L_0*(i_1 + L_1*(i_2 + …))`, matching the reference
/// implementation's `(x, y, [z, [t]])` convention in which dimension 0
/// varies fastest. Directions are numbered `0..2*D`: `0..D` are the `+e_d`
/// forward steps, `D..2*D` are the matching `-e_d` backward steps, so that
/// direction `d` and direction `D + d` are always a matched pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    sides: ArrayVec<usize, MAX_DIM>,
    volume: usize,
}

impl Lattice {
    /// Builds a lattice from its side lengths. `sides.len()` must be 3 or 4,
    /// and every side must be at least 1.
    pub fn new(sides: &[usize]) -> Result<Self> {
        let dim = sides.len();
        if dim != 3 && dim != 4 {
            return Err(Error::Config(format!(
                "lattice dimension must be 3 or 4, got {dim}"
            )));
        }
        if sides.iter().any(|&l| l == 0) {
            return Err(Error::Config("lattice side lengths must be positive".into()));
        }
        let volume = sides.iter().product();
        Ok(Self {
            sides: sides.iter().copied().collect(),
            volume,
        })
    }

    /// Number of dimensions, `D`.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.sides.len()
    }

    /// Number of directions, `2*D` (forward and backward steps).
    #[must_use]
    pub fn directions(&self) -> usize {
        2 * self.dim()
    }

    /// Total number of sites, `V = prod(L_d)`.
    #[must_use]
    pub fn volume(&self) -> usize {
        self.volume
    }

    /// Side length in dimension `d`.
    #[must_use]
    pub fn side(&self, d: usize) -> usize {
        self.sides[d]
    }

    /// Converts a site index into its mixed-radix coordinates.
    #[must_use]
    pub fn coords_of(&self, mut site: usize) -> Coords {
        let mut coords = Coords::new();
        for d in 0..self.dim() {
            let l = self.sides[d];
            coords.push(site % l);
            site /= l;
        }
        coords
    }

    /// Converts coordinates back into a site index. Coordinates must
    /// already be reduced modulo their respective side lengths.
    #[must_use]
    pub fn site_of(&self, coords: &[usize]) -> usize {
        let mut index = 0;
        let mut stride = 1;
        for d in 0..self.dim() {
            index += coords[d] * stride;
            stride *= self.sides[d];
        }
        index
    }

    /// Advances one unit from `site` in `direction` (`0..2*D`), wrapping
    /// periodically. Forward direction `d` increments coordinate `d`;
    /// backward direction `D + d` decrements it. The pairing is an
    /// involution: `step(step(i, d), D + d) == i`.
    #[must_use]
    pub fn step(&self, site: usize, direction: usize) -> usize {
        let dim = self.dim();
        debug_assert!(direction < 2 * dim, "direction out of range");
        let mut coords = self.coords_of(site);
        if direction < dim {
            let d = direction;
            let l = self.sides[d];
            coords[d] = (coords[d] + 1) % l;
        } else {
            let d = direction - dim;
            let l = self.sides[d];
            coords[d] = (coords[d] + l - 1) % l;
        }
        self.site_of(&coords)
    }

    /// Iterates over every site index, `0..volume`.
    pub fn sites(&self) -> impl Iterator<Item = usize> {
        0..self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_dimension() {
        assert!(Lattice::new(&[2, 2]).is_err());
        assert!(Lattice::new(&[2, 2, 2, 2, 2]).is_err());
        assert!(Lattice::new(&[2, 2, 0]).is_err());
    }

    #[test]
    fn volume_is_product_of_sides() {
        let lattice = Lattice::new(&[2, 3, 4]).unwrap();
        assert_eq!(lattice.volume(), 24);
        assert_eq!(lattice.dim(), 3);
        assert_eq!(lattice.directions(), 6);
    }

    #[test]
    fn coords_roundtrip() {
        let lattice = Lattice::new(&[2, 3, 4]).unwrap();
        for site in lattice.sites() {
            let coords = lattice.coords_of(site);
            assert_eq!(lattice.site_of(&coords), site);
        }
    }

    #[test]
    fn step_is_involution_on_matching_directions() {
        let lattice = Lattice::new(&[2, 3, 4, 2]).unwrap();
        let dim = lattice.dim();
        for site in lattice.sites() {
            for d in 0..dim {
                let forward = lattice.step(site, d);
                assert_eq!(lattice.step(forward, dim + d), site);
            }
        }
    }

    #[test]
    fn step_wraps_periodically() {
        let lattice = Lattice::new(&[2, 2, 2]).unwrap();
        // site 0 is (0, 0, 0); stepping backward in every dimension wraps
        // to the far edge.
        assert_eq!(lattice.step(0, 3), lattice.site_of(&[1, 0, 0]));
        assert_eq!(lattice.step(0, 4), lattice.site_of(&[0, 1, 0]));
        assert_eq!(lattice.step(0, 5), lattice.site_of(&[0, 0, 1]));
    }
}
