//! Triality-preserving cluster sampler for the canonical-sector heavy-dense
//! lattice QCD Potts proxy.
//!
//! A lattice carries a fixed number of baryons (`N_B`, conserved) spread
//! across sites as quark occupation numbers in `0..=6`; a Swendsen-Wang-style
//! bond update groups sites into clusters whose total occupation is always a
//! multiple of three, and the three moves of the update kernel (baryon hop,
//! intra-cluster quark hop, bond toggle) sample the canonical-sector
//! partition function at fixed `N_B` while preserving that invariant.
//!
//! Module map:
//! - [`geometry`] — the periodic lattice and its site/direction indexing.
//! - [`rng`] — the single deterministic random stream a run consumes from.
//! - [`unionfind`] — the disjoint-set primitive clusters are tracked with.
//! - [`config`] — the mutable run state: occupation, bonds, cluster roots.
//! - [`cluster`] — flood-fill traversal over present bonds.
//! - [`kernel`] — the update kernel: the three moves and the sweep loop.
//! - [`validators`] — full-recount invariant checks.
//! - [`observables`] — per-sweep measurement computation.
//! - [`error`] — the crate's typed error taxonomy.

pub mod cluster;
pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod observables;
pub mod rng;
pub mod unionfind;
pub mod validators;

pub use config::Configuration;
pub use error::{Error, Result};
pub use geometry::Lattice;
pub use kernel::{Acceptance, Constants, Sampler};
pub use observables::{ActionConvention, Measurement};
pub use rng::Stream;
