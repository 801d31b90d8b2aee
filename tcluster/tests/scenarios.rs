//! End-to-end scenario tests exercising the full sweep loop through the
//! public API, one integration test per documented scenario.

use tcluster::observables::{self, ActionConvention};
use tcluster::{Acceptance, Configuration, Lattice, Sampler, Stream};

fn quark_sum(cfg: &Configuration) -> u32 {
    (0..cfg.volume()).map(|i| u32::from(cfg.occupation(i))).sum()
}

#[test]
fn e1_empty_lattice_zero_coupling_never_accepts_moves_one_or_two() {
    let lattice = Lattice::new(&[2, 2, 2]).unwrap();
    let mut rng = Stream::new(1);
    let mut cfg = Configuration::new(&lattice, 0, &mut rng).unwrap();
    let mut sampler = Sampler::new(lattice.clone(), 0.0);
    let accept = sampler.sweep(&mut cfg, &mut rng);
    assert_eq!(accept.baryon_hop, 0);
    assert_eq!(accept.quark_hop, 0);
    assert_eq!(cfg.num_bond(), 0);
    assert_eq!(cfg.num_cluster(), 8);

    let m = observables::measure(&lattice, &mut cfg, accept, sampler.constants(), ActionConvention::Potts, 1);
    assert_eq!(m.action_total, 0.0);
    assert_eq!(m.action_per_site, 0.0);
}

#[test]
fn e2_fully_saturated_lattice_zero_coupling_never_accepts_anything() {
    let lattice = Lattice::new(&[2, 2, 2]).unwrap();
    let mut rng = Stream::new(1);
    let mut cfg = Configuration::new(&lattice, 16, &mut rng).unwrap();
    assert_eq!(quark_sum(&cfg), 48);
    for i in 0..cfg.volume() {
        assert_eq!(cfg.occupation(i), 6);
    }

    let mut sampler = Sampler::new(lattice, 0.0);
    let accept = sampler.sweep(&mut cfg, &mut rng);
    assert_eq!(accept.baryon_hop, 0);
    assert_eq!(accept.quark_hop, 0);
    assert_eq!(accept.bond_toggle, 0);
}

#[test]
fn e3_quark_sum_and_triality_survive_a_hundred_sweeps_with_some_bonding() {
    let lattice = Lattice::new(&[4, 4, 4]).unwrap();
    let mut rng = Stream::new(42);
    let mut cfg = Configuration::new(&lattice, 4, &mut rng).unwrap();
    let mut sampler = Sampler::new(lattice.clone(), 1.0);

    let mut ever_bonded = false;
    for _ in 0..100 {
        sampler.sweep(&mut cfg, &mut rng);
        assert_eq!(quark_sum(&cfg), 12);
        tcluster::validators::validate(&lattice, &mut cfg).expect("triality must hold every sweep");
        if cfg.num_bond() > 0 {
            ever_bonded = true;
        }
    }
    assert!(ever_bonded, "expected at least one bond to form by sweep 100");
}

#[test]
fn e4_very_high_coupling_drives_to_near_total_percolation() {
    let lattice = Lattice::new(&[2, 2, 2]).unwrap();
    let mut rng = Stream::new(7);
    let mut cfg = Configuration::new(&lattice, 4, &mut rng).unwrap();
    let mut sampler = Sampler::new(lattice.clone(), 10.0);

    for _ in 0..60 {
        sampler.sweep(&mut cfg, &mut rng);
    }
    assert_eq!(cfg.num_cluster(), 1, "expected full percolation at very high coupling");
    assert_eq!(cfg.num_bond(), lattice.volume() * lattice.dim());
}

#[test]
fn e5_identical_seeds_produce_identical_trajectories() {
    let run = || {
        let lattice = Lattice::new(&[4, 4, 4]).unwrap();
        let mut rng = Stream::new(42);
        let mut cfg = Configuration::new(&lattice, 4, &mut rng).unwrap();
        let mut sampler = Sampler::new(lattice, 1.0);
        for _ in 0..20 {
            sampler.sweep(&mut cfg, &mut rng);
        }
        (0..cfg.volume()).map(|i| cfg.occupation(i)).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn e6_two_hundred_sweeps_never_trips_an_invariant_and_every_move_fires() {
    let lattice = Lattice::new(&[3, 3, 3, 1]).unwrap();
    let mut rng = Stream::new(13);
    let mut cfg = Configuration::new(&lattice, 3, &mut rng).unwrap();
    let mut sampler = Sampler::new(lattice.clone(), 0.5);

    let mut total = Acceptance::default();
    for _ in 0..200 {
        let accept = sampler.sweep(&mut cfg, &mut rng);
        tcluster::validators::validate(&lattice, &mut cfg).expect("no invariant should ever fail");
        total.baryon_hop += accept.baryon_hop;
        total.quark_hop += accept.quark_hop;
        total.bond_toggle += accept.bond_toggle;
    }
    assert!(total.baryon_hop > 0);
    assert!(total.quark_hop > 0);
    assert!(total.bond_toggle > 0);
}
