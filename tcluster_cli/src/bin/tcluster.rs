#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use git_version::git_version;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use tcluster::observables::{self, ActionConvention, Measurement};
use tcluster::{Configuration, Error, Lattice, Sampler, Stream};

/// Runs a triality-preserving cluster sampler simulation and writes its
/// per-sweep measurements to a run directory.
#[derive(Parser)]
#[command(
    author,
    about,
    name = "tcluster",
    version = git_version!(
        args = ["--always", "--dirty", "--long", "--tags"],
        cargo_prefix = "",
        fallback = "unknown"
    )
)]
struct Opts {
    /// Lattice side lengths: three values for a 3D run, four for a 4D run.
    #[arg(num_args = 3..=4)]
    sides: Vec<usize>,
    /// Conserved number of baryons, `N_B`.
    n_baryons: usize,
    /// Potts coupling, `gamma`.
    gamma: f64,
    /// Number of sweeps to run.
    nsweep: usize,
    /// PRNG seed.
    seed: u64,
    /// Output directory; created if it does not exist.
    outdir: PathBuf,
    /// Recount every invariant after every sweep, not only in debug
    /// builds.
    #[arg(long)]
    force_validate: bool,
    /// Increases log verbosity; repeatable.
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Action-proxy sign convention to report.
    #[arg(long, value_enum, default_value_t = ActionConventionArg::Potts)]
    convention: ActionConventionArg,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ActionConventionArg {
    Potts,
    Su3,
}

impl From<ActionConventionArg> for ActionConvention {
    fn from(value: ActionConventionArg) -> Self {
        match value {
            ActionConventionArg::Potts => Self::Potts,
            ActionConventionArg::Su3 => Self::Su3,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

struct Writers {
    accept: BufWriter<File>,
    maxcluster: BufWriter<File>,
    avecluster: BufWriter<File>,
    numbonds: BufWriter<File>,
    action: BufWriter<File>,
}

fn open(path: &std::path::Path) -> Result<BufWriter<File>, Error> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })
}

impl Writers {
    fn create(outdir: &std::path::Path) -> Result<Self, Error> {
        Ok(Self {
            accept: open(&outdir.join("accept.csv"))?,
            maxcluster: open(&outdir.join("maxcluster.csv"))?,
            avecluster: open(&outdir.join("avecluster.csv"))?,
            numbonds: open(&outdir.join("numbonds.csv"))?,
            action: open(&outdir.join("action.csv"))?,
        })
    }

    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.accept, "sweep,accept_mvB,accept_mvQ,accept_bond")?;
        writeln!(self.maxcluster, "sweep,max_tot,max_rel")?;
        writeln!(self.avecluster, "sweep,ave_tot,ave_rel")?;
        writeln!(self.numbonds, "sweep,NB_tot,NB_rel")?;
        writeln!(self.action, "sweep,action_tot,action_rel")
    }

    /// Writes the sweep-`0` row to every observable except `accept.csv`,
    /// which only starts accumulating rows from sweep 1 (there is no
    /// acceptance rate for a sweep that has not run yet).
    fn write_initial_row(&mut self, m: &Measurement) -> std::io::Result<()> {
        writeln!(
            self.maxcluster,
            "{},{},{}",
            m.sweep, m.max_cluster_abs, m.max_cluster_rel
        )?;
        writeln!(
            self.avecluster,
            "{},{},{}",
            m.sweep, m.mean_cluster_abs, m.mean_cluster_rel
        )?;
        writeln!(
            self.numbonds,
            "{},{},{}",
            m.sweep, m.num_bond_abs, m.num_bond_rel
        )?;
        writeln!(self.action, "{},{},{}", m.sweep, m.action_total, m.action_per_site)
    }

    fn write_row(&mut self, m: &Measurement) -> std::io::Result<()> {
        writeln!(
            self.accept,
            "{},{},{},{}",
            m.sweep, m.accept_baryon, m.accept_quark, m.accept_bond
        )?;
        self.write_initial_row(m)
    }
}

fn write_params(outdir: &std::path::Path, opts: &Opts) -> Result<(), Error> {
    let path = outdir.join("params.txt");
    let mut w = open(&path)?;
    let body = format!(
        "sides = {:?}\nn_baryons = {}\ngamma = {}\nnsweep = {}\nseed = {}\n",
        opts.sides,
        opts.n_baryons,
        opts.gamma,
        opts.nsweep,
        opts.seed,
    );
    w.write_all(body.as_bytes())
        .map_err(|source| Error::Io { path: path.display().to_string(), source })
}

/// Appends the run's wall-clock duration to `params.txt` once every sweep
/// has completed, so the file records the invocation arguments and the
/// final runtime together.
fn append_runtime(outdir: &std::path::Path, elapsed: std::time::Duration) -> Result<(), Error> {
    let path = outdir.join("params.txt");
    let mut w = fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(|source| Error::Io { path: path.display().to_string(), source })?;
    writeln!(w, "runtime_seconds = {:.1}", elapsed.as_secs_f64())
        .map_err(|source| Error::Io { path: path.display().to_string(), source })
}

fn run(opts: &Opts) -> Result<()> {
    let lattice = Lattice::new(&opts.sides).context("failed to build lattice")?;
    let convention: ActionConvention = opts.convention.into();

    fs::create_dir_all(&opts.outdir)
        .with_context(|| format!("failed to create output directory {}", opts.outdir.display()))?;
    write_params(&opts.outdir, opts)?;

    let mut rng = Stream::new(opts.seed);
    let mut cfg = Configuration::new(&lattice, opts.n_baryons, &mut rng)
        .context("failed to build initial configuration")?;
    let mut sampler = Sampler::new(lattice.clone(), opts.gamma);
    let constants = sampler.constants();

    let mut writers = Writers::create(&opts.outdir)?;
    writers.write_header().context("failed to write CSV headers")?;

    let initial = observables::measure(
        &lattice,
        &mut cfg,
        tcluster::Acceptance::default(),
        constants,
        convention,
        0,
    );
    writers
        .write_initial_row(&initial)
        .context("failed to write initial measurement row")?;

    let started = std::time::Instant::now();
    for sweep in 1..=opts.nsweep {
        let accept = sampler.sweep(&mut cfg, &mut rng);

        if opts.force_validate || cfg!(debug_assertions) {
            tcluster::validators::validate(&lattice, &mut cfg)
                .with_context(|| format!("invariant check failed at sweep {sweep}"))?;
        }

        let measurement = observables::measure(&lattice, &mut cfg, accept, constants, convention, sweep);
        writers.write_row(&measurement).context("failed to write measurement row")?;

        if sweep % 100 == 0 {
            info!(
                "sweep {sweep}/{}: {} clusters, {} bonds",
                opts.nsweep,
                cfg.num_cluster(),
                cfg.num_bond()
            );
        }
    }

    append_runtime(&opts.outdir, started.elapsed()).context("failed to append runtime to params.txt")?;

    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
