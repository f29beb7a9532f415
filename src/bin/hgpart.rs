//! Partitions a hypergraph given in hMetis format and writes `<file>.part.<k>`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use hgmetis::hgraphio::{read_hypergraph, write_partition};
use hgmetis::stat::{self, Stats};
use hgmetis::{khmetis, options, Ctrl, Hypergraph};

#[derive(Parser)]
#[command(about = "Multilevel hypergraph partitioner")]
struct Cli {
    /// hypergraph file in hMetis format
    hgr_file: PathBuf,

    /// number of parts
    k: i32,

    /// allowed imbalance
    #[arg(short, long, default_value = "0.03")]
    epsilon: f64,

    #[arg(short, long, default_value = "mult-pin-weight")]
    ctype: Ctype,

    #[arg(short, long, default_value = "rb")]
    iptype: Iptype,

    #[arg(short, long, default_value = "global")]
    grow: GrowMode,

    /// start node selection of greedy growing
    #[arg(long, default_value = "bfs")]
    start: StartType,

    #[arg(long, default_value = "fm")]
    gain: GainType,

    #[arg(short, long, default_value = "greedy")]
    rtype: Rtype,

    /// stop coarsening at this many nodes, defaults to 160 per part
    #[arg(long)]
    coarsen_to: Option<usize>,

    #[arg(short, long, default_value = "0")]
    seed: u64,

    #[arg(short, long, default_value = "0")]
    dbglvl: u32,

    /// partition file, defaults to `<hgr_file>.part.<k>`
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    no_output: bool,

    /// print the collected statistics on one line
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Ctype {
    #[value(alias = "mult")]
    MultPinWeight,
    #[value(alias = "sum")]
    PinWeightSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Iptype {
    Bisection,
    Kway,
    #[value(alias = "rb")]
    RecursiveBisection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GrowMode {
    Sequential,
    Global,
    #[value(alias = "rr")]
    RoundRobin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartType {
    Bfs,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GainType {
    Fm,
    MaxNet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rtype {
    None,
    Greedy,
}

impl Cli {
    fn ctrl(&self, hg: &Hypergraph) -> Ctrl {
        let mut ctrl = Ctrl::setup(hg, self.k, self.epsilon);
        ctrl.seed = self.seed;
        ctrl.dbglvl = self.dbglvl;
        ctrl.ctype = match self.ctype {
            Ctype::MultPinWeight => options::Ctype::EdgeWeightDivMultPinWeight,
            Ctype::PinWeightSum => options::Ctype::EdgeWeightDivPinWeightSum,
        };
        ctrl.iptype = match self.iptype {
            Iptype::Bisection => options::Iptype::Bisection,
            Iptype::Kway => options::Iptype::KWay,
            Iptype::RecursiveBisection => options::Iptype::RecursiveBisection,
        };
        ctrl.grow_mode = match self.grow {
            GrowMode::Sequential => options::GrowMode::Sequential,
            GrowMode::Global => options::GrowMode::Global,
            GrowMode::RoundRobin => options::GrowMode::RoundRobin,
        };
        ctrl.start_type = match self.start {
            StartType::Bfs => options::StartType::Bfs,
            StartType::Random => options::StartType::Random,
        };
        ctrl.gain_type = match self.gain {
            GainType::Fm => options::GainType::Fm,
            GainType::MaxNet => options::GainType::MaxNet,
        };
        ctrl.rtype = match self.rtype {
            Rtype::None => options::Rtype::None,
            Rtype::Greedy => options::Rtype::Greedy,
        };
        if let Some(coarsen_to) = self.coarsen_to {
            ctrl.coarsen_to = coarsen_to;
            ctrl.set_max_allowed_node_weight(hg.total_weight());
        }
        ctrl
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut name = self.hgr_file.clone().into_os_string();
            name.push(format!(".part.{}", self.k));
            name.into()
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hgpart: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.k < 1 {
        anyhow::bail!("the number of parts must be positive, got {}", cli.k);
    }

    let io_timer = Instant::now();
    let mut hg = read_hypergraph(&cli.hgr_file, cli.k)
        .with_context(|| format!("reading {}", cli.hgr_file.display()))?;
    let mut io_time = io_timer.elapsed();

    let ctrl = cli.ctrl(&hg);
    print_info(cli, &hg, &ctrl);

    let part_timer = Instant::now();
    let mut stats = Stats::new();
    let cut = khmetis::partition_with_stats(&mut hg, &ctrl, &mut stats)?;
    let part_time = part_timer.elapsed();

    if !cli.no_output {
        let io_timer = Instant::now();
        let path = cli.output_path();
        write_partition(&path, &hg).with_context(|| format!("writing {}", path.display()))?;
        io_time += io_timer.elapsed();
    }

    println!();
    println!(
        " {}-way cut: {cut}, km1: {}, imbalance: {:.3}",
        ctrl.k,
        stat::km1(&hg),
        stat::imbalance(&hg)
    );
    if cli.stats {
        println!("RESULT{stats}");
    }

    print!("\nTiming Information ----------------------------------------------------------\n");
    println!("  I/O:          \t\t {:7.3} sec", io_time.as_secs_f64());
    println!("  Partitioning: \t\t {:7.3} sec", part_time.as_secs_f64());
    println!("******************************************************************************");
    Ok(())
}

fn print_info(cli: &Cli, hg: &Hypergraph, ctrl: &Ctrl) {
    println!("******************************************************************************");
    println!("hgpart {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Hypergraph Information ------------------------------------------------------");
    println!(
        " Name: {}, #Nodes: {}, #Hyperedges: {}, #Pins: {}, #Parts: {}",
        cli.hgr_file.display(),
        hg.current_num_nodes(),
        hg.current_num_edges(),
        hg.current_num_pins(),
        ctrl.k
    );
    println!();
    println!("Options ---------------------------------------------------------------------");
    println!(
        " ctype={:?}, iptype={:?}, grow={:?}, start={:?}, gain={:?}, rtype={:?}",
        cli.ctype, cli.iptype, cli.grow, cli.start, cli.gain, cli.rtype
    );
    println!(
        " epsilon={:.3}, coarsen_to={}, max_node_weight={}, seed={}, dbglvl={}",
        ctrl.epsilon, ctrl.coarsen_to, ctrl.max_allowed_node_weight, ctrl.seed, ctrl.dbglvl
    );
}
