use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use ruletree_rs::compiler::{Compiler, Limits};
use ruletree_rs::rules::{LifeLike, Parity};
use ruletree_rs::transition::TransitionFunction;
use ruletree_rs::types::Neighborhood;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    #[command(subcommand)]
    rule: Rule,

    /// Write the tree to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Give up once the table has more than this many nodes.
    #[arg(long, value_name = "INT")]
    max_nodes: Option<usize>,

    /// Also write a Graphviz rendering of the tree to this file.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Log every node as it is created.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Rule {
    /// Two-state outer totalistic rule, e.g. `life --birth 3 --survival 2,3`.
    Life {
        /// Neighbor counts giving birth.
        #[arg(long, value_delimiter = ',', default_value = "3")]
        birth: Vec<usize>,

        /// Neighbor counts allowing survival.
        #[arg(long, value_delimiter = ',', default_value = "2,3")]
        survival: Vec<usize>,

        #[arg(long, value_enum, default_value = "moore")]
        neighborhood: NeighborhoodArg,
    },
    /// Sum of the selected inputs modulo the number of states.
    Parity {
        /// Number of states.
        #[arg(long, value_name = "INT", default_value = "2")]
        states: u32,

        /// Input positions to sum.
        #[arg(long, value_delimiter = ',', default_value = "0,1,2")]
        positions: Vec<usize>,

        #[arg(long, value_enum, default_value = "von-neumann")]
        neighborhood: NeighborhoodArg,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum NeighborhoodArg {
    VonNeumann,
    Moore,
}

impl From<NeighborhoodArg> for Neighborhood {
    fn from(arg: NeighborhoodArg) -> Self {
        match arg {
            NeighborhoodArg::VonNeumann => Neighborhood::VonNeumann,
            NeighborhoodArg::Moore => Neighborhood::Moore,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    info!("args = {:?}", args);

    let (num_states, neighborhood, rule) = match &args.rule {
        Rule::Life {
            birth,
            survival,
            neighborhood,
        } => {
            let neighborhood = Neighborhood::from(*neighborhood);
            let rule: Box<dyn TransitionFunction> = Box::new(LifeLike::new(neighborhood, birth, survival));
            (2, neighborhood, rule)
        }
        Rule::Parity {
            states,
            positions,
            neighborhood,
        } => {
            let rule: Box<dyn TransitionFunction> = Box::new(Parity::new(*states, positions.clone()));
            (*states, Neighborhood::from(*neighborhood), rule)
        }
    };

    let limits = Limits {
        max_nodes: args.max_nodes,
        ..Limits::default()
    };

    let time_total = std::time::Instant::now();
    let mut compiler = Compiler::with_limits(num_states, neighborhood.num_vars(), limits)?;
    let tree = compiler.compile(rule.as_ref())?;
    info!(
        "{} nodes ({:?} per level) in {:.3}s, stats = {:?}",
        tree.num_nodes(),
        tree.nodes_per_level(),
        time_total.elapsed().as_secs_f64(),
        compiler.stats()
    );

    match &args.output {
        Some(path) => tree.save(path)?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            tree.write_to(&mut lock)?;
            lock.flush()?;
        }
    }

    if let Some(path) = &args.dot {
        std::fs::write(path, tree.to_dot()?)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}
