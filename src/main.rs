//! itemset-growth - mine frequent, periodic, correlated and uncertain itemsets

use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use itemset_growth::io::{
    OutputFormat, ReadOptions, read_neighbors_file, read_transactions_file, write_patterns,
    write_patterns_file,
};
use itemset_growth::{Miner, MinerConfig, Mode, Threshold};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "itemset-growth")]
#[command(about = "Constraint-parameterized FP-growth itemset mining")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, env = "ITEMSET_GROWTH_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plain frequent itemsets
    Frequent {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Periodic-frequent itemsets over timestamped transactions
    Periodic {
        #[command(flatten)]
        common: CommonArgs,

        /// Largest allowed gap between occurrences (count, or fraction of the database)
        #[arg(long)]
        max_period: Threshold,

        /// Transactions carry no timestamp column; use line positions instead
        #[arg(long)]
        no_timestamps: bool,
    },
    /// Spatially correlated itemsets
    Correlated {
        #[command(flatten)]
        common: CommonArgs,

        /// Neighbor file: an item followed by its neighbors on each line
        #[arg(short, long)]
        neighbors: PathBuf,

        /// Minimum ratio of pattern support to its most supported item
        #[arg(long, default_value = "0.0")]
        min_ratio: f64,
    },
    /// Frequent itemsets by expected support over label(probability) items
    Uncertain {
        #[command(flatten)]
        common: CommonArgs,

        /// Also bound the largest gap between occurrences; reads timestamps
        #[arg(long)]
        max_period: Option<Threshold>,

        /// Transactions carry no timestamp column; use line positions instead
        #[arg(long, requires = "max_period")]
        no_timestamps: bool,
    },
    /// Run a JSON-encoded mining configuration
    Run {
        #[command(flatten)]
        common: RunArgs,

        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Neighbor file, required by correlated configurations
        #[arg(short, long)]
        neighbors: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Minimum support (count, or fraction of the database when it contains a '.')
    #[arg(short = 's', long)]
    min_support: Threshold,

    /// Longest pattern to report
    #[arg(long)]
    max_length: Option<usize>,

    /// Mine root-level branches on the rayon thread pool
    #[arg(long, env = "ITEMSET_GROWTH_PARALLEL")]
    parallel: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Transaction file
    #[arg(short, long)]
    input: PathBuf,

    /// Pattern file; standard output when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Field separator of the transaction file
    #[arg(short, long, default_value = "\t")]
    delimiter: char,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,
}

impl CommonArgs {
    fn config(&self, mode: Mode) -> MinerConfig {
        let config = MinerConfig::new(self.min_support, mode).with_parallel(self.parallel);
        match self.max_length {
            Some(length) => config.with_max_pattern_length(length),
            None => config,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("itemset_growth={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let (run, config, neighbors, no_timestamps) = match cli.command {
        Command::Frequent { common } => {
            let config = common.config(Mode::Frequent);
            (common.run, config, None, false)
        }
        Command::Periodic {
            common,
            max_period,
            no_timestamps,
        } => {
            let config = common.config(Mode::Periodic { max_period });
            (common.run, config, None, no_timestamps)
        }
        Command::Correlated {
            common,
            neighbors,
            min_ratio,
        } => {
            let config = common.config(Mode::Correlated { min_ratio });
            (common.run, config, Some(neighbors), false)
        }
        Command::Uncertain {
            common,
            max_period,
            no_timestamps,
        } => {
            let config = common.config(Mode::Uncertain { max_period });
            (common.run, config, None, no_timestamps)
        }
        Command::Run {
            common,
            config,
            neighbors,
        } => {
            let text = fs::read_to_string(&config)
                .with_context(|| format!("reading configuration {}", config.display()))?;
            let parsed: MinerConfig = serde_json::from_str(&text)
                .with_context(|| format!("parsing configuration {}", config.display()))?;
            (common, parsed, neighbors, false)
        }
    };

    let mut options = ReadOptions::default().with_delimiter(run.delimiter);
    if config.mode.is_temporal() && !no_timestamps {
        options = options.with_timestamps();
    }
    if matches!(config.mode, Mode::Uncertain { .. }) {
        options = options.with_probabilities();
    }
    if run.strict {
        options = options.strict();
    }

    let (database, report) = read_transactions_file(&run.input, &options)
        .with_context(|| format!("reading transactions {}", run.input.display()))?;
    if !report.is_clean() {
        tracing::warn!(
            skipped = report.skipped.len(),
            accepted = report.accepted,
            "some transactions were skipped"
        );
    }

    let mut miner = Miner::new(config);
    if let Some(path) = neighbors {
        let neighbor_map = read_neighbors_file(&path)
            .with_context(|| format!("reading neighbors {}", path.display()))?;
        miner = miner.with_neighbors(neighbor_map);
    }
    let patterns = miner.mine(&database)?;

    match &run.output {
        Some(path) => write_patterns_file(path, &patterns, run.format)
            .with_context(|| format!("writing patterns {}", path.display()))?,
        None => write_patterns(BufWriter::new(io::stdout().lock()), &patterns, run.format)?,
    }
    tracing::info!(patterns = patterns.len(), "done");
    Ok(())
}
