use anyhow::Result;
use clap::Parser;
use mrexec::constants::{ENV_MAPPERS, ENV_REDUCERS};
use mrexec::utils::default_workers;
use mrexec::{Engine, InputPair, IntermediateEntry, MapEmitter, Phase, ReduceEmitter};
use tracing_subscriber::EnvFilter;

/// Groups `key=value` pairs by key and shows which worker handled which slice.
#[derive(Parser, Debug)]
struct Args {
    /// Pairs as key=value
    #[arg(required = true, value_parser = parse_pair)]
    pairs: Vec<InputPair>,
    #[arg(long)]
    mappers: Option<usize>,
    #[arg(long)]
    reducers: Option<usize>,
    /// Print the output as JSON
    #[arg(long)]
    json: bool,
}

fn parse_pair(s: &str) -> Result<InputPair, String> {
    let (k, v) = s.split_once('=').ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    Ok(InputPair::new(k, v))
}

fn forward(pair: &InputPair, emit: &MapEmitter<'_>) {
    if let Err(e) = emit.emit(&pair.key, &pair.value) {
        eprintln!("dropped {}={}: {}", pair.key, pair.value, e);
    }
}

fn regroup(entry: &IntermediateEntry, emit: &ReduceEmitter<'_>) {
    for v in &entry.values {
        if let Err(e) = emit.emit(&entry.key, v) {
            eprintln!("dropped {}={}: {}", entry.key, v, e);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let mappers = args.mappers.unwrap_or_else(|| default_workers(ENV_MAPPERS));
    let reducers = args.reducers.unwrap_or_else(|| default_workers(ENV_REDUCERS));

    let (output, report) = Engine::from_env().exec_with_report(&args.pairs, forward, mappers, regroup, reducers)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for entry in &output {
            println!("{} -> [{}]", entry.key, entry.values.join(", "));
        }
    }
    for phase in [Phase::Map, Phase::Reduce] {
        for w in report.workers_of(phase) {
            eprintln!("{} worker {}: items {:?} emits {} rejected {}", phase, w.worker, w.range, w.emits, w.rejected);
        }
    }
    Ok(())
}
