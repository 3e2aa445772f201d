use anyhow::{bail, Context, Result};
use clap::Parser;
use mrexec::constants::{ENV_MAPPERS, ENV_REDUCERS};
use mrexec::utils::default_workers;
use mrexec::{Engine, ExecReport, InputPair, IntermediateEntry, Limits, MapEmitter, Mapper, MrOutput, ReduceEmitter, Reducer};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Input text files
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Mapper threads (default: MREXEC_MAPPERS, else CPU count)
    #[arg(long)]
    mappers: Option<usize>,
    /// Reducer threads (default: MREXEC_REDUCERS, else CPU count)
    #[arg(long)]
    reducers: Option<usize>,
    /// Longest word kept, in bytes
    #[arg(long, default_value_t = 32)]
    max_word_len: usize,
    /// Distinct words accepted before the map phase starts rejecting
    #[arg(long, default_value_t = 65_536)]
    max_words: usize,
    /// Print the output as JSON
    #[arg(long)]
    json: bool,
    /// Print the execution report as JSON on stderr
    #[arg(long)]
    report: bool,
}

struct WordcountMapper {
    word_re: Regex,
}

impl Mapper for WordcountMapper {
    fn do_map(&self, pair: &InputPair, emit: &MapEmitter<'_>) {
        let mut local: HashMap<String, u64> = HashMap::new();
        for m in self.word_re.find_iter(&pair.value) {
            *local.entry(m.as_str().to_lowercase()).or_insert(0) += 1;
        }
        for (word, n) in local {
            // rejected words are counted in the map stats
            let _ = emit.emit(&word, &n.to_string());
        }
    }
}

struct WordcountReducer;

impl Reducer for WordcountReducer {
    fn do_reduce(&self, entry: &IntermediateEntry, emit: &ReduceEmitter<'_>) {
        let sum: u64 = entry.values.iter().filter_map(|v| v.parse::<u64>().ok()).sum();
        if let Err(e) = emit.emit(&entry.key, &sum.to_string()) {
            error!(word = %entry.key, sum, error = %e, "count dropped");
        }
    }
}

fn read_input(files: &[PathBuf]) -> Result<Vec<InputPair>> {
    let mut input = Vec::new();
    for path in files {
        let content = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        for line in content.lines() {
            input.push(InputPair::new(input.len().to_string(), line));
        }
    }
    Ok(input)
}

/// A u64 count never needs more than 20 digits.
const MAX_COUNT_DIGITS: usize = 20;

/// Sizes the limits from the input: line-index keys and whole lines on the
/// map side, words and decimal counts on the reduce side.
fn wordcount_limits(input: &[InputPair], max_word_len: usize, max_words: usize) -> Limits {
    let longest_line = input.iter().map(|p| p.value.len()).max().unwrap_or(0);
    let index_len = input.len().to_string().len();
    Limits::default()
        .with_max_key_len(max_word_len.max(index_len))
        .with_max_value_len(longest_line.max(MAX_COUNT_DIGITS))
        .with_max_intermediate_keys(max_words)
        .with_max_values_per_key(input.len().max(1))
}

fn count_words(engine: &Engine, input: &[InputPair], mappers: usize, reducers: usize) -> Result<(MrOutput, ExecReport)> {
    let word_re = Regex::new(r"[A-Za-z0-9_']+")?;
    info!(limits = ?engine.limits(), "wordcount limits");
    engine.exec_with_report(input, WordcountMapper { word_re }, mappers, WordcountReducer, reducers)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let input = read_input(&args.files)?;
    let mappers = args.mappers.unwrap_or_else(|| default_workers(ENV_MAPPERS));
    let reducers = args.reducers.unwrap_or_else(|| default_workers(ENV_REDUCERS));

    info!(files = args.files.len(), lines = input.len(), mappers, reducers, "wordcount starting");

    let engine = Engine::new(wordcount_limits(&input, args.max_word_len, args.max_words));
    let (output, report) = count_words(&engine, &input, mappers, reducers)?;
    if report.reduce.rejected > 0 {
        bail!("{} word counts were rejected by the final store", report.reduce.rejected);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for entry in &output {
            println!("{}\t{}", entry.key, entry.values.join(","));
        }
    }
    if args.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
