//! risk-runner: reference driver for the transaction risk engine.
//!
//! Usage:
//!   risk-runner --count 5000 --seed 42 --db alerts.db
//!   risk-runner --input txns.jsonl --config engine.json --top 10
//!   risk-runner --stdin            (JSON lines in, ProcessingResult lines out)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use txrisk_core::{
    alert::{AlertSink, LogSink, StoreSink},
    clock::SystemClock,
    config::EngineConfig,
    event::ProcessingResult,
    generator::{GeneratorConfig, TransactionGenerator},
    store::AlertStore,
    types::Transaction,
    EngineError, FraudEngine,
};

/// One ingested line. A missing timestamp is stamped by the engine clock.
#[derive(serde::Deserialize)]
struct IngestLine {
    user_id:  String,
    amount:   f64,
    location: String,
    #[serde(default)]
    counterparty_id: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let count = parse_arg(&args, "--count", 5_000usize);
    let top = parse_arg(&args, "--top", 5usize);
    let stdin_mode = args.iter().any(|a| a == "--stdin");
    let input = flag_value(&args, "--input");
    let config_path = flag_value(&args, "--config");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");

    let config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = FraudEngine::try_new(config, Arc::new(SystemClock))?;

    let store = AlertStore::open(db)?;
    store.migrate()?;
    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    let mut sinks: Vec<Box<dyn AlertSink>> = vec![
        Box::new(LogSink),
        Box::new(StoreSink::new(store, run_id.clone())),
    ];

    if stdin_mode {
        return run_stdin_loop(&engine, &mut sinks);
    }

    println!("risk-runner");
    println!("  run_id:  {run_id}");
    println!("  db:      {db}");
    match input {
        Some(path) => println!("  input:   {path}"),
        None => println!("  input:   synthetic ({count} txns, seed {seed})"),
    }
    println!();

    let processed = match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Cannot open {path}"))?;
            let mut processed = 0;
            for (lineno, line) in BufReader::new(file).lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let parsed: IngestLine = serde_json::from_str(&line)
                    .with_context(|| format!("{path}:{}: malformed transaction", lineno + 1))?;
                match ingest(&engine, parsed) {
                    Ok(result) => deliver(&mut sinks, &result)?,
                    Err(e) => log::error!("{path}:{}: rejected: {e}", lineno + 1),
                }
                processed += 1;
            }
            processed
        }
        None => {
            let stream = TransactionGenerator::new(seed, GeneratorConfig::default()).take(count);
            for txn in stream {
                let result = engine.process(&txn)?;
                deliver(&mut sinks, &result)?;
            }
            count
        }
    };

    print_summary(&engine, processed, top)
}

fn ingest(engine: &FraudEngine, line: IngestLine) -> Result<ProcessingResult, EngineError> {
    match line.timestamp {
        Some(timestamp) => engine.process(&Transaction::new(
            line.user_id,
            line.amount,
            line.location,
            line.counterparty_id,
            timestamp,
        )),
        None => engine.process_now(
            &line.user_id,
            line.amount,
            &line.location,
            line.counterparty_id.as_deref(),
        ),
    }
}

fn deliver(sinks: &mut [Box<dyn AlertSink>], result: &ProcessingResult) -> Result<()> {
    for notification in &result.notifications {
        for sink in sinks.iter_mut() {
            sink.deliver(notification)?;
        }
    }
    Ok(())
}

fn run_stdin_loop(engine: &FraudEngine, sinks: &mut [Box<dyn AlertSink>]) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let line: IngestLine = match serde_json::from_str(&buffer) {
            Ok(l) => l,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match ingest(engine, line) {
            Ok(result) => {
                deliver(sinks, &result)?;
                writeln!(stdout, "{}", serde_json::to_string(&result)?)?;
            }
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(engine: &FraudEngine, processed: usize, top: usize) -> Result<()> {
    let snapshot = engine.snapshot();

    println!("=== RUN SUMMARY ===");
    println!("  processed:       {processed}");
    println!("  tracked users:   {}", snapshot.tracked_users);
    println!("  history entries: {}", snapshot.history_entries);
    println!("  window entries:  {}", snapshot.window_entries);
    println!("  graph:           {} nodes, {} edges", snapshot.graph_nodes, snapshot.graph_edges);
    println!("  suspicions:      {}", snapshot.queued_suspicions);

    println!();
    println!("=== TOP {top} SUSPICIONS ===");
    for rank in 1..=top {
        match engine.pop_max() {
            Ok(record) => println!(
                "  {rank:>2}. {:<12} ${:>12.2}  risk {:.2}",
                record.user_id, record.amount, record.risk_score
            ),
            Err(EngineError::EmptyQueue) => {
                if rank == 1 {
                    println!("  (queue empty)");
                }
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    println!("=== COUNTERPARTY RINGS ===");
    let members = engine.ring_members();
    if members.is_empty() {
        println!("  (no rings)");
    } else {
        println!("  {} users on at least one ring", members.len());
        for user in members.iter().take(top) {
            if let Some(ring) = engine.cycle_through(user) {
                println!("  {}", ring.join(" -> "));
            }
        }
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
