use anyhow::Context;
use clap::{ArgGroup, Parser};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use urania::{estimate_tokens, AnalysisRequest, Body, TransitEngine};

#[derive(Parser, Debug)]
#[command(author, version, about = "Derive and summarize transits from sampled positions")]
#[command(group(ArgGroup::new("mode").args(["full", "estimate", "planet"])))]
struct Args {
    /// Engine config (TOML with an [engine] table). Defaults to configs/urania.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the output reducer and emit every derived event.
    #[arg(long)]
    full: bool,

    /// Report approximate token counts without running the analysis.
    #[arg(long)]
    estimate: bool,

    /// Report a single planet ("Saturno", "saturn", ...).
    #[arg(long, value_name = "NAME")]
    planet: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Request documents (JSON).
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Reduced,
    Full,
    Estimate,
    Planet(Body),
}

fn read_request(path: &Path) -> anyhow::Result<AnalysisRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn run(engine: &TransitEngine, mode: Mode, path: &Path) -> anyhow::Result<serde_json::Value> {
    let request = read_request(path)?;
    let value = match mode {
        Mode::Reduced => serde_json::to_value(engine.analyze(&request)?)?,
        Mode::Full => serde_json::to_value(engine.analyze_full(&request)?)?,
        Mode::Planet(body) => serde_json::to_value(engine.analyze_planet(&request, body)?)?,
        Mode::Estimate => serde_json::to_value(estimate_tokens(&request, engine.config()))?,
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = urania_config::load_engine_config(args.config.as_deref())?;
    let engine = Arc::new(TransitEngine::new(config)?);

    let mode = match (&args.planet, args.full, args.estimate) {
        (Some(name), _, _) => Mode::Planet(
            Body::from_name(name).ok_or_else(|| anyhow::anyhow!("Unknown planet {:?}", name))?,
        ),
        (None, true, _) => Mode::Full,
        (None, false, true) => Mode::Estimate,
        (None, false, false) => Mode::Reduced,
    };
    info!("running {:?} over {} input(s)", mode, args.inputs.len());

    let handles: Vec<_> = args
        .inputs
        .iter()
        .cloned()
        .map(|path| {
            let engine = Arc::clone(&engine);
            tokio::task::spawn_blocking(move || {
                let result = run(&engine, mode, &path);
                (path, result)
            })
        })
        .collect();

    let mut failures = 0;
    for handle in handles {
        let (path, result) = handle.await.context("Analysis task panicked")?;
        match result {
            Ok(value) => {
                let text = if args.pretty {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                println!("{}", text);
            }
            Err(e) => {
                eprintln!("[urania] {}: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} input(s) failed", failures, args.inputs.len());
    }
    Ok(())
}
