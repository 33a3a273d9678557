use std::fs;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use route_core::normalize::{
    normalize_alternatives, normalize_directions, normalize_distance_matrix,
};
use route_core::{decode, DecodedResponse, MatrixShape, NormalizerConfig, ResponseKind, RouteError};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the route reconciliation workspace",
    long_about = "A unified CLI for CI checks, benchmarks, and inspecting saved\n\
                  Directions / Distance Matrix payloads."
)]
struct Cli {
    /// Log level for the task runner itself
    #[arg(long, global = true, env = "ROUTE_LOG_LEVEL", default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Decode a saved response body and print the normalized model as JSON
    Inspect {
        /// Path to the raw JSON body
        path: PathBuf,
        /// Which API produced the body
        #[arg(value_enum, long, default_value_t = PayloadKind::Directions)]
        kind: PayloadKind,
        /// Normalizer config file (JSON); defaults apply when omitted
        #[arg(long, env = "ROUTE_NORMALIZER_CONFIG")]
        config: Option<PathBuf>,
        /// Override the configured route index
        #[arg(long)]
        route_index: Option<usize>,
        /// Normalize every alternative route instead of one
        #[arg(long)]
        all_routes: bool,
        /// Expected matrix shape as ORIGINSxDESTINATIONS, e.g. 1x2
        #[arg(long, value_parser = parse_shape)]
        shape: Option<MatrixShape>,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum PayloadKind {
    Directions,
    DistanceMatrix,
}

impl From<PayloadKind> for ResponseKind {
    fn from(kind: PayloadKind) -> Self {
        match kind {
            PayloadKind::Directions => Self::Directions,
            PayloadKind::DistanceMatrix => Self::DistanceMatrix,
        }
    }
}

fn parse_shape(raw: &str) -> Result<MatrixShape, String> {
    let (origins, destinations) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected ORIGINSxDESTINATIONS, got '{raw}'"))?;
    let origins = origins
        .trim()
        .parse()
        .map_err(|err| format!("invalid origin count '{origins}': {err}"))?;
    let destinations = destinations
        .trim()
        .parse()
        .map_err(|err| format!("invalid destination count '{destinations}': {err}"))?;
    Ok(MatrixShape::new(origins, destinations))
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

/// Run `program` and exit with its status code if it fails.
fn run(program: &str, args: &[&str]) {
    eprintln!("+ {program} {}", args.join(" "));
    let status = Command::new(program)
        .args(args)
        .status()
        .unwrap_or_else(|err| fail(format!("failed to execute {program}: {err}")));
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

/// `cargo bench` on the route_core performance suite, with extra Criterion args.
fn bench_route_core(criterion_args: &[&str]) {
    let mut args = vec!["bench", "-p", "route_core", "--bench", "performance"];
    if !criterion_args.is_empty() {
        args.push("--");
        args.extend_from_slice(criterion_args);
    }
    run("cargo", &args);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    exit(1);
}

// ── inspect ────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> NormalizerConfig {
    let Some(path) = path else {
        return NormalizerConfig::default();
    };
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|err| fail(format!("failed to read '{}': {err}", path.display())));
    NormalizerConfig::from_json_str(&raw)
        .unwrap_or_else(|err| fail(format!("invalid config '{}': {err}", path.display())))
}

fn inspect(
    bytes: &[u8],
    kind: ResponseKind,
    config: &NormalizerConfig,
    all_routes: bool,
    shape: Option<MatrixShape>,
) -> Result<serde_json::Value, RouteError> {
    let value = match decode(bytes, kind)? {
        DecodedResponse::Directions(result) => {
            info!(routes = result.routes.len(), "decoded directions body");
            if all_routes {
                serde_json::to_value(normalize_alternatives(&result, config)?)
            } else {
                serde_json::to_value(normalize_directions(&result, config)?)
            }
        }
        DecodedResponse::DistanceMatrix(result) => {
            info!(rows = result.rows.len(), "decoded distance matrix body");
            serde_json::to_value(normalize_distance_matrix(&result, shape)?)
        }
    };
    Ok(value.unwrap_or_else(|err| fail(format!("failed to serialize output: {err}"))))
}

fn run_inspect(
    path: &Path,
    kind: PayloadKind,
    config_path: Option<&Path>,
    route_index: Option<usize>,
    all_routes: bool,
    shape: Option<MatrixShape>,
) {
    let mut config = load_config(config_path);
    if let Some(index) = route_index {
        config = config.with_route_index(index);
    }
    if let Err(err) = config.validate() {
        fail(format!("invalid config: {err}"));
    }

    let bytes = fs::read(path)
        .unwrap_or_else(|err| fail(format!("failed to read '{}': {err}", path.display())));
    info!(path = %path.display(), bytes = bytes.len(), "inspecting payload");

    match inspect(&bytes, kind.into(), &config, all_routes, shape) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(err) => fail(format!("failed to serialize output: {err}")),
        },
        Err(err) => {
            if err.is_retryable() {
                eprintln!("note: the upstream status is transient; a retry may succeed");
            }
            fail(err);
        }
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run("cargo", &["fmt", "--all", "--", "--check"]);

    step("Clippy");
    let clippy = ["clippy", "--all-targets", "--all-features", "--", "-D", "warnings"];
    run("cargo", &clippy);

    step("Test route_core");
    run("cargo", &["test", "-p", "route_core"]);

    step("Test route_core with the http fetcher");
    run("cargo", &["test", "-p", "route_core", "--features", "http"]);
}

fn ci_bench() {
    step("Run benchmarks");
    bench_route_core(&[]);
}

/// Benchmark the committed tree as a baseline, then the working tree against it.
fn bench_compare() {
    const BASELINE: &str = "committed";

    let criterion_dir = Path::new("target/criterion");
    if criterion_dir.exists() {
        step("Clearing previous Criterion results");
        if let Err(err) = fs::remove_dir_all(criterion_dir) {
            fail(format!("failed to remove {}: {err}", criterion_dir.display()));
        }
    }

    step("Stashing working tree");
    run("git", &["stash", "push", "-m", "xtask bench-compare"]);

    step("Benchmarking committed tree");
    bench_route_core(&["--save-baseline", BASELINE]);

    step("Restoring working tree");
    run("git", &["stash", "pop"]);

    step("Benchmarking working tree against baseline");
    bench_route_core(&["--baseline", BASELINE]);
}

// ── main ───────────────────────────────────────────────────────────

fn init_tracing(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: tracing subscriber already installed");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match cli.command {
        Commands::Bench => bench_route_core(&[]),
        Commands::BenchCompare => bench_compare(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::Inspect {
            path,
            kind,
            config,
            route_index,
            all_routes,
            shape,
        } => {
            run_inspect(
                &path,
                kind,
                config.as_deref(),
                route_index,
                all_routes,
                shape,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_parses_origins_by_destinations() {
        let shape = parse_shape("3x2").expect("valid shape");
        assert_eq!(shape, MatrixShape::new(3, 2));
        assert!(parse_shape("3").is_err());
        assert!(parse_shape("ax2").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
