use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hashsum::Algorithm;

#[derive(Parser)]
#[command(
    name = "hashsum",
    version,
    about = "Print MD5 or SHA-1 checksums, one line per input",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Digest algorithm (md5 or sha1), md5 if omitted
    #[arg(long, short)]
    algorithm: Option<Algorithm>,
    #[command(flatten)]
    inputs: InputArgs,
}

/// Command line when invoked as `md5sum` or `sha1sum`: the name fixes the algorithm, so every
/// operand is a file, including ones named `md5` or `sha1`.
#[derive(Parser)]
#[command(version, about = "Print checksums, one line per input")]
struct SumCli {
    #[command(flatten)]
    inputs: InputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute MD5 (128-bit) digests
    Md5(InputArgs),
    /// Compute SHA-1 (160-bit) digests
    Sha1(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Hash every regular file beneath directory operands
    #[arg(long, short)]
    recursive: bool,
    /// Number of worker threads (defaults to one per CPU)
    #[arg(long, short)]
    jobs: Option<usize>,
    /// Files to hash; "-" or no operands reads standard input
    files: Vec<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let invoked_as = std::env::args_os()
        .next()
        .and_then(|arg0| Algorithm::from_program_name(&arg0.to_string_lossy()));

    let (algorithm, args) = match invoked_as {
        Some(algorithm) => (algorithm, SumCli::parse().inputs),
        None => {
            let cli = Cli::parse();
            match cli.command {
                Some(Commands::Md5(args)) => (Algorithm::Md5, args),
                Some(Commands::Sha1(args)) => (Algorithm::Sha1, args),
                None => (cli.algorithm.unwrap_or(Algorithm::Md5), cli.inputs),
            }
        }
    };

    let inputs = hashsum::collect_inputs(&args.files, args.recursive);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .context("Failed to build worker pool")?;

    let start = Instant::now();
    let outcomes = tokio::task::spawn_blocking(move || {
        pool.install(|| hashsum::hash_inputs(algorithm, inputs))
    })
    .await
    .context("Hashing task panicked")?;

    let summary = hashsum::write_report(&outcomes, &mut io::stdout().lock(), &mut io::stderr().lock())
        .context("Failed to write digests")?;

    tracing::debug!(
        %algorithm,
        files_hashed = summary.files_hashed,
        files_failed = summary.files_failed,
        bytes_hashed = summary.bytes_hashed,
        elapsed_secs = start.elapsed().as_secs_f64(),
        "done"
    );

    Ok(if summary.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
