use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

use rivelens::runtime::memory::MemoryFile;

#[derive(Parser, Debug)]
#[command(name = "rivelens", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile a runtime dump and write the export document as JSON.
    Inspect(InspectArgs),
    /// List discovered blueprints with their fingerprints.
    Catalog(LoadArgs),
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Input runtime dump (JSON).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Options file (JSON). Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hard ceiling on blueprint probes.
    #[arg(long)]
    max_probes: Option<usize>,

    /// Consecutive failed probes that end blueprint discovery.
    #[arg(long)]
    max_misses: Option<usize>,

    /// Maximum nesting depth expanded below each root instance.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum instances expanded below each root instance.
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Print the SHA-256 of the input dump.
    #[arg(long)]
    dump_digest: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    load: LoadArgs,

    /// Output path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn read_options(args: &LoadArgs) -> anyhow::Result<rivelens::InspectOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read options '{}'", path.display()))?;
            rivelens::InspectOptions::from_json_str(&s)
                .with_context(|| format!("parse options '{}'", path.display()))?
        }
        None => rivelens::InspectOptions::default(),
    };

    if let Some(n) = args.max_probes {
        opts.probe.max_probes = n;
    }
    if let Some(n) = args.max_misses {
        opts.probe.max_consecutive_misses = n;
    }
    if let Some(n) = args.max_depth {
        opts.max_depth = n;
    }
    if let Some(n) = args.max_nodes {
        opts.max_nodes = n;
    }
    opts.validate()?;
    Ok(opts)
}

fn load_file(args: &LoadArgs) -> anyhow::Result<MemoryFile> {
    let file = MemoryFile::from_path(&args.in_path).map_err(report_fatal)?;

    if args.dump_digest {
        let bytes = std::fs::read(&args.in_path)
            .with_context(|| format!("read '{}' for digest", args.in_path.display()))?;
        eprintln!("{}  {}", sha256_hex(&bytes), args.in_path.display());
    }

    Ok(file)
}

/// Show the `error` / `details` pair, then hand the error back for the exit status.
fn report_fatal(err: rivelens::InspectError) -> anyhow::Error {
    if let Ok(s) = serde_json::to_string_pretty(&err.report()) {
        eprintln!("{s}");
    }
    err.into()
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let opts = read_options(&args.load)?;
    let file = load_file(&args.load)?;

    let doc = rivelens::produce_document(&file, &opts).map_err(report_fatal)?;
    let json = doc.to_json_pretty()?;

    match &args.out {
        Some(out) => {
            write_output(out, &json)?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_catalog(args: LoadArgs) -> anyhow::Result<()> {
    let opts = read_options(&args)?;
    let file = load_file(&args)?;

    let catalog = rivelens::build_catalog(&file, opts.probe);
    for bp in catalog.blueprints() {
        println!("{:>4}  {:<24} {}", bp.index, bp.name, bp.fingerprint);
    }

    let stats = catalog.stats();
    eprintln!(
        "{} blueprint(s); {} probe(s), {} miss(es), stopped by {:?}",
        catalog.len(),
        stats.probes,
        stats.misses,
        stats.stopped_by
    );
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    sha2::Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
