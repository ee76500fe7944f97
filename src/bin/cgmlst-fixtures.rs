//! cgmlst-fixtures CLI — write synthetic genome fixtures
//!
//! Commands:
//!   cgmlst-fixtures generate — grow a population and write it as a fixture
//!   cgmlst-fixtures catalog  — write the hand-written parser fixtures
//!   cgmlst-fixtures limit    — keep only the first documents of a fixture

use cgmlst_fixtures::fixture::catalog;
use cgmlst_fixtures::storage::{self, read_auxiliary_path};
use cgmlst_fixtures::{
    DocumentSink, EmitMode, FixtureError, FixtureFile, FixtureGenerator, GeneratorConfig, Result,
};
use clap::{Args, Parser, Subcommand};
use log::error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cgmlst-fixtures")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a synthetic population and write it as a fixture
    Generate(GenerateArgs),

    /// Write the hand-written parser fixtures
    Catalog {
        /// Directory to write `<name>.jsonl` files into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Fixtures to write; all when omitted
        names: Vec<String>,
    },

    /// Keep only the first documents of a fixture
    Limit {
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        /// Source fixture; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Output fixture path (JSON lines)
    #[arg(short, long)]
    out: PathBuf,

    /// JSON generator config; defaults reproduce the canonical fixture
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Loci per profile
    #[arg(long)]
    loci: Option<usize>,

    /// Number of profiles
    #[arg(long)]
    size: Option<usize>,

    /// Emit only public genomes
    #[arg(long)]
    visible_only: bool,

    /// Append to an existing fixture instead of replacing it
    #[arg(long)]
    append: bool,

    /// Gzipped JSON-lines documents to splice in before the genomes
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Also write the population's ancestry as JSON, before the fixture is committed
    #[arg(long)]
    lineage: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate(args) => cmd_generate(args),
        Commands::Catalog { out_dir, names } => cmd_catalog(&out_dir, &names),
        Commands::Limit { count, input, out } => cmd_limit(count, input, &out),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.apply_overrides(args.seed, args.loci, args.size);
    if args.visible_only {
        config.visible_only = true;
    }

    let auxiliary = match &args.scores {
        Some(path) => read_auxiliary_path(path)?,
        None => Vec::new(),
    };
    let mode = if args.append { EmitMode::Append } else { EmitMode::Create };

    let generator = FixtureGenerator::new(config)?;
    let (fixture, report) = generator.write_with_lineage(auxiliary, &args.out, mode, args.lineage.as_deref())?;

    println!("\n  Fixture: {}", args.out.display());
    println!("  {}", "=".repeat(40));
    println!("  Documents:  {}", report.documents);
    println!("  Genomes:    {} ({} public)", report.genomes, fixture.visible_count());
    println!("  Auxiliary:  {}", report.auxiliary);
    println!("  Draws:      {}", fixture.draws);
    println!("  SHA-256:    {}", report.digest);
    Ok(())
}

fn cmd_catalog(out_dir: &Path, names: &[String]) -> Result<()> {
    let selected: Vec<String> = if names.is_empty() {
        catalog::names().iter().map(|n| n.to_string()).collect()
    } else {
        names.to_vec()
    };

    for name in &selected {
        let documents = catalog::build(name).ok_or_else(|| FixtureError::UnknownFixture(name.clone()))?;
        let path = out_dir.join(format!("{}.jsonl", name));
        let mut file = FixtureFile::open(&path, EmitMode::Create)?;
        for document in &documents {
            file.write_document(document)?;
        }
        file.commit()?;
        println!("  Wrote {} ({} documents)", path.display(), documents.len());
    }
    Ok(())
}

fn cmd_limit(count: usize, input: Option<PathBuf>, out: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(out)?);
    let copied = match input {
        Some(path) => storage::limit_documents(BufReader::new(File::open(path)?), writer, count)?,
        None => storage::limit_documents(io::stdin().lock(), writer, count)?,
    };
    println!("  Kept {} documents in {}", copied, out.display());
    Ok(())
}
