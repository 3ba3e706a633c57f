//! `lfg`: converts UD treebanks into LFG f-structures.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lfg_composer::{Composer, ComposerConfig, FStructure, Rejection, Taxonomy};
use lfg_protocol::{Sentence, Treebank};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use rkyv::{AlignedVec, Deserialize};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "lfg", version, about = "Universal Dependencies to LFG f-structure converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose an f-structure for every sentence of a treebank
    Convert {
        /// CoNLL-U file, or a treebank archive written by `compile`
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Add CASE, GEN, NUM, PERS, MOOD, TENSE and ASP from the FEATS column
        #[arg(long)]
        features: bool,

        /// JSON relation taxonomy (defaults to the bundled HDT tables)
        #[arg(long, value_name = "FILE")]
        taxonomy: Option<PathBuf>,

        /// Print accepted/rejected counts to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Write a binary treebank archive from a CoNLL-U file or a JSON treebank
    Compile {
        /// `.json` files are read as a serialized treebank, anything else as CoNLL-U
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON object per line
    Json,
    /// Attribute-value matrices separated by blank lines
    Avm,
}

#[derive(Debug, Default, Serialize)]
struct Stats {
    sentences: usize,
    accepted: usize,
    rejected: usize,
    rejections: BTreeMap<&'static str, usize>,
}

impl Stats {
    fn collect(results: &[Result<FStructure, Rejection>]) -> Self {
        let mut stats = Stats {
            sentences: results.len(),
            ..Stats::default()
        };
        for result in results {
            match result {
                Ok(_) => stats.accepted += 1,
                Err(rejection) => {
                    stats.rejected += 1;
                    *stats.rejections.entry(rejection.kind()).or_default() += 1;
                }
            }
        }
        stats
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            format,
            features,
            taxonomy,
            stats,
        } => cmd_convert(&input, format, features, taxonomy.as_deref(), stats),
        Commands::Compile { input, output } => cmd_compile(&input, &output),
    }
}

fn cmd_convert(
    input: &Path,
    format: OutputFormat,
    features: bool,
    taxonomy: Option<&Path>,
    show_stats: bool,
) -> Result<()> {
    let taxonomy = match taxonomy {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("failed to load taxonomy {}", path.display()))?,
        None => Taxonomy::hdt(),
    };
    let composer = Composer::new(
        taxonomy,
        ComposerConfig {
            feature_attributes: features,
        },
    );

    let sentences = read_sentences(input)?;
    tracing::info!(sentences = sentences.len(), "composing f-structures");
    let results = composer.compose_batch(&sentences);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for fs in results.iter().filter_map(|r| r.as_ref().ok()) {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut out, fs)?;
                writeln!(out)?;
            }
            OutputFormat::Avm => writeln!(out, "{}\n", fs)?,
        }
    }
    out.flush()?;

    let stats = Stats::collect(&results);
    tracing::info!(accepted = stats.accepted, rejected = stats.rejected, "done");
    if show_stats {
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

fn cmd_compile(input: &Path, output: &Path) -> Result<()> {
    let treebank = load_treebank(input)?;
    let tokens: usize = treebank.sentences.iter().map(|s| s.tokens.len()).sum();
    tracing::info!(
        version = treebank.version,
        sentences = treebank.sentences.len(),
        tokens,
        "compiling treebank"
    );

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&treebank)
        .map_err(|e| anyhow!("failed to archive treebank: {:?}", e))?;
    let bytes = serializer.into_serializer().into_inner();

    fs::write(output, &bytes).with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(output = %output.display(), bytes = bytes.len(), "archive written");
    Ok(())
}

fn load_treebank(path: &Path) -> Result<Treebank> {
    tracing::info!(input = %path.display(), "reading treebank");
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return Ok(Treebank::new(parse_file(path)?));
    }

    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let treebank: Treebank = serde_json::from_str(&text)
        .with_context(|| format!("invalid JSON treebank {}", path.display()))?;
    if treebank.version != Treebank::VERSION {
        return Err(anyhow!(
            "JSON treebank version {} is not supported (expected {})",
            treebank.version,
            Treebank::VERSION
        ));
    }
    Ok(treebank)
}

/// Archives are recognised by their `.rkyv` extension; anything else is
/// read as CoNLL-U.
fn read_sentences(path: &Path) -> Result<Vec<Sentence>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("rkyv") => read_archive(path),
        _ => parse_file(path),
    }
}

fn parse_file(path: &Path) -> Result<Vec<Sentence>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    lfg_parser::parse_conllu(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_archive(path: &Path) -> Result<Vec<Sentence>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    // Archived data must be aligned before validation
    let mut bytes = AlignedVec::with_capacity(raw.len());
    bytes.extend_from_slice(&raw);

    let archived = rkyv::check_archived_root::<Treebank>(&bytes)
        .map_err(|e| anyhow!("invalid treebank archive {}: {:?}", path.display(), e))?;
    if archived.version != Treebank::VERSION {
        return Err(anyhow!(
            "treebank archive version {} is not supported (expected {})",
            archived.version,
            Treebank::VERSION
        ));
    }

    let treebank: Treebank = archived
        .deserialize(&mut rkyv::Infallible)
        .map_err(|e| anyhow!("failed to load treebank archive: {:?}", e))?;
    Ok(treebank.sentences)
}
