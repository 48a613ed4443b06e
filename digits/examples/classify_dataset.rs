//! Classify an IDX test set against an IDX training set and report accuracy

use clap::{Parser, ValueEnum};
use digits::{evaluate, open, open_mmap, FileReader, KnnClassifier, KnnConfig, MmapReader, VotePolicy};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Digits CLI - k-nearest-neighbor classification of IDX digit datasets")]
struct Cli {
    /// Training image file (idx3-ubyte)
    train_images: PathBuf,

    /// Training label file (idx1-ubyte)
    train_labels: PathBuf,

    /// Test image file (idx3-ubyte)
    test_images: PathBuf,

    /// Test label file (idx1-ubyte)
    test_labels: PathBuf,

    /// Number of neighbors consulted per query
    #[arg(short, long, default_value_t = 5)]
    k: usize,

    /// Vote policy
    #[arg(long, value_enum, default_value_t = Policy::Weighted)]
    policy: Policy,

    /// Only classify the first N test records
    #[arg(long)]
    limit: Option<usize>,

    /// Read files through memory maps instead of buffered streams
    #[arg(long)]
    mmap: bool,

    /// Evaluate distances on a single thread
    #[arg(long)]
    sequential: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Weighted,
    Nearest,
    Majority,
}

impl From<Policy> for VotePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Weighted => VotePolicy::Weighted,
            Policy::Nearest => VotePolicy::Nearest,
            Policy::Majority => VotePolicy::Majority,
        }
    }
}

enum Source {
    Buffered(FileReader),
    Mapped(MmapReader),
}

impl Source {
    fn open(images: &Path, labels: &Path, mmap: bool) -> digits::Result<Self> {
        Ok(if mmap {
            Source::Mapped(open_mmap(images, labels)?.with_tracing())
        } else {
            Source::Buffered(open(images, labels)?.with_tracing())
        })
    }

    fn read(self, limit: Option<usize>) -> digits::Result<Vec<digits::Bitmap>> {
        match self {
            Source::Buffered(mut reader) => reader.read_many(limit.unwrap_or(reader.remaining())),
            Source::Mapped(mut reader) => reader.read_many(limit.unwrap_or(reader.remaining())),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let training = Source::open(&cli.train_images, &cli.train_labels, cli.mmap)?.read(None)?;
    let test = Source::open(&cli.test_images, &cli.test_labels, cli.mmap)?.read(cli.limit)?;
    let load_time = start.elapsed();

    let config = KnnConfig::with_k(cli.k)
        .with_policy(cli.policy.into())
        .with_parallel(!cli.sequential);
    let classifier = KnnClassifier::new(training, config)?;

    let start = Instant::now();
    let evaluation = evaluate(&classifier, &test)?;
    let classify_time = start.elapsed();

    if cli.json {
        let report = serde_json::json!({
            "training": classifier.training().len(),
            "k": cli.k,
            "evaluation": evaluation,
            "accuracy": evaluation.accuracy(),
            "load_ms": load_time.as_secs_f64() * 1000.0,
            "classify_ms": classify_time.as_secs_f64() * 1000.0,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Loaded {} training and {} test records in {load_time:.2?}",
            classifier.training().len(),
            test.len()
        );
        println!(
            "Accuracy Rate: {:.2} Number of errors: {} ({} unknown)",
            evaluation.accuracy(),
            evaluation.errors,
            evaluation.unknown
        );
        println!("Classification completed in {classify_time:.2?}");
    }

    Ok(())
}
