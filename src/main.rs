use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use shannon_fano::{CodecConfig, InputSource, ShannonFano};

/// Shannon-Fano coder/decoder
#[derive(Parser, Debug)]
#[clap(author, version, about = "Shannon-Fano coder/decoder", long_about = None)]
struct Args {
    /// Encode data (default)
    #[clap(short = 'e', long = "encode", conflicts_with_all = &["decode", "show"])]
    encode: bool,

    /// Decode data
    #[clap(short = 'd', long = "decode", conflicts_with = "show")]
    decode: bool,

    /// Print the dictionary as JSON and exit
    #[clap(short = 's', long = "show")]
    show: bool,

    /// Dictionary file
    #[clap(short = 't', long = "dict", value_name = "FILE")]
    dict: PathBuf,

    /// Input file (default: stdin)
    #[clap(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[clap(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON codec configuration
    #[clap(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a JSON summary to stderr when done
    #[clap(long = "stats")]
    stats: bool,

    /// Log verbosity, 0 (off) to 5 (trace)
    #[clap(short = 'v', long = "verbose", default_value_t = 2)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => Level::ERROR,
        2 => Level::WARN,
        3 => Level::INFO,
        4 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // Payload may go to stdout, so logs always go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => CodecConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CodecConfig::default(),
    };
    let codec = ShannonFano::new(config);

    if args.show {
        let dict = File::open(&args.dict)
            .with_context(|| format!("Failed to open dictionary file for reading: {}", args.dict.display()))?;
        let dictionary = codec.inspect(dict).context("Invalid dictionary")?;
        serde_json::to_writer_pretty(io::stdout().lock(), &dictionary)?;
        println!();
        return Ok(());
    }

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(create(path, "output")?),
        None => Box::new(io::stdout().lock()),
    };

    let summary = if args.decode && !args.encode {
        let dict = File::open(&args.dict)
            .with_context(|| format!("Failed to open dictionary file for reading: {}", args.dict.display()))?;
        let input: Box<dyn Read> = match &args.input {
            Some(path) => Box::new(open(path)?),
            None => Box::new(io::stdin().lock()),
        };
        info!("Decoding...");
        let summary = codec.decode(input, dict, output).context("Decoding failed")?;
        info!("Decoding completed.");
        serde_json::to_string(&summary)?
    } else {
        let dict = create(&args.dict, "dictionary")?;
        info!("Encoding...");
        let summary = match &args.input {
            Some(path) => {
                let mut file = open(path)?;
                let source = InputSource::from_file(&mut file)
                    .with_context(|| format!("Failed to inspect input file: {}", path.display()))?;
                codec.encode(source, output, dict)
            }
            None => {
                let mut stdin = io::stdin().lock();
                codec.encode(InputSource::stream(&mut stdin), output, dict)
            }
        }
        .context("Encoding failed")?;
        info!("Encoding completed.");
        serde_json::to_string(&summary)?
    };

    if args.stats {
        eprintln!("{}", summary);
    }
    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))
}

fn create(path: &Path, what: &str) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to open {} file for writing: {}", what, path.display()))
}
