//! Load an IGA file, validate it, optionally dump it, and re-encode it in memory

use clap::{error::ErrorKind, Parser};
use igafile::{Error, IgaFile, IgaSummary, IgaWriter, ReadConfig, DEFAULT_MAX_ALLOC};
use std::{path::PathBuf, process::ExitCode};

const EXIT_USAGE: u8 = 1;
const EXIT_OPEN: u8 = 2;
const EXIT_DECODE: u8 = 3;
const EXIT_INVALID: u8 = 4;
const EXIT_ENCODE: u8 = 5;

#[derive(Parser, Debug)]
#[command(name = "igainfo", version, about = "Inspect a TSS surface container")]
struct Cli {
    /// Path to the .iga file
    path: PathBuf,

    /// Dump every element, edge and piece; also enables info logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable all log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print a JSON summary instead of the text report
    #[arg(long)]
    json: bool,

    /// Largest block payload the decoder may allocate, in bytes
    #[arg(long, env = "IGA_MAX_ALLOC", default_value_t = DEFAULT_MAX_ALLOC)]
    max_alloc: usize,
}

/// A failed stage and the exit code that reports it
struct Failure {
    code: u8,
    error: anyhow::Error,
}

impl Failure {
    fn new(code: u8, error: impl Into<anyhow::Error>, context: &'static str) -> Self {
        Self {
            code,
            error: error.into().context(context),
        }
    }
}

/// Exit code for a command line clap refused
///
/// Help and version requests succeed; everything else is a usage error,
/// kept apart from the open failure that clap's own code 2 would collide with.
fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
    }
}

fn init_tracing(cli: &Cli) {
    // RUST_LOG applies unless --quiet; --verbose raises the default to info
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        let fallback = if cli.verbose { "info" } else { "warn" };
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let config = ReadConfig::with_max_alloc(cli.max_alloc);
    let file = IgaFile::open(&cli.path, &config).map_err(|err| match err {
        Error::Io(_) => Failure::new(EXIT_OPEN, err, "failed to open that file"),
        _ => Failure::new(EXIT_DECODE, err, "failed to load valid data from that file"),
    })?;
    let data = &file.data;

    data.validate()
        .map_err(|err| Failure::new(EXIT_INVALID, err, "the IGA file is not valid"))?;

    if cli.json {
        let json = IgaSummary::of(data)
            .to_json()
            .map_err(|err| Failure::new(1, err, "failed to serialize the summary"))?;
        println!("{json}");
    } else {
        println!(
            "Loaded the IGA file; it contains {} elements.",
            data.elem_count()
        );
        if cli.verbose {
            igafile::write_report(data, std::io::stdout().lock())
                .map_err(|err| Failure::new(1, err, "failed to write the report"))?;
        }
    }

    // Unknown blocks in the input are not carried over
    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .write_iga_file(data)
        .map_err(|err| Failure::new(EXIT_ENCODE, err, "writing the IGA file failed"))?;
    tracing::info!(bytes = buffer.len(), "re-encoded IGA file");
    if !cli.json {
        println!(
            "Writing the IGA file to a buffer produced {} bytes.",
            buffer.len()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit_code(&err));
        }
    };
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("Error: {:#}", failure.error);
            ExitCode::from(failure.code)
        }
    }
}
