//! Root CLI structure for zipflate

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use zip_deflate::stream::{DEFAULT_BUFFER_SIZE, DEFAULT_CHUNK_SIZE};

#[derive(Parser)]
#[command(name = "zipflate")]
#[command(about = "Raw deflate compression as used inside ZIP archive entries", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a file into a raw deflate stream
    Compress(CompressArgs),

    /// Decompress a raw deflate stream
    Decompress(TranscodeArgs),

    /// List the registered compression algorithms
    Info,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Input, output and buffer sizing shared by both directions
#[derive(Args)]
pub struct TranscodeArgs {
    /// Input file, or "-" for stdin
    pub input: PathBuf,

    /// Output file, or "-" for stdout (derived from the input name if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Bytes read from the input per algorithm call
    #[arg(long, env = "ZIPFLATE_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Bytes requested from the algorithm per call
    #[arg(long, env = "ZIPFLATE_BUFFER_SIZE", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,
}

#[derive(Args)]
pub struct CompressArgs {
    #[command(flatten)]
    pub transcode: TranscodeArgs,

    /// Compression level (1-9, 0 for maximum effort)
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(0..=9))]
    pub level: i32,
}
