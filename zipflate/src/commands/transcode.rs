//! Compress and decompress command implementations

use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use zip_deflate::{
    AlgorithmDescriptor, Mode, TranscodeOptions, TransferStats, find_algorithm, methods, transcode,
};

use crate::cli::{CompressArgs, TranscodeArgs};
use crate::utils::{
    add_table_row, create_byte_progress_bar, create_spinner, create_table, format_bytes,
    format_compression_ratio,
};

/// File extension appended on compression and stripped on decompression
pub const EXTENSION: &str = "deflate";

const STDIO: &str = "-";

pub fn compress(args: CompressArgs, quiet: bool) -> Result<()> {
    let output = match &args.transcode.output {
        Some(output) => output.clone(),
        None if is_stdio(&args.transcode.input) => PathBuf::from(STDIO),
        None => {
            let mut name = args.transcode.input.clone().into_os_string();
            name.push(".");
            name.push(EXTENSION);
            PathBuf::from(name)
        }
    };

    let descriptor = find_algorithm(methods::DEFLATE, Mode::Compress)?;
    let stats = run(descriptor, args.level, &args.transcode, &output, quiet)?;

    if !quiet && !is_stdio(&output) {
        print_summary(&args.transcode.input, &output, stats.bytes_in, stats.bytes_out);
    }
    Ok(())
}

pub fn decompress(args: TranscodeArgs, quiet: bool) -> Result<()> {
    let output = match &args.output {
        Some(output) => output.clone(),
        None if is_stdio(&args.input) => PathBuf::from(STDIO),
        None => derive_decompressed_name(&args.input)?,
    };

    let descriptor = find_algorithm(methods::DEFLATE, Mode::Decompress)?;
    let stats = run(descriptor, 0, &args, &output, quiet)?;

    if !quiet && !is_stdio(&output) {
        print_summary(&args.input, &output, stats.bytes_out, stats.bytes_in);
    }
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

/// Strip the deflate extension from `input`
fn derive_decompressed_name(input: &Path) -> Result<PathBuf> {
    match input.extension() {
        Some(ext) if ext == EXTENSION => Ok(input.with_extension("")),
        _ => bail!(
            "Cannot derive an output name for {} (expected a .{EXTENSION} file), use --output",
            input.display()
        ),
    }
}

fn open_input(path: &Path, quiet: bool) -> Result<(Box<dyn Read>, Option<ProgressBar>)> {
    if is_stdio(path) {
        return Ok((Box::new(io::stdin().lock()), None));
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    if quiet {
        return Ok((Box::new(file), None));
    }

    let progress = match file.metadata() {
        Ok(metadata) if metadata.is_file() => {
            create_byte_progress_bar(metadata.len(), &path.display().to_string())
        }
        _ => create_spinner(&path.display().to_string()),
    };
    let reader = progress.wrap_read(file);
    Ok((Box::new(reader), Some(progress)))
}

fn open_output(path: &Path, force: bool) -> Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .create_new(!force)
        .open(path)
        .with_context(|| {
            if path.exists() && !force {
                format!(
                    "Output file {} already exists, use --force to overwrite",
                    path.display()
                )
            } else {
                format!("Failed to create file: {}", path.display())
            }
        })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run(
    descriptor: &AlgorithmDescriptor,
    flags: i32,
    args: &TranscodeArgs,
    output: &Path,
    quiet: bool,
) -> Result<TransferStats> {
    let options = TranscodeOptions {
        chunk_size: args.chunk_size,
        buffer_size: args.buffer_size,
    };
    options.validate()?;

    let (reader, progress) = open_input(&args.input, quiet || is_stdio(output))?;
    let mut writer = open_output(output, args.force)?;

    log::info!(
        "{} {} {} -> {}",
        descriptor.name,
        descriptor.mode,
        args.input.display(),
        output.display()
    );

    let result = transcode(descriptor, flags, reader, &mut writer, &options);
    drop(writer);
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    if result.is_err() && !is_stdio(output) {
        discard_partial_output(output);
    }

    let stats = result.with_context(|| {
        format!(
            "{} {} failed for {}",
            descriptor.name,
            descriptor.mode,
            args.input.display()
        )
    })?;
    log::debug!(
        "{} bytes in, {} bytes out",
        stats.bytes_in,
        stats.bytes_out
    );
    Ok(stats)
}

/// Remove an output file left incomplete by a failed run
fn discard_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed partial output {}", path.display()),
        Err(err) => log::warn!("Failed to remove partial output {}: {err}", path.display()),
    }
}

fn print_summary(input: &Path, output: &Path, original: u64, compressed: u64) {
    let mut table = create_table(&["Input", "Output", "Original", "Compressed", "Saved"]);
    add_table_row(
        &mut table,
        vec![
            input.display().to_string(),
            output.display().to_string(),
            format_bytes(original),
            format_bytes(compressed),
            format_compression_ratio(original, compressed),
        ],
    );
    table.printstd();
}
