// Allow dead code for library items compiled into the binary's module tree
#![allow(dead_code)]

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod cli;
mod conversion;
mod error;
mod formatter;
mod parser;
mod validation;

use crate::cli::{handle_error, Args, CliConfig, CliResult, CliUtils, TargetFormat};
use crate::conversion::stats::{ConversionStats, Direction};
use crate::conversion::{ConversionOutput, CsvEngine, JsonEngine};
use crate::error::{ConversionError, ConversionErrorKind};
use crate::parser::{parse_structured, InputSource};
use crate::validation::{validate_delimited_text, validate_structured_text, ValidationReport};

fn main() {
    let args = Args::parse();

    let config = match CliConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            handle_error(&e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        handle_error(&e);
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> CliResult<()> {
    if config.is_verbose() && !config.is_quiet() {
        eprintln!("Reading from {}", config.input_description());
    }

    if config.is_validate_only() {
        handle_validation(config)
    } else {
        handle_conversion(config)
    }
}

fn handle_conversion(config: &CliConfig) -> CliResult<()> {
    let args = &config.args;

    if args.stdin {
        let text = InputSource::Stdin.read_content()?;
        let target = resolve_target(args.to, None, &text)?;
        let output = convert_text(&text, target, config)?;
        emit_output(&output, target, config)
    } else if let Some(input) = &args.input {
        let path = PathBuf::from(input);

        if path.is_file() {
            convert_file(&path, config)
        } else if path.is_dir() {
            convert_directory(&path, config)
        } else if looks_like_inline_input(input) {
            let target = resolve_target(args.to, None, input)?;
            let output = convert_text(input, target, config)?;
            emit_output(&output, target, config)
        } else {
            Err(ConversionError::conversion(ConversionErrorKind::io(
                format!("input path does not exist: {}", input),
                Some(path),
            )))
        }
    } else {
        Err(ConversionError::conversion(
            ConversionErrorKind::configuration(
                "No input provided. Use --stdin or provide an input path".to_string(),
            ),
        ))
    }
}

fn convert_file(path: &Path, config: &CliConfig) -> CliResult<()> {
    let text = InputSource::File(path.to_path_buf()).read_content()?;
    let target = resolve_target(config.args.to, Some(path), &text)?;
    let output = convert_text(&text, target, config)?;
    emit_output(&output, target, config)
}

fn convert_directory(input_dir: &Path, config: &CliConfig) -> CliResult<()> {
    let args = &config.args;
    let output_dir = args.output.as_ref().ok_or_else(|| {
        ConversionError::conversion(ConversionErrorKind::configuration(
            "Output directory required for directory conversion (use --output)".to_string(),
        ))
    })?;

    std::fs::create_dir_all(output_dir).map_err(|e| {
        ConversionError::conversion(ConversionErrorKind::io(
            format!("failed to create output directory: {}", e),
            Some(output_dir.clone()),
        ))
    })?;

    let files = find_convertible_files(input_dir, args.recursive)?;
    if files.is_empty() {
        if !config.is_quiet() {
            println!("No convertible files found in {}", input_dir.display());
        }
        return Ok(());
    }

    if !config.is_quiet() {
        println!("Found {} convertible files", files.len());
    }

    for file in files {
        let relative = file.strip_prefix(input_dir).unwrap_or(&file);
        let result = convert_directory_entry(&file, relative, output_dir, config);

        match result {
            Ok(output_file) => {
                if !config.is_quiet() {
                    println!("✓ {} -> {}", relative.display(), output_file.display());
                }
            }
            Err(e) => {
                CliUtils::show_error(&format!(
                    "error converting {}: {}",
                    relative.display(),
                    e.user_message()
                ));
                if !config.continue_on_error() {
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

fn convert_directory_entry(
    file: &Path,
    relative: &Path,
    output_dir: &Path,
    config: &CliConfig,
) -> CliResult<PathBuf> {
    let text = InputSource::File(file.to_path_buf()).read_content()?;
    let target = resolve_target(config.args.to, Some(file), &text)?;
    let output = convert_text(&text, target, config)?;

    let output_file = output_dir
        .join(relative)
        .with_extension(target_extension(target));
    write_output_file(&output_file, &output.content)?;

    Ok(output_file)
}

/// Convert text to the target format, reporting chunk progress on a bar in
/// verbose mode
fn convert_text(
    text: &str,
    target: TargetFormat,
    config: &CliConfig,
) -> CliResult<ConversionOutput> {
    let show_progress = config.is_verbose() && !config.is_quiet();
    let mut bar: Option<indicatif::ProgressBar> = None;
    let mut on_progress = |progress: conversion::ChunkProgress| {
        if !show_progress {
            return;
        }
        let pb = bar.get_or_insert_with(|| {
            CliUtils::create_progress_bar(progress.total_rows as u64)
        });
        pb.set_position(progress.processed_rows as u64);
    };

    let started = Instant::now();
    let result = match target {
        TargetFormat::Json => {
            let engine = CsvEngine::new(config.csv_config.clone());
            engine.convert_with_progress(text, &mut on_progress)
        }
        TargetFormat::Csv => {
            let value = parse_structured(text)?;
            let engine = JsonEngine::new(config.json_config.clone());
            engine.convert_with_progress(&value, &mut on_progress)
        }
    };
    let duration = started.elapsed();

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let output = result?;

    for warning in &output.warnings {
        CliUtils::show_warning(&warning.to_string(), config.is_quiet());
    }

    if config.want_stats() && !config.is_quiet() {
        let mut stats = ConversionStats::new(direction_for(target));
        stats.input_bytes = text.len();
        stats.output_bytes = output.len();
        stats.row_count = output.row_count;
        stats.column_count = output.column_count;
        stats.warning_count = output.warnings.len();
        stats.duration = duration;
        println!("\n{}", stats.summary());
    }

    Ok(output)
}

fn emit_output(
    output: &ConversionOutput,
    target: TargetFormat,
    config: &CliConfig,
) -> CliResult<()> {
    if let Some(output_path) = &config.args.output {
        write_output_file(output_path, &output.content)?;
        CliUtils::show_success(
            &format!("Converted to: {}", output_path.display()),
            config.is_quiet(),
        );
    } else {
        println!("{}", output.content);
    }

    if config.is_verbose() && !config.is_quiet() {
        eprintln!(
            "{} rows, {} columns ({})",
            output.row_count,
            output.column_count,
            target_extension(target)
        );
    }

    Ok(())
}

fn write_output_file(path: &Path, content: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConversionError::conversion(ConversionErrorKind::io(
                    format!("failed to create output directory: {}", e),
                    Some(parent.to_path_buf()),
                ))
            })?;
        }
    }

    std::fs::write(path, content).map_err(|e| {
        ConversionError::conversion(ConversionErrorKind::io(
            format!("failed to write output: {}", e),
            Some(path.to_path_buf()),
        ))
    })
}

/// Decide the target format: an explicit --to wins, then the input file
/// extension, then a content sniff
fn resolve_target(
    to: Option<TargetFormat>,
    path: Option<&Path>,
    text: &str,
) -> CliResult<TargetFormat> {
    if let Some(target) = to {
        return Ok(target);
    }

    if let Some(path) = path {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        return match extension.as_str() {
            "csv" | "tsv" => Ok(TargetFormat::Json),
            "json" => Ok(TargetFormat::Csv),
            other => Err(ConversionError::conversion(
                ConversionErrorKind::UnknownFileType {
                    extension: other.to_string(),
                },
            )),
        };
    }

    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        Ok(TargetFormat::Csv)
    } else {
        Ok(TargetFormat::Json)
    }
}

fn direction_for(target: TargetFormat) -> Direction {
    match target {
        TargetFormat::Json => Direction::CsvToJson,
        TargetFormat::Csv => Direction::JsonToCsv,
    }
}

fn target_extension(target: TargetFormat) -> &'static str {
    match target {
        TargetFormat::Json => "json",
        TargetFormat::Csv => "csv",
    }
}

/// Inline inputs are structured literals or text with row structure; plain
/// words are treated as missing paths
fn looks_like_inline_input(input: &str) -> bool {
    let trimmed = input.trim_start();
    trimmed.starts_with('{')
        || trimmed.starts_with('[')
        || input.contains('\n')
        || input.contains(',')
}

fn find_convertible_files(dir: &Path, recursive: bool) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    let is_convertible = |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                ext == "csv" || ext == "tsv" || ext == "json"
            })
            .unwrap_or(false)
    };

    if recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry.map_err(|e| {
                ConversionError::conversion(ConversionErrorKind::io(
                    format!("failed to walk directory: {}", e),
                    Some(dir.to_path_buf()),
                ))
            })?;
            let path = entry.path();
            if path.is_file() && is_convertible(path) {
                files.push(path.to_path_buf());
            }
        }
    } else {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ConversionError::conversion(ConversionErrorKind::io(
                format!("failed to read directory: {}", e),
                Some(dir.to_path_buf()),
            ))
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| {
                ConversionError::conversion(ConversionErrorKind::io(
                    format!("failed to read directory entry: {}", e),
                    Some(dir.to_path_buf()),
                ))
            })?;
            let path = entry.path();
            if path.is_file() && is_convertible(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn handle_validation(config: &CliConfig) -> CliResult<()> {
    let args = &config.args;

    if args.stdin {
        let text = InputSource::Stdin.read_content()?;
        let target = resolve_target(args.to, None, &text)?;
        report_validation(&text, target, config, None)
    } else if let Some(input) = &args.input {
        let path = PathBuf::from(input);

        if path.is_file() {
            let text = InputSource::File(path.clone()).read_content()?;
            let target = resolve_target(args.to, Some(&path), &text)?;
            report_validation(&text, target, config, Some(&path))
        } else if path.is_dir() {
            validate_directory(&path, config)
        } else if looks_like_inline_input(input) {
            let target = resolve_target(args.to, None, input)?;
            report_validation(input, target, config, None)
        } else {
            Err(ConversionError::conversion(ConversionErrorKind::io(
                format!("input path does not exist: {}", input),
                Some(path),
            )))
        }
    } else {
        Err(ConversionError::conversion(
            ConversionErrorKind::configuration(
                "No input provided. Use --stdin or provide an input path".to_string(),
            ),
        ))
    }
}

fn validate_text(text: &str, target: TargetFormat) -> ValidationReport {
    // The target is what we would convert TO, so validate the opposite side
    match target {
        TargetFormat::Json => validate_delimited_text(text),
        TargetFormat::Csv => validate_structured_text(text),
    }
}

fn report_validation(
    text: &str,
    target: TargetFormat,
    config: &CliConfig,
    path: Option<&Path>,
) -> CliResult<()> {
    let report = validate_text(text, target);
    let label = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| config.input_description());

    for warning in &report.warnings {
        CliUtils::show_warning(&format!("{}: {}", label, warning), config.is_quiet());
    }

    if report.is_valid() {
        CliUtils::show_success(&format!("{} is valid", label), config.is_quiet());
        Ok(())
    } else {
        for issue in &report.errors {
            CliUtils::show_error(&format!("{}: {}", label, issue));
        }
        let first = &report.errors[0];
        Err(ConversionError::syntax(first.message.clone(), first.line))
    }
}

fn validate_directory(dir: &Path, config: &CliConfig) -> CliResult<()> {
    let files = find_convertible_files(dir, config.args.recursive)?;
    let mut failures = 0usize;

    for file in &files {
        let relative = file.strip_prefix(dir).unwrap_or(file);
        let text = match InputSource::File(file.clone()).read_content() {
            Ok(text) => text,
            Err(e) => {
                CliUtils::show_error(&format!("{}: {}", relative.display(), e.user_message()));
                failures += 1;
                continue;
            }
        };
        let target = match resolve_target(config.args.to, Some(file), &text) {
            Ok(target) => target,
            Err(e) => {
                CliUtils::show_error(&format!("{}: {}", relative.display(), e.user_message()));
                failures += 1;
                continue;
            }
        };

        let report = validate_text(&text, target);
        if report.is_valid() {
            if !config.is_quiet() {
                println!("✓ {}", relative.display());
            }
        } else {
            failures += 1;
            for issue in &report.errors {
                CliUtils::show_error(&format!("{}: {}", relative.display(), issue));
            }
        }
    }

    if failures > 0 {
        Err(ConversionError::conversion(
            ConversionErrorKind::configuration(format!(
                "{} of {} files failed validation",
                failures,
                files.len()
            )),
        ))
    } else {
        Ok(())
    }
}
