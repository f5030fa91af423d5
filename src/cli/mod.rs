//! Command-line interface module

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::config::{LineEnding, OutputFormat};
use crate::conversion::{ConversionResult, CsvToJsonConfig, JsonToCsvConfig};
use crate::error::{ConversionError, ConversionErrorKind};

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "csvconv")]
#[command(about = "Convert between CSV/delimited text and JSON records")]
#[command(version = "0.1.0")]
#[command(long_about = None)]
pub struct Args {
    /// Input source (string, file, or directory)
    #[arg()]
    pub input: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read input from standard input
    #[arg(long)]
    pub stdin: bool,

    /// Recursively process directories
    #[arg(long)]
    pub recursive: bool,

    /// Target format: csv or json (default: inferred from the input)
    #[arg(long)]
    pub to: Option<TargetFormat>,

    /// Field delimiter: comma, semicolon, tab, pipe, or a literal character
    /// (default: auto-detect for delimited input, comma for output)
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Treat the first row as data (CSV input) or omit the header row
    /// (CSV output)
    #[arg(long)]
    pub no_headers: bool,

    /// Keep all fields as strings instead of coercing types
    #[arg(long)]
    pub no_coercion: bool,

    /// Expand dotted column names into nested objects (CSV input)
    #[arg(long)]
    pub nested: bool,

    /// Emit a row-indexed object instead of an array (CSV input)
    #[arg(long)]
    pub as_object: bool,

    /// Keep nested objects whole instead of flattening them (JSON input)
    #[arg(long)]
    pub no_flatten: bool,

    /// Depth limit when flattening nested objects (default: 3)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Key path separator for flattening and nesting (default: ".")
    #[arg(long)]
    pub separator: Option<String>,

    /// Use Windows line endings for delimited output
    #[arg(long)]
    pub crlf: bool,

    /// Skip malformed lines with a warning instead of failing
    #[arg(long)]
    pub skip_malformed: bool,

    /// Keep fields beyond the header width under synthesized column names
    #[arg(long)]
    pub keep_extra_columns: bool,

    /// Rows per processing chunk (default: 1000)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Disable pretty-printing of JSON output
    #[arg(long)]
    pub plain: bool,

    /// Only validate the input, don't convert
    #[arg(long)]
    pub validate_only: bool,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,

    /// Continue converting other files when one file fails
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Target format for conversion
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Csv,
    Json,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub csv_config: CsvToJsonConfig,
    pub json_config: JsonToCsvConfig,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConversionResult<Self> {
        let csv_config = Self::create_csv_config(&args)?;
        let json_config = Self::create_json_config(&args)?;

        Ok(Self {
            args,
            csv_config,
            json_config,
        })
    }

    /// Configuration for the delimited-to-record direction
    fn create_csv_config(args: &Args) -> ConversionResult<CsvToJsonConfig> {
        let mut config = CsvToJsonConfig {
            delimiter: args.delimiter.as_deref().map(parse_delimiter).transpose()?,
            has_headers: !args.no_headers,
            nested_output: args.nested,
            pretty: !args.plain,
            skip_malformed_lines: args.skip_malformed,
            keep_extra_columns: args.keep_extra_columns,
            ..CsvToJsonConfig::default()
        };

        if args.no_coercion {
            config.parse_numbers = false;
            config.parse_booleans = false;
            config.parse_nulls = false;
        }
        if args.as_object {
            config.output_format = OutputFormat::Object;
        }
        if let Some(separator) = &args.separator {
            config.nesting_separator = separator.clone();
        }
        if let Some(chunk_size) = args.chunk_size {
            config.chunk_size = chunk_size;
        }

        config
            .validate()
            .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))?;

        Ok(config)
    }

    /// Configuration for the record-to-delimited direction
    fn create_json_config(args: &Args) -> ConversionResult<JsonToCsvConfig> {
        let mut config = JsonToCsvConfig {
            flatten_objects: !args.no_flatten,
            include_headers: !args.no_headers,
            ..JsonToCsvConfig::default()
        };

        if let Some(delimiter) = &args.delimiter {
            config.delimiter = parse_delimiter(delimiter)?;
        }
        if let Some(max_depth) = args.max_depth {
            config.max_nesting_depth = max_depth;
        }
        if let Some(separator) = &args.separator {
            config.nesting_separator = separator.clone();
        }
        if args.crlf {
            config.line_ending = LineEnding::CrLf;
        }
        if let Some(chunk_size) = args.chunk_size {
            config.chunk_size = chunk_size;
        }

        config
            .validate()
            .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))?;

        Ok(config)
    }

    /// Check if we should continue on error
    pub fn continue_on_error(&self) -> bool {
        self.args.continue_on_error
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.args.verbose
    }

    /// Check if stats output is requested
    pub fn want_stats(&self) -> bool {
        self.args.stats
    }

    /// Check if only validation is requested
    pub fn is_validate_only(&self) -> bool {
        self.args.validate_only
    }

    /// Get input source description
    pub fn input_description(&self) -> String {
        if self.args.stdin {
            "standard input".to_string()
        } else if let Some(input) = &self.args.input {
            format!("'{}'", input)
        } else {
            "no input specified".to_string()
        }
    }

    /// Get output destination description
    pub fn output_description(&self) -> String {
        if let Some(output) = &self.args.output {
            format!("'{}'", output.display())
        } else {
            "standard output".to_string()
        }
    }
}

/// Parse a delimiter argument: a well-known name or a single literal
/// character
pub fn parse_delimiter(raw: &str) -> ConversionResult<char> {
    let delimiter = match raw {
        "comma" => ',',
        "semicolon" => ';',
        "tab" | "\\t" => '\t',
        "pipe" => '|',
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ConversionError::conversion(
                        ConversionErrorKind::configuration(format!(
                            "Invalid delimiter: '{}' (expected comma, semicolon, tab, pipe, or a single character)",
                            raw
                        )),
                    ))
                }
            }
        }
    };

    if delimiter == '"' {
        return Err(ConversionError::conversion(
            ConversionErrorKind::configuration(
                "Delimiter must not be the quote character".to_string(),
            ),
        ));
    }

    Ok(delimiter)
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for row processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            if Self::should_use_color() {
                println!("{} {}", console::style("✓").green(), message);
            } else {
                println!("✓ {}", message);
            }
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        if Self::should_use_color() {
            eprintln!("{} {}", console::style("✗").red(), message);
        } else {
            eprintln!("✗ {}", message);
        }
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            if Self::should_use_color() {
                eprintln!("{} {}", console::style("⚠").yellow(), message);
            } else {
                eprintln!("⚠ {}", message);
            }
        }
    }

    /// Check if output should be colored
    pub fn should_use_color() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }

    /// Get the terminal size
    pub fn get_terminal_size() -> (u16, u16) {
        terminal_size::terminal_size()
            .map(|(width, height)| (width.0, height.0))
            .unwrap_or((80, 24))
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    let message = error.user_message();
    CliUtils::show_error(&message);

    match error.kind() {
        Some(ConversionErrorKind::Syntax { .. }) => {
            eprintln!("\nTip: Use --validate-only to check syntax before conversion");
        }
        Some(ConversionErrorKind::DelimiterDetectionFailed) => {
            eprintln!("\nTip: Use --delimiter to set the field separator explicitly");
        }
        Some(ConversionErrorKind::MalformedQuoting { .. }) => {
            eprintln!("\nTip: Use --skip-malformed to drop malformed lines and continue");
        }
        Some(ConversionErrorKind::UnknownFileType { .. }) => {
            eprintln!("\nTip: Use --to csv or --to json to set the target format");
        }
        _ => {}
    }

    eprintln!("\nTry 'csvconv --help' for usage information.");
}

/// Command execution result
pub type CliResult<T> = Result<T, ConversionError>;
