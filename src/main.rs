//! charset-nose CLI - character encoding sniffer

use clap::Parser;
use charset_nose::{Detection, LanguageFilter, SampleSize, Sniffer};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Character encoding sniffer.
///
/// Detects the character encoding of text files from byte-order marks,
/// escape sequences and byte statistics.
#[derive(Parser, Debug)]
#[command(name = "charset-nose")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) to sniff
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Number of bytes to sample (default: 65536)
    #[arg(short = 'b', long)]
    sample_bytes: Option<usize>,

    /// Read entire file instead of sampling
    #[arg(short = 'a', long)]
    all: bool,

    /// Size of the chunks fed to the detector
    #[arg(short = 'c', long, default_value = "4096")]
    chunk_size: usize,

    /// Languages to consider: all, cjk, chinese, japanese, korean, non-cjk (repeatable)
    #[arg(short = 'l', long = "lang", value_parser = parse_language)]
    languages: Vec<LanguageFilter>,

    /// Output format: text (default), json, or csv
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Only output the detected charset
    #[arg(long)]
    charset_only: bool,

    /// Log detection steps to stderr
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn parse_language(name: &str) -> Result<LanguageFilter, String> {
    LanguageFilter::from_name(name).ok_or_else(|| {
        format!("unknown language '{name}' (expected all, cjk, chinese, japanese, korean or non-cjk)")
    })
}

/// Minimal stderr logger for `--debug`.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.target().starts_with("charset_nose")
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.debug && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }

    let sniffer = build_sniffer(&args);

    // each file gets its own detection session
    let results: Vec<(&PathBuf, charset_nose::Result<Option<Detection>>)> = args
        .files
        .par_iter()
        .map(|file| (file, sniffer.sniff_path(file)))
        .collect();

    let mut exit_code = ExitCode::SUCCESS;
    let mut csv_writer = (args.format == OutputFormat::Csv && !args.charset_only)
        .then(|| csv::Writer::from_writer(io::stdout()));
    if let Some(writer) = csv_writer.as_mut() {
        if let Err(e) = writer.write_record(["file", "charset", "confidence", "encoding"]) {
            eprintln!("Error writing output: {e}");
            return ExitCode::FAILURE;
        }
    }

    for (file, result) in results {
        let detection = match result {
            Ok(detection) => detection,
            Err(e) => {
                eprintln!("Error processing {}: {}", file.display(), e);
                exit_code = ExitCode::FAILURE;
                continue;
            }
        };

        if args.charset_only {
            println!("{}", detection.map_or("unknown", |d| d.charset));
            continue;
        }

        match csv_writer.as_mut() {
            Some(writer) => {
                if let Err(e) = write_csv_row(writer, file, detection.as_ref()) {
                    eprintln!("Error writing output: {e}");
                    exit_code = ExitCode::FAILURE;
                }
            }
            None if args.format == OutputFormat::Json => {
                print_json_output(file, detection.as_ref());
            }
            None => print_text_output(file, detection.as_ref()),
        }
    }

    if let Some(mut writer) = csv_writer {
        if let Err(e) = writer.flush() {
            eprintln!("Error writing output: {e}");
            exit_code = ExitCode::FAILURE;
        }
    }

    exit_code
}

fn build_sniffer(args: &Args) -> Sniffer {
    let mut sniffer = Sniffer::new();

    if args.all {
        sniffer.sample_size(SampleSize::All);
    } else if let Some(bytes) = args.sample_bytes {
        sniffer.sample_size(SampleSize::Bytes(bytes));
    }

    let filter = args
        .languages
        .iter()
        .copied()
        .reduce(|a, b| a | b)
        .unwrap_or(LanguageFilter::ALL);

    sniffer.chunk_size(args.chunk_size).language_filter(filter);
    sniffer
}

/// Name of the encoding_rs decoder for the detection, if there is one.
fn decoder_name(detection: &Detection) -> Option<&'static str> {
    detection.encoding().map(|encoding| encoding.name())
}

fn print_text_output(path: &Path, detection: Option<&Detection>) {
    println!("File: {}", path.display());
    match detection {
        Some(detection) => {
            println!("  Charset: {}", detection.charset);
            println!("  Confidence: {:.2}", detection.confidence);
            println!(
                "  Decoder: {}",
                decoder_name(detection).unwrap_or("unsupported")
            );
        }
        None => println!("  Charset: unknown"),
    }
    println!();
}

fn print_json_output(path: &Path, detection: Option<&Detection>) {
    let file = json_escape(&path.display().to_string());
    match detection {
        Some(detection) => {
            let encoding = decoder_name(detection)
                .map_or_else(|| "null".to_string(), |name| format!("\"{name}\""));
            println!(
                r#"{{"file":"{}","charset":"{}","confidence":{:.4},"encoding":{}}}"#,
                file, detection.charset, detection.confidence, encoding
            );
        }
        None => println!(r#"{{"file":"{file}","charset":null,"confidence":null,"encoding":null}}"#),
    }
}

fn write_csv_row<W: io::Write>(
    writer: &mut csv::Writer<W>,
    path: &Path,
    detection: Option<&Detection>,
) -> csv::Result<()> {
    let file = path.display().to_string();
    match detection {
        Some(detection) => {
            let confidence = format!("{:.4}", detection.confidence);
            writer.write_record([
                file.as_str(),
                detection.charset,
                confidence.as_str(),
                decoder_name(detection).unwrap_or(""),
            ])
        }
        None => writer.write_record([file.as_str(), "", "", ""]),
    }
}

fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
