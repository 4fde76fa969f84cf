//! Accuracy benchmark over an annotated corpus.
//!
//! A corpus is a directory of text files plus a CSV annotation file with
//! `file_name,charset` rows naming the expected encoding of each file.
//! Lines starting with `#` are comments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, REPLACEMENT};
use foldhash::{HashMap, HashMapExt};
use rayon::prelude::*;

use crate::detection::ASCII;
use crate::sample::SampleSize;
use crate::sniffer::Sniffer;

/// Expected charset from the annotation file.
#[derive(Debug, Clone)]
pub struct ExpectedCharset {
    pub file_name: String,
    pub charset: String,
}

/// Result of benchmarking a single file.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub file_name: String,
    pub passed: bool,
    pub expected: String,
    /// Detected label, or None when the detector gave no answer.
    pub detected: Option<&'static str>,
    pub confidence: Option<f32>,
    pub error: Option<String>,
}

/// Aggregate benchmark results.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResult {
    pub total: usize,
    pub passed: usize,
    /// Files with a wrong answer or no answer.
    pub failed: usize,
    /// Files for which the detector gave no answer.
    pub undetected: usize,
    pub errors: usize,
    pub file_results: Vec<FileResult>,
}

impl BenchmarkResult {
    /// Calculate success ratio (passed / total).
    pub fn success_ratio(&self) -> f64 {
        ratio(self.passed, self.total)
    }

    /// Calculate failure ratio (failed / total).
    pub fn failure_ratio(&self) -> f64 {
        ratio(self.failed, self.total)
    }

    /// Calculate error ratio (errors / total).
    pub fn error_ratio(&self) -> f64 {
        ratio(self.errors, self.total)
    }

    /// Share of readable files that got any answer at all.
    pub fn detection_rate(&self) -> f64 {
        let valid = self.total - self.errors;
        ratio(valid - self.undetected, valid)
    }

    /// Correct answers among the files that got an answer.
    pub fn precision(&self) -> f64 {
        let answered = self.total - self.errors - self.undetected;
        ratio(self.passed, answered)
    }

    /// Correct answers among all readable files.
    pub fn recall(&self) -> f64 {
        ratio(self.passed, self.total - self.errors)
    }

    /// Calculate F1 score (harmonic mean of precision and recall).
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Print detailed results to stdout.
    pub fn print_details(&self) {
        println!("\n=== Benchmark Results ===\n");

        for result in &self.file_results {
            let status = if result.error.is_some() {
                "ERROR"
            } else if result.passed {
                "PASS"
            } else {
                "FAIL"
            };

            print!("[{}] {}", status, result.file_name);

            if !result.passed && result.error.is_none() {
                match (result.detected, result.confidence) {
                    (Some(detected), Some(confidence)) => print!(
                        " - expected {} got {} ({:.2})",
                        result.expected, detected, confidence
                    ),
                    _ => print!(" - expected {} got nothing", result.expected),
                }
            }

            if let Some(ref err) = result.error {
                print!(" - {err}");
            }

            println!();
        }
    }

    /// Print summary metrics to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===\n");
        println!("Total files:        {}", self.total);
        println!(
            "Passed:             {} ({:.1}%)",
            self.passed,
            self.success_ratio() * 100.0
        );
        println!(
            "Failed:             {} ({:.1}%)",
            self.failed,
            self.failure_ratio() * 100.0
        );
        println!(
            "Errors:             {} ({:.1}%)",
            self.errors,
            self.error_ratio() * 100.0
        );
        println!();
        println!(
            "Detection rate:     {:.1}%",
            self.detection_rate() * 100.0
        );
        println!();
        println!("Precision:          {:.3}", self.precision());
        println!("Recall:             {:.3}", self.recall());
        println!("F1 Score:           {:.3}", self.f1_score());
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Parse an annotation file and return a map of file name to expected charset.
pub fn parse_annotations(path: &Path) -> io::Result<HashMap<String, ExpectedCharset>> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut annotations = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let (Some(file_name), Some(charset)) = (record.get(0), record.get(1)) else {
            continue;
        };
        if file_name.is_empty() || charset.is_empty() {
            continue;
        }

        annotations.insert(
            file_name.to_string(),
            ExpectedCharset {
                file_name: file_name.to_string(),
                charset: charset.to_string(),
            },
        );
    }

    Ok(annotations)
}

/// Returns true if two charset labels name the same encoding.
///
/// Labels are compared case-insensitively, then through their WHATWG
/// aliases (`latin1` and `windows-1252`, `sjis` and `Shift_JIS`). `ASCII`
/// only matches itself.
pub fn charsets_match(expected: &str, detected: &str) -> bool {
    if expected.eq_ignore_ascii_case(detected) {
        return true;
    }
    if expected.eq_ignore_ascii_case(ASCII) || detected.eq_ignore_ascii_case(ASCII) {
        return false;
    }

    let resolve = |label: &str| {
        Encoding::for_label(label.as_bytes()).filter(|&encoding| encoding != REPLACEMENT)
    };
    matches!((resolve(expected), resolve(detected)), (Some(a), Some(b)) if a == b)
}

/// Run the benchmark on a directory of text files.
pub fn run_benchmark(data_dir: &Path, annotations_path: &Path) -> io::Result<BenchmarkResult> {
    let annotations = parse_annotations(annotations_path)?;
    let mut expected: Vec<&ExpectedCharset> = annotations.values().collect();
    expected.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let file_results: Vec<FileResult> = expected
        .par_iter()
        .map(|expected| benchmark_file(&data_dir.join(&expected.file_name), expected))
        .collect();

    let mut result = BenchmarkResult::default();
    for file_result in &file_results {
        result.total += 1;
        if file_result.error.is_some() {
            result.errors += 1;
        } else if file_result.passed {
            result.passed += 1;
        } else {
            result.failed += 1;
            if file_result.detected.is_none() {
                result.undetected += 1;
            }
        }
    }
    result.file_results = file_results;

    Ok(result)
}

/// Benchmark a single file against its expected charset.
fn benchmark_file(file_path: &Path, expected: &ExpectedCharset) -> FileResult {
    let mut file_result = FileResult {
        file_name: expected.file_name.clone(),
        passed: false,
        expected: expected.charset.clone(),
        detected: None,
        confidence: None,
        error: None,
    };

    if !file_path.exists() {
        file_result.error = Some("File not found".to_string());
        return file_result;
    }

    let mut sniffer = Sniffer::new();
    sniffer.sample_size(SampleSize::All);

    match sniffer.sniff_path(file_path) {
        Ok(Some(detection)) => {
            file_result.passed = charsets_match(&expected.charset, detection.charset);
            file_result.detected = Some(detection.charset);
            file_result.confidence = Some(detection.confidence);
        }
        Ok(None) => {}
        Err(e) => file_result.error = Some(e.to_string()),
    }
    file_result
}

/// Find the annotation file for a data directory.
pub fn find_annotations(data_dir: &Path) -> Option<PathBuf> {
    let dir_name = data_dir.file_name()?.to_str()?;
    let parent = data_dir.parent()?;

    // annotations/<dir>.csv next to the data directory
    let annotations_dir = parent.join("annotations");
    if annotations_dir.is_dir() {
        let annotation_file = annotations_dir.join(format!("{dir_name}.csv"));
        if annotation_file.exists() {
            return Some(annotation_file);
        }
    }

    let direct_annotation = data_dir.join("annotations.csv");
    if fs::metadata(&direct_annotation).is_ok_and(|m| m.is_file()) {
        return Some(direct_annotation);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_charsets_match() {
        assert!(charsets_match("utf-8", "UTF-8"));
        assert!(charsets_match("latin1", "windows-1252"));
        assert!(charsets_match("sjis", "Shift_JIS"));
        assert!(charsets_match("ascii", "ASCII"));
        assert!(!charsets_match("ascii", "windows-1252"));
        assert!(!charsets_match("KOI8-R", "windows-1251"));
        assert!(!charsets_match("UTF-32BE", "UTF-16BE"));
        assert!(charsets_match("UTF-32BE", "utf-32be"));
    }

    #[test]
    fn test_parse_annotations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file_name,charset").unwrap();
        writeln!(file, "# a comment").unwrap();
        writeln!(file, "a.txt, UTF-8").unwrap();
        writeln!(file, "b.txt,windows-1251").unwrap();
        writeln!(file, "broken.txt").unwrap();
        file.flush().unwrap();

        let annotations = parse_annotations(file.path()).unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations["a.txt"].charset, "UTF-8");
        assert_eq!(annotations["b.txt"].charset, "windows-1251");
    }

    #[test]
    fn test_benchmark_result_metrics() {
        let result = BenchmarkResult {
            total: 100,
            passed: 80,
            failed: 15,
            undetected: 5,
            errors: 5,
            file_results: vec![],
        };

        assert!((result.success_ratio() - 0.80).abs() < 0.001);
        assert!((result.failure_ratio() - 0.15).abs() < 0.001);
        assert!((result.error_ratio() - 0.05).abs() < 0.001);
        assert!((result.detection_rate() - 0.947368).abs() < 0.001); // 90/95
        assert!((result.precision() - 0.888888).abs() < 0.001); // 80/90
        assert!((result.recall() - 0.842105).abs() < 0.001); // 80/95
        assert!((result.f1_score() - 0.864864).abs() < 0.001);
    }

    #[test]
    fn test_empty_result_metrics() {
        let result = BenchmarkResult::default();
        assert_eq!(result.success_ratio(), 0.0);
        assert_eq!(result.f1_score(), 0.0);
    }
}
