//! Whole-input convenience front end over [`Detector`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::detection::Detection;
use crate::detector::Detector;
use crate::error::{Result, SnifferError};
use crate::filter::LanguageFilter;
use crate::sample::{DEFAULT_CHUNK_SIZE, SampleSize};

/// Charset sniffer for complete inputs: byte slices, readers and files.
///
/// Each call runs a fresh detection session, feeding the input in
/// fixed-size chunks until the sample is exhausted or a strategy confirms.
///
/// # Example
///
/// ```no_run
/// use charset_nose::{SampleSize, Sniffer};
///
/// let mut sniffer = Sniffer::new();
/// sniffer.sample_size(SampleSize::Bytes(16 * 1024));
///
/// match sniffer.sniff_path("message.txt").unwrap() {
///     Some(detection) => println!("{} ({:.2})", detection.charset, detection.confidence),
///     None => println!("unknown"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Sniffer {
    /// Sample size for sniffing.
    sample_size: SampleSize,
    /// Size of each chunk fed to the detector.
    chunk_size: usize,
    /// Languages the built-in probers consider.
    language_filter: LanguageFilter,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    /// Create a new Sniffer with default settings.
    pub fn new() -> Self {
        Self {
            sample_size: SampleSize::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            language_filter: LanguageFilter::ALL,
        }
    }

    /// Set the sample size for sniffing.
    pub fn sample_size(&mut self, sample_size: SampleSize) -> &mut Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the size of the chunks fed to the detector.
    pub fn chunk_size(&mut self, chunk_size: usize) -> &mut Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Restrict detection to the given language families.
    pub fn language_filter(&mut self, language_filter: LanguageFilter) -> &mut Self {
        self.language_filter = language_filter;
        self
    }

    /// Sniff the file at the given path.
    pub fn sniff_path<P: AsRef<Path>>(&self, path: P) -> Result<Option<Detection>> {
        let file = File::open(path.as_ref())?;
        self.sniff_reader(BufReader::new(file))
    }

    /// Sniff data from a reader.
    pub fn sniff_reader<R: Read>(&self, reader: R) -> Result<Option<Detection>> {
        let mut detector = self.detector()?;
        detector.feed_reader(reader, self.chunk_size, self.sample_size.bytes())?;
        detector.finish();
        Ok(detector.detection().copied())
    }

    /// Sniff data from bytes.
    pub fn sniff_bytes(&self, data: &[u8]) -> Result<Option<Detection>> {
        let mut detector = self.detector()?;
        let limit = self.sample_size.bytes().map_or(data.len(), |n| n.min(data.len()));
        for chunk in data[..limit].chunks(self.chunk_size) {
            if detector.is_done() {
                break;
            }
            detector.feed(chunk);
        }
        detector.finish();
        Ok(detector.detection().copied())
    }

    /// Build a detector for one session, validating the configuration.
    pub fn detector(&self) -> Result<Detector> {
        if self.chunk_size == 0 {
            return Err(SnifferError::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if self.language_filter.is_empty() {
            return Err(SnifferError::InvalidConfig(
                "language filter enables no language".to_string(),
            ));
        }

        let mut detector = Detector::new();
        detector.language_filter(self.language_filter);
        Ok(detector)
    }
}

/// Detect the encoding of a complete buffer with default settings.
///
/// Returns `None` when no guess clears the minimum confidence, or when
/// `data` is empty.
pub fn detect(data: &[u8]) -> Option<Detection> {
    let mut detector = Detector::new();
    detector.feed(data);
    detector.finish();
    detector.detection().copied()
}
