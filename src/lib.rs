//! charset-nose: streaming character-encoding detection
//!
//! Feed a byte stream chunk by chunk and get back the most plausible
//! encoding label with a confidence score. Detection runs in three stages:
//! a byte-order-mark check on the first chunk, escape-sequence recognition
//! for 7-bit stateful encodings (ISO-2022-*, HZ), and a set of statistical
//! probers (UTF-8, CJK multi-byte, single-byte code pages, Latin-1) once
//! 8-bit data shows up.
//!
//! # Quick Start
//!
//! ```
//! use charset_nose::Detector;
//!
//! let mut detector = Detector::new();
//! for chunk in "Grüße aus Köln".as_bytes().chunks(4) {
//!     detector.feed(chunk);
//! }
//! detector.finish();
//!
//! let detection = detector.detection().unwrap();
//! println!("{} ({:.2})", detection.charset, detection.confidence);
//! ```
//!
//! # Whole inputs
//!
//! ```no_run
//! use charset_nose::{SampleSize, Sniffer};
//!
//! let mut sniffer = Sniffer::new();
//! sniffer.sample_size(SampleSize::All);
//!
//! if let Some(detection) = sniffer.sniff_path("legacy.txt").unwrap() {
//!     println!("{detection}");
//! }
//! ```
//!
//! # Custom reporting and probers
//!
//! [`Detector::with_reporter`] hands each verdict to any [`Report`] sink,
//! including a closure. [`Detector::probers`] swaps in a custom
//! [`ProberFactory`] so that every strategy the detector builds can be
//! replaced with your own [`CharsetProber`].

pub mod benchmark;
mod bom;
mod detection;
mod detector;
mod error;
mod factory;
mod filter;
mod group;
#[cfg(feature = "http")]
pub mod http;
mod input;
mod prober;
pub mod probers;
mod sample;
mod sniffer;

pub use bom::{BOM_TABLE, sniff_bom};
pub use detection::{ASCII, Detection, Report};
pub use detector::Detector;
pub use error::{Result, SnifferError};
pub use factory::{ProberFactory, StandardProbers};
pub use filter::LanguageFilter;
pub use group::ProberGroup;
pub use input::{InputState, is_high_byte};
pub use prober::{CharsetProber, MINIMUM_THRESHOLD, ProbingState, SHORTCUT_THRESHOLD};
pub use sample::{DEFAULT_CHUNK_SIZE, DEFAULT_SAMPLE_BYTES, SampleSize};
pub use sniffer::{Sniffer, detect};
