//! Detection results and the hook they are reported through.

use std::fmt;

use encoding_rs::{Encoding, REPLACEMENT, UTF_8};

/// Label reported for input made only of 7-bit bytes.
pub const ASCII: &str = "ASCII";

/// Final verdict of a detection: an encoding label and a confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Encoding label, e.g. `"UTF-8"`, `"Shift_JIS"`, `"windows-1251"`.
    pub charset: &'static str,
    /// Confidence of the guess; 1.0 for BOM, escape and pure ASCII verdicts.
    pub confidence: f32,
}

impl Detection {
    pub const fn new(charset: &'static str, confidence: f32) -> Self {
        Self {
            charset,
            confidence,
        }
    }

    /// Resolve the label to an `encoding_rs` encoding.
    ///
    /// Pure ASCII resolves to UTF-8. Labels encoding_rs cannot decode
    /// (UTF-32, UCS-4, ISO-2022-KR/CN, HZ) resolve to `None`.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        if self.charset == ASCII {
            return Some(UTF_8);
        }
        Encoding::for_label(self.charset.as_bytes()).filter(|&encoding| encoding != REPLACEMENT)
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.charset, self.confidence)
    }
}

/// Receives the verdict of each completed detection.
pub trait Report {
    /// Called at most once per detection, from [`Detector::finish`](crate::Detector::finish).
    fn report(&mut self, detection: Detection);

    /// Called by [`Detector::reset`](crate::Detector::reset).
    fn reset(&mut self) {}
}

/// Keeps the latest verdict.
impl Report for Option<Detection> {
    fn report(&mut self, detection: Detection) {
        *self = Some(detection);
    }

    fn reset(&mut self) {
        *self = None;
    }
}

impl<F: FnMut(Detection)> Report for F {
    fn report(&mut self, detection: Detection) {
        self(detection);
    }
}
