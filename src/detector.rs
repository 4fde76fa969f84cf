//! The detection orchestrator.
//!
//! A [`Detector`] owns one detection session: BOM sniffing on the first
//! chunk, input classification, lazy construction of the strategies the
//! classification calls for, and the end-of-stream resolution policy.

use std::io::Read;

use crate::bom::sniff_bom;
use crate::detection::{ASCII, Detection, Report};
use crate::error::{Result, SnifferError};
use crate::factory::{ProberFactory, StandardProbers};
use crate::filter::LanguageFilter;
use crate::input::{InputClassifier, InputState};
use crate::prober::{CharsetProber, MINIMUM_THRESHOLD, ProbingState};

/// Streaming character-encoding detector.
///
/// Feed successive chunks with [`feed`](Self::feed), then call
/// [`finish`](Self::finish) at end of stream; the verdict, if any, goes to
/// the session's [`Report`] sink. The detector keeps no reference to the
/// chunks it is given.
///
/// # Example
///
/// ```
/// use charset_nose::Detector;
///
/// let mut detector = Detector::new();
/// detector.feed("d\u{e9}j\u{e0} vu, ".as_bytes());
/// detector.feed("na\u{ef}ve caf\u{e9} cr\u{e8}me".as_bytes());
/// detector.finish();
///
/// let detection = detector.detection().unwrap();
/// assert_eq!(detection.charset, "UTF-8");
/// ```
#[derive(Debug)]
pub struct Detector<R: Report = Option<Detection>> {
    factory: Box<dyn ProberFactory>,
    classifier: InputClassifier,
    /// True until the first non-empty chunk has been seen.
    start: bool,
    got_data: bool,
    done: bool,
    reported: bool,
    detected: Option<&'static str>,
    escape: Option<Box<dyn CharsetProber>>,
    multi_byte: Option<Box<dyn CharsetProber>>,
    single_byte: Option<Box<dyn CharsetProber>>,
    latin1: Option<Box<dyn CharsetProber>>,
    reporter: R,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// Create a detector that keeps its verdict for [`detection`](Self::detection).
    pub fn new() -> Self {
        Self::with_reporter(None)
    }

    /// The verdict of the last [`finish`](Self::finish), if one was reached.
    pub fn detection(&self) -> Option<&Detection> {
        self.reporter.as_ref()
    }
}

impl<R: Report> Detector<R> {
    /// Create a detector that hands its verdict to `reporter`.
    pub fn with_reporter(reporter: R) -> Self {
        Self {
            factory: Box::new(StandardProbers::default()),
            classifier: InputClassifier::new(),
            start: true,
            got_data: false,
            done: false,
            reported: false,
            detected: None,
            escape: None,
            multi_byte: None,
            single_byte: None,
            latin1: None,
            reporter,
        }
    }

    /// Restrict the built-in strategies to the given language families.
    ///
    /// Only affects strategies that have not been created yet.
    pub fn language_filter(&mut self, filter: LanguageFilter) -> &mut Self {
        self.factory = Box::new(StandardProbers::new(filter));
        self
    }

    /// Replace the strategy factory.
    ///
    /// Only affects strategies that have not been created yet.
    pub fn probers<F: ProberFactory + 'static>(&mut self, factory: F) -> &mut Self {
        self.factory = Box::new(factory);
        self
    }

    /// Current input classification.
    pub fn input_state(&self) -> InputState {
        self.classifier.state()
    }

    /// Returns true once the detector has settled and ignores further input.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The report hook, e.g. to read a collected `Option<Detection>`.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Consume the detector and hand back its report hook.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Consume the next chunk of the stream.
    ///
    /// A no-op once the detector is done. An empty chunk changes nothing.
    pub fn feed(&mut self, chunk: &[u8]) {
        if self.done || chunk.is_empty() {
            return;
        }
        self.got_data = true;

        if self.start {
            self.start = false;
            if let Some(charset) = sniff_bom(chunk) {
                log::debug!("byte-order mark found: {charset}");
                self.detected = Some(charset);
                self.done = true;
                return;
            }
        }

        let before = self.classifier.state();
        let after = self.classifier.classify(chunk);
        if before != after {
            log::debug!("input state {before} -> {after}");
            if after == InputState::HighByte {
                self.enter_high_byte();
            }
        }

        match after {
            InputState::EscAscii => self.feed_escape(chunk),
            InputState::HighByte => self.feed_high_byte(chunk),
            InputState::PureAscii => {}
        }
    }

    /// Consume `len` bytes of `buf` starting at `offset`.
    ///
    /// Fails without touching the session if the range does not lie inside `buf`.
    pub fn feed_range(&mut self, buf: &[u8], offset: usize, len: usize) -> Result<()> {
        let chunk = offset
            .checked_add(len)
            .and_then(|end| buf.get(offset..end))
            .ok_or(SnifferError::InvalidRange {
                offset,
                len,
                buf_len: buf.len(),
            })?;
        self.feed(chunk);
        Ok(())
    }

    /// Stream `reader` into the detector in `chunk_size` pieces.
    ///
    /// Stops at end of input, once the detector is done, or after `limit`
    /// bytes. Returns the number of bytes fed. Does not call `finish`.
    pub fn feed_reader<T: Read>(
        &mut self,
        mut reader: T,
        chunk_size: usize,
        limit: Option<usize>,
    ) -> Result<usize> {
        if chunk_size == 0 {
            return Err(SnifferError::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        let mut buffer = vec![0u8; chunk_size];
        let mut total = 0;
        while !self.done {
            let want = limit.map_or(chunk_size, |limit| chunk_size.min(limit - total));
            if want == 0 {
                break;
            }
            let read = match reader.read(&mut buffer[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.feed(&buffer[..read]);
            total += read;
        }
        Ok(total)
    }

    /// Signal end of stream and report the verdict, if there is one.
    ///
    /// Does nothing if no data was ever fed, and reports at most once until
    /// the next [`reset`](Self::reset).
    pub fn finish(&mut self) {
        if !self.got_data || self.reported {
            return;
        }

        let detection = if let Some(charset) = self.detected {
            self.done = true;
            Some(Detection::new(charset, 1.0))
        } else {
            match self.classifier.state() {
                InputState::HighByte => self.best_guess(),
                InputState::PureAscii => Some(Detection::new(ASCII, 1.0)),
                InputState::EscAscii => None,
            }
        };

        match detection {
            Some(detection) => {
                log::debug!("detected {detection}");
                self.reported = true;
                self.reporter.report(detection);
            }
            None => log::debug!("no confident guess"),
        }
    }

    /// Return to the just-constructed state, keeping created strategies for reuse.
    pub fn reset(&mut self) {
        self.classifier.reset();
        self.start = true;
        self.got_data = false;
        self.done = false;
        self.reported = false;
        self.detected = None;
        for prober in [
            &mut self.escape,
            &mut self.multi_byte,
            &mut self.single_byte,
            &mut self.latin1,
        ]
        .into_iter()
        .flatten()
        {
            prober.reset();
        }
        self.reporter.reset();
    }

    /// Drop escape handling and create the high-byte strategies that are missing.
    fn enter_high_byte(&mut self) {
        if self.escape.take().is_some() {
            log::debug!("discarding escape-sequence prober");
        }
        if self.multi_byte.is_none() {
            self.multi_byte = Some(self.factory.multi_byte());
        }
        if self.single_byte.is_none() {
            self.single_byte = Some(self.factory.single_byte());
        }
        if self.latin1.is_none() {
            self.latin1 = Some(self.factory.latin1());
        }
    }

    fn feed_escape(&mut self, chunk: &[u8]) {
        let factory = &self.factory;
        let prober = self.escape.get_or_insert_with(|| factory.escape());
        if prober.handle_data(chunk) == ProbingState::FoundIt {
            let charset = prober.charset_name();
            log::debug!("escape sequence confirmed {charset}");
            self.detected = Some(charset);
            self.done = true;
        }
    }

    /// Feed the chunk to the high-byte strategies in their fixed order,
    /// stopping at the first that confirms.
    fn feed_high_byte(&mut self, chunk: &[u8]) {
        let confirmed = self.high_byte_probers_mut().find_map(|prober| {
            (prober.handle_data(chunk) == ProbingState::FoundIt).then(|| prober.charset_name())
        });
        if let Some(charset) = confirmed {
            log::debug!("{charset} confirmed");
            self.detected = Some(charset);
            self.done = true;
        }
    }

    fn high_byte_probers_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn CharsetProber>> {
        [&mut self.multi_byte, &mut self.single_byte, &mut self.latin1]
            .into_iter()
            .flatten()
    }

    /// The most confident high-byte strategy, if it clears the minimum threshold.
    fn best_guess(&self) -> Option<Detection> {
        let mut best: Option<&dyn CharsetProber> = None;
        let mut max_confidence = 0.0f32;
        for prober in [&self.multi_byte, &self.single_byte, &self.latin1]
            .into_iter()
            .flatten()
        {
            let confidence = prober.confidence();
            log::trace!("{}: {confidence:.3}", prober.charset_name());
            if best.is_none() || confidence > max_confidence {
                max_confidence = confidence;
                best = Some(&**prober);
            }
        }

        best.filter(|_| max_confidence > MINIMUM_THRESHOLD)
            .map(|prober| Detection::new(prober.charset_name(), max_confidence))
    }
}
