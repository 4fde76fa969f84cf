//! Streaming UTF-8 validation.

use simdutf8::compat::from_utf8;

use crate::prober::{CharsetProber, ProbingState, SHORTCUT_THRESHOLD, SURE_NO, SURE_YES};

/// Probability that a multi-byte sequence is valid UTF-8 by accident.
const ONE_CHAR_PROB: f32 = 0.5;

/// Multi-byte characters after which confidence saturates.
const SATURATION: usize = 6;

/// Length of the sequence introduced by a UTF-8 lead byte.
const fn sequence_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

/// Validates UTF-8 across chunk boundaries and counts multi-byte characters.
///
/// An incomplete sequence at the end of a chunk is carried (at most three
/// bytes) and completed from the next chunk.
#[derive(Debug, Clone, Default)]
pub struct Utf8Prober {
    pending: [u8; 4],
    pending_len: usize,
    multi_byte_chars: usize,
    state: ProbingState,
}

impl Utf8Prober {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish a sequence split by the previous chunk; returns the unconsumed input.
    fn complete_pending<'a>(&mut self, buf: &'a [u8]) -> &'a [u8] {
        let need = sequence_len(self.pending[0]) - self.pending_len;
        let take = need.min(buf.len());
        self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&buf[..take]);
        self.pending_len += take;

        if take < need {
            return &[];
        }

        if from_utf8(&self.pending[..self.pending_len]).is_ok() {
            self.multi_byte_chars += 1;
        } else {
            self.state = ProbingState::NotMe;
        }
        self.pending_len = 0;
        &buf[take..]
    }

    fn count(&mut self, valid: &[u8]) {
        self.multi_byte_chars += valid.iter().filter(|&&b| b >= 0xC0).count();
    }
}

impl CharsetProber for Utf8Prober {
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        let rest = if self.pending_len > 0 {
            self.complete_pending(buf)
        } else {
            buf
        };
        if self.state == ProbingState::NotMe {
            return self.state;
        }

        match from_utf8(rest) {
            Ok(_) => self.count(rest),
            Err(e) => {
                let (valid, tail) = rest.split_at(e.valid_up_to());
                self.count(valid);
                if e.error_len().is_some() {
                    self.state = ProbingState::NotMe;
                    return self.state;
                }
                self.pending[..tail.len()].copy_from_slice(tail);
                self.pending_len = tail.len();
            }
        }

        if self.confidence() > SHORTCUT_THRESHOLD {
            self.state = ProbingState::FoundIt;
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state == ProbingState::NotMe {
            return SURE_NO;
        }
        if self.multi_byte_chars < SATURATION {
            let unlike = SURE_YES * ONE_CHAR_PROB.powi(self.multi_byte_chars as i32);
            1.0 - unlike
        } else {
            SURE_YES
        }
    }

    fn charset_name(&self) -> &'static str {
        "UTF-8"
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirms_after_a_few_characters() {
        let mut prober = Utf8Prober::new();
        assert_eq!(prober.handle_data("caf\u{e9}".as_bytes()), ProbingState::Detecting);
        assert_eq!(
            prober.handle_data("\u{fc}ber na\u{ef}ve \u{e7}a \u{e0}".as_bytes()),
            ProbingState::FoundIt
        );
        // five characters clear the shortcut without saturating
        let expected = 1.0 - SURE_YES * 0.5_f32.powi(5);
        assert!((prober.confidence() - expected).abs() < 1e-6);
        assert!(prober.confidence() > SHORTCUT_THRESHOLD);
        assert!(prober.confidence() < SURE_YES);
    }

    #[test]
    fn test_confidence_saturates_at_six_characters() {
        let mut prober = Utf8Prober::new();
        assert_eq!(
            prober.handle_data("\u{fc}ber na\u{ef}ve \u{e7}a \u{e0} c\u{f4}t\u{e9}".as_bytes()),
            ProbingState::FoundIt
        );
        assert_eq!(prober.multi_byte_chars, 6);
        assert!((prober.confidence() - SURE_YES).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sequence_split_across_chunks() {
        let bytes = "\u{65e5}\u{672c}".as_bytes();
        let mut prober = Utf8Prober::new();
        assert_eq!(prober.handle_data(&bytes[..1]), ProbingState::Detecting);
        assert_eq!(prober.handle_data(&bytes[1..2]), ProbingState::Detecting);
        assert_eq!(prober.handle_data(&bytes[2..4]), ProbingState::Detecting);
        assert_eq!(prober.handle_data(&bytes[4..]), ProbingState::Detecting);
        assert_eq!(prober.multi_byte_chars, 2);
        assert!((prober.confidence() - (1.0 - 0.99 * 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_sequence() {
        let mut prober = Utf8Prober::new();
        assert_eq!(prober.handle_data(b"caf\xe9 au lait"), ProbingState::NotMe);
        assert!((prober.confidence() - SURE_NO).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_continuation_in_next_chunk() {
        let mut prober = Utf8Prober::new();
        assert_eq!(prober.handle_data(&[b'a', 0xE6]), ProbingState::Detecting);
        assert_eq!(prober.handle_data(b"bc"), ProbingState::NotMe);
    }

    #[test]
    fn test_ascii_only() {
        let mut prober = Utf8Prober::new();
        prober.handle_data(b"plain text");
        assert!((prober.confidence() - SURE_NO).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut prober = Utf8Prober::new();
        prober.handle_data(&[0xFF]);
        assert_eq!(prober.state(), ProbingState::NotMe);
        prober.reset();
        assert_eq!(prober.state(), ProbingState::Detecting);
        assert_eq!(prober.handle_data("\u{e9}".as_bytes()), ProbingState::Detecting);
    }
}
