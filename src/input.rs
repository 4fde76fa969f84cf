//! Input classification state machine.
//!
//! Decides, byte by byte, whether the stream is pure 7-bit text, 7-bit text
//! carrying escape or shift sequences, or text with raw high-bit bytes. The
//! resulting state selects which strategy family the orchestrator feeds.

use std::fmt;

const ESC: u8 = 0x1B;
const TILDE: u8 = b'~';
const LEFT_BRACE: u8 = b'{';

/// Latin-1 non-breaking space, too common in 7-bit Latin-1 text to count as high-bit.
const NBSP: u8 = 0xA0;

/// Classification of the input seen so far.
///
/// Advances monotonically: `PureAscii` may move to `EscAscii` or `HighByte`,
/// `EscAscii` may move to `HighByte`, and `HighByte` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputState {
    /// Only 7-bit bytes, no escape sequence.
    #[default]
    PureAscii,
    /// 7-bit bytes with an ESC byte or an HZ `~{` shift.
    EscAscii,
    /// At least one high-bit byte other than 0xA0.
    HighByte,
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputState::PureAscii => write!(f, "pure ASCII"),
            InputState::EscAscii => write!(f, "escaped ASCII"),
            InputState::HighByte => write!(f, "high byte"),
        }
    }
}

/// Returns true if `b` counts as a high-bit byte for classification.
#[inline]
pub const fn is_high_byte(b: u8) -> bool {
    b & 0x80 != 0 && b != NBSP
}

/// Byte classifier with one byte of lookback.
///
/// The lookback survives chunk boundaries, so a `~` ending one chunk and a
/// `{` starting the next still form an HZ shift.
#[derive(Debug, Clone, Default)]
pub struct InputClassifier {
    state: InputState,
    last_char: u8,
}

impl InputClassifier {
    /// Create a classifier in the `PureAscii` state.
    pub const fn new() -> Self {
        Self {
            state: InputState::PureAscii,
            last_char: 0x00,
        }
    }

    /// Current classification.
    pub const fn state(&self) -> InputState {
        self.state
    }

    /// Classify every byte of `chunk` and return the resulting state.
    pub fn classify(&mut self, chunk: &[u8]) -> InputState {
        for &b in chunk {
            if is_high_byte(b) {
                self.state = InputState::HighByte;
            } else {
                if self.state == InputState::PureAscii
                    && (b == ESC || (b == LEFT_BRACE && self.last_char == TILDE))
                {
                    self.state = InputState::EscAscii;
                }
                self.last_char = b;
            }
        }
        self.state
    }

    /// Return to `PureAscii` with no lookback.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_ascii() {
        let mut classifier = InputClassifier::new();
        assert_eq!(classifier.classify(b"Hello, World!\r\n"), InputState::PureAscii);
        assert_eq!(classifier.classify(b"{ braces } ~ tildes"), InputState::PureAscii);
    }

    #[test]
    fn test_escape_byte() {
        let mut classifier = InputClassifier::new();
        assert_eq!(classifier.classify(b"abc\x1b$Bdef"), InputState::EscAscii);
        // EscAscii never returns to PureAscii
        assert_eq!(classifier.classify(b"plain"), InputState::EscAscii);
    }

    #[test]
    fn test_hz_shift_spanning_chunks() {
        let mut classifier = InputClassifier::new();
        assert_eq!(classifier.classify(b"abc~"), InputState::PureAscii);
        assert_eq!(classifier.classify(b"{def"), InputState::EscAscii);
    }

    #[test]
    fn test_brace_without_tilde() {
        let mut classifier = InputClassifier::new();
        assert_eq!(classifier.classify(b"~ {"), InputState::PureAscii);
    }

    #[test]
    fn test_nbsp_is_not_high_byte() {
        let mut classifier = InputClassifier::new();
        assert_eq!(classifier.classify(&[b'a', NBSP, b'b']), InputState::PureAscii);
        assert!(!is_high_byte(NBSP));
        assert!(is_high_byte(0xA1));
        assert!(is_high_byte(0x80));
        assert!(!is_high_byte(0x7F));
    }

    #[test]
    fn test_high_byte_is_terminal() {
        let mut classifier = InputClassifier::new();
        assert_eq!(classifier.classify(b"\x1b(B"), InputState::EscAscii);
        assert_eq!(classifier.classify(&[0xE9]), InputState::HighByte);
        assert_eq!(classifier.classify(b"\x1b~{plain"), InputState::HighByte);
    }

    #[test]
    fn test_reset() {
        let mut classifier = InputClassifier::new();
        classifier.classify(b"~");
        classifier.classify(&[0xC3, 0xA9]);
        classifier.reset();
        assert_eq!(classifier.state(), InputState::PureAscii);
        // lookback was cleared, so the brace alone does not shift
        assert_eq!(classifier.classify(b"{"), InputState::PureAscii);
    }
}
