//! Western European fallback strategy.

use crate::prober::{CharsetProber, ProbingState, SURE_NO};

/// Byte classes of windows-1252.
const UDF: u8 = 0; // undefined
const OTH: u8 = 1; // other
const ASC: u8 = 2; // ASCII capital letter
const ASS: u8 = 3; // ASCII small letter
const ACV: u8 = 4; // accented capital vowel
const ACO: u8 = 5; // accented capital other
const ASV: u8 = 6; // accented small vowel
const ASO: u8 = 7; // accented small other
const CLASS_COUNT: usize = 8;

/// Likelihood of class `row` followed by class `col`:
/// 0 illegal, 1 very unlikely, 2 normal, 3 very likely.
#[rustfmt::skip]
const CLASS_MODEL: [[u8; CLASS_COUNT]; CLASS_COUNT] = [
//   UDF OTH ASC ASS ACV ACO ASV ASO
    [0,  0,  0,  0,  0,  0,  0,  0], // UDF
    [0,  3,  3,  3,  3,  3,  3,  3], // OTH
    [0,  3,  3,  3,  3,  3,  3,  3], // ASC
    [0,  3,  3,  3,  1,  1,  3,  3], // ASS
    [0,  3,  3,  3,  1,  2,  1,  2], // ACV
    [0,  3,  3,  3,  3,  3,  3,  3], // ACO
    [0,  3,  1,  3,  1,  1,  1,  3], // ASV
    [0,  3,  1,  3,  1,  1,  3,  3], // ASO
];

/// Latin-1 guesses are scaled down so a specific model wins a close call.
const CONFIDENCE_SCALE: f32 = 0.73;

/// Weight of a very unlikely transition against very likely ones.
const UNLIKELY_WEIGHT: f32 = 20.0;

const fn byte_class(b: u8) -> u8 {
    match b {
        b'A'..=b'Z' => ASC,
        b'a'..=b'z' => ASS,
        0x00..=0x7F => OTH,
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => UDF,
        // Š Œ Ž Ÿ
        0x8A | 0x8C | 0x8E | 0x9F => ACO,
        // š œ ž
        0x9A | 0x9C | 0x9E => ASO,
        0x80..=0xBF => OTH,
        0xC0..=0xC5 | 0xC8..=0xCF | 0xD2..=0xD6 | 0xD8..=0xDC => ACV,
        0xC6 | 0xC7 | 0xD0 | 0xD1 | 0xDD..=0xDF => ACO,
        0xD7 | 0xF7 => OTH,
        0xE0..=0xE5 | 0xE8..=0xEF | 0xF2..=0xF6 | 0xF8..=0xFC => ASV,
        0xE6 | 0xE7 | 0xF0 | 0xF1 | 0xFD..=0xFF => ASO,
    }
}

/// Scores windows-1252 by how plausible consecutive byte classes are.
#[derive(Debug, Clone)]
pub struct Latin1Prober {
    last_class: u8,
    freq: [u32; 4],
    state: ProbingState,
}

impl Default for Latin1Prober {
    fn default() -> Self {
        Self::new()
    }
}

impl Latin1Prober {
    pub const fn new() -> Self {
        Self {
            last_class: OTH,
            freq: [0; 4],
            state: ProbingState::Detecting,
        }
    }
}

impl CharsetProber for Latin1Prober {
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        for &b in buf {
            let class = byte_class(b);
            let likelihood = CLASS_MODEL[self.last_class as usize][class as usize];
            if likelihood == 0 {
                self.state = ProbingState::NotMe;
                break;
            }
            self.freq[likelihood as usize] += 1;
            self.last_class = class;
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
        let total: u32 = self.freq.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let score = (self.freq[3] as f32 - self.freq[1] as f32 * UNLIKELY_WEIGHT) / total as f32;
        score.max(0.0) * CONFIDENCE_SCALE
    }

    fn charset_name(&self) -> &'static str {
        encoding_rs::WINDOWS_1252.name()
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_classes() {
        assert_eq!(byte_class(b'Q'), ASC);
        assert_eq!(byte_class(b'q'), ASS);
        assert_eq!(byte_class(b' '), OTH);
        assert_eq!(byte_class(0x81), UDF);
        assert_eq!(byte_class(0xE9), ASV); // é
        assert_eq!(byte_class(0xE7), ASO); // ç
        assert_eq!(byte_class(0xC9), ACV); // É
        assert_eq!(byte_class(0xD7), OTH); // ×
    }

    #[test]
    fn test_french_text() {
        let mut prober = Latin1Prober::new();
        prober.handle_data(b"Le gar\xe7on \xe9tait tr\xe8s content de voir sa s\x9cur \xe0 No\xebl.");
        assert_eq!(prober.state(), ProbingState::Detecting);
        assert!(prober.confidence() > 0.6);
        assert_eq!(prober.charset_name(), "windows-1252");
    }

    #[test]
    fn test_undefined_byte_rules_out() {
        let mut prober = Latin1Prober::new();
        assert_eq!(prober.handle_data(b"abc\x81def"), ProbingState::NotMe);
        assert!((prober.confidence() - SURE_NO).abs() < f32::EPSILON);
    }

    #[test]
    fn test_accent_runs_score_low() {
        // Cyrillic windows-1251 bytes read as Latin-1: runs of accented letters
        let mut prober = Latin1Prober::new();
        prober.handle_data(b"\xcf\xf0\xe8\xe2\xe5\xf2 \xec\xe8\xf0 \xe8 \xe4\xf0\xf3\xe7\xfc\xff");
        assert!(prober.confidence() < 0.2);
    }

    #[test]
    fn test_reset() {
        let mut prober = Latin1Prober::new();
        prober.handle_data(&[0x90]);
        prober.reset();
        assert_eq!(prober.state(), ProbingState::Detecting);
        assert_eq!(prober.confidence(), 0.0);
    }
}
