//! Escape-sequence strategy for the 7-bit stateful encodings.

use crate::filter::LanguageFilter;
use crate::prober::{CharsetProber, ProbingState, SURE_NO, SURE_YES};

const ESC: u8 = 0x1B;

pub const ISO_2022_JP: &str = "ISO-2022-JP";
pub const ISO_2022_KR: &str = "ISO-2022-KR";
pub const ISO_2022_CN: &str = "ISO-2022-CN";
pub const HZ_GB_2312: &str = "HZ-GB-2312";

/// Designator sequences that only appear in one ISO-2022 variant.
const DESIGNATORS: [(&[u8], &str); 14] = [
    (&[ESC, b'$', b'B'], ISO_2022_JP),
    (&[ESC, b'$', b'@'], ISO_2022_JP),
    (&[ESC, b'$', b'(', b'D'], ISO_2022_JP),
    (&[ESC, b'(', b'J'], ISO_2022_JP),
    (&[ESC, b'(', b'I'], ISO_2022_JP),
    (&[ESC, b'$', b')', b'C'], ISO_2022_KR),
    (&[ESC, b'$', b')', b'A'], ISO_2022_CN),
    (&[ESC, b'$', b')', b'G'], ISO_2022_CN),
    (&[ESC, b'$', b'*', b'H'], ISO_2022_CN),
    (&[ESC, b'$', b'+', b'I'], ISO_2022_CN),
    (&[ESC, b'$', b'+', b'J'], ISO_2022_CN),
    (&[ESC, b'$', b'+', b'K'], ISO_2022_CN),
    (&[ESC, b'$', b'+', b'L'], ISO_2022_CN),
    (&[ESC, b'$', b'+', b'M'], ISO_2022_CN),
];

/// Position inside HZ-GB-2312 framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hz {
    Ascii,
    AsciiTilde,
    /// Inside `~{`, with the number of bytes seen so far.
    Gb(usize),
    GbTilde(usize),
}

/// Recognises ISO-2022-JP/KR/CN designators and HZ `~{ ... ~}` framing.
#[derive(Debug, Clone)]
pub struct EscProber {
    jp: bool,
    kr: bool,
    cn: bool,
    tail: [u8; 4],
    hz: Hz,
    state: ProbingState,
    detected: Option<&'static str>,
}

impl EscProber {
    /// Create a prober for the escape encodings allowed by `filter`.
    pub fn new(filter: LanguageFilter) -> Self {
        let mut prober = Self {
            jp: filter.intersects(LanguageFilter::JAPANESE),
            kr: filter.intersects(LanguageFilter::KOREAN),
            cn: filter.intersects(LanguageFilter::CHINESE),
            tail: [0; 4],
            hz: Hz::Ascii,
            state: ProbingState::Detecting,
            detected: None,
        };
        prober.reset();
        prober
    }

    fn enabled(&self, charset: &str) -> bool {
        match charset {
            ISO_2022_JP => self.jp,
            ISO_2022_KR => self.kr,
            _ => self.cn,
        }
    }

    fn push(&mut self, b: u8) {
        self.tail.rotate_left(1);
        self.tail[3] = b;
    }

    fn match_designator(&self) -> Option<&'static str> {
        DESIGNATORS
            .iter()
            .find(|(seq, charset)| self.tail.ends_with(seq) && self.enabled(charset))
            .map(|&(_, charset)| charset)
    }

    /// Advance the HZ framing; returns true once a complete `~{ .. ~}` run is seen.
    fn step_hz(&mut self, b: u8) -> bool {
        self.hz = match (self.hz, b) {
            (Hz::Ascii, b'~') => Hz::AsciiTilde,
            (Hz::Ascii, _) => Hz::Ascii,
            (Hz::AsciiTilde, b'{') => Hz::Gb(0),
            (Hz::AsciiTilde, _) => Hz::Ascii,
            (Hz::Gb(n), b'~') => Hz::GbTilde(n),
            (Hz::Gb(n), _) => Hz::Gb(n + 1),
            (Hz::GbTilde(n), b'}') => {
                if n >= 2 {
                    return true;
                }
                Hz::Ascii
            }
            (Hz::GbTilde(n), _) => Hz::Gb(n + 2),
        };
        false
    }
}

impl CharsetProber for EscProber {
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        for &b in buf {
            if b & 0x80 != 0 {
                self.state = ProbingState::NotMe;
                return self.state;
            }
            self.push(b);
            if let Some(charset) = self.match_designator() {
                self.detected = Some(charset);
                self.state = ProbingState::FoundIt;
                return self.state;
            }
            if self.cn && self.step_hz(b) {
                self.detected = Some(HZ_GB_2312);
                self.state = ProbingState::FoundIt;
                return self.state;
            }
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        match self.state {
            ProbingState::FoundIt => SURE_YES,
            _ => SURE_NO,
        }
    }

    fn charset_name(&self) -> &'static str {
        self.detected.unwrap_or(if self.jp {
            ISO_2022_JP
        } else if self.kr {
            ISO_2022_KR
        } else {
            ISO_2022_CN
        })
    }

    fn reset(&mut self) {
        self.tail = [0; 4];
        self.hz = Hz::Ascii;
        self.detected = None;
        self.state = if self.jp || self.kr || self.cn {
            ProbingState::Detecting
        } else {
            ProbingState::NotMe
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(chunks: &[&[u8]]) -> (ProbingState, &'static str) {
        let mut prober = EscProber::new(LanguageFilter::ALL);
        let mut state = ProbingState::Detecting;
        for chunk in chunks {
            state = prober.handle_data(chunk);
        }
        (state, prober.charset_name())
    }

    #[test]
    fn test_iso_2022_jp() {
        let text = b"Subject: \x1b$B$3$s$K$A$O\x1b(B world";
        assert_eq!(detect(&[text]), (ProbingState::FoundIt, ISO_2022_JP));
    }

    #[test]
    fn test_iso_2022_kr() {
        let text = b"\x1b$)C\x0e!!\x0f";
        assert_eq!(detect(&[text]), (ProbingState::FoundIt, ISO_2022_KR));
    }

    #[test]
    fn test_iso_2022_cn() {
        let text = b"\x1b$)A\x0e<k\x0f";
        assert_eq!(detect(&[text]), (ProbingState::FoundIt, ISO_2022_CN));
    }

    #[test]
    fn test_designator_split_across_chunks() {
        assert_eq!(
            detect(&[b"abc\x1b$", b"Bdef"]),
            (ProbingState::FoundIt, ISO_2022_JP)
        );
    }

    #[test]
    fn test_hz() {
        let text = b"This is HZ: ~{<:Ky2;S{#,~} done";
        assert_eq!(detect(&[text]), (ProbingState::FoundIt, HZ_GB_2312));
    }

    #[test]
    fn test_hz_needs_closing_shift() {
        assert_eq!(detect(&[b"~{<:Ky2;S{"]).0, ProbingState::Detecting);
        // an empty run does not confirm
        assert_eq!(detect(&[b"~{~} and more"]).0, ProbingState::Detecting);
    }

    #[test]
    fn test_ascii_designator_alone_is_undecided() {
        assert_eq!(detect(&[b"\x1b(Bplain"]).0, ProbingState::Detecting);
    }

    #[test]
    fn test_high_byte_rules_out() {
        assert_eq!(detect(&[b"\x1b", &[0xA0]]).0, ProbingState::NotMe);
    }

    #[test]
    fn test_filter_excludes_variants() {
        let mut prober = EscProber::new(LanguageFilter::KOREAN);
        assert_eq!(prober.handle_data(b"\x1b$Bxx"), ProbingState::Detecting);
        assert_eq!(prober.handle_data(b"~{<:Ky~}"), ProbingState::Detecting);
        assert_eq!(prober.handle_data(b"\x1b$)C"), ProbingState::FoundIt);

        let prober = EscProber::new(LanguageFilter::NON_CJK);
        assert_eq!(prober.state(), ProbingState::NotMe);
    }

    #[test]
    fn test_reset() {
        let mut prober = EscProber::new(LanguageFilter::ALL);
        prober.handle_data(b"\x1b$B");
        assert_eq!(prober.state(), ProbingState::FoundIt);
        prober.reset();
        assert_eq!(prober.state(), ProbingState::Detecting);
        assert!((prober.confidence() - SURE_NO).abs() < f32::EPSILON);
        // the old tail must not combine with new bytes
        assert_eq!(prober.handle_data(b"B"), ProbingState::Detecting);
    }
}
