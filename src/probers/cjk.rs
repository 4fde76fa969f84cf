//! Multi-byte CJK strategies.
//!
//! Each prober runs a byte-level coding state machine for its encoding: an
//! invalid sequence rules the encoding out, and every complete character is
//! tallied as either "common" or "rare" by the region of the code table it
//! falls in. Real text concentrates in a handful of regions (kana, level-1
//! kanji and hanzi, Hangul syllables), while text in some other encoding
//! decoded through the wrong table scatters across rare regions.
//!
//! Characters glued to ASCII letters count against the encoding: that is
//! what accented Latin text looks like through a CJK table.

use encoding_rs::{BIG5, EUC_JP, EUC_KR, Encoding, GB18030, SHIFT_JIS};

use crate::prober::{CharsetProber, ProbingState, SHORTCUT_THRESHOLD, SURE_NO, SURE_YES};

/// Characters required before confidence rises above `SURE_NO`.
const MINIMUM_DATA: usize = 3;

/// Characters required before a prober may confirm itself early.
const ENOUGH_DATA: usize = 1024;

/// Multi-byte encodings with a built-in coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CjkScheme {
    ShiftJis,
    EucJp,
    EucKr,
    Gb18030,
    Big5,
}

impl CjkScheme {
    /// The encoding_rs encoding this scheme corresponds to.
    pub fn encoding(self) -> &'static Encoding {
        match self {
            CjkScheme::ShiftJis => SHIFT_JIS,
            CjkScheme::EucJp => EUC_JP,
            CjkScheme::EucKr => EUC_KR,
            CjkScheme::Gb18030 => GB18030,
            CjkScheme::Big5 => BIG5,
        }
    }
}

/// Outcome of feeding one byte to a coding state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The byte was consumed into an incomplete character.
    Pending,
    /// A single-byte character (ASCII) completed.
    Single,
    /// A non-ASCII character completed.
    Char { common: bool },
    /// The byte cannot appear here.
    Invalid,
}

#[inline]
const fn in_range(b: u8, lo: u8, hi: u8) -> bool {
    b >= lo && b <= hi
}

/// Coding state machine for one CJK encoding.
#[derive(Debug, Clone)]
pub struct CjkProber {
    scheme: CjkScheme,
    /// Bytes of the character in progress.
    seq: [u8; 4],
    seq_len: usize,
    total_chars: usize,
    common_chars: usize,
    /// Boundaries between a non-ASCII character and an ASCII letter.
    mixed_pairs: usize,
    prev_letter: bool,
    prev_multi: bool,
    /// Whether the character in progress started right after an ASCII letter.
    after_letter: bool,
    state: ProbingState,
}

impl CjkProber {
    pub fn new(scheme: CjkScheme) -> Self {
        Self {
            scheme,
            seq: [0; 4],
            seq_len: 0,
            total_chars: 0,
            common_chars: 0,
            mixed_pairs: 0,
            prev_letter: false,
            prev_multi: false,
            after_letter: false,
            state: ProbingState::Detecting,
        }
    }

    pub const fn scheme(&self) -> CjkScheme {
        self.scheme
    }

    fn step(&mut self, b: u8) -> Step {
        self.seq[self.seq_len] = b;
        self.seq_len += 1;
        let step = match self.scheme {
            CjkScheme::ShiftJis => self.step_shift_jis(),
            CjkScheme::EucJp => self.step_euc_jp(),
            CjkScheme::EucKr => self.step_euc_kr(),
            CjkScheme::Gb18030 => self.step_gb18030(),
            CjkScheme::Big5 => self.step_big5(),
        };
        if step != Step::Pending {
            self.seq_len = 0;
        }
        step
    }

    fn step_shift_jis(&self) -> Step {
        let lead = self.seq[0];
        match self.seq_len {
            1 => match lead {
                0x00..=0x7F => Step::Single,
                // half-width katakana
                0xA1..=0xDF => Step::Char { common: false },
                0x81..=0x9F | 0xE0..=0xFC => Step::Pending,
                _ => Step::Invalid,
            },
            _ => {
                let trail = self.seq[1];
                if in_range(trail, 0x40, 0x7E) || in_range(trail, 0x80, 0xFC) {
                    // punctuation, kana and level-1 kanji
                    let common = matches!(lead, 0x81..=0x83 | 0x88..=0x98);
                    Step::Char { common }
                } else {
                    Step::Invalid
                }
            }
        }
    }

    fn step_euc_jp(&self) -> Step {
        let lead = self.seq[0];
        match (lead, self.seq_len) {
            (0x00..=0x7F, 1) => Step::Single,
            (0x8E | 0x8F | 0xA1..=0xFE, 1) => Step::Pending,
            (_, 1) => Step::Invalid,
            // half-width katakana
            (0x8E, _) => {
                if in_range(self.seq[1], 0xA1, 0xDF) {
                    Step::Char { common: false }
                } else {
                    Step::Invalid
                }
            }
            // JIS X 0212 supplementary plane
            (0x8F, 2) => {
                if in_range(self.seq[1], 0xA1, 0xFE) {
                    Step::Pending
                } else {
                    Step::Invalid
                }
            }
            (0x8F, _) => {
                if in_range(self.seq[2], 0xA1, 0xFE) {
                    Step::Char { common: false }
                } else {
                    Step::Invalid
                }
            }
            _ => {
                if in_range(self.seq[1], 0xA1, 0xFE) {
                    let common = matches!(lead, 0xA1 | 0xA4 | 0xA5 | 0xB0..=0xCF);
                    Step::Char { common }
                } else {
                    Step::Invalid
                }
            }
        }
    }

    fn step_euc_kr(&self) -> Step {
        let lead = self.seq[0];
        match self.seq_len {
            1 => match lead {
                0x00..=0x7F => Step::Single,
                0x81..=0xFE => Step::Pending,
                _ => Step::Invalid,
            },
            _ => {
                let trail = self.seq[1];
                if in_range(trail, 0xA1, 0xFE) {
                    // symbols and KS X 1001 Hangul syllables
                    let common = matches!(lead, 0xA1 | 0xB0..=0xC8);
                    Step::Char { common }
                } else if in_range(trail, 0x41, 0x5A)
                    || in_range(trail, 0x61, 0x7A)
                    || in_range(trail, 0x81, 0xA0)
                {
                    // unified Hangul code extension
                    Step::Char { common: false }
                } else {
                    Step::Invalid
                }
            }
        }
    }

    fn step_gb18030(&self) -> Step {
        let lead = self.seq[0];
        match self.seq_len {
            1 => match lead {
                0x00..=0x7F => Step::Single,
                0x81..=0xFE => Step::Pending,
                _ => Step::Invalid,
            },
            2 => {
                let trail = self.seq[1];
                if in_range(trail, 0x30, 0x39) {
                    Step::Pending
                } else if in_range(trail, 0xA1, 0xFE) {
                    // GB2312 symbols and level-1 hanzi
                    let common = matches!(lead, 0xA1 | 0xA3 | 0xB0..=0xD7);
                    Step::Char { common }
                } else if in_range(trail, 0x40, 0x7E) || in_range(trail, 0x80, 0xA0) {
                    // GBK extension
                    Step::Char { common: false }
                } else {
                    Step::Invalid
                }
            }
            3 => {
                if in_range(self.seq[2], 0x81, 0xFE) {
                    Step::Pending
                } else {
                    Step::Invalid
                }
            }
            _ => {
                if in_range(self.seq[3], 0x30, 0x39) {
                    Step::Char { common: false }
                } else {
                    Step::Invalid
                }
            }
        }
    }

    fn step_big5(&self) -> Step {
        let lead = self.seq[0];
        match self.seq_len {
            1 => match lead {
                0x00..=0x7F => Step::Single,
                0x81..=0xFE => Step::Pending,
                _ => Step::Invalid,
            },
            _ => {
                let trail = self.seq[1];
                if in_range(trail, 0x40, 0x7E) || in_range(trail, 0xA1, 0xFE) {
                    // symbols and frequently used hanzi
                    let common = matches!(lead, 0xA1..=0xA3 | 0xA4..=0xC6);
                    Step::Char { common }
                } else {
                    Step::Invalid
                }
            }
        }
    }
}

impl CharsetProber for CjkProber {
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        for &b in buf {
            if self.seq_len == 0 {
                self.after_letter = self.prev_letter;
            }
            match self.step(b) {
                Step::Pending => {}
                Step::Single => {
                    let letter = b.is_ascii_alphabetic();
                    if letter && self.prev_multi {
                        self.mixed_pairs += 1;
                    }
                    self.prev_letter = letter;
                    self.prev_multi = false;
                }
                Step::Char { common } => {
                    self.total_chars += 1;
                    if common {
                        self.common_chars += 1;
                    }
                    if self.after_letter {
                        self.mixed_pairs += 1;
                    }
                    self.prev_letter = false;
                    self.prev_multi = true;
                }
                Step::Invalid => {
                    self.state = ProbingState::NotMe;
                    return self.state;
                }
            }
        }

        if self.total_chars > ENOUGH_DATA && self.confidence() > SHORTCUT_THRESHOLD {
            self.state = ProbingState::FoundIt;
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state == ProbingState::NotMe || self.total_chars <= MINIMUM_DATA {
            return SURE_NO;
        }
        let ratio =
            self.common_chars.saturating_sub(self.mixed_pairs) as f32 / self.total_chars as f32;
        (ratio * SURE_YES).max(SURE_NO)
    }

    fn charset_name(&self) -> &'static str {
        self.scheme.encoding().name()
    }

    fn reset(&mut self) {
        *self = Self::new(self.scheme);
    }
}
