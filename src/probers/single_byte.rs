//! Single-byte code page strategies for non-Latin alphabets.
//!
//! The chunk is decoded through the candidate code page and the resulting
//! letters are judged on two things: whether letters of the expected script
//! sit next to each other the way words do (rather than wedged between
//! ASCII letters, which is what Latin text looks like through the wrong
//! table), and how many of them are among the language's most frequent
//! letters.

use encoding_rs::{
    Decoder, DecoderResult, Encoding, IBM866, ISO_8859_5, ISO_8859_7, ISO_8859_8, KOI8_R,
    WINDOWS_874, WINDOWS_1251, WINDOWS_1253, WINDOWS_1255,
};

use crate::prober::{CharsetProber, ProbingState, SHORTCUT_THRESHOLD, SURE_NO, SURE_YES};

const MINIMUM_DATA: usize = 3;
const ENOUGH_DATA: usize = 1024;
const NEGATIVE_SHORTCUT_THRESHOLD: f32 = 0.05;
const BAD_PAIR_WEIGHT: f32 = 3.0;
const SCRATCH_CAPACITY: usize = 1024;

/// Writing systems the built-in single-byte models cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Cyrillic,
    Greek,
    Hebrew,
    Thai,
}

impl Script {
    fn contains(self, c: char) -> bool {
        let range = match self {
            Script::Cyrillic => '\u{0400}'..='\u{04FF}',
            Script::Greek => '\u{0370}'..='\u{03FF}',
            Script::Hebrew => '\u{0590}'..='\u{05FF}',
            Script::Thai => '\u{0E00}'..='\u{0E7F}',
        };
        range.contains(&c)
    }
}

/// A code page paired with the language statistics used to judge it.
#[derive(Debug, Clone, Copy)]
pub struct SingleByteModel {
    pub encoding: &'static Encoding,
    pub script: Script,
    /// Most frequent letters of the language, lowercase.
    pub frequent: &'static str,
}

const RUSSIAN: &str = "\u{043e}\u{0435}\u{0430}\u{0438}\u{043d}\u{0442}\u{0441}\u{0440}\u{0432}\u{043b}";
const GREEK: &str = "\u{03b1}\u{03bf}\u{03b9}\u{03b5}\u{03c4}\u{03c3}\u{03c2}\u{03bd}\u{03b7}\u{03c5}\u{03c1}";
const HEBREW: &str = "\u{05d9}\u{05d5}\u{05d4}\u{05dc}\u{05d0}\u{05e8}\u{05ea}\u{05d1}\u{05de}\u{05e0}";
const THAI: &str = "\u{0e32}\u{0e19}\u{0e2d}\u{0e23}\u{0e01}\u{0e40}\u{0e07}\u{0e21}\u{0e22}\u{0e48}";

/// Built-in models, in tie-break order.
pub const MODELS: [SingleByteModel; 9] = [
    SingleByteModel { encoding: WINDOWS_1251, script: Script::Cyrillic, frequent: RUSSIAN },
    SingleByteModel { encoding: KOI8_R, script: Script::Cyrillic, frequent: RUSSIAN },
    SingleByteModel { encoding: ISO_8859_5, script: Script::Cyrillic, frequent: RUSSIAN },
    SingleByteModel { encoding: IBM866, script: Script::Cyrillic, frequent: RUSSIAN },
    SingleByteModel { encoding: WINDOWS_1253, script: Script::Greek, frequent: GREEK },
    SingleByteModel { encoding: ISO_8859_7, script: Script::Greek, frequent: GREEK },
    SingleByteModel { encoding: WINDOWS_1255, script: Script::Hebrew, frequent: HEBREW },
    SingleByteModel { encoding: ISO_8859_8, script: Script::Hebrew, frequent: HEBREW },
    SingleByteModel { encoding: WINDOWS_874, script: Script::Thai, frequent: THAI },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Other,
    Ascii,
    /// A letter of the model's script; `upper` is false for caseless scripts.
    Script { upper: bool },
    /// A non-ASCII letter of some other script.
    Foreign,
}

/// Decodes through one code page and scores letter adjacency.
pub struct SingleByteProber {
    model: SingleByteModel,
    decoder: Decoder,
    scratch: String,
    prev: Class,
    script_letters: usize,
    frequent_letters: usize,
    good_pairs: f32,
    bad_pairs: f32,
    foreign_letters: usize,
    state: ProbingState,
}

impl std::fmt::Debug for SingleByteProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleByteProber")
            .field("charset", &self.model.encoding.name())
            .field("script_letters", &self.script_letters)
            .field("good_pairs", &self.good_pairs)
            .field("bad_pairs", &self.bad_pairs)
            .field("state", &self.state)
            .finish()
    }
}

impl SingleByteProber {
    pub fn new(model: SingleByteModel) -> Self {
        Self {
            model,
            decoder: model.encoding.new_decoder_without_bom_handling(),
            scratch: String::with_capacity(SCRATCH_CAPACITY),
            prev: Class::Other,
            script_letters: 0,
            frequent_letters: 0,
            good_pairs: 0.0,
            bad_pairs: 0.0,
            foreign_letters: 0,
            state: ProbingState::Detecting,
        }
    }

    fn classify(&self, c: char) -> Class {
        if c.is_ascii_alphabetic() {
            Class::Ascii
        } else if !c.is_alphabetic() {
            Class::Other
        } else if self.model.script.contains(c) {
            Class::Script {
                upper: c.is_uppercase(),
            }
        } else {
            Class::Foreign
        }
    }

    fn observe(&mut self, c: char) {
        let class = self.classify(c);
        match (self.prev, class) {
            (Class::Script { upper: prev_upper }, Class::Script { upper }) => {
                match (prev_upper, upper) {
                    (_, false) => self.good_pairs += 1.0,
                    (true, true) => self.good_pairs += 0.5,
                    // lowercase followed by uppercase inside a word
                    (false, true) => self.bad_pairs += 1.0,
                }
            }
            (Class::Script { .. }, Class::Ascii | Class::Foreign)
            | (Class::Ascii | Class::Foreign, Class::Script { .. }) => self.bad_pairs += 1.0,
            _ => {}
        }

        match class {
            Class::Script { .. } => {
                self.script_letters += 1;
                if c.to_lowercase().any(|l| self.model.frequent.contains(l)) {
                    self.frequent_letters += 1;
                }
            }
            Class::Foreign => self.foreign_letters += 1,
            _ => {}
        }
        self.prev = class;
    }

    /// Decode `buf`, observing every character; returns false on an unmappable byte.
    fn decode(&mut self, mut buf: &[u8]) -> bool {
        let mut out = std::mem::take(&mut self.scratch);
        let ok = loop {
            out.clear();
            let (result, read) = self
                .decoder
                .decode_to_string_without_replacement(buf, &mut out, false);
            for c in out.chars() {
                self.observe(c);
            }
            buf = &buf[read..];
            match result {
                DecoderResult::InputEmpty => break true,
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => break false,
            }
        };
        self.scratch = out;
        ok
    }
}

impl CharsetProber for SingleByteProber {
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        if !self.decode(buf) {
            self.state = ProbingState::NotMe;
            return self.state;
        }

        if self.script_letters > ENOUGH_DATA {
            let confidence = self.confidence();
            if confidence > SHORTCUT_THRESHOLD {
                self.state = ProbingState::FoundIt;
            } else if confidence < NEGATIVE_SHORTCUT_THRESHOLD {
                self.state = ProbingState::NotMe;
            }
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        if self.state == ProbingState::NotMe || self.script_letters <= MINIMUM_DATA {
            return SURE_NO;
        }
        let letters = self.script_letters as f32;
        let pairs = (self.good_pairs - BAD_PAIR_WEIGHT * self.bad_pairs - self.foreign_letters as f32)
            / letters;
        let frequency = self.frequent_letters as f32 / letters;
        (pairs * (0.5 + frequency)).clamp(SURE_NO, SURE_YES)
    }

    fn charset_name(&self) -> &'static str {
        self.model.encoding.name()
    }

    fn reset(&mut self) {
        self.decoder = self.model.encoding.new_decoder_without_bom_handling();
        self.prev = Class::Other;
        self.script_letters = 0;
        self.frequent_letters = 0;
        self.good_pairs = 0.0;
        self.bad_pairs = 0.0;
        self.foreign_letters = 0;
        self.state = ProbingState::Detecting;
    }
}
