use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Set of language families the standard probers should consider.
///
/// Narrowing the filter removes strategies that can only ever answer for the
/// excluded languages, which both speeds detection up and removes ambiguous
/// candidates (EUC-KR and GB18030 share most of their byte ranges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageFilter(u8);

impl LanguageFilter {
    pub const CHINESE_SIMPLIFIED: Self = Self(0x01);
    pub const CHINESE_TRADITIONAL: Self = Self(0x02);
    pub const JAPANESE: Self = Self(0x04);
    pub const KOREAN: Self = Self(0x08);
    pub const NON_CJK: Self = Self(0x10);
    pub const ALL: Self = Self(0x1F);

    pub const CHINESE: Self = Self(Self::CHINESE_SIMPLIFIED.0 | Self::CHINESE_TRADITIONAL.0);
    pub const CJK: Self = Self(Self::CHINESE.0 | Self::JAPANESE.0 | Self::KOREAN.0);

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build a filter from raw bits, ignoring unknown bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns true if any family in `other` is enabled.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no family is enabled.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parse a family name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "all" => Some(Self::ALL),
            "cjk" => Some(Self::CJK),
            "chinese" | "zh" => Some(Self::CHINESE),
            "chinese-simplified" | "zh-hans" => Some(Self::CHINESE_SIMPLIFIED),
            "chinese-traditional" | "zh-hant" => Some(Self::CHINESE_TRADITIONAL),
            "japanese" | "ja" => Some(Self::JAPANESE),
            "korean" | "ko" => Some(Self::KOREAN),
            "non-cjk" | "noncjk" => Some(Self::NON_CJK),
            _ => None,
        }
    }
}

impl Default for LanguageFilter {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for LanguageFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LanguageFilter {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LanguageFilter {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(LanguageFilter, &str); 5] = [
            (LanguageFilter::CHINESE_SIMPLIFIED, "chinese-simplified"),
            (LanguageFilter::CHINESE_TRADITIONAL, "chinese-traditional"),
            (LanguageFilter::JAPANESE, "japanese"),
            (LanguageFilter::KOREAN, "korean"),
            (LanguageFilter::NON_CJK, "non-cjk"),
        ];

        if *self == Self::ALL {
            return write!(f, "all");
        }
        let mut first = true;
        for (flag, name) in NAMES {
            if self.intersects(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}
