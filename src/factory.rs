//! Construction of the strategies the orchestrator instantiates lazily.

use std::fmt;

use crate::filter::LanguageFilter;
use crate::group::ProberGroup;
use crate::prober::CharsetProber;
use crate::probers::single_byte::MODELS;
use crate::probers::{CjkProber, CjkScheme, EscProber, Latin1Prober, SingleByteProber, Utf8Prober};

/// Builds one strategy per role.
///
/// The orchestrator calls each method at most once per session, the first
/// time the input classification needs that role.
pub trait ProberFactory: fmt::Debug {
    /// Strategy for 7-bit input carrying escape or shift sequences.
    fn escape(&self) -> Box<dyn CharsetProber>;

    /// Strategy (usually a group) for multi-byte encodings.
    fn multi_byte(&self) -> Box<dyn CharsetProber>;

    /// Strategy (usually a group) for single-byte code pages.
    fn single_byte(&self) -> Box<dyn CharsetProber>;

    /// Western European fallback.
    fn latin1(&self) -> Box<dyn CharsetProber>;
}

/// The built-in strategies, narrowed by a language filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardProbers {
    filter: LanguageFilter,
}

impl StandardProbers {
    pub const fn new(filter: LanguageFilter) -> Self {
        Self { filter }
    }
}

impl ProberFactory for StandardProbers {
    fn escape(&self) -> Box<dyn CharsetProber> {
        Box::new(EscProber::new(self.filter))
    }

    fn multi_byte(&self) -> Box<dyn CharsetProber> {
        let mut members: Vec<Box<dyn CharsetProber>> = vec![Box::new(Utf8Prober::new())];

        let schemes = [
            (CjkScheme::ShiftJis, LanguageFilter::JAPANESE),
            (CjkScheme::EucJp, LanguageFilter::JAPANESE),
            (CjkScheme::EucKr, LanguageFilter::KOREAN),
            (CjkScheme::Gb18030, LanguageFilter::CHINESE_SIMPLIFIED),
            (CjkScheme::Big5, LanguageFilter::CHINESE_TRADITIONAL),
        ];
        members.extend(
            schemes
                .into_iter()
                .filter(|&(_, languages)| self.filter.intersects(languages))
                .map(|(scheme, _)| Box::new(CjkProber::new(scheme)) as Box<dyn CharsetProber>),
        );

        Box::new(ProberGroup::new("multi-byte", members))
    }

    fn single_byte(&self) -> Box<dyn CharsetProber> {
        let members = if self.filter.intersects(LanguageFilter::NON_CJK) {
            MODELS
                .iter()
                .map(|&model| Box::new(SingleByteProber::new(model)) as Box<dyn CharsetProber>)
                .collect()
        } else {
            Vec::new()
        };

        Box::new(ProberGroup::new("single-byte", members))
    }

    fn latin1(&self) -> Box<dyn CharsetProber> {
        Box::new(Latin1Prober::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::ProbingState;

    #[test]
    fn test_full_filter_builds_every_member() {
        let factory = StandardProbers::new(LanguageFilter::ALL);
        assert_eq!(factory.multi_byte().state(), ProbingState::Detecting);
        assert_eq!(factory.single_byte().state(), ProbingState::Detecting);
        assert_eq!(factory.latin1().charset_name(), "windows-1252");
        assert_eq!(factory.escape().state(), ProbingState::Detecting);
    }

    #[test]
    fn test_cjk_filter_empties_single_byte_group() {
        let factory = StandardProbers::new(LanguageFilter::CJK);
        assert_eq!(factory.single_byte().state(), ProbingState::NotMe);
    }

    #[test]
    fn test_non_cjk_filter_disables_escapes() {
        let factory = StandardProbers::new(LanguageFilter::NON_CJK);
        assert_eq!(factory.escape().state(), ProbingState::NotMe);
        // UTF-8 stays available whatever the filter
        let mut multi_byte = factory.multi_byte();
        assert_eq!(
            multi_byte.handle_data("na\u{ef}ve \u{e9}t\u{e9} \u{e0} l'h\u{f4}tel".as_bytes()),
            ProbingState::FoundIt
        );
        assert_eq!(multi_byte.charset_name(), "UTF-8");
    }
}
