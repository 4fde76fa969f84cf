//! The capability contract every detection strategy implements.

use std::fmt;

/// Confidence above which a strategy may confirm itself before the stream ends.
pub const SHORTCUT_THRESHOLD: f32 = 0.95;

/// Confidence at or below which a guess is too unreliable to report.
pub const MINIMUM_THRESHOLD: f32 = 0.20;

/// Confidence reported by a strategy that has ruled itself out.
pub(crate) const SURE_NO: f32 = 0.01;

/// Confidence reported by a strategy that has confirmed its match.
pub(crate) const SURE_YES: f32 = 0.99;

/// Verdict of a strategy after consuming a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbingState {
    /// Still gathering evidence.
    #[default]
    Detecting,
    /// Confident match; terminal until reset.
    FoundIt,
    /// Ruled out; terminal until reset.
    NotMe,
}

impl fmt::Display for ProbingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbingState::Detecting => write!(f, "detecting"),
            ProbingState::FoundIt => write!(f, "found it"),
            ProbingState::NotMe => write!(f, "not me"),
        }
    }
}

/// A stateful detector for one encoding or encoding family.
///
/// Implementations must accept any byte value without failing and must not
/// keep references to the chunks they are handed.
pub trait CharsetProber: fmt::Debug {
    /// Consume a chunk and return the updated state.
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState;

    /// Current state, as last returned by `handle_data`.
    fn state(&self) -> ProbingState;

    /// Confidence in `[0, 1]` that the input is in `charset_name()`.
    ///
    /// Not guaranteed to be monotonic: later evidence may lower it.
    fn confidence(&self) -> f32;

    /// Label of the encoding this strategy currently favours.
    fn charset_name(&self) -> &'static str;

    /// Return to the initial state for reuse.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_ordered() {
        assert!(SURE_NO < MINIMUM_THRESHOLD);
        assert!(MINIMUM_THRESHOLD < SHORTCUT_THRESHOLD);
        assert!(SHORTCUT_THRESHOLD < SURE_YES);
    }

    #[test]
    fn test_default_state() {
        assert_eq!(ProbingState::default(), ProbingState::Detecting);
        assert_eq!(ProbingState::NotMe.to_string(), "not me");
    }
}
