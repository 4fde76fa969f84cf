//! Strategy groups: a family of probers exposed as a single prober.

use crate::prober::{CharsetProber, ProbingState, SURE_NO, SURE_YES};

#[derive(Debug)]
struct Member {
    prober: Box<dyn CharsetProber>,
    active: bool,
}

/// A family of probers that fans chunks out to its members and reports the
/// best member's confidence and label.
///
/// Members that rule themselves out stop receiving data. Ties between
/// members are broken by insertion order.
#[derive(Debug)]
pub struct ProberGroup {
    name: &'static str,
    members: Vec<Member>,
    state: ProbingState,
    found: Option<usize>,
}

impl ProberGroup {
    /// Create a group from its members, in tie-break order.
    pub fn new(name: &'static str, members: Vec<Box<dyn CharsetProber>>) -> Self {
        let members = members
            .into_iter()
            .map(|prober| Member {
                prober,
                active: true,
            })
            .collect();

        let mut group = Self {
            name,
            members,
            state: ProbingState::Detecting,
            found: None,
        };
        group.refresh_empty();
        group
    }

    /// Returns true if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members still receiving data.
    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|m| m.active).count()
    }

    /// Index and confidence of the most confident active member.
    fn best(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, member) in self.members.iter().enumerate() {
            if !member.active {
                continue;
            }
            let confidence = member.prober.confidence();
            if best.is_none_or(|(_, max)| confidence > max) {
                best = Some((i, confidence));
            }
        }
        best
    }

    /// An empty group can never match.
    fn refresh_empty(&mut self) {
        if self.members.is_empty() {
            self.state = ProbingState::NotMe;
        }
    }
}

impl CharsetProber for ProberGroup {
    fn handle_data(&mut self, buf: &[u8]) -> ProbingState {
        if self.state != ProbingState::Detecting {
            return self.state;
        }

        for (i, member) in self.members.iter_mut().enumerate() {
            if !member.active {
                continue;
            }
            match member.prober.handle_data(buf) {
                ProbingState::FoundIt => {
                    log::debug!(
                        "{} group: {} confirmed",
                        self.name,
                        member.prober.charset_name()
                    );
                    self.found = Some(i);
                    self.state = ProbingState::FoundIt;
                    return self.state;
                }
                ProbingState::NotMe => {
                    log::trace!(
                        "{} group: {} ruled out",
                        self.name,
                        member.prober.charset_name()
                    );
                    member.active = false;
                }
                ProbingState::Detecting => {}
            }
        }

        if self.members.iter().all(|m| !m.active) {
            self.state = ProbingState::NotMe;
        }
        self.state
    }

    fn state(&self) -> ProbingState {
        self.state
    }

    fn confidence(&self) -> f32 {
        match self.state {
            ProbingState::FoundIt => SURE_YES,
            ProbingState::NotMe => SURE_NO,
            ProbingState::Detecting => self.best().map_or(0.0, |(_, confidence)| confidence),
        }
    }

    fn charset_name(&self) -> &'static str {
        self.found
            .or_else(|| self.best().map(|(i, _)| i))
            .or_else(|| (!self.members.is_empty()).then_some(0))
            .map_or(self.name, |i| self.members[i].prober.charset_name())
    }

    fn reset(&mut self) {
        for member in &mut self.members {
            member.prober.reset();
            member.active = true;
        }
        self.state = ProbingState::Detecting;
        self.found = None;
        self.refresh_empty();
    }
}
