//! Protocol phases.

use std::fmt;

use log::debug;

/// Phase of a fingerprinting run. Runs only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolState {
    Connecting,
    DetectingPrompt,
    DisablingPaging,
    FetchingVersion,
    FetchingNeighbors,
    Done,
    Failed,
}

impl ProtocolState {
    /// Whether the run has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Only later phases are reachable. `Failed` sorts last, so every live
    /// phase may fail, and the neighbor phase may be skipped.
    pub fn can_advance_to(self, next: ProtocolState) -> bool {
        !self.is_terminal() && next > self
    }
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "CONNECTING",
            Self::DetectingPrompt => "DETECTING_PROMPT",
            Self::DisablingPaging => "DISABLING_PAGING",
            Self::FetchingVersion => "FETCHING_VERSION",
            Self::FetchingNeighbors => "FETCHING_NEIGHBORS",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Tracks the phase of one run and logs each transition.
#[derive(Debug)]
pub(crate) struct StateTracker {
    host: String,
    state: ProtocolState,
}

impl StateTracker {
    pub(crate) fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            state: ProtocolState::Connecting,
        }
    }

    pub(crate) fn state(&self) -> ProtocolState {
        self.state
    }

    /// Move to `next`. Illegal transitions are ignored and logged.
    pub(crate) fn advance(&mut self, next: ProtocolState) {
        if !self.state.can_advance_to(next) {
            debug!("{}: ignoring transition {} -> {}", self.host, self.state, next);
            return;
        }
        debug!("{}: {} -> {}", self.host, self.state, next);
        self.state = next;
    }
}
