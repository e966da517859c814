use std::fmt;

/// Mutually exclusive stage of a quiz session.
///
/// Each phase maps one-to-one onto a screen of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Startup: a saved quiz may be waiting for a resume/discard decision.
    AwaitingResumeDecision,
    /// No identity yet; the login screen is shown.
    LoggedOut,
    /// Identity set, rules shown, no quiz running.
    RulesShown,
    /// Questions loaded and the countdown running.
    InProgress,
    /// All questions answered or time expired; results shown.
    Finished,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::AwaitingResumeDecision => "awaiting_resume_decision",
            SessionPhase::LoggedOut => "logged_out",
            SessionPhase::RulesShown => "rules_shown",
            SessionPhase::InProgress => "in_progress",
            SessionPhase::Finished => "finished",
        }
    }

    /// `(started, finished)` flags as written to the persisted snapshot.
    #[must_use]
    pub fn progress_flags(self) -> (bool, bool) {
        match self {
            SessionPhase::InProgress => (true, false),
            SessionPhase::Finished => (true, true),
            SessionPhase::AwaitingResumeDecision
            | SessionPhase::LoggedOut
            | SessionPhase::RulesShown => (false, false),
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
