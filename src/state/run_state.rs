//! Lifecycle states of a single crawl run
//!
//! A run starts in `Running`, moves to `Completing` once every fetch has
//! drained, and ends in `Notified` or `Skipped`. An aborted run jumps from
//! `Running` straight to `Skipped`.

use std::fmt;

/// Represents the current state of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    // ===== Active States =====
    /// Pages are still being fetched and matched
    Running,

    /// All fetches drained; deciding whether to notify
    Completing,

    // ===== Terminal States =====
    /// The report was handed to the notification sink
    Notified,

    /// No report was sent (no matches, or the run was aborted)
    Skipped,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Notified | Self::Skipped)
    }

    /// Returns true if the run may move from this state to `next`
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Completing)
                | (Self::Running, Self::Skipped)
                | (Self::Completing, Self::Notified)
                | (Self::Completing, Self::Skipped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completing => "completing",
            Self::Notified => "notified",
            Self::Skipped => "skipped",
        }
    }

    /// Returns all run states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Running,
            Self::Completing,
            Self::Notified,
            Self::Skipped,
        ]
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!RunState::Running.is_terminal());
        assert!(!RunState::Completing.is_terminal());
        assert!(RunState::Notified.is_terminal());
        assert!(RunState::Skipped.is_terminal());
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(RunState::Running.can_transition_to(RunState::Completing));
        assert!(RunState::Running.can_transition_to(RunState::Skipped));
        assert!(RunState::Completing.can_transition_to(RunState::Notified));
        assert!(RunState::Completing.can_transition_to(RunState::Skipped));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!RunState::Running.can_transition_to(RunState::Notified));
        assert!(!RunState::Running.can_transition_to(RunState::Running));
        assert!(!RunState::Completing.can_transition_to(RunState::Running));
        assert!(!RunState::Completing.can_transition_to(RunState::Completing));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [RunState::Notified, RunState::Skipped] {
            for next in RunState::all_states() {
                assert!(
                    !terminal.can_transition_to(next),
                    "{} -> {} should be rejected",
                    terminal,
                    next
                );
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", RunState::Running), "running");
        assert_eq!(format!("{}", RunState::Notified), "notified");
        assert_eq!(format!("{}", RunState::Skipped), "skipped");
    }
}
