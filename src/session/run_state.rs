/// Lifecycle of one tracking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Waiting for the first frame from the capture source
    #[default]
    AwaitingFirstFrame,
    /// First frame acquired, waiting for the operator's selection
    AwaitingSelection,
    /// Model initialized, tracking frame by frame
    Tracking,
    /// Finished; absorbing
    Terminated,
}

impl RunState {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// States advance strictly forward; any live state may jump straight
    /// to `Terminated`, and `Terminated` is absorbing.
    pub fn can_advance_to(self, next: RunState) -> bool {
        match (self, next) {
            (RunState::Terminated, _) => false,
            (_, RunState::Terminated) => true,
            (RunState::AwaitingFirstFrame, RunState::AwaitingSelection) => true,
            (RunState::AwaitingSelection, RunState::Tracking) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        assert!(RunState::AwaitingFirstFrame.can_advance_to(RunState::AwaitingSelection));
        assert!(RunState::AwaitingSelection.can_advance_to(RunState::Tracking));
        assert!(RunState::Tracking.can_advance_to(RunState::Terminated));
    }

    #[test]
    fn test_every_live_state_may_terminate() {
        assert!(RunState::AwaitingFirstFrame.can_advance_to(RunState::Terminated));
        assert!(RunState::AwaitingSelection.can_advance_to(RunState::Terminated));
        assert!(RunState::Tracking.can_advance_to(RunState::Terminated));
    }

    #[test]
    fn test_terminated_is_absorbing() {
        assert!(!RunState::Terminated.can_advance_to(RunState::AwaitingFirstFrame));
        assert!(!RunState::Terminated.can_advance_to(RunState::Tracking));
        assert!(!RunState::Terminated.can_advance_to(RunState::Terminated));
    }

    #[test]
    fn test_no_skipping_and_no_backward_moves() {
        assert!(!RunState::AwaitingFirstFrame.can_advance_to(RunState::Tracking));
        assert!(!RunState::Tracking.can_advance_to(RunState::AwaitingSelection));
        assert!(!RunState::AwaitingSelection.can_advance_to(RunState::AwaitingFirstFrame));
    }
}
