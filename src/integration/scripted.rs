//! Deterministic collaborators for tests and dry runs.
//!
//! These implementations replay scripted frames, tracking results, and
//! operator actions, and record every call through shared handles so a
//! test can still assert on what happened after the session has consumed
//! the collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use super::source::FrameSource;
use super::tracker::TargetTracker;
use super::ui::OperatorUi;
use crate::session::{BoundingBox, Frame};

/// Failure type shared by the scripted collaborators.
#[derive(Debug, Clone, Error)]
#[error("scripted failure on call {call}")]
pub struct ScriptedFailure {
    /// 1-based index of the failing call (0 for a rejected initialize)
    pub call: u64,
}

/// One scripted `read_frame` outcome.
#[derive(Debug, Clone)]
pub enum SourceStep {
    /// Yield this frame
    Yield(Frame),
    /// Fail the read
    Fail,
}

/// Replays a fixed sequence of reads, then reports end-of-stream.
#[derive(Debug)]
pub struct ScriptedSource {
    steps: VecDeque<SourceStep>,
    reads: u64,
}

impl ScriptedSource {
    /// Replay the given steps in order.
    pub fn new(steps: impl IntoIterator<Item = SourceStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            reads: 0,
        }
    }

    /// A source yielding `count` identical gray frames.
    pub fn gray_frames(count: usize, width: usize, height: usize) -> Self {
        Self::new((0..count).map(|i| {
            SourceStep::Yield(
                Frame::filled(width, height, [128, 128, 128]).with_timestamp_ms(i as i64 * 33),
            )
        }))
    }
}

impl FrameSource for ScriptedSource {
    type Error = ScriptedFailure;

    fn read_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        self.reads += 1;
        match self.steps.pop_front() {
            None => Ok(None),
            Some(SourceStep::Yield(frame)) => Ok(Some(frame)),
            Some(SourceStep::Fail) => Err(ScriptedFailure { call: self.reads }),
        }
    }
}

/// One scripted `track` outcome.
#[derive(Debug, Clone, Copy)]
pub enum ScriptedStep {
    /// Report this box
    Report(BoundingBox),
    /// Fail the call
    Fail,
}

/// Calls recorded by a [`ScriptedTracker`].
#[derive(Debug, Default)]
pub struct TrackerCalls {
    /// Region passed to each `initialize`
    pub initializations: Vec<BoundingBox>,
    /// Number of `track` invocations
    pub track_count: u64,
}

/// Replays scripted tracking results and records every call.
pub struct ScriptedTracker {
    steps: Vec<ScriptedStep>,
    reject_initialize: bool,
    calls: Arc<Mutex<TrackerCalls>>,
}

impl ScriptedTracker {
    /// Track by replaying `steps`; once the script runs out the last
    /// step repeats. An empty script reports the sentinel box forever.
    pub fn new(steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            reject_initialize: false,
            calls: Arc::default(),
        }
    }

    /// Track by reporting `regions` in order.
    pub fn reporting(regions: impl IntoIterator<Item = BoundingBox>) -> Self {
        Self::new(regions.into_iter().map(ScriptedStep::Report))
    }

    /// A tracker whose `initialize` rejects the region.
    pub fn rejecting_initialize() -> Self {
        let mut tracker = Self::new([]);
        tracker.reject_initialize = true;
        tracker
    }

    /// Handle to the recorded calls, usable after the session has
    /// consumed the tracker.
    pub fn calls(&self) -> Arc<Mutex<TrackerCalls>> {
        Arc::clone(&self.calls)
    }

    fn lock_calls(&self) -> MutexGuard<'_, TrackerCalls> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TargetTracker for ScriptedTracker {
    type Error = ScriptedFailure;

    fn initialize(&mut self, _frame: &Frame, region: BoundingBox) -> Result<(), Self::Error> {
        self.lock_calls().initializations.push(region);
        if self.reject_initialize {
            return Err(ScriptedFailure { call: 0 });
        }
        Ok(())
    }

    fn track(&mut self, _frame: &Frame) -> Result<BoundingBox, Self::Error> {
        let call = {
            let mut calls = self.lock_calls();
            calls.track_count += 1;
            calls.track_count
        };
        let index = (call as usize - 1).min(self.steps.len().saturating_sub(1));
        match self.steps.get(index).copied() {
            None => Ok(BoundingBox::EMPTY),
            Some(ScriptedStep::Report(region)) => Ok(region),
            Some(ScriptedStep::Fail) => Err(ScriptedFailure { call }),
        }
    }
}

/// Calls recorded by a [`ScriptedUi`].
#[derive(Debug, Default)]
pub struct UiCalls {
    /// Number of `select_region` invocations
    pub select_count: u64,
    /// Number of frames presented
    pub present_count: u64,
    /// Number of quit polls
    pub poll_count: u64,
}

/// Replays a scripted operator and records every call.
pub struct ScriptedUi {
    selection: BoundingBox,
    fail_selection: bool,
    quit_on_poll: Option<u64>,
    calls: Arc<Mutex<UiCalls>>,
}

impl ScriptedUi {
    /// An operator who selects `region` and never quits.
    pub fn selecting(region: BoundingBox) -> Self {
        Self {
            selection: region,
            fail_selection: false,
            quit_on_poll: None,
            calls: Arc::default(),
        }
    }

    /// An operator who declines to select.
    pub fn cancelling() -> Self {
        Self::selecting(BoundingBox::EMPTY)
    }

    /// An operator who selects `region`, then hits the quit key so it
    /// is seen on poll number `poll` (1-based).
    pub fn selecting_then_quit(region: BoundingBox, poll: u64) -> Self {
        let mut ui = Self::selecting(region);
        ui.quit_on_poll = Some(poll);
        ui
    }

    /// An operator whose selection gesture itself fails.
    pub fn failing_selection() -> Self {
        let mut ui = Self::cancelling();
        ui.fail_selection = true;
        ui
    }

    /// Handle to the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<UiCalls>> {
        Arc::clone(&self.calls)
    }

    fn lock_calls(&self) -> MutexGuard<'_, UiCalls> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OperatorUi for ScriptedUi {
    type Error = ScriptedFailure;

    fn select_region(&mut self, _frame: &Frame) -> Result<BoundingBox, Self::Error> {
        let call = {
            let mut calls = self.lock_calls();
            calls.select_count += 1;
            calls.select_count
        };
        if self.fail_selection {
            return Err(ScriptedFailure { call });
        }
        Ok(self.selection)
    }

    fn present(&mut self, _frame: &Frame) -> Result<(), Self::Error> {
        self.lock_calls().present_count += 1;
        Ok(())
    }

    fn poll_quit(&mut self) -> Result<bool, Self::Error> {
        let polls = {
            let mut calls = self.lock_calls();
            calls.poll_count += 1;
            calls.poll_count
        };
        Ok(self.quit_on_poll.is_some_and(|quit_at| polls >= quit_at))
    }
}
