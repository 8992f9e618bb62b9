//! Integration module for the session's replaceable collaborators.
//!
//! This module defines the traits the orchestration loop runs against
//! (frame source, tracking model, operator display), scripted in-memory
//! implementations for tests, and the OpenCV-backed production set.

mod scripted;
mod source;
mod tracker;
mod ui;

pub use scripted::{
    ScriptedFailure, ScriptedSource, ScriptedStep, ScriptedTracker, ScriptedUi, SourceStep,
    TrackerCalls, UiCalls,
};
pub use source::{FrameSource, SourceSpec};
pub use tracker::TargetTracker;
pub use ui::{OperatorUi, Selection};

#[cfg(feature = "opencv-backend")]
mod opencv_backend;

#[cfg(feature = "opencv-backend")]
pub use opencv_backend::{HighguiUi, OpenCvSource, OpenCvTracker, OpenCvTrackerError, TrackerKind};
