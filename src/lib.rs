//! Interactive single-target tracking sessions over a video source.
//!
//! A session reads frames from a [`FrameSource`], has the operator pick a
//! target on the first frame through an [`OperatorUi`], binds a
//! [`TargetTracker`] to it, then runs a synchronous per-frame loop: track,
//! draw the overlay, present, optionally send the region over UDP, and
//! poll for quit. Cancelled selection, end of stream, and operator quit
//! are clean exits summarized in a [`SessionReport`]; tracker and display
//! failures terminate the run with a [`SessionError`].
//!
//! The OpenCV-backed collaborators live behind the `opencv-backend`
//! feature; the scripted ones in [`integration`] run anywhere and back
//! the test suite.
//!
//! # Example
//!
//! ```ignore
//! use lockon::integration::{HighguiUi, OpenCvSource, OpenCvTracker, SourceSpec, TrackerKind};
//! use lockon::telemetry::TelemetrySender;
//! use lockon::session::TrackingSession;
//!
//! let spec = SourceSpec::parse("rtsp://drone.local/stream");
//! let session = TrackingSession::with_default_config(
//!     OpenCvSource::open(&spec)?,
//!     OpenCvTracker::new(TrackerKind::Kcf),
//!     HighguiUi::new(),
//! )
//! .with_telemetry(TelemetrySender::new("127.0.0.1:5005".parse()?)?);
//!
//! let report = session.run()?;
//! println!("{} frames tracked", report.frames_tracked);
//! ```

pub mod error;
pub mod integration;
pub mod session;
pub mod telemetry;

pub use error::{CaptureError, CollaboratorError, SessionError, TelemetryError};
pub use integration::{FrameSource, OperatorUi, Selection, SourceSpec, TargetTracker};
pub use session::{
    BoundingBox, ExitReason, Frame, OverlayStyle, PixelFormat, RunState, SessionConfig,
    SessionReport, TrackingSession,
};
pub use telemetry::{TelemetryMessage, TelemetrySender, TrackRecorder};
