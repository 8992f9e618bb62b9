//! Session-side building blocks: frames, regions, the run state
//! machine, the overlay painter, and the orchestration loop.

mod bbox;
mod frame;
mod run_state;
mod runner;

pub mod overlay;

pub use bbox::BoundingBox;
pub use frame::{Frame, FrameLayoutError, PixelFormat};
pub use overlay::OverlayStyle;
pub use run_state::RunState;
pub use runner::{ExitReason, SessionConfig, SessionReport, TrackingSession};
