//! Interactive display and region-selection boundary.

use crate::session::{BoundingBox, Frame};

/// Outcome of the one-shot region selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// The operator drew a usable region
    Region(BoundingBox),
    /// The operator declined to select
    Cancelled,
}

impl Selection {
    /// Classify a raw collaborator rectangle.
    ///
    /// Interactive toolkits report a declined selection as an
    /// all-zero-size rectangle, so any box with zero width and zero
    /// height is `Cancelled` regardless of its position. A genuine
    /// zero-size drag is indistinguishable from that signal and cancels
    /// too.
    pub fn from_box(raw: BoundingBox) -> Self {
        if raw.is_empty() {
            Self::Cancelled
        } else {
            Self::Region(raw)
        }
    }
}

/// Trait for the operator-facing display collaborator.
///
/// One implementation drives a real window (selection gesture, live
/// view, quit key); scripted implementations drive tests. The session
/// calls `select_region` once on the first frame, then `present` and
/// `poll_quit` once per tick.
pub trait OperatorUi {
    /// Error type for display failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Let the operator draw the initial region on `frame`.
    ///
    /// Returns the collaborator's raw rectangle; the session classifies
    /// it with [`Selection::from_box`], so reporting an all-zero box is
    /// how implementations signal a declined selection.
    fn select_region(&mut self, frame: &Frame) -> Result<BoundingBox, Self::Error>;

    /// Show an annotated frame to the operator.
    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    /// Check once, without blocking, whether the operator asked to quit.
    fn poll_quit(&mut self) -> Result<bool, Self::Error>;
}
