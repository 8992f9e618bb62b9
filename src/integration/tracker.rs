//! The external tracking-model boundary.

use crate::session::{BoundingBox, Frame};

/// Trait for single-object tracking model backends.
///
/// The model behind this trait is a black box: the session calls
/// `initialize` exactly once with the operator-selected region, then
/// `track` once per subsequent frame, synchronously and in strict frame
/// order. Implementations own whatever state the model keeps between
/// calls and must not retain an input frame beyond the call; frames are
/// transient.
///
/// # Example
///
/// ```ignore
/// use lockon::{BoundingBox, Frame, TargetTracker};
///
/// struct MyModel {
///     // Your inference runtime here
/// }
///
/// impl TargetTracker for MyModel {
///     type Error = std::io::Error;
///
///     fn initialize(&mut self, frame: &Frame, region: BoundingBox) -> Result<(), Self::Error> {
///         // Build the model state from the first frame and region
///         Ok(())
///     }
///
///     fn track(&mut self, frame: &Frame) -> Result<BoundingBox, Self::Error> {
///         // Localize the target in this frame
///         Ok(BoundingBox::new(0.0, 0.0, 10.0, 10.0))
///     }
/// }
/// ```
pub trait TargetTracker {
    /// Error type for model failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Bind the model to the target described by `region` in `frame`.
    ///
    /// Called exactly once per run, with the frame the region was
    /// selected on. Failure (for example a region the model rejects) is
    /// fatal for the run.
    fn initialize(&mut self, frame: &Frame, region: BoundingBox) -> Result<(), Self::Error>;

    /// Localize the target in the next frame.
    ///
    /// The returned box is in the frame's pixel coordinate space. The
    /// empty sentinel box means the target was not found in this frame;
    /// the session passes it through to render and telemetry unchanged.
    fn track(&mut self, frame: &Frame) -> Result<BoundingBox, Self::Error>;
}
