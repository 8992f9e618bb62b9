//! Frame acquisition boundary.

use std::fmt;

use crate::session::Frame;

/// Trait for frame producers: local camera, network stream, or a
/// synthetic sequence.
///
/// # Example
///
/// ```ignore
/// use lockon::{Frame, FrameSource};
///
/// struct OneShot {
///     frame: Option<Frame>,
/// }
///
/// impl FrameSource for OneShot {
///     type Error = std::convert::Infallible;
///
///     fn read_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
///         Ok(self.frame.take())
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for read failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` once the stream ends. A read error after the
    /// first frame is treated by the session like end-of-stream: logged
    /// and never retried, since retry policy depends on deployment
    /// context.
    fn read_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// Identifies a capture source: a local device or a stream URL/path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Local capture device index
    Device(i32),
    /// Network stream URL or video file path
    Stream(String),
}

impl SourceSpec {
    /// Parse a raw operator-supplied string.
    ///
    /// A bare decimal integer or a `/dev/videoN` path names a local
    /// device; anything else passes through as a URL or file path. No
    /// validation beyond that: whether the source exists is discovered
    /// at open time.
    pub fn parse(raw: &str) -> Self {
        if let Ok(index) = raw.parse::<i32>() {
            return Self::Device(index);
        }
        if let Some(rest) = raw.strip_prefix("/dev/video") {
            if let Ok(index) = rest.parse::<i32>() {
                return Self::Device(index);
            }
        }
        Self::Stream(raw.to_string())
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(index) => write!(f, "device {index}"),
            Self::Stream(target) => write!(f, "{target}"),
        }
    }
}
