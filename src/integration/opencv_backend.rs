//! OpenCV-backed capture, tracking, and display collaborators.
//!
//! This module provides the production implementations of the three
//! integration traits: `OpenCvSource` over `VideoCapture`, `OpenCvTracker`
//! over the KCF/CSRT trackers, and `HighguiUi` over highgui windows.
//!
//! # Example
//!
//! ```ignore
//! use lockon::integration::{HighguiUi, OpenCvSource, OpenCvTracker, SourceSpec, TrackerKind};
//! use lockon::session::TrackingSession;
//!
//! let spec = SourceSpec::parse("/dev/video0");
//! let source = OpenCvSource::open(&spec)?;
//! let session = TrackingSession::with_default_config(
//!     source,
//!     OpenCvTracker::new(TrackerKind::Kcf),
//!     HighguiUi::new(),
//! );
//! let report = session.run()?;
//! ```

use chrono::Utc;
use opencv::{
    core::{self, MatTraitConstManual, Ptr, Rect},
    highgui,
    prelude::*,
    tracking::{TrackerCSRT, TrackerCSRT_Params, TrackerKCF, TrackerKCF_Params},
    videoio::{self, VideoCapture},
};
use thiserror::Error;

use super::{FrameSource, OperatorUi, SourceSpec, TargetTracker};
use crate::error::CaptureError;
use crate::session::{BoundingBox, Frame, PixelFormat};

const SELECT_WINDOW: &str = "Select Object";
const VIEW_WINDOW: &str = "Tracking";

/// Error type for the OpenCV tracking backend.
#[derive(Debug, Error)]
pub enum OpenCvTrackerError {
    /// The underlying OpenCV call failed.
    #[error("opencv tracking backend error: {0}")]
    Runtime(#[from] opencv::Error),
    /// `track` was called before `initialize`.
    #[error("track called before initialize")]
    NotInitialized,
}

/// Which OpenCV tracking model to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerKind {
    /// Kernelized correlation filter. Fast, the usual default.
    #[default]
    Kcf,
    /// Discriminative correlation filter with channel and spatial
    /// reliability. Slower, holds on through more appearance change.
    Csrt,
}

enum Runtime {
    Kcf(Ptr<TrackerKCF>),
    Csrt(Ptr<TrackerCSRT>),
}

/// Single-target tracker over OpenCV's KCF or CSRT models.
///
/// The underlying model is created lazily on `initialize`, since both
/// OpenCV trackers bind to a target at construction time.
pub struct OpenCvTracker {
    kind: TrackerKind,
    runtime: Option<Runtime>,
}

impl OpenCvTracker {
    /// Create a tracker of the given kind.
    pub fn new(kind: TrackerKind) -> Self {
        Self {
            kind,
            runtime: None,
        }
    }
}

impl Default for OpenCvTracker {
    fn default() -> Self {
        Self::new(TrackerKind::default())
    }
}

impl TargetTracker for OpenCvTracker {
    type Error = OpenCvTrackerError;

    fn initialize(&mut self, frame: &Frame, region: BoundingBox) -> Result<(), Self::Error> {
        let mat = mat_from_frame(frame)?;
        let rect = Rect::new(
            region.x as i32,
            region.y as i32,
            region.width as i32,
            region.height as i32,
        );
        let runtime = match self.kind {
            TrackerKind::Kcf => {
                let mut tracker = TrackerKCF::create(TrackerKCF_Params::default()?)?;
                tracker.init(&mat, rect)?;
                Runtime::Kcf(tracker)
            }
            TrackerKind::Csrt => {
                let mut tracker = TrackerCSRT::create(&TrackerCSRT_Params::default()?)?;
                tracker.init(&mat, rect)?;
                Runtime::Csrt(tracker)
            }
        };
        self.runtime = Some(runtime);
        Ok(())
    }

    fn track(&mut self, frame: &Frame) -> Result<BoundingBox, Self::Error> {
        let runtime = self
            .runtime
            .as_mut()
            .ok_or(OpenCvTrackerError::NotInitialized)?;
        let mat = mat_from_frame(frame)?;
        let mut rect = Rect::default();
        let found = match runtime {
            Runtime::Kcf(tracker) => tracker.update(&mat, &mut rect)?,
            Runtime::Csrt(tracker) => tracker.update(&mat, &mut rect)?,
        };
        if found {
            Ok(BoundingBox::new(
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
            ))
        } else {
            Ok(BoundingBox::EMPTY)
        }
    }
}

/// Frame source over an OpenCV `VideoCapture`.
pub struct OpenCvSource {
    capture: VideoCapture,
    buffer: Mat,
    source_id: String,
}

impl OpenCvSource {
    /// Open the capture described by `spec`.
    ///
    /// Fails with [`CaptureError::SourceUnavailable`] when OpenCV cannot
    /// open the device or stream.
    pub fn open(spec: &SourceSpec) -> Result<Self, CaptureError> {
        let source_id = spec.to_string();
        let capture = match spec {
            SourceSpec::Device(index) => VideoCapture::new(*index, videoio::CAP_ANY),
            SourceSpec::Stream(target) => VideoCapture::from_file(target, videoio::CAP_ANY),
        }
        .map_err(|e| CaptureError::Backend {
            source_id: source_id.clone(),
            detail: e.to_string(),
        })?;
        let opened = capture.is_opened().map_err(|e| CaptureError::Backend {
            source_id: source_id.clone(),
            detail: e.to_string(),
        })?;
        if !opened {
            return Err(CaptureError::SourceUnavailable { source_id });
        }
        Ok(Self {
            capture,
            buffer: Mat::default(),
            source_id,
        })
    }

    fn backend_error(&self, e: opencv::Error) -> CaptureError {
        CaptureError::Backend {
            source_id: self.source_id.clone(),
            detail: e.to_string(),
        }
    }
}

impl FrameSource for OpenCvSource {
    type Error = CaptureError;

    fn read_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        let grabbed = self
            .capture
            .read(&mut self.buffer)
            .map_err(|e| self.backend_error(e))?;
        if !grabbed || self.buffer.empty() {
            return Ok(None);
        }
        let frame = frame_from_mat(&self.buffer, Utc::now().timestamp_millis())
            .map_err(|e| self.backend_error(e))?;
        Ok(Some(frame))
    }
}

/// Operator display over highgui windows.
///
/// Selection uses a blocking `select_roi` in its own window; playback
/// goes to a second window whose event pump doubles as the quit poll.
/// Dropping the value closes every window this process opened.
pub struct HighguiUi {
    quit_key: u8,
}

impl HighguiUi {
    /// Display with the default `q` quit key.
    pub fn new() -> Self {
        Self { quit_key: b'q' }
    }

    /// Display quitting on the given key instead.
    pub fn with_quit_key(quit_key: u8) -> Self {
        Self { quit_key }
    }
}

impl Default for HighguiUi {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorUi for HighguiUi {
    type Error = opencv::Error;

    fn select_region(&mut self, frame: &Frame) -> Result<BoundingBox, Self::Error> {
        let mat = mat_from_frame(frame)?;
        let roi = highgui::select_roi(SELECT_WINDOW, &mat, true, false, false)?;
        highgui::destroy_window(SELECT_WINDOW)?;
        Ok(BoundingBox::new(
            roi.x as f32,
            roi.y as f32,
            roi.width as f32,
            roi.height as f32,
        ))
    }

    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let mat = mat_from_frame(frame)?;
        highgui::imshow(VIEW_WINDOW, &mat)
    }

    fn poll_quit(&mut self) -> Result<bool, Self::Error> {
        let key = highgui::wait_key(1)?;
        Ok(key >= 0 && (key & 0xff) as u8 == self.quit_key)
    }
}

impl Drop for HighguiUi {
    fn drop(&mut self) {
        let _ = highgui::destroy_all_windows();
    }
}

/// Copy a frame raster into an owned BGR `Mat`.
fn mat_from_frame(frame: &Frame) -> opencv::Result<Mat> {
    let channels = frame.format().channels();
    let rows = frame.height() as i32;
    let row_bytes = (frame.width() * channels) as i32;
    let bytes = frame.data().to_slice().ok_or_else(|| {
        opencv::Error::new(
            core::StsInternal,
            "frame raster is not contiguous".to_string(),
        )
    })?;
    let flat = Mat::new_rows_cols_with_data(rows, row_bytes, bytes)?;
    let shaped = flat.reshape(channels as i32, rows)?;
    shaped.try_clone()
}

/// Copy a capture `Mat` into a frame, stamping the capture time.
fn frame_from_mat(mat: &Mat, timestamp_ms: i64) -> opencv::Result<Frame> {
    if mat.typ() != core::CV_8UC3 {
        return Err(opencv::Error::new(
            core::StsUnsupportedFormat,
            format!("expected 8-bit 3-channel capture, got mat type {}", mat.typ()),
        ));
    }
    if !mat.is_continuous() {
        return Err(opencv::Error::new(
            core::StsInternal,
            "capture produced a non-contiguous mat".to_string(),
        ));
    }
    let width = mat.cols() as usize;
    let height = mat.rows() as usize;
    let buffer = mat.data_bytes()?.to_vec();
    Frame::from_raw(buffer, width, height, PixelFormat::Bgr8, timestamp_ms).map_err(|e| {
        opencv::Error::new(core::StsInternal, e.to_string())
    })
}
