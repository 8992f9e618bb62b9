use ndarray::{Array3, ArrayView3};
use thiserror::Error;

/// Pixel layout of a frame raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit blue/green/red interleaved, three channels
    #[default]
    Bgr8,
}

impl PixelFormat {
    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        match self {
            Self::Bgr8 => 3,
        }
    }
}

/// A raw buffer whose length does not match the declared frame shape.
#[derive(Debug, Error)]
#[error("frame buffer of {len} bytes does not match {width}x{height} {format:?}")]
pub struct FrameLayoutError {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub len: usize,
}

/// One captured video frame.
///
/// The raster is stored height-major as `(rows, columns, channels)` and
/// is immutable after construction. Frames are transient: each loop tick
/// owns the frame it read and drops it at the end of the tick.
#[derive(Debug, Clone)]
pub struct Frame {
    data: Array3<u8>,
    format: PixelFormat,
    timestamp_ms: i64,
}

impl Frame {
    /// Build a frame from an interleaved row-major byte buffer.
    pub fn from_raw(
        buffer: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
        timestamp_ms: i64,
    ) -> Result<Self, FrameLayoutError> {
        let len = buffer.len();
        let data = Array3::from_shape_vec((height, width, format.channels()), buffer).map_err(
            |_| FrameLayoutError {
                width,
                height,
                format,
                len,
            },
        )?;
        Ok(Self {
            data,
            format,
            timestamp_ms,
        })
    }

    /// Build a solid-color frame. Handy for synthetic sources.
    pub fn filled(width: usize, height: usize, bgr: [u8; 3]) -> Self {
        let data = Array3::from_shape_fn((height, width, 3), |(_, _, c)| bgr[c]);
        Self {
            data,
            format: PixelFormat::Bgr8,
            timestamp_ms: 0,
        }
    }

    /// Replace the capture timestamp.
    pub fn with_timestamp_ms(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub(crate) fn from_parts(data: Array3<u8>, format: PixelFormat, timestamp_ms: i64) -> Self {
        Self {
            data,
            format,
            timestamp_ms,
        }
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Pixel layout of the raster.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Capture time in milliseconds since the Unix epoch (0 for
    /// synthetic frames).
    #[inline]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Raster view, shape (height, width, channels).
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_shapes_the_buffer() {
        let buffer = vec![7u8; 4 * 3 * 3];
        let frame = Frame::from_raw(buffer, 4, 3, PixelFormat::Bgr8, 42).unwrap();

        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.timestamp_ms(), 42);
        assert_eq!(frame.data()[[2, 3, 1]], 7);
    }

    #[test]
    fn test_from_raw_rejects_short_buffer() {
        let err = Frame::from_raw(vec![0u8; 10], 4, 3, PixelFormat::Bgr8, 0).unwrap_err();
        assert_eq!(err.len, 10);
        assert_eq!(err.width, 4);
    }

    #[test]
    fn test_filled() {
        let frame = Frame::filled(2, 2, [1, 2, 3]).with_timestamp_ms(99);
        assert_eq!(frame.data()[[0, 0, 0]], 1);
        assert_eq!(frame.data()[[1, 1, 2]], 3);
        assert_eq!(frame.timestamp_ms(), 99);
    }
}
