//! Bounding-box overlay rendering.

use ndarray::Array3;

use super::bbox::BoundingBox;
use super::frame::Frame;

/// Stroke appearance for the tracked-region rectangle.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Stroke color, interleaved BGR
    pub color: [u8; 3],
    /// Stroke thickness in pixels
    pub thickness: usize,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            thickness: 2,
        }
    }
}

/// Draw `region` onto a copy of `frame`.
///
/// Pure: the input frame is untouched and the same inputs always produce
/// the same output. The rectangle spans `(x, y)` to `(x + width, y +
/// height)` truncated to whole pixels and clamped to the frame; the
/// stroke grows inward from each edge. Operator feedback only, with no
/// effect on tracking or telemetry.
pub fn render(frame: &Frame, region: BoundingBox, style: &OverlayStyle) -> Frame {
    let mut data = frame.data().to_owned();
    paint_rect(&mut data, region, style);
    Frame::from_parts(data, frame.format(), frame.timestamp_ms())
}

fn paint_rect(data: &mut Array3<u8>, region: BoundingBox, style: &OverlayStyle) {
    let (rows, cols, _) = data.dim();
    if rows == 0 || cols == 0 || style.thickness == 0 {
        return;
    }

    let [fx1, fy1, fx2, fy2] = region.corners();
    let (x1, y1) = (fx1 as i64, fy1 as i64);
    let (x2, y2) = (fx2 as i64, fy2 as i64);
    if x2 < 0 || y2 < 0 || x1 >= cols as i64 || y1 >= rows as i64 {
        return;
    }

    let cx1 = x1.max(0) as usize;
    let cy1 = y1.max(0) as usize;
    let cx2 = x2.min(cols as i64 - 1) as usize;
    let cy2 = y2.min(rows as i64 - 1) as usize;
    let spread = style.thickness - 1;

    // Horizontal edges
    for y in cy1..=cy2.min(cy1 + spread) {
        paint_span(data, y, cx1, cx2, style.color);
    }
    for y in cy1.max(cy2.saturating_sub(spread))..=cy2 {
        paint_span(data, y, cx1, cx2, style.color);
    }

    // Vertical edges
    for y in cy1..=cy2 {
        paint_span(data, y, cx1, cx2.min(cx1 + spread), style.color);
        paint_span(data, y, cx1.max(cx2.saturating_sub(spread)), cx2, style.color);
    }
}

fn paint_span(data: &mut Array3<u8>, y: usize, x1: usize, x2: usize, color: [u8; 3]) {
    for x in x1..=x2 {
        for (c, &value) in color.iter().enumerate() {
            data[[y, x, c]] = value;
        }
    }
}
