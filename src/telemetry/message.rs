use serde::{Deserialize, Serialize};

use crate::session::BoundingBox;

/// One tick's outbound geometry, derived from the current bounding box.
///
/// Stateless: computed from the box each tick, sent, and dropped. The
/// integer fields come from truncation, matching what wire consumers
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    /// Horizontal center of the tracked region
    pub center_x: i64,
    /// Vertical center of the tracked region
    pub center_y: i64,
    /// Region width
    pub width: i64,
    /// Region height
    pub height: i64,
}

impl TelemetryMessage {
    /// Derive the message for `region`.
    ///
    /// Centers are `x + width / 2` and `y + height / 2` truncated toward
    /// zero, not rounded.
    pub fn from_region(region: BoundingBox) -> Self {
        let (center_x, center_y) = region.center();
        Self {
            center_x: center_x as i64,
            center_y: center_y as i64,
            width: region.width as i64,
            height: region.height as i64,
        }
    }

    /// Wire encoding: four decimal integers, comma-separated, no
    /// terminator.
    pub fn wire_format(&self) -> String {
        format!(
            "{},{},{},{}",
            self.center_x, self.center_y, self.width, self.height
        )
    }
}
