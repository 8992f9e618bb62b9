/// Axis-aligned bounding box in frame pixel coordinates.
///
/// `x`/`y` locate the top-left corner relative to the frame's top-left
/// origin; `width` and `height` are non-negative. A box with zero width
/// and zero height is the sentinel for "no selection" / "no detection",
/// whatever its position; see [`BoundingBox::is_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the box
    pub width: f32,
    /// Height of the box
    pub height: f32,
}

impl BoundingBox {
    /// The sentinel box reported when there is nothing selected or found.
    pub const EMPTY: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a new box from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this is the "no selection / no detection" sentinel.
    ///
    /// Only the dimensions are checked; the position of a sentinel box
    /// carries no meaning.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Corner coordinates as (x1, y1, x2, y2).
    #[inline]
    pub fn corners(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
