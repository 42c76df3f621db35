/// Axis-aligned rectangle in pixel space.
///
/// A rectangle with zero width or height is empty, which is not the same
/// thing as a rectangle anchored at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at `(x, y)` covering an image of `width x height`.
    pub fn from_image(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(x, y, width as i32, height as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Grow to the smallest rectangle enclosing both `self` and `other`.
    pub fn union(&mut self, other: &Rect) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }

        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        self.x = self.x.min(other.x);
        self.y = self.y.min(other.y);
        self.width = right - self.x;
        self.height = bottom - self.y;
    }
}
