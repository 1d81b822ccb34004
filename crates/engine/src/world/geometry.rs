use serde::{Deserialize, Serialize};

/// World coordinates grow right along `x` and down along `y`, matching the
/// background images the scenes are laid out on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        Vec2::new(other.x - self.x, other.y - self.y).length()
    }
}

/// Axis-aligned box stored as min/max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectCorners")]
pub struct Rect {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

/// Wire form of `Rect`; decoded corners go through `Rect::new`.
#[derive(Deserialize)]
struct RectCorners {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

impl From<RectCorners> for Rect {
    fn from(corners: RectCorners) -> Self {
        Rect::new(corners.x_min, corners.y_min, corners.x_max, corners.y_max)
    }
}

impl Rect {
    /// Swapped corners are normalized so that `min <= max` always holds.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min: x_min.min(x_max),
            y_min: y_min.min(y_max),
            x_max: x_min.max(x_max),
            y_max: y_min.max(y_max),
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    pub fn x_min(&self) -> f32 {
        self.x_min
    }

    pub fn y_min(&self) -> f32 {
        self.y_min
    }

    pub fn x_max(&self) -> f32 {
        self.x_max
    }

    pub fn y_max(&self) -> f32 {
        self.y_max
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x_min, self.y_min)
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x_min: self.x_min + dx,
            y_min: self.y_min + dy,
            x_max: self.x_max + dx,
            y_max: self.y_max + dy,
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }

    /// Touching edges do not count as overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.y_min < other.y_max
            && other.y_min < self.y_max
    }

    /// Area shared with `other`; zero when they only touch or are apart.
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let width = self.x_max.min(other.x_max) - self.x_min.max(other.x_min);
        let height = self.y_max.min(other.y_max) - self.y_min.max(other.y_min);
        if width > 0.0 && height > 0.0 {
            width * height
        } else {
            0.0
        }
    }

    /// Distance from the nearest point of the rect to `point`; zero inside.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let nearest = Vec2::new(
            point.x.clamp(self.x_min, self.x_max),
            point.y.clamp(self.y_min, self.y_max),
        );
        nearest.distance(point)
    }

    /// Moves `self` the least amount needed to fit inside `bounds`. A rect
    /// larger than `bounds` on an axis is pinned to the bounds' min edge.
    pub fn clamped_within(&self, bounds: &Rect) -> Self {
        let dx = clamp_offset(self.x_min, self.x_max, bounds.x_min, bounds.x_max);
        let dy = clamp_offset(self.y_min, self.y_max, bounds.y_min, bounds.y_max);
        self.translated(dx, dy)
    }
}

fn clamp_offset(min: f32, max: f32, bound_min: f32, bound_max: f32) -> f32 {
    if min < bound_min || max - min > bound_max - bound_min {
        bound_min - min
    } else if max > bound_max {
        bound_max - max
    } else {
        0.0
    }
}
