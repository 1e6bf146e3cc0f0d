//! Axis-aligned bounding boxes in logical playfield pixels.

/// A rectangle with its top-left corner at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Aabb { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(self, other)
    }
}

/// Half-open overlap test: boxes that merely share an edge do not overlap.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Anything that occupies a box on the playfield.
pub trait Bounded {
    fn bounds(&self) -> Aabb;

    fn collides_with<T: Bounded>(&self, other: &T) -> bool
    where
        Self: Sized,
    {
        overlaps(&self.bounds(), &other.bounds())
    }
}
