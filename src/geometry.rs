//! Points, rectangles and the inclusive predicates every index is built on.
//!
//! All tests treat rectangle edges as inclusive. A rectangle whose minimum
//! exceeds its maximum on either axis (or that carries a NaN bound) is
//! *invalid*: it intersects nothing, contains nothing, and no point lies in it.

/// A ranked point. Lower `rank` means higher priority.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Opaque caller identifier
    pub id: u32,
    /// Priority key, unique across a point set
    pub rank: i32,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Creates a point
    pub const fn new(id: u32, rank: i32, x: f64, y: f64) -> Self {
        Self { id, rank, x, y }
    }

    /// Returns the coordinate along `axis`
    #[inline]
    pub const fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Returns true when both coordinates are finite
    #[inline]
    pub const fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Coordinate axis used by the kd-tree split
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

impl Axis {
    /// Split axis for a node at `depth`: even depths split on x, odd on y
    #[inline]
    pub const fn for_depth(depth: u32) -> Self {
        if depth % 2 == 0 { Self::X } else { Self::Y }
    }
}

/// Axis-aligned rectangle: (`min_x`, `min_y`) to (`max_x`, `max_y`)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub min_x: f64,
    /// Bottom edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Top edge
    pub max_y: f64,
}

impl Rect {
    /// Creates a rectangle from (`min_x`, `min_y`, `max_x`, `max_y`)
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Smallest rectangle enclosing every point, `None` for an empty slice.
    ///
    /// Non-finite coordinates are skipped.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for p in points.iter().filter(|p| p.is_finite()) {
            let b = bounds.get_or_insert(Self::new(p.x, p.y, p.x, p.y));
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        bounds
    }

    /// True when `min <= max` on both axes (false for NaN bounds)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// True when all four edges are finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite() && self.min_y.is_finite() && self.max_x.is_finite() && self.max_y.is_finite()
    }

    /// Overlap of `self` and `other`, inverted when they are disjoint
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        )
    }

    /// Width of the rectangle
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True unless `other` lies strictly to one side of `self`.
    ///
    /// Touching edges count as intersecting. Invalid rectangles never intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.min_y > self.max_y
            || other.max_x < self.min_x
            || other.max_y < self.min_y)
    }

    /// True when `self` encloses `inner` on all four edges (equality allowed)
    #[inline]
    pub fn contains(&self, inner: &Self) -> bool {
        self.is_valid()
            && inner.is_valid()
            && self.min_x <= inner.min_x
            && self.max_x >= inner.max_x
            && self.min_y <= inner.min_y
            && self.max_y >= inner.max_y
    }

    /// True when `point` lies inside or on the edge of `self`
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.min_x <= point.x && self.max_x >= point.x && self.min_y <= point.y && self.max_y >= point.y
    }

    /// Midpoint split into `[NW, NE, SW, SE]`.
    ///
    /// Neighbouring quadrants share their split line.
    pub fn quadrants(&self) -> [Self; 4] {
        let mid_x = self.min_x + self.width() / 2.0;
        let mid_y = self.min_y + self.height() / 2.0;
        [
            Self::new(self.min_x, mid_y, mid_x, self.max_y),
            Self::new(mid_x, mid_y, self.max_x, self.max_y),
            Self::new(self.min_x, self.min_y, mid_x, mid_y),
            Self::new(mid_x, self.min_y, self.max_x, mid_y),
        ]
    }

    /// Copy of `self` with the upper bound on `axis` moved to `at`
    #[must_use]
    pub const fn clip_max(&self, axis: Axis, at: f64) -> Self {
        let mut r = *self;
        match axis {
            Axis::X => r.max_x = at,
            Axis::Y => r.max_y = at,
        }
        r
    }

    /// Copy of `self` with the lower bound on `axis` moved to `at`
    #[must_use]
    pub const fn clip_min(&self, axis: Axis, at: f64) -> Self {
        let mut r = *self;
        match axis {
            Axis::X => r.min_x = at,
            Axis::Y => r.min_y = at,
        }
        r
    }
}
