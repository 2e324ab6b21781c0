use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;
pub const PI: f64 = std::f64::consts::PI;

/// Value representing a 2D point or vector.
#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point(pub [Scalar; 2]);

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        write!(f, "{},{}", x, y)
    }
}

impl Point {
    #[inline]
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` compenent of the point
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Dot product between two vectors
    pub fn dot(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * x1 + y0 * y1
    }

    /// Cross product between two vectors
    pub fn cross(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * y1 - y0 * x1
    }

    /// Convert vector to a unit size vector, if length is not zero
    pub fn normalize(self) -> Option<Point> {
        let Self([x, y]) = self;
        let length = self.length();
        if length < EPSILON {
            None
        } else {
            Some(Self([x / length, y / length]))
        }
    }

    /// Angle of the vector relative to the positive `x` axis in `(-PI, PI]`
    pub fn angle(self) -> Scalar {
        let Self([x, y]) = self;
        y.atan2(x)
    }
}

impl From<(Scalar, Scalar)> for Point {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Self::Output {
        let Point([x, y]) = other;
        Point([self * x, self * y])
    }
}

impl Div<Scalar> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        let Point([x, y]) = self;
        Point([x / rhs, y / rhs])
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 + x1, y0 + y1])
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 - x1, y0 - y1])
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Self::Output {
        let Point([x, y]) = self;
        Point([-x, -y])
    }
}

/// Size of the rectangular region in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

/// Pixel aligned rectangle, `x` and `y` is a top left corner (inclusive)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Single pixel rectangle
    pub const fn pixel(x: usize, y: usize) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Column just past the right edge
    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Row just past the bottom edge
    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Number of pixels covered by the rectangle
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Determine if the pixel is inside of the rectangle
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    /// Determine if other rectangle is completely inside of this one
    ///
    /// Rectangle whose edge does not fit into `usize` is never contained.
    pub fn contains_rect(&self, other: Rect) -> bool {
        match (
            other.x.checked_add(other.width),
            other.y.checked_add(other.height),
        ) {
            (Some(right), Some(bottom)) => {
                self.x <= other.x
                    && self.y <= other.y
                    && right <= self.right()
                    && bottom <= self.bottom()
            }
            _ => false,
        }
    }

    /// Extend rectangle so it would contain provided pixel
    pub fn extend(&self, x: usize, y: usize) -> Self {
        self.union(Rect::pixel(x, y))
    }

    /// Create rectangle that spans both rectangles
    pub fn union(&self, other: Rect) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect x={} y={} w={} h={}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}
