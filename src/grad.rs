use crate::{
    Color, ColorF, PI, Point, RGBA, Scalar,
    utils::{fract_euclid, triangle},
};
use std::{cmp::Ordering, fmt};

/// Gradient spread logic for the parameter smaller than 0 and greater than 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum GradSpread {
    /// Use the same colors as the edge of the gradient
    #[default]
    Pad,
    /// Repeat gradient
    Repeat,
    /// Repeat gradient but alternate reflected and non reflectet versions
    Reflect,
}

impl GradSpread {
    /// Map gradient parameter value to the range of [0, 1]
    pub fn at(&self, t: Scalar) -> Scalar {
        match self {
            GradSpread::Pad => t.clamp(0.0, 1.0),
            GradSpread::Repeat => fract_euclid(t),
            GradSpread::Reflect => triangle(t),
        }
    }
}

/// Geometry of the gradient field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum GradShape {
    /// Parameter is a projection on the `start -> end` axis
    #[default]
    Linear,
    /// Parameter is a distance from `start`, `|end - start|` is the radius
    Radial,
    /// Parameter is an angle around `start`, `end` defines starting angle
    Angular,
    /// Like radial, but iso-contours are diamonds oriented along `start -> end`
    Diamond,
}

/// Specifies color at a particular parmeter offset of the gradient
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradStop {
    pub position: Scalar,
    pub color: RGBA,
}

impl GradStop {
    pub fn new(position: Scalar, color: RGBA) -> Self {
        Self { position, color }
    }
}

/// List of all `GradStop` in the gradient
///
/// Stops are kept in the order they were provided, [`GradStops::validate`]
/// checks that they are strictly sorted.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct GradStops {
    stops: Vec<GradStop>,
}

impl GradStops {
    pub fn new(stops: Vec<GradStop>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GradStop> + '_ {
        self.stops.iter()
    }

    /// Check that there are at least two finite stops sorted by position
    pub fn validate(&self) -> Result<(), GradientError> {
        if self.stops.len() < 2 {
            return Err(GradientError::TooFewStops(self.stops.len()));
        }
        for (index, stop) in self.stops.iter().enumerate() {
            if !stop.position.is_finite() {
                return Err(GradientError::NonFiniteStop { index });
            }
            if index > 0 && stop.position <= self.stops[index - 1].position {
                return Err(GradientError::UnsortedStops { index });
            }
        }
        Ok(())
    }

    /// Color at the parameter offset, values outside of the covered range
    /// are clamped to the closest end stop.
    pub fn at(&self, t: Scalar) -> ColorF {
        let index = self.stops.binary_search_by(|stop| {
            if stop.position < t {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        let index = match index {
            Ok(index) => index,
            Err(index) => index,
        };
        let size = self.stops.len();
        if size == 0 {
            ColorF::ZERO
        } else if index == 0 {
            self.stops[index].color.into()
        } else if index == size {
            self.stops[size - 1].color.into()
        } else {
            let p0 = &self.stops[index - 1];
            let p1 = &self.stops[index];
            let ratio = (t - p0.position) / (p1.position - p0.position);
            ColorF::from(p0.color).lerp(p1.color.into(), ratio as f32)
        }
    }

    /// Color at the parameter offset when the parameter goes around a circle
    ///
    /// Inside of the covered range this is the same as [`GradStops::at`], the
    /// rest of the circle interpolates from the last stop to the first one
    /// placed at `position + 1`.
    pub fn at_cyclic(&self, t: Scalar) -> ColorF {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return ColorF::ZERO,
        };
        if first.position <= t && t <= last.position {
            return self.at(t);
        }
        let t = if t < first.position { t + 1.0 } else { t };
        let span = first.position + 1.0 - last.position;
        if span <= 0.0 {
            // stops already cover the whole circle
            return self.at(t);
        }
        let ratio = ((t - last.position) / span).clamp(0.0, 1.0);
        ColorF::from(last.color).lerp(first.color.into(), ratio as f32)
    }
}

impl From<Vec<GradStop>> for GradStops {
    fn from(stops: Vec<GradStop>) -> Self {
        Self::new(stops)
    }
}

/// Gradient description as it comes from the tool options
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gradient {
    pub stops: GradStops,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: GradShape,
    /// Flip parameter `t -> 1 - t`
    #[cfg_attr(feature = "serde", serde(default))]
    pub reverse: bool,
    /// Ignored by the angular shape, which always wraps around
    #[cfg_attr(feature = "serde", serde(default))]
    pub spread: GradSpread,
    /// Origin of the gradient
    pub start: Point,
    /// Defines the axis, radius or starting angle depending on the shape
    pub end: Point,
}

impl Gradient {
    pub fn new(
        stops: impl Into<GradStops>,
        shape: GradShape,
        start: impl Into<Point>,
        end: impl Into<Point>,
    ) -> Self {
        Self {
            stops: stops.into(),
            shape,
            reverse: false,
            spread: GradSpread::default(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn with_reverse(self, reverse: bool) -> Self {
        Self { reverse, ..self }
    }

    pub fn with_spread(self, spread: GradSpread) -> Self {
        Self { spread, ..self }
    }

    /// Validate gradient and precompute its geometry
    pub fn field(&self) -> Result<GradientField<'_>, GradientError> {
        GradientField::new(self)
    }
}

/// Gradient with precomputed geometry, evaluates parameter and color at any point
#[derive(Debug, Clone)]
pub struct GradientField<'a> {
    gradient: &'a Gradient,
    // unit vector along `end - start`
    dir: Point,
    // `1 / |end - start|`
    inv_length: Scalar,
    // angle of the `end - start` vector
    start_angle: Scalar,
}

impl<'a> GradientField<'a> {
    pub fn new(gradient: &'a Gradient) -> Result<Self, GradientError> {
        gradient.stops.validate()?;
        let axis = gradient.end - gradient.start;
        if !axis.x().is_finite() || !axis.y().is_finite() {
            return Err(GradientError::DegenerateAxis);
        }
        let (dir, inv_length, start_angle) = match axis.normalize() {
            Some(dir) => (dir, 1.0 / axis.length(), axis.angle()),
            None if gradient.shape == GradShape::Angular => (Point::new(1.0, 0.0), 0.0, 0.0),
            None => return Err(GradientError::DegenerateAxis),
        };
        Ok(Self {
            gradient,
            dir,
            inv_length,
            start_angle,
        })
    }

    pub fn gradient(&self) -> &Gradient {
        self.gradient
    }

    /// Gradient parameter `t` in `[0, 1]` at the given point, the angular
    /// shape produces the angle fraction in `[0, 1)`
    pub fn offset(&self, point: Point) -> Scalar {
        let grad = self.gradient;
        let rel = point - grad.start;
        let t = match grad.shape {
            GradShape::Linear => grad.spread.at(rel.dot(self.dir) * self.inv_length),
            GradShape::Radial => grad.spread.at(rel.length() * self.inv_length),
            GradShape::Diamond => {
                // coordinates in the gradient frame, scaled so `end` is at (1, 0)
                let u = rel.dot(self.dir) * self.inv_length;
                let v = rel.cross(self.dir) * self.inv_length;
                // chebyshev distance in the frame rotated by 45 degrees,
                // iso-contours are diamonds with tips on the axis
                let dist = (u + v).abs().max((u - v).abs());
                grad.spread.at(dist)
            }
            GradShape::Angular => fract_euclid((rel.angle() - self.start_angle) / (2.0 * PI)),
        };
        if grad.reverse { 1.0 - t } else { t }
    }

    /// Evaluate gradient parameter and color at the given point
    ///
    /// Angular gradient closes the circle with the span between the last and
    /// the first stops, so there is no step at the seam.
    pub fn evaluate(&self, point: Point) -> (Scalar, ColorF) {
        let t = self.offset(point);
        let stops = &self.gradient.stops;
        let color = match self.gradient.shape {
            GradShape::Angular => stops.at_cyclic(t),
            _ => stops.at(t),
        };
        (t, color)
    }

    /// Evaluate gradient at the center of the pixel
    pub fn evaluate_pixel(&self, x: usize, y: usize) -> (Scalar, ColorF) {
        self.evaluate(Point::new(x as Scalar + 0.5, y as Scalar + 0.5))
    }
}

/// Reason why gradient can not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientError {
    /// Gradient needs at least two stops
    TooFewStops(usize),
    /// Stop at index is not strictly greater than the previous one
    UnsortedStops { index: usize },
    /// Stop position is NaN or infinite
    NonFiniteStop { index: usize },
    /// Start and end points coincide (or are not finite)
    DegenerateAxis,
}

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientError::TooFewStops(count) => {
                write!(f, "gradient requires at least 2 stops, got {}", count)
            }
            GradientError::UnsortedStops { index } => {
                write!(f, "gradient stop {} is not sorted by position", index)
            }
            GradientError::NonFiniteStop { index } => {
                write!(f, "gradient stop {} has non finite position", index)
            }
            GradientError::DegenerateAxis => write!(f, "gradient start and end points coincide"),
        }
    }
}

impl std::error::Error for GradientError {}
