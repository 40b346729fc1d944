use wayfind_core::{Point, chebyshev, euclidean, manhattan};

/// How moves between grid cells are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measurement {
    /// 4-way movement, every step costs 1.
    #[default]
    Manhattan,
    /// 8-way movement, diagonal steps cost 1.
    Chebyshev,
    /// 8-way movement, diagonal steps cost √2.
    Euclidean,
}

impl Measurement {
    /// Whether diagonal moves are allowed at all.
    #[inline]
    pub fn allows_diagonals(self) -> bool {
        !matches!(self, Measurement::Manhattan)
    }

    /// Unit directions in scan priority order: N, E, S, W, then NE, SE,
    /// SW, NW for 8-way measurements.
    pub fn directions(self) -> &'static [Point] {
        static ALL: [Point; 8] = [
            Point::CARDINALS[0],
            Point::CARDINALS[1],
            Point::CARDINALS[2],
            Point::CARDINALS[3],
            Point::DIAGONALS[0],
            Point::DIAGONALS[1],
            Point::DIAGONALS[2],
            Point::DIAGONALS[3],
        ];
        if self.allows_diagonals() {
            &ALL
        } else {
            &ALL[..4]
        }
    }

    /// Length of a unit step in direction `d`.
    #[inline]
    pub fn step_length(self, d: Point) -> f32 {
        match self {
            Measurement::Euclidean if d.is_diagonal() => std::f32::consts::SQRT_2,
            _ => 1.0,
        }
    }

    /// Open-grid distance between two points under this measurement.
    pub fn distance(self, a: Point, b: Point) -> f32 {
        match self {
            Measurement::Manhattan => manhattan(a, b) as f32,
            Measurement::Chebyshev => chebyshev(a, b) as f32,
            Measurement::Euclidean => euclidean(a, b),
        }
    }
}

/// Settings for a [`GradientGrid`](crate::GradientGrid).
///
/// # Examples
///
/// ```
/// use wayfind_paths::{GradientConfig, Measurement};
///
/// let config = GradientConfig::default()
///     .with_measurement(Measurement::Euclidean)
///     .with_blocking_requirement(2);
/// assert_eq!(config.blocking_requirement, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GradientConfig {
    pub measurement: Measurement,
    /// How many of the two orthogonal cells beside a diagonal move must be
    /// walls to forbid it: 0 never forbids, 1 forbids when either is a
    /// wall, 2 only when both are.
    pub blocking_requirement: u8,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            measurement: Measurement::Manhattan,
            blocking_requirement: 1,
        }
    }
}

impl GradientConfig {
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurement = measurement;
        self
    }

    /// Values above 2 are clamped to 2.
    pub fn with_blocking_requirement(mut self, requirement: u8) -> Self {
        self.blocking_requirement = requirement.min(2);
        self
    }

    /// Whether a diagonal move is forbidden given how many of its two
    /// orthogonal side cells are walls.
    #[inline]
    pub(crate) fn corner_blocked(&self, walls: u8) -> bool {
        self.blocking_requirement > 0 && walls >= self.blocking_requirement
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let c = GradientConfig::default().with_measurement(Measurement::Euclidean);
        let json = serde_json::to_string(&c).unwrap();
        let back: GradientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
