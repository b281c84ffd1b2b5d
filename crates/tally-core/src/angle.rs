//! Angle units for the trigonometric primitives

/// Unit that trigonometric inputs and inverse-trigonometric outputs are measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Convert an angle measured in this unit to radians
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle.to_radians(),
        }
    }

    /// Convert an angle in radians to this unit
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Radians => radians,
            AngleUnit::Degrees => radians.to_degrees(),
        }
    }
}
