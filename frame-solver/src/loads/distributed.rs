//! Uniformly distributed loads on elements

use serde::{Deserialize, Serialize};

use crate::math::Vec6;

/// Sense of a transverse load relative to the element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadSense {
    /// Pushes toward the element (`+1`)
    #[default]
    Towards,
    /// Pulls away from the element (`-1`)
    Away,
}

impl LoadSense {
    /// Numeric sign of the sense
    pub fn sign(self) -> f64 {
        match self {
            Self::Towards => 1.0,
            Self::Away => -1.0,
        }
    }

    /// Map `+1` / `-1` onto a sense
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Self::Towards),
            -1 => Some(Self::Away),
            _ => None,
        }
    }
}

/// A uniform load acting perpendicular to an element over its full length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Load intensity (force per unit length)
    pub q: f64,
    /// Load sense
    #[serde(default)]
    pub sense: LoadSense,
}

impl DistributedLoad {
    /// Create a new distributed load
    pub fn new(q: f64, sense: LoadSense) -> Self {
        Self { q, sense }
    }

    /// Intensity including the sign of the sense
    pub fn signed_intensity(&self) -> f64 {
        self.q * self.sense.sign()
    }

    /// Fixed end forces acting on the element, in global directions
    ///
    /// Layout is `[Fx1, Fz1, T1, Fx2, Fz2, T2]`. The structure receives the
    /// same vector with opposite sign.
    ///
    /// # Arguments
    /// * `length` - Element length
    /// * `alpha` - Element angle with the global x-axis (radians)
    pub fn primary_force_vector(&self, length: f64, alpha: f64) -> Vec6 {
        let q = self.signed_intensity();
        let end_moment = q * length.powi(2) / 12.0;
        let reaction_x = 0.5 * q * length * alpha.sin();
        let reaction_z = 0.5 * q * length * alpha.cos();

        Vec6::new(
            -reaction_x,
            -reaction_z,
            end_moment,
            -reaction_x,
            -reaction_z,
            -end_moment,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_horizontal_primary_forces() {
        let load = DistributedLoad::new(10.0, LoadSense::Towards);
        let fer = load.primary_force_vector(6.0, 0.0);

        assert_relative_eq!(fer[0], 0.0);
        assert_relative_eq!(fer[1], -30.0);
        assert_relative_eq!(fer[2], 30.0);
        assert_relative_eq!(fer[4], -30.0);
        assert_relative_eq!(fer[5], -30.0);
    }

    #[test]
    fn test_sense_flips_every_entry() {
        let towards = DistributedLoad::new(4.0, LoadSense::Towards).primary_force_vector(3.0, 0.4);
        let away = DistributedLoad::new(4.0, LoadSense::Away).primary_force_vector(3.0, 0.4);
        for i in 0..6 {
            assert_relative_eq!(towards[i], -away[i]);
        }
    }

    #[test]
    fn test_vertical_element_reactions_are_horizontal() {
        let fer = DistributedLoad::new(2.0, LoadSense::Towards).primary_force_vector(5.0, FRAC_PI_2);
        assert_relative_eq!(fer[0], -5.0);
        assert_relative_eq!(fer[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sense_from_sign() {
        assert_eq!(LoadSense::from_sign(1), Some(LoadSense::Towards));
        assert_eq!(LoadSense::from_sign(-1), Some(LoadSense::Away));
        assert_eq!(LoadSense::from_sign(0), None);
    }
}
