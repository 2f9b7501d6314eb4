//! Light sources
//!
//! Lights are positioned by their node transform. Each light owns a slot
//! (`light_id`) handed out by the scene graph; the backend maps slots to its
//! own light units.

use crate::foundation::math::{Vec3, Vec4};
use super::{SceneError, SceneResult};

/// Cutoff reported by omnidirectional lights (the fixed-function "no cone" value)
pub const OMNI_CUTOFF_DEGREES: f32 = 180.0;

/// Distance attenuation factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    constant: f32,
    linear: f32,
    quadratic: f32,
}

impl Attenuation {
    /// Create attenuation factors, rejecting negative values
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> SceneResult<Self> {
        let mut attenuation = Self::default();
        attenuation.set_constant(constant)?;
        attenuation.set_linear(linear)?;
        attenuation.set_quadratic(quadratic)?;
        Ok(attenuation)
    }

    /// Constant factor
    pub fn constant(&self) -> f32 {
        self.constant
    }

    /// Linear factor
    pub fn linear(&self) -> f32 {
        self.linear
    }

    /// Quadratic factor
    pub fn quadratic(&self) -> f32 {
        self.quadratic
    }

    /// Set the constant factor; negative values leave it unchanged
    pub fn set_constant(&mut self, value: f32) -> SceneResult<()> {
        self.constant = non_negative(value)?;
        Ok(())
    }

    /// Set the linear factor; negative values leave it unchanged
    pub fn set_linear(&mut self, value: f32) -> SceneResult<()> {
        self.linear = non_negative(value)?;
        Ok(())
    }

    /// Set the quadratic factor; negative values leave it unchanged
    pub fn set_quadratic(&mut self, value: f32) -> SceneResult<()> {
        self.quadratic = non_negative(value)?;
        Ok(())
    }

    /// Attenuation multiplier at a distance
    pub fn factor_at(&self, distance: f32) -> f32 {
        let denominator = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denominator > 0.0 {
            1.0 / denominator
        } else {
            1.0
        }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

fn non_negative(value: f32) -> SceneResult<f32> {
    // NaN fails this check as well
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(SceneError::NegativeAttenuation(value))
    }
}

/// Shape of the emitted light
#[derive(Debug, Clone, PartialEq)]
pub enum LightSource {
    /// Infinitely distant light shining along `direction`
    Directional {
        /// Direction stored as the homogeneous position with w = 0
        direction: Vec3,
    },
    /// Point light radiating in all directions
    Omnidirectional {
        /// Distance attenuation
        attenuation: Attenuation,
    },
    /// Cone light
    Spot {
        /// Cone axis in the light's local frame
        direction: Vec3,
        /// Half-angle of the cone in degrees
        cutoff: f32,
        /// Distance attenuation
        attenuation: Attenuation,
    },
}

/// A light source attached to a node
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub(super) light_id: u32,
    /// Ambient color
    pub ambient: Vec3,
    /// Diffuse color
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Emission shape
    pub source: LightSource,
}

impl Light {
    /// Create a light; the slot is assigned when the scene graph stores it
    pub fn new(source: LightSource, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        Self {
            light_id: 0,
            ambient,
            diffuse,
            specular,
            source,
        }
    }

    /// Directional light with white diffuse/specular and no ambient term
    pub fn directional(direction: Vec3) -> Self {
        Self::new(
            LightSource::Directional { direction },
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        )
    }

    /// Omnidirectional light with default attenuation
    pub fn omnidirectional() -> Self {
        Self::new(
            LightSource::Omnidirectional { attenuation: Attenuation::default() },
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        )
    }

    /// Spot light with default attenuation
    pub fn spot(direction: Vec3, cutoff: f32) -> Self {
        Self::new(
            LightSource::Spot { direction, cutoff, attenuation: Attenuation::default() },
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        )
    }

    /// Set the three color terms
    pub fn with_colors(mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// Backend light slot
    pub fn light_id(&self) -> u32 {
        self.light_id
    }

    /// Homogeneous position in the light's local frame
    pub fn position(&self) -> Vec4 {
        match &self.source {
            LightSource::Directional { direction } => Vec4::new(direction.x, direction.y, direction.z, 0.0),
            LightSource::Omnidirectional { .. } | LightSource::Spot { .. } => Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Cone cutoff in degrees, `None` for directional lights
    pub fn cutoff(&self) -> Option<f32> {
        match &self.source {
            LightSource::Directional { .. } => None,
            LightSource::Omnidirectional { .. } => Some(OMNI_CUTOFF_DEGREES),
            LightSource::Spot { cutoff, .. } => Some(*cutoff),
        }
    }

    /// Attenuation factors, `None` for directional lights
    pub fn attenuation(&self) -> Option<&Attenuation> {
        match &self.source {
            LightSource::Directional { .. } => None,
            LightSource::Omnidirectional { attenuation } | LightSource::Spot { attenuation, .. } => Some(attenuation),
        }
    }

    /// Mutable attenuation factors
    pub fn attenuation_mut(&mut self) -> Option<&mut Attenuation> {
        match &mut self.source {
            LightSource::Directional { .. } => None,
            LightSource::Omnidirectional { attenuation } | LightSource::Spot { attenuation, .. } => Some(attenuation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_attenuation_is_rejected() {
        let mut attenuation = Attenuation::default();
        assert_eq!(attenuation.set_linear(-0.5), Err(SceneError::NegativeAttenuation(-0.5)));
        assert_eq!(attenuation.linear(), 0.0);

        attenuation.set_linear(0.25).unwrap();
        assert_eq!(attenuation.linear(), 0.25);
        assert!(Attenuation::new(1.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_attenuation_factor() {
        let attenuation = Attenuation::new(1.0, 1.0, 0.0).unwrap();
        assert_eq!(attenuation.factor_at(0.0), 1.0);
        assert_eq!(attenuation.factor_at(1.0), 0.5);
    }

    #[test]
    fn test_light_positions() {
        let sun = Light::directional(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sun.position(), Vec4::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(sun.cutoff(), None);
        assert!(sun.attenuation().is_none());

        let bulb = Light::omnidirectional();
        assert_eq!(bulb.position(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(bulb.cutoff(), Some(OMNI_CUTOFF_DEGREES));

        let spot = Light::spot(Vec3::new(0.0, -1.0, 0.0), 30.0);
        assert_eq!(spot.cutoff(), Some(30.0));
        assert_eq!(spot.attenuation().map(Attenuation::constant), Some(1.0));
    }
}
