//! Material system for scene meshes

use crate::foundation::math::Vec3;

slotmap::new_key_type! {
    /// Handle to a material stored in a [`super::SceneGraph`]
    pub struct MaterialId;
}

/// Reference to a texture owned by an external asset system
///
/// Decoding and binding are the backend's business; the scene only carries
/// the name through to draw commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureRef(pub String);

/// Surface properties shared by meshes
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Emitted color
    pub emission: Vec3,
    /// Ambient reflectance
    pub ambient: Vec3,
    /// Diffuse reflectance
    pub diffuse: Vec3,
    /// Specular reflectance
    pub specular: Vec3,
    /// Specular exponent
    pub shininess: f32,
    /// Optional diffuse texture
    pub texture: Option<TextureRef>,
    transparency: f32,
}

impl Material {
    /// Create a new opaque white material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emission: Vec3::zeros(),
            ambient: Vec3::new(0.2, 0.2, 0.2),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::zeros(),
            shininess: 0.0,
            texture: None,
            transparency: 1.0,
        }
    }

    /// Set the diffuse color
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = Vec3::new(r, g, b);
        self
    }

    /// Set the ambient color
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient = Vec3::new(r, g, b);
        self
    }

    /// Set the specular color and exponent
    pub fn with_specular(mut self, r: f32, g: f32, b: f32, shininess: f32) -> Self {
        self.specular = Vec3::new(r, g, b);
        self.shininess = shininess;
        self
    }

    /// Set the emitted color
    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emission = Vec3::new(r, g, b);
        self
    }

    /// Set the transparency (1.0 = fully opaque)
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.set_transparency(transparency);
        self
    }

    /// Attach a texture by name
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(TextureRef(texture.into()));
        self
    }

    /// Transparency factor in [0, 1]; 1.0 is fully opaque
    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    /// Set the transparency, clamped into [0, 1]
    pub fn set_transparency(&mut self, transparency: f32) {
        self.transparency = transparency.clamp(0.0, 1.0);
    }

    /// Whether the material is drawn without blending
    #[allow(clippy::float_cmp)]
    pub fn is_opaque(&self) -> bool {
        self.transparency == 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_requires_exact_one() {
        assert!(Material::new("solid").is_opaque());
        assert!(!Material::new("glass").with_transparency(0.999).is_opaque());
        assert!(!Material::new("ghost").with_transparency(0.0).is_opaque());
    }

    #[test]
    fn test_transparency_is_clamped() {
        let mut material = Material::new("m").with_transparency(3.0);
        assert_eq!(material.transparency(), 1.0);
        assert!(material.is_opaque());

        material.set_transparency(-1.0);
        assert_eq!(material.transparency(), 0.0);
    }
}
