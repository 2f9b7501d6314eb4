//! Mesh payload for scene nodes

use crate::foundation::math::{Vec2, Vec3};
use super::{MaterialId, SceneError, SceneResult};

/// Triangle geometry with per-vertex attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Vertex normals, one per vertex
    pub normals: Vec<Vec3>,
    /// Texture coordinates, one per vertex
    pub tex_coords: Vec<Vec2>,
    /// Triangles as vertex indices
    pub faces: Vec<[u32; 3]>,
}

impl MeshGeometry {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check attribute counts and index bounds
    pub fn validate(&self) -> SceneResult<()> {
        let count = self.vertices.len();

        if self.normals.len() != count {
            return Err(SceneError::InvalidGeometry(format!(
                "{} normals for {} vertices",
                self.normals.len(),
                count
            )));
        }
        if self.tex_coords.len() != count {
            return Err(SceneError::InvalidGeometry(format!(
                "{} texture coordinates for {} vertices",
                self.tex_coords.len(),
                count
            )));
        }

        for (face_index, face) in self.faces.iter().enumerate() {
            if let Some(index) = face.iter().find(|&&index| index as usize >= count) {
                return Err(SceneError::InvalidGeometry(format!(
                    "face {} references vertex {} (only {} vertices)",
                    face_index, index, count
                )));
            }
        }

        Ok(())
    }

    /// Axis-aligned cube standing on the XZ plane
    ///
    /// The cube spans `[-edge/2, edge/2]` on X and Z and `[0, edge]` on Y.
    /// Each face has its own four vertices so normals stay flat.
    pub fn cube(edge: f32) -> Self {
        let h = edge * 0.5;
        // (normal, four corners counter-clockwise seen from outside)
        let sides: [(Vec3, [Vec3; 4]); 6] = [
            (Vec3::new(0.0, 0.0, -1.0), [
                Vec3::new(h, 0.0, -h), Vec3::new(-h, 0.0, -h), Vec3::new(-h, edge, -h), Vec3::new(h, edge, -h),
            ]),
            (Vec3::new(0.0, 0.0, 1.0), [
                Vec3::new(-h, 0.0, h), Vec3::new(h, 0.0, h), Vec3::new(h, edge, h), Vec3::new(-h, edge, h),
            ]),
            (Vec3::new(-1.0, 0.0, 0.0), [
                Vec3::new(-h, 0.0, -h), Vec3::new(-h, 0.0, h), Vec3::new(-h, edge, h), Vec3::new(-h, edge, -h),
            ]),
            (Vec3::new(1.0, 0.0, 0.0), [
                Vec3::new(h, 0.0, h), Vec3::new(h, 0.0, -h), Vec3::new(h, edge, -h), Vec3::new(h, edge, h),
            ]),
            (Vec3::new(0.0, -1.0, 0.0), [
                Vec3::new(-h, 0.0, -h), Vec3::new(h, 0.0, -h), Vec3::new(h, 0.0, h), Vec3::new(-h, 0.0, h),
            ]),
            (Vec3::new(0.0, 1.0, 0.0), [
                Vec3::new(-h, edge, h), Vec3::new(h, edge, h), Vec3::new(h, edge, -h), Vec3::new(-h, edge, -h),
            ]),
        ];
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];

        let mut geometry = Self::default();
        for (normal, corners) in sides {
            let base = geometry.vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(uvs.iter()) {
                geometry.vertices.push(*corner);
                geometry.normals.push(normal);
                geometry.tex_coords.push(*uv);
            }
            geometry.faces.push([base, base + 1, base + 2]);
            geometry.faces.push([base, base + 2, base + 3]);
        }
        geometry
    }
}

/// Renderable geometry with an optional shared material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Material applied when drawing; a mesh without one is malformed at render time
    pub material: Option<MaterialId>,
    /// Geometry data
    pub geometry: MeshGeometry,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(material: Option<MaterialId>) -> Self {
        Self {
            material,
            geometry: MeshGeometry::default(),
        }
    }

    /// Create a mesh with geometry
    pub fn with_geometry(material: Option<MaterialId>, geometry: MeshGeometry) -> Self {
        Self { material, geometry }
    }
}
