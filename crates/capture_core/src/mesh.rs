//! Mesh geometry of the intermediate scene model.
//!
//! A mesh is host-agnostic: positions are already in the Z-up convention,
//! and attribute lists run parallel to `points`. Triangles come either from
//! an explicit face list (RIP) or from every three consecutive points (WRL).

use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;

/// Convert a captured Y-up coordinate to the Z-up convention.
///
/// Closed-form equivalent of a fixed 90 degree rotation about X:
/// `(x, y, z)` becomes `(x, -z, y)`.
#[inline]
pub fn remap_axes(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// A triangle mesh as decoded from a capture.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Mesh {
    /// Mesh name (WRL geometry name or RIP file stem)
    pub name: String,

    /// Vertex positions, Z-up
    pub points: Vec<Vec3>,

    /// Vertex normals (RIP only, parallel to `points`)
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates (parallel to `points`)
    pub texcoords: Option<Vec<Vec2>>,

    /// RGBA vertex colors (parallel to `points`); WRL colors get alpha 1.0
    pub colors: Option<Vec<Vec4>>,

    /// Explicit triangle list. `None` means every 3 consecutive points form a triangle.
    pub faces: Option<Vec<[u32; 3]>>,

    /// Index into [`Scene::materials`](crate::scene::Scene::materials)
    pub material: usize,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Number of triangles. Trailing points that do not complete a triangle are ignored.
    pub fn triangle_count(&self) -> usize {
        match &self.faces {
            Some(faces) => faces.len(),
            None => self.points.len() / 3,
        }
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_texcoords(&self) -> bool {
        self.texcoords.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Triangle vertex indices in reversed order.
    ///
    /// Captures use the opposite winding of the authoring side, so every
    /// sink builds faces as `[c, b, a]` to keep normals facing outwards.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        match &self.faces {
            Some(faces) => faces
                .iter()
                .map(|&[a, b, c]| [c as usize, b as usize, a as usize])
                .collect(),
            None => (0..self.triangle_count())
                .map(|t| {
                    let i = t * 3;
                    [i + 2, i + 1, i]
                })
                .collect(),
        }
    }
}
