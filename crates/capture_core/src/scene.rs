//! Intermediate scene model shared by both decoders.
//!
//! A [`Scene`] is created per source file, filled by one parse pass and then
//! handed to a [`SceneSink`](crate::sink::SceneSink). Materials are folded into
//! a unique list on insertion; meshes reference them by index.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Serialize;

use crate::mesh::Mesh;

/// A captured surface material.
///
/// Two materials are the same surface when [`Material::same_surface`] holds;
/// the name and specular terms do not take part in that comparison.
#[derive(Clone, Debug, Serialize)]
pub struct Material {
    /// Material name (WRL appearance name or RIP texture name)
    pub name: String,

    /// Position in the scene's unique material list, assigned on insertion
    pub index: usize,

    /// Scale applied to the diffuse color
    pub ambient_intensity: f32,

    /// Diffuse color (RGB, 0-1)
    pub diffuse_color: Vec3,

    /// Specular color (RGB, 0-1)
    pub specular_color: Vec3,

    /// Emissive color (RGB, 0-1)
    pub emissive_color: Vec3,

    /// Specular exponent as written by the producer
    pub shininess: f32,

    /// Opacity (0=transparent, 1=opaque)
    pub alpha: f32,

    /// Texture path relative to the scene directory
    pub texture_url: Option<String>,

    /// Whether the texture tiles (otherwise it clamps)
    pub texture_repeat: bool,

    /// Index of the first mesh that used this material
    pub first_mesh: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            index: 0,
            ambient_intensity: 1.0,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            emissive_color: Vec3::ZERO,
            shininess: 0.0,
            alpha: 1.0,
            texture_url: None,
            texture_repeat: true,
            first_mesh: None,
        }
    }
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Structural identity used for deduplication.
    pub fn same_surface(&self, other: &Material) -> bool {
        self.texture_url == other.texture_url
            && self.texture_repeat == other.texture_repeat
            && self.diffuse_color == other.diffuse_color
            && self.emissive_color == other.emissive_color
            && self.alpha == other.alpha
            && self.ambient_intensity == other.ambient_intensity
    }

    pub fn has_texture(&self) -> bool {
        self.texture_url.is_some()
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive_color.length_squared() > 0.0
    }
}

/// A decoded capture: unique materials plus the meshes that use them.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Scene {
    /// Directory of the source file, used to resolve texture paths
    pub directory: PathBuf,

    /// Source file name
    pub filename: String,

    /// Unique materials, in first-seen order
    pub materials: Vec<Material>,

    /// Meshes, in file order
    pub meshes: Vec<Mesh>,
}

impl Scene {
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Full path of the source file.
    pub fn source_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// Insert a material unless an equal surface already exists, returning its index.
    ///
    /// A duplicate is dropped and the existing entry (and its `first_mesh`) is kept.
    pub fn add_material(&mut self, mut material: Material) -> usize {
        if let Some(existing) = self
            .materials
            .iter()
            .position(|m| m.same_surface(&material))
        {
            log::debug!(
                "Material '{}' folded into '{}'",
                material.name,
                self.materials[existing].name
            );
            return existing;
        }

        let index = self.materials.len();
        material.index = index;
        material.first_mesh = None;
        self.materials.push(material);
        index
    }

    /// Deduplicate `material`, attach it to `mesh` and append the mesh.
    ///
    /// Returns the mesh index.
    pub fn add_mesh(&mut self, mut mesh: Mesh, material: Material) -> usize {
        let material_index = self.add_material(material);
        let mesh_index = self.meshes.len();
        mesh.material = material_index;

        let material = &mut self.materials[material_index];
        if material.first_mesh.is_none() {
            material.first_mesh = Some(mesh_index);
        }

        self.meshes.push(mesh);
        mesh_index
    }

    pub fn material_of(&self, mesh: &Mesh) -> Option<&Material> {
        self.materials.get(mesh.material)
    }

    /// Meshes that reference the material at `index`.
    pub fn meshes_using(&self, index: usize) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().filter(move |m| m.material == index)
    }

    /// Whether the first mesh linked to this material carries vertex colors.
    ///
    /// Sinks use this as the default for multiplying vertex colors into the shading.
    pub fn material_uses_vertex_colors(&self, index: usize) -> bool {
        self.materials
            .get(index)
            .and_then(|m| m.first_mesh)
            .and_then(|mesh| self.meshes.get(mesh))
            .is_some_and(|mesh| mesh.colors.as_ref().is_some_and(|c| !c.is_empty()))
    }

    /// Resolve a texture URL against the scene directory.
    pub fn resolve(&self, url: impl AsRef<Path>) -> PathBuf {
        self.directory.join(url)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn total_triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn textured(name: &str, url: &str) -> Material {
        Material {
            texture_url: Some(url.to_string()),
            ..Material::new(name)
        }
    }

    #[test]
    fn test_identity_ignores_name_and_specular() {
        let a = textured("a", "wall_c.bmp");
        let mut b = textured("b", "wall_c.bmp");
        b.specular_color = Vec3::ZERO;
        b.shininess = 12.0;

        assert!(a.same_surface(&b));

        b.alpha = 0.5;
        assert!(!a.same_surface(&b));
    }

    #[test]
    fn test_add_material_appends_only_on_mismatch() {
        let mut scene = Scene::new("/captures", "output.wrl");

        assert_eq!(scene.add_material(textured("a", "one.bmp")), 0);
        assert_eq!(scene.add_material(textured("b", "two.bmp")), 1);
        assert_eq!(scene.add_material(textured("c", "one.bmp")), 0);

        assert_eq!(scene.material_count(), 2);
        assert_eq!(scene.materials[0].name, "a");
        assert_eq!(scene.materials[1].index, 1);
    }

    #[test]
    fn test_first_mesh_is_kept_for_shared_material() {
        let mut scene = Scene::new("/captures", "output.wrl");

        let mut plain = Mesh::new("plain");
        plain.points = vec![Vec3::ZERO; 3];
        let mut colored = Mesh::new("colored");
        colored.points = vec![Vec3::ZERO; 3];
        colored.colors = Some(vec![Vec4::ONE; 3]);

        scene.add_mesh(plain, Material::new("first"));
        scene.add_mesh(colored, Material::new("second"));

        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.materials[0].first_mesh, Some(0));
        assert_eq!(scene.meshes_using(0).count(), 2);
        assert!(!scene.material_uses_vertex_colors(0));
    }

    #[test]
    fn test_vertex_color_default_follows_first_mesh() {
        let mut scene = Scene::new("/captures", "output.wrl");
        let mut colored = Mesh::new("colored");
        colored.colors = Some(vec![Vec4::ONE; 3]);

        scene.add_mesh(colored, Material::new("vc"));

        assert!(scene.material_uses_vertex_colors(0));
        assert!(!scene.material_uses_vertex_colors(7));
    }

    #[test]
    fn test_resolve_and_counts() {
        let mut scene = Scene::new("/captures", "output.wrl");
        let mut mesh = Mesh::new("tri");
        mesh.points = vec![Vec3::ZERO; 6];
        scene.add_mesh(mesh, Material::default());

        assert_eq!(scene.resolve("tex.bmp"), PathBuf::from("/captures/tex.bmp"));
        assert_eq!(scene.source_path(), PathBuf::from("/captures/output.wrl"));
        assert_eq!(scene.total_triangle_count(), 2);
        assert_eq!(scene.total_vertex_count(), 6);
        assert!(scene.material_of(&scene.meshes[0]).is_some());
    }
}
