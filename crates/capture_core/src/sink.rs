//! Consumers of decoded scenes.
//!
//! A host (authoring tool, exporter, viewer) implements [`SceneSink`] and
//! receives every unique material first, then every mesh. Meshes refer to
//! materials by the index passed to [`SceneSink::material`].

use crate::mesh::Mesh;
use crate::scene::{Material, Scene};

/// Receives the contents of a [`Scene`].
pub trait SceneSink {
    type Error;

    /// Called once per unique material, in index order.
    fn material(&mut self, scene: &Scene, material: &Material) -> Result<(), Self::Error>;

    /// Called once per mesh, in file order, after all materials.
    ///
    /// Faces should be built from [`Mesh::triangles`], which already
    /// applies the winding correction.
    fn mesh(&mut self, scene: &Scene, mesh: &Mesh) -> Result<(), Self::Error>;

    /// Called after the last mesh.
    fn finish(&mut self, _scene: &Scene) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Scene {
    /// Feed this scene to a sink, stopping at the first error.
    pub fn emit<S: SceneSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        for material in &self.materials {
            sink.material(self, material)?;
        }
        for mesh in &self.meshes {
            sink.mesh(self, mesh)?;
        }
        sink.finish(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        fail_on_mesh: Option<String>,
    }

    impl SceneSink for Recorder {
        type Error = String;

        fn material(&mut self, _scene: &Scene, material: &Material) -> Result<(), String> {
            self.events.push(format!("material {}", material.index));
            Ok(())
        }

        fn mesh(&mut self, scene: &Scene, mesh: &Mesh) -> Result<(), String> {
            if self.fail_on_mesh.as_deref() == Some(mesh.name.as_str()) {
                return Err(format!("refused {}", mesh.name));
            }
            let material = scene.material_of(mesh).map_or("?", |m| m.name.as_str());
            self.events.push(format!("mesh {} -> {}", mesh.name, material));
            Ok(())
        }

        fn finish(&mut self, _scene: &Scene) -> Result<(), String> {
            self.events.push("finish".to_string());
            Ok(())
        }
    }

    fn two_mesh_scene() -> Scene {
        let mut scene = Scene::new("/captures", "output.wrl");
        let mut red = Material::new("red");
        red.diffuse_color = Vec3::X;

        scene.add_mesh(Mesh::new("a"), Material::new("white"));
        scene.add_mesh(Mesh::new("b"), red);
        scene
    }

    #[test]
    fn test_emit_order() {
        let scene = two_mesh_scene();
        let mut sink = Recorder::default();
        scene.emit(&mut sink).unwrap();

        assert_eq!(
            sink.events,
            vec![
                "material 0",
                "material 1",
                "mesh a -> white",
                "mesh b -> red",
                "finish"
            ]
        );
    }

    #[test]
    fn test_emit_stops_on_error() {
        let scene = two_mesh_scene();
        let mut sink = Recorder {
            fail_on_mesh: Some("a".to_string()),
            ..Default::default()
        };

        assert_eq!(scene.emit(&mut sink), Err("refused a".to_string()));
        assert!(!sink.events.contains(&"finish".to_string()));
    }
}
