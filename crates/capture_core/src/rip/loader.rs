//! Conversion of RIP dumps into the intermediate scene model.

use std::path::Path;

use crate::error::{LoadResult, ParseError, ParseResult};
use crate::mesh::{remap_axes, Mesh};
use crate::options::ParseOptions;
use crate::rip::model::RipModel;
use crate::scene::{Material, Scene};

/// Load a RIP file from `directory/filename`.
///
/// The file is read in full and closed before decoding starts.
pub fn load_rip(
    directory: impl AsRef<Path>,
    filename: &str,
    options: &ParseOptions,
) -> LoadResult<Scene> {
    let directory = directory.as_ref();
    let path = directory.join(filename);
    log::log!(options.trace_level(), "Reading RIP {}", path.display());

    let data = std::fs::read(&path)?;
    let scene = load_rip_from_bytes(&data, directory, filename, options)?;
    Ok(scene)
}

/// Decode a RIP file already held in memory (useful for testing).
pub fn load_rip_from_bytes(
    data: &[u8],
    directory: impl AsRef<Path>,
    filename: &str,
    options: &ParseOptions,
) -> ParseResult<Scene> {
    let model = RipModel::parse(data)?;
    let mut scene = Scene::new(directory.as_ref(), filename);

    let name = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let mesh = build_mesh(&model, name, options)?;

    let material = Material {
        texture_url: model.texture_name.clone(),
        ..Material::new(model.texture_name.as_deref().unwrap_or(name))
    };
    scene.add_mesh(mesh, material);

    log::info!(
        "Loaded {}: {} vertices, {} triangles",
        filename,
        model.vertex_count(),
        model.faces.len()
    );

    Ok(scene)
}

/// Gather every declared attribute of the model into one mesh.
pub fn build_mesh(model: &RipModel, name: &str, options: &ParseOptions) -> ParseResult<Mesh> {
    let vertex_count = model.vertex_count();

    for (face, indices) in model.faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ParseError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
    }

    let vertices = 0..vertex_count;
    let mut mesh = Mesh::new(name);
    mesh.points = vertices
        .clone()
        .filter_map(|i| model.vertex_position(i))
        .collect();

    if model.has_normals() {
        let normals = vertices.clone().filter_map(|i| model.vertex_normal(i));
        mesh.normals = Some(if options.remap_normals {
            normals.map(remap_axes).collect()
        } else {
            normals.collect()
        });
    }
    if model.has_texcoords() {
        mesh.texcoords = Some(
            vertices
                .clone()
                .filter_map(|i| model.vertex_texcoord(i))
                .collect(),
        );
    }
    if model.has_colors() {
        mesh.colors = Some(vertices.filter_map(|i| model.vertex_color(i)).collect());
    }

    mesh.faces = Some(model.faces.clone());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rip::model::tests::RipBuilder;
    use glam::Vec3;

    fn quad() -> RipBuilder {
        RipBuilder::new()
            .attribute("POSITION", 0, 3)
            .attribute("NORMAL", 12, 3)
            .texture("body_c.bmp")
            .face([0, 1, 2])
            .face([2, 1, 3])
            .vertex(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .vertex(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .vertex(&[0.0, 0.0, 1.0, 0.0, 1.0, 0.0])
            .vertex(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0])
    }

    #[test]
    fn test_scene_from_rip() {
        let options = ParseOptions::default();
        let scene = load_rip_from_bytes(&quad().build(), "/dumps", "Mesh_0001.rip", &options).unwrap();

        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.material_count(), 1);

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, "Mesh_0001");
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.points[2], Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(mesh.normals.as_ref().unwrap()[0], Vec3::Y);
        assert!(!mesh.has_texcoords());
        assert!(!mesh.has_colors());

        let material = scene.material_of(mesh).unwrap();
        assert_eq!(material.name, "body_c.bmp");
        assert_eq!(material.texture_url.as_deref(), Some("body_c.bmp"));
        assert_eq!(material.first_mesh, Some(0));
    }

    #[test]
    fn test_normal_remap_is_opt_in() {
        let options = ParseOptions::default().with_remap_normals(true);
        let scene = load_rip_from_bytes(&quad().build(), "/dumps", "Mesh_0001.rip", &options).unwrap();

        assert_eq!(scene.meshes[0].normals.as_ref().unwrap()[0], Vec3::Z);
    }

    #[test]
    fn test_untextured_material_takes_file_name() {
        let bytes = RipBuilder::new()
            .attribute("POSITION", 0, 3)
            .vertex(&[0.0, 0.0, 0.0])
            .build();
        let scene = load_rip_from_bytes(&bytes, "/dumps", "Mesh_0002.rip", &ParseOptions::default()).unwrap();

        assert_eq!(scene.materials[0].name, "Mesh_0002");
        assert!(!scene.materials[0].has_texture());
    }

    #[test]
    fn test_face_index_out_of_range() {
        let bytes = quad().face([0, 1, 4]).build();
        let err = load_rip_from_bytes(&bytes, "/dumps", "bad.rip", &ParseOptions::default()).unwrap_err();

        assert!(matches!(
            err,
            ParseError::FaceIndexOutOfRange {
                face: 2,
                index: 4,
                vertex_count: 4
            }
        ));
    }
}
