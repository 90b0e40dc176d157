//! End-to-end loading of capture files from disk.

use std::fs;
use std::path::PathBuf;

use capture_core::rip::RIP_SIGNATURE;
use capture_core::{load_scene, LoadError, ParseError, ParseOptions};
use glam::{Vec2, Vec3};
use proptest::prelude::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "capture_core_it_{}_{}",
        name,
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn push_u32s(out: &mut Vec<u8>, values: &[u32]) {
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

fn push_attribute(out: &mut Vec<u8>, name: &str, byte_offset: u32, count: u32) {
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    push_u32s(out, &[0, byte_offset, count * 4, count]);
    push_u32s(out, &vec![0; count as usize]);
}

/// One triangle, 8 floats per vertex: POSITION + NORMAL + TEXCOORD.
fn single_triangle_rip() -> Vec<u8> {
    let mut out = RIP_SIGNATURE.to_be_bytes().to_vec();
    // version, triangles, vertices, stride, textures, reserved, attributes
    push_u32s(&mut out, &[4, 1, 3, 32, 1, 0, 3]);
    push_attribute(&mut out, "POSITION", 0, 3);
    push_attribute(&mut out, "NORMAL", 12, 3);
    push_attribute(&mut out, "TEXCOORD", 24, 2);
    out.extend_from_slice(b"tex.png\0");
    push_u32s(&mut out, &[0, 1, 2]);

    let records: [[f32; 8]; 3] = [
        [1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        [4.0, 5.0, 6.0, 0.0, 0.0, 1.0, 1.0, 0.0],
        [7.0, 8.0, 9.0, 0.0, 0.0, 1.0, 0.0, 1.0],
    ];
    for value in records.iter().flatten() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

const TWO_SHAPES: &str = r#"#VRML V2.0 utf8

Shape {
  appearance DEF mat_a Appearance {
    material Material {
      diffuseColor 0.5 0.5 0.5
    }
    texture ImageTexture {
      url "floor_c.bmp"
      repeatS TRUE
    }
  }
  geometry DEF floor_a IndexedFaceSet {
    coord Coordinate {
      point [
        1.0 2.0 3.0,
        0.0 0.0 0.0,
        1.0 0.0 0.0,
      ]
    }
  }
}
Shape {
  appearance DEF mat_b Appearance {
    material Material {
      diffuseColor 0.5 0.5 0.5
      specularColor 0 0 0
    }
    texture ImageTexture {
      url "floor_c.bmp"
      repeatS TRUE
    }
  }
  geometry DEF floor_b IndexedFaceSet {
    coord Coordinate {
      point [
        0.0 0.0 1.0,
        1.0 0.0 1.0,
        0.0 1.0 1.0,
      ]
    }
    texCoord TextureCoordinate {
      point [
        0.0 0.0,
        1.0 0.0,
        0.0 1.0,
      ]
    }
  }
}
"#;

#[test]
fn loads_rip_scenario_from_disk() {
    let dir = scratch_dir("rip");
    fs::write(dir.join("Mesh_0000.rip"), single_triangle_rip()).unwrap();

    let scene = load_scene(&dir, "Mesh_0000.rip", &ParseOptions::default()).unwrap();

    assert_eq!(scene.mesh_count(), 1);
    let mesh = &scene.meshes[0];
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.points[0], Vec3::new(1.0, -3.0, 2.0));
    assert!(mesh.has_normals());
    assert!(mesh.has_texcoords());
    assert!(!mesh.has_colors());
    assert_eq!(mesh.texcoords.as_ref().unwrap()[2], Vec2::new(0.0, 1.0));
    assert_eq!(mesh.triangles(), vec![[2, 1, 0]]);
    assert_eq!(scene.texture_path(&scene.materials[0]), Some(dir.join("tex.png")));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn rip_with_bad_signature_is_unrecognized() {
    let dir = scratch_dir("badsig");
    let mut bytes = single_triangle_rip();
    bytes[..4].copy_from_slice(&0x1234_5678u32.to_be_bytes());
    fs::write(dir.join("broken.rip"), bytes).unwrap();

    let err = load_scene(&dir, "broken.rip", &ParseOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        LoadError::Parse(ParseError::SignatureMismatch { found: 0x1234_5678 })
    ));
    assert!(err.is_unrecognized());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn loads_wrl_and_folds_materials() {
    let dir = scratch_dir("wrl");
    fs::write(dir.join("output.wrl"), TWO_SHAPES).unwrap();

    let options = ParseOptions::default().with_debug(true);
    let scene = load_scene(&dir, "output.wrl", &options).unwrap();

    assert_eq!(scene.mesh_count(), 2);
    assert_eq!(scene.material_count(), 1);
    assert_eq!(scene.meshes[0].material, scene.meshes[1].material);
    assert_eq!(scene.meshes[0].points[0], Vec3::new(1.0, -3.0, 2.0));
    assert_eq!(scene.materials[0].name, "mat_a");
    assert!(!scene.material_uses_vertex_colors(0));
    assert_eq!(scene.total_triangle_count(), 2);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn empty_wrl_has_no_content() {
    let dir = scratch_dir("empty");
    fs::write(dir.join("empty.wrl"), "\n  \n").unwrap();

    let err = load_scene(&dir, "empty.wrl", &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NoContent(_)));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let dir = scratch_dir("missing");
    let err = load_scene(&dir, "absent.rip", &ParseOptions::default()).unwrap_err();

    assert!(matches!(err, LoadError::Io(_)));

    fs::remove_dir_all(dir).unwrap();
}

proptest! {
    #[test]
    fn wrl_points_follow_axis_remap(
        x in -1000.0f32..1000.0,
        y in -1000.0f32..1000.0,
        z in -1000.0f32..1000.0,
    ) {
        let src = format!(
            "Shape {{\ngeometry DEF g IndexedFaceSet {{\ncoord Coordinate {{\npoint [\n{} {} {},\n]\n}}\n}}\n}}\n",
            x, y, z
        );
        let shapes = capture_core::wrl::parse_wrl(&src).unwrap();
        prop_assert_eq!(shapes[0].mesh.points[0], Vec3::new(x, -z, y));
    }
}
