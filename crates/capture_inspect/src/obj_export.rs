//! Wavefront OBJ/MTL writer implementing [`SceneSink`].
//!
//! Positions are written as decoded (Z-up). Vertex colors use the common
//! `v x y z r g b` extension.

use std::io::{self, Write};

use capture_core::mesh::Mesh;
use capture_core::scene::{Material, Scene};
use capture_core::SceneSink;

/// Writes one OBJ file plus its material library.
pub struct ObjWriter<W: Write> {
    obj: W,
    mtl: W,
    mtl_name: String,
    /// Offsets of the next `v`/`vt`/`vn` (OBJ indices are global and 1-based)
    next_vertex: usize,
    next_texcoord: usize,
    next_normal: usize,
}

impl<W: Write> ObjWriter<W> {
    pub fn new(obj: W, mtl: W, mtl_name: impl Into<String>) -> Self {
        Self {
            obj,
            mtl,
            mtl_name: mtl_name.into(),
            next_vertex: 1,
            next_texcoord: 1,
            next_normal: 1,
        }
    }

    pub fn into_inner(self) -> (W, W) {
        (self.obj, self.mtl)
    }
}

/// Unique material name: captures may reuse names for different surfaces.
fn material_name(material: &Material) -> String {
    let name: String = material
        .name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}_{}", name, material.index)
}

impl<W: Write> SceneSink for ObjWriter<W> {
    type Error = io::Error;

    fn material(&mut self, scene: &Scene, material: &Material) -> io::Result<()> {
        if material.index == 0 {
            writeln!(self.obj, "# {}", scene.filename)?;
            writeln!(self.obj, "mtllib {}", self.mtl_name)?;
        }

        let kd = material.diffuse_color;
        let ka = kd * material.ambient_intensity;
        let ke = material.emissive_color;
        let ks = material.specular_color;

        writeln!(self.mtl, "newmtl {}", material_name(material))?;
        writeln!(self.mtl, "Ka {} {} {}", ka.x, ka.y, ka.z)?;
        writeln!(self.mtl, "Kd {} {} {}", kd.x, kd.y, kd.z)?;
        writeln!(self.mtl, "Ks {} {} {}", ks.x, ks.y, ks.z)?;
        if material.is_emissive() {
            writeln!(self.mtl, "Ke {} {} {}", ke.x, ke.y, ke.z)?;
        }
        if material.shininess > 0.0 {
            writeln!(self.mtl, "Ns {}", material.shininess)?;
        }
        writeln!(self.mtl, "d {}", material.alpha)?;

        if let Some(url) = &material.texture_url {
            let clamp = if material.texture_repeat { "" } else { "-clamp on " };
            writeln!(self.mtl, "map_Kd {}{}", clamp, url)?;
            if let Some(alpha) = scene.alpha_texture_url(material) {
                writeln!(self.mtl, "map_d {}{}", clamp, alpha)?;
            }
        }
        writeln!(self.mtl)
    }

    fn mesh(&mut self, scene: &Scene, mesh: &Mesh) -> io::Result<()> {
        writeln!(self.obj, "o {}", mesh.name)?;
        if let Some(material) = scene.material_of(mesh) {
            writeln!(self.obj, "usemtl {}", material_name(material))?;
        }

        let colors = mesh.colors.as_deref();
        for (i, p) in mesh.points.iter().enumerate() {
            match colors.and_then(|c| c.get(i)) {
                Some(c) => writeln!(self.obj, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z)?,
                None => writeln!(self.obj, "v {} {} {}", p.x, p.y, p.z)?,
            }
        }
        let texcoords = mesh.texcoords.as_deref().unwrap_or_default();
        for uv in texcoords {
            writeln!(self.obj, "vt {} {}", uv.x, uv.y)?;
        }
        let normals = mesh.normals.as_deref().unwrap_or_default();
        for n in normals {
            writeln!(self.obj, "vn {} {} {}", n.x, n.y, n.z)?;
        }

        let has_uv = texcoords.len() == mesh.points.len();
        let has_normal = normals.len() == mesh.points.len();
        for triangle in mesh.triangles() {
            write!(self.obj, "f")?;
            for i in triangle {
                let v = self.next_vertex + i;
                match (has_uv, has_normal) {
                    (true, true) => {
                        write!(self.obj, " {}/{}/{}", v, self.next_texcoord + i, self.next_normal + i)?
                    }
                    (true, false) => write!(self.obj, " {}/{}", v, self.next_texcoord + i)?,
                    (false, true) => write!(self.obj, " {}//{}", v, self.next_normal + i)?,
                    (false, false) => write!(self.obj, " {}", v)?,
                }
            }
            writeln!(self.obj)?;
        }

        self.next_vertex += mesh.points.len();
        self.next_texcoord += texcoords.len();
        self.next_normal += normals.len();
        Ok(())
    }

    fn finish(&mut self, _scene: &Scene) -> io::Result<()> {
        self.obj.flush()?;
        self.mtl.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture_core::wrl::load_wrl_from_str;
    use capture_core::ParseOptions;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// BMP header length; mask pixels start after it.
    const BMP_HEADER: usize = 0x36;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("capture_inspect_obj_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const SRC: &str = r#"
Shape {
  appearance DEF stone Appearance {
    material Material {
      diffuseColor 1 0.5 0
    }
    texture ImageTexture {
      url "stone_c.bmp"
      repeatS FALSE
    }
  }
  geometry DEF rock IndexedFaceSet {
    coord Coordinate {
      point [
        0 0 0,
        1 0 0,
        0 0 1,
      ]
    }
    texCoord TextureCoordinate {
      point [
        0 0,
        1 0,
        0 1,
      ]
    }
  }
}
"#;

    fn export(src: &str) -> (String, String) {
        export_from(src, Path::new("/captures"))
    }

    fn export_from(src: &str, dir: &Path) -> (String, String) {
        let scene = load_wrl_from_str(src, dir, "output.wrl", &ParseOptions::default()).unwrap();
        let mut writer = ObjWriter::new(Vec::new(), Vec::new(), "output.mtl");
        scene.emit(&mut writer).unwrap();
        let (obj, mtl) = writer.into_inner();
        (String::from_utf8(obj).unwrap(), String::from_utf8(mtl).unwrap())
    }

    #[test]
    fn test_writes_reversed_faces_with_uvs() {
        let (obj, _) = export(SRC);

        assert!(obj.contains("mtllib output.mtl"));
        assert!(obj.contains("o rock"));
        assert!(obj.contains("usemtl stone_0"));
        assert!(obj.contains("v 0 -1 0"));
        assert!(obj.contains("f 3/3 2/2 1/1"));
    }

    #[test]
    fn test_writes_material_library() {
        let (_, mtl) = export(SRC);

        assert!(mtl.contains("newmtl stone_0"));
        assert!(mtl.contains("Kd 1 0.5 0"));
        assert!(mtl.contains("d 1"));
        assert!(mtl.contains("map_Kd -clamp on stone_c.bmp"));
        assert!(!mtl.contains("Ke "));
    }

    #[test]
    fn test_indices_continue_across_meshes() {
        let (obj, _) = export(&format!("{}{}", SRC, SRC));

        assert!(obj.contains("f 6/6 5/5 4/4"));
        assert_eq!(obj.matches("usemtl stone_0").count(), 2);
    }

    #[test]
    fn test_blank_alpha_mask_writes_no_map_d() {
        let dir = scratch_dir("blank");
        fs::write(dir.join("stone_a.bmp"), vec![0u8; BMP_HEADER + 12]).unwrap();

        let (_, mtl) = export_from(SRC, &dir);
        assert!(mtl.contains("map_Kd -clamp on stone_c.bmp"));
        assert!(!mtl.contains("map_d"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_alpha_mask_written_relative_like_map_kd() {
        let dir = scratch_dir("mask");
        let mut mask = vec![0u8; BMP_HEADER];
        mask.extend_from_slice(&[0xFF, 0x00, 0x80]);
        fs::write(dir.join("stone_a.bmp"), &mask).unwrap();

        let (_, mtl) = export_from(SRC, &dir);
        assert!(mtl.contains("map_d -clamp on stone_a.bmp\n"));

        fs::remove_dir_all(dir).unwrap();
    }
}
