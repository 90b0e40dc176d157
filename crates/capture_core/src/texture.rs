//! Texture path resolution for captured materials.
//!
//! Pixel data is never decoded here. Captures reference textures by a path
//! relative to the capture directory; some producers also write a separate
//! alpha mask next to the color texture, named by replacing `_c.` with `_a.`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::scene::{Material, Scene};

/// Size of the BMP file and info headers (14 + 40 bytes).
const BMP_HEADER_LEN: usize = 0x36;

/// Paths a sink needs to wire up one material's textures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureSet {
    /// Diffuse texture, present when the material references one and it exists on disk
    pub color: Option<PathBuf>,

    /// Alpha mask sibling, present when it exists on disk and is not blank
    pub alpha: Option<PathBuf>,
}

/// Name of the alpha mask that pairs with a color texture, if the name follows the `_c.` convention.
pub fn alpha_sibling_name(url: &str) -> Option<String> {
    url.contains("_c.").then(|| url.replace("_c.", "_a."))
}

/// Whether an uncompressed BMP carries any non-zero byte after its header.
///
/// An all-black mask means the producer wrote no usable transparency.
pub fn bmp_has_transparency(path: impl AsRef<Path>) -> io::Result<bool> {
    let bytes = fs::read(path)?;
    Ok(bytes.iter().skip(BMP_HEADER_LEN).any(|&b| b > 0))
}

impl Scene {
    /// Absolute path of the material's diffuse texture, without checking existence.
    pub fn texture_path(&self, material: &Material) -> Option<PathBuf> {
        material.texture_url.as_ref().map(|url| self.resolve(url))
    }

    /// Name of the material's alpha mask relative to the capture directory.
    ///
    /// Only reported when the mask exists and carries some transparency.
    pub fn alpha_texture_url(&self, material: &Material) -> Option<String> {
        let name = alpha_sibling_name(material.texture_url.as_deref()?)?;
        let path = self.resolve(&name);
        if !path.is_file() {
            return None;
        }

        match bmp_has_transparency(&path) {
            Ok(true) => Some(name),
            Ok(false) => {
                log::debug!("Alpha mask {} is blank, ignoring", path.display());
                None
            }
            Err(e) => {
                log::warn!("Failed to read alpha mask {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Absolute path of the material's usable alpha mask.
    pub fn alpha_texture_path(&self, material: &Material) -> Option<PathBuf> {
        self.alpha_texture_url(material).map(|name| self.resolve(name))
    }

    /// Resolve every texture path of a material, dropping the ones missing on disk.
    pub fn texture_set(&self, material: &Material) -> TextureSet {
        let color = self.texture_path(material).filter(|path| {
            let found = path.is_file();
            if !found {
                log::warn!(
                    "Texture for material '{}' not found: {}",
                    material.name,
                    path.display()
                );
            }
            found
        });

        TextureSet {
            color,
            alpha: self.alpha_texture_path(material),
        }
    }
}
