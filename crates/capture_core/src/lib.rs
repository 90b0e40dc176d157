//! Capture Core - decoders for captured 3D scene dumps.
//!
//! This crate provides:
//!
//! - **RIP support**: binary mesh dumps of single GPU draw calls
//! - **WRL support**: the VRML subset written by N64 capture plugins
//! - **Scene model**: host-agnostic meshes plus deduplicated materials
//! - **Scene sinks**: the trait hosts implement to consume a scene
//!
//! # Example
//!
//! ```ignore
//! use capture_core::{load_scene, ParseOptions};
//!
//! let scene = load_scene("captures", "output.wrl", &ParseOptions::default())?;
//! println!("Loaded {} meshes, {} materials",
//!     scene.mesh_count(),
//!     scene.material_count());
//! ```

pub mod error;
pub mod mesh;
pub mod options;
pub mod reader;
pub mod rip;
pub mod scene;
pub mod sink;
pub mod texture;
pub mod wrl;

use std::path::Path;

// Re-export commonly used types
pub use error::{LoadError, LoadResult, ParseError, ParseResult};
pub use mesh::Mesh;
pub use options::ParseOptions;
pub use scene::{Material, Scene};
pub use sink::SceneSink;
pub use rip::load_rip;
pub use wrl::load_wrl;

/// Capture formats this crate can decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureFormat {
    Rip,
    Wrl,
}

impl CaptureFormat {
    /// Pick a format from a file name's extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("rip") {
            Some(CaptureFormat::Rip)
        } else if extension.eq_ignore_ascii_case("wrl") {
            Some(CaptureFormat::Wrl)
        } else {
            None
        }
    }
}

/// Load `directory/filename` with the decoder matching its extension.
pub fn load_scene(
    directory: impl AsRef<Path>,
    filename: &str,
    options: &ParseOptions,
) -> LoadResult<Scene> {
    match CaptureFormat::from_filename(filename) {
        Some(CaptureFormat::Rip) => load_rip(directory, filename, options),
        Some(CaptureFormat::Wrl) => load_wrl(directory, filename, options),
        None => Err(LoadError::UnsupportedFormat(
            Path::new(filename)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )),
    }
}
