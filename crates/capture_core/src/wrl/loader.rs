//! Conversion of WRL dumps into the intermediate scene model.

use std::path::Path;

use crate::error::{LoadError, LoadResult, ParseResult};
use crate::options::ParseOptions;
use crate::scene::Scene;
use crate::wrl::parser::WrlParser;

/// Load a WRL file from `directory/filename`.
pub fn load_wrl(
    directory: impl AsRef<Path>,
    filename: &str,
    options: &ParseOptions,
) -> LoadResult<Scene> {
    let directory = directory.as_ref();
    let path = directory.join(filename);
    log::log!(options.trace_level(), "Reading WRL {}", path.display());

    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Err(LoadError::NoContent(path));
    }

    let scene = load_wrl_from_str(&content, directory, filename, options)?;
    Ok(scene)
}

/// Load WRL from a string (useful for testing).
pub fn load_wrl_from_str(
    content: &str,
    directory: impl AsRef<Path>,
    filename: &str,
    options: &ParseOptions,
) -> ParseResult<Scene> {
    let shapes = WrlParser::new(content).parse()?;
    let mut scene = Scene::new(directory.as_ref(), filename);

    for shape in shapes {
        if let Some(url) = &shape.material.texture_url {
            log::log!(
                options.trace_level(),
                "Material '{}' texture {}",
                shape.material.name,
                scene.resolve(url).display()
            );
        }
        scene.add_mesh(shape.mesh, shape.material);
    }

    log::info!(
        "Loaded {}: {} meshes, {} unique materials",
        filename,
        scene.mesh_count(),
        scene.material_count()
    );

    Ok(scene)
}
