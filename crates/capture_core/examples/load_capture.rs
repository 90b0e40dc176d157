//! Example: Load and inspect a RIP or WRL capture.
//!
//! Run with: cargo run --example load_capture -- captures/output.wrl

use std::env;
use std::path::Path;

use capture_core::{load_scene, ParseOptions};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_capture <path-to-rip-or-wrl>");
        println!("\nExamples:");
        println!("  cargo run --example load_capture -- dumps/Mesh_0000.rip");
        println!("  cargo run --example load_capture -- captures/output.wrl");
        return;
    }

    let path = Path::new(&args[1]);
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("Loading capture: {}", path.display());

    match load_scene(directory, &filename, &ParseOptions::default()) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.filename);
            println!("Meshes: {}", scene.mesh_count());
            println!("Materials: {}", scene.material_count());
            println!("Total triangles: {}", scene.total_triangle_count());

            println!("\n--- Materials ---");
            for material in &scene.materials {
                println!(
                    "  [{}] {} - diffuse ({:.2}, {:.2}, {:.2}), alpha {:.2}",
                    material.index,
                    material.name,
                    material.diffuse_color.x,
                    material.diffuse_color.y,
                    material.diffuse_color.z,
                    material.alpha
                );
                if let Some(texture) = scene.texture_path(material) {
                    println!("       Texture: {}", texture.display());
                }
            }

            println!("\n--- Meshes ---");
            for mesh in &scene.meshes {
                println!(
                    "  {} - {} vertices, {} triangles, material {}",
                    mesh.name,
                    mesh.vertex_count(),
                    mesh.triangle_count(),
                    mesh.material
                );
                println!(
                    "       Normals: {}  UVs: {}  Colors: {}",
                    mesh.has_normals(),
                    mesh.has_texcoords(),
                    mesh.has_colors()
                );
            }
        }
        Err(e) => {
            eprintln!("Error loading capture: {}", e);
        }
    }
}
