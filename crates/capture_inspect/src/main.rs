use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use capture_core::{load_scene, LoadError, ParseOptions, Scene};
use rayon::prelude::*;

mod obj_export;

use obj_export::ObjWriter;

/// Command line settings
#[derive(Debug, Default)]
struct Args {
    files: Vec<PathBuf>,
    json: bool,
    obj_dir: Option<PathBuf>,
    options: ParseOptions,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--debug" => parsed.options = parsed.options.with_debug(true),
                "--remap-normals" => parsed.options = parsed.options.with_remap_normals(true),
                "--obj" => {
                    let dir = args.next().context("--obj needs an output directory")?;
                    parsed.obj_dir = Some(PathBuf::from(dir));
                }
                flag if flag.starts_with("--") => bail!("Unknown flag {}", flag),
                file => parsed.files.push(PathBuf::from(file)),
            }
        }

        if parsed.files.is_empty() {
            bail!("No capture files given");
        }
        Ok(parsed)
    }
}

fn print_usage() {
    println!("Usage: capture_inspect [--json] [--obj <dir>] [--debug] [--remap-normals] <file.rip|file.wrl>...");
}

/// Split a path into the (directory, filename) pair the loaders take.
fn split_path(path: &Path) -> Result<(PathBuf, String)> {
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((directory.to_path_buf(), filename.to_string()))
}

fn load(path: &Path, options: &ParseOptions) -> Result<Scene> {
    let (directory, filename) = split_path(path)?;
    Ok(load_scene(directory, &filename, options)?)
}

/// Files that are not captures at all are skipped rather than failed.
fn is_unrecognized(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<LoadError>()
        .is_some_and(LoadError::is_unrecognized)
}

fn print_summary(scene: &Scene) {
    println!("=== {} ===", scene.source_path().display());
    println!(
        "  {} meshes, {} materials, {} vertices, {} triangles",
        scene.mesh_count(),
        scene.material_count(),
        scene.total_vertex_count(),
        scene.total_triangle_count()
    );
    for material in &scene.materials {
        let textures = scene.texture_set(material);
        println!(
            "  material [{}] {} alpha {:.2}{}{}",
            material.index,
            material.name,
            material.alpha,
            textures
                .color
                .map(|p| format!(", texture {}", p.display()))
                .unwrap_or_default(),
            textures
                .alpha
                .map(|p| format!(", alpha mask {}", p.display()))
                .unwrap_or_default(),
        );
    }
    for mesh in &scene.meshes {
        println!(
            "  mesh {} - {} vertices, {} triangles, material {}",
            mesh.name,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.material
        );
    }
}

fn export_obj(scene: &Scene, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let stem = Path::new(&scene.filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    let obj_path = out_dir.join(format!("{}.obj", stem));
    let mtl_name = format!("{}.mtl", stem);

    let obj = File::create(&obj_path)
        .with_context(|| format!("Failed to create {}", obj_path.display()))?;
    let mtl = File::create(out_dir.join(&mtl_name))
        .with_context(|| format!("Failed to create {}", mtl_name))?;

    let mut writer = ObjWriter::new(BufWriter::new(obj), BufWriter::new(mtl), mtl_name);
    scene
        .emit(&mut writer)
        .with_context(|| format!("Failed to write {}", obj_path.display()))?;
    Ok(obj_path)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    let time_start = Instant::now();

    // Files share no state, so they decode independently.
    let results: Vec<(PathBuf, Result<Scene>)> = args
        .files
        .par_iter()
        .map(|path| (path.clone(), load(path, &args.options)))
        .collect();

    let mut failures = 0;
    for (path, result) in results {
        let scene = match result {
            Ok(scene) => scene,
            Err(e) if is_unrecognized(&e) => {
                log::warn!("Skipping {}: {:#}", path.display(), e);
                failures += 1;
                continue;
            }
            Err(e) => {
                log::error!("Failed to load {}: {:#}", path.display(), e);
                failures += 1;
                continue;
            }
        };

        print_summary(&scene);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }

        if let Some(out_dir) = &args.obj_dir {
            match export_obj(&scene, out_dir) {
                Ok(written) => log::info!("Wrote {}", written.display()),
                Err(e) => {
                    log::error!("{:#}", e);
                    failures += 1;
                }
            }
        }
    }

    log::info!(
        "Processed {} files ({} failed) in {:.4} seconds",
        args.files.len(),
        failures,
        time_start.elapsed().as_secs_f64()
    );

    if failures == args.files.len() {
        bail!("No capture could be processed");
    }
    Ok(())
}
