// Quick debug tool to inspect the vertex layout of a RIP dump
// Run with: cargo run --release --bin dump_rip_layout -- <path_to.rip> [records]

use capture_core::rip::RipModel;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <path_to.rip> [records]", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    let shown: usize = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(4);
    println!("Loading RIP: {}", path);

    let data = std::fs::read(path)?;
    let model = RipModel::parse(&data)?;
    let header = &model.header;

    println!("\nVersion: {}", header.version);
    println!("Triangles: {}", header.triangle_count);
    println!("Vertices: {}", header.vertex_count);
    println!(
        "Stride: {} bytes ({} floats)",
        header.byte_stride,
        model.float_stride()
    );
    println!("Texture: {}", model.texture_name.as_deref().unwrap_or("<none>"));

    println!("\n=== Descriptor ({} entries) ===", model.descriptor.attributes.len());
    for entry in &model.descriptor.attributes {
        let known = if entry.semantic().is_some() { "" } else { "  (ignored)" };
        println!(
            "  {:<14} offset {:>3}  elements {}{}",
            entry.name, entry.offset, entry.element_count, known
        );
    }
    if model.descriptor.element_length != model.float_stride() {
        println!(
            "  WARNING: attributes cover {} floats, stride is {}",
            model.descriptor.element_length,
            model.float_stride()
        );
    }

    println!("\n=== First {} records ===", shown.min(model.vertex_count()));
    for i in 0..shown.min(model.vertex_count()) {
        if let Some(record) = model.raw_vertex(i) {
            println!("  [{}] raw {:?}", i, record);
        }
        if let Some(p) = model.vertex_position(i) {
            println!("       position ({:.4}, {:.4}, {:.4})", p.x, p.y, p.z);
        }
        if let Some(n) = model.vertex_normal(i) {
            println!("       normal   ({:.4}, {:.4}, {:.4})", n.x, n.y, n.z);
        }
        if let Some(uv) = model.vertex_texcoord(i) {
            println!("       uv       ({:.4}, {:.4})", uv.x, uv.y);
        }
        if let Some(c) = model.vertex_color(i) {
            println!("       color    ({:.3}, {:.3}, {:.3}, {:.3})", c.x, c.y, c.z, c.w);
        }
    }

    let vertex_count = model.vertex_count() as u32;
    let bad_faces = model
        .faces
        .iter()
        .filter(|face| face.iter().any(|&i| i >= vertex_count))
        .count();
    println!("\nFaces referencing missing vertices: {}", bad_faces);

    Ok(())
}
