//! RIP support: binary dumps of one captured GPU draw call.
//!
//! ## Layout
//!
//! A big-endian signature `0xDEC0ADDE`, then a little-endian body:
//!
//! - header: version, triangle count, vertex count, byte stride,
//!   texture count, a reserved word, attribute count
//! - vertex descriptor table (see [`VertexDescriptor`])
//! - texture names as zero-terminated strings, only the last one kept
//! - `triangle_count` faces of three `u32` indices
//! - `vertex_count` interleaved records of `byte_stride / 4` floats
//!
//! # Example
//!
//! ```ignore
//! use capture_core::{rip::load_rip, ParseOptions};
//!
//! let scene = load_rip("dumps", "Mesh_0000.rip", &ParseOptions::default())?;
//! println!("{} triangles", scene.total_triangle_count());
//! ```

mod descriptor;
mod loader;
mod model;

pub use descriptor::*;
pub use loader::*;
pub use model::*;
