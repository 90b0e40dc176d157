//! WRL support: the VRML subset written by N64 capture plugins.
//!
//! Only the constructs that plugin emits are understood: top-level `Shape`
//! blocks with one appearance (material + image texture) and one face set
//! of unindexed triangles. Any other node is skipped by brace depth.
//!
//! # Example
//!
//! ```ignore
//! use capture_core::{wrl::load_wrl, ParseOptions};
//!
//! let scene = load_wrl("captures", "output.wrl", &ParseOptions::default())?;
//! for mesh in &scene.meshes {
//!     println!("{}: {} triangles", mesh.name, mesh.triangle_count());
//! }
//! ```

mod loader;
mod parser;
mod tokenizer;

pub use loader::*;
pub use parser::*;
pub use tokenizer::{Line, LineCursor};
