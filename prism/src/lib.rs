//! Bounding volume hierarchies over triangle soups, flattened into records
//! that a GPU traversal kernel can walk.
//!
//! ```
//! use glam::vec3;
//! use prism::Bvh;
//!
//! let vertices = [
//!     vec3(0.0, 0.0, 0.0),
//!     vec3(1.0, 0.0, 0.0),
//!     vec3(1.0, 1.0, 0.0),
//!     vec3(0.0, 1.0, 0.0),
//! ];
//!
//! let bvh = Bvh::build(&vertices, &[0, 1, 2, 0, 2, 3]).unwrap();
//! let nodes = bvh.serialize();
//!
//! assert_eq!(3, nodes.len());
//! assert_eq!(0, nodes[0].triangle_count);
//! ```

mod bvh;
mod error;
mod mesh;
mod scene;
mod utils;

pub use prism_gpu as gpu;

pub use self::bvh::*;
pub use self::error::*;
pub use self::mesh::*;
pub use self::scene::*;
