//! Records shared between Prism and the GPU traversal kernel.
//!
//! Every struct here is `#[repr(C)]` + `Pod`, so that it can be uploaded
//! as-is; field order and widths are part of the kernel's contract.

mod bvh_node;
mod material;
mod mesh_info;
mod triangle;

pub use self::bvh_node::*;
pub use self::material::*;
pub use self::mesh_info::*;
pub use self::triangle::*;
