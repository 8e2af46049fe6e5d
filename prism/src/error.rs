use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The index buffer doesn't describe whole triangles.
    #[error("index buffer has {len} entries, which is not a multiple of three")]
    IndicesNotTriangles { len: usize },

    #[error(
        "triangle {triangle} refers to vertex {vertex}, but there are only \
         {vertex_count} vertices"
    )]
    VertexOutOfBounds {
        triangle: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// There are more triangles than node records can address.
    #[error("got {count} triangles, but at most {max} are supported")]
    TooManyTriangles { count: usize, max: usize },

    /// The combined node buffer of a scene outgrew `u32` ids.
    #[error("got {count} nodes, but at most {max} are supported")]
    TooManyNodes { count: usize, max: usize },

    #[error(
        "SAH asked for {samples} planes per axis, but at most {max} are \
         supported"
    )]
    TooManySamples { samples: u32, max: u32 },

    #[error("mesh has {normals} normals for {positions} positions")]
    NormalsMismatch { positions: usize, normals: usize },

    #[error("mesh {mesh} is invalid: {source}")]
    Mesh {
        mesh: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("mesh {mesh} does not exist")]
    MeshNotFound { mesh: usize },

    #[error("material {material} does not exist (got {count} materials)")]
    MaterialNotFound { material: u32, count: usize },

    #[error("hierarchy is malformed at node {node}: {reason}")]
    InvariantViolated { node: u32, reason: String },
}

impl Error {
    pub(crate) fn in_mesh(self, mesh: usize) -> Self {
        Self::Mesh {
            mesh,
            source: Box::new(self),
        }
    }

    pub(crate) fn violation(node: u32, reason: impl Into<String>) -> Self {
        Self::InvariantViolated {
            node,
            reason: reason.into(),
        }
    }
}
