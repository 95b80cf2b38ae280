//! Primitive topologies accepted by the clipper

/// Defines how the incoming vertex stream is grouped into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Individual points
    Points,
    /// Lines between two vertices
    Lines,
    /// Triangles between three vertices
    Triangles,
}

impl Default for PrimitiveType {
    fn default() -> PrimitiveType { PrimitiveType::Triangles }
}

impl PrimitiveType {
    /// Gets the number of vertices for the given primitive type
    #[inline(always)]
    pub fn num_vertices(self) -> usize {
        match self {
            PrimitiveType::Points => 1,
            PrimitiveType::Lines => 2,
            PrimitiveType::Triangles => 3,
        }
    }
}
