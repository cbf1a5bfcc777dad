/// Cube geometry: vertices, edges and faces derived from the unit cube
use nalgebra::Point3;

use crate::error::{Error, Result};

/// Number of corners of a cube
pub const VERTEX_COUNT: usize = 8;

/// An edge between two cube vertices, stored as indices with `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
        }
    }

    pub fn touches(&self, vertex: usize) -> bool {
        self.a == vertex || self.b == vertex
    }
}

/// Principal axis of a face normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// One of the six outward faces of a cube
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub axis: Axis,
    /// Either -1 or +1
    pub sign: i8,
    /// Vertex indices in cyclic order around the face
    pub corners: [usize; 4],
}

/// An axis-aligned cube centred on the origin with vertices at ±size
#[derive(Debug, Clone)]
pub struct Cube {
    size: f32,
    vertices: [Point3<f32>; VERTEX_COUNT],
    edges: Vec<Edge>,
    faces: [Face; 6],
}

impl Cube {
    /// Build a cube whose vertices sit at all sign combinations of `size`.
    ///
    /// Edges and faces are selected on the integer unit cube, then the
    /// positions are scaled, so float rounding can never change the topology.
    pub fn new(size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::InvalidCubeSize(size));
        }

        let unit = unit_vertices();
        let edges = unit_edges(&unit);
        let faces = unit_faces();
        let vertices = unit.map(|[x, y, z]| {
            Point3::new(x as f32 * size, y as f32 * size, z as f32 * size)
        });

        log::debug!(
            "built cube: size={} vertices={} edges={}",
            size,
            vertices.len(),
            edges.len()
        );

        Ok(Self {
            size,
            vertices,
            edges,
            faces,
        })
    }

    /// Half the edge length
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn vertices(&self) -> &[Point3<f32>; VERTEX_COUNT] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face; 6] {
        &self.faces
    }
}

/// Unit cube corners enumerated x-major: `index = 4*xi + 2*yi + zi`
fn unit_vertices() -> [[i32; 3]; VERTEX_COUNT] {
    let mut vertices = [[0; 3]; VERTEX_COUNT];
    let mut i = 0;
    for x in [-1, 1] {
        for y in [-1, 1] {
            for z in [-1, 1] {
                vertices[i] = [x, y, z];
                i += 1;
            }
        }
    }
    vertices
}

fn manhattan(a: &[i32; 3], b: &[i32; 3]) -> i32 {
    a.iter().zip(b).map(|(p, q)| (p - q).abs()).sum()
}

/// Pairs at Manhattan distance 2 are the cube edges; face diagonals sit at 4
/// and space diagonals at 6.
fn unit_edges(unit: &[[i32; 3]; VERTEX_COUNT]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(12);
    for i in 0..unit.len() {
        for j in i + 1..unit.len() {
            if manhattan(&unit[i], &unit[j]) == 2 {
                edges.push(Edge::new(i, j));
            }
        }
    }
    edges
}

fn unit_index(p: [i32; 3]) -> usize {
    let bit = |c: i32| usize::from(c > 0);
    4 * bit(p[0]) + 2 * bit(p[1]) + bit(p[2])
}

fn unit_faces() -> [Face; 6] {
    let mut faces = [Face {
        axis: Axis::X,
        sign: -1,
        corners: [0; 4],
    }; 6];

    let mut n = 0;
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        let a = axis.index();
        let (u, v) = ((a + 1) % 3, (a + 2) % 3);
        for sign in [-1i8, 1] {
            // Walk the square spanned by the other two axes
            let ring = [(-1, -1), (-1, 1), (1, 1), (1, -1)];
            let corners = ring.map(|(cu, cv)| {
                let mut p = [0; 3];
                p[a] = i32::from(sign);
                p[u] = cu;
                p[v] = cv;
                unit_index(p)
            });
            faces[n] = Face {
                axis,
                sign,
                corners,
            };
            n += 1;
        }
    }
    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_twelve_unit_edges() {
        let unit = unit_vertices();
        let cube = Cube::new(1.0).unwrap();
        assert_eq!(cube.edges().len(), 12);
        for edge in cube.edges() {
            assert_eq!(manhattan(&unit[edge.a], &unit[edge.b]), 2);
        }
    }

    #[test]
    fn test_every_vertex_has_three_edges() {
        let cube = Cube::new(3.5).unwrap();
        for v in 0..VERTEX_COUNT {
            let degree = cube.edges().iter().filter(|e| e.touches(v)).count();
            assert_eq!(degree, 3, "vertex {}", v);
        }
    }

    #[test]
    fn test_unit_index_matches_enumeration() {
        for (i, p) in unit_vertices().iter().enumerate() {
            assert_eq!(unit_index(*p), i);
        }
    }

    #[test]
    fn test_vertices_are_scaled_after_selection() {
        let cube = Cube::new(100.0).unwrap();
        for p in cube.vertices() {
            assert_eq!(p.x.abs(), 100.0);
            assert_eq!(p.y.abs(), 100.0);
            assert_eq!(p.z.abs(), 100.0);
        }
        // x-major enumeration
        assert_eq!(cube.vertices()[0], Point3::new(-100.0, -100.0, -100.0));
        assert_eq!(cube.vertices()[3], Point3::new(-100.0, 100.0, 100.0));
        assert_eq!(cube.vertices()[7], Point3::new(100.0, 100.0, 100.0));
    }

    #[test]
    fn test_edge_lengths_survive_awkward_sizes() {
        let size = 0.1f32 + 0.2f32;
        let cube = Cube::new(size).unwrap();
        assert_eq!(cube.edges().len(), 12);
        for edge in cube.edges() {
            let d = cube.vertices()[edge.a] - cube.vertices()[edge.b];
            assert!((d.norm() - 2.0 * size).abs() < 1e-6);
        }
    }

    #[test]
    fn test_faces_are_cyclic_quads() {
        let cube = Cube::new(1.0).unwrap();
        for face in cube.faces() {
            for i in 0..4 {
                let edge = Edge::new(face.corners[i], face.corners[(i + 1) % 4]);
                assert!(cube.edges().contains(&edge), "{:?} not an edge", edge);
            }
            let a = face.axis.index();
            for &c in &face.corners {
                assert_eq!(cube.vertices()[c][a], face.sign as f32);
            }
        }
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        assert_eq!(Cube::new(0.0).unwrap_err(), Error::InvalidCubeSize(0.0));
        assert!(Cube::new(-2.0).is_err());
        assert!(Cube::new(f32::NAN).is_err());
        assert!(Cube::new(f32::INFINITY).is_err());
    }
}
