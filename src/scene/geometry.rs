//! Mesh geometry types and the primitive shapes the book is made of.

use glam::{Mat4, Vec3};

/// A vertex in the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
        }
    }
}

/// A triangle mesh, or a point cloud when `indices` is empty.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned box of `size` centred on `center`, four vertices per face
    /// so each face keeps a flat normal.
    pub fn cuboid(center: Vec3, size: Vec3) -> Self {
        let h = size / 2.0;
        // (normal, u axis, v axis) per face; u × v = normal keeps CCW winding outward.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Mesh::new();
        for (normal, u, v) in faces {
            let c = center + normal * h;
            let du = u * h;
            let dv = v * h;
            let corners = [
                (c - du - dv, [0.0, 0.0]),
                (c + du - dv, [1.0, 0.0]),
                (c + du + dv, [1.0, 1.0]),
                (c - du + dv, [0.0, 1.0]),
            ];
            let base = mesh.vertices.len() as u32;
            for (p, uv) in corners {
                mesh.add_vertex(Vertex::new(p.to_array(), normal.to_array(), uv));
            }
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }
        mesh
    }

    /// A `width × height` quad in the XY plane facing +Z, spanning
    /// `x ∈ [0, width]` so its left edge sits on the pivot.
    pub fn hinged_plane(width: f32, height: f32) -> Self {
        let mut mesh = Mesh::new();
        let hh = height / 2.0;
        let n = [0.0, 0.0, 1.0];
        let v0 = mesh.add_vertex(Vertex::new([0.0, -hh, 0.0], n, [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([width, -hh, 0.0], n, [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([width, hh, 0.0], n, [1.0, 1.0]));
        let v3 = mesh.add_vertex(Vertex::new([0.0, hh, 0.0], n, [0.0, 1.0]));
        mesh.add_quad(v0, v3, v2, v1);
        mesh
    }

    /// Vertices only, one per point.
    pub fn points(points: &[Vec3]) -> Self {
        Self {
            vertices: points
                .iter()
                .map(|p| Vertex::new(p.to_array(), [0.0, 1.0, 0.0], [0.0, 0.0]))
                .collect(),
            indices: Vec::new(),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a quad (two triangles) by vertex indices.
    /// Vertices are provided in order around the quad. Triangles are wound CCW for front-facing.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        // First triangle: 0, 2, 1
        self.add_triangle(i0, i2, i1);
        // Second triangle: 0, 3, 2
        self.add_triangle(i0, i3, i2);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_points(&self) -> bool {
        !self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for index in &other.indices {
            self.indices.push(index + offset);
        }
    }

    /// Translate all vertices by an offset.
    pub fn translate(&mut self, offset: Vec3) {
        for vertex in &mut self.vertices {
            vertex.position = (Vec3::from(vertex.position) + offset).to_array();
        }
    }

    /// Apply an affine transform to positions and normals.
    pub fn transform(&mut self, matrix: Mat4) {
        for vertex in &mut self.vertices {
            vertex.position = matrix.transform_point3(vertex.position.into()).to_array();
            vertex.normal = matrix
                .transform_vector3(vertex.normal.into())
                .normalize_or_zero()
                .to_array();
        }
    }

    /// A transformed copy.
    pub fn transformed(&self, matrix: Mat4) -> Mesh {
        let mut mesh = self.clone();
        mesh.transform(matrix);
        mesh
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = Vec3::from(self.vertices.first()?.position);
        let (min, max) = self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Vec3::from(v.position);
            (min.min(p), max.max(p))
        });
        Some((min.to_array(), max.to_array()))
    }

    /// Get positions as a flat array (for glTF export).
    pub fn positions_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.position).collect()
    }

    /// Get normals as a flat array (for glTF export).
    pub fn normals_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.normal).collect()
    }

    /// Get UVs as a flat array (for glTF export).
    pub fn uvs_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.uv).collect()
    }
}
