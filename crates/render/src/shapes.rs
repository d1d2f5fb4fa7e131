use bytemuck::{Pod, Zeroable};
use kedarium_assets::{OBJ_VERTEX_FLOATS, ObjMesh};
use kedarium_math::{Vec3, normalize};

/// Normal component for the shared corner normals of boxes: `1 / sqrt(3)`.
const CUBE_NORMAL_FACTOR: f32 = 0.57735;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Interleaved vertex of a solid, matching the `SOLID` vertex layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SolidVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl SolidVertex {
    fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            color: WHITE,
            uv,
            normal,
        }
    }
}

/// Geometry of a solid. Dimensions are full extents centred on the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Cube { edge: f32 },
    Cuboid { length: f32, height: f32, width: f32 },
    /// Two-sided horizontal quad.
    Plane { length: f32, width: f32 },
    /// Square base, apex above its centre.
    Pyramid { edge: f32, height: f32 },
    Mesh(ObjMesh),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cube { .. } => "cube",
            Shape::Cuboid { .. } => "cuboid",
            Shape::Plane { .. } => "plane",
            Shape::Pyramid { .. } => "pyramid",
            Shape::Mesh(_) => "mesh",
        }
    }

    /// Vertices and triangle indices.
    pub fn geometry(&self) -> (Vec<SolidVertex>, Vec<u32>) {
        match *self {
            Shape::Cube { edge } => (box_vertices(edge, edge, edge, [1.0; 3]), BOX_INDICES.to_vec()),
            Shape::Cuboid {
                length,
                height,
                width,
            } => (
                box_vertices(length, height, width, [length, height, width]),
                BOX_INDICES.to_vec(),
            ),
            Shape::Plane { length, width } => (plane_vertices(length, width), PLANE_INDICES.to_vec()),
            Shape::Pyramid { edge, height } => {
                (pyramid_vertices(edge, height), PYRAMID_INDICES.to_vec())
            }
            Shape::Mesh(ref mesh) => (mesh_vertices(mesh), mesh.indices.clone()),
        }
    }
}

// Three copies of each box corner, one per adjoining face, so each face can
// carry its own uv.
#[rustfmt::skip]
const BOX_INDICES: [u32; 36] = [
    0, 3, 9,    0, 9, 6,    // front
    4, 16, 22,  4, 22, 10,  // right
    15, 12, 18, 15, 18, 21, // back
    13, 1, 7,   13, 7, 19,  // left
    8, 11, 23,  8, 23, 20,  // top
    14, 17, 5,  14, 5, 2,   // bottom
];

#[rustfmt::skip]
const BOX_CORNERS: [[f32; 3]; 24] = [
    [-1.0, -1.0,  1.0], [-1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
    [-1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [-1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    [ 1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0],
];

/// UV terms per box vertex: 0 = zero, 1 = length, 2 = height, 3 = width.
/// Textures repeat once per world unit on cuboids and once per face on cubes.
#[rustfmt::skip]
const BOX_UV_TERMS: [[usize; 2]; 24] = [
    [0, 0], [3, 0], [1, 3],
    [1, 0], [0, 0], [0, 3],
    [0, 2], [3, 2], [0, 0],
    [1, 2], [0, 2], [1, 0],
    [1, 0], [0, 0], [1, 0],
    [0, 0], [3, 0], [0, 0],
    [1, 2], [0, 2], [0, 3],
    [0, 2], [3, 2], [1, 3],
];

fn box_vertices(length: f32, height: f32, width: f32, uv_scale: [f32; 3]) -> Vec<SolidVertex> {
    let half = [length / 2.0, height / 2.0, width / 2.0];
    let terms = [0.0, uv_scale[0], uv_scale[1], uv_scale[2]];
    BOX_CORNERS
        .iter()
        .zip(BOX_UV_TERMS)
        .map(|(corner, [u, v])| {
            SolidVertex::new(
                [corner[0] * half[0], corner[1] * half[1], corner[2] * half[2]],
                [terms[u], terms[v]],
                corner.map(|s| s * CUBE_NORMAL_FACTOR),
            )
        })
        .collect()
}

#[rustfmt::skip]
const PLANE_INDICES: [u32; 12] = [
    0, 1, 3,  0, 3, 2, // top
    6, 7, 5,  6, 5, 4, // bottom
];

fn plane_vertices(length: f32, width: f32) -> Vec<SolidVertex> {
    let (l, w) = (length / 2.0, width / 2.0);
    let mut vertices = Vec::with_capacity(8);
    for normal_y in [1.0, -1.0] {
        for (x, z, uv) in [
            (-l, w, [0.0, 0.0]),
            (l, w, [length, 0.0]),
            (-l, -w, [0.0, width]),
            (l, -w, [length, width]),
        ] {
            vertices.push(SolidVertex::new([x, 0.0, z], uv, [0.0, normal_y, 0.0]));
        }
    }
    vertices
}

#[rustfmt::skip]
const PYRAMID_INDICES: [u32; 18] = [
    0, 3, 12,  // front
    4, 10, 13, // right
    9, 6, 14,  // back
    7, 1, 15,  // left
    8, 11, 5,  8, 5, 2, // bottom
];

fn pyramid_vertices(edge: f32, height: f32) -> Vec<SolidVertex> {
    let (e, h) = (edge / 2.0, height / 2.0);
    let slope = Vec3::new(-e, height, e) + Vec3::X - Vec3::Z - Vec3::Y;
    let n = normalize(slope * 0.25);

    // (x sign, z sign, uv, flip y of the normal) for three copies of each
    // base corner: two side faces and the bottom.
    #[rustfmt::skip]
    let base: [(f32, f32, [f32; 2], bool); 12] = [
        (-1.0,  1.0, [0.0, 0.0], false), (-1.0,  1.0, [1.0, 0.0], false), (-1.0,  1.0, [1.0, 1.0], true),
        ( 1.0,  1.0, [1.0, 0.0], false), ( 1.0,  1.0, [0.0, 0.0], false), ( 1.0,  1.0, [0.0, 1.0], true),
        (-1.0, -1.0, [1.0, 0.0], false), (-1.0, -1.0, [0.0, 0.0], false), (-1.0, -1.0, [1.0, 0.0], true),
        ( 1.0, -1.0, [0.0, 0.0], false), ( 1.0, -1.0, [1.0, 0.0], false), ( 1.0, -1.0, [0.0, 0.0], true),
    ];

    let mut vertices: Vec<SolidVertex> = base
        .iter()
        .map(|&(sx, sz, uv, down)| {
            let ny = if down { -n.y } else { n.y };
            SolidVertex::new([sx * e, -h, sz * e], uv, [sx * n.x, ny, sz * n.z])
        })
        .collect();
    // Apex, once per side face.
    for _ in 0..4 {
        vertices.push(SolidVertex::new([0.0, h, 0.0], [0.5, 1.0], [0.0, 1.0, 0.0]));
    }
    vertices
}

fn mesh_vertices(mesh: &ObjMesh) -> Vec<SolidVertex> {
    mesh.vertices
        .chunks_exact(OBJ_VERTEX_FLOATS)
        .map(|v| SolidVertex {
            position: [v[0], v[1], v[2]],
            color: [v[3], v[4], v[5]],
            uv: [v[6], v[7]],
            normal: [v[8], v[9], v[10]],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(shape: &Shape) {
        let (vertices, indices) = shape.geometry();
        assert_eq!(indices.len() % 3, 0, "{}", shape.name());
        assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "{}",
            shape.name()
        );
    }

    #[test]
    fn all_shapes_have_valid_indices() {
        for shape in [
            Shape::Cube { edge: 1.0 },
            Shape::Cuboid {
                length: 2.0,
                height: 1.0,
                width: 3.0,
            },
            Shape::Plane {
                length: 4.0,
                width: 4.0,
            },
            Shape::Pyramid {
                edge: 1.0,
                height: 2.0,
            },
        ] {
            assert_indices_in_range(&shape);
        }
    }

    #[test]
    fn cube_is_centred_and_sized() {
        let (vertices, indices) = Shape::Cube { edge: 2.0 }.geometry();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 1.0)));
        assert!(vertices.iter().all(|v| v.color == WHITE));
        // Vertex 0 is the front-bottom-left corner.
        assert_eq!(vertices[0].position, [-1.0, -1.0, 1.0]);
        assert_eq!(
            vertices[0].normal,
            [-CUBE_NORMAL_FACTOR, -CUBE_NORMAL_FACTOR, CUBE_NORMAL_FACTOR]
        );
    }

    #[test]
    fn cuboid_uvs_scale_with_dimensions() {
        let (cube, _) = Shape::Cube { edge: 5.0 }.geometry();
        let (cuboid, _) = Shape::Cuboid {
            length: 2.0,
            height: 3.0,
            width: 4.0,
        }
        .geometry();
        // Vertex 9: front face, top-right corner.
        assert_eq!(cube[9].uv, [1.0, 1.0]);
        assert_eq!(cuboid[9].uv, [2.0, 3.0]);
        assert_eq!(cuboid[9].position, [1.0, 1.5, 2.0]);
        assert_eq!(cuboid[23].uv, [2.0, 4.0]);
    }

    #[test]
    fn plane_is_two_sided() {
        let (vertices, indices) = Shape::Plane {
            length: 2.0,
            width: 6.0,
        }
        .geometry();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 12);
        assert!(vertices[..4].iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(vertices[4..].iter().all(|v| v.normal == [0.0, -1.0, 0.0]));
        assert_eq!(vertices[3].position, [1.0, 0.0, -3.0]);
        assert_eq!(vertices[3].uv, [2.0, 6.0]);
    }

    #[test]
    fn pyramid_apex_and_base() {
        let (vertices, indices) = Shape::Pyramid {
            edge: 2.0,
            height: 4.0,
        }
        .geometry();
        assert_eq!(vertices.len(), 16);
        assert_eq!(indices.len(), 18);
        assert!(vertices[12..].iter().all(|v| v.position == [0.0, 2.0, 0.0]));
        assert!(vertices[..12].iter().all(|v| v.position[1] == -2.0));
        for v in &vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn mesh_geometry_reuses_obj_layout() {
        let obj = ObjMesh::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5\nf 1/1 2/1 3/1\n", Vec3::ZERO)
            .unwrap();
        let (vertices, indices) = Shape::Mesh(obj).geometry();
        assert_eq!(vertices.len(), 3);
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].uv, [0.5, 0.5]);
    }

    #[test]
    fn vertex_matches_solid_layout_size() {
        assert_eq!(size_of::<SolidVertex>(), OBJ_VERTEX_FLOATS * 4);
    }
}
