use std::collections::HashMap;
use std::path::Path;

use kedarium_math::Vec3;

use crate::AssetError;
use crate::file::read_text;

/// Floats per vertex: position 3, color 3, uv 2, normal 3.
pub const OBJ_VERTEX_FLOATS: usize = 11;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Triangle mesh imported from Wavefront OBJ text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    /// Interleaved vertices, [`OBJ_VERTEX_FLOATS`] per vertex.
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// One `v/vt/vn` corner, resolved to zero-based indices.
type Corner = (usize, Option<usize>, Option<usize>);

impl ObjMesh {
    /// Read and parse an OBJ file. See [`ObjMesh::parse`].
    pub fn load(path: impl AsRef<Path>, dimensions: Vec3) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let mesh = Self::parse(&read_text(path)?, dimensions)?;
        tracing::info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.indices.len() / 3,
            "loaded OBJ mesh"
        );
        Ok(mesh)
    }

    /// Parse `v`, `vt`, `vn` and `f` records; other records are ignored.
    ///
    /// Polygons are fan-triangulated. Malformed lines are logged and skipped;
    /// an index outside the data read so far is an error.
    ///
    /// When a component of `dimensions` is non-zero the mesh is recentred on
    /// its bounding box and scaled so its extent along that axis matches.
    pub fn parse(text: &str, dimensions: Vec3) -> Result<Self, AssetError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut uvs: Vec<[f32; 2]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();

        let mut mesh = ObjMesh::default();
        let mut seen: HashMap<Corner, u32> = HashMap::new();

        for (number, raw) in text.lines().enumerate() {
            let line = number + 1;
            let raw = raw.trim();
            if raw.is_empty() || raw.starts_with('#') {
                continue;
            }
            let mut fields = raw.split_whitespace();
            let Some(tag) = fields.next() else { continue };
            let rest: Vec<&str> = fields.collect();

            match tag {
                "v" => match parse_floats::<3>(&rest) {
                    Some(p) => positions.push(p),
                    None => tracing::warn!(line, "malformed vertex position, skipped"),
                },
                "vt" => match parse_floats::<2>(&rest) {
                    Some(t) => uvs.push(t),
                    None => tracing::warn!(line, "malformed texture coordinate, skipped"),
                },
                "vn" => match parse_floats::<3>(&rest) {
                    Some(n) => normals.push(n),
                    None => tracing::warn!(line, "malformed normal, skipped"),
                },
                "f" => {
                    if rest.len() < 3 {
                        tracing::warn!(line, corners = rest.len(), "face needs 3 corners, skipped");
                        continue;
                    }
                    let mut corners = Vec::with_capacity(rest.len());
                    let mut malformed = false;
                    for token in &rest {
                        let counts = (positions.len(), uvs.len(), normals.len());
                        match parse_corner(token, counts, line)? {
                            Some(corner) => corners.push(corner),
                            None => {
                                malformed = true;
                                break;
                            }
                        }
                    }
                    if malformed {
                        tracing::warn!(line, "malformed face, skipped");
                        continue;
                    }

                    let ids: Vec<u32> = corners
                        .into_iter()
                        .map(|corner| {
                            *seen.entry(corner).or_insert_with(|| {
                                push_vertex(&mut mesh.vertices, corner, &positions, &uvs, &normals)
                            })
                        })
                        .collect();
                    for i in 1..ids.len() - 1 {
                        mesh.indices.extend_from_slice(&[ids[0], ids[i], ids[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        if dimensions != Vec3::ZERO {
            mesh.normalize_to(dimensions);
        }
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / OBJ_VERTEX_FLOATS
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_bytes(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice())
    }

    pub fn index_bytes(&self) -> usize {
        std::mem::size_of_val(self.indices.as_slice())
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| {
            (
                Vec3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Vec3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(OBJ_VERTEX_FLOATS)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    fn normalize_to(&mut self, dimensions: Vec3) {
        let Some((lo, hi)) = self.bounds() else { return };
        let center = (lo + hi) * 0.5;
        let extent = hi - lo;
        let scale = |target: f32, size: f32| {
            if target != 0.0 && size > 0.0 { target / size } else { 1.0 }
        };
        let factor = [
            scale(dimensions.x, extent.x),
            scale(dimensions.y, extent.y),
            scale(dimensions.z, extent.z),
        ];
        let center = center.to_array();
        for vertex in self.vertices.chunks_exact_mut(OBJ_VERTEX_FLOATS) {
            for axis in 0..3 {
                vertex[axis] = (vertex[axis] - center[axis]) * factor[axis];
            }
        }
    }
}

fn parse_floats<const N: usize>(fields: &[&str]) -> Option<[f32; N]> {
    if fields.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().ok()?;
    }
    Some(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index against `count`.
fn resolve(raw: &str, count: usize, line: usize) -> Result<Option<usize>, AssetError> {
    let Ok(index) = raw.parse::<i64>() else {
        return Ok(None);
    };
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => count as i64 + i,
        _ => -1,
    };
    if resolved < 0 || resolved >= count as i64 {
        return Err(AssetError::ObjIndex { line, index });
    }
    Ok(Some(resolved as usize))
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`. `Ok(None)` means malformed text.
fn parse_corner(
    token: &str,
    (positions, uvs, normals): (usize, usize, usize),
    line: usize,
) -> Result<Option<Corner>, AssetError> {
    let mut parts = token.split('/');
    let Some(position) = resolve(parts.next().unwrap_or(""), positions, line)? else {
        return Ok(None);
    };
    let Some(uv) = optional_index(parts.next(), uvs, line)? else {
        return Ok(None);
    };
    let Some(normal) = optional_index(parts.next(), normals, line)? else {
        return Ok(None);
    };
    Ok(Some((position, uv, normal)))
}

/// An absent or empty field is `Some(None)`; unparsable text is `None`.
fn optional_index(
    part: Option<&str>,
    count: usize,
    line: usize,
) -> Result<Option<Option<usize>>, AssetError> {
    match part {
        None | Some("") => Ok(Some(None)),
        Some(raw) => Ok(resolve(raw, count, line)?.map(Some)),
    }
}

fn push_vertex(
    out: &mut Vec<f32>,
    (position, uv, normal): Corner,
    positions: &[[f32; 3]],
    uvs: &[[f32; 2]],
    normals: &[[f32; 3]],
) -> u32 {
    let id = (out.len() / OBJ_VERTEX_FLOATS) as u32;
    out.extend_from_slice(&positions[position]);
    out.extend_from_slice(&WHITE);
    out.extend_from_slice(&uv.map_or([0.0; 2], |i| uvs[i]));
    out.extend_from_slice(&normal.map_or([0.0; 3], |i| normals[i]));
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
o quad
v 0 0 0
v 2 0 0
v 2 4 0
v 0 4 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let mesh = ObjMesh::parse(QUAD, Vec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertex_bytes(), 4 * OBJ_VERTEX_FLOATS * 4);
        assert_eq!(mesh.index_bytes(), 6 * 4);

        // Third vertex: position, white, uv, normal.
        let v = &mesh.vertices[2 * OBJ_VERTEX_FLOATS..3 * OBJ_VERTEX_FLOATS];
        assert_eq!(v, &[2.0, 4.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn shared_corners_are_deduplicated() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
        let mesh = ObjMesh::parse(text, Vec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = ObjMesh::parse(text, Vec3::ZERO).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(&mesh.vertices[OBJ_VERTEX_FLOATS..OBJ_VERTEX_FLOATS + 3], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn position_and_normal_without_uv() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 1 0\nf 1//1 2//1 3//1\n";
        let mesh = ObjMesh::parse(text, Vec3::ZERO).unwrap();
        let v = &mesh.vertices[..OBJ_VERTEX_FLOATS];
        assert_eq!(&v[6..8], &[0.0, 0.0]);
        assert_eq!(&v[8..11], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "v 0 0 0\nv 1 0 0\nv oops 0 0\nv 0 1 0\nf 1 2\nf 1 2 x\nf 1 2 3\n";
        let mesh = ObjMesh::parse(text, Vec3::ZERO).unwrap();
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn out_of_range_index_is_error() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        let err = ObjMesh::parse(text, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, AssetError::ObjIndex { line: 4, index: 9 }));

        let zero = ObjMesh::parse("v 0 0 0\nf 0 1 1\n", Vec3::ZERO).unwrap_err();
        assert!(matches!(zero, AssetError::ObjIndex { line: 2, index: 0 }));
    }

    #[test]
    fn normalization_recentres_and_scales() {
        let mesh = ObjMesh::parse(QUAD, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let (lo, hi) = mesh.bounds().unwrap();
        // Y extent 4 scaled to 1; X keeps its size but is recentred.
        assert!((hi.y - lo.y - 1.0).abs() < 1e-6);
        assert!((hi.x - 1.0).abs() < 1e-6);
        assert!((lo.x + 1.0).abs() < 1e-6);
        assert!((lo.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_text_is_empty_mesh() {
        let mesh = ObjMesh::parse("", Vec3::splat(1.0)).unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(&path, QUAD).unwrap();
        let mesh = ObjMesh::load(&path, Vec3::ZERO).unwrap();
        assert_eq!(mesh.index_count(), 6);
    }
}
