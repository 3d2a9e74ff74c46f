//! Binary STL reading and writing.
//!
//! Layout: an 80-byte header, a little-endian `u32` face count, then 50 bytes
//! per face (normal, three vertices, all `f32`, and a `u16` attribute word).
//! Normals and attribute words are ignored on read and recomputed on write.

use std::path::Path;

use lamina_math::SliceAxis;
use tracing::{debug, info};

use crate::error::{MeshError, Result};
use crate::{Triangle, TriangleMesh};

const HEADER_LEN: usize = 80;
const FACE_LEN: usize = 50;

/// Read a binary STL file, reorienting it for slicing along `axis`.
pub fn read_stl(path: impl AsRef<Path>, axis: SliceAxis) -> Result<TriangleMesh> {
    let path = path.as_ref();
    debug!("Reading STL from {:?}", path);
    let data = std::fs::read(path)?;
    read_stl_from_buffer(&data, axis)
}

/// Parse binary STL bytes, reorienting them for slicing along `axis`.
pub fn read_stl_from_buffer(data: &[u8], axis: SliceAxis) -> Result<TriangleMesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(MeshError::Truncated {
            expected: HEADER_LEN + 4,
            actual: data.len(),
        });
    }

    let header = String::from_utf8_lossy(&data[..HEADER_LEN]);
    info!(header = %header.trim_end_matches(['\0', ' ']), "STL header");

    let face_count = u32::from_le_bytes([
        data[HEADER_LEN],
        data[HEADER_LEN + 1],
        data[HEADER_LEN + 2],
        data[HEADER_LEN + 3],
    ]) as usize;
    info!(faces = face_count, "The model contains {} faces", face_count);

    let expected = HEADER_LEN + 4 + face_count * FACE_LEN;
    if data.len() < expected {
        return Err(MeshError::Truncated {
            expected,
            actual: data.len(),
        });
    }
    if face_count == 0 {
        return Err(MeshError::Empty);
    }

    let faces = &data[HEADER_LEN + 4..expected];
    let triangles = faces
        .chunks_exact(FACE_LEN)
        .map(|face| {
            // Skip the 12-byte normal.
            let vertex = |i: usize| {
                let base = 12 + i * 12;
                axis.reorient([
                    read_f32(face, base),
                    read_f32(face, base + 4),
                    read_f32(face, base + 8),
                ])
            };
            Triangle::new(vertex(0), vertex(1), vertex(2))
        })
        .collect();

    Ok(TriangleMesh::from_triangles(triangles))
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Encode a mesh as binary STL, mapping coordinates back from `axis`.
///
/// Fails if the face count does not fit the format's `u32` field.
pub fn stl_bytes(mesh: &TriangleMesh, axis: SliceAxis) -> Result<Vec<u8>> {
    let num_triangles = mesh.num_triangles();
    let face_count = face_count_field(num_triangles)?;
    let mut data = Vec::with_capacity(HEADER_LEN + 4 + num_triangles * FACE_LEN);

    let mut header = [b' '; HEADER_LEN];
    let tag = b"lamina STL export";
    header[..tag.len()].copy_from_slice(tag);
    data.extend_from_slice(&header);
    data.extend_from_slice(&face_count.to_le_bytes());

    for tri in &mesh.triangles {
        let [v0, v1, v2] = tri.vertices.map(|p| axis.restore(&p));

        let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let nx = e1[1] * e2[2] - e1[2] * e2[1];
        let ny = e1[2] * e2[0] - e1[0] * e2[2];
        let nz = e1[0] * e2[1] - e1[1] * e2[0];
        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        let normal = if len > 1e-10 {
            [nx / len, ny / len, nz / len]
        } else {
            [0.0, 0.0, 1.0]
        };

        for c in normal.iter().chain(v0.iter()).chain(v1.iter()).chain(v2.iter()) {
            data.extend_from_slice(&c.to_le_bytes());
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(data)
}

fn face_count_field(num_triangles: usize) -> Result<u32> {
    u32::try_from(num_triangles).map_err(|_| MeshError::TooManyTriangles(num_triangles))
}

/// Write a mesh to a binary STL file.
pub fn write_stl(mesh: &TriangleMesh, path: impl AsRef<Path>, axis: SliceAxis) -> Result<()> {
    std::fs::write(path, stl_bytes(mesh, axis)?)?;
    Ok(())
}
