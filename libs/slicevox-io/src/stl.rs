//! STL (Stereolithography) file format support.
//!
//! Reads both ASCII and binary STL, writes binary.
//!
//! # Format Detection
//!
//! A file is binary when its length is exactly `84 + 50 * count`, where
//! `count` is the little-endian triangle count at byte 80. Anything else
//! that starts with `solid` is parsed as ASCII. Some exporters write binary
//! files whose header begins with `solid`, so the length check wins.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use slicevox_mesh::Mesh;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Loads a mesh from an STL file, ASCII or binary.
///
/// Corners are not merged: every facet contributes three vertices.
///
/// # Errors
///
/// [`IoError::FileNotFound`] for a missing file and
/// [`IoError::InvalidContent`] for anything that is not STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::from_open(e, path))?;
    let mesh = parse_stl(&bytes)?;
    log::debug!(
        "loaded {} triangles from {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(mesh)
}

/// Parses STL bytes, detecting the format.
pub fn parse_stl(bytes: &[u8]) -> IoResult<Mesh> {
    if is_binary(bytes) {
        return parse_binary(bytes);
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IoError::invalid_content(format!("neither binary nor ASCII STL: {e}")))?;
    if !text.trim_start().starts_with("solid") {
        return Err(IoError::invalid_content("missing 'solid' keyword"));
    }
    parse_ascii(text)
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE + 4 {
        return false;
    }
    let count = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]) as usize;
    count
        .checked_mul(TRIANGLE_SIZE)
        .and_then(|n| n.checked_add(HEADER_SIZE + 4))
        == Some(bytes.len())
}

fn parse_binary(bytes: &[u8]) -> IoResult<Mesh> {
    let body = &bytes[HEADER_SIZE + 4..];
    let triangles = body.chunks_exact(TRIANGLE_SIZE).map(|chunk| {
        [
            read_vertex(&chunk[12..24]),
            read_vertex(&chunk[24..36]),
            read_vertex(&chunk[36..48]),
        ]
    });
    Ok(Mesh::from_triangles(triangles))
}

/// Read a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> DVec3 {
    let f = |i: usize| f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]) as f64;
    DVec3::new(f(0), f(4), f(8))
}

fn parse_ascii(text: &str) -> IoResult<Mesh> {
    let mut triangles = Vec::new();
    let mut corners: Vec<DVec3> = Vec::with_capacity(3);

    for (number, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("outer") => corners.clear(),
            Some("vertex") => {
                let mut coord = || -> IoResult<f64> {
                    parts
                        .next()
                        .ok_or_else(|| {
                            IoError::invalid_content(format!("line {}: short vertex", number + 1))
                        })?
                        .parse()
                        .map_err(|e| IoError::invalid_content(format!("line {}: {e}", number + 1)))
                };
                let v = DVec3::new(coord()?, coord()?, coord()?);
                corners.push(v);
            }
            Some("endloop") => {
                if corners.len() != 3 {
                    return Err(IoError::invalid_content(format!(
                        "line {}: facet has {} vertices",
                        number + 1,
                        corners.len()
                    )));
                }
                triangles.push([corners[0], corners[1], corners[2]]);
            }
            Some("endsolid") => break,
            _ => {}
        }
    }

    Ok(Mesh::from_triangles(triangles))
}

/// Saves a mesh as binary STL, computing facet normals from the winding.
pub fn save_stl<P: AsRef<Path>>(mesh: &Mesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl(mesh, &mut writer)?;
    writer.flush()?;
    log::debug!(
        "saved {} triangles to {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}

/// Writes a mesh as binary STL.
pub fn write_stl<W: Write>(mesh: &Mesh, mut writer: W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by slicevox";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.triangle_count())
        .map_err(|_| IoError::invalid_content("too many triangles for STL"))?;
    writer.write_all(&count.to_le_bytes())?;

    for i in 0..mesh.triangle_count() {
        write_vector(&mut writer, mesh.face_normal(i))?;
        for corner in mesh.triangle_corners(i) {
            write_vector(&mut writer, corner)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Writes three f32s in little-endian.
fn write_vector<W: Write>(writer: &mut W, v: DVec3) -> IoResult<()> {
    for c in v.to_array() {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}
