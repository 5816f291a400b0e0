/// STL mesh loading (binary and ASCII)
///
/// STL stores a flat list of triangles, each with its own copy of the three
/// corner points. Corners are merged into a shared vertex table on load.
/// Facet normals are read and discarded.
use std::fs;
use std::path::Path;

use log::{debug, info};
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::error::GeometryError;
use crate::geometry::Mesh;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Three corners of one triangle
type Facet = [[f32; 3]; 3];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed asset: {0}")]
    Malformed(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Load a mesh from an STL file on disk
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let mesh = parse_stl(&data)?;
    info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Detect and parse STL data (ASCII or binary)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    // binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => debug!("not ASCII STL, trying binary: {}", e),
            }
        }
    }
    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(LoadError::Malformed("file too small to be a valid STL".to_string()));
    }

    let count = read_u32(data, HEADER_LEN) as usize;
    let body = &data[HEADER_LEN + 4..];
    let expected = count
        .checked_mul(FACET_LEN)
        .ok_or_else(|| LoadError::Malformed(format!("absurd triangle count {}", count)))?;
    if body.len() < expected {
        return Err(LoadError::Malformed(format!(
            "header announces {} triangles but only {} bytes follow",
            count,
            body.len()
        )));
    }

    let facets: Vec<Facet> = body
        .chunks_exact(FACET_LEN)
        .take(count)
        .map(|chunk| {
            // skip the 12-byte normal, ignore the trailing attribute count
            let mut corners = [[0.0f32; 3]; 3];
            for (v, corner) in corners.iter_mut().enumerate() {
                for (axis, value) in corner.iter_mut().enumerate() {
                    *value = read_f32(chunk, 12 + v * 12 + axis * 4);
                }
            }
            corners
        })
        .collect();

    into_mesh(&facets)
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, LoadError> {
    match parse_solid(input) {
        Ok((_, facets)) => into_mesh(&facets),
        Err(e) => Err(LoadError::Malformed(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn into_mesh(facets: &[Facet]) -> Result<Mesh, LoadError> {
    let soup: Vec<[Vec<f64>; 3]> = facets
        .iter()
        .map(|facet| facet.map(|corner| corner.iter().map(|&c| f64::from(c)).collect()))
        .collect();
    Ok(Mesh::from_triangle_soup(3, &soup)?)
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn parse_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // optional name, up to the end of the line
    let (input, _) = take_till(|c: char| c == '\n')(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}
