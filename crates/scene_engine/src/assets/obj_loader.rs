//! OBJ file loader for 3D models
//!
//! Supports the triangulated subset the scene ships with: `v x y z [r g b]`
//! (colour ignored), `vn x y z`, `vt u v` and `f` records holding exactly
//! three `position/uv/normal` triples with 1-based indices. Anything else on
//! a face line is rejected rather than guessed at.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use super::MeshData;
use crate::foundation::math::{Vec2, Vec3};

/// Errors raised while building a mesh
#[derive(Error, Debug)]
pub enum MeshError {
    /// The source could not be opened or read
    #[error("cannot read mesh '{source_name}': {error}")]
    Parse {
        /// File path or stream name
        source_name: String,
        /// Underlying IO failure
        #[source]
        error: std::io::Error,
    },

    /// A face record is not exactly one fully indexed triangle
    #[error("malformed face on line {line}: {reason}")]
    MalformedFace {
        /// 1-based line number
        line: usize,
        /// What was wrong with the record
        reason: String,
    },

    /// A `v`, `vn` or `vt` record has missing or unparsable components
    #[error("invalid attribute on line {line}: {reason}")]
    InvalidAttribute {
        /// 1-based line number
        line: usize,
        /// What was wrong with the record
        reason: String,
    },

    /// A `vn` record of zero length cannot be normalized
    #[error("zero-length normal on line {line}")]
    ZeroLengthNormal {
        /// 1-based line number
        line: usize,
    },

    /// Corner arrays handed to the mesh builder disagree in length
    #[error("attribute counts disagree: {positions} positions, {normals} normals, {uvs} uvs")]
    AttributeMismatch {
        /// Number of positions
        positions: usize,
        /// Number of normals
        normals: usize,
        /// Number of texture coordinates
        uvs: usize,
    },

    /// More corners than a 32-bit index buffer can address
    #[error("mesh has {0} vertices, more than a u32 index can address")]
    TooManyVertices(usize),
}

/// One corner of a face record, as 0-based attribute indices
#[derive(Debug, Clone, Copy)]
struct FaceCorner {
    position: usize,
    uv: usize,
    normal: usize,
}

/// A face record awaiting index resolution
#[derive(Debug, Clone, Copy)]
struct FaceRecord {
    line: usize,
    corners: [FaceCorner; 3],
}

/// Attribute pools accumulated while streaming a file
#[derive(Default)]
struct ObjRecords {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    faces: Vec<FaceRecord>,
    lowest: Option<Vec3>,
    highest: Option<Vec3>,
}

impl ObjRecords {
    fn push_position(&mut self, position: Vec3) {
        self.lowest = Some(self.lowest.map_or(position, |low| low.inf(&position)));
        self.highest = Some(self.highest.map_or(position, |high| high.sup(&position)));
        self.positions.push(position);
    }

    fn center_offset(&self) -> Vec3 {
        match (self.lowest, self.highest) {
            (Some(lowest), Some(highest)) => (lowest + highest) / 2.0,
            _ => Vec3::zeros(),
        }
    }

    /// Expand faces into parallel per-corner arrays
    fn unroll(self) -> Result<MeshData, MeshError> {
        let corner_count = self.faces.len() * 3;
        let mut positions = Vec::with_capacity(corner_count);
        let mut normals = Vec::with_capacity(corner_count);
        let mut uvs = Vec::with_capacity(corner_count);

        for face in &self.faces {
            for corner in &face.corners {
                let out_of_range = |kind: &str, index: usize, len: usize| MeshError::MalformedFace {
                    line: face.line,
                    reason: format!("{kind} index {} out of range (have {len})", index + 1),
                };
                positions.push(*self.positions.get(corner.position).ok_or_else(|| {
                    out_of_range("position", corner.position, self.positions.len())
                })?);
                uvs.push(
                    *self
                        .uvs
                        .get(corner.uv)
                        .ok_or_else(|| out_of_range("uv", corner.uv, self.uvs.len()))?,
                );
                normals.push(*self.normals.get(corner.normal).ok_or_else(|| {
                    out_of_range("normal", corner.normal, self.normals.len())
                })?);
            }
        }

        let center_offset = self.center_offset();
        MeshData::with_center(positions, normals, uvs, center_offset)
    }
}

/// Loader for the OBJ subset described in the module docs
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and build its mesh
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshData, MeshError> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|error| MeshError::Parse {
            source_name: source_name.clone(),
            error,
        })?;

        info!("Parsing {source_name}...");
        Self::parse(BufReader::new(file), &source_name)
    }

    /// Build a mesh from any buffered reader; `source_name` labels errors
    pub fn parse<R: BufRead>(reader: R, source_name: &str) -> Result<MeshData, MeshError> {
        let mut records = ObjRecords::default();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|error| MeshError::Parse {
                source_name: source_name.to_string(),
                error,
            })?;
            let mut parts = line.split_whitespace();

            match parts.next() {
                Some("v") => {
                    let [x, y, z]: [f32; 3] = parse_floats(&mut parts, line_number, "position")?;
                    records.push_position(Vec3::new(x, y, z));
                }
                Some("vn") => {
                    let [x, y, z]: [f32; 3] = parse_floats(&mut parts, line_number, "normal")?;
                    records.normals.push(normalize(Vec3::new(x, y, z), line_number)?);
                }
                Some("vt") => {
                    let [u, v]: [f32; 2] = parse_floats(&mut parts, line_number, "texture coordinate")?;
                    records.uvs.push(Vec2::new(u, v));
                }
                Some("f") => {
                    let corners = parse_face(parts, line_number)?;
                    records.faces.push(FaceRecord {
                        line: line_number,
                        corners,
                    });
                }
                // Comments, blank lines, groups, smoothing and material records
                _ => {}
            }
        }

        debug!(
            "{source_name}: {} positions, {} normals, {} uvs, {} faces",
            records.positions.len(),
            records.normals.len(),
            records.uvs.len(),
            records.faces.len()
        );
        if records.faces.is_empty() {
            warn!("{source_name} contains no faces");
        }

        records.unroll()
    }
}

/// Parse the first `N` components of an attribute record; extras (vertex
/// colours, `w` components) are ignored
fn parse_floats<'a, I, const N: usize>(
    parts: &mut I,
    line: usize,
    kind: &str,
) -> Result<[f32; N], MeshError>
where
    I: Iterator<Item = &'a str>,
{
    let mut values = [0.0; N];
    for (component, value) in values.iter_mut().enumerate() {
        let token = parts.next().ok_or_else(|| MeshError::InvalidAttribute {
            line,
            reason: format!("{kind} needs {N} components, found {component}"),
        })?;
        *value = token
            .parse::<f32>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .ok_or_else(|| MeshError::InvalidAttribute {
                line,
                reason: format!("{kind} component '{token}' is not a finite number"),
            })?;
    }
    Ok(values)
}

fn normalize(normal: Vec3, line: usize) -> Result<Vec3, MeshError> {
    let magnitude = normal.magnitude();
    if magnitude > 0.0 && magnitude.is_finite() {
        Ok(normal / magnitude)
    } else {
        Err(MeshError::ZeroLengthNormal { line })
    }
}

fn parse_face<'a>(
    parts: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[FaceCorner; 3], MeshError> {
    let tokens: Vec<&str> = parts.collect();
    if tokens.len() != 3 {
        return Err(MeshError::MalformedFace {
            line,
            reason: format!("expected 3 vertex triples, found {}", tokens.len()),
        });
    }

    let mut corners = [FaceCorner {
        position: 0,
        uv: 0,
        normal: 0,
    }; 3];
    for (corner, token) in corners.iter_mut().zip(&tokens) {
        let slots: Vec<&str> = token.split('/').collect();
        let [position, uv, normal] = slots.as_slice() else {
            return Err(MeshError::MalformedFace {
                line,
                reason: format!("'{token}' is not a position/uv/normal triple"),
            });
        };
        *corner = FaceCorner {
            position: parse_index(position, line, token)?,
            uv: parse_index(uv, line, token)?,
            normal: parse_index(normal, line, token)?,
        };
    }
    Ok(corners)
}

/// Convert a 1-based file index into a 0-based one
fn parse_index(slot: &str, line: usize, token: &str) -> Result<usize, MeshError> {
    match slot.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index - 1),
        _ => Err(MeshError::MalformedFace {
            line,
            reason: format!("'{token}' has a missing, zero or relative index"),
        }),
    }
}
