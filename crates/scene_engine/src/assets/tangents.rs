//! Per-triangle tangent space generation for normal mapping

use crate::foundation::math::{Vec2, Vec3};

/// Tangent and bitangent arrays parallel to a mesh's corner arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TangentBasis {
    /// One tangent per corner, shared by the three corners of a triangle
    pub tangents: Vec<Vec3>,
    /// One bitangent per corner, shared by the three corners of a triangle
    pub bitangents: Vec<Vec3>,
    /// Triangles whose UV area is exactly zero; their basis is the zero vector
    pub degenerate_triangles: Vec<usize>,
}

/// Tangent and bitangent of one triangle, or `None` when its UVs span no area
#[allow(clippy::float_cmp)]
pub fn triangle_tangent(positions: [Vec3; 3], uvs: [Vec2; 3]) -> Option<(Vec3, Vec3)> {
    let edge1 = positions[1] - positions[0];
    let edge2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    let denominator = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
    if denominator == 0.0 {
        return None;
    }
    let r = 1.0 / denominator;

    let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * r;
    let bitangent = (edge2 * delta_uv1.x - edge1 * delta_uv2.x) * r;
    Some((tangent, bitangent))
}

/// Compute the tangent basis for a triangle list laid out three corners per face
///
/// `positions` and `uvs` must be parallel; a trailing partial triangle is
/// ignored by the caller's invariants and never produced by the loader.
pub fn compute_tangent_basis(positions: &[Vec3], uvs: &[Vec2]) -> TangentBasis {
    debug_assert_eq!(positions.len(), uvs.len());

    let mut basis = TangentBasis {
        tangents: Vec::with_capacity(positions.len()),
        bitangents: Vec::with_capacity(positions.len()),
        degenerate_triangles: Vec::new(),
    };

    for (triangle, (p, uv)) in positions.chunks_exact(3).zip(uvs.chunks_exact(3)).enumerate() {
        let (tangent, bitangent) = triangle_tangent([p[0], p[1], p[2]], [uv[0], uv[1], uv[2]])
            .unwrap_or_else(|| {
                basis.degenerate_triangles.push(triangle);
                (Vec3::zeros(), Vec3::zeros())
            });

        basis.tangents.extend_from_slice(&[tangent; 3]);
        basis.bitangents.extend_from_slice(&[bitangent; 3]);
    }

    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_square_mapping() {
        let positions = [Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        let uvs = [Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

        let basis = compute_tangent_basis(&positions, &uvs);

        assert_eq!(basis.tangents, vec![Vec3::new(1.0, 0.0, 0.0); 3]);
        assert_eq!(basis.bitangents, vec![Vec3::new(0.0, 1.0, 0.0); 3]);
        assert!(basis.degenerate_triangles.is_empty());
    }

    #[test]
    fn test_scaled_uvs_scale_the_basis_inversely() {
        let positions = [Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)];
        let uvs = [Vec2::zeros(), Vec2::new(0.5, 0.0), Vec2::new(0.0, 0.5)];

        let (tangent, bitangent) = triangle_tangent(
            [positions[0], positions[1], positions[2]],
            [uvs[0], uvs[1], uvs[2]],
        )
        .unwrap();

        assert_relative_eq!(tangent, Vec3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(bitangent, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_duplicate_uvs_are_degenerate() {
        let positions = [
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let uvs = [
            Vec2::new(0.3, 0.3),
            Vec2::new(0.3, 0.3),
            Vec2::new(0.3, 0.3),
            Vec2::zeros(),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];

        let basis = compute_tangent_basis(&positions, &uvs);

        assert_eq!(basis.degenerate_triangles, vec![0]);
        assert_eq!(basis.tangents.len(), 6);
        assert_eq!(basis.tangents[0], Vec3::zeros());
        assert_eq!(basis.bitangents[2], Vec3::zeros());
        // The healthy triangle is unaffected by its degenerate neighbour.
        assert_eq!(basis.tangents[3], Vec3::new(1.0, 0.0, 0.0));
    }
}
