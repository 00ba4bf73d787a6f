//! Camera to world transform built from yaw, pitch, roll and a translation.

use std::collections::HashMap;
use std::fmt;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, require, CameraError, CameraResult};
use crate::linalg;

/// Largest accepted deviation from orthonormality or `det(R) = 1` before a warning is logged.
const PROPER_ROTATION_TOL: f64 = 1e-6;

/// Orientation and position of the camera in the world frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraExtrinsicParams {
    /// Yaw in degrees
    pub yaw: f64,
    /// Pitch in degrees
    pub pitch: f64,
    /// Roll in degrees
    pub roll: f64,
    /// Translation along x in meters
    pub x_t: f64,
    /// Translation along y in meters
    pub y_t: f64,
    /// Translation along z in meters
    pub z_t: f64,
}

impl CameraExtrinsicParams {
    /// Check that every angle and translation component is finite.
    ///
    /// Angles are not range restricted.
    pub fn validate(&self) -> CameraResult<()> {
        ensure_finite("yaw", self.yaw)?;
        ensure_finite("pitch", self.pitch)?;
        ensure_finite("roll", self.roll)?;
        ensure_finite("x_t", self.x_t)?;
        ensure_finite("y_t", self.y_t)?;
        ensure_finite("z_t", self.z_t)?;
        Ok(())
    }
}

impl<S: std::hash::BuildHasher> TryFrom<&HashMap<String, f64, S>> for CameraExtrinsicParams {
    type Error = CameraError;

    /// Read the params from a map keyed by `yaw`, `pitch`, `roll`, `x_t`, `y_t` and `z_t`.
    fn try_from(map: &HashMap<String, f64, S>) -> Result<Self, Self::Error> {
        let params = Self {
            yaw: require(map, "yaw")?,
            pitch: require(map, "pitch")?,
            roll: require(map, "roll")?,
            x_t: require(map, "x_t")?,
            y_t: require(map, "y_t")?,
            z_t: require(map, "z_t")?,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Compute the camera to world rotation from yaw, pitch and roll.
///
/// # Arguments
///
/// * `yaw` - The yaw angle in degrees.
/// * `pitch` - The pitch angle in degrees.
/// * `roll` - The roll angle in degrees.
///
/// # Returns
///
/// The rotation as a row-major array.
///
/// NOTE: element `(1, 2)` is `sin(r)sin(p)cos(y) - cos(y)sin(r)`, not the Z-Y-X
/// Euler term `sin(r)sin(p)cos(y) - cos(r)sin(y)`. Existing callers depend on this
/// form, so it is kept as is. The result is only orthonormal when
/// `sin(y)cos(r) == sin(r)cos(y)`, i.e. yaw equals roll modulo 180 degrees.
/// Its determinant can still be one otherwise, e.g. for a roll-only orientation.
///
/// Example:
///
/// ```
/// use camtf::extrinsic::ypr_rotation_matrix;
///
/// let r = ypr_rotation_matrix(0.0, 0.0, 0.0);
/// assert_eq!(r, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
/// ```
pub fn ypr_rotation_matrix(yaw: f64, pitch: f64, roll: f64) -> [[f64; 3]; 3] {
    let (sy, cy) = yaw.to_radians().sin_cos();
    let (sp, cp) = pitch.to_radians().sin_cos();
    let (sr, cr) = roll.to_radians().sin_cos();

    [
        [cr * cp, cr * sp * sy - sr * cy, cr * sp * cy + sr * sy],
        [sr * cp, sr * sp * sy + cr * cy, sr * sp * cy - cy * sr],
        [-sp, cp * sy, cp * cy],
    ]
}

/// A 3x4 matrix `[R | t]` mapping homogeneous camera coordinates `(x, y, z, 1)` to world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrinsicMatrix {
    rotation: DMat3,
    translation: DVec3,
}

impl ExtrinsicMatrix {
    /// The rotation block `R` as a row-major array.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        linalg::mat3_to_rows(&self.rotation)
    }

    /// The translation column `t`.
    pub fn translation(&self) -> [f64; 3] {
        self.translation.to_array()
    }

    /// Determinant of the rotation block.
    pub fn rotation_determinant(&self) -> f64 {
        self.rotation.determinant()
    }

    /// Largest absolute element of `RᵀR − I`; zero for an orthonormal rotation block.
    pub fn orthonormality_error(&self) -> f64 {
        let gram = self.rotation.transpose() * self.rotation - DMat3::IDENTITY;
        gram.to_cols_array().iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Whether the rotation block is a proper rotation: orthonormal with `det(R) = 1`.
    pub fn is_proper_rotation(&self, tol: f64) -> bool {
        self.orthonormality_error() <= tol && (self.rotation_determinant() - 1.0).abs() <= tol
    }

    /// The full `[R | t]` matrix as a row-major array.
    pub fn to_array(&self) -> [[f64; 4]; 3] {
        let r = self.rotation();
        let t = self.translation();
        [
            [r[0][0], r[0][1], r[0][2], t[0]],
            [r[1][0], r[1][1], r[1][2], t[1]],
            [r[2][0], r[2][1], r[2][2], t[2]],
        ]
    }

    /// Multiply the matrix with a homogeneous camera coordinate.
    pub fn apply(&self, point: &[f64; 4]) -> [f64; 3] {
        let p = DVec3::new(point[0], point[1], point[2]);
        (self.rotation * p + self.translation * point[3]).to_array()
    }

    /// Map a camera-frame point to world coordinates.
    pub fn camera_to_world(&self, point: &[f64; 3]) -> [f64; 3] {
        self.apply(&linalg::to_homogeneous(point))
    }
}

impl fmt::Display for ExtrinsicMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ExtrinsicMatrix (3x4)")?;
        linalg::write_rows(f, &self.to_array())
    }
}

/// Build the extrinsic matrix of a camera.
///
/// # Arguments
///
/// * `params` - The camera orientation in degrees and translation in meters.
///
/// # Errors
///
/// [`CameraError::InvalidParameter`] when an angle or translation is not finite.
///
/// See [`ypr_rotation_matrix`] for the rotation convention.
pub fn build_extrinsic(params: CameraExtrinsicParams) -> CameraResult<ExtrinsicMatrix> {
    params.validate()?;

    let rotation = ypr_rotation_matrix(params.yaw, params.pitch, params.roll);
    let matrix = ExtrinsicMatrix {
        rotation: linalg::mat3_from_rows(&rotation),
        translation: DVec3::new(params.x_t, params.y_t, params.z_t),
    };

    if !matrix.is_proper_rotation(PROPER_ROTATION_TOL) {
        log::warn!(
            "rotation block for yaw={} pitch={} roll={} is not a proper rotation (det = {}, max |RᵀR - I| = {})",
            params.yaw,
            params.pitch,
            params.roll,
            matrix.rotation_determinant(),
            matrix.orthonormality_error()
        );
    }
    log::debug!("built extrinsic matrix from {params:?}: {:?}", matrix.to_array());

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(yaw: f64, pitch: f64, roll: f64) -> CameraExtrinsicParams {
        CameraExtrinsicParams {
            yaw,
            pitch,
            roll,
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_orientation() -> Result<(), CameraError> {
        let m = build_extrinsic(CameraExtrinsicParams {
            x_t: 1.5,
            y_t: -2.0,
            z_t: 0.25,
            ..Default::default()
        })?
        .to_array();
        let expected = [
            [1.0, 0.0, 0.0, 1.5],
            [0.0, 1.0, 0.0, -2.0],
            [0.0, 0.0, 1.0, 0.25],
        ];
        for i in 0..3 {
            for j in 0..4 {
                assert_relative_eq!(m[i][j], expected[i][j], epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_roll_90() -> Result<(), CameraError> {
        let m = build_extrinsic(params(0.0, 0.0, 90.0))?;
        let r = m.rotation();
        // (1, 2) is -cos(y)sin(r) = -1 with the kept formula; Z-Y-X would give 0
        let expected = [[0.0, -1.0, 0.0], [1.0, 0.0, -1.0], [0.0, 0.0, 1.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(r[i][j], expected[i][j], epsilon = 1e-9);
            }
        }

        let world = m.camera_to_world(&[1.0, 0.0, 0.0]);
        assert_relative_eq!(world[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(world[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(world[2], 0.0, epsilon = 1e-9);

        let world = m.camera_to_world(&[0.0, 1.0, 0.0]);
        assert_relative_eq!(world[0], -1.0, epsilon = 1e-9);
        assert_relative_eq!(world[1], 0.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_rotation_elements_match_formula() {
        let (y, p, r) = (326.5061_f64, 8.7828_f64, 0.0404_f64);
        let m = ypr_rotation_matrix(y, p, r);
        let (y, p, r) = (y.to_radians(), p.to_radians(), r.to_radians());
        assert_relative_eq!(m[0][0], r.cos() * p.cos(), epsilon = 1e-12);
        assert_relative_eq!(
            m[0][1],
            r.cos() * p.sin() * y.sin() - r.sin() * y.cos(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            m[1][2],
            r.sin() * p.sin() * y.cos() - y.cos() * r.sin(),
            epsilon = 1e-12
        );
        assert_relative_eq!(m[2][0], -p.sin(), epsilon = 1e-12);
        assert_relative_eq!(m[2][1], p.cos() * y.sin(), epsilon = 1e-12);
        assert_relative_eq!(m[2][2], p.cos() * y.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_proper_rotation_when_yaw_equals_roll() -> Result<(), CameraError> {
        for &(yaw, pitch, roll) in &[
            (0.0, 0.0, 0.0),
            (0.0, 45.0, 0.0),
            (25.0, 40.0, 25.0),
            (-130.0, 12.5, -130.0),
            (90.0, -80.0, 90.0),
            (10.0, 0.0, 190.0),
        ] {
            let m = build_extrinsic(params(yaw, pitch, roll))?;
            assert_relative_eq!(m.rotation_determinant(), 1.0, epsilon = 1e-6);
            assert!(m.orthonormality_error() < 1e-9);
            assert!(m.is_proper_rotation(1e-6));
        }
        Ok(())
    }

    #[test]
    fn test_roll_only_has_unit_determinant_but_is_not_orthonormal() -> Result<(), CameraError> {
        let m = build_extrinsic(params(0.0, 0.0, 45.0))?;
        assert_relative_eq!(m.rotation_determinant(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(m.orthonormality_error(), 0.5, epsilon = 1e-9);
        assert!(!m.is_proper_rotation(1e-6));
        Ok(())
    }

    #[test]
    fn test_kept_formula_is_not_proper_for_yaw_only() -> Result<(), CameraError> {
        let m = build_extrinsic(params(45.0, 0.0, 0.0))?;
        assert_relative_eq!(m.rotation_determinant(), 0.5, epsilon = 1e-9);
        assert!(!m.is_proper_rotation(1e-6));
        Ok(())
    }

    #[test]
    fn test_apply_uses_homogeneous_scale() -> Result<(), CameraError> {
        let m = build_extrinsic(CameraExtrinsicParams {
            x_t: 1.0,
            y_t: 2.0,
            z_t: 3.0,
            ..Default::default()
        })?;
        assert_eq!(m.apply(&[1.0, 1.0, 1.0, 1.0]), [2.0, 3.0, 4.0]);
        assert_eq!(m.apply(&[1.0, 1.0, 1.0, 0.0]), [1.0, 1.0, 1.0]);
        assert_eq!(m.apply(&[0.0, 0.0, 0.0, 2.0]), [2.0, 4.0, 6.0]);
        Ok(())
    }

    #[test]
    fn test_angles_wrap() -> Result<(), CameraError> {
        let a = build_extrinsic(params(30.0, 20.0, 10.0))?.to_array();
        let b = build_extrinsic(params(390.0, -340.0, 370.0))?.to_array();
        for i in 0..3 {
            for j in 0..4 {
                assert_relative_eq!(a[i][j], b[i][j], epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            build_extrinsic(params(f64::NAN, 0.0, 0.0)),
            Err(CameraError::InvalidParameter { name: "yaw", .. })
        ));
        let far = CameraExtrinsicParams {
            z_t: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            build_extrinsic(far),
            Err(CameraError::InvalidParameter { name: "z_t", .. })
        ));
    }

    #[test]
    fn test_from_map() {
        let mut map: HashMap<String, f64> = ["yaw", "pitch", "roll", "x_t", "y_t", "z_t"]
            .iter()
            .map(|k| (k.to_string(), 1.0))
            .collect();
        assert_eq!(
            CameraExtrinsicParams::try_from(&map),
            Ok(CameraExtrinsicParams {
                yaw: 1.0,
                pitch: 1.0,
                roll: 1.0,
                x_t: 1.0,
                y_t: 1.0,
                z_t: 1.0,
            })
        );
        map.remove("pitch");
        assert_eq!(
            CameraExtrinsicParams::try_from(&map),
            Err(CameraError::MissingField("pitch"))
        );
    }

    #[test]
    fn test_display_has_shape() -> Result<(), CameraError> {
        let text = build_extrinsic(params(10.0, 0.0, 10.0))?.to_string();
        assert!(text.starts_with("ExtrinsicMatrix (3x4)\n"));
        assert_eq!(text.lines().count(), 4);
        Ok(())
    }
}
