//! Pixel to camera-frame transform built from image and sensor geometry.

use std::collections::HashMap;
use std::fmt;

use glam::DMat3;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, require, CameraError, CameraResult};
use crate::linalg;

/// Axis remap from image axes to the camera/vehicle convention, before focal scaling.
///
/// Swaps the x and y axes and negates both; z is kept.
pub const AXIS_REMAP: [[f64; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];

/// Image and sensor geometry of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsicParams {
    /// Image width in pixels
    #[serde(alias = "img_width")]
    pub image_width: u32,
    /// Image height in pixels
    #[serde(alias = "img_height")]
    pub image_height: u32,
    /// Width of the sensor array in millimeters
    #[serde(alias = "sen_width")]
    pub sensor_width: f64,
    /// Height of the sensor array in millimeters
    #[serde(alias = "sen_height")]
    pub sensor_height: f64,
    /// Focal length in millimeters
    pub focal_length: f64,
}

impl CameraIntrinsicParams {
    /// Check that every dimension is finite and strictly positive.
    pub fn validate(&self) -> CameraResult<()> {
        ensure_positive("image_width", self.image_width as f64)?;
        ensure_positive("image_height", self.image_height as f64)?;
        ensure_positive("sensor_width", self.sensor_width)?;
        ensure_positive("sensor_height", self.sensor_height)?;
        ensure_positive("focal_length", self.focal_length)?;
        Ok(())
    }

    /// Pixels per millimeter along x and y as `(fx, fy)`.
    pub fn pixels_per_mm(&self) -> (f64, f64) {
        (
            self.image_width as f64 / self.sensor_width,
            self.image_height as f64 / self.sensor_height,
        )
    }

    /// The principal point `(cx, cy)` in pixels, taken as the image centre.
    pub fn principal_point(&self) -> (f64, f64) {
        (
            self.image_width as f64 / 2.0,
            self.image_height as f64 / 2.0,
        )
    }
}

impl<S: std::hash::BuildHasher> TryFrom<&HashMap<String, f64, S>> for CameraIntrinsicParams {
    type Error = CameraError;

    /// Read the params from a map keyed by `img_width`, `img_height`, `sen_width`,
    /// `sen_height` and `focal_length`.
    fn try_from(map: &HashMap<String, f64, S>) -> Result<Self, Self::Error> {
        let params = Self {
            image_width: pixel_count("img_width", require(map, "img_width")?)?,
            image_height: pixel_count("img_height", require(map, "img_height")?)?,
            sensor_width: require(map, "sen_width")?,
            sensor_height: require(map, "sen_height")?,
            focal_length: require(map, "focal_length")?,
        };
        params.validate()?;
        Ok(params)
    }
}

fn pixel_count(name: &'static str, value: f64) -> CameraResult<u32> {
    ensure_finite(name, value)?;
    if value <= 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(CameraError::InvalidParameter {
            name,
            value,
            reason: "must be a positive whole number of pixels",
        });
    }
    Ok(value as u32)
}

/// A 3x3 matrix mapping homogeneous pixel coordinates `(u, v, 1)` to camera-frame coordinates.
///
/// The result is not normalized by a scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicMatrix(DMat3);

impl IntrinsicMatrix {
    /// The matrix as a row-major array.
    pub fn to_array(&self) -> [[f64; 3]; 3] {
        linalg::mat3_to_rows(&self.0)
    }

    /// The underlying glam matrix.
    pub fn as_mat3(&self) -> &DMat3 {
        &self.0
    }

    /// Multiply the matrix with a homogeneous pixel coordinate.
    pub fn apply(&self, pixel: &[f64; 3]) -> [f64; 3] {
        linalg::mat3_mul_vec3(&self.0, pixel)
    }

    /// Map the pixel `(u, v)` to camera-frame coordinates.
    pub fn pixel_to_camera(&self, u: f64, v: f64) -> [f64; 3] {
        self.apply(&[u, v, 1.0])
    }
}

impl fmt::Display for IntrinsicMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IntrinsicMatrix (3x3)")?;
        linalg::write_rows(f, &self.to_array())
    }
}

/// Compute the matrix taking pixel coordinates to a camera ray on the sensor.
///
/// # Arguments
///
/// * `params` - The image and sensor geometry.
///
/// # Returns
///
/// `[[1/fx, 0, -cx/fx], [0, 1/fy, -cy/fy], [0, 0, 1]]` as a row-major array.
pub fn pixel_to_ray_matrix(params: &CameraIntrinsicParams) -> CameraResult<[[f64; 3]; 3]> {
    params.validate()?;
    let (fx, fy) = params.pixels_per_mm();
    let (cx, cy) = params.principal_point();
    let k = [
        [1.0 / fx, 0.0, -cx / fx],
        [0.0, 1.0 / fy, -cy / fy],
        [0.0, 0.0, 1.0],
    ];
    ensure_finite_row("sensor_width", params.sensor_width, &k[0])?;
    ensure_finite_row("sensor_height", params.sensor_height, &k[1])?;
    Ok(k)
}

fn ensure_finite_row(name: &'static str, value: f64, row: &[f64; 3]) -> CameraResult<()> {
    if row.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(CameraError::InvalidParameter {
        name,
        value,
        reason: "produces a non-finite intrinsic matrix",
    })
}

/// Build the intrinsic matrix of a camera.
///
/// The pixel-to-ray matrix `K` is followed by the focal-scaled [`AXIS_REMAP`],
/// giving `focal_length * AXIS_REMAP * K`.
///
/// # Arguments
///
/// * `params` - The image and sensor geometry.
///
/// # Errors
///
/// [`CameraError::InvalidParameter`] when a dimension is zero, negative or not finite,
/// or when the dimensions are so extreme that the matrix overflows.
///
/// Example:
///
/// ```
/// use camtf::intrinsic::{build_intrinsic, CameraIntrinsicParams};
///
/// let params = CameraIntrinsicParams {
///     image_width: 1920,
///     image_height: 1080,
///     sensor_width: 5.18,
///     sensor_height: 3.89,
///     focal_length: 3.93,
/// };
/// let k = build_intrinsic(params).unwrap();
/// assert_eq!(k.to_array()[2][2], 3.93);
/// ```
pub fn build_intrinsic(params: CameraIntrinsicParams) -> CameraResult<IntrinsicMatrix> {
    let ray = pixel_to_ray_matrix(&params)?;
    let k = linalg::mat3_from_rows(&ray);
    let remap = linalg::mat3_from_rows(&AXIS_REMAP) * params.focal_length;

    let matrix = IntrinsicMatrix(remap * k);
    // the axis remap swaps rows: row 0 scales the y ray row, row 1 the x ray row
    let rows = matrix.to_array();
    for (row, (ray_row, name, value)) in rows.iter().zip([
        (&ray[1], "sensor_height", params.sensor_height),
        (&ray[0], "sensor_width", params.sensor_width),
        (&ray[2], "focal_length", params.focal_length),
    ]) {
        let ray_max = ray_row.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if ray_max >= params.focal_length {
            ensure_finite_row(name, value, row)?;
        } else {
            ensure_finite_row("focal_length", params.focal_length, row)?;
        }
    }

    log::debug!("built intrinsic matrix from {params:?}: {rows:?}");
    Ok(matrix)
}
