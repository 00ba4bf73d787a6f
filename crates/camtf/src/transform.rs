use crate::error::{ensure_finite, CameraResult};
use crate::extrinsic::ExtrinsicMatrix;
use crate::intrinsic::IntrinsicMatrix;
use crate::linalg;

/// The intermediate vectors of a pixel to world mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionStages {
    /// Homogeneous pixel coordinate `(u, v, 1)`
    pub pixel: [f64; 3],
    /// Camera-frame coordinate
    pub camera: [f64; 3],
    /// Camera-frame coordinate with the homogeneous `1` appended
    pub camera_homogeneous: [f64; 4],
    /// World-frame coordinate
    pub world: [f64; 3],
}

/// Map a pixel through the intrinsic and then the extrinsic matrix.
///
/// # Arguments
///
/// * `intrinsic` - The pixel to camera transform.
/// * `extrinsic` - The camera to world transform.
/// * `u` - The pixel column.
/// * `v` - The pixel row.
///
/// # Returns
///
/// Every stage of the mapping, ending in world coordinates.
///
/// # Errors
///
/// [`crate::CameraError::InvalidParameter`] when `u` or `v` is not finite.
pub fn pixel_to_world(
    intrinsic: &IntrinsicMatrix,
    extrinsic: &ExtrinsicMatrix,
    u: f64,
    v: f64,
) -> CameraResult<ProjectionStages> {
    ensure_finite("u", u)?;
    ensure_finite("v", v)?;

    let pixel = [u, v, 1.0];
    let camera = intrinsic.apply(&pixel);
    let camera_homogeneous = linalg::to_homogeneous(&camera);
    let world = extrinsic.apply(&camera_homogeneous);
    Ok(ProjectionStages {
        pixel,
        camera,
        camera_homogeneous,
        world,
    })
}
