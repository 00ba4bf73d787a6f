#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for parameter validation.
pub mod error;

/// Extrinsic matrix construction from yaw, pitch, roll and translation.
pub mod extrinsic;

/// Intrinsic matrix construction from image and sensor geometry.
pub mod intrinsic;

/// Fixed-size linear algebra helpers.
pub mod linalg;

/// Composition of the intrinsic and extrinsic transforms.
pub mod transform;

pub use error::{CameraError, CameraResult};
pub use extrinsic::{build_extrinsic, CameraExtrinsicParams, ExtrinsicMatrix};
pub use intrinsic::{build_intrinsic, CameraIntrinsicParams, IntrinsicMatrix};
pub use transform::{pixel_to_world, ProjectionStages};
