use thiserror::Error;

/// Error types for camera parameter handling.
#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    /// A required parameter key is absent from a key/value parameter map.
    #[error("Missing required camera parameter `{0}`")]
    MissingField(&'static str),

    /// A parameter value would divide by zero or yield a non-finite matrix.
    #[error("Invalid camera parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// Value that was supplied
        value: f64,
        /// Why the value was rejected
        reason: &'static str,
    },
}

/// Result type for camera operations.
pub type CameraResult<T> = Result<T, CameraError>;

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> CameraResult<()> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(CameraError::InvalidParameter {
            name,
            value,
            reason: "must be strictly positive",
        });
    }
    Ok(())
}

/// Fails unless `value` is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> CameraResult<()> {
    if !value.is_finite() {
        return Err(CameraError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    Ok(())
}

/// Looks up `key` in a loosely-typed parameter map.
pub(crate) fn require<S: std::hash::BuildHasher>(
    map: &std::collections::HashMap<String, f64, S>,
    key: &'static str,
) -> CameraResult<f64> {
    map.get(key).copied().ok_or(CameraError::MissingField(key))
}
