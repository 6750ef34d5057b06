use std::path::PathBuf;

/// Errors surfaced by scene construction, configuration and rendering
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// A geometry or camera parameter was out of range
    #[error("invalid {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A mesh was constructed without any material
    #[error("mesh requires at least one material")]
    MissingMaterial,

    /// A texture or model could not be read or decoded
    #[error("failed to load asset {path:?}: {message}")]
    AssetLoad { path: PathBuf, message: String },

    /// Configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// The render surface could not produce a frame
    #[error("render surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

pub type Result<T> = std::result::Result<T, SceneError>;

/// Require a finite, strictly positive value
pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidParameter {
            name,
            value: value as f64,
            reason: "must be finite and greater than zero",
        })
    }
}

/// Require a segment count that yields valid topology
pub(crate) fn segments(name: &'static str, value: u32) -> Result<u32> {
    if value >= 3 {
        Ok(value)
    } else {
        Err(SceneError::InvalidParameter {
            name,
            value: value as f64,
            reason: "at least 3 segments required",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_accepts_small_values() {
        assert_eq!(positive("size", 0.001).unwrap(), 0.001);
    }

    #[test]
    fn test_positive_rejects_zero_negative_and_nan() {
        assert!(positive("size", 0.0).is_err());
        assert!(positive("size", -1.0).is_err());
        assert!(positive("size", f32::NAN).is_err());
        assert!(positive("size", f32::INFINITY).is_err());
    }

    #[test]
    fn test_segments_lower_bound() {
        assert!(segments("radial_segments", 2).is_err());
        assert_eq!(segments("radial_segments", 3).unwrap(), 3);
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = positive("radius", -2.0).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("radius"));
        assert!(message.contains("-2"));
    }
}
