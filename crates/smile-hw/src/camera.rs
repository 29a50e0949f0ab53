//! Camera shutter seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("device busy")]
    DeviceBusy,
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("hardware unavailable: {0}")]
    Unavailable(String),
}

/// Which lens the next capture uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Back,
    Front,
}

impl CameraFacing {
    pub fn flipped(self) -> Self {
        match self {
            Self::Back => Self::Front,
            Self::Front => Self::Back,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Back => "back",
            Self::Front => "front",
        })
    }
}

/// Result of one shutter actuation.
///
/// The engine keeps only `uri`; the remaining fields pass through for
/// callers that want them (previews, EXIF display).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub uri: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub exif: Option<serde_json::Value>,
    #[serde(default)]
    pub base64: Option<String>,
}

/// Async shutter: engages the camera hardware for shutter + encode and
/// resolves with a freshly produced picture.
///
/// Every call yields a distinct picture; implementations must not
/// retry internally — failure handling belongs to the session state
/// machine.
#[async_trait]
pub trait Shutter: Send + Sync {
    async fn take_picture(&self, facing: CameraFacing) -> Result<Picture, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_round_trip() {
        assert_eq!(CameraFacing::Back.flipped(), CameraFacing::Front);
        assert_eq!(CameraFacing::Back.flipped().flipped(), CameraFacing::Back);
    }

    #[test]
    fn test_facing_display() {
        assert_eq!(CameraFacing::Front.to_string(), "front");
    }
}
