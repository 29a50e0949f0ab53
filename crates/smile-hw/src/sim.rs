//! Simulated shutter for development and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::camera::{CameraError, CameraFacing, Picture, Shutter};

/// In-memory shutter producing sequentially numbered picture URIs.
/// Stands in for the platform capture pipeline when the daemon runs
/// without real hardware.
#[derive(Debug, Default)]
pub struct SimShutter {
    counter: AtomicU64,
}

impl SimShutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pictures produced so far.
    pub fn shots(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Shutter for SimShutter {
    async fn take_picture(&self, facing: CameraFacing) -> Result<Picture, CameraError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let uri = format!("sim://{facing}/img_{n:04}.jpg");
        tracing::debug!(%uri, "simulated capture");
        Ok(Picture {
            uri,
            width: 1280,
            height: 720,
            exif: None,
            base64: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_each_capture_is_distinct() {
        let shutter = SimShutter::new();
        let a = shutter.take_picture(CameraFacing::Back).await.unwrap();
        let b = shutter.take_picture(CameraFacing::Back).await.unwrap();
        assert_ne!(a.uri, b.uri);
        assert_eq!(shutter.shots(), 2);
    }

    #[tokio::test]
    async fn test_uri_reflects_facing() {
        let shutter = SimShutter::new();
        let pic = shutter.take_picture(CameraFacing::Front).await.unwrap();
        assert!(pic.uri.starts_with("sim://front/"));
    }
}
