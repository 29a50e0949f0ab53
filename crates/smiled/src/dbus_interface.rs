use zbus::interface;

use smile_core::DetectionEvent;

use crate::engine::{ControllerError, ControllerHandle};

/// D-Bus interface for the BigSMILE capture daemon.
///
/// Bus name: org.bigsmile.Camera1
/// Object path: /org/bigsmile/Camera1
pub struct CameraService {
    handle: ControllerHandle,
}

impl CameraService {
    pub fn new(handle: ControllerHandle) -> Self {
        Self { handle }
    }
}

#[interface(name = "org.bigsmile.Camera1")]
impl CameraService {
    /// Set the smile-trigger threshold (clamped to 0–100); returns the
    /// stored value.
    async fn set_threshold(&self, value: i32) -> zbus::fdo::Result<u8> {
        self.handle.set_threshold(value).await.map_err(to_fdo)
    }

    /// Confirm the capture awaiting user review. Returns false if no
    /// capture was pending.
    async fn confirm_save(&self) -> zbus::fdo::Result<bool> {
        self.handle.confirm_save().await.map_err(to_fdo)
    }

    /// Discard the capture awaiting user review. Returns false if no
    /// capture was pending.
    async fn cancel_save(&self) -> zbus::fdo::Result<bool> {
        self.handle.cancel_save().await.map_err(to_fdo)
    }

    /// Toggle between back and front camera; returns the new facing.
    async fn flip_facing(&self) -> zbus::fdo::Result<String> {
        let facing = self.handle.flip_facing().await.map_err(to_fdo)?;
        Ok(facing.to_string())
    }

    /// Feed one face-detection frame, JSON-encoded as
    /// `{"faces":[{"smilingProbability":0.0..1.0}]}`. Fire-and-forget:
    /// frames arriving while a capture is in flight may be dropped.
    async fn push_detection(&self, payload: &str) -> zbus::fdo::Result<()> {
        let event: DetectionEvent = serde_json::from_str(payload)
            .map_err(|e| zbus::fdo::Error::InvalidArgs(format!("bad detection payload: {e}")))?;
        if !self.handle.push_detection(event) {
            tracing::debug!("detection frame dropped (controller busy)");
        }
        Ok(())
    }

    /// Return a JSON status snapshot.
    async fn status(&self) -> zbus::fdo::Result<String> {
        let snapshot = self.handle.status().await.map_err(to_fdo)?;
        serde_json::to_string(&snapshot)
            .map_err(|e| zbus::fdo::Error::Failed(format!("status serialization: {e}")))
    }
}

fn to_fdo(err: ControllerError) -> zbus::fdo::Error {
    zbus::fdo::Error::Failed(err.to_string())
}
