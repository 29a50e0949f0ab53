//! Startup permission gate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PermissionError {
    #[error("camera permission denied")]
    CameraDenied,
    #[error("storage permission denied")]
    StorageDenied,
}

/// Camera and storage grants, resolved once at startup by the platform
/// layer. Either grant missing is fatal: the daemon refuses to run
/// rather than attempt captures it cannot complete or persist.
#[derive(Debug, Clone, Copy)]
pub struct PermissionGate {
    pub camera_granted: bool,
    pub storage_granted: bool,
}

impl PermissionGate {
    pub fn new(camera_granted: bool, storage_granted: bool) -> Self {
        Self {
            camera_granted,
            storage_granted,
        }
    }

    /// Check both grants, reporting the first missing one.
    pub fn require(&self) -> Result<(), PermissionError> {
        if !self.camera_granted {
            return Err(PermissionError::CameraDenied);
        }
        if !self.storage_granted {
            return Err(PermissionError::StorageDenied);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_granted() {
        assert!(PermissionGate::new(true, true).require().is_ok());
    }

    #[test]
    fn test_camera_denied_wins() {
        let err = PermissionGate::new(false, false).require().unwrap_err();
        assert!(matches!(err, PermissionError::CameraDenied));
    }

    #[test]
    fn test_storage_denied() {
        let err = PermissionGate::new(true, false).require().unwrap_err();
        assert!(matches!(err, PermissionError::StorageDenied));
    }
}
