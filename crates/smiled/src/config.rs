use smile_core::SavePolicy;

/// Target album for every saved capture. Fixed at build time; the
/// album is created lazily on the first successful save.
pub const ALBUM_NAME: &str = "BigSMILE";

/// Daemon configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// What happens after a successful capture: `auto` or `confirm`.
    pub save_policy: SavePolicy,
    /// Timeout in seconds for one shutter actuation.
    pub capture_timeout_secs: u64,
    /// Timeout in seconds for one album save.
    pub save_timeout_secs: u64,
    /// Camera permission grant, resolved by the platform layer.
    pub camera_granted: bool,
    /// Storage permission grant, resolved by the platform layer.
    pub storage_granted: bool,
    /// Detection-channel depth; frames beyond it are dropped.
    pub detection_queue: usize,
}

impl Config {
    /// Load configuration from `SMILE_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        let save_policy = match std::env::var("SMILE_SAVE_POLICY") {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to confirm-gated save policy");
                SavePolicy::ConfirmGated
            }),
            Err(_) => SavePolicy::ConfirmGated,
        };

        Self {
            save_policy,
            capture_timeout_secs: env_u64("SMILE_CAPTURE_TIMEOUT_SECS", 10),
            save_timeout_secs: env_u64("SMILE_SAVE_TIMEOUT_SECS", 10),
            camera_granted: env_bool("SMILE_CAMERA_GRANTED", true),
            storage_granted: env_bool("SMILE_STORAGE_GRANTED", true),
            detection_queue: env_usize("SMILE_DETECTION_QUEUE", 16),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_policy: SavePolicy::ConfirmGated,
            capture_timeout_secs: 10,
            save_timeout_secs: 10,
            camera_granted: true,
            storage_granted: true,
            detection_queue: 16,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).map(|v| v != "0").unwrap_or(default)
}
