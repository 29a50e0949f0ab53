//! Smile-trigger threshold store.

/// Default trigger threshold (percent).
pub const DEFAULT_THRESHOLD: u8 = 50;

/// The current smile-trigger threshold in [0, 100].
///
/// Single writer (the UI surface), read synchronously by the state
/// machine on every sample. Not persisted across runs.
#[derive(Debug, Clone)]
pub struct ThresholdStore {
    value: u8,
}

impl ThresholdStore {
    pub fn new() -> Self {
        Self {
            value: DEFAULT_THRESHOLD,
        }
    }

    pub fn get(&self) -> u8 {
        self.value
    }

    /// Set the threshold, clamping to [0, 100]. The range control is
    /// expected to stay in range already; the clamp guards the IPC path.
    pub fn set(&mut self, value: i32) -> u8 {
        self.value = value.clamp(0, 100) as u8;
        self.value
    }
}

impl Default for ThresholdStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fifty() {
        assert_eq!(ThresholdStore::new().get(), 50);
    }

    #[test]
    fn test_set_in_range() {
        let mut store = ThresholdStore::new();
        assert_eq!(store.set(72), 72);
        assert_eq!(store.get(), 72);
    }

    #[test]
    fn test_set_clamps_out_of_range() {
        let mut store = ThresholdStore::new();
        assert_eq!(store.set(180), 100);
        assert_eq!(store.set(-30), 0);
    }
}
