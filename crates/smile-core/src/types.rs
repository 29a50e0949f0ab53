use serde::{Deserialize, Serialize};

/// One face reported by the external detector.
///
/// The provider payload carries many landmark fields; only the smiling
/// probability matters here, so everything else is left to serde's
/// unknown-field handling. Bounds are kept for debug logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    /// Smiling confidence in [0.0, 1.0] as reported by the detector.
    pub smiling_probability: f32,
    #[serde(default)]
    pub bounds: Option<FaceBounds>,
}

/// Face bounding box in frame coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FaceBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One detection callback from the external face detector: zero or more
/// faces in provider-defined order, delivered at the camera frame rate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionEvent {
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

/// The per-frame smile signal the state machine consumes.
///
/// Ephemeral: evaluated once against the current threshold, never
/// retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSample {
    pub present: bool,
    /// Smile confidence as a percentage in [0.0, 100.0].
    pub smile_score: f32,
}

impl FaceSample {
    /// A sample with a face present, score clamped to [0, 100].
    pub fn of(smile_score: f32) -> Self {
        Self {
            present: true,
            smile_score: smile_score.clamp(0.0, 100.0),
        }
    }

    /// The no-face sample. Not a failure: an empty frame is normal.
    pub fn absent() -> Self {
        Self {
            present: false,
            smile_score: 0.0,
        }
    }
}

/// Opaque handle to a captured photograph.
///
/// Produced by the shutter, carried by the session, consumed by album
/// persistence. The core never inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_clamps_score() {
        assert_eq!(FaceSample::of(130.0).smile_score, 100.0);
        assert_eq!(FaceSample::of(-5.0).smile_score, 0.0);
    }

    #[test]
    fn test_absent_sample_is_zero() {
        let s = FaceSample::absent();
        assert!(!s.present);
        assert_eq!(s.smile_score, 0.0);
    }

    #[test]
    fn test_detection_event_tolerates_extra_fields() {
        // Provider payloads carry landmark data the core ignores.
        let json = r#"{"faces":[{"smilingProbability":0.8,"rollAngle":3.2,
            "bounds":{"x":10.0,"y":20.0,"width":100.0,"height":100.0}}]}"#;
        let event: DetectionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.faces.len(), 1);
        assert!((event.faces[0].smiling_probability - 0.8).abs() < 1e-6);
        assert!(event.faces[0].bounds.is_some());
    }

    #[test]
    fn test_detection_event_empty_payload() {
        let event: DetectionEvent = serde_json::from_str("{}").unwrap();
        assert!(event.faces.is_empty());
    }
}
