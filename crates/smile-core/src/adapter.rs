//! Face signal adapter: raw detection payload → [`FaceSample`].

use crate::types::{DetectionEvent, FaceSample};

/// Project a raw detection event onto the single smile signal.
///
/// Only the first reported face is considered; the rest are discarded
/// without arbitration. An empty face list is a normal sample, not an
/// error. The adapter never decides to trigger a capture — that is the
/// state machine's job.
pub fn project_sample(event: &DetectionEvent) -> FaceSample {
    match event.faces.first() {
        Some(face) => FaceSample::of(face.smiling_probability * 100.0),
        None => FaceSample::absent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectedFace;

    fn face(probability: f32) -> DetectedFace {
        DetectedFace {
            smiling_probability: probability,
            bounds: None,
        }
    }

    #[test]
    fn test_no_faces_yields_absent_sample() {
        let sample = project_sample(&DetectionEvent::default());
        assert!(!sample.present);
        assert_eq!(sample.smile_score, 0.0);
    }

    #[test]
    fn test_first_face_wins() {
        let event = DetectionEvent {
            faces: vec![face(0.2), face(0.9)],
        };
        let sample = project_sample(&event);
        assert!(sample.present);
        assert!((sample.smile_score - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_probability_scaled_to_percent() {
        let event = DetectionEvent { faces: vec![face(0.75)] };
        assert!((project_sample(&event).smile_score - 75.0).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_range_probability_clamped() {
        let event = DetectionEvent { faces: vec![face(1.4)] };
        assert_eq!(project_sample(&event).smile_score, 100.0);
    }
}
