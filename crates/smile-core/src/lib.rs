//! smile-core — Smile-triggered capture logic.
//!
//! Projects raw face-detection payloads onto a single smile signal and
//! runs the capture-session state machine as a pure reducer. No I/O
//! happens in this crate; side effects are described as [`Effect`]
//! values for the hosting engine to execute.

pub mod adapter;
pub mod session;
pub mod threshold;
pub mod types;

pub use adapter::project_sample;
pub use session::{CaptureSession, Effect, SavePolicy, SessionEvent, SessionStatus};
pub use threshold::{ThresholdStore, DEFAULT_THRESHOLD};
pub use types::{DetectedFace, DetectionEvent, FaceSample, ImageRef};
