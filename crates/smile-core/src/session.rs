//! Capture-session state machine.
//!
//! A pure reducer: `CaptureSession::apply(event)` mutates the session
//! and returns the side effects the hosting engine must execute
//! (start a capture, start a save). Nothing here touches hardware or
//! storage, so every transition is unit-testable deterministically.

use serde::{Deserialize, Serialize};

use crate::types::{FaceSample, ImageRef};

/// What happens after a successful capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavePolicy {
    /// Persist immediately, no user interaction.
    AutoSave,
    /// Hold the image in `AwaitingConfirm` until the user confirms or
    /// cancels.
    ConfirmGated,
}

impl std::str::FromStr for SavePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" | "auto-save" => Ok(Self::AutoSave),
            "confirm" | "confirm-gated" => Ok(Self::ConfirmGated),
            other => Err(format!("unknown save policy: {other}")),
        }
    }
}

/// Lifecycle of one capture attempt, trigger through resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Triggered,
    Captured,
    AwaitingConfirm,
    Saving,
    Completed,
    Discarded,
    Failed,
}

impl SessionStatus {
    /// Terminal states must be followed by an unconditional reset to
    /// `Idle`; a controller stuck anywhere else can never capture again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Discarded | Self::Failed)
    }
}

/// Which stage of the session produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Capture,
    Persistence,
}

/// Recorded failure detail, cleared on reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFailure {
    pub kind: FailureKind,
    pub reason: String,
}

/// Inputs to the reducer. Samples carry the threshold read at delivery
/// time so the transition function stays a pure function of its
/// arguments.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Sample { sample: FaceSample, threshold: u8 },
    CaptureSucceeded(ImageRef),
    CaptureFailed { reason: String },
    Confirm,
    Cancel,
    SaveSucceeded,
    SaveFailed { reason: String },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartCapture,
    StartSave(ImageRef),
}

/// One in-flight capture attempt. At most one session is ever active;
/// the debounce rule below is what enforces it.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    status: SessionStatus,
    policy: SavePolicy,
    image_ref: Option<ImageRef>,
    failure: Option<SessionFailure>,
}

impl CaptureSession {
    pub fn new(policy: SavePolicy) -> Self {
        Self {
            status: SessionStatus::Idle,
            policy,
            image_ref: None,
            failure: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn policy(&self) -> SavePolicy {
        self.policy
    }

    pub fn image_ref(&self) -> Option<&ImageRef> {
        self.image_ref.as_ref()
    }

    pub fn failure(&self) -> Option<&SessionFailure> {
        self.failure.as_ref()
    }

    /// Apply one event, returning the effects to execute.
    ///
    /// Samples are acted on only while `Idle`; a face held mid-smile
    /// across many frames therefore yields exactly one capture per
    /// smile episode. The trigger comparator is strict `>`: a score
    /// exactly equal to the threshold does not fire.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::Sample { sample, threshold } => self.on_sample(sample, threshold),
            SessionEvent::CaptureSucceeded(image) => self.on_capture_succeeded(image),
            SessionEvent::CaptureFailed { reason } => {
                self.on_failure(SessionStatus::Triggered, FailureKind::Capture, reason)
            }
            SessionEvent::Confirm => self.on_confirm(),
            SessionEvent::Cancel => self.on_cancel(),
            SessionEvent::SaveSucceeded => self.on_save_succeeded(),
            SessionEvent::SaveFailed { reason } => {
                self.on_failure(SessionStatus::Saving, FailureKind::Persistence, reason)
            }
        }
    }

    /// Return to `Idle`, clearing the image reference and failure
    /// record. Called unconditionally by the engine after any terminal
    /// state; without it the controller deadlocks non-`Idle` forever.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Idle;
        self.image_ref = None;
        self.failure = None;
    }

    fn on_sample(&mut self, sample: FaceSample, threshold: u8) -> Vec<Effect> {
        if self.status != SessionStatus::Idle {
            // Debounce: everything after the trigger is dropped until
            // the session resolves.
            return Vec::new();
        }
        if sample.present && sample.smile_score > f32::from(threshold) {
            tracing::debug!(score = sample.smile_score, threshold, "smile trigger");
            self.status = SessionStatus::Triggered;
            vec![Effect::StartCapture]
        } else {
            Vec::new()
        }
    }

    fn on_capture_succeeded(&mut self, image: ImageRef) -> Vec<Effect> {
        if self.status != SessionStatus::Triggered {
            return self.ignore("CaptureSucceeded");
        }
        self.status = SessionStatus::Captured;
        self.image_ref = Some(image.clone());
        match self.policy {
            SavePolicy::AutoSave => {
                self.status = SessionStatus::Saving;
                vec![Effect::StartSave(image)]
            }
            SavePolicy::ConfirmGated => {
                self.status = SessionStatus::AwaitingConfirm;
                Vec::new()
            }
        }
    }

    fn on_confirm(&mut self) -> Vec<Effect> {
        if self.status != SessionStatus::AwaitingConfirm {
            return self.ignore("Confirm");
        }
        match self.image_ref.clone() {
            Some(image) => {
                self.status = SessionStatus::Saving;
                vec![Effect::StartSave(image)]
            }
            None => {
                // Unreachable by construction; fail the session rather
                // than panic so the reset discipline still applies.
                self.status = SessionStatus::Failed;
                self.failure = Some(SessionFailure {
                    kind: FailureKind::Capture,
                    reason: "confirm with no captured image".into(),
                });
                Vec::new()
            }
        }
    }

    fn on_cancel(&mut self) -> Vec<Effect> {
        if self.status != SessionStatus::AwaitingConfirm {
            return self.ignore("Cancel");
        }
        // The captured image is dropped without ever touching storage.
        self.status = SessionStatus::Discarded;
        Vec::new()
    }

    fn on_save_succeeded(&mut self) -> Vec<Effect> {
        if self.status != SessionStatus::Saving {
            return self.ignore("SaveSucceeded");
        }
        self.status = SessionStatus::Completed;
        Vec::new()
    }

    fn on_failure(
        &mut self,
        expected: SessionStatus,
        kind: FailureKind,
        reason: String,
    ) -> Vec<Effect> {
        if self.status != expected {
            return self.ignore("failure event");
        }
        tracing::warn!(?kind, %reason, "capture session failed");
        self.status = SessionStatus::Failed;
        self.failure = Some(SessionFailure { kind, reason });
        Vec::new()
    }

    fn ignore(&self, event: &str) -> Vec<Effect> {
        tracing::debug!(status = ?self.status, event, "event ignored in current state");
        Vec::new()
    }
}
