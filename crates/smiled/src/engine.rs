//! The capture controller engine.
//!
//! A single spawned task owns all mutable state — threshold, the
//! active capture session, camera facing — and serializes every
//! external input through one request channel. Detection frames are
//! pushed fire-and-forget; request/reply operations carry a oneshot
//! sender. Capture and save are awaited inline, so a second session
//! can never start while one is unresolved.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use smile_core::{
    project_sample, CaptureSession, DetectionEvent, Effect, ImageRef, SavePolicy, SessionEvent,
    SessionStatus, ThresholdStore,
};
use smile_hw::{CameraFacing, Shutter};
use smile_media::{AlbumSaver, MediaStore};

use crate::config::{Config, ALBUM_NAME};

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("controller task exited")]
    ChannelClosed,
}

/// Point-in-time view of the controller, serialized for the status
/// interface.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub session: SessionStatus,
    pub threshold: u8,
    pub facing: CameraFacing,
    pub policy: SavePolicy,
    pub album: String,
    pub last_failure: Option<String>,
}

/// Messages sent from the IPC surface to the controller task.
enum ControllerRequest {
    Detection(DetectionEvent),
    SetThreshold {
        value: i32,
        reply: oneshot::Sender<u8>,
    },
    Confirm {
        reply: oneshot::Sender<bool>,
    },
    Cancel {
        reply: oneshot::Sender<bool>,
    },
    FlipFacing {
        reply: oneshot::Sender<CameraFacing>,
    },
    Status {
        reply: oneshot::Sender<StatusSnapshot>,
    },
}

/// Clone-safe handle to the controller task.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::Sender<ControllerRequest>,
}

impl ControllerHandle {
    /// Push one detection frame. Fire-and-forget: if the controller is
    /// busy (capture or save in flight) and the queue is full, the
    /// frame is dropped — that is the backpressure policy, not an
    /// error. Returns whether the frame was accepted.
    pub fn push_detection(&self, event: DetectionEvent) -> bool {
        self.tx.try_send(ControllerRequest::Detection(event)).is_ok()
    }

    /// Set the smile-trigger threshold; returns the clamped value.
    pub async fn set_threshold(&self, value: i32) -> Result<u8, ControllerError> {
        self.request(|reply| ControllerRequest::SetThreshold { value, reply })
            .await
    }

    /// Confirm the pending capture. Returns false if nothing was
    /// awaiting confirmation.
    pub async fn confirm_save(&self) -> Result<bool, ControllerError> {
        self.request(|reply| ControllerRequest::Confirm { reply }).await
    }

    /// Discard the pending capture without persisting it. Returns
    /// false if nothing was awaiting confirmation.
    pub async fn cancel_save(&self) -> Result<bool, ControllerError> {
        self.request(|reply| ControllerRequest::Cancel { reply }).await
    }

    /// Toggle between the back and front camera; returns the new
    /// facing.
    pub async fn flip_facing(&self) -> Result<CameraFacing, ControllerError> {
        self.request(|reply| ControllerRequest::FlipFacing { reply })
            .await
    }

    pub async fn status(&self) -> Result<StatusSnapshot, ControllerError> {
        self.request(|reply| ControllerRequest::Status { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> ControllerRequest,
    ) -> Result<T, ControllerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| ControllerError::ChannelClosed)
    }
}

/// Spawn the controller task.
pub fn spawn_engine(
    config: Config,
    shutter: Arc<dyn Shutter>,
    store: Arc<dyn MediaStore>,
) -> ControllerHandle {
    let (tx, rx) = mpsc::channel(config.detection_queue);

    let engine = Engine {
        session: CaptureSession::new(config.save_policy),
        threshold: ThresholdStore::new(),
        facing: CameraFacing::Back,
        shutter,
        saver: AlbumSaver::new(store, ALBUM_NAME),
        capture_timeout: Duration::from_secs(config.capture_timeout_secs),
        save_timeout: Duration::from_secs(config.save_timeout_secs),
        last_failure: None,
    };

    tokio::spawn(engine.run(rx));

    ControllerHandle { tx }
}

struct Engine {
    session: CaptureSession,
    threshold: ThresholdStore,
    facing: CameraFacing,
    shutter: Arc<dyn Shutter>,
    saver: AlbumSaver,
    capture_timeout: Duration,
    save_timeout: Duration,
    last_failure: Option<String>,
}

impl Engine {
    async fn run(mut self, mut rx: mpsc::Receiver<ControllerRequest>) {
        tracing::info!(
            policy = ?self.session.policy(),
            album = ALBUM_NAME,
            "controller started"
        );
        while let Some(req) = rx.recv().await {
            self.handle(req).await;
            // Terminal states always return to Idle, success and
            // failure alike; a controller stuck non-Idle can never
            // capture again.
            if self.finish_if_terminal() {
                self.flush_stale_frames(&mut rx).await;
            }
        }
        tracing::info!("controller exiting");
    }

    /// Discard detection frames that queued up while the session was
    /// in flight: they belong to the smile episode that just resolved,
    /// and replaying them would fire one capture per frame. Queued
    /// non-detection requests are handled in arrival order; none of
    /// them can start a capture.
    async fn flush_stale_frames(&mut self, rx: &mut mpsc::Receiver<ControllerRequest>) {
        let mut deferred = Vec::new();
        let mut dropped = 0usize;
        while let Ok(req) = rx.try_recv() {
            match req {
                ControllerRequest::Detection(_) => dropped += 1,
                other => deferred.push(other),
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "stale detection frames discarded");
        }
        for req in deferred {
            self.handle(req).await;
        }
    }

    async fn handle(&mut self, req: ControllerRequest) {
        match req {
            ControllerRequest::Detection(event) => {
                let sample = project_sample(&event);
                let threshold = self.threshold.get();
                let effects = self.session.apply(SessionEvent::Sample { sample, threshold });
                self.run_effects(effects).await;
            }
            ControllerRequest::SetThreshold { value, reply } => {
                let clamped = self.threshold.set(value);
                tracing::info!(threshold = clamped, "threshold updated");
                let _ = reply.send(clamped);
            }
            ControllerRequest::Confirm { reply } => {
                let accepted = self.session.status() == SessionStatus::AwaitingConfirm;
                let effects = self.session.apply(SessionEvent::Confirm);
                self.run_effects(effects).await;
                let _ = reply.send(accepted);
            }
            ControllerRequest::Cancel { reply } => {
                let accepted = self.session.status() == SessionStatus::AwaitingConfirm;
                let effects = self.session.apply(SessionEvent::Cancel);
                self.run_effects(effects).await;
                let _ = reply.send(accepted);
            }
            ControllerRequest::FlipFacing { reply } => {
                self.facing = self.facing.flipped();
                tracing::info!(facing = %self.facing, "camera flipped");
                let _ = reply.send(self.facing);
            }
            ControllerRequest::Status { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Execute requested effects, feeding each outcome back into the
    /// reducer until it settles.
    async fn run_effects(&mut self, effects: Vec<Effect>) {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            let outcome = match effect {
                Effect::StartCapture => self.do_capture().await,
                Effect::StartSave(image) => self.do_save(image).await,
            };
            queue.extend(self.session.apply(outcome));
        }
    }

    async fn do_capture(&self) -> SessionEvent {
        match timeout(self.capture_timeout, self.shutter.take_picture(self.facing)).await {
            Ok(Ok(picture)) => {
                tracing::info!(
                    uri = %picture.uri,
                    width = picture.width,
                    height = picture.height,
                    "picture captured"
                );
                SessionEvent::CaptureSucceeded(ImageRef::new(picture.uri))
            }
            Ok(Err(err)) => SessionEvent::CaptureFailed {
                reason: err.to_string(),
            },
            Err(_) => SessionEvent::CaptureFailed {
                reason: format!("capture timed out after {}s", self.capture_timeout.as_secs()),
            },
        }
    }

    async fn do_save(&self, image: ImageRef) -> SessionEvent {
        match timeout(self.save_timeout, self.saver.save(&image)).await {
            Ok(Ok(asset)) => {
                tracing::info!(asset_id = %asset.id, album = ALBUM_NAME, "capture saved");
                SessionEvent::SaveSucceeded
            }
            Ok(Err(err)) => SessionEvent::SaveFailed {
                reason: err.to_string(),
            },
            Err(_) => SessionEvent::SaveFailed {
                reason: format!("save timed out after {}s", self.save_timeout.as_secs()),
            },
        }
    }

    /// Returns whether a session resolved and was reset.
    fn finish_if_terminal(&mut self) -> bool {
        let status = self.session.status();
        if !status.is_terminal() {
            return false;
        }
        match status {
            SessionStatus::Completed => tracing::info!("capture session completed"),
            SessionStatus::Discarded => tracing::info!("capture discarded by user"),
            SessionStatus::Failed => {
                let reason = self
                    .session
                    .failure()
                    .map(|f| f.reason.clone())
                    .unwrap_or_else(|| "unknown failure".into());
                tracing::warn!(%reason, "capture session failed; resetting");
                self.last_failure = Some(reason);
            }
            _ => {}
        }
        self.session.reset();
        true
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            session: self.session.status(),
            threshold: self.threshold.get(),
            facing: self.facing,
            policy: self.session.policy(),
            album: ALBUM_NAME.to_string(),
            last_failure: self.last_failure.clone(),
        }
    }
}
