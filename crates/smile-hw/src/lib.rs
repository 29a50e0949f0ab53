//! smile-hw — Hardware seam for the BigSMILE camera.
//!
//! The real camera pipeline lives outside this workspace; the engine
//! only needs an async shutter it can point at and fire. This crate
//! defines that seam, the facing toggle, the startup permission gate,
//! and a simulated shutter for development and tests.

pub mod camera;
pub mod permissions;
pub mod sim;

pub use camera::{CameraError, CameraFacing, Picture, Shutter};
pub use permissions::{PermissionError, PermissionGate};
pub use sim::SimShutter;
