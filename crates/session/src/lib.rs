//! The shared map session: one engine instance, its mount point, and the
//! camera commands every UI consumer goes through.
//!
//! The engine itself is an external collaborator reached through the
//! [`MapEngine`] trait. Browser hosts bind it to Mapbox GL; tests and the CLI
//! use [`RecordingEngine`].

pub mod camera;
pub mod config;
pub mod control;
pub mod engine;
pub mod recording;
pub mod session;

pub use camera::*;
pub use config::*;
pub use control::*;
pub use engine::*;
pub use recording::*;
pub use session::*;
