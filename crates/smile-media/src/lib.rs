//! smile-media — Album persistence for captured photographs.
//!
//! The storage subsystem (the platform media library) is reached
//! through the [`MediaStore`] trait; [`AlbumSaver`] layers the
//! create-asset / find-or-create-album algorithm on top of it and is
//! the only writer the daemon uses. An in-memory backend backs tests
//! and hardware-free runs.

pub mod album;
pub mod error;
pub mod memory;
pub mod store;

pub use album::AlbumSaver;
pub use error::{PersistenceError, StoreError};
pub use memory::MemoryStore;
pub use store::{Album, Asset, MediaStore};
