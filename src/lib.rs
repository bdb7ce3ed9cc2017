//! # PersonalKnowledgeRAG (library root)
//!
//! A small personalized knowledge assistant. Users pick an expertise level and a
//! response style; questions are expanded for the user's level, matched against
//! an in-memory vector collection, and answered in the user's style.
//!
//! The answer itself is a fixed placeholder sentence: the crate builds the full
//! generation prompt but does not call a model. See [`personalizer::Responder`]
//! for the seam where one would go.
//!
//! Everything lives for one process. There is no persistence.
//!
//! ## Modules
//! - [`session`]: the session context tying everything together.
//! - [`profile`], [`interaction`]: user preference state and the interaction log.
//! - [`document_store`], [`embeddings`]: the vector collection.
//! - [`personalizer`], [`template`]: query expansion and prompt building.
//! - [`config`], [`commands`], [`interactive`]: configuration and the `pkr` CLI.

use directories::ProjectDirs;
use std::error::Error;

pub mod commands;
pub mod config;
pub mod document_store;
pub mod embeddings;
pub mod error;
pub mod interaction;
pub mod interactive;
pub mod personalizer;
pub mod profile;
pub mod session;
pub mod template;

/// Return the per-platform configuration directory.
///
/// This uses [`directories::ProjectDirs`] with the application triple
/// `("com", "personal-knowledge", "pkr")`, e.g. `~/.config/pkr` on Linux.
///
/// The directory is **not** created by this function.
///
/// # Errors
/// Returns an error if the platform configuration directory cannot be determined
/// (which is rare but possible in heavily sandboxed environments).
pub fn config_dir() -> Result<std::path::PathBuf, Box<dyn Error>> {
    let proj_dirs = ProjectDirs::from("com", "personal-knowledge", "pkr")
        .ok_or("Unable to determine config directory")?;
    Ok(proj_dirs.config_dir().to_path_buf())
}
