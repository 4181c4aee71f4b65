//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `spotter` workspace crates.

/// The model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "llava:latest";

/// Where the server stores uploaded images.
pub const DEFAULT_UPLOAD_DIR: &str = "static/uploads";

/// File extensions accepted by `/upload`, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// The largest accepted upload body, 16 MiB.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub const DEFAULT_OLLAMA_GENERATE_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_TAGS_URL: &str = "http://localhost:11434/api/tags";

/// Initial values of the threshold inputs, as text, before the user edits them.
pub const DEFAULT_FOUND_LOW: &str = "0.8";
pub const DEFAULT_MAYBE_LOW: &str = "0.5";
