//! # Upload Storage
//!
//! Validates uploaded file names and writes images into the upload directory.
//! The path handed back to the client is the same path `/analyze` later
//! accepts as `image_path`.

use regex::Regex;
use std::{
    fmt,
    path::PathBuf,
    sync::LazyLock,
};
use tracing::info;

static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"));

/// Reasons an upload is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    MissingFilePart,
    EmptyFilename,
    DisallowedType,
    /// The image could not be written to disk.
    Storage(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::MissingFilePart => write!(f, "No file part"),
            UploadError::EmptyFilename => write!(f, "No selected file"),
            UploadError::DisallowedType => write!(f, "File type not allowed"),
            UploadError::Storage(msg) => write!(f, "Failed to store upload: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}

/// Reduces a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped, whitespace becomes `_`, any other character
/// outside `[A-Za-z0-9_.-]` is removed, and leading dots and underscores are
/// stripped. May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS_RE.replace_all(&joined, "");
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// `true` when `name` has an extension from `allowed` (compared lowercase).
pub fn allowed_file(name: &str, allowed: &[String]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Writes uploaded images below a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    /// Creates the store, creating the directory if it does not exist yet.
    pub async fn open(
        dir: impl Into<PathBuf>,
        allowed_extensions: Vec<String>,
    ) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!(upload_dir = %dir.display(), "Upload directory ready.");
        Ok(Self {
            dir,
            allowed_extensions,
        })
    }

    /// Validates `file_name` and returns the path the image will be stored at.
    pub fn target_path(&self, file_name: &str) -> Result<PathBuf, UploadError> {
        if file_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        if !allowed_file(file_name, &self.allowed_extensions) {
            return Err(UploadError::DisallowedType);
        }
        let safe = secure_filename(file_name);
        if !allowed_file(&safe, &self.allowed_extensions) {
            return Err(UploadError::DisallowedType);
        }
        Ok(self.dir.join(safe))
    }

    /// Stores `bytes` under a sanitised version of `file_name`, replacing any
    /// earlier file of the same name.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        let path = self.target_path(file_name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))?;
        info!(path = %path.display(), size = bytes.len(), "Stored uploaded image.");
        Ok(path)
    }

    /// Resolves an `image_path` from an analysis request to an existing file
    /// inside the upload directory. Returns `None` for anything else.
    pub async fn resolve(&self, image_path: &str) -> Option<PathBuf> {
        if image_path.trim().is_empty() {
            return None;
        }
        let root = tokio::fs::canonicalize(&self.dir).await.ok()?;
        let candidate = tokio::fs::canonicalize(image_path).await.ok()?;
        let inside = candidate.starts_with(&root);
        let is_file = tokio::fs::metadata(&candidate)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        (inside && is_file).then_some(candidate)
    }
}
