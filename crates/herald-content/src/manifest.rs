// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content manifest (`packs.json`) parsing.
//!
//! The manifest lists every document the store loads:
//!
//! ```json
//! { "packs": [ { "id": "about", "path": "content/about.md", "topicHints": ["bio"] } ] }
//! ```

use std::path::{Path, PathBuf};

use herald_core::HeraldError;
use serde::Deserialize;

/// File name of the manifest inside the content directory.
pub const MANIFEST_FILE: &str = "packs.json";

/// Top-level structure of `packs.json`.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub packs: Vec<ManifestEntry>,
}

/// One document listed in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub path: String,
    #[serde(default)]
    pub topic_hints: Vec<String>,
}

impl ManifestEntry {
    /// Resolves the entry path against the content directory.
    ///
    /// Manifest paths are written relative to the repository root, so a
    /// leading `content/` is dropped before joining. Absolute paths are kept.
    pub fn resolve(&self, content_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let relative = self.path.strip_prefix("content/").unwrap_or(&self.path);
        content_dir.join(relative)
    }
}

/// Parses a manifest from its JSON text.
pub fn parse_manifest(json: &str) -> Result<Manifest, HeraldError> {
    serde_json::from_str(json).map_err(|e| HeraldError::Content {
        message: format!("failed to parse manifest: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Reads and parses `packs.json` from the content directory.
pub fn load_manifest(content_dir: &Path) -> Result<Manifest, HeraldError> {
    let path = content_dir.join(MANIFEST_FILE);
    let json = std::fs::read_to_string(&path).map_err(|e| HeraldError::Content {
        message: format!("failed to read manifest '{}': {e}", path.display()),
        source: Some(Box::new(e)),
    })?;
    parse_manifest(&json)
}
