// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content store: static, checksummed knowledge documents loaded from a
//! manifest at startup and served read-only to the orchestrator.

pub mod manifest;
pub mod store;

pub use manifest::{MANIFEST_FILE, Manifest, ManifestEntry};
pub use store::ContentStore;
