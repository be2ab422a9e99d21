// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only access to static knowledge documents.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::ContentDocument;

/// Read-mostly mapping from document id to checksummed text.
pub trait ContentSource: Send + Sync + 'static {
    /// Looks up one document by id.
    fn get_document(&self, id: &str) -> Option<Arc<ContentDocument>>;

    /// Every loaded document, ordered by id.
    fn all_documents(&self) -> Vec<Arc<ContentDocument>>;

    /// Documents whose topic hints overlap any of `hints`.
    ///
    /// Overlap is a case-insensitive substring match in either direction.
    fn documents_by_hints(&self, hints: &[&str]) -> Vec<Arc<ContentDocument>>;

    /// Document id to checksum, for health reporting.
    fn checksums(&self) -> BTreeMap<String, String>;
}
