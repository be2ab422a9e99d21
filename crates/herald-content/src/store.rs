// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory document store loaded from the content directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use herald_core::{
    AdapterType, ContentDocument, ContentSource, HealthStatus, HeraldError, PluginAdapter,
};
use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::manifest::{ManifestEntry, load_manifest};

type DocumentMap = BTreeMap<String, Arc<ContentDocument>>;

/// Documents keyed by id, replaced wholesale on each load.
///
/// Writers only run at startup or on an explicit reload, so request-path
/// readers never wait on file I/O.
#[derive(Debug)]
pub struct ContentStore {
    dir: PathBuf,
    documents: RwLock<DocumentMap>,
}

impl ContentStore {
    /// Creates an empty store rooted at `dir`. Call [`ContentStore::load`]
    /// to populate it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            documents: RwLock::new(DocumentMap::new()),
        }
    }

    /// Creates a store and loads it once.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, HeraldError> {
        let store = Self::new(dir);
        store.load()?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the manifest and every listed document, then swaps the map.
    ///
    /// A missing or malformed manifest fails the load and leaves the current
    /// documents in place. An unreadable document is logged and skipped.
    /// Returns the number of documents loaded.
    pub fn load(&self) -> Result<usize, HeraldError> {
        let manifest = load_manifest(&self.dir)?;

        let mut loaded = DocumentMap::new();
        for entry in manifest.packs {
            if let Some(document) = self.read_document(entry) {
                loaded.insert(document.id.clone(), Arc::new(document));
            }
        }

        let count = loaded.len();
        *self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner) = loaded;

        info!(count, dir = %self.dir.display(), "content documents loaded");
        Ok(count)
    }

    fn read_document(&self, entry: ManifestEntry) -> Option<ContentDocument> {
        let path = entry.resolve(&self.dir);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    document = %entry.id,
                    path = %path.display(),
                    error = %e,
                    "failed to load content document"
                );
                return None;
            }
        };

        let checksum = hex::encode(Sha256::digest(&bytes));
        info!(
            document = %entry.id,
            size = bytes.len(),
            checksum = &checksum[..8],
            "loaded content document"
        );

        Some(ContentDocument {
            id: entry.id,
            path: entry.path,
            topic_hints: entry.topic_hints,
            content: String::from_utf8_lossy(&bytes).into_owned(),
            checksum,
        })
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, DocumentMap> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// True when any request hint and any document hint contain one another,
/// ignoring case.
fn hints_overlap(document_hints: &[String], request_hints: &[String]) -> bool {
    document_hints.iter().any(|doc_hint| {
        let doc_hint = doc_hint.to_lowercase();
        request_hints
            .iter()
            .any(|hint| doc_hint.contains(hint.as_str()) || hint.contains(doc_hint.as_str()))
    })
}

impl ContentSource for ContentStore {
    fn get_document(&self, id: &str) -> Option<Arc<ContentDocument>> {
        self.read().get(id).cloned()
    }

    fn all_documents(&self) -> Vec<Arc<ContentDocument>> {
        self.read().values().cloned().collect()
    }

    fn documents_by_hints(&self, hints: &[&str]) -> Vec<Arc<ContentDocument>> {
        let hints: Vec<String> = hints.iter().map(|h| h.to_lowercase()).collect();
        self.read()
            .values()
            .filter(|doc| hints_overlap(&doc.topic_hints, &hints))
            .cloned()
            .collect()
    }

    fn checksums(&self) -> BTreeMap<String, String> {
        self.read()
            .iter()
            .map(|(id, doc)| (id.clone(), doc.checksum.clone()))
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for ContentStore {
    fn name(&self) -> &str {
        "content-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Content
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        if self.is_empty() {
            Ok(HealthStatus::Degraded("no content documents loaded".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), HeraldError> {
        Ok(())
    }
}
