// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory content source.

use std::collections::BTreeMap;
use std::sync::Arc;

use herald_core::{ContentDocument, ContentSource};
use sha2::{Digest, Sha256};

/// A fixed set of documents built in code.
#[derive(Debug, Default, Clone)]
pub struct InMemoryContent {
    documents: BTreeMap<String, Arc<ContentDocument>>,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, id: &str, content: &str) -> Self {
        self.with_hinted_document(id, content, &[])
    }

    pub fn with_hinted_document(mut self, id: &str, content: &str, hints: &[&str]) -> Self {
        let document = ContentDocument {
            id: id.to_string(),
            path: format!("content/{id}.md"),
            topic_hints: hints.iter().map(|h| h.to_string()).collect(),
            content: content.to_string(),
            checksum: hex::encode(Sha256::digest(content.as_bytes())),
        };
        self.documents.insert(id.to_string(), Arc::new(document));
        self
    }
}

impl ContentSource for InMemoryContent {
    fn get_document(&self, id: &str) -> Option<Arc<ContentDocument>> {
        self.documents.get(id).cloned()
    }

    fn all_documents(&self) -> Vec<Arc<ContentDocument>> {
        self.documents.values().cloned().collect()
    }

    fn documents_by_hints(&self, hints: &[&str]) -> Vec<Arc<ContentDocument>> {
        let hints: Vec<String> = hints.iter().map(|h| h.to_lowercase()).collect();
        self.documents
            .values()
            .filter(|doc| {
                doc.topic_hints.iter().any(|doc_hint| {
                    let doc_hint = doc_hint.to_lowercase();
                    hints
                        .iter()
                        .any(|h| doc_hint.contains(h.as_str()) || h.contains(doc_hint.as_str()))
                })
            })
            .cloned()
            .collect()
    }

    fn checksums(&self) -> BTreeMap<String, String> {
        self.documents
            .iter()
            .map(|(id, doc)| (id.clone(), doc.checksum.clone()))
            .collect()
    }
}
