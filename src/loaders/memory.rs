//! In-memory document source, used by tests and by embedders that build
//! documents programmatically.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::engine::{compose_document, Config, Document};
use crate::error::{Error, Result};
use crate::loaders::Loader;

#[derive(Debug, Default)]
pub struct InMemoryLoader {
    documents: RwLock<BTreeMap<String, Document>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loader from `(name, document)` pairs.
    pub fn from_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = (S, Document)>,
        S: Into<String>,
    {
        let documents = documents.into_iter().map(|(name, doc)| (name.into(), doc)).collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Insert or replace a document. Takes effect on the next load.
    pub fn insert(&self, name: impl Into<String>, document: Document) {
        let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
        documents.insert(name.into(), document);
    }

    pub fn remove(&self, name: &str) -> Option<Document> {
        let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
        documents.remove(name)
    }
}

impl Loader for InMemoryLoader {
    fn load(&self, name: &str) -> Result<Config> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        let document = documents.get(name).ok_or_else(|| Error::config_not_found(name))?;
        compose_document(name, document)
    }

    fn load_all(&self) -> Result<Vec<Config>> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        documents
            .iter()
            .map(|(name, document)| compose_document(name, document))
            .collect()
    }
}
