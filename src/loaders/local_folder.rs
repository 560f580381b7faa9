//! Documents stored as `<folder>/<name>.json` files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::engine::{compose_document, Config, Document};
use crate::error::{Error, Result};
use crate::loaders::Loader;

const DOCUMENT_EXTENSION: &str = "json";

/// Loads every `*.json` file directly inside a folder. The config name is the
/// file stem.
#[derive(Debug, Clone)]
pub struct LocalFolderLoader {
    path: PathBuf,
}

impl LocalFolderLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_from_path(&self, name: &str, path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Document =
            serde_json::from_str(&content).map_err(|source| Error::InvalidDocument {
                name: name.to_string(),
                source,
            })?;

        tracing::debug!(config = %name, path = %path.display(), shards = document.shards.len(), "Loaded document");
        compose_document(name, &document)
    }

    /// All document files in the folder, sorted by file name.
    fn document_paths(&self) -> Result<Vec<(String, PathBuf)>> {
        let io_error = |source| Error::Io {
            path: self.path.clone(),
            source,
        };

        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_file() || !is_document(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                documents.push((stem.to_string(), path.clone()));
            }
        }
        documents.sort();
        Ok(documents)
    }
}

impl Loader for LocalFolderLoader {
    fn load(&self, name: &str) -> Result<Config> {
        if !is_valid_name(name) {
            tracing::warn!(config = %name, "Rejected document name");
            return Err(Error::config_not_found(name));
        }

        let path = self.path.join(format!("{name}.{DOCUMENT_EXTENSION}"));
        match self.load_from_path(name, &path) {
            Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Err(Error::config_not_found(name))
            }
            other => other,
        }
    }

    fn load_all(&self) -> Result<Vec<Config>> {
        let configs = self
            .document_paths()?
            .iter()
            .map(|(name, path)| self.load_from_path(name, path))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(path = %self.path.display(), configs = configs.len(), "Loaded documents from folder");
        Ok(configs)
    }
}

/// Whether `path` has the document extension.
pub fn is_document(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION)
}

/// Names map directly to file names, so anything that could leave the folder
/// is refused.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DEFAULT_ENV;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).unwrap();
    }

    #[test]
    fn test_load_composes_document() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "app.json",
            r#"{"default": {"port": 80}, "shards": [{"envs": ["prod"], "content": {"port": 443}}]}"#,
        );
        let loader = LocalFolderLoader::new(dir.path());

        let config = loader.load("app").unwrap();
        assert_eq!(config.name(), "app");
        assert_eq!(config.env(DEFAULT_ENV).unwrap().content()["port"], json!(80));
        assert_eq!(config.env("prod").unwrap().content()["port"], json!(443));
    }

    #[test]
    fn test_load_missing_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let loader = LocalFolderLoader::new(dir.path());
        assert!(matches!(loader.load("ghost"), Err(Error::ConfigNotFound { name }) if name == "ghost"));
    }

    #[test]
    fn test_traversal_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir(&inner).unwrap();
        write(&dir, "secret.json", r#"{"default": {}}"#);
        let loader = LocalFolderLoader::new(&inner);

        assert!(matches!(loader.load("../secret"), Err(Error::ConfigNotFound { .. })));
        assert!(matches!(loader.load(".."), Err(Error::ConfigNotFound { .. })));
        assert!(matches!(loader.load(""), Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.json", "{ not json");
        write(&dir, "wrong.json", r#"{"shards": [{"envs": "prod"}]}"#);
        let loader = LocalFolderLoader::new(dir.path());

        assert!(matches!(loader.load("broken"), Err(Error::InvalidDocument { name, .. }) if name == "broken"));
        assert!(matches!(loader.load("wrong"), Err(Error::InvalidDocument { .. })));
    }

    #[test]
    fn test_load_all_reads_only_json_files_in_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.json", r#"{"default": {"k": "b"}}"#);
        write(&dir, "a.json", r#"{"default": {"k": "a"}}"#);
        write(&dir, "notes.txt", "ignored");
        fs::create_dir(dir.path().join("nested.json")).unwrap();
        let loader = LocalFolderLoader::new(dir.path());

        let names: Vec<_> = loader.load_all().unwrap().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_load_all_missing_folder_is_io_error() {
        let loader = LocalFolderLoader::new("/definitely/not/here");
        assert!(matches!(loader.load_all(), Err(Error::Io { .. })));
    }
}
