use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{RawBlock, collaborators::ReferenceResolver};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid block file {path}: {source}")]
    InvalidBlocks {
        path: PathBuf,
        source: crate::ConvertError,
    },
    #[error("Invalid references directory: {0}")]
    InvalidReferencesDir(String),
}

/// Read a JSON block list from disk
pub fn read_blocks_file(path: &Path) -> Result<Vec<RawBlock>, IoError> {
    let content = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => IoError::NotFound(path.to_path_buf()),
        _ => IoError::Io(err),
    })?;
    RawBlock::list_from_str(&content).map_err(|source| IoError::InvalidBlocks {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves reference identifiers to `<dir>/<id>.json` files.
///
/// Identifiers that could escape the directory never resolve.
#[derive(Debug, Clone)]
pub struct DirectoryReferences {
    root: PathBuf,
}

impl DirectoryReferences {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, IoError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(IoError::InvalidReferencesDir(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id != "."
            && !id.contains("..")
            && !id.contains(['/', '\\'])
            && !id.contains('\0');
        safe.then(|| self.root.join(format!("{id}.json")))
    }
}

impl ReferenceResolver for DirectoryReferences {
    fn resolve(&self, id: &str) -> anyhow::Result<Option<String>> {
        let Some(path) = self.path_for(id) else {
            log::warn!("Ignoring unsafe reference id {id:?}");
            return Ok(None);
        };
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_blocks_file_parses_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("post.json");
        fs::write(&path, r#"[{"blockName": null, "innerHTML": "<p>x</p>"}]"#).unwrap();

        let blocks = read_blocks_file(&path).unwrap();

        assert_eq!(blocks, vec![RawBlock::freeform("<p>x</p>")]);
    }

    #[test]
    fn read_blocks_file_reports_missing_and_invalid_files() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            read_blocks_file(&missing),
            Err(IoError::NotFound(_))
        ));

        let invalid = temp_dir.path().join("invalid.json");
        fs::write(&invalid, r#"[{"blockName": "core/paragraph"}]"#).unwrap();
        assert!(matches!(
            read_blocks_file(&invalid),
            Err(IoError::InvalidBlocks { .. })
        ));
    }

    #[test]
    fn directory_references_resolve_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("42.json"), "[]").unwrap();
        let refs = DirectoryReferences::new(temp_dir.path()).unwrap();

        assert_eq!(refs.resolve("42").unwrap().as_deref(), Some("[]"));
        assert_eq!(refs.resolve("43").unwrap(), None);
    }

    #[test]
    fn directory_references_report_unreadable_entries() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("7.json")).unwrap();
        let refs = DirectoryReferences::new(temp_dir.path()).unwrap();

        assert!(refs.resolve("7").is_err());
    }

    #[test]
    fn directory_references_reject_escaping_ids() {
        let temp_dir = TempDir::new().unwrap();
        let refs = DirectoryReferences::new(temp_dir.path().join("refs"));
        assert!(matches!(refs, Err(IoError::InvalidReferencesDir(_))));

        let refs = DirectoryReferences::new(temp_dir.path()).unwrap();
        assert_eq!(refs.resolve("../secret").unwrap(), None);
        assert_eq!(refs.resolve("a/b").unwrap(), None);
        assert_eq!(refs.resolve("").unwrap(), None);
    }
}
