use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("filename \"{0}\" has no usable characters")]
    InvalidName(String),
}

/// Keeps uploaded documents on local disk, one file per sanitized name.
/// A later upload with the same name replaces the earlier one.
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `data` under the sanitized form of `filename` and returns the
    /// name it was stored as.
    pub fn save(&self, filename: &str, data: &[u8]) -> Result<String, StoreError> {
        let stored_name = secure_filename(filename);
        if stored_name.is_empty() {
            return Err(StoreError::InvalidName(filename.to_string()));
        }

        fs::write(self.root.join(&stored_name), data)?;
        Ok(stored_name)
    }
}

/// Reduces a client-supplied filename to something safe to join onto the
/// upload folder: ASCII only, no path separators, whitespace folded to `_`,
/// nothing outside `[A-Za-z0-9_.-]`, no leading or trailing `.`/`_`.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
