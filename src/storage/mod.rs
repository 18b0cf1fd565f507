use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tokens::{TokenSet, TokenTree, TreeError};

mod output;

pub use output::{backup_path, OutputError, OutputResult, OutputWriter, WriteOutcome};

const THEMES_SUBDIR: &str = "brand-theme";
const MODES_SUBDIR: &str = "color-modes";
const TOKEN_FILE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token file not found: {path} (create it with the expected token structure)")]
    NotFound { path: PathBuf },
    #[error("failed to read token file: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid token tree in {path}: {source}")]
    InvalidTree { path: PathBuf, source: TreeError },
    #[error("failed to list token directory: {dir}")]
    Discover { dir: PathBuf, source: io::Error },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Where token trees come from. Name lists are returned sorted so output
/// order does not depend on directory listing order.
pub trait TokenSource {
    fn themes(&self) -> StoreResult<Vec<String>>;
    fn modes(&self) -> StoreResult<Vec<String>>;
    fn theme(&self, name: &str) -> StoreResult<TokenTree>;
    fn mode(&self, name: &str) -> StoreResult<TokenTree>;
    fn token_set(&self, token_set: TokenSet) -> StoreResult<TokenTree>;
}

/// Token files on disk:
/// `brand-theme/<theme>.json`, `color-modes/<mode>.json`,
/// `components/component.json`, `layouts/layout.json`.
#[derive(Debug, Clone)]
pub struct FsTokenStore {
    tokens_dir: PathBuf,
}

impl FsTokenStore {
    pub fn new(tokens_dir: impl Into<PathBuf>) -> Self {
        Self {
            tokens_dir: tokens_dir.into(),
        }
    }

    pub fn theme_path(&self, name: &str) -> PathBuf {
        self.tokens_dir
            .join(THEMES_SUBDIR)
            .join(format!("{name}.{TOKEN_FILE_EXTENSION}"))
    }

    pub fn mode_path(&self, name: &str) -> PathBuf {
        self.tokens_dir
            .join(MODES_SUBDIR)
            .join(format!("{name}.{TOKEN_FILE_EXTENSION}"))
    }
}

impl TokenSource for FsTokenStore {
    fn themes(&self) -> StoreResult<Vec<String>> {
        discover_token_files(&self.tokens_dir.join(THEMES_SUBDIR))
    }

    fn modes(&self) -> StoreResult<Vec<String>> {
        discover_token_files(&self.tokens_dir.join(MODES_SUBDIR))
    }

    fn theme(&self, name: &str) -> StoreResult<TokenTree> {
        read_token_file(&self.theme_path(name))
    }

    fn mode(&self, name: &str) -> StoreResult<TokenTree> {
        read_token_file(&self.mode_path(name))
    }

    fn token_set(&self, token_set: TokenSet) -> StoreResult<TokenTree> {
        read_token_file(&token_set.source_path(&self.tokens_dir))
    }
}

pub fn read_token_file(path: &Path) -> StoreResult<TokenTree> {
    if !path.exists() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let serialized = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: serde_json::Value =
        serde_json::from_str(&serialized).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    TokenTree::from_json(&raw).map_err(|source| StoreError::InvalidTree {
        path: path.to_path_buf(),
        source,
    })
}

/// Sorted stems of every `*.json` file directly inside `dir`.
pub fn discover_token_files(dir: &Path) -> StoreResult<Vec<String>> {
    let discover_error = |source| StoreError::Discover {
        dir: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(discover_error)? {
        let path = entry.map_err(discover_error)?.path();
        if !path.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(TOKEN_FILE_EXTENSION)
        {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}
