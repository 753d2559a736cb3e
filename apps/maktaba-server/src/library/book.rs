//! Book record types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A book as listed in the catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Unique ID (`_id` is accepted as well)
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub files: BookFiles,
}

/// Files attached to a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epub: Option<FileRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: PathBuf,
}

impl BookRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: None,
            files: BookFiles::default(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_epub(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.epub = Some(FileRef { path: path.into() });
        self
    }

    /// Path of the EPUB asset, if the book has one
    pub fn epub_path(&self) -> Option<&Path> {
        self.files
            .epub
            .as_ref()
            .map(|file| file.path.as_path())
            .filter(|path| !path.as_os_str().is_empty())
    }
}
