//! Result category descriptors and display projection.
//!
//! A search fans out over a fixed set of independent categories. Each
//! descriptor is pure data: the category identifier plus its display title.
//! The raw-to-display transforms live alongside them and are async across
//! the board because the content-item transform composes a display path
//! (and may touch the filesystem to canonicalize it); the orchestrator
//! treats every category's transform uniformly.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backend::{ContentHit, DirectoryHit, FileHit};

/// The fixed category set searched in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Directories,
    Files,
    Items,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directories => write!(f, "directories"),
            Self::Files => write!(f, "files"),
            Self::Items => write!(f, "items"),
        }
    }
}

/// Static per-category configuration. Defined once at startup.
#[derive(Debug, Clone, Copy)]
pub struct CategoryDescriptor {
    pub kind: CategoryKind,
    pub title: &'static str,
}

/// The active category set. Kinds are unique by construction.
pub const CATEGORIES: [CategoryDescriptor; 3] = [
    CategoryDescriptor {
        kind: CategoryKind::Directories,
        title: "Directories",
    },
    CategoryDescriptor {
        kind: CategoryKind::Files,
        title: "Files",
    },
    CategoryDescriptor {
        kind: CategoryKind::Items,
        title: "Content",
    },
];

/// A result row ready for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayItem {
    /// Short label: file or directory name.
    pub name: String,
    /// Full path to reveal or open.
    pub path: String,
    /// Location detail for content matches (page, line, snippet).
    pub detail: Option<String>,
}

impl DisplayItem {
    pub async fn from_directory(hit: DirectoryHit) -> Self {
        let name = leaf_name(&hit.path);
        Self {
            name,
            path: hit.path,
            detail: None,
        }
    }

    pub async fn from_file(hit: FileHit) -> Self {
        let name = leaf_name(&hit.path);
        Self {
            name,
            path: hit.path,
            detail: None,
        }
    }

    /// Content hits arrive as (dir, filename) plus a location; the display
    /// path is composed here. Canonicalization suspends; when the file has
    /// vanished since indexing the raw join is shown instead.
    pub async fn from_content(hit: ContentHit) -> Self {
        let joined = Path::new(&hit.dir).join(&hit.filename);
        let display: PathBuf = match tokio::fs::canonicalize(&joined).await {
            Ok(resolved) => resolved,
            Err(_) => joined,
        };
        Self {
            name: hit.filename,
            path: display.to_string_lossy().into_owned(),
            detail: Some(format!(
                "page {}, line {}: {}",
                hit.page, hit.line, hit.content
            )),
        }
    }
}

fn leaf_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_kinds_are_unique() {
        for (i, a) in CATEGORIES.iter().enumerate() {
            for b in &CATEGORIES[i + 1..] {
                assert_ne!(a.kind, b.kind);
            }
        }
    }

    #[tokio::test]
    async fn directory_transform_projects_leaf_name() {
        let item = DisplayItem::from_directory(DirectoryHit {
            path: "/home/u/docs/reports".to_string(),
        })
        .await;
        assert_eq!(item.name, "reports");
        assert_eq!(item.path, "/home/u/docs/reports");
        assert!(item.detail.is_none());
    }

    #[tokio::test]
    async fn content_transform_joins_dir_and_filename() {
        let item = DisplayItem::from_content(ContentHit {
            dir: "/scans/no-such-dir".to_string(),
            filename: "invoice.pdf".to_string(),
            page: 3,
            line: 14,
            content: "total due".to_string(),
        })
        .await;
        // Path does not exist, so the raw join is kept.
        assert_eq!(item.path, "/scans/no-such-dir/invoice.pdf");
        assert_eq!(item.name, "invoice.pdf");
        assert_eq!(item.detail.as_deref(), Some("page 3, line 14: total due"));
    }

    #[tokio::test]
    async fn content_transform_canonicalizes_existing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.txt");
        std::fs::write(&file, "hello").unwrap();

        let item = DisplayItem::from_content(ContentHit {
            dir: dir.path().to_string_lossy().into_owned(),
            filename: "note.txt".to_string(),
            page: 0,
            line: 1,
            content: "hello".to_string(),
        })
        .await;
        assert!(item.path.ends_with("note.txt"));
        assert!(Path::new(&item.path).is_absolute());
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(CategoryKind::Directories.to_string(), "directories");
        assert_eq!(CategoryKind::Files.to_string(), "files");
        assert_eq!(CategoryKind::Items.to_string(), "items");
    }
}
