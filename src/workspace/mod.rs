pub mod guard;
pub mod store;

use std::path::PathBuf;

pub use store::WorkspaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileKind {
    File,
    Directory,
}

/// One entry from a workspace listing. Transient; never persisted.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub relative_path: String,
    pub kind: FileKind,
}

/// Derived, read-only facts about the open project. Recomputed on demand.
#[derive(Debug, Clone)]
pub struct WorkspaceMetadata {
    pub name: String,
    pub root_path: PathBuf,
    pub has_git: bool,
    pub has_package_json: bool,
}

/// External collaborator that knows where the current project lives.
///
/// The store queries it on every call rather than caching the answer,
/// since the active project can change between calls.
pub trait ProjectLocator: Send + Sync {
    fn project_root(&self) -> Option<PathBuf>;
}

/// Locator backed by a fixed directory (the `--project` flag or the
/// current working directory).
pub struct DirProject {
    root: PathBuf,
}

impl DirProject {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ProjectLocator for DirProject {
    fn project_root(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }
}
