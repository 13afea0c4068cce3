use crate::core::error::ChatError;
use crate::workspace::guard;
use crate::workspace::{FileEntry, FileKind, ProjectLocator, WorkspaceMetadata};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory names excluded from listings at every level.
const LIST_EXCLUDED_DIRS: &[&str] = &["bin", "obj", "node_modules", "__pycache__"];

/// Subtrees excluded from glob search.
const SEARCH_EXCLUDED_DIRS: &[&str] = &["bin", "obj", "node_modules", ".git"];

pub const DEFAULT_LIST_DEPTH: usize = 3;

/// Sandboxed file-system facade. The only component that touches disk.
///
/// Every entry point re-derives the project root from the locator and
/// re-validates containment on the joined path; nothing resolved on a
/// previous call is trusted.
pub struct WorkspaceStore {
    locator: Box<dyn ProjectLocator>,
}

impl WorkspaceStore {
    pub fn new(locator: Box<dyn ProjectLocator>) -> Self {
        Self { locator }
    }

    pub fn resolve_root(&self) -> Result<PathBuf, ChatError> {
        let root = self
            .locator
            .project_root()
            .ok_or(ChatError::NoActiveProject)?;
        if !root.is_dir() {
            return Err(ChatError::NoActiveProject);
        }
        Ok(root)
    }

    pub fn read_file(&self, relative_path: &str) -> Result<String, ChatError> {
        guard::validate_relative_path(relative_path)?;

        let root = self.resolve_root()?;
        let full_path = root.join(relative_path);

        if !guard::is_within(&full_path, &root) {
            return Err(ChatError::AccessDenied(format!(
                "File is outside the project directory: {relative_path}"
            )));
        }

        if !full_path.is_file() {
            return Err(ChatError::NotFound(format!(
                "File not found: {relative_path}"
            )));
        }

        fs::read_to_string(&full_path).map_err(|e| io_to_chat_error(e, relative_path))
    }

    pub fn write_file(
        &self,
        relative_path: &str,
        content: &str,
        max_bytes: usize,
    ) -> Result<(), ChatError> {
        guard::validate_relative_path(relative_path)?;
        guard::validate_content_size(content, max_bytes)?;

        let root = self.resolve_root()?;
        let full_path = root.join(relative_path);

        if !guard::is_within(&full_path, &root) {
            return Err(ChatError::AccessDenied(format!(
                "Cannot write outside the project directory: {relative_path}"
            )));
        }

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_to_chat_error(e, relative_path))?;
        }

        debug!(path = relative_path, bytes = content.len(), "writing workspace file");
        fs::write(&full_path, content).map_err(|e| io_to_chat_error(e, relative_path))
    }

    /// Lists files and subdirectories under `relative_path` (the root when
    /// empty). Dotfiles and conventional build/dependency directories are
    /// excluded at every level; recursion descends `max_depth` directory
    /// levels below the listing root. Results come back sorted files first,
    /// then directories, case-insensitive by name.
    pub fn list_files(
        &self,
        relative_path: &str,
        recursive: bool,
        max_depth: usize,
    ) -> Result<Vec<FileEntry>, ChatError> {
        if !relative_path.is_empty() {
            guard::validate_relative_path(relative_path)?;
        }

        let root = self.resolve_root()?;
        let dir = if relative_path.is_empty() {
            root.clone()
        } else {
            root.join(relative_path)
        };

        if !guard::is_within(&dir, &root) {
            return Err(ChatError::AccessDenied(format!(
                "Directory is outside the project directory: {relative_path}"
            )));
        }

        if !dir.is_dir() {
            return Err(ChatError::NotFound(format!(
                "Directory not found: {relative_path}"
            )));
        }

        let mut entries = Vec::new();
        collect_entries(&dir, &root, recursive, max_depth, 0, &mut entries);
        entries.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(entries)
    }

    /// Glob search across the whole workspace, capped at `max_results`.
    /// Search is advisory: I/O problems during the walk produce fewer (or
    /// zero) results rather than an error.
    pub fn search_files(
        &self,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<String>, ChatError> {
        let root = self.resolve_root()?;

        let mut overrides = OverrideBuilder::new(&root);
        if overrides.add(pattern).is_err() {
            warn!(pattern, "unparseable search glob");
            return Ok(Vec::new());
        }
        let Ok(overrides) = overrides.build() else {
            return Ok(Vec::new());
        };

        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .overrides(overrides)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                let name = entry.file_name().to_string_lossy();
                !(is_dir && SEARCH_EXCLUDED_DIRS.contains(&name.as_ref()))
            })
            .build();

        let mut results = Vec::new();
        for entry in walker {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            results.push(relative_to(&root, entry.path()));
            if results.len() >= max_results {
                break;
            }
        }
        Ok(results)
    }

    pub fn metadata(&self) -> Result<WorkspaceMetadata, ChatError> {
        let root = self.resolve_root()?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        Ok(WorkspaceMetadata {
            name,
            has_git: root.join(".git").is_dir(),
            has_package_json: root.join("package.json").is_file(),
            root_path: root,
        })
    }
}

fn collect_entries(
    current: &Path,
    root: &Path,
    recursive: bool,
    max_depth: usize,
    depth: usize,
    out: &mut Vec<FileEntry>,
) {
    let read_dir = match fs::read_dir(current) {
        Ok(r) => r,
        Err(e) => {
            // Skip branches we cannot read instead of aborting the listing.
            debug!("skipping unreadable directory {}: {}", current.display(), e);
            return;
        }
    };

    let mut subdirs = Vec::new();
    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if LIST_EXCLUDED_DIRS.contains(&name.as_str()) {
                continue;
            }
            out.push(FileEntry {
                name,
                relative_path: relative_to(root, &entry.path()),
                kind: FileKind::Directory,
            });
            subdirs.push(entry.path());
        } else if file_type.is_file() {
            out.push(FileEntry {
                name,
                relative_path: relative_to(root, &entry.path()),
                kind: FileKind::File,
            });
        }
    }

    if recursive && depth < max_depth {
        for dir in subdirs {
            collect_entries(&dir, root, recursive, max_depth, depth + 1, out);
        }
    }
}

fn relative_to(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn io_to_chat_error(err: io::Error, relative_path: &str) -> ChatError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            ChatError::AccessDenied(format!("Permission denied: {relative_path}"))
        }
        io::ErrorKind::NotFound => ChatError::NotFound(format!("File not found: {relative_path}")),
        _ => err.into(),
    }
}
