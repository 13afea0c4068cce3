use crate::core::error::ChatError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Lexical validation of a user- or model-supplied relative path.
///
/// Runs before the path is ever joined with the project root, so an
/// absolute or traversal-bearing fragment is rejected up front. Never
/// touches the file system.
pub fn validate_relative_path(raw: &str) -> Result<(), ChatError> {
    if raw.trim().is_empty() {
        return Err(ChatError::InvalidPath("Path cannot be empty".to_string()));
    }

    if raw.contains('\0') {
        return Err(ChatError::InvalidPath(
            "Path contains null bytes".to_string(),
        ));
    }

    // Check both separator conventions lexically, since the model may emit
    // either regardless of the host platform.
    if raw
        .split(['/', '\\'])
        .any(|segment| segment == "..")
    {
        return Err(ChatError::InvalidPath(
            "Path traversal (..) is not allowed".to_string(),
        ));
    }

    for component in Path::new(raw).components() {
        match component {
            Component::ParentDir => {
                return Err(ChatError::InvalidPath(
                    "Path traversal (..) is not allowed".to_string(),
                ));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(ChatError::InvalidPath(
                    "Absolute paths are not allowed".to_string(),
                ));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    if Path::new(raw).is_absolute() || raw.starts_with('\\') {
        return Err(ChatError::InvalidPath(
            "Absolute paths are not allowed".to_string(),
        ));
    }

    #[cfg(windows)]
    {
        const RESERVED: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];
        if raw.chars().any(|c| RESERVED.contains(&c)) {
            return Err(ChatError::InvalidPath(
                "Path contains invalid characters".to_string(),
            ));
        }
    }

    Ok(())
}

/// Checks that `candidate` resolves inside `root` after canonicalization.
///
/// This is a second, independent check performed after path joining;
/// lexical validation alone cannot catch symlink tricks, so both run on
/// every workspace operation. Returns false when either side cannot be
/// resolved.
pub fn is_within(candidate: &Path, root: &Path) -> bool {
    let Ok(root) = fs::canonicalize(root) else {
        return false;
    };
    let Some(candidate) = canonicalize_allow_missing(candidate) else {
        return false;
    };
    has_path_prefix(&candidate, &root)
}

/// Canonicalizes a path whose trailing components may not exist yet
/// (write targets). The deepest existing ancestor is resolved through
/// the file system and the remainder re-joined. Fails on `..` remainders.
fn canonicalize_allow_missing(path: &Path) -> Option<PathBuf> {
    if let Ok(existing) = fs::canonicalize(path) {
        return Some(existing);
    }
    let parent = path.parent()?;
    let name = path.file_name()?;
    let base = canonicalize_allow_missing(parent)?;
    Some(base.join(name))
}

#[cfg(windows)]
fn has_path_prefix(candidate: &Path, root: &Path) -> bool {
    // NTFS is case-insensitive; compare folded forms.
    let candidate = candidate.to_string_lossy().to_lowercase();
    let root = root.to_string_lossy().to_lowercase();
    Path::new(&candidate).starts_with(Path::new(&root))
}

#[cfg(not(windows))]
fn has_path_prefix(candidate: &Path, root: &Path) -> bool {
    candidate.starts_with(root)
}

/// Enforces the configured byte budget on content to be written. Size is
/// measured in encoded UTF-8 bytes to match real on-disk size.
pub fn validate_content_size(content: &str, max_bytes: usize) -> Result<(), ChatError> {
    let actual = content.len();
    if actual > max_bytes {
        return Err(ChatError::ContentTooLarge {
            actual,
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Formats a byte count into a human-readable size for error messages.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const SIZES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut order = 0;

    while size >= 1024.0 && order < SIZES.len() - 1 {
        order += 1;
        size /= 1024.0;
    }

    format!("{} {}", (size * 100.0).round() / 100.0, SIZES[order])
}

/// Accepts only http/https endpoint URLs.
pub fn validate_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
