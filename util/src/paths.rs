use crate::config::AppConfig;
use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global storage root (absolute), from `AppConfig::storage_root`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let p = PathBuf::from(AppConfig::global().storage_root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// {STORAGE_ROOT}/course_{course_id}
pub fn course_dir(course_id: i64) -> PathBuf {
    storage_root().join(format!("course_{course_id}"))
}

/// {STORAGE_ROOT}/course_{course_id}/activity_{activity_id}
pub fn activity_dir(course_id: i64, activity_id: i64) -> PathBuf {
    course_dir(course_id).join(format!("activity_{activity_id}"))
}

/// Relative key of a student's upload folder for one activity:
/// `course_{c}/activity_{a}/student_{s}`. Keys are joined onto the storage root
/// on disk and onto the base URL for links.
pub fn upload_key(course_id: i64, activity_id: i64, student_id: i64) -> String {
    format!("course_{course_id}/activity_{activity_id}/student_{student_id}")
}

/// Resolves a relative storage key to an absolute path, refusing keys that
/// would escape the storage root.
pub fn resolve_key(key: &str) -> Option<PathBuf> {
    resolve_under(&storage_root(), key)
}

/// Joins `key` onto `root` unless it contains `..`, a root or a drive prefix.
pub fn resolve_under(root: &Path, key: &str) -> Option<PathBuf> {
    let relative = Path::new(key);
    let escapes = relative.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes || key.is_empty() {
        None
    } else {
        Some(root.join(relative))
    }
}
