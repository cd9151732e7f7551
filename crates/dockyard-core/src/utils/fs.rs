use std::env::consts::{DLL_EXTENSION, DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File names tried, in order, when looking for `name` inside one directory.
///
/// `"foo"` becomes `["foo", "libfoo.so", "foo.so"]` on Linux. Names that
/// already carry the platform prefix or suffix are not decorated twice.
pub fn library_candidates(name: &str) -> Vec<String> {
    let mut candidates = vec![name.to_string()];
    let has_suffix = name.ends_with(DLL_SUFFIX);
    let has_prefix = DLL_PREFIX.is_empty() || name.starts_with(DLL_PREFIX);

    if !has_prefix && !has_suffix {
        candidates.push(format!("{}{}{}", DLL_PREFIX, name, DLL_SUFFIX));
    }
    if !has_suffix {
        candidates.push(format!("{}{}", name, DLL_SUFFIX));
    }
    if !has_prefix && has_suffix {
        candidates.push(format!("{}{}", DLL_PREFIX, name));
    }
    candidates.dedup();
    candidates
}

/// Whether `name` is meant as a path rather than a bare library name.
pub fn looks_like_path(name: &str) -> bool {
    let path = Path::new(name);
    path.is_absolute() || path.components().count() > 1
}

/// Shared libraries directly inside `dir` (not recursive), sorted by file name.
/// A missing directory yields an empty list.
pub fn find_libraries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut result = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry_path = entry?.path();
        let is_library = entry_path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(DLL_EXTENSION))
            .unwrap_or(false);
        if entry_path.is_file() && is_library {
            result.push(entry_path);
        }
    }
    result.sort();
    Ok(result)
}

/// Removes later duplicates while keeping the first occurrence of each path.
pub fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    unique
}
