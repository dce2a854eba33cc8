// Reference resolution: turn the path token of an image reference into a
// file on disk. Remote URLs are not special-cased; they simply never exist
// as local files and so are passed through by the caller.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub exists: bool,
}

/// Join `raw_path` onto `base_dir` unless it is already absolute, then check
/// that the result is a regular file.
pub fn resolve(raw_path: &str, base_dir: &Path) -> Resolved {
    let raw = Path::new(raw_path);
    let path = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        base_dir.join(raw)
    };
    let exists = path.is_file();
    Resolved { path, exists }
}
