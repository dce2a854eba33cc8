// Document I/O: read a Markdown file whole, rewrite it in memory, and only
// then overwrite it on disk. The write goes through the existing file, so a
// symlinked document updates its target and hard links stay linked.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MdImgUpError, Result};
use crate::memo::UploadMemo;
use crate::rewrite::{rewrite, Mode, Rewrite};

/// Rewrite the image references of the document at `path` in place.
///
/// Nothing is written if the pass fails or changes nothing.
pub fn rewrite_file(path: &Path, mode: &Mode<'_>) -> Result<Rewrite> {
    let text = std::fs::read_to_string(path).map_err(|source| MdImgUpError::SourceFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    debug!(path = %path.display(), base = %base_dir.display(), "rewriting document");

    let mut memo = UploadMemo::new();
    let result = rewrite(&text, base_dir, mode, &mut memo)?;
    if result.is_unchanged() {
        debug!(path = %path.display(), "no image replaced, leaving file alone");
        return Ok(result);
    }

    write_in_place(path, &result.text)?;
    info!(path = %path.display(), replaced = result.replaced, uploads = result.uploads, "document rewritten");
    Ok(result)
}

fn write_in_place(path: &Path, text: &str) -> Result<()> {
    let write_err = |source: std::io::Error| MdImgUpError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(text.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    Ok(())
}
