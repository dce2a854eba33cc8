// The rewrite pass: find image references, resolve them, and substitute
// either an uploaded `<img>` tag or inlined data.
//
// Matches are handled strictly left to right and one at a time. A match
// whose file does not exist on disk is copied through untouched. Any
// upload or read failure aborts the whole pass, so the caller never sees
// a partially rewritten text.

use std::path::Path;
use tracing::debug;

use crate::api::Uploader;
use crate::error::{MdImgUpError, Result};
use crate::inline::inline;
use crate::markdown::{img_tag, scan};
use crate::memo::UploadMemo;
use crate::resolve::resolve;

/// How found images are replaced. Chosen once for the whole run.
pub enum Mode<'a> {
    Upload(&'a dyn Uploader),
    Inline,
}

/// Result of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Matches replaced with new markup.
    pub replaced: usize,
    /// Matches left as-is because no local file was found.
    pub skipped: usize,
    /// Calls actually made to the uploader.
    pub uploads: usize,
}

impl Rewrite {
    pub fn is_unchanged(&self) -> bool {
        self.replaced == 0
    }
}

/// Rewrite `text`, resolving relative image paths against `base_dir`.
/// `memo` carries uploads already done during this run.
pub fn rewrite(text: &str, base_dir: &Path, mode: &Mode<'_>, memo: &mut UploadMemo) -> Result<Rewrite> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut replaced = 0;
    let mut skipped = 0;
    let mut uploads = 0;

    for image in scan(text) {
        out.push_str(&text[last..image.span.start]);
        last = image.span.end;

        let resolved = resolve(&image.path, base_dir);
        if !resolved.exists {
            debug!(path = %image.path, "no local file, leaving reference as-is");
            out.push_str(&text[image.span.clone()]);
            skipped += 1;
            continue;
        }

        let read = || {
            std::fs::read(&resolved.path).map_err(|source| MdImgUpError::ImageUnreadable {
                path: resolved.path.clone(),
                source,
            })
        };

        let replacement = match mode {
            Mode::Inline => inline(&read()?, &resolved.path, &image),
            Mode::Upload(uploader) => {
                let basename = resolved
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| image.path.clone());
                let url = memo.get_or_upload(&basename, || -> Result<String> {
                    let bytes = read()?;
                    uploads += 1;
                    uploader.upload(&bytes, &basename).map_err(MdImgUpError::from)
                })?;
                img_tag(&image.alt, &url)
            }
        };
        debug!(path = %image.path, "replaced image reference");
        out.push_str(&replacement);
        replaced += 1;
    }
    out.push_str(&text[last..]);

    Ok(Rewrite {
        text: out,
        replaced,
        skipped,
        uploads,
    })
}
