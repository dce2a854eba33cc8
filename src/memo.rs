// Per-run table of uploads already done, keyed by file basename.
//
// Two files with the same name in different directories share one entry:
// only the first is uploaded and both references get its URL.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct UploadMemo {
    entries: HashMap<String, String>,
}

impl UploadMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the remembered URL for `basename`, or run `upload` and remember
    /// what it returns. A failed upload leaves the table unchanged.
    pub fn get_or_upload<E, F>(&mut self, basename: &str, upload: F) -> Result<String, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if let Some(url) = self.entries.get(basename) {
            return Ok(url.clone());
        }
        let url = upload()?;
        self.entries.insert(basename.to_string(), url.clone());
        Ok(url)
    }
}
