// Library root
// -----------
// mdimgup uploads the local images referenced by a Markdown document and
// rewrites the document in place with `<img>` tags (or inlines them as
// base64 data). The binary (`main.rs`) is a thin clap front end.
//
// Module responsibilities:
// - `markdown`: the `![alt](path)` scanner and `<img>` markup.
// - `resolve`: maps a path token to a file next to the document.
// - `memo`: per-run table that stops the same file being uploaded twice.
// - `api`: the `Uploader` seam and the WordPress XML-RPC client.
// - `inline`: base64 data-URI embedding.
// - `rewrite`: the scan-and-substitute pass over document text.
// - `document`: reads the file, runs the pass, writes it back.
// - `config`: persisted endpoint credentials and `config --edit`.
// - `ui`: terminal prompts and the upload spinner.
pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod inline;
pub mod markdown;
pub mod memo;
pub mod resolve;
pub mod rewrite;
pub mod ui;

pub use error::{MdImgUpError, Result, UploadError};
pub use rewrite::{rewrite, Mode, Rewrite};
