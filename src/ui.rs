// UI layer: the terminal side of the tool. Prompts use `dialoguer`, upload
// progress uses an `indicatif` spinner. The core only sees these through
// the `Prompter` and `Uploader` traits.

use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::Uploader;
use crate::config::Prompter;
use crate::error::{MdImgUpError, Result, UploadError};

/// Prompts on the controlling terminal. The password is never echoed.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str, current: &str) -> Result<String> {
        // `Input` shows `current` in parentheses and returns it on a bare Enter.
        Input::<String>::new()
            .with_prompt(prompt)
            .default(current.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MdImgUpError::Prompt(e.to_string()))
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| MdImgUpError::Prompt(e.to_string()))
    }
}

/// Wraps another uploader with a spinner while each request is in flight
/// and prints the resulting URL once it succeeds.
pub struct SpinnerUploader<U> {
    inner: U,
}

impl<U: Uploader> SpinnerUploader<U> {
    pub fn new(inner: U) -> Self {
        Self { inner }
    }
}

impl<U: Uploader> Uploader for SpinnerUploader<U> {
    fn upload(&self, bytes: &[u8], filename: &str) -> std::result::Result<String, UploadError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Uploading {filename}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.upload(bytes, filename);
        spinner.finish_and_clear();
        if let Ok(url) = &result {
            println!("Uploaded image to {url}");
        }
        result
    }
}
