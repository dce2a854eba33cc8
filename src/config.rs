// Persisted endpoint configuration.
//
// The record lives in a small JSON file in the working directory. A missing
// or corrupt file is not an error: defaults are written back and the caller
// is told so it can notify the user.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{MdImgUpError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "mdimgup.json";

/// Endpoint URL and credentials handed to the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub url: String,
    pub username: String,
    pub password: String,
    /// Request timeout for each upload, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "http://mysite.wordpress.com/xmlrpc.php".to_string(),
            username: "username".to_string(),
            password: "password".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Pretty JSON of everything except the password.
    pub fn display_without_password(&self) -> String {
        let shown = serde_json::json!({
            "url": self.url,
            "username": self.username,
            "timeout_secs": self.timeout_secs,
        });
        serde_json::to_string_pretty(&shown).unwrap_or_default()
    }
}

/// How a configuration was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoad {
    Loaded(Config),
    /// The file was missing or unreadable; defaults were written in its place.
    Recreated(Config),
}

impl ConfigLoad {
    pub fn into_config(self) -> Config {
        match self {
            ConfigLoad::Loaded(c) | ConfigLoad::Recreated(c) => c,
        }
    }
}

/// Where configuration is kept between runs.
pub trait ConfigStore {
    fn load_or_init(&self) -> Result<ConfigLoad>;
    fn save(&self, config: &Config) -> Result<()>;
}

/// JSON file at a fixed path.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::result::Result<Config, String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

impl ConfigStore for FileConfigStore {
    fn load_or_init(&self) -> Result<ConfigLoad> {
        match self.read() {
            Ok(config) => {
                debug!(path = %self.path.display(), "loaded configuration");
                Ok(ConfigLoad::Loaded(config))
            }
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "configuration unreadable, restoring defaults");
                let config = Config::default();
                self.save(&config)?;
                Ok(ConfigLoad::Recreated(config))
            }
        }
    }

    fn save(&self, config: &Config) -> Result<()> {
        let write_err = |reason: String| MdImgUpError::ConfigWrite {
            path: self.path.clone(),
            reason,
        };
        let json = serde_json::to_string_pretty(config).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }
}

/// Interactive input used by `config --edit`.
pub trait Prompter {
    /// Ask for a value, showing `current`. An empty answer keeps `current`.
    fn input(&self, prompt: &str, current: &str) -> Result<String>;
    /// Ask for a secret without echo. May return an empty string.
    fn password(&self, prompt: &str) -> Result<String>;
}

/// Ask for new values. Blank URL or username keeps the old value; the
/// password is always replaced with whatever was typed, blank included.
pub fn edit_config(current: &Config, prompter: &dyn Prompter) -> Result<Config> {
    let url = prompter.input("WordPress XML-RPC URL", &current.url)?;
    let username = prompter.input("WordPress username", &current.username)?;
    let password = prompter.password("WordPress password")?;
    Ok(Config {
        url: if url.trim().is_empty() { current.url.clone() } else { url },
        username: if username.trim().is_empty() {
            current.username.clone()
        } else {
            username
        },
        password,
        timeout_secs: current.timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    struct ScriptedPrompter {
        answers: RefCell<VecDeque<String>>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(|s| s.to_string()).collect()),
            }
        }

        fn next(&self) -> Result<String> {
            self.answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| MdImgUpError::Prompt("no scripted answer left".into()))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&self, _prompt: &str, _current: &str) -> Result<String> {
            self.next()
        }
        fn password(&self, _prompt: &str) -> Result<String> {
            self.next()
        }
    }

    #[test]
    fn missing_file_is_recreated_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = FileConfigStore::new(tmp.path().join("mdimgup.json"));

        let load = store.load_or_init().unwrap();
        assert_eq!(load, ConfigLoad::Recreated(Config::default()));
        assert!(store.path().is_file());

        let again = store.load_or_init().unwrap();
        assert_eq!(again, ConfigLoad::Loaded(Config::default()));
    }

    #[test]
    fn corrupt_file_is_recreated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mdimgup.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileConfigStore::new(&path);
        assert!(matches!(store.load_or_init().unwrap(), ConfigLoad::Recreated(_)));
    }

    #[test]
    fn saved_config_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = FileConfigStore::new(tmp.path().join("mdimgup.json"));
        let config = Config {
            url: "https://blog.example/xmlrpc.php".into(),
            username: "ann".into(),
            password: "secret".into(),
            timeout_secs: 10,
        };
        store.save(&config).unwrap();
        assert_eq!(store.load_or_init().unwrap().into_config(), config);
    }

    #[test]
    fn timeout_defaults_when_absent_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mdimgup.json");
        std::fs::write(&path, r#"{"url":"u","username":"n","password":"p"}"#).unwrap();

        let config = FileConfigStore::new(&path).load_or_init().unwrap().into_config();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn display_hides_password() {
        let shown = Config::default().display_without_password();
        assert!(shown.contains("username"));
        assert!(!shown.contains("password"));
    }

    #[test]
    fn blank_answers_keep_url_and_username_but_not_password() {
        let prompter = ScriptedPrompter::new(&["", "", ""]);
        let edited = edit_config(&Config::default(), &prompter).unwrap();
        assert_eq!(edited.url, Config::default().url);
        assert_eq!(edited.username, "username");
        assert_eq!(edited.password, "");
    }

    #[test]
    fn answers_replace_values() {
        let prompter = ScriptedPrompter::new(&["https://b/xmlrpc.php", "bob", "hunter2"]);
        let edited = edit_config(&Config::default(), &prompter).unwrap();
        assert_eq!(edited.url, "https://b/xmlrpc.php");
        assert_eq!(edited.username, "bob");
        assert_eq!(edited.password, "hunter2");
    }
}
