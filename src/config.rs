use crate::catalog::Category;
use crate::session::Settings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Saved defaults for the setup screen, round-tripped as JSON under the
/// platform config dir. Game results are never persisted; only the parent's
/// last-used settings are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub word_count: usize,
    pub uppercase_only: bool,
    pub letters: Vec<String>,
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for Config {
    fn from(settings: &Settings) -> Self {
        let mut letters: Vec<String> = settings.allowed_letters.iter().cloned().collect();
        letters.sort();
        let mut categories: Vec<Category> = settings.allowed_categories.iter().copied().collect();
        categories.sort_by_key(|c| *c as u8);
        Self {
            word_count: settings.word_count,
            uppercase_only: settings.uppercase_only,
            letters,
            categories,
        }
    }
}

impl Config {
    pub fn to_settings(&self) -> Settings {
        Settings {
            allowed_letters: self.letters.iter().cloned().collect(),
            allowed_categories: self.categories.iter().copied().collect(),
            word_count: self.word_count.max(1),
            uppercase_only: self.uppercase_only,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "cteni") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("cteni_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
