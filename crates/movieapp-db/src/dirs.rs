//! Where movieapp keeps its files.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory name below the XDG base directories.
const APP_DIR_NAME: &str = "movieapp";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Database file name.
pub const DB_FILE_NAME: &str = "movieapp.db";

/// Config and data directories of one movieapp installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppDirs {
    /// Keeps config and data together in `dir` (the `--dir` override).
    #[must_use]
    pub fn single(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    /// Resolves the directories from the override or the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and neither the XDG
    /// variables nor `HOME` locate a directory.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Ok(Self::single(dir)),
            None => Self::from_env(|name| std::env::var(name).ok()),
        }
    }

    /// Builds the XDG layout from variables looked up through `var`.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is needed but unset.
    pub fn from_env<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| var(name).filter(|v| !v.is_empty()).map(PathBuf::from);
        let home = lookup("HOME");
        let base = |xdg: &str, fallback: &[&str]| -> Result<PathBuf> {
            if let Some(dir) = lookup(xdg) {
                return Ok(dir);
            }
            let Some(home) = home.as_ref() else {
                bail!("neither {xdg} nor HOME environment variable is set");
            };
            Ok(fallback.iter().fold(home.clone(), |path, part| path.join(part)))
        };

        Ok(Self {
            config_dir: base("XDG_CONFIG_HOME", &[".config"])?.join(APP_DIR_NAME),
            data_dir: base("XDG_DATA_HOME", &[".local", "share"])?.join(APP_DIR_NAME),
        })
    }

    /// Directory holding the config file.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory holding the database.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the TOML config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Path of the `SQLite` database.
    #[must_use]
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
