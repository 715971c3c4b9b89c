//! Keep-list store.
//!
//! One package name per line under the user's config directory. The list is
//! read once at startup and rewritten unchanged at shutdown, so hand-edits
//! and the seeded defaults both survive a run.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Seeded when the keep file is empty or missing.
pub const DEFAULT_KEEP: &[&str] = &["pacman", "glibc"];

const APP_DIR: &str = "pacpick";
const KEEP_FILE: &str = "keep_packages";

/// Config base: `$XDG_CONFIG_HOME` when set and non-empty, else
/// `$HOME/.config`.
fn config_base() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME")
        && !xdg.trim().is_empty()
    {
        return Ok(PathBuf::from(xdg));
    }
    match env::var("HOME") {
        Ok(home) => Ok(Path::new(&home).join(".config")),
        Err(_) => Err(Error::ConfigDirAccess {
            path: PathBuf::from("~/.config"),
            source: std::io::Error::new(ErrorKind::NotFound, "HOME is not set"),
        }),
    }
}

/// Resolve (and if missing, create) the app config directory, returning the
/// keep file path.
pub fn default_path() -> Result<PathBuf> {
    let dir = config_base()?.join(APP_DIR);
    ensure_config_dir(&dir)?;
    Ok(dir.join(KEEP_FILE))
}

/// Create the config directory when it does not exist. A directory that
/// exists but cannot be inspected, or that is not a directory at all, is
/// fatal: that is a broken setup, not a first run.
fn ensure_config_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| Error::ConfigDirCreate {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(Error::ConfigDirAccess {
            path: dir.to_path_buf(),
            source,
        }),
        Ok(meta) if !meta.is_dir() => Err(Error::ConfigDirNotDir(dir.to_path_buf())),
        Ok(_) => Ok(()),
    }
}

/// Log directory under the app config dir, created on demand. Logging is
/// best-effort, so resolution failures yield `None` instead of an error.
pub fn logs_dir() -> Option<PathBuf> {
    let dir = config_base().ok()?.join(APP_DIR).join("logs");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// The ordered keep list plus the path it round-trips through.
#[derive(Debug)]
pub struct KeepList {
    names: Vec<String>,
    path: PathBuf,
}

impl KeepList {
    /// Read the keep file, creating it when absent. Blank lines are skipped
    /// and each line's trailing newline is stripped. Zero names means a
    /// fresh or blanked file, so the defaults are seeded.
    pub fn load(path: &Path) -> Result<Self> {
        // Create-if-missing first so a fresh install starts with a file the
        // shutdown rewrite can target.
        OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| Error::KeepFileOpen {
                path: path.to_path_buf(),
                source,
            })?;
        let content = fs::read_to_string(path).map_err(|source| Error::KeepFileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut names: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            names = DEFAULT_KEEP.iter().map(|s| (*s).to_string()).collect();
        }

        Ok(Self {
            names,
            path: path.to_path_buf(),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file: one name per line, trailing newline. Failures here
    /// happen at shutdown and are the caller's to log, not fatal.
    pub fn save(&self) -> std::io::Result<()> {
        let mut out = String::new();
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        fs::write(&self.path, out)
    }
}
