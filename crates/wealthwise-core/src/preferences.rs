//! Theme preference persistence
//!
//! The theme is read once at startup and written on every change. The file
//! store keeps a single word (`light` or `dark`) in
//! `<config dir>/wealthwise/theme`; a missing or unreadable value means
//! light.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::snapshot::write_atomic;

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme
    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the theme preference lives
pub trait ThemeStore: Send + Sync {
    /// Current theme (light when nothing valid is stored)
    fn load(&self) -> Theme;

    /// Persist a theme
    fn save(&self, theme: Theme) -> Result<()>;

    /// Flip the theme and persist it, returning the new value
    fn toggle(&self) -> Result<Theme> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}

/// Theme kept in a small text file
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the platform config location
    pub fn default_location() -> Result<Self> {
        default_theme_path()
            .map(Self::new)
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(path = %self.path.display(), "Ignoring invalid theme preference");
                Theme::default()
            }),
            Err(_) => Theme::default(),
        }
    }

    fn save(&self, theme: Theme) -> Result<()> {
        write_atomic(&self.path, theme.as_str().as_bytes())?;
        tracing::debug!(theme = theme.as_str(), "Saved theme preference");
        Ok(())
    }
}

/// In-memory theme store
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    theme: Mutex<Option<Theme>>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Mutex::new(Some(theme)),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Theme {
        self.theme
            .lock()
            .map(|t| (*t).unwrap_or_default())
            .unwrap_or_default()
    }

    fn save(&self, theme: Theme) -> Result<()> {
        let mut guard = self
            .theme
            .lock()
            .map_err(|_| Error::InvalidData("Theme store lock poisoned".into()))?;
        *guard = Some(theme);
        Ok(())
    }
}

/// Default theme file path
pub fn default_theme_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wealthwise").join("theme"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("Dark\n".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string(), "light");
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_file_store_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThemeStore::new(dir.path().join("theme"));
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn test_file_store_invalid_value_is_light() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme");
        std::fs::write(&path, "purple").unwrap();
        assert_eq!(FileThemeStore::new(path).load(), Theme::Light);
    }

    #[test]
    fn test_file_store_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wealthwise").join("theme");
        let store = FileThemeStore::new(path.clone());

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "dark");

        // A fresh store reads the persisted value
        let reopened = FileThemeStore::new(path);
        assert_eq!(reopened.load(), Theme::Dark);
        assert_eq!(reopened.toggle().unwrap(), Theme::Light);
        assert_eq!(reopened.load(), Theme::Light);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryThemeStore::new();
        assert_eq!(store.load(), Theme::Light);
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Theme::Dark);
        assert_eq!(MemoryThemeStore::with_theme(Theme::Dark).toggle().unwrap(), Theme::Light);
    }
}
