//! Application path management for portable and installed modes.
//!
//! - **Dev mode** (debug builds): `config.yaml` in the working directory wins.
//! - **Portable mode**: a `.portable` marker next to the executable keeps
//!   config and logs beside it.
//! - **Installed mode** (default): files live under the platform config
//!   directory (`~/.config/padlink`, `%APPDATA%\padlink`, ...).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;

/// Application name used for directories in installed mode
const APP_NAME: &str = "padlink";

const CONFIG_FILE: &str = "config.yaml";

/// Application paths for config and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub config: PathBuf,
    pub logs_dir: PathBuf,
    /// Whether running in portable mode (config next to exe)
    pub is_portable: bool,
}

impl AppPaths {
    /// Detect the appropriate paths based on environment.
    ///
    /// Called before logging is initialized.
    pub fn detect() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        #[cfg(debug_assertions)]
        {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            if cwd.join(CONFIG_FILE).exists() {
                eprintln!("[paths] Running in DEV mode ({})", cwd.display());
                return Self::portable(&cwd);
            }
        }

        Self::resolve(&exe_dir, dirs::config_dir())
    }

    fn resolve(exe_dir: &Path, config_dir: Option<PathBuf>) -> Self {
        if exe_dir.join(".portable").exists() {
            return Self::portable(exe_dir);
        }

        let base = config_dir
            .unwrap_or_else(|| exe_dir.to_path_buf())
            .join(APP_NAME);

        Self {
            config: base.join(CONFIG_FILE),
            logs_dir: base.join("logs"),
            is_portable: false,
        }
    }

    fn portable(dir: &Path) -> Self {
        Self {
            config: dir.join(CONFIG_FILE),
            logs_dir: dir.join("logs"),
            is_portable: true,
        }
    }

    /// Get the base directory (for displaying in logs)
    pub fn base_dir(&self) -> PathBuf {
        self.config
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Create missing directories and write a default config if none exists
    pub fn ensure_directories(&self) -> Result<()> {
        if !self.logs_dir.exists() {
            debug!("Creating logs directory: {}", self.logs_dir.display());
            std::fs::create_dir_all(&self.logs_dir).with_context(|| {
                format!("Failed to create logs directory {}", self.logs_dir.display())
            })?;
        }

        if let Some(config_parent) = self.config.parent() {
            if !config_parent.as_os_str().is_empty() && !config_parent.exists() {
                debug!("Creating config directory: {}", config_parent.display());
                std::fs::create_dir_all(config_parent)?;
            }
        }

        if !self.config.exists() {
            self.write_default_config()?;
        }

        Ok(())
    }

    fn write_default_config(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&AppConfig::default())
            .context("Failed to serialize default config")?;
        std::fs::write(&self.config, yaml)
            .with_context(|| format!("Failed to write {}", self.config.display()))?;
        info!("Wrote default config to {}", self.config.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_portable_marker() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".portable"), "").unwrap();

        let paths = AppPaths::resolve(temp.path(), Some(PathBuf::from("/elsewhere")));
        assert!(paths.is_portable);
        assert_eq!(paths.config, temp.path().join("config.yaml"));
        assert_eq!(paths.base_dir(), temp.path());
    }

    #[test]
    fn test_installed_mode_uses_config_dir() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::resolve(temp.path(), Some(PathBuf::from("/cfg")));
        assert!(!paths.is_portable);
        assert_eq!(paths.config, PathBuf::from("/cfg/padlink/config.yaml"));
        assert_eq!(paths.logs_dir, PathBuf::from("/cfg/padlink/logs"));
    }

    #[test]
    fn test_ensure_directories_writes_loadable_default() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::resolve(temp.path(), Some(temp.path().join("cfg")));

        paths.ensure_directories().unwrap();
        assert!(paths.logs_dir.is_dir());

        let written = std::fs::read_to_string(&paths.config).unwrap();
        let parsed = AppConfig::parse(&written).unwrap();
        assert_eq!(parsed, AppConfig::default());

        // Existing config is left alone
        std::fs::write(&paths.config, "device:\n  hostname: \"kept\"\n").unwrap();
        paths.ensure_directories().unwrap();
        let kept = std::fs::read_to_string(&paths.config).unwrap();
        assert!(kept.contains("kept"));
    }
}
