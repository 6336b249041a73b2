//! Demo configuration.
//!
//! Read from `tray-demo.toml` in the working directory, or from the path
//! given as the first command line argument. Missing fields fall back to
//! defaults; a missing default file means all defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const DEFAULT_FILE: &str = "tray-demo.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Native tray executable.
    #[serde(default = "default_bin_path")]
    pub bin_path: PathBuf,

    /// Icon file, or an already encoded icon.
    #[serde(default = "default_icon")]
    pub icon: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_tooltip")]
    pub tooltip: String,
}

fn default_bin_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("tray_windows_release.exe")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("./tray_darwin_release")
    } else {
        PathBuf::from("./tray_linux_release")
    }
}

fn default_icon() -> String {
    if cfg!(windows) {
        "./logo_s.ico".into()
    } else {
        "./logo_s.png".into()
    }
}

fn default_title() -> String {
    "Tray demo".into()
}

fn default_tooltip() -> String {
    "Tips".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bin_path: default_bin_path(),
            icon: default_icon(),
            title: default_title(),
            tooltip: default_tooltip(),
        }
    }
}

impl Config {
    /// Loads the file named by `arg`, or the default file if present.
    ///
    /// An explicitly named file must exist.
    pub fn load(arg: Option<OsString>) -> anyhow::Result<Self> {
        match arg {
            Some(path) => Self::from_file(Path::new(&path)),
            None if Path::new(DEFAULT_FILE).exists() => Self::from_file(Path::new(DEFAULT_FILE)),
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(r#"title = "Mine""#).unwrap();
        assert_eq!(config.title, "Mine");
        assert_eq!(config.tooltip, "Tips");
        assert_eq!(config.bin_path, default_bin_path());
    }

    #[test]
    fn loads_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demo.toml");
        std::fs::write(&path, "bin_path = \"/opt/tray\"\nicon = \"icon.png\"\n").unwrap();

        let config = Config::load(Some(path.into_os_string())).unwrap();
        assert_eq!(config.bin_path, PathBuf::from("/opt/tray"));
        assert_eq!(config.icon, "icon.png");
        assert_eq!(config.title, "Tray demo");
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(Config::load(Some(missing.into_os_string())).is_err());
    }

    #[test]
    fn roundtrip_toml() {
        let config = Config {
            bin_path: "/usr/bin/tray".into(),
            icon: "x.png".into(),
            title: "T".into(),
            tooltip: "tip".into(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.bin_path, config.bin_path);
        assert_eq!(parsed.tooltip, "tip");
    }
}
