use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BridgeError, BridgeResult};
use crate::symbols::default_modules;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Default `env_logger` filter; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Modules loaded at startup and the exports resolved from each.
    #[serde(default = "default_modules")]
    pub modules: Vec<ModuleConfig>,

    #[serde(default)]
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,

    #[serde(default)]
    pub symbols: Vec<String>,
}

/// What the probe binary exercises after initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub window_class: Option<String>,

    #[serde(default)]
    pub window_title: Option<String>,

    /// Window-relative point sampled with GetPixel.
    #[serde(default)]
    pub pixel: Option<[i32; 2]>,

    /// Characters passed through VkKeyScanW and MapVirtualKeyExW.
    #[serde(default = "default_map_chars")]
    pub map_chars: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_map_chars() -> String {
    "aZ1".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            modules: default_modules(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            window_class: None,
            window_title: None,
            pixel: None,
            map_chars: default_map_chars(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml(s: &str) -> BridgeResult<Self> {
        toml::from_str(s).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Reads `path`. `None` when the file cannot be read; a file that does not
    /// parse is an error.
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Option<Self>> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s)
                .map(Some)
                .map_err(|e| BridgeError::Config(format!("parse {}: {}", path.display(), e))),
            Err(_) => Ok(None),
        }
    }

    /// Reads `path`; a missing or unreadable file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        match Self::load(path)? {
            Some(cfg) => Ok(cfg),
            None => {
                log::debug!("config: '{}' not readable, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{GDI32, KERNEL32, USER32};
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = BridgeConfig::from_toml("").unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.modules, default_modules());
        assert!(cfg.probe.window_title.is_none());
        assert_eq!(cfg.probe.map_chars, "aZ1");
    }

    #[test]
    fn explicit_modules_replace_table() {
        let cfg = BridgeConfig::from_toml(
            r#"
            log_level = "debug"

            [[modules]]
            name = "user32.dll"
            symbols = ["GetWindowRect"]

            [probe]
            window_title = "Untitled - Notepad"
            pixel = [10, 20]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.modules.len(), 1);
        assert_eq!(cfg.modules[0].name, USER32);
        assert_eq!(cfg.modules[0].symbols, vec!["GetWindowRect".to_string()]);
        assert_eq!(cfg.probe.window_title.as_deref(), Some("Untitled - Notepad"));
        assert_eq!(cfg.probe.pixel, Some([10, 20]));
    }

    #[test]
    fn malformed_document_is_config_error() {
        let err = BridgeConfig::from_toml("modules = 3").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn load_or_default_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();

        let cfg = BridgeConfig::load_or_default(file.path()).unwrap();
        assert_eq!(cfg.log_level, "warn");

        let names: Vec<_> = cfg.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![KERNEL32, USER32, GDI32]);
    }

    #[test]
    fn load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BridgeConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BridgeConfig::load(dir.path().join("absent.toml")).unwrap().is_none());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"trace\"").unwrap();
        let cfg = BridgeConfig::load(file.path()).unwrap().unwrap();
        assert_eq!(cfg.log_level, "trace");
    }

    #[test]
    fn load_or_default_rejects_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = [").unwrap();

        let err = BridgeConfig::load_or_default(file.path()).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
