use crate::error::{Result, UpstatError};
use crate::processor::DecodeMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Upload policy, stored in `<dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadConfig {
    /// Extensions accepted for upload, without the leading dot (e.g. "txt")
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Largest accepted upload, inclusive
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    #[serde(default)]
    pub decode_mode: DecodeMode,

    /// Append log lines here as well as to stderr. Relative paths resolve
    /// against the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["txt".to_string(), "csv".to_string()]
}

fn default_max_file_size_bytes() -> u64 {
    DEFAULT_MAX_FILE_SIZE_BYTES
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            decode_mode: DecodeMode::default(),
            log_file: None,
        }
    }
}

impl UploadConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(UpstatError::Io)?;
        let config: UploadConfig =
            serde_json::from_str(&content).map_err(UpstatError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(UpstatError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(UpstatError::Serialization)?;
        fs::write(config_path, content).map_err(UpstatError::Io)?;
        Ok(())
    }

    /// Allow-set in canonical form: trimmed, no leading dot, lowercase.
    ///
    /// Blank entries are dropped. If nothing is left, the default set is used.
    pub fn normalized_extensions(&self) -> BTreeSet<String> {
        let normalized: BTreeSet<String> = self
            .allowed_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();

        if normalized.is_empty() {
            default_allowed_extensions().into_iter().collect()
        } else {
            normalized
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UploadConfig::default();
        assert_eq!(config.allowed_extensions, vec!["txt", "csv"]);
        assert_eq!(config.max_file_size_bytes, 10_485_760);
        assert_eq!(config.decode_mode, DecodeMode::Lossy);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = UploadConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, UploadConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");

        let config = UploadConfig {
            allowed_extensions: vec!["md".to_string()],
            max_file_size_bytes: 2048,
            decode_mode: DecodeMode::Strict,
            log_file: Some(PathBuf::from("upload_service.log")),
        };
        config.save(&nested).unwrap();

        let loaded = UploadConfig::load(&nested).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: UploadConfig = serde_json::from_str(r#"{"max_file_size_bytes": 5}"#).unwrap();
        assert_eq!(config.max_file_size_bytes, 5);
        assert_eq!(config.allowed_extensions, vec!["txt", "csv"]);
        assert_eq!(config.decode_mode, DecodeMode::Lossy);
    }

    #[test]
    fn test_log_file_is_optional_and_omitted_when_unset() {
        let config: UploadConfig =
            serde_json::from_str(r#"{"log_file": "logs/upload_service.log"}"#).unwrap();
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("logs/upload_service.log"))
        );

        let json = serde_json::to_string(&UploadConfig::default()).unwrap();
        assert!(!json.contains("log_file"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            UploadConfig::load(temp_dir.path()),
            Err(UpstatError::Serialization(_))
        ));
    }

    #[test]
    fn test_normalized_extensions() {
        let config = UploadConfig {
            allowed_extensions: vec![" .TXT".into(), "Csv".into(), "".into(), "txt".into()],
            ..UploadConfig::default()
        };
        let exts: Vec<String> = config.normalized_extensions().into_iter().collect();
        assert_eq!(exts, vec!["csv", "txt"]);
    }

    #[test]
    fn test_empty_allow_list_falls_back_to_defaults() {
        let config = UploadConfig {
            allowed_extensions: vec![" ".into(), ".".into()],
            ..UploadConfig::default()
        };
        let exts: Vec<String> = config.normalized_extensions().into_iter().collect();
        assert_eq!(exts, vec!["csv", "txt"]);
    }
}
