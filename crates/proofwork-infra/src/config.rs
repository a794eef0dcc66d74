//! Global configuration loader for Proofwork.
//!
//! Reads `config.toml` from the data directory (`~/.proofwork/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use proofwork_types::config::GlobalConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PROOFWORK_DATA_DIR";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => sanitize(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Replace out-of-range values with their defaults.
fn sanitize(mut config: GlobalConfig) -> GlobalConfig {
    let defaults = GlobalConfig::default();
    if config.max_kudos_lines == 0 {
        tracing::warn!("max_kudos_lines must be positive, using {}", defaults.max_kudos_lines);
        config.max_kudos_lines = defaults.max_kudos_lines;
    }
    if config.max_page_size == 0 {
        config.max_page_size = defaults.max_page_size;
    }
    if !(50..=100).contains(&config.default_skills_matched_percent) {
        tracing::warn!(
            "default_skills_matched_percent {} out of range, using {}",
            config.default_skills_matched_percent,
            defaults.default_skills_matched_percent
        );
        config.default_skills_matched_percent = defaults.default_skills_matched_percent;
    }
    config
}

/// Resolve the data directory: `PROOFWORK_DATA_DIR`, else `~/.proofwork`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".proofwork")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
max_kudos_lines = 12
default_page_size = 5
default_skills_matched_percent = 75
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.max_kudos_lines, 12);
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.default_skills_matched_percent, 75);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_out_of_range_values_fall_back() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "max_kudos_lines = 0\ndefault_skills_matched_percent = 20\n",
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.max_kudos_lines, 30);
        assert_eq!(config.default_skills_matched_percent, 50);
    }
}
