//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    RegistrySettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".bundle-l10n.json";

/// ディレクトリから設定を読み込む
///
/// `.bundle-l10n.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_dir(dir: &Path) -> Result<Option<RegistrySettings>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_file(&config_path).map(Some)
}

/// 指定されたファイルから設定を読み込む
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_file(config_path: &Path) -> Result<RegistrySettings, ConfigError> {
    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    let settings: RegistrySettings = serde_json::from_str(&content)?;

    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_dir`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_dir_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"referenceLanguage": "ja"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_from_dir(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap();
        assert!(settings.is_some());
        assert_eq!(settings.unwrap().reference_language, "ja");
    }

    /// `load_from_dir`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_dir_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_dir(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_dir`: JSON パースエラー
    #[rstest]
    fn test_load_from_dir_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid json").unwrap();

        let result = load_from_dir(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    /// `load_from_file`: ファイルが存在しない場合は IO エラー
    #[rstest]
    fn test_load_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_file(&temp_dir.path().join("missing.json"));

        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
