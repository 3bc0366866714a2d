//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    RegistrySettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: RegistrySettings,

    /// 設定ファイルを探したディレクトリ
    config_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: RegistrySettings::default(), config_dir: None }
    }

    /// ディレクトリから設定を読み込む
    ///
    /// 設定ファイルがない場合はデフォルト値を使う
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, config_dir: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", config_dir);

        let settings = if let Some(dir) = &config_dir {
            loader::load_from_dir(dir)?.map_or_else(RegistrySettings::default, |found| {
                tracing::debug!("Loaded settings: {:?}", found);
                found
            })
        } else {
            RegistrySettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.config_dir = config_dir;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 明示的に指定されたファイルから設定を読み込む
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings_file(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        let settings = loader::load_from_file(config_path)?;
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.config_dir = config_path.parent().map(Path::to_path_buf);

        Ok(())
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, new_settings: RegistrySettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &RegistrySettings {
        &self.current_settings
    }

    #[must_use]
    pub const fn config_dir(&self) -> Option<&PathBuf> {
        self.config_dir.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().reference_language, "en");
        assert!(manager.config_dir().is_none());
    }

    /// load_settings: config_dir が None の場合
    #[rstest]
    fn test_load_settings_without_dir() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().reference_language, "en");
        assert!(manager.config_dir().is_none());
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"referenceLanguage": "de", "suite": {"timeoutMs": 5000}}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().reference_language, "de");
        assert_eq!(manager.get_settings().suite.timeout_ms, 5000);
        assert!(manager.get_settings().suite.preserve_order);
        assert!(manager.config_dir().is_some());
    }

    /// load_settings: 無効な設定ファイルは拒否され、現在の設定は維持される
    #[rstest]
    fn test_load_settings_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"referenceLanguage": ""}"#)
            .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().reference_language, "en");
        assert!(manager.config_dir().is_none());
    }

    /// load_settings_file: 明示的なファイル
    #[rstest]
    fn test_load_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        fs::write(&path, r#"{"matching": {"caseInsensitive": false}}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings_file(&path);

        assert!(result.is_ok());
        assert!(!manager.get_settings().matching.case_insensitive);
        assert_eq!(manager.config_dir(), Some(&temp_dir.path().to_path_buf()));
    }

    /// update_settings: 無効な設定でエラー
    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let mut new_settings = RegistrySettings::default();
        new_settings.localization_files.include_patterns.clear();

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }
}
