//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    ConfigError,
    I18nSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: I18nSettings,

    /// サイトのルートパス
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: I18nSettings::default(), site_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `site_root` - 静的サイトのルートパス
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!(?site_root, "Loading settings");

        let settings = if let Some(root) = &site_root {
            loader::load_from_site(root)?.map_or_else(I18nSettings::default, |site| {
                tracing::debug!(?site, "Loaded site settings");
                site
            })
        } else {
            I18nSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.site_root = site_root;
        tracing::debug!(settings = ?self.current_settings, "Settings loaded successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    /// サイトルートを取得
    #[must_use]
    pub const fn site_root(&self) -> Option<&PathBuf> {
        self.site_root.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().default_language, "en");
        assert!(manager.site_root().is_none());
    }

    /// load_settings: site_root が None の場合
    #[rstest]
    fn test_load_settings_without_site_root() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().storage_key, "siteLang");
        assert!(manager.site_root().is_none());
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"supportedLanguages": ["zh", "en"], "defaultLanguage": "zh"}"#;
        fs::write(temp_dir.path().join(".page-i18n.json"), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_language, "zh");
        assert!(manager.site_root().is_some());
    }

    /// load_settings: 不正な設定ファイルはバリデーションエラー
    #[rstest]
    fn test_load_settings_with_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"supportedLanguages": ["zh"], "defaultLanguage": "en"}"#;
        fs::write(temp_dir.path().join(".page-i18n.json"), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().default_language, "en");
        assert!(manager.site_root().is_none());
    }

    /// load_settings: 設定ファイルがない場合はデフォルト値
    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().query_parameter, "lang");
    }
}
